use serde::Deserialize;

use super::models::{
    ApplicationFilters, ApplicationSort, ApplicationStatus, SortDirection, SortField,
};

pub const DEFAULT_PAGE_SIZE: i64 = 20;

/// Query-string parameters of the list endpoint. Sort parameters arrive as
/// free-form strings and are parsed leniently: unknown fields fall back to
/// `created_at`, unknown directions to `desc`.
#[derive(Debug, Default, Deserialize)]
pub struct ListParams {
    pub status: Option<ApplicationStatus>,
    pub search: Option<String>,
    pub sort_field: Option<String>,
    pub sort_direction: Option<String>,
    pub page: Option<i64>,
    pub page_size: Option<i64>,
}

impl ListParams {
    pub fn filters(&self) -> ApplicationFilters {
        ApplicationFilters {
            status: self.status,
            search: self.search.clone(),
        }
    }

    pub fn sort(&self) -> ApplicationSort {
        ApplicationSort {
            field: self
                .sort_field
                .as_deref()
                .map(SortField::parse)
                .unwrap_or(SortField::CreatedAt),
            direction: self
                .sort_direction
                .as_deref()
                .map(SortDirection::parse)
                .unwrap_or(SortDirection::Desc),
        }
    }

    pub fn page(&self) -> i64 {
        self.page.unwrap_or(1)
    }

    pub fn page_size(&self) -> i64 {
        self.page_size.unwrap_or(DEFAULT_PAGE_SIZE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_when_no_params() {
        let params = ListParams::default();
        assert_eq!(params.page(), 1);
        assert_eq!(params.page_size(), DEFAULT_PAGE_SIZE);
        let sort = params.sort();
        assert_eq!(sort.field, SortField::CreatedAt);
        assert_eq!(sort.direction, SortDirection::Desc);
        assert!(params.filters().status.is_none());
    }

    #[test]
    fn unrecognized_sort_falls_back() {
        let params = ListParams {
            sort_field: Some("favourite_color".to_string()),
            sort_direction: Some("upwards".to_string()),
            ..Default::default()
        };
        let sort = params.sort();
        assert_eq!(sort.field, SortField::CreatedAt);
        assert_eq!(sort.direction, SortDirection::Desc);
    }

    #[test]
    fn query_string_parses_status_and_paging() {
        let params: ListParams = serde_urlencoded::from_str(
            "status=offer&search=acme&sort_field=company&sort_direction=asc&page=2&page_size=5",
        )
        .unwrap();
        assert_eq!(params.filters().status, Some(ApplicationStatus::Offer));
        assert_eq!(params.filters().search.as_deref(), Some("acme"));
        assert_eq!(params.sort().field, SortField::Company);
        assert_eq!(params.sort().direction, SortDirection::Asc);
        assert_eq!(params.page(), 2);
        assert_eq!(params.page_size(), 5);
    }

    #[test]
    fn unknown_status_param_is_rejected() {
        let result: Result<ListParams, _> = serde_urlencoded::from_str("status=ghosted");
        assert!(result.is_err());
    }
}
