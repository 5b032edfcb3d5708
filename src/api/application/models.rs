use std::collections::HashMap;
use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::db::models::ApplicationRow;

/// Lifecycle tag for a tracked application.
///
/// `Rejected` and `Withdrawn` are terminal by convention only; no transition
/// is blocked anywhere in the system.
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ApplicationStatus {
    Draft,
    Applied,
    Screening,
    Interviewing,
    Offer,
    Accepted,
    Rejected,
    Withdrawn,
}

impl ApplicationStatus {
    /// The literal stored in the `status` column.
    pub fn as_str(&self) -> &'static str {
        match self {
            ApplicationStatus::Draft => "draft",
            ApplicationStatus::Applied => "applied",
            ApplicationStatus::Screening => "screening",
            ApplicationStatus::Interviewing => "interviewing",
            ApplicationStatus::Offer => "offer",
            ApplicationStatus::Accepted => "accepted",
            ApplicationStatus::Rejected => "rejected",
            ApplicationStatus::Withdrawn => "withdrawn",
        }
    }

    /// Parse a stored literal. Returns `None` for anything outside the
    /// eight known tags.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "draft" => Some(ApplicationStatus::Draft),
            "applied" => Some(ApplicationStatus::Applied),
            "screening" => Some(ApplicationStatus::Screening),
            "interviewing" => Some(ApplicationStatus::Interviewing),
            "offer" => Some(ApplicationStatus::Offer),
            "accepted" => Some(ApplicationStatus::Accepted),
            "rejected" => Some(ApplicationStatus::Rejected),
            "withdrawn" => Some(ApplicationStatus::Withdrawn),
            _ => None,
        }
    }
}

impl Default for ApplicationStatus {
    fn default() -> Self {
        ApplicationStatus::Draft
    }
}

impl fmt::Display for ApplicationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A persisted job application, fully decoded.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Application {
    pub id: Uuid,
    pub company: String,
    pub role: String,
    pub url: Option<String>,
    pub status: ApplicationStatus,
    pub job_description: Option<String>,
    pub salary_range: Option<String>,
    pub location: Option<String>,
    pub platform: Option<String>,
    pub contact_name: Option<String>,
    pub contact_email: Option<String>,
    pub notes: Option<String>,
    pub applied_at: Option<DateTime<Utc>>,
    pub next_action: Option<String>,
    pub next_action_date: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<ApplicationRow> for Application {
    type Error = String;

    /// Decode a raw row into the typed record. The only loosely typed column
    /// is `status`; a literal outside the closed set is a storage-layer
    /// decode failure.
    fn try_from(row: ApplicationRow) -> Result<Self, Self::Error> {
        let status = ApplicationStatus::parse(&row.status)
            .ok_or_else(|| format!("row {}: unknown status literal '{}'", row.id, row.status))?;

        Ok(Application {
            id: row.id,
            company: row.company,
            role: row.role,
            url: row.url,
            status,
            job_description: row.job_description,
            salary_range: row.salary_range,
            location: row.location,
            platform: row.platform,
            contact_name: row.contact_name,
            contact_email: row.contact_email,
            notes: row.notes,
            applied_at: row.applied_at,
            next_action: row.next_action,
            next_action_date: row.next_action_date,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

/// Payload accepted when creating an application.
///
/// Only `company` and `role` are required; everything else defaults to
/// null (`status` to `draft`).
#[derive(Debug, Deserialize, Serialize, Validate)]
pub struct CreateApplication {
    #[validate(length(min = 1, message = "Company must not be empty"))]
    pub company: String,
    #[validate(length(min = 1, message = "Role must not be empty"))]
    pub role: String,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub status: ApplicationStatus,
    #[serde(default)]
    pub job_description: Option<String>,
    #[serde(default)]
    pub salary_range: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub platform: Option<String>,
    #[serde(default)]
    pub contact_name: Option<String>,
    #[serde(default)]
    pub contact_email: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub applied_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub next_action: Option<String>,
    #[serde(default)]
    pub next_action_date: Option<NaiveDate>,
}

/// Deserialize `Option<Option<T>>` so that an explicit `null` becomes
/// `Some(None)` while an absent field stays `None` (via `#[serde(default)]`).
fn double_option<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Deserialize::deserialize(deserializer).map(Some)
}

/// Payload accepted when updating an application. Every field is optional;
/// only fields present in the JSON body are written. For nullable columns
/// the outer `Option` tracks presence and the inner one the value, so
/// "set to null" and "leave untouched" stay distinct.
#[derive(Debug, Default, Deserialize, Serialize, Validate)]
pub struct UpdateApplication {
    #[validate(length(min = 1, message = "Company must not be empty"))]
    pub company: Option<String>,
    #[validate(length(min = 1, message = "Role must not be empty"))]
    pub role: Option<String>,
    pub status: Option<ApplicationStatus>,
    #[serde(default, deserialize_with = "double_option")]
    pub url: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub job_description: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub salary_range: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub location: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub platform: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub contact_name: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub contact_email: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub notes: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub applied_at: Option<Option<DateTime<Utc>>>,
    #[serde(default, deserialize_with = "double_option")]
    pub next_action: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub next_action_date: Option<Option<NaiveDate>>,
}

impl UpdateApplication {
    /// True when no field is present, i.e. the update would write nothing.
    pub fn is_empty(&self) -> bool {
        self.company.is_none()
            && self.role.is_none()
            && self.status.is_none()
            && self.url.is_none()
            && self.job_description.is_none()
            && self.salary_range.is_none()
            && self.location.is_none()
            && self.platform.is_none()
            && self.contact_name.is_none()
            && self.contact_email.is_none()
            && self.notes.is_none()
            && self.applied_at.is_none()
            && self.next_action.is_none()
            && self.next_action_date.is_none()
    }
}

/// List filters. Absent fields mean "no filter".
#[derive(Debug, Default, Clone)]
pub struct ApplicationFilters {
    pub status: Option<ApplicationStatus>,
    pub search: Option<String>,
}

/// Columns the list endpoint may order by. The mapping to SQL identifiers
/// is total over this enum, so no caller-supplied string ever reaches the
/// query text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortField {
    Company,
    Role,
    Status,
    AppliedAt,
    CreatedAt,
    UpdatedAt,
}

impl SortField {
    /// Lenient parse: unrecognized values fall back to `created_at`.
    pub fn parse(s: &str) -> Self {
        match s {
            "company" => SortField::Company,
            "role" => SortField::Role,
            "status" => SortField::Status,
            "applied_at" => SortField::AppliedAt,
            "created_at" => SortField::CreatedAt,
            "updated_at" => SortField::UpdatedAt,
            _ => SortField::CreatedAt,
        }
    }

    pub fn as_column(&self) -> &'static str {
        match self {
            SortField::Company => "company",
            SortField::Role => "role",
            SortField::Status => "status",
            SortField::AppliedAt => "applied_at",
            SortField::CreatedAt => "created_at",
            SortField::UpdatedAt => "updated_at",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    /// Lenient parse: anything other than `asc` means `desc`.
    pub fn parse(s: &str) -> Self {
        if s == "asc" {
            SortDirection::Asc
        } else {
            SortDirection::Desc
        }
    }

    pub fn as_sql(&self) -> &'static str {
        match self {
            SortDirection::Asc => "ASC",
            SortDirection::Desc => "DESC",
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct ApplicationSort {
    pub field: SortField,
    pub direction: SortDirection,
}

impl Default for ApplicationSort {
    fn default() -> Self {
        ApplicationSort {
            field: SortField::CreatedAt,
            direction: SortDirection::Desc,
        }
    }
}

/// One page of results plus the total count for the same filter predicate.
#[derive(Debug, Serialize)]
pub struct PaginatedResult<T> {
    pub items: Vec<T>,
    pub total: i64,
    pub page: i64,
    pub page_size: i64,
    pub total_pages: i64,
}

impl<T> PaginatedResult<T> {
    pub fn new(items: Vec<T>, total: i64, page: i64, page_size: i64) -> Self {
        let page_size = page_size.max(1);
        let total_pages = (total + page_size - 1) / page_size;
        PaginatedResult {
            items,
            total,
            page,
            page_size,
            total_pages,
        }
    }
}

/// Dashboard aggregates. Statuses with zero rows are absent from the map.
#[derive(Debug, Serialize)]
pub struct ApplicationStats {
    pub total: i64,
    pub by_status: HashMap<ApplicationStatus, i64>,
}
