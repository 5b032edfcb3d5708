use std::collections::HashMap;
use std::fmt;

use actix_web::{HttpResponse, ResponseError};
use chrono::Utc;
use sqlx::PgPool;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::api::validation::ErrorResponse;
use crate::db::application_repository::ApplicationRepository;

use super::models::{
    Application, ApplicationFilters, ApplicationSort, ApplicationStats, ApplicationStatus,
    CreateApplication, PaginatedResult, UpdateApplication,
};

/// Service-level errors for the application record store.
#[derive(Debug)]
pub enum ServiceError {
    /// Query or connection failure in the storage layer.
    Database(sqlx::Error),

    /// A returned row did not conform to the record shape. Treated as a
    /// storage failure, not a validation failure.
    Decode(String),

    /// Domain-level rejection of the input.
    Validation(String),

    /// No application with the given id.
    NotFound(Uuid),
}

impl fmt::Display for ServiceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ServiceError::Database(e) => write!(f, "Database error: {}", e),
            ServiceError::Decode(msg) => write!(f, "Decode error: {}", msg),
            ServiceError::Validation(msg) => write!(f, "Validation error: {}", msg),
            ServiceError::NotFound(id) => write!(f, "Application not found: {}", id),
        }
    }
}

impl std::error::Error for ServiceError {}

impl ResponseError for ServiceError {
    fn error_response(&self) -> HttpResponse {
        match self {
            ServiceError::Database(e) => {
                error!("Database error: {}", e);
                HttpResponse::InternalServerError().json(ErrorResponse {
                    error: "Failed to process request".to_string(),
                    fields: serde_json::json!({"message": "Storage error occurred"}),
                })
            }
            ServiceError::Decode(msg) => {
                error!("Row decode error: {}", msg);
                HttpResponse::InternalServerError().json(ErrorResponse {
                    error: "Failed to process request".to_string(),
                    fields: serde_json::json!({"message": "Storage error occurred"}),
                })
            }
            ServiceError::Validation(msg) => {
                warn!("Validation error: {}", msg);
                HttpResponse::BadRequest().json(ErrorResponse {
                    error: "Validation failed".to_string(),
                    fields: serde_json::json!({"message": msg}),
                })
            }
            ServiceError::NotFound(id) => {
                warn!("Application not found: {}", id);
                HttpResponse::NotFound().json(ErrorResponse {
                    error: "Not found".to_string(),
                    fields: serde_json::json!({
                        "message": format!("Application with id {} not found", id)
                    }),
                })
            }
        }
    }
}

/// Decide the effective `applied_at` for a new record: auto-populate to now
/// when the record is created past `draft` without an explicit value. Never
/// applied on update.
fn resolve_applied_at(data: &CreateApplication) -> Option<chrono::DateTime<Utc>> {
    match (data.status, data.applied_at) {
        (ApplicationStatus::Draft, given) => given,
        (_, Some(given)) => Some(given),
        (_, None) => Some(Utc::now()),
    }
}

/// Single point of access to persisted application records. Holds the
/// connection pool by constructor injection; every call round-trips to
/// storage, no caching.
pub struct ApplicationService {
    pool: PgPool,
}

impl ApplicationService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// List applications matching the filters, sorted and paginated. The
    /// total count is computed from the same predicate as the page slice.
    pub async fn get_all(
        &self,
        filters: ApplicationFilters,
        sort: ApplicationSort,
        page: i64,
        page_size: i64,
    ) -> Result<PaginatedResult<Application>, ServiceError> {
        let page = page.max(1);
        let page_size = page_size.max(1);

        let status = filters.status.map(|s| s.as_str());
        let search = filters.search.as_deref();

        let total = ApplicationRepository::count(&self.pool, status, search)
            .await
            .map_err(ServiceError::Database)?;

        let rows = ApplicationRepository::list(
            &self.pool,
            status,
            search,
            sort,
            page_size,
            (page - 1) * page_size,
        )
        .await
        .map_err(ServiceError::Database)?;

        let items = rows
            .into_iter()
            .map(|row| Application::try_from(row).map_err(ServiceError::Decode))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(PaginatedResult::new(items, total, page, page_size))
    }

    pub async fn get_by_id(&self, id: Uuid) -> Result<Application, ServiceError> {
        let row = ApplicationRepository::find_by_id(&self.pool, id)
            .await
            .map_err(ServiceError::Database)?
            .ok_or(ServiceError::NotFound(id))?;

        Application::try_from(row).map_err(ServiceError::Decode)
    }

    /// Create an application and return the full persisted record including
    /// the generated id and timestamps.
    pub async fn create(&self, data: &CreateApplication) -> Result<Application, ServiceError> {
        info!("Creating application: company={}, role={}", data.company, data.role);

        let applied_at = resolve_applied_at(data);

        let row = ApplicationRepository::insert(&self.pool, data, applied_at)
            .await
            .map_err(ServiceError::Database)?;

        info!("Application created with id={}", row.id);
        Application::try_from(row).map_err(ServiceError::Decode)
    }

    /// Presence-aware partial update. Only fields present in `data` are
    /// written; `updated_at` is always refreshed.
    ///
    /// The existence check and the update are two statements. A concurrent
    /// delete in between surfaces as a storage failure rather than a clean
    /// `NotFound`; acceptable for a single-user tool.
    pub async fn update(
        &self,
        id: Uuid,
        data: &UpdateApplication,
    ) -> Result<Application, ServiceError> {
        if data.is_empty() {
            return Err(ServiceError::Validation("No fields to update".to_string()));
        }

        let exists = ApplicationRepository::exists(&self.pool, id)
            .await
            .map_err(ServiceError::Database)?;
        if !exists {
            return Err(ServiceError::NotFound(id));
        }

        let row = ApplicationRepository::update(&self.pool, id, data)
            .await
            .map_err(ServiceError::Database)?;

        info!("Application {} updated", id);
        Application::try_from(row).map_err(ServiceError::Decode)
    }

    /// Hard delete.
    pub async fn remove(&self, id: Uuid) -> Result<(), ServiceError> {
        let removed = ApplicationRepository::delete(&self.pool, id)
            .await
            .map_err(ServiceError::Database)?;

        if removed == 0 {
            return Err(ServiceError::NotFound(id));
        }

        info!("Application {} deleted", id);
        Ok(())
    }

    /// Aggregate counts for the dashboard.
    pub async fn get_stats(&self) -> Result<ApplicationStats, ServiceError> {
        let total = ApplicationRepository::count_all(&self.pool)
            .await
            .map_err(ServiceError::Database)?;

        let counts = ApplicationRepository::count_by_status(&self.pool)
            .await
            .map_err(ServiceError::Database)?;

        let mut by_status = HashMap::new();
        for (status, count) in counts {
            let status = ApplicationStatus::parse(&status)
                .ok_or_else(|| ServiceError::Decode(format!("unknown status literal '{}'", status)))?;
            by_status.insert(status, count);
        }

        Ok(ApplicationStats { total, by_status })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn create_input(status: ApplicationStatus) -> CreateApplication {
        serde_json::from_value(serde_json::json!({
            "company": "Acme Corp",
            "role": "Engineer",
            "status": status.as_str(),
        }))
        .unwrap()
    }

    #[test]
    fn applied_at_left_null_for_draft() {
        let input = create_input(ApplicationStatus::Draft);
        assert_eq!(resolve_applied_at(&input), None);
    }

    #[test]
    fn applied_at_autopopulated_past_draft() {
        let input = create_input(ApplicationStatus::Applied);
        let before = Utc::now();
        let resolved = resolve_applied_at(&input).unwrap();
        assert!(resolved >= before && resolved <= Utc::now());
    }

    #[test]
    fn applied_at_explicit_value_wins() {
        let explicit = Utc.with_ymd_and_hms(2026, 2, 10, 0, 0, 0).unwrap();
        let mut input = create_input(ApplicationStatus::Interviewing);
        input.applied_at = Some(explicit);
        assert_eq!(resolve_applied_at(&input), Some(explicit));

        let mut draft = create_input(ApplicationStatus::Draft);
        draft.applied_at = Some(explicit);
        assert_eq!(resolve_applied_at(&draft), Some(explicit));
    }

    #[test]
    fn error_responses_map_to_expected_statuses() {
        use actix_web::http::StatusCode;

        let not_found = ServiceError::NotFound(Uuid::nil());
        assert_eq!(not_found.error_response().status(), StatusCode::NOT_FOUND);

        let validation = ServiceError::Validation("No fields to update".to_string());
        assert_eq!(validation.error_response().status(), StatusCode::BAD_REQUEST);

        let decode = ServiceError::Decode("bad row".to_string());
        assert_eq!(
            decode.error_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );

        let database = ServiceError::Database(sqlx::Error::RowNotFound);
        assert_eq!(
            database.error_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn not_found_display_carries_id() {
        let id = Uuid::nil();
        let err = ServiceError::NotFound(id);
        assert!(err.to_string().contains(&id.to_string()));
    }

    #[actix_web::test]
    async fn empty_update_rejected_before_touching_storage() {
        // A lazy pool never connects; reaching the database would error with
        // a connection failure instead of the expected validation error.
        let pool = sqlx::postgres::PgPoolOptions::new()
            .connect_lazy("postgresql://localhost/unreachable")
            .unwrap();
        let service = ApplicationService::new(pool);

        let err = service
            .update(Uuid::nil(), &UpdateApplication::default())
            .await
            .unwrap_err();

        match err {
            ServiceError::Validation(msg) => assert_eq!(msg, "No fields to update"),
            other => panic!("expected validation error, got {:?}", other),
        }
    }
}
