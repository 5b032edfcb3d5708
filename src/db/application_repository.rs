use chrono::{DateTime, Utc};
use sqlx::PgPool;
use tracing::debug;
use uuid::Uuid;

use crate::api::application::models::{ApplicationSort, CreateApplication, UpdateApplication};
use crate::db::models::{ApplicationRow, APPLICATION_COLUMNS};

/// Filter predicate shared by the list and count queries so both are always
/// computed from the same condition. `$1` is the optional status literal,
/// `$2` the optional ILIKE pattern over company OR role.
const FILTER_PREDICATE: &str = "($1::text IS NULL OR status = $1) \
     AND ($2::text IS NULL OR company ILIKE $2 OR role ILIKE $2)";

fn like_pattern(search: Option<&str>) -> Option<String> {
    search.map(|term| format!("%{}%", term))
}

/// Repository for all SQL against the `applications` relation. Filter values
/// are always bound parameters; the only interpolated identifiers are the
/// sort column and direction, which come from closed enums.
pub struct ApplicationRepository;

impl ApplicationRepository {
    /// Count rows matching the filter, ignoring pagination.
    pub async fn count(
        pool: &PgPool,
        status: Option<&str>,
        search: Option<&str>,
    ) -> Result<i64, sqlx::Error> {
        let sql = format!("SELECT count(*) FROM applications WHERE {}", FILTER_PREDICATE);

        sqlx::query_scalar(&sql)
            .bind(status)
            .bind(like_pattern(search))
            .fetch_one(pool)
            .await
    }

    /// Fetch one page of rows matching the filter.
    pub async fn list(
        pool: &PgPool,
        status: Option<&str>,
        search: Option<&str>,
        sort: ApplicationSort,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<ApplicationRow>, sqlx::Error> {
        let sql = format!(
            "SELECT {} FROM applications WHERE {} ORDER BY {} {} LIMIT $3 OFFSET $4",
            APPLICATION_COLUMNS,
            FILTER_PREDICATE,
            sort.field.as_column(),
            sort.direction.as_sql()
        );

        debug!(
            "Listing applications: status={:?}, search={:?}, order={} {}",
            status,
            search,
            sort.field.as_column(),
            sort.direction.as_sql()
        );

        sqlx::query_as::<_, ApplicationRow>(&sql)
            .bind(status)
            .bind(like_pattern(search))
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<ApplicationRow>, sqlx::Error> {
        let sql = format!(
            "SELECT {} FROM applications WHERE id = $1",
            APPLICATION_COLUMNS
        );

        sqlx::query_as::<_, ApplicationRow>(&sql)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn exists(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
        let found: Option<i32> = sqlx::query_scalar("SELECT 1 FROM applications WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await?;

        Ok(found.is_some())
    }

    /// Insert a new application and return the persisted row. `id`,
    /// `created_at` and `updated_at` are generated by the database;
    /// `applied_at` is passed separately because the service resolves its
    /// auto-population rule before the insert.
    pub async fn insert(
        pool: &PgPool,
        data: &CreateApplication,
        applied_at: Option<DateTime<Utc>>,
    ) -> Result<ApplicationRow, sqlx::Error> {
        debug!("Inserting application: company={}, role={}", data.company, data.role);

        let sql = format!(
            "INSERT INTO applications (company, role, url, status, job_description, \
             salary_range, location, platform, contact_name, contact_email, notes, \
             applied_at, next_action, next_action_date) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14) \
             RETURNING {}",
            APPLICATION_COLUMNS
        );

        let row = sqlx::query_as::<_, ApplicationRow>(&sql)
            .bind(&data.company)
            .bind(&data.role)
            .bind(&data.url)
            .bind(data.status.as_str())
            .bind(&data.job_description)
            .bind(&data.salary_range)
            .bind(&data.location)
            .bind(&data.platform)
            .bind(&data.contact_name)
            .bind(&data.contact_email)
            .bind(&data.notes)
            .bind(applied_at)
            .bind(&data.next_action)
            .bind(data.next_action_date)
            .fetch_one(pool)
            .await?;

        debug!("Application inserted with id={}", row.id);
        Ok(row)
    }

    /// Apply a partial update and return the refreshed row. The caller must
    /// ensure at least one field is present. A concurrent delete between the
    /// caller's existence check and this statement surfaces as
    /// `sqlx::Error::RowNotFound`.
    pub async fn update(
        pool: &PgPool,
        id: Uuid,
        data: &UpdateApplication,
    ) -> Result<ApplicationRow, sqlx::Error> {
        let sql = build_update_sql(data);
        debug!("Updating application {}: {}", id, sql);

        // Bind order must mirror the column order in update_columns.
        let mut query = sqlx::query_as::<_, ApplicationRow>(&sql);
        if let Some(v) = &data.company {
            query = query.bind(v);
        }
        if let Some(v) = &data.role {
            query = query.bind(v);
        }
        if let Some(v) = data.status {
            query = query.bind(v.as_str());
        }
        if let Some(v) = &data.url {
            query = query.bind(v.as_deref());
        }
        if let Some(v) = &data.job_description {
            query = query.bind(v.as_deref());
        }
        if let Some(v) = &data.salary_range {
            query = query.bind(v.as_deref());
        }
        if let Some(v) = &data.location {
            query = query.bind(v.as_deref());
        }
        if let Some(v) = &data.platform {
            query = query.bind(v.as_deref());
        }
        if let Some(v) = &data.contact_name {
            query = query.bind(v.as_deref());
        }
        if let Some(v) = &data.contact_email {
            query = query.bind(v.as_deref());
        }
        if let Some(v) = &data.notes {
            query = query.bind(v.as_deref());
        }
        if let Some(v) = data.applied_at {
            query = query.bind(v);
        }
        if let Some(v) = &data.next_action {
            query = query.bind(v.as_deref());
        }
        if let Some(v) = data.next_action_date {
            query = query.bind(v);
        }

        query.bind(id).fetch_one(pool).await
    }

    /// Hard delete. Returns the number of rows removed (0 or 1).
    pub async fn delete(pool: &PgPool, id: Uuid) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM applications WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected())
    }

    pub async fn count_all(pool: &PgPool) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar("SELECT count(*) FROM applications")
            .fetch_one(pool)
            .await
    }

    /// Per-status counts. Statuses without rows simply do not appear.
    pub async fn count_by_status(pool: &PgPool) -> Result<Vec<(String, i64)>, sqlx::Error> {
        sqlx::query_as("SELECT status, count(*) FROM applications GROUP BY status")
            .fetch_all(pool)
            .await
    }
}

/// Columns present in the update payload, in the canonical bind order.
fn update_columns(data: &UpdateApplication) -> Vec<&'static str> {
    let mut cols = Vec::new();
    if data.company.is_some() {
        cols.push("company");
    }
    if data.role.is_some() {
        cols.push("role");
    }
    if data.status.is_some() {
        cols.push("status");
    }
    if data.url.is_some() {
        cols.push("url");
    }
    if data.job_description.is_some() {
        cols.push("job_description");
    }
    if data.salary_range.is_some() {
        cols.push("salary_range");
    }
    if data.location.is_some() {
        cols.push("location");
    }
    if data.platform.is_some() {
        cols.push("platform");
    }
    if data.contact_name.is_some() {
        cols.push("contact_name");
    }
    if data.contact_email.is_some() {
        cols.push("contact_email");
    }
    if data.notes.is_some() {
        cols.push("notes");
    }
    if data.applied_at.is_some() {
        cols.push("applied_at");
    }
    if data.next_action.is_some() {
        cols.push("next_action");
    }
    if data.next_action_date.is_some() {
        cols.push("next_action_date");
    }
    cols
}

/// Build the partial UPDATE statement with numbered placeholders for every
/// present field, always refreshing `updated_at`.
fn build_update_sql(data: &UpdateApplication) -> String {
    let cols = update_columns(data);
    debug_assert!(!cols.is_empty(), "update with no settable fields");

    let sets: Vec<String> = cols
        .iter()
        .enumerate()
        .map(|(i, col)| format!("{} = ${}", col, i + 1))
        .collect();

    format!(
        "UPDATE applications SET {}, updated_at = now() WHERE id = ${} RETURNING {}",
        sets.join(", "),
        cols.len() + 1,
        APPLICATION_COLUMNS
    )
}
