use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;

/// Column list shared by every query that returns full rows, kept in one
/// place so `ApplicationRow` and the SQL cannot drift apart.
pub const APPLICATION_COLUMNS: &str = "id, company, role, url, status, job_description, \
     salary_range, location, platform, contact_name, contact_email, notes, \
     applied_at, next_action, next_action_date, created_at, updated_at";

/// Raw database representation of an application.
///
/// `status` stays loosely typed here; decoding it into the closed enum
/// happens at the service boundary so a bad literal surfaces as a decode
/// failure rather than a silently dropped row.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ApplicationRow {
    pub id: Uuid,
    pub company: String,
    pub role: String,
    pub url: Option<String>,
    pub status: String,
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
