//! End-to-end tests for the application record store against a real
//! PostgreSQL instance. The suite is a no-op when DATABASE_URL is unset so
//! it can run in environments without a database.
//!
//! Tests share one database and serialize on a global lock; each test starts
//! from an empty `applications` table.

use std::sync::Mutex;

use chrono::{Duration, Utc};
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use uuid::Uuid;

use apptrack::api::application::models::{
    ApplicationFilters, ApplicationSort, ApplicationStatus, CreateApplication, SortDirection,
    SortField, UpdateApplication,
};
use apptrack::api::application::service::{ApplicationService, ServiceError};

static DB_GUARD: Mutex<()> = Mutex::new(());

fn lock() -> std::sync::MutexGuard<'static, ()> {
    DB_GUARD.lock().unwrap_or_else(|e| e.into_inner())
}

async fn connect() -> Option<PgPool> {
    let url = std::env::var("DATABASE_URL").ok()?;
    let pool = PgPoolOptions::new()
        .max_connections(2)
        .connect(&url)
        .await
        .ok()?;
    sqlx::migrate!("./migrations").run(&pool).await.ok()?;
    sqlx::query("DELETE FROM applications")
        .execute(&pool)
        .await
        .ok()?;
    Some(pool)
}

fn input(company: &str, role: &str, status: &str) -> CreateApplication {
    serde_json::from_value(serde_json::json!({
        "company": company,
        "role": role,
        "status": status,
    }))
    .unwrap()
}

#[actix_web::test]
async fn create_draft_applies_defaults_and_round_trips() {
    let _guard = lock();
    let Some(pool) = connect().await else { return };
    let service = ApplicationService::new(pool);

    let created = service
        .create(&input("Acme Corp", "Senior Backend Engineer", "draft"))
        .await
        .unwrap();

    assert_ne!(created.id, Uuid::nil());
    assert_eq!(created.status, ApplicationStatus::Draft);
    assert_eq!(created.applied_at, None);
    assert_eq!(created.url, None);
    assert_eq!(created.created_at, created.updated_at);

    let fetched = service.get_by_id(created.id).await.unwrap();
    assert_eq!(fetched, created);
}

#[actix_web::test]
async fn create_past_draft_autopopulates_applied_at() {
    let _guard = lock();
    let Some(pool) = connect().await else { return };
    let service = ApplicationService::new(pool);

    let created = service
        .create(&input("StartupXYZ", "Full Stack Developer", "applied"))
        .await
        .unwrap();

    let applied_at = created.applied_at.expect("applied_at should be auto-populated");
    assert!(Utc::now() - applied_at < Duration::seconds(60));
}

#[actix_web::test]
async fn update_changes_only_present_fields() {
    let _guard = lock();
    let Some(pool) = connect().await else { return };
    let service = ApplicationService::new(pool);

    let mut data = input("DataFlow", "Platform Engineer", "offer");
    data.url = Some("https://dataflow.io/jobs/101".to_string());
    data.notes = Some("Offer received".to_string());
    let created = service.create(&data).await.unwrap();

    let patch: UpdateApplication =
        serde_json::from_value(serde_json::json!({"notes": "Negotiating on equity"})).unwrap();
    let updated = service.update(created.id, &patch).await.unwrap();

    assert_eq!(updated.notes.as_deref(), Some("Negotiating on equity"));
    assert_eq!(updated.company, created.company);
    assert_eq!(updated.url, created.url);
    assert_eq!(updated.status, created.status);
    assert_eq!(updated.applied_at, created.applied_at);
    assert_eq!(updated.created_at, created.created_at);
    assert!(updated.updated_at >= created.updated_at);

    // An explicit null clears the field; absent fields stay untouched.
    let clear: UpdateApplication =
        serde_json::from_value(serde_json::json!({"url": null})).unwrap();
    let cleared = service.update(created.id, &clear).await.unwrap();
    assert_eq!(cleared.url, None);
    assert_eq!(cleared.notes.as_deref(), Some("Negotiating on equity"));
}

#[actix_web::test]
async fn unknown_id_fails_with_not_found() {
    let _guard = lock();
    let Some(pool) = connect().await else { return };
    let service = ApplicationService::new(pool);

    let missing = Uuid::new_v4();
    match service.get_by_id(missing).await.unwrap_err() {
        ServiceError::NotFound(id) => assert_eq!(id, missing),
        other => panic!("expected NotFound, got {:?}", other),
    }

    let patch: UpdateApplication =
        serde_json::from_value(serde_json::json!({"notes": "hello"})).unwrap();
    match service.update(missing, &patch).await.unwrap_err() {
        ServiceError::NotFound(id) => assert_eq!(id, missing),
        other => panic!("expected NotFound, got {:?}", other),
    }

    match service.remove(missing).await.unwrap_err() {
        ServiceError::NotFound(id) => assert_eq!(id, missing),
        other => panic!("expected NotFound, got {:?}", other),
    }
}

#[actix_web::test]
async fn remove_deletes_the_record() {
    let _guard = lock();
    let Some(pool) = connect().await else { return };
    let service = ApplicationService::new(pool);

    let created = service
        .create(&input("CoolStartup", "Engineering Manager", "draft"))
        .await
        .unwrap();

    service.remove(created.id).await.unwrap();
    assert!(matches!(
        service.get_by_id(created.id).await.unwrap_err(),
        ServiceError::NotFound(_)
    ));
}

#[actix_web::test]
async fn list_filters_by_status_with_total_across_pages() {
    let _guard = lock();
    let Some(pool) = connect().await else { return };
    let service = ApplicationService::new(pool);

    for (company, status) in [
        ("DataFlow", "offer"),
        ("BigTech Inc", "screening"),
        ("DevTools Co", "offer"),
        ("CloudNative Ltd", "withdrawn"),
        ("Acme Corp", "offer"),
    ] {
        service.create(&input(company, "Engineer", status)).await.unwrap();
    }

    let filters = ApplicationFilters {
        status: Some(ApplicationStatus::Offer),
        search: None,
    };
    let page = service
        .get_all(filters, ApplicationSort::default(), 1, 2)
        .await
        .unwrap();

    assert_eq!(page.total, 3);
    assert_eq!(page.items.len(), 2);
    assert_eq!(page.total_pages, 2);
    assert!(page.items.iter().all(|a| a.status == ApplicationStatus::Offer));
}

#[actix_web::test]
async fn search_matches_substring_case_insensitively() {
    let _guard = lock();
    let Some(pool) = connect().await else { return };
    let service = ApplicationService::new(pool);

    service.create(&input("Acme Corp", "Engineer", "draft")).await.unwrap();
    service.create(&input("StartupXYZ", "Acme Whisperer", "draft")).await.unwrap();
    service.create(&input("BigTech Inc", "Engineer", "draft")).await.unwrap();

    let filters = ApplicationFilters {
        status: None,
        search: Some("acme".to_string()),
    };
    let page = service
        .get_all(filters, ApplicationSort::default(), 1, 20)
        .await
        .unwrap();

    // Matches company OR role, case-insensitively.
    assert_eq!(page.total, 2);
}

#[actix_web::test]
async fn pagination_slices_the_sorted_sequence() {
    let _guard = lock();
    let Some(pool) = connect().await else { return };
    let service = ApplicationService::new(pool);

    for company in ["Alfa", "Bravo", "Charlie", "Delta", "Echo", "Foxtrot", "Golf"] {
        service.create(&input(company, "Engineer", "draft")).await.unwrap();
    }

    let sort = ApplicationSort {
        field: SortField::Company,
        direction: SortDirection::Asc,
    };
    let page = service
        .get_all(ApplicationFilters::default(), sort, 2, 2)
        .await
        .unwrap();

    assert_eq!(page.total, 7);
    assert_eq!(page.total_pages, 4);
    let companies: Vec<&str> = page.items.iter().map(|a| a.company.as_str()).collect();
    assert_eq!(companies, vec!["Charlie", "Delta"]);
}

#[actix_web::test]
async fn stats_counts_only_present_statuses() {
    let _guard = lock();
    let Some(pool) = connect().await else { return };
    let service = ApplicationService::new(pool);

    let empty = service.get_stats().await.unwrap();
    assert_eq!(empty.total, 0);
    assert!(empty.by_status.is_empty());

    service.create(&input("Acme Corp", "Engineer", "draft")).await.unwrap();
    service.create(&input("DataFlow", "Engineer", "offer")).await.unwrap();

    let stats = service.get_stats().await.unwrap();
    assert_eq!(stats.total, 2);
    assert_eq!(stats.by_status.get(&ApplicationStatus::Draft), Some(&1));
    assert_eq!(stats.by_status.get(&ApplicationStatus::Offer), Some(&1));
    assert_eq!(stats.by_status.len(), 2);
    assert_eq!(stats.by_status.get(&ApplicationStatus::Rejected), None);
}
