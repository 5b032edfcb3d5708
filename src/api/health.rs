use actix_web::{get, web, HttpResponse, Responder};
use serde::Serialize;
use sqlx::PgPool;
use tracing::error;

#[derive(Serialize)]
struct HealthResponse {
    status: String,
    database: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

/// Health check including database connectivity. Intended for uptime
/// monitors; returns 503 while the database is unreachable.
#[get("/health")]
async fn health_check(pool: web::Data<PgPool>) -> impl Responder {
    match sqlx::query("SELECT 1").fetch_one(pool.get_ref()).await {
        Ok(_) => HttpResponse::Ok().json(HealthResponse {
            status: "healthy".to_string(),
            database: "connected".to_string(),
            error: None,
        }),
        Err(e) => {
            error!("Health check failed: {:?}", e);
            HttpResponse::ServiceUnavailable().json(HealthResponse {
                status: "unhealthy".to_string(),
                database: "disconnected".to_string(),
                error: Some(format!("Database error: {}", e)),
            })
        }
    }
}

/// Process liveness only, no dependency checks.
#[get("/live")]
async fn liveness_check() -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        status: "alive".to_string(),
        database: "not_checked".to_string(),
        error: None,
    })
}

pub fn health_config(config: &mut web::ServiceConfig) {
    config.service(health_check).service(liveness_check);
}
