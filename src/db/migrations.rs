use sqlx::PgPool;
use tracing::info;

/// Apply all pending migrations from the embedded `migrations/` directory.
///
/// Safe to run on every startup; sqlx records which migrations have already
/// been applied.
pub async fn run_migrations(pool: &PgPool) -> Result<(), sqlx::migrate::MigrateError> {
    info!("Running database migrations");

    sqlx::migrate!("./migrations").run(pool).await?;

    info!("Database migrations up to date");
    Ok(())
}
