use actix_web::{web, App, HttpServer};
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::{filter::LevelFilter, layer::SubscriberExt, util::SubscriberInitExt, Layer};

use apptrack::api::application::{handlers::application_config, ApplicationService};
use apptrack::api::health::health_config;
use apptrack::api::validation;
use apptrack::shutdown::ShutdownCoordinator;
use apptrack::{config, db};

#[derive(Parser)]
#[command(name = "apptrack", about = "Personal job-application tracker service")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Reset the applications table and load the sample data set
    Seed,
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    let cli = Cli::parse();

    // Load configuration from environment
    let config = config::Config::from_env().expect("Failed to load configuration");

    // Create logs directory if it doesn't exist
    std::fs::create_dir_all(&config.log_dir).expect("Failed to create logs directory");

    // File-based logging with daily rotation, plus console output.
    // Log files are created as: logs/info.2026-08-04.log etc.
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "info".into());

    let info_file = tracing_appender::rolling::daily(&config.log_dir, "info.log");
    let error_file = tracing_appender::rolling::daily(&config.log_dir, "error.log");

    let info_layer = tracing_subscriber::fmt::layer()
        .with_writer(info_file)
        .with_ansi(false)
        .with_filter(LevelFilter::INFO);

    let error_layer = tracing_subscriber::fmt::layer()
        .with_writer(error_file)
        .with_ansi(false)
        .with_filter(LevelFilter::ERROR);

    let console_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stdout)
        .with_ansi(true);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(console_layer)
        .with(info_layer)
        .with(error_layer)
        .init();

    // Get database connection pool
    let pool = db::connection::get_connection(&config.database_url, config.max_db_connections)
        .await
        .expect("Failed to connect to database");

    // Run migrations on startup
    db::migrations::run_migrations(&pool)
        .await
        .expect("Failed to run database migrations");

    if let Some(Command::Seed) = cli.command {
        db::seed::run(&pool).await.expect("Failed to seed database");
        pool.close().await;
        return Ok(());
    }

    info!("Starting apptrack service");
    info!("  - Bind address: {}:{}", config.http_host, config.http_port);
    info!("  - Max database connections: {}", config.max_db_connections);
    info!("  - Max payload size: {} bytes", config.max_payload_size);

    // Clone pool for the HTTP server (original is kept for shutdown)
    let server_pool = pool.clone();
    let max_payload_size = config.max_payload_size;

    let server = HttpServer::new(move || {
        // One record store per worker, sharing the pool by constructor injection
        let application_service = web::Data::new(ApplicationService::new(server_pool.clone()));

        let payload_config = web::PayloadConfig::default().limit(max_payload_size);

        App::new()
            .app_data(web::Data::new(server_pool.clone()))
            .app_data(application_service)
            .app_data(payload_config)
            .app_data(validation::json_config())
            .app_data(validation::query_config())
            .configure(health_config)
            .configure(application_config)
    });

    let server = server
        .bind((config.http_host.as_str(), config.http_port))?
        .run();

    info!(
        "Server listening on http://{}:{}",
        config.http_host, config.http_port
    );

    let server_handle = server.handle();
    let server_task = tokio::spawn(server);

    let coordinator = ShutdownCoordinator::new(server_handle, server_task, pool);
    coordinator.wait_for_shutdown().await
}
