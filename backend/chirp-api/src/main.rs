use actix_cors::Cors;
use actix_web::{middleware::Logger, web, App, HttpServer};
use anyhow::{Context, Result};
use sqlx::postgres::PgPoolOptions;
use std::time::Duration;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use chirp_api::routes::configure_routes;
use chirp_api::security::jwt;
use chirp_api::services::{FeedService, FollowService, InteractionService, NotificationService};
use chirp_api::Config;

#[actix_web::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,actix_web=debug,sqlx=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = Config::from_env()
        .map_err(anyhow::Error::msg)
        .context("Failed to load configuration")?;

    info!("Starting chirp-api v{}", env!("CARGO_PKG_VERSION"));
    info!("Environment: {}", config.app.env);

    jwt::initialize_keys(&config.auth.jwt_secret).context("Failed to initialize JWT keys")?;

    // Initialize database pool
    let pool = PgPoolOptions::new()
        .max_connections(config.database.max_connections)
        .acquire_timeout(Duration::from_secs(10))
        .idle_timeout(Duration::from_secs(600))
        .connect(&config.database.url)
        .await
        .context("Failed to connect to database")?;

    // Verify database connection
    sqlx::query("SELECT 1")
        .execute(&pool)
        .await
        .context("Failed to verify database connection")?;
    info!("Database pool created and verified");

    // Run database migrations
    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .context("Failed to run database migrations")?;
    info!("Database migrations completed");

    let follow_service = web::Data::new(FollowService::new(pool.clone()));
    let interaction_service = web::Data::new(InteractionService::new(pool.clone()));
    let feed_service = web::Data::new(FeedService::new(
        pool.clone(),
        config.feed.strict_date_filter,
    ));
    let notification_service = web::Data::new(NotificationService::new(pool.clone()));
    let pool_data = web::Data::new(pool);

    let bind_address = format!("{}:{}", config.app.host, config.app.port);
    info!("Starting HTTP server at {}", bind_address);

    let allowed_origins = config.cors.allowed_origins.clone();

    HttpServer::new(move || {
        // Build CORS configuration from the comma-separated origin list
        let mut cors = Cors::default();
        for origin in allowed_origins.split(',') {
            let origin = origin.trim();
            if origin == "*" {
                cors = cors.allow_any_origin();
            } else {
                cors = cors.allowed_origin(origin);
            }
        }
        cors = cors.allow_any_method().allow_any_header().max_age(3600);

        App::new()
            .app_data(pool_data.clone())
            .app_data(follow_service.clone())
            .app_data(interaction_service.clone())
            .app_data(feed_service.clone())
            .app_data(notification_service.clone())
            .wrap(cors)
            .wrap(Logger::default())
            .wrap(tracing_actix_web::TracingLogger::default())
            .configure(configure_routes)
    })
    .bind(&bind_address)
    .context("Failed to bind HTTP server")?
    .workers(4)
    .run()
    .await
    .context("HTTP server error")?;

    info!("chirp-api shutting down");
    Ok(())
}
