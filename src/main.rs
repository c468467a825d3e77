// Ride Auth API server entry point

use std::sync::Arc;
use std::time::Duration;

use ride_auth_api::{
    auth::{PgRevokedTokenStore, TokenService},
    captains::PgCaptainStore,
    config::Config,
    create_router, db,
    users::PgUserStore,
    AppState,
};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    // Load environment variables from .env file
    dotenv::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .with_level(true)
        .init();

    tracing::info!("Ride Auth API - Starting...");

    let config = Config::from_env().expect("Invalid configuration");

    tracing::info!("Connecting to database...");
    let db_pool = db::create_pool(&config.database_url)
        .await
        .expect("Failed to create database pool");

    db::run_migrations(&db_pool)
        .await
        .expect("Failed to run database migrations");

    let state = AppState::new(
        Arc::new(PgUserStore::new(db_pool.clone())),
        Arc::new(PgCaptainStore::new(db_pool.clone())),
        Arc::new(PgRevokedTokenStore::new(db_pool)),
        TokenService::with_duration(&config.jwt_secret, config.token_ttl_secs),
        config.cookie_secure,
    );

    // Sweep expired revocations in the background
    state
        .session
        .clone()
        .spawn_purge_task(Duration::from_secs(config.purge_interval_secs));

    let app = create_router(state);

    let addr = config.bind_addr();
    tracing::info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("Failed to bind to address");

    tracing::info!("Ride Auth API is running on http://{}", addr);
    tracing::info!("Swagger UI available at http://{}/swagger-ui", addr);

    axum::serve(listener, app).await.expect("Server error");
}
