//! Masquerade API server entry point.

use sqlx::postgres::PgPoolOptions;
use tracing::info;

use masquerade_api::config::AppConfig;
use masquerade_api::error::AppError;
use masquerade_api::state::AppState;
use masquerade_api::{build_router, telemetry};

#[tokio::main]
async fn main() -> Result<(), AppError> {
    let config = AppConfig::from_env()?;
    let telemetry = telemetry::init(&config)?;

    info!("Starting Masquerade API server");

    let pool = PgPoolOptions::new()
        .max_connections(config.database_max_connections)
        .connect(&config.database_url)
        .await?;

    if config.shuffle_seed.is_some() {
        info!("shuffle seed configured; player orders are reproducible");
    }
    let app = build_router(AppState::from_pool(pool, config.shuffle_seed));

    let addr = config.bind_addr()?;
    info!(%addr, "listening");
    let listener = tokio::net::TcpListener::bind(addr).await?;

    axum::serve(listener, app).await?;

    telemetry.shutdown();
    Ok(())
}
