//! Sweet Shop API server entry point.

use tracing::info;

use sweet_api::auth::JwtManager;
use sweet_api::config::ApiConfig;
use sweet_api::{build_router, AppState};
use sweet_db::{Database, DbConfig};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "sweet_api=debug,sweet_db=debug".into()),
        )
        .init();

    let config = ApiConfig::load()?;

    info!(port = config.port, db = %config.database_path, "Starting Sweet Shop API");

    let db = Database::new(
        DbConfig::new(&config.database_path).max_connections(config.db_max_connections),
    )
    .await?;

    let jwt = JwtManager::new(config.jwt_secret.clone(), config.jwt_lifetime_secs);
    let state = AppState::new(db, jwt);

    let app = build_router(state);

    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    info!(%addr, "Listening");

    axum::serve(listener, app).await?;

    Ok(())
}
