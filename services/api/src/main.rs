use anyhow::Result;
use common::error::DatabaseError;
use tracing::info;
use tracing_subscriber::EnvFilter;

mod auth;
mod error;
mod media;
mod models;
mod repositories;
mod routes;
mod state;
mod token;
mod validation;

use crate::media::MediaCodec;
use crate::state::AppState;
use crate::token::{TokenConfig, TokenService};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    info!("Starting Newars content service");

    // Initialize database connection pool
    let db_config = common::database::DatabaseConfig::from_env()?;
    let pool = common::database::init_pool(&db_config).await?;

    // Check database connectivity
    if common::database::health_check(&pool).await? {
        info!("Database connection successful");
    } else {
        anyhow::bail!("Failed to connect to database");
    }

    // Apply schema migrations
    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .map_err(|e| DatabaseError::Migration(e.to_string()))?;
    info!("Database migrations applied");

    // Initialize the session token service
    let token_config = TokenConfig::from_env()?;
    let token_service = TokenService::new(token_config);

    let media_codec = MediaCodec::from_env();

    let app_state = AppState::new(pool, token_service, media_codec);

    // Start the web server
    let app = routes::create_router(app_state);

    let bind_addr = std::env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".to_string());
    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    info!("Content service listening on {}", bind_addr);

    axum::serve(listener, app).await?;

    Ok(())
}
