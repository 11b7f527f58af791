//! merchkit — storefront backend
//!
//! Long-running service that:
//! - Serves the product catalog (Airtable-backed, cached, with a static fallback)
//! - Resolves quantity-tier pricing for quotes and carts
//! - Composites customer logos onto product images and stores the mockups in S3
//! - Opens hosted Stripe checkout sessions with tax and shipping

mod api;
mod catalog;
mod config;
mod error;
mod mockup;
mod pricing;
mod shipping;
mod state;
mod storage;
mod stripe;

use config::Config;
use error::BoxError;
use state::AppState;

#[tokio::main]
async fn main() -> Result<(), BoxError> {
    // Load .env file
    let _ = dotenvy::dotenv();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "merchkit=info,tower_http=info".into()),
        )
        .init();

    let config = Config::from_env()?;

    tracing::info!("Starting merchkit (env: {})", config.environment);

    let state = AppState::new(&config).await?;
    let app = api::create_router(state);

    let addr = format!("0.0.0.0:{}", config.http_port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("merchkit HTTP listening on {addr}");

    axum::serve(listener, app).await?;

    Ok(())
}
