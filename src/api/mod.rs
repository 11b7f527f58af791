//! API routes for merchkit

pub mod checkout;
pub mod health;
pub mod mockup;
pub mod pricing;
pub mod products;

use axum::Router;
use axum::routing::{get, post};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// Create the application router
pub fn create_router(state: AppState) -> Router {
    let catalog = Router::new()
        .route("/api/products", get(products::list_products))
        .route("/api/products/reload", post(products::reload_catalog))
        .route("/api/products/{id}/boxes", post(products::update_boxes));

    let commerce = Router::new()
        .route("/api/calculate-price", post(pricing::calculate_price))
        .route("/api/calculate-tax", post(checkout::calculate_tax))
        .route("/api/create-checkout", post(checkout::create_checkout));

    let mockups = Router::new()
        .route("/api/products/{id}/mockup", post(mockup::generate_mockup))
        .route("/api/logo-upload-url", post(mockup::logo_upload_url));

    Router::new()
        .route("/health", get(health::health_check))
        .merge(catalog)
        .merge(commerce)
        .merge(mockups)
        // CORS - the storefront frontend is served from another origin
        .layer(CorsLayer::permissive())
        // Trace - request logging at INFO level
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
