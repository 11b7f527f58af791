//! Price calculation endpoint

use axum::Json;
use axum::extract::State;
use serde::Deserialize;

use crate::error::{ApiResult, AppError};
use crate::pricing::{self, PriceQuote};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceRequest {
    pub product_id: String,
    /// Missing or non-positive quantities behave as 1
    pub quantity: Option<i64>,
}

/// POST /api/calculate-price
pub async fn calculate_price(
    State(state): State<AppState>,
    Json(req): Json<PriceRequest>,
) -> ApiResult<PriceQuote> {
    if req.product_id.is_empty() {
        return Err(AppError::InvalidInput("productId is required".into()));
    }

    let product = state.catalog.find(&req.product_id).await?;
    Ok(Json(pricing::quote(&product, req.quantity)))
}
