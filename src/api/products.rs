//! Catalog endpoints
//!
//! Listing never fails on upstream trouble (stale cache or static fallback
//! keep the storefront up). Reload and box editing are administrative and do
//! surface upstream failures.

use axum::extract::{Path, Query, State};
use axum::Json;
use serde::Deserialize;

use crate::catalog::airtable::RecordMatch;
use crate::catalog::{PlacementBox, Product};
use crate::error::{ApiResult, AppError};
use crate::state::AppState;
use crate::storage::locator;

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    /// Customer email; when present, previously generated mockups are
    /// attached as preview URLs
    pub email: Option<String>,
}

/// GET /api/products
pub async fn list_products(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Json<Vec<Product>> {
    let mut products = state.catalog.products().await;

    if let Some(email) = query.email.as_deref().filter(|e| !e.is_empty()) {
        attach_previews(&state, email, &mut products).await;
    }

    Json(products)
}

/// Attach per-customer mockup URLs by listing the customer's mockup prefix.
/// Best-effort: a storage failure leaves the catalog without previews.
async fn attach_previews(state: &AppState, email: &str, products: &mut [Product]) {
    let prefix = locator::mockup_prefix(email);
    let keys = match state.store.list_keys(&prefix).await {
        Ok(keys) => keys,
        Err(err) => {
            tracing::warn!(error = %err, "mockup listing failed, serving catalog without previews");
            return;
        }
    };

    for product in products.iter_mut() {
        let key = locator::mockup_key(email, &product.id);
        if keys.contains(&key) {
            product.preview_url = Some(state.store.public_url(&key));
        }
    }
}

#[derive(serde::Serialize)]
pub struct ReloadResponse {
    pub count: usize,
}

/// POST /api/products/reload — force a catalog refresh, surfacing upstream
/// failure instead of falling back
pub async fn reload_catalog(State(state): State<AppState>) -> ApiResult<ReloadResponse> {
    let products = state.catalog.reload().await?;
    Ok(Json(ReloadResponse {
        count: products.len(),
    }))
}

#[derive(Debug, Deserialize)]
pub struct BoxesRequest {
    pub boxes: Vec<PlacementBox>,
}

#[derive(serde::Serialize)]
pub struct BoxesResponse {
    pub product_id: String,
    pub boxes: usize,
}

/// POST /api/products/:id/boxes — replace a product's placement boxes
pub async fn update_boxes(
    State(state): State<AppState>,
    Path(product_id): Path<String>,
    Json(req): Json<BoxesRequest>,
) -> ApiResult<BoxesResponse> {
    if req.boxes.is_empty() {
        return Err(AppError::InvalidInput("boxes must not be empty".into()));
    }
    for b in &req.boxes {
        if !b.is_valid() {
            return Err(AppError::InvalidInput(format!(
                "box x={} y={} w={} h={} is not normalized to [0,1] with positive area",
                b.x, b.y, b.width, b.height
            )));
        }
    }

    let product = state.catalog.find(&product_id).await?;

    let encoded = serde_json::to_string(&serde_json::json!({ "boxes": req.boxes }))
        .map_err(AppError::internal)?;
    let fields = serde_json::json!({ "boxes": encoded });

    // Rows are matched by product id first, by base-image filename second
    let airtable = state.catalog.airtable();
    if let Err(err) = airtable
        .update_fields(RecordMatch::ProductId(&product.id), &fields)
        .await
    {
        tracing::warn!(product_id = %product.id, error = %err, "box write-back by id failed, retrying by image file");
        airtable
            .update_fields(RecordMatch::ImageFile(&product.image_file), &fields)
            .await
            .map_err(|e| AppError::Upstream(format!("box write-back failed: {e}")))?;
    }

    state.catalog.invalidate().await;
    tracing::info!(product_id = %product.id, boxes = req.boxes.len(), "placement boxes updated");

    Ok(Json(BoxesResponse {
        product_id: product.id,
        boxes: req.boxes.len(),
    }))
}
