//! Checkout and tax endpoints
//!
//! Thin assembly layer: unit prices come from the tier resolver, shipping
//! from the rate table, and everything else (tax, payment session lifecycle)
//! is delegated to Stripe. Responsibility ends at a well-formed request
//! payload and relaying Stripe's response or error.

use axum::Json;
use axum::extract::State;
use rust_decimal::prelude::*;
use serde::{Deserialize, Serialize};

use crate::error::{ApiResult, AppError};
use crate::pricing;
use crate::shipping;
use crate::state::AppState;
use crate::stripe::{self, CheckoutRequest, LineItem, TaxCalculation};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
    pub product_id: String,
    pub quantity: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct CustomerInfo {
    pub email: String,
    #[serde(default)]
    pub name: String,
    /// Destination country (ISO 3166-1 alpha-2); defaults to domestic
    pub country: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutBody {
    pub customer: CustomerInfo,
    pub items: Vec<CartItem>,
    pub success_url: Option<String>,
    pub cancel_url: Option<String>,
}

#[derive(Serialize)]
pub struct CheckoutResponse {
    pub url: String,
}

/// Dollars to integer cents, rounded half-up
fn to_cents(amount: f64) -> i64 {
    Decimal::from_f64(amount)
        .unwrap_or_default()
        .checked_mul(Decimal::ONE_HUNDRED)
        .unwrap_or_default()
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .to_i64()
        .unwrap_or_default()
}

/// Resolve a cart into Stripe line items with tier-priced unit amounts
async fn build_line_items(state: &AppState, items: &[CartItem]) -> Result<Vec<LineItem>, AppError> {
    if items.is_empty() {
        return Err(AppError::InvalidInput("cart must not be empty".into()));
    }

    let mut line_items = Vec::with_capacity(items.len());
    for item in items {
        if item.product_id.is_empty() {
            return Err(AppError::InvalidInput("cart item missing productId".into()));
        }
        let product = state.catalog.find(&item.product_id).await?;
        let quote = pricing::quote(&product, item.quantity);

        line_items.push(LineItem {
            name: product.name.clone(),
            description: product.description.clone(),
            image_url: Some(format!(
                "{}/products/{}",
                state.public_base_url, product.image_file
            )),
            unit_amount: to_cents(quote.unit_price),
            quantity: quote.quantity,
        });
    }
    Ok(line_items)
}

fn subtotal_cents(items: &[LineItem]) -> i64 {
    items
        .iter()
        .map(|i| i.unit_amount * i64::from(i.quantity))
        .sum()
}

/// POST /api/create-checkout
pub async fn create_checkout(
    State(state): State<AppState>,
    Json(body): Json<CheckoutBody>,
) -> ApiResult<CheckoutResponse> {
    if body.customer.email.is_empty() {
        return Err(AppError::InvalidInput("customer email is required".into()));
    }

    let line_items = build_line_items(&state, &body.items).await?;
    let subtotal = subtotal_cents(&line_items);

    let country = body
        .customer
        .country
        .clone()
        .unwrap_or_else(|| state.domestic_country.clone());
    let shipping_options = shipping::options_for(&country, subtotal, &state.domestic_country);

    let req = CheckoutRequest {
        customer_email: body.customer.email.clone(),
        line_items,
        shipping_options,
        allowed_countries: state.allowed_countries.clone(),
        success_url: body
            .success_url
            .unwrap_or_else(|| format!("{}/checkout/success", state.public_base_url)),
        cancel_url: body
            .cancel_url
            .unwrap_or_else(|| format!("{}/checkout/cancel", state.public_base_url)),
    };

    let url = stripe::create_checkout_session(&state.http, &state.stripe_secret_key, &req)
        .await
        .map_err(|e| AppError::Upstream(format!("checkout session failed: {e}")))?;

    tracing::info!(
        customer = %body.customer.email,
        name = %body.customer.name,
        subtotal_cents = subtotal,
        items = body.items.len(),
        "checkout session created"
    );

    Ok(Json(CheckoutResponse { url }))
}

#[derive(Debug, Deserialize)]
pub struct TaxBody {
    pub zip: String,
    pub items: Vec<CartItem>,
}

/// POST /api/calculate-tax
pub async fn calculate_tax(
    State(state): State<AppState>,
    Json(body): Json<TaxBody>,
) -> ApiResult<TaxCalculation> {
    if body.zip.is_empty() {
        return Err(AppError::InvalidInput("zip is required".into()));
    }

    let line_items = build_line_items(&state, &body.items).await?;

    let calc = stripe::create_tax_calculation(
        &state.http,
        &state.stripe_secret_key,
        &state.domestic_country,
        &body.zip,
        &line_items,
    )
    .await
    .map_err(|e| AppError::Upstream(format!("tax calculation failed: {e}")))?;

    Ok(Json(calc))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cents_conversion_is_exact_for_prices() {
        assert_eq!(to_cents(29.99), 2999);
        assert_eq!(to_cents(95.00), 9500);
        assert_eq!(to_cents(450.00), 45000);
        assert_eq!(to_cents(0.0), 0);
    }

    #[test]
    fn subtotal_sums_line_totals() {
        let items = vec![
            LineItem {
                name: "Tee".into(),
                description: String::new(),
                image_url: None,
                unit_amount: 2999,
                quantity: 2,
            },
            LineItem {
                name: "Mug".into(),
                description: String::new(),
                image_url: None,
                unit_amount: 1499,
                quantity: 1,
            },
        ];
        assert_eq!(subtotal_cents(&items), 7497);
    }
}
