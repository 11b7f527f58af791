//! Tier pricing resolver
//!
//! Pure quantity-tier selection and quote math. Uses rust_decimal for the
//! arithmetic, f64 at the edges.

use rust_decimal::prelude::*;

use crate::catalog::{PricingTier, Product};

/// Rounding for monetary values (2 decimal places, half-up)
const DECIMAL_PLACES: u32 = 2;

#[inline]
fn to_decimal(value: f64) -> Decimal {
    Decimal::from_f64(value).unwrap_or_default()
}

#[inline]
fn to_f64(value: Decimal) -> f64 {
    value
        .round_dp_with_strategy(DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero)
        .to_f64()
        .unwrap_or_default()
}

/// A resolved price for (product, quantity)
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceQuote {
    pub product_id: String,
    pub quantity: u32,
    pub unit_price: f64,
    pub total_price: f64,
    /// Amount saved versus buying `quantity` at the first tier's price;
    /// zero when quantity is 1
    pub savings: f64,
    /// The tier that produced `unit_price`
    pub tier: PricingTier,
}

/// Clamp a requested quantity to the valid range. Zero, negative, and
/// missing quantities all behave as 1.
pub fn clamp_quantity(quantity: Option<i64>) -> u32 {
    match quantity {
        Some(q) if q >= 1 => u32::try_from(q).unwrap_or(u32::MAX),
        _ => 1,
    }
}

/// Select the tier matching `quantity`.
///
/// Exactly one tier matches any quantity within a well-formed tier list.
/// Quantities below the first tier's minimum, and malformed lists where no
/// tier matches, both resolve to the first tier.
pub fn select_tier(tiers: &[PricingTier], quantity: u32) -> Option<&PricingTier> {
    tiers
        .iter()
        .find(|t| quantity >= t.min && t.max.is_none_or(|max| quantity <= max))
        .or_else(|| tiers.first())
}

/// Build a full quote: unit price, total, and savings against the first tier.
pub fn quote(product: &Product, quantity: Option<i64>) -> PriceQuote {
    let quantity = clamp_quantity(quantity);
    let tier = select_tier(&product.pricing, quantity)
        .cloned()
        .unwrap_or(PricingTier {
            min: 1,
            max: None,
            price: 0.0,
        });

    let unit = to_decimal(tier.price);
    let qty = Decimal::from(quantity);
    let total = unit * qty;

    let savings = if quantity > 1 {
        let first = to_decimal(product.first_tier_price());
        ((first - unit) * qty).max(Decimal::ZERO)
    } else {
        Decimal::ZERO
    };

    PriceQuote {
        product_id: product.id.clone(),
        quantity,
        unit_price: to_f64(unit),
        total_price: to_f64(total),
        savings: to_f64(savings),
        tier,
    }
}
