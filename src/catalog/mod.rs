//! Product catalog: models, external fetch, normalization, cache
//!
//! The catalog's source of truth is an Airtable table; rows are normalized
//! into [`Product`] and cached for a short TTL. When the upstream is
//! unreachable a static fallback catalog keeps the storefront serving.

pub mod airtable;
pub mod cache;
pub mod fallback;
pub mod normalize;

use serde::{Deserialize, Serialize};

/// A quantity range mapped to a unit price.
///
/// Tiers are stored sorted ascending by `min`; the last tier is open-ended
/// (`max: None`). Prices are currency-agnostic decimals with cents precision.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricingTier {
    /// Minimum quantity (inclusive, >= 1)
    pub min: u32,
    /// Maximum quantity (inclusive); `None` means unbounded
    #[serde(default)]
    pub max: Option<u32>,
    /// Unit price at this tier
    pub price: f64,
}

/// Rectangle describing where a logo is composited onto a base image.
///
/// Coordinates are fractions of the base image dimensions in [0, 1].
/// Absolute pixel coordinates are rejected at the boundary.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlacementBox {
    pub x: f64,
    pub y: f64,
    #[serde(alias = "w")]
    pub width: f64,
    #[serde(alias = "h")]
    pub height: f64,
}

impl PlacementBox {
    /// A box is usable when it lies inside the unit square with positive area.
    pub fn is_valid(&self) -> bool {
        let in_unit = |v: f64| (0.0..=1.0).contains(&v);
        in_unit(self.x)
            && in_unit(self.y)
            && self.width > 0.0
            && self.height > 0.0
            && in_unit(self.x + self.width)
            && in_unit(self.y + self.height)
    }
}

/// A purchasable product. Created externally (Airtable row or fallback
/// entry), read-only within this service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    /// Unique identifier (Airtable row id or fallback slug)
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub sku: String,
    #[serde(default)]
    pub description: String,
    /// Base image filename under the products directory
    pub image_file: String,
    /// Pricing tiers, sorted ascending by `min`, last tier open-ended
    pub pricing: Vec<PricingTier>,
    /// Logo placement boxes; empty means the default centered placement
    #[serde(default)]
    pub boxes: Vec<PlacementBox>,
    /// Public URL of this customer's mockup, when one exists
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preview_url: Option<String>,
}

impl Product {
    pub fn first_tier_price(&self) -> f64 {
        self.pricing.first().map(|t| t.price).unwrap_or(0.0)
    }
}
