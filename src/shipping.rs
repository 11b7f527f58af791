//! Shipping options by destination country and cart subtotal
//!
//! All amounts are integer minor currency units (cents).

use serde::Serialize;

/// Domestic orders ship free at or above this subtotal (cents)
pub const FREE_SHIPPING_THRESHOLD: i64 = 10_000;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ShippingOption {
    pub display_name: &'static str,
    /// Fixed amount in cents
    pub amount: i64,
    /// Delivery estimate in business days (min, max)
    pub delivery_estimate: (u32, u32),
}

/// Build the shipping options for a destination.
///
/// Domestic under $100: $10 standard / $25 express. Domestic at or above
/// $100: free standard / $25 express. Everywhere else: $25 / $50.
pub fn options_for(country: &str, subtotal_cents: i64, domestic_country: &str) -> Vec<ShippingOption> {
    let domestic = country.eq_ignore_ascii_case(domestic_country);

    let (standard, express) = if domestic {
        if subtotal_cents >= FREE_SHIPPING_THRESHOLD {
            (0, 2_500)
        } else {
            (1_000, 2_500)
        }
    } else {
        (2_500, 5_000)
    };

    vec![
        ShippingOption {
            display_name: "Standard shipping",
            amount: standard,
            delivery_estimate: (5, 7),
        },
        ShippingOption {
            display_name: "Express shipping",
            amount: express,
            delivery_estimate: (1, 3),
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn domestic_under_threshold_pays_standard() {
        let opts = options_for("US", 9_500, "US");
        assert_eq!(opts[0].amount, 1_000);
        assert_eq!(opts[1].amount, 2_500);
    }

    #[test]
    fn domestic_at_threshold_ships_free() {
        let opts = options_for("US", 15_000, "US");
        assert_eq!(opts[0].amount, 0);
        assert_eq!(opts[1].amount, 2_500);
    }

    #[test]
    fn threshold_is_inclusive() {
        assert_eq!(options_for("US", 10_000, "US")[0].amount, 0);
        assert_eq!(options_for("US", 9_999, "US")[0].amount, 1_000);
    }

    #[test]
    fn international_pays_flat_rates_regardless_of_subtotal() {
        for subtotal in [500, 10_000, 1_000_000] {
            let opts = options_for("CA", subtotal, "US");
            assert_eq!(opts[0].amount, 2_500);
            assert_eq!(opts[1].amount, 5_000);
        }
    }

    #[test]
    fn country_match_is_case_insensitive() {
        assert_eq!(options_for("us", 20_000, "US")[0].amount, 0);
    }
}
