//! Catalog normalizer — raw Airtable records to [`Product`]
//!
//! Upstream rows are hand-maintained, so every field is treated as
//! potentially absent or malformed. Pricing and boxes arrive as JSON-encoded
//! strings inside the row; bad JSON becomes an empty default, never an error.
//! Records that cannot be sold (no identifier, no base image, no usable
//! pricing) are filtered out after normalization.

use serde::Deserialize;
use serde_json::Value;

use super::{PlacementBox, PricingTier, Product};

/// A raw record as returned by the Airtable list endpoint
#[derive(Debug, Clone, Deserialize)]
pub struct RawRecord {
    pub id: String,
    #[serde(default)]
    pub fields: serde_json::Map<String, Value>,
}

impl RawRecord {
    fn str_field(&self, name: &str) -> Option<&str> {
        self.fields.get(name).and_then(Value::as_str)
    }
}

/// Parse a JSON-encoded pricing field. Absent or malformed → empty list.
fn parse_pricing(raw: Option<&str>) -> Vec<PricingTier> {
    raw.and_then(|s| serde_json::from_str::<Vec<PricingTier>>(s).ok())
        .unwrap_or_default()
}

/// Parse a JSON-encoded boxes field. Accepts both the wrapped form
/// `{"boxes": [...]}` and a bare array. Absent or malformed → empty list.
fn parse_boxes(raw: Option<&str>) -> Vec<PlacementBox> {
    let Some(s) = raw else { return Vec::new() };

    #[derive(Deserialize)]
    struct Wrapped {
        #[serde(default)]
        boxes: Vec<PlacementBox>,
    }

    if let Ok(w) = serde_json::from_str::<Wrapped>(s) {
        return w.boxes;
    }
    serde_json::from_str::<Vec<PlacementBox>>(s).unwrap_or_default()
}

/// Normalize a single record. Never fails; missing data becomes defaults.
pub fn normalize_record(record: &RawRecord) -> Product {
    let id = record
        .str_field("product_id")
        .filter(|s| !s.is_empty())
        .unwrap_or(&record.id)
        .to_string();

    Product {
        id,
        name: record.str_field("name").unwrap_or_default().to_string(),
        sku: record.str_field("sku").unwrap_or_default().to_string(),
        description: record
            .str_field("description")
            .unwrap_or_default()
            .to_string(),
        image_file: record
            .str_field("image_file")
            .unwrap_or_default()
            .to_string(),
        pricing: parse_pricing(record.str_field("pricing")),
        boxes: parse_boxes(record.str_field("boxes")),
        preview_url: None,
    }
}

/// A product is sellable when it has an identifier, a base image, and a
/// usable pricing list.
pub fn is_sellable(product: &Product) -> bool {
    !product.id.is_empty() && !product.image_file.is_empty() && !product.pricing.is_empty()
}

/// Normalize a page of records, dropping the unsellable ones.
pub fn normalize_all(records: &[RawRecord]) -> Vec<Product> {
    records
        .iter()
        .map(normalize_record)
        .filter(|p| {
            let keep = is_sellable(p);
            if !keep {
                tracing::debug!(product_id = %p.id, "dropping unsellable catalog record");
            }
            keep
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(fields: Value) -> RawRecord {
        RawRecord {
            id: "recAB12".into(),
            fields: fields.as_object().cloned().unwrap_or_default(),
        }
    }

    #[test]
    fn full_record_normalizes() {
        let rec = record(serde_json::json!({
            "product_id": "tee-classic",
            "name": "Classic Tee",
            "sku": "TEE-001",
            "description": "100% cotton",
            "image_file": "tee-classic.png",
            "pricing": r#"[{"min":1,"max":9,"price":29.99},{"min":10,"price":26.99}]"#,
            "boxes": r#"{"boxes":[{"x":0.3,"y":0.25,"w":0.4,"h":0.3}]}"#,
        }));
        let p = normalize_record(&rec);
        assert_eq!(p.id, "tee-classic");
        assert_eq!(p.pricing.len(), 2);
        assert_eq!(p.pricing[1].max, None);
        assert_eq!(p.boxes.len(), 1);
        assert!(is_sellable(&p));
    }

    #[test]
    fn malformed_json_fields_become_empty_lists() {
        let rec = record(serde_json::json!({
            "product_id": "mug",
            "image_file": "mug.png",
            "pricing": "{not json",
            "boxes": "also not json",
        }));
        let p = normalize_record(&rec);
        assert!(p.pricing.is_empty());
        assert!(p.boxes.is_empty());
    }

    #[test]
    fn absent_fields_become_empty_lists() {
        let rec = record(serde_json::json!({ "image_file": "mug.png" }));
        let p = normalize_record(&rec);
        assert!(p.pricing.is_empty());
        assert!(p.boxes.is_empty());
    }

    #[test]
    fn record_id_backfills_missing_product_id() {
        let rec = record(serde_json::json!({
            "image_file": "pen.png",
            "pricing": r#"[{"min":1,"price":1.99}]"#,
        }));
        assert_eq!(normalize_record(&rec).id, "recAB12");
    }

    #[test]
    fn bare_box_array_is_accepted() {
        let rec = record(serde_json::json!({
            "image_file": "cap.png",
            "boxes": r#"[{"x":0.1,"y":0.1,"w":0.2,"h":0.2}]"#,
        }));
        assert_eq!(normalize_record(&rec).boxes.len(), 1);
    }

    #[test]
    fn filter_drops_unsellable_records() {
        let records = vec![
            record(serde_json::json!({
                "product_id": "good",
                "image_file": "good.png",
                "pricing": r#"[{"min":1,"price":5.0}]"#,
            })),
            // no image
            record(serde_json::json!({
                "product_id": "no-image",
                "pricing": r#"[{"min":1,"price":5.0}]"#,
            })),
            // pricing fails to parse
            record(serde_json::json!({
                "product_id": "bad-pricing",
                "image_file": "x.png",
                "pricing": "nope",
            })),
        ];
        let products = normalize_all(&records);
        assert_eq!(products.len(), 1);
        assert_eq!(products[0].id, "good");
    }
}
