//! Static fallback catalog
//!
//! Served whenever the external catalog store is unreachable and no cached
//! data exists. Twenty stock products, each with four quantity tiers.

use super::{PlacementBox, PricingTier, Product};

/// (id, name, sku, description, image file, tier prices at 1/10/50/100+)
const FALLBACK_ITEMS: &[(&str, &str, &str, &str, &str, [f64; 4])] = &[
    ("tee-classic", "Classic Tee", "TEE-001", "Ringspun cotton crew-neck tee", "tee-classic.png", [29.99, 26.99, 23.99, 19.99]),
    ("tee-premium", "Premium Tee", "TEE-002", "Tri-blend tee with a soft hand feel", "tee-premium.png", [34.99, 31.99, 28.99, 24.99]),
    ("hoodie-pullover", "Pullover Hoodie", "HOD-001", "Midweight fleece pullover hoodie", "hoodie-pullover.png", [54.99, 49.99, 44.99, 39.99]),
    ("hoodie-zip", "Zip Hoodie", "HOD-002", "Full-zip fleece hoodie", "hoodie-zip.png", [59.99, 54.99, 49.99, 44.99]),
    ("polo-pique", "Pique Polo", "POL-001", "Classic-fit pique polo", "polo-pique.png", [39.99, 36.99, 33.99, 29.99]),
    ("cap-snapback", "Snapback Cap", "CAP-001", "Structured six-panel snapback", "cap-snapback.png", [24.99, 22.99, 20.99, 17.99]),
    ("cap-dad", "Dad Hat", "CAP-002", "Unstructured low-profile cap", "cap-dad.png", [22.99, 20.99, 18.99, 15.99]),
    ("beanie-cuffed", "Cuffed Beanie", "BEA-001", "Acrylic knit cuffed beanie", "beanie-cuffed.png", [19.99, 17.99, 15.99, 13.99]),
    ("mug-ceramic", "Ceramic Mug", "MUG-001", "11 oz ceramic mug, dishwasher safe", "mug-ceramic.png", [14.99, 12.99, 10.99, 8.99]),
    ("mug-travel", "Travel Mug", "MUG-002", "16 oz insulated travel mug", "mug-travel.png", [24.99, 22.99, 19.99, 16.99]),
    ("bottle-steel", "Steel Bottle", "BOT-001", "24 oz stainless steel bottle", "bottle-steel.png", [29.99, 26.99, 23.99, 20.99]),
    ("tumbler-insulated", "Insulated Tumbler", "TUM-001", "20 oz double-wall tumbler", "tumbler-insulated.png", [27.99, 24.99, 21.99, 18.99]),
    ("tote-canvas", "Canvas Tote", "TOT-001", "Heavyweight canvas tote bag", "tote-canvas.png", [19.99, 17.99, 15.99, 12.99]),
    ("backpack-daypack", "Daypack", "BAG-001", "15\" laptop daypack", "backpack-daypack.png", [49.99, 45.99, 41.99, 36.99]),
    ("notebook-hardcover", "Hardcover Notebook", "NOT-001", "A5 dotted hardcover notebook", "notebook-hardcover.png", [16.99, 14.99, 12.99, 10.99]),
    ("pen-gel", "Gel Pen", "PEN-001", "Retractable gel pen, 0.7 mm", "pen-gel.png", [4.99, 3.99, 2.99, 1.99]),
    ("mousepad-cloth", "Cloth Mousepad", "PAD-001", "Stitched-edge cloth mousepad", "mousepad-cloth.png", [12.99, 11.99, 9.99, 7.99]),
    ("sticker-sheet", "Sticker Sheet", "STK-001", "Die-cut vinyl sticker sheet", "sticker-sheet.png", [6.99, 5.99, 4.99, 3.99]),
    ("lanyard-flat", "Flat Lanyard", "LAN-001", "Polyester lanyard with clip", "lanyard-flat.png", [8.99, 7.99, 6.99, 5.49]),
    ("umbrella-compact", "Compact Umbrella", "UMB-001", "Auto-open compact umbrella", "umbrella-compact.png", [34.99, 31.99, 27.99, 23.99]),
];

/// Chest-centered placement shared by the fallback items
const DEFAULT_BOX: PlacementBox = PlacementBox {
    x: 0.35,
    y: 0.3,
    width: 0.3,
    height: 0.25,
};

fn tiers(prices: &[f64; 4]) -> Vec<PricingTier> {
    vec![
        PricingTier { min: 1, max: Some(9), price: prices[0] },
        PricingTier { min: 10, max: Some(49), price: prices[1] },
        PricingTier { min: 50, max: Some(99), price: prices[2] },
        PricingTier { min: 100, max: None, price: prices[3] },
    ]
}

/// Build the fallback product list
pub fn catalog() -> Vec<Product> {
    FALLBACK_ITEMS
        .iter()
        .map(|&(id, name, sku, description, image_file, prices)| Product {
            id: id.to_string(),
            name: name.to_string(),
            sku: sku.to_string(),
            description: description.to_string(),
            image_file: image_file.to_string(),
            pricing: tiers(&prices),
            boxes: vec![DEFAULT_BOX],
            preview_url: None,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::normalize::is_sellable;

    #[test]
    fn fallback_has_twenty_sellable_products() {
        let products = catalog();
        assert_eq!(products.len(), 20);
        assert!(products.iter().all(is_sellable));
    }

    #[test]
    fn tiers_are_sorted_and_open_ended() {
        for product in catalog() {
            let mut last_max = 0u32;
            for tier in &product.pricing[..product.pricing.len() - 1] {
                assert_eq!(tier.min, last_max + 1);
                last_max = tier.max.expect("inner tiers are bounded");
            }
            assert_eq!(product.pricing.last().unwrap().max, None);
        }
    }

    #[test]
    fn prices_decrease_with_volume() {
        for product in catalog() {
            for pair in product.pricing.windows(2) {
                assert!(pair[1].price < pair[0].price, "{} tiers not discounted", product.id);
            }
        }
    }

    #[test]
    fn ids_are_unique() {
        let products = catalog();
        let mut ids: Vec<_> = products.iter().map(|p| p.id.as_str()).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), products.len());
    }
}
