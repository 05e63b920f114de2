//! Graceful degradation with static fallback content.
//!
//! When the backend cannot be reached, the catalog and detail screens render
//! these fixed samples alongside an error notice instead of an empty view.

use chrono::{DateTime, Duration, Utc};

use crate::model::{Feedback, Product};

pub const CATALOG_NOTICE: &str = "Failed to load products. Please try again later.";
pub const DETAIL_NOTICE: &str = "Failed to load product details.";

const HONEY_IMAGE: &str = "https://images.pexels.com/photos/1638280/pexels-photo-1638280.jpeg?auto=compress&cs=tinysrgb";

fn sample(
    id: &str,
    name: &str,
    brand: &str,
    image: String,
    description: &str,
    certification: &str,
    category: &str,
) -> Product {
    Product {
        id: id.to_string(),
        name: name.to_string(),
        brand: brand.to_string(),
        image,
        description: description.to_string(),
        certification: certification.to_string(),
        category: category.to_string(),
    }
}

/// Sample catalog shown when `/products` fails.
pub fn catalog() -> Vec<Product> {
    vec![
        sample(
            "1",
            "Organic Wildflower Honey",
            "Nature's Best",
            format!("{}&w=400", HONEY_IMAGE),
            "Pure, raw wildflower honey harvested from sustainable beehives.",
            "USDA Organic",
            "Honey",
        ),
        sample(
            "2",
            "Cold-Pressed Olive Oil",
            "Mediterranean Gold",
            "https://images.pexels.com/photos/33783/olive-oil-salad-dressing-cooking-olive.jpg?auto=compress&cs=tinysrgb&w=400".to_string(),
            "Extra virgin olive oil from century-old olive groves.",
            "Organic Certified",
            "Oils",
        ),
        sample(
            "3",
            "Grass-Fed Organic Milk",
            "Farm Fresh",
            "https://images.pexels.com/photos/236010/pexels-photo-236010.jpeg?auto=compress&cs=tinysrgb&w=400".to_string(),
            "Fresh organic milk from grass-fed cows.",
            "USDA Organic",
            "Dairy",
        ),
    ]
}

/// Sample product for the detail screen, keyed to the requested id.
pub fn product(id: &str) -> Product {
    sample(
        id,
        "Organic Wildflower Honey",
        "Nature's Best",
        format!("{}&w=800", HONEY_IMAGE),
        "Our premium wildflower honey is harvested from sustainable beehives located in \
         pristine meadows. This raw, unfiltered honey contains natural enzymes, antioxidants, \
         and minerals that support your health and well-being. Each jar represents the hard \
         work of thousands of bees and our commitment to sustainable beekeeping practices.",
        "USDA Organic",
        "Honey",
    )
}

/// Two sample reviews, one and two days old relative to `now`.
pub fn feedback(product_id: &str, now: DateTime<Utc>) -> Vec<Feedback> {
    vec![
        Feedback {
            id: Some("1".to_string()),
            product_id: product_id.to_string(),
            name: "Sarah Johnson".to_string(),
            message: "Absolutely love this honey! The taste is incredible and you can really \
                      tell the difference in quality."
                .to_string(),
            created_at: Some(now - Duration::days(1)),
        },
        Feedback {
            id: Some("2".to_string()),
            product_id: product_id.to_string(),
            name: "Mike Chen".to_string(),
            message: "Great product, fast shipping. Will definitely order again!".to_string(),
            created_at: Some(now - Duration::days(2)),
        },
    ]
}
