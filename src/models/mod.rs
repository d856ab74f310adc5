//! Data models for normalized products, search intents and cart items

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A product listing normalized from one store's search page
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    pub title: String,
    /// Price in whole rupees. `None` means the source page rendered no
    /// parseable price; such entries rank last but are never dropped.
    pub price: Option<u32>,
    pub currency: String,
    pub image_url: Option<String>,
    pub source_store: String,
    pub rating: Option<f32>,
    pub discount: Option<String>,
    /// Absolute, directly openable link. The only field the "buy" action needs.
    pub product_url: String,
    pub retrieved_at: DateTime<Utc>,
    /// False for fallback catalogue entries served when live scraping fails.
    pub realtime: bool,
}

impl Product {
    /// Short spoken description: title plus price when one is known.
    pub fn voice_summary(&self) -> String {
        match self.price {
            Some(price) => format!("{} for rupees {}", self.title, price),
            None => format!("{}, price unavailable", self.title),
        }
    }
}

/// Structured interpretation of a free-text search command.
/// Immutable once built; every store scraper consumes it identically.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchIntent {
    pub keywords: Vec<String>,
    pub min_price: Option<u32>,
    pub max_price: Option<u32>,
    pub category: Option<String>,
}

impl SearchIntent {
    pub fn query_string(&self) -> String {
        self.keywords.join(" ")
    }

    /// Whether a price satisfies both bounds. Unbounded sides always pass.
    pub fn price_in_range(&self, price: u32) -> bool {
        self.min_price.is_none_or(|min| price >= min)
            && self.max_price.is_none_or(|max| price <= max)
    }
}

/// A cart row. Uniqueness key is the exact title: adding a product whose
/// title is already present increments `quantity` instead of duplicating.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CartItem {
    pub title: String,
    pub price: u32,
    pub quantity: u32,
    pub source_store: String,
}

impl CartItem {
    pub fn line_total(&self) -> u64 {
        u64::from(self.price) * u64::from(self.quantity)
    }
}

/// Coerce a free-form price string ("₹1,999", "Rs. 450") into whole rupees.
/// Strips every non-digit character; unparseable input yields `None`.
pub fn parse_price(raw: &str) -> Option<u32> {
    let digits: String = raw.chars().filter(char::is_ascii_digit).collect();
    if digits.is_empty() {
        return None;
    }
    digits.parse().ok()
}

/// Coerce a rating string ("4.2 (850 reviews)", "4.3 out of 5 stars") into
/// its leading numeric value.
pub fn parse_rating(raw: &str) -> Option<f32> {
    let lead: String = raw
        .trim()
        .chars()
        .take_while(|c| c.is_ascii_digit() || *c == '.')
        .collect();
    if lead.is_empty() {
        return None;
    }
    lead.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn price_survives_currency_formatting() {
        assert_eq!(parse_price("₹1,999"), Some(1999));
        assert_eq!(parse_price("Rs. 450"), Some(450));
        assert_eq!(parse_price("2499"), Some(2499));
    }

    #[test]
    fn unparseable_price_is_unknown_not_a_crash() {
        assert_eq!(parse_price("Price not found"), None);
        assert_eq!(parse_price(""), None);
    }

    #[test]
    fn rating_takes_leading_float() {
        assert_eq!(parse_rating("4.2 (850 reviews)"), Some(4.2));
        assert_eq!(parse_rating("4.3 out of 5 stars"), Some(4.3));
        assert_eq!(parse_rating("No rating"), None);
    }

    #[test]
    fn price_range_checks_both_bounds() {
        let intent = SearchIntent {
            keywords: vec!["shoes".into()],
            min_price: Some(500),
            max_price: Some(2000),
            category: None,
        };
        assert!(intent.price_in_range(500));
        assert!(intent.price_in_range(2000));
        assert!(!intent.price_in_range(499));
        assert!(!intent.price_in_range(2001));
    }
}
