//! Traits and interfaces for store-agnostic scraping

use std::time::Duration;

use async_trait::async_trait;

use crate::models::{Product, SearchIntent};

/// Configuration for a store scraper
#[derive(Debug, Clone)]
pub struct ScraperConfig {
    /// Display name for the store
    pub name: String,
    /// Base URL for the store
    pub base_url: String,
    /// Search URL pattern with {query} placeholder
    pub search_url_pattern: String,
    /// CSS selectors for extracting data
    pub selectors: SiteSelectors,
    /// Cap on listing entries parsed per search
    pub max_results: usize,
}

/// CSS selectors for different parts of a product listing. Each selector may
/// carry comma-separated alternatives; the first match in document order wins.
#[derive(Debug, Clone)]
pub struct SiteSelectors {
    /// Container selector for individual products
    pub product_container: String,
    /// Title selector within product container
    pub title: String,
    /// Price selector within product container
    pub price: String,
    /// Rating selector within product container (optional)
    pub rating: Option<String>,
    /// Discount label selector within product container (optional)
    pub discount: Option<String>,
    /// Product link selector within product container
    pub link: String,
    /// Image selector within product container
    pub image: String,
}

/// Trait for store-specific scrapers.
///
/// `search` absorbs every failure: a network error, timeout or unexpected
/// page shape is logged inside the implementation and surfaces only as an
/// empty vector, so one broken store can never fail an aggregate request.
#[async_trait]
pub trait StoreScraper: Send + Sync {
    /// Get the configuration for this scraper
    fn config(&self) -> &ScraperConfig;

    fn name(&self) -> &str {
        &self.config().name
    }

    /// Search this store for products matching the intent. The timeout bounds
    /// the whole fetch-and-parse so a slow store cannot stall the aggregate.
    async fn search(&self, intent: &SearchIntent, timeout: Duration) -> Vec<Product>;

    /// Static best-guess entries served when live scraping returns nothing,
    /// tagged non-realtime so the caller can tell them apart.
    fn fallback_catalogue(&self, intent: &SearchIntent) -> Vec<Product>;

    /// Build the search URL for an intent from the configured pattern.
    fn build_search_url(&self, intent: &SearchIntent) -> String {
        let encoded = urlencoding::encode(&intent.query_string()).into_owned();
        self.config()
            .search_url_pattern
            .replace("{query}", &encoded)
    }

    /// User agent string for HTTP requests
    fn user_agent(&self) -> &'static str {
        "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36"
    }
}
