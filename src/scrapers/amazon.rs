//! Amazon.in-specific scraper implementation

use std::time::Duration;

use async_trait::async_trait;
use tracing::{error, info, warn};

use crate::models::{Product, SearchIntent};
use crate::scrapers::{catalog, extract_products, PageFetcher};
use crate::traits::{ScraperConfig, SiteSelectors, StoreScraper};

/// Scraper implementation for Amazon India
pub struct AmazonScraper {
    fetcher: PageFetcher,
    config: ScraperConfig,
}

impl AmazonScraper {
    pub fn new(fetcher: PageFetcher, max_results: usize) -> Self {
        let config = ScraperConfig {
            name: "Amazon".to_string(),
            base_url: "https://www.amazon.in".to_string(),
            search_url_pattern: "https://www.amazon.in/s?k={query}".to_string(),
            selectors: SiteSelectors {
                product_container: "div[data-component-type='s-search-result']".to_string(),
                title: "h2 a span, h2 span, span.a-color-base.a-text-normal".to_string(),
                price: "span.a-price-whole, span.a-price .a-offscreen".to_string(),
                rating: Some("span.a-icon-alt".to_string()),
                discount: None,
                link: "h2 a, a.a-link-normal.s-no-outline".to_string(),
                image: "img.s-image, img".to_string(),
            },
            max_results,
        };

        Self { fetcher, config }
    }

    /// Amazon's `rh` price filter takes paise, so rupee bounds are scaled
    /// by 100.
    fn search_url(&self, intent: &SearchIntent) -> String {
        let mut url = self.build_search_url(intent);
        if intent.min_price.is_some() || intent.max_price.is_some() {
            let from = u64::from(intent.min_price.unwrap_or(0)) * 100;
            let to = u64::from(intent.max_price.unwrap_or(100_000)) * 100;
            url.push_str(&format!("&rh=p_36%3A{from}-{to}"));
        }
        url
    }
}

#[async_trait]
impl StoreScraper for AmazonScraper {
    fn config(&self) -> &ScraperConfig {
        &self.config
    }

    async fn search(&self, intent: &SearchIntent, timeout: Duration) -> Vec<Product> {
        let url = self.search_url(intent);
        info!("[{}] scraping {}", self.name(), url);

        let html = match tokio::time::timeout(timeout, self.fetcher.fetch(&url)).await {
            Ok(Ok(html)) => html,
            Ok(Err(e)) => {
                error!("[{}] fetch failed: {}", self.name(), e);
                return self.fallback_catalogue(intent);
            }
            Err(_) => {
                warn!("[{}] fetch exceeded {:?}", self.name(), timeout);
                return self.fallback_catalogue(intent);
            }
        };

        let products = match extract_products(&html, &self.config) {
            Ok(products) => products,
            Err(e) => {
                error!("[{}] parse failed: {}", self.name(), e);
                Vec::new()
            }
        };

        if products.is_empty() {
            info!("[{}] no live results, serving fallback catalogue", self.name());
            return self.fallback_catalogue(intent);
        }

        info!("[{}] found {} products", self.name(), products.len());
        products
    }

    fn fallback_catalogue(&self, intent: &SearchIntent) -> Vec<Product> {
        catalog::fallback_products(&self.config.name, &self.search_url(intent), intent)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn price_filter_is_scaled_to_paise() {
        let scraper = AmazonScraper::new(PageFetcher::simple().unwrap(), 15);
        let intent = SearchIntent {
            keywords: vec!["shoes".into()],
            min_price: Some(500),
            max_price: Some(2000),
            category: None,
        };

        let url = scraper.search_url(&intent);
        assert!(url.starts_with("https://www.amazon.in/s?k=shoes"));
        assert!(url.contains("&rh=p_36%3A50000-200000"));
    }
}
