//! Flipkart-specific scraper implementation

use std::time::Duration;

use async_trait::async_trait;
use tracing::{error, info, warn};

use crate::models::{Product, SearchIntent};
use crate::scrapers::{catalog, extract_products, PageFetcher};
use crate::traits::{ScraperConfig, SiteSelectors, StoreScraper};

/// Scraper implementation for Flipkart
pub struct FlipkartScraper {
    fetcher: PageFetcher,
    config: ScraperConfig,
}

impl FlipkartScraper {
    pub fn new(fetcher: PageFetcher, max_results: usize) -> Self {
        let config = ScraperConfig {
            name: "Flipkart".to_string(),
            base_url: "https://www.flipkart.com".to_string(),
            search_url_pattern: "https://www.flipkart.com/search?q={query}".to_string(),
            selectors: SiteSelectors {
                product_container: "div[data-id], div._1AtVbE, div._4ddWXP".to_string(),
                title: "div._4rR01T, a.IRpwTa, div.KzDlHZ, a.s1Q9rs".to_string(),
                price: "div._30jeq3, div.Nx9bqj, div._1_WHN1".to_string(),
                rating: Some("div._3LWZlK, span.Y1HWO0".to_string()),
                discount: Some("div._3Ay6Sb, div.UkUFwK".to_string()),
                link: "a._1fQZEK, a.IRpwTa, a.CGtC98, a.s1Q9rs".to_string(),
                image: "img._396cs4, img.DByuf4, img".to_string(),
            },
            max_results,
        };

        Self { fetcher, config }
    }

    /// Search URL with Flipkart's price-range facets appended when the
    /// intent carries bounds.
    fn search_url(&self, intent: &SearchIntent) -> String {
        let mut url = self.build_search_url(intent);
        if intent.min_price.is_some() || intent.max_price.is_some() {
            let from = intent.min_price.unwrap_or(0);
            let to = intent.max_price.unwrap_or(100_000);
            url.push_str(&format!(
                "&p%5B%5D=facets.price_range.from%3D{from}&p%5B%5D=facets.price_range.to%3D{to}"
            ));
        }
        url
    }
}

#[async_trait]
impl StoreScraper for FlipkartScraper {
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
