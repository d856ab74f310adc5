//! Shared test support: stub scrapers with canned results.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;

use voicecart::finder::ProductFinder;
use voicecart::models::{Product, SearchIntent};
use voicecart::router::CommandRouter;
use voicecart::session::SessionRegistry;
use voicecart::traits::{ScraperConfig, SiteSelectors, StoreScraper};

pub fn product(store: &str, title: &str, price: Option<u32>) -> Product {
    Product {
        title: title.to_string(),
        price,
        currency: "INR".to_string(),
        image_url: None,
        source_store: store.to_string(),
        rating: Some(4.1),
        discount: None,
        product_url: format!("https://{}.test/p/{}", store.to_lowercase(), title.replace(' ', "-")),
        retrieved_at: Utc::now(),
        realtime: true,
    }
}

pub struct FixedScraper {
    config: ScraperConfig,
    products: Vec<Product>,
}

impl FixedScraper {
    pub fn new(name: &str, products: Vec<Product>) -> Arc<dyn StoreScraper> {
        Arc::new(Self {
            config: ScraperConfig {
                name: name.to_string(),
                base_url: format!("https://{}.test", name.to_lowercase()),
                search_url_pattern: format!("https://{}.test/search?q={{query}}", name.to_lowercase()),
                selectors: SiteSelectors {
                    product_container: ".product".to_string(),
                    title: ".title".to_string(),
                    price: ".price".to_string(),
                    rating: None,
                    discount: None,
                    link: "a".to_string(),
                    image: "img".to_string(),
                },
                max_results: 15,
            },
            products,
        })
    }
}

#[async_trait]
impl StoreScraper for FixedScraper {
    fn config(&self) -> &ScraperConfig {
        &self.config
    }

    async fn search(&self, _intent: &SearchIntent, _timeout: Duration) -> Vec<Product> {
        self.products.clone()
    }

    fn fallback_catalogue(&self, _intent: &SearchIntent) -> Vec<Product> {
        Vec::new()
    }
}

/// A router wired to stub stores, mirroring the production wiring minus the
/// network.
pub fn stub_router(stores: Vec<(&str, Vec<Product>)>) -> Arc<CommandRouter> {
    let scrapers = stores
        .into_iter()
        .map(|(name, products)| FixedScraper::new(name, products))
        .collect();
    let finder = Arc::new(ProductFinder::new(
        scrapers,
        Duration::from_secs(2),
        Duration::from_secs(2),
    ));
    let sessions = Arc::new(SessionRegistry::new("default"));
    Arc::new(CommandRouter::new(finder, sessions))
}
