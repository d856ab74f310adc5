//! Multi-store coordination: fan a search intent out to every enabled
//! scraper concurrently, bound the joint wait, merge and rank.

use std::sync::Arc;
use std::time::Duration;

use tokio::time::Instant;
use tracing::{error, info, warn};

use crate::models::{Product, SearchIntent};
use crate::traits::StoreScraper;

pub struct ProductFinder {
    scrapers: Vec<Arc<dyn StoreScraper>>,
    per_store_timeout: Duration,
    overall_timeout: Duration,
}

impl ProductFinder {
    pub fn new(
        scrapers: Vec<Arc<dyn StoreScraper>>,
        per_store_timeout: Duration,
        overall_timeout: Duration,
    ) -> Self {
        Self {
            scrapers,
            per_store_timeout,
            overall_timeout,
        }
    }

    pub fn store_names(&self) -> Vec<String> {
        self.scrapers.iter().map(|s| s.name().to_string()).collect()
    }

    /// Search every enabled store concurrently and return the merged, ranked
    /// result set.
    ///
    /// All store tasks are spawned before any is awaited; the joint wait is
    /// bounded by one overall deadline. A store that misses the deadline is
    /// aborted and its eventual output discarded — nothing is merged after
    /// this function returns. Stores are merged in declaration order, which
    /// doubles as the ranking tie-break; within a store, page order is kept.
    pub async fn search_all(&self, intent: &SearchIntent) -> Vec<Product> {
        let mut handles = Vec::with_capacity(self.scrapers.len());
        for scraper in &self.scrapers {
            let name = scraper.name().to_string();
            let scraper = Arc::clone(scraper);
            let intent = intent.clone();
            let per_store_timeout = self.per_store_timeout;
            let handle =
                tokio::spawn(async move { scraper.search(&intent, per_store_timeout).await });
            handles.push((name, handle));
        }

        let deadline = Instant::now() + self.overall_timeout;
        let mut merged = Vec::new();

        for (name, mut handle) in handles {
            let remaining = deadline.saturating_duration_since(Instant::now());
            match tokio::time::timeout(remaining, &mut handle).await {
                Ok(Ok(products)) => {
                    info!("{} contributed {} products", name, products.len());
                    merged.extend(products);
                }
                Ok(Err(e)) => {
                    error!("Store task for {} failed: {}", name, e);
                }
                Err(_) => {
                    warn!("{} exceeded the overall timeout, abandoning it", name);
                    handle.abort();
                }
            }
        }

        info!(
            "Found {} products across {} stores",
            merged.len(),
            self.scrapers.len()
        );
        rank_products(merged, intent)
    }
}

/// Ranking policy: entries whose price satisfies both bounds first, then
/// priced entries violating a bound, then priceless entries. The sort is
/// stable, so the merge order (store declaration order, page order within a
/// store) is the tie-break. Near-misses are kept, never dropped.
///
/// Duplicate titles across stores are intentionally not collapsed: the
/// fingerprint to dedup on is a product decision that has not been made.
pub fn rank_products(mut products: Vec<Product>, intent: &SearchIntent) -> Vec<Product> {
    products.sort_by_key(|product| match product.price {
        Some(price) if intent.price_in_range(price) => 0u8,
        Some(_) => 1,
        None => 2,
    });
    products
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::{ScraperConfig, SiteSelectors};
    use async_trait::async_trait;
    use chrono::Utc;

    fn stub_config(name: &str) -> ScraperConfig {
        ScraperConfig {
            name: name.to_string(),
            base_url: "https://stub.test".to_string(),
            search_url_pattern: "https://stub.test/search?q={query}".to_string(),
            selectors: SiteSelectors {
                product_container: ".p".to_string(),
                title: ".t".to_string(),
                price: ".pr".to_string(),
                rating: None,
                discount: None,
                link: "a".to_string(),
                image: "img".to_string(),
            },
            max_results: 10,
        }
    }

    fn product(store: &str, title: &str, price: Option<u32>) -> Product {
        Product {
            title: title.to_string(),
            price,
            currency: "INR".to_string(),
            image_url: None,
            source_store: store.to_string(),
            rating: None,
            discount: None,
            product_url: format!("https://stub.test/p/{title}"),
            retrieved_at: Utc::now(),
            realtime: true,
        }
    }

    struct StubScraper {
        config: ScraperConfig,
        delay: Duration,
        products: Vec<Product>,
    }

    impl StubScraper {
        fn new(name: &str, delay: Duration, products: Vec<Product>) -> Arc<dyn StoreScraper> {
            Arc::new(Self {
                config: stub_config(name),
                delay,
                products,
            })
        }
    }

    #[async_trait]
    impl StoreScraper for StubScraper {
        fn config(&self) -> &ScraperConfig {
            &self.config
        }

        async fn search(&self, _intent: &SearchIntent, _timeout: Duration) -> Vec<Product> {
            tokio::time::sleep(self.delay).await;
            self.products.clone()
        }

        fn fallback_catalogue(&self, _intent: &SearchIntent) -> Vec<Product> {
            Vec::new()
        }
    }

    fn unconstrained() -> SearchIntent {
        SearchIntent {
            keywords: vec!["shoes".into()],
            min_price: None,
            max_price: None,
            category: None,
        }
    }

    #[tokio::test]
    async fn slow_store_is_abandoned_not_waited_for() {
        let prompt = StubScraper::new(
            "Prompt",
            Duration::from_millis(10),
            vec![product("Prompt", "Fast Shoe", Some(999))],
        );
        let slow = StubScraper::new(
            "Slow",
            Duration::from_secs(5),
            vec![product("Slow", "Late Shoe", Some(500))],
        );

        let finder = ProductFinder::new(
            vec![prompt, slow],
            Duration::from_secs(10),
            Duration::from_millis(250),
        );

        let started = std::time::Instant::now();
        let results = finder.search_all(&unconstrained()).await;

        assert!(started.elapsed() < Duration::from_secs(1));
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].source_store, "Prompt");
    }

    #[tokio::test]
    async fn results_merge_in_declaration_order() {
        let first = StubScraper::new(
            "First",
            Duration::from_millis(50),
            vec![product("First", "A", Some(100)), product("First", "B", Some(200))],
        );
        let second = StubScraper::new(
            "Second",
            Duration::from_millis(5),
            vec![product("Second", "C", Some(300))],
        );

        let finder = ProductFinder::new(
            vec![first, second],
            Duration::from_secs(5),
            Duration::from_secs(5),
        );

        let results = finder.search_all(&unconstrained()).await;
        let stores: Vec<&str> = results.iter().map(|p| p.source_store.as_str()).collect();
        // Second finished first but First was declared first.
        assert_eq!(stores, vec!["First", "First", "Second"]);
    }

    #[test]
    fn ranking_prefers_in_bounds_keeps_near_misses() {
        let intent = SearchIntent {
            keywords: vec!["shoes".into()],
            min_price: Some(500),
            max_price: Some(2000),
            category: None,
        };
        let merged = vec![
            product("A", "Too Cheap", Some(100)),
            product("A", "In Range 1", Some(900)),
            product("B", "No Price", None),
            product("B", "In Range 2", Some(1500)),
            product("B", "Too Expensive", Some(9000)),
        ];

        let ranked = rank_products(merged, &intent);
        let titles: Vec<&str> = ranked.iter().map(|p| p.title.as_str()).collect();
        assert_eq!(
            titles,
            vec!["In Range 1", "In Range 2", "Too Cheap", "Too Expensive", "No Price"]
        );
    }
}
