//! Store scraper implementations and their shared extraction plumbing.

pub mod amazon;
pub mod catalog;
pub mod fetch;
pub mod flipkart;
pub mod webdriver;

use std::sync::Arc;

use anyhow::Result;
use chrono::Utc;
use scraper::{Html, Selector};
use tracing::warn;

use crate::config::ScrapingConfig;
use crate::models::{parse_price, parse_rating, Product};
use crate::traits::{ScraperConfig, StoreScraper};

pub use fetch::PageFetcher;

/// Build the scraper set for the configured store list, in declaration
/// order — that order is the documented ranking tie-break downstream.
/// Unknown store names are skipped with a warning.
pub fn build_enabled(config: &ScrapingConfig, fetcher: &PageFetcher) -> Vec<Arc<dyn StoreScraper>> {
    let mut scrapers: Vec<Arc<dyn StoreScraper>> = Vec::new();
    for store in &config.stores {
        match store.to_lowercase().as_str() {
            "flipkart" => scrapers.push(Arc::new(flipkart::FlipkartScraper::new(
                fetcher.clone(),
                config.max_results,
            ))),
            "amazon" => scrapers.push(Arc::new(amazon::AmazonScraper::new(
                fetcher.clone(),
                config.max_results,
            ))),
            other => warn!("Unknown store '{}' in configuration, skipping", other),
        }
    }
    scrapers
}

/// Parse a result page into normalized products using the store's selector
/// chains. Entries without a usable link or title are skipped; a missing or
/// malformed price becomes the unknown sentinel, never an error.
pub(crate) fn extract_products(html: &str, config: &ScraperConfig) -> Result<Vec<Product>> {
    let product_selector = parse_selector(&config.selectors.product_container)?;
    let title_selector = parse_selector(&config.selectors.title)?;
    let price_selector = parse_selector(&config.selectors.price)?;
    let link_selector = parse_selector(&config.selectors.link)?;
    let image_selector = parse_selector(&config.selectors.image)?;
    let rating_selector = config
        .selectors
        .rating
        .as_deref()
        .map(parse_selector)
        .transpose()?;
    let discount_selector = config
        .selectors
        .discount
        .as_deref()
        .map(parse_selector)
        .transpose()?;

    let document = Html::parse_document(html);
    let mut products = Vec::new();

    for container in document.select(&product_selector) {
        if products.len() >= config.max_results {
            break;
        }

        // An absolute, openable link is the one hard requirement: without it
        // the buy action has nothing to open.
        let Some(href) = container
            .select(&link_selector)
            .next()
            .and_then(|link| link.value().attr("href"))
        else {
            continue;
        };
        let product_url = absolutize(&config.base_url, href);

        let title = container
            .select(&title_selector)
            .next()
            .map(|el| el.text().collect::<String>().trim().to_string())
            .unwrap_or_default();
        if title.is_empty() {
            continue;
        }

        let price = container
            .select(&price_selector)
            .next()
            .map(|el| el.text().collect::<String>())
            .as_deref()
            .and_then(parse_price);

        let rating = rating_selector.as_ref().and_then(|sel| {
            container
                .select(sel)
                .next()
                .map(|el| el.text().collect::<String>())
                .as_deref()
                .and_then(parse_rating)
        });

        let discount = discount_selector.as_ref().and_then(|sel| {
            container
                .select(sel)
                .next()
                .map(|el| el.text().collect::<String>().trim().to_string())
                .filter(|text| !text.is_empty())
        });

        let image_url = container
            .select(&image_selector)
            .next()
            .and_then(|img| {
                // data-src first for lazy-loaded images, then src
                img.value()
                    .attr("data-src")
                    .or_else(|| img.value().attr("src"))
            })
            .map(|src| absolutize(&config.base_url, src));

        products.push(Product {
            title,
            price,
            currency: "INR".to_string(),
            image_url,
            source_store: config.name.clone(),
            rating,
            discount,
            product_url,
            retrieved_at: Utc::now(),
            realtime: true,
        });
    }

    Ok(products)
}

fn parse_selector(css: &str) -> Result<Selector> {
    Selector::parse(css).map_err(|e| anyhow::anyhow!("Failed to parse selector '{}': {:?}", css, e))
}

fn absolutize(base_url: &str, href: &str) -> String {
    if href.starts_with("http") {
        href.to_string()
    } else if href.starts_with("//") {
        format!("https:{href}")
    } else {
        format!("{base_url}{href}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::SiteSelectors;

    fn test_config() -> ScraperConfig {
        ScraperConfig {
            name: "TestStore".to_string(),
            base_url: "https://shop.test".to_string(),
            search_url_pattern: "https://shop.test/search?q={query}".to_string(),
            selectors: SiteSelectors {
                product_container: ".product".to_string(),
                title: ".title".to_string(),
                price: ".price".to_string(),
                rating: Some(".rating".to_string()),
                discount: Some(".discount".to_string()),
                link: "a.item-link".to_string(),
                image: "img".to_string(),
            },
            max_results: 10,
        }
    }

    const PAGE: &str = r#"
        <html><body>
          <div class="product">
            <a class="item-link" href="/p/widget-a">
              <span class="title">Widget A</span>
            </a>
            <div class="price">₹1,999</div>
            <div class="rating">4.2 (850 reviews)</div>
            <div class="discount">20% off</div>
            <img src="//cdn.shop.test/a.jpg"/>
          </div>
          <div class="product">
            <a class="item-link" href="https://shop.test/p/widget-b">
              <span class="title">Widget B</span>
            </a>
            <div class="price">no price here</div>
          </div>
          <div class="product">
            <span class="title">No link, skipped</span>
            <div class="price">₹100</div>
          </div>
        </body></html>
    "#;

    #[test]
    fn extracts_and_normalizes_listings() {
        let products = extract_products(PAGE, &test_config()).unwrap();
        assert_eq!(products.len(), 2);

        let first = &products[0];
        assert_eq!(first.title, "Widget A");
        assert_eq!(first.price, Some(1999));
        assert_eq!(first.product_url, "https://shop.test/p/widget-a");
        assert_eq!(first.rating, Some(4.2));
        assert_eq!(first.discount.as_deref(), Some("20% off"));
        assert_eq!(first.image_url.as_deref(), Some("https://cdn.shop.test/a.jpg"));
        assert!(first.realtime);

        // Unparseable price is the unknown sentinel, entry kept.
        assert_eq!(products[1].price, None);
    }

    #[test]
    fn respects_result_cap() {
        let mut config = test_config();
        config.max_results = 1;
        let products = extract_products(PAGE, &config).unwrap();
        assert_eq!(products.len(), 1);
    }
}
