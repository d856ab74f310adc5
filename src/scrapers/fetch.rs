//! Page fetching with the full/simple mode strategy resolved once at startup.

use anyhow::Result;
use reqwest::Client;
use tracing::warn;

use crate::config::{ScrapeMode, ScrapingConfig};
use crate::scrapers::webdriver::WebDriverClient;

const USER_AGENT: &str =
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// Shared page fetcher handed to every store scraper.
///
/// Full mode routes fetches through a WebDriver session for JS-rendered
/// pages; simple mode is a plain GET. The mode is decided here, once, at
/// process start — scrapers never branch on it per request.
#[derive(Clone)]
pub struct PageFetcher {
    client: Client,
    driver: Option<WebDriverClient>,
}

impl PageFetcher {
    /// Resolve the configured mode. A full-mode request with an unreachable
    /// driver degrades to simple mode with a warning instead of failing.
    pub async fn init(config: &ScrapingConfig) -> Result<Self> {
        let client = Client::builder().user_agent(USER_AGENT).build()?;

        let driver = match config.mode {
            ScrapeMode::Full => {
                match WebDriverClient::connect(&config.webdriver_url, client.clone()).await {
                    Ok(driver) => Some(driver),
                    Err(e) => {
                        warn!(
                            "WebDriver init failed ({}), falling back to simple mode",
                            e
                        );
                        None
                    }
                }
            }
            ScrapeMode::Simple => None,
        };

        Ok(Self { client, driver })
    }

    /// Simple-mode fetcher with no driver probe. Used in tests.
    pub fn simple() -> Result<Self> {
        let client = Client::builder().user_agent(USER_AGENT).build()?;
        Ok(Self {
            client,
            driver: None,
        })
    }

    pub fn mode(&self) -> ScrapeMode {
        if self.driver.is_some() {
            ScrapeMode::Full
        } else {
            ScrapeMode::Simple
        }
    }

    pub async fn fetch(&self, url: &str) -> Result<String> {
        match &self.driver {
            Some(driver) => driver.fetch_page_source(url).await,
            None => {
                let response = self.client.get(url).send().await?;
                if !response.status().is_success() {
                    return Err(anyhow::anyhow!(
                        "Failed to fetch {}: {}",
                        url,
                        response.status()
                    ));
                }
                Ok(response.text().await?)
            }
        }
    }
}
