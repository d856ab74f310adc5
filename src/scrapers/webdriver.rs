//! Minimal WebDriver wire-protocol client for full-mode scraping.
//!
//! Talks JSON-over-HTTP to a chromedriver-compatible endpoint: one throwaway
//! session per fetch (create, navigate, read rendered page source, delete).
//! Connectivity is probed once at startup; an unreachable driver downgrades
//! the process to simple mode instead of failing requests later.

use std::time::Duration;

use anyhow::Result;
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;
use tracing::{info, warn};

const STATUS_PROBE_TIMEOUT: Duration = Duration::from_secs(3);

#[derive(Debug, Deserialize)]
struct WdValue<T> {
    value: T,
}

#[derive(Debug, Deserialize)]
struct WdStatus {
    ready: bool,
}

#[derive(Debug, Deserialize)]
struct WdSession {
    #[serde(rename = "sessionId")]
    session_id: String,
}

#[derive(Clone)]
pub struct WebDriverClient {
    client: Client,
    endpoint: String,
}

impl WebDriverClient {
    /// Probe the driver's /status endpoint and construct a client when it
    /// reports ready.
    pub async fn connect(endpoint: &str, client: Client) -> Result<Self> {
        let status: WdValue<WdStatus> = client
            .get(format!("{endpoint}/status"))
            .timeout(STATUS_PROBE_TIMEOUT)
            .send()
            .await?
            .json()
            .await?;

        if !status.value.ready {
            return Err(anyhow::anyhow!("WebDriver at {} is not ready", endpoint));
        }

        info!("WebDriver ready at {}", endpoint);
        Ok(Self {
            client,
            endpoint: endpoint.to_string(),
        })
    }

    /// Fetch the rendered page source for a URL through a fresh session.
    /// The session is deleted even when navigation fails.
    pub async fn fetch_page_source(&self, url: &str) -> Result<String> {
        let session_id = self.new_session().await?;
        let result = self.navigate_and_read(&session_id, url).await;

        if let Err(e) = self.delete_session(&session_id).await {
            warn!("Failed to delete WebDriver session {}: {}", session_id, e);
        }

        result
    }

    async fn new_session(&self) -> Result<String> {
        let body = json!({
            "capabilities": {
                "alwaysMatch": {
                    "browserName": "chrome",
                    "goog:chromeOptions": {
                        "args": [
                            "--headless=new",
                            "--no-sandbox",
                            "--disable-gpu",
                            "--disable-dev-shm-usage",
                            "--window-size=1920,1080"
                        ]
                    }
                }
            }
        });

        let response = self
            .client
            .post(format!("{}/session", self.endpoint))
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(anyhow::anyhow!(
                "WebDriver session creation failed: {}",
                response.status()
            ));
        }

        let session: WdValue<WdSession> = response.json().await?;
        Ok(session.value.session_id)
    }

    async fn navigate_and_read(&self, session_id: &str, url: &str) -> Result<String> {
        let response = self
            .client
            .post(format!("{}/session/{}/url", self.endpoint, session_id))
            .json(&json!({ "url": url }))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(anyhow::anyhow!(
                "WebDriver navigation to {} failed: {}",
                url,
                response.status()
            ));
        }

        let source: WdValue<String> = self
            .client
            .get(format!("{}/session/{}/source", self.endpoint, session_id))
            .send()
            .await?
            .json()
            .await?;

        Ok(source.value)
    }

    async fn delete_session(&self, session_id: &str) -> Result<()> {
        self.client
            .delete(format!("{}/session/{}", self.endpoint, session_id))
            .send()
            .await?;
        Ok(())
    }
}
