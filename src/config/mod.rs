//! Environment-driven configuration, read once at process start.
//! There is no hot reload: the core keeps whatever it was launched with.

use std::time::Duration;

use tracing::warn;

#[derive(Debug, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub scraping: ScrapingConfig,
    pub default_session_id: String,
    pub tts_endpoint: String,
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone)]
pub struct ScrapingConfig {
    pub mode: ScrapeMode,
    /// Store declaration order doubles as the ranking tie-break.
    pub stores: Vec<String>,
    pub webdriver_url: String,
    pub per_store_timeout: Duration,
    pub overall_timeout: Duration,
    pub max_results: usize,
}

/// Scraper operating mode, selected once at startup. Full mode needs a
/// reachable WebDriver endpoint and degrades to simple automatically when
/// it is missing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrapeMode {
    Full,
    Simple,
}

impl Config {
    pub fn from_env() -> Self {
        let mode = match env_or("VOICECART_SCRAPE_MODE", "full").to_lowercase().as_str() {
            "simple" => ScrapeMode::Simple,
            "full" => ScrapeMode::Full,
            other => {
                warn!("Unknown scrape mode '{}', defaulting to full", other);
                ScrapeMode::Full
            }
        };

        let stores = env_or("VOICECART_STORES", "flipkart,amazon")
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        Self {
            server: ServerConfig {
                host: env_or("VOICECART_HOST", "0.0.0.0"),
                port: env_parsed("VOICECART_PORT", 5002),
            },
            scraping: ScrapingConfig {
                mode,
                stores,
                webdriver_url: env_or("VOICECART_WEBDRIVER_URL", "http://127.0.0.1:9515"),
                per_store_timeout: Duration::from_secs(env_parsed(
                    "VOICECART_STORE_TIMEOUT_SECS",
                    20,
                )),
                overall_timeout: Duration::from_secs(env_parsed(
                    "VOICECART_SEARCH_TIMEOUT_SECS",
                    30,
                )),
                max_results: env_parsed("VOICECART_MAX_RESULTS", 15),
            },
            default_session_id: env_or("VOICECART_DEFAULT_SESSION", "default"),
            tts_endpoint: env_or(
                "VOICECART_TTS_ENDPOINT",
                "https://translate.google.com/translate_tts",
            ),
        }
    }
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

fn env_parsed<T: std::str::FromStr + Copy>(key: &str, default: T) -> T {
    match std::env::var(key) {
        Ok(raw) => raw.parse().unwrap_or_else(|_| {
            warn!("Could not parse {}='{}', using default", key, raw);
            default
        }),
        Err(_) => default,
    }
}
