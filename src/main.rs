use std::sync::Arc;

use anyhow::Result;
use tracing::info;

use voicecart::api::{self, ApiState};
use voicecart::config::Config;
use voicecart::finder::ProductFinder;
use voicecart::router::CommandRouter;
use voicecart::scrapers::{self, PageFetcher};
use voicecart::session::SessionRegistry;
use voicecart::tts::TtsClient;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt::init();

    info!("Starting VoiceCart shopping assistant");

    let config = Config::from_env();

    let fetcher = PageFetcher::init(&config.scraping).await?;
    info!("Scraping in {:?} mode", fetcher.mode());

    let scrapers = scrapers::build_enabled(&config.scraping, &fetcher);
    info!(
        "Enabled stores: {}",
        scrapers
            .iter()
            .map(|s| s.name())
            .collect::<Vec<_>>()
            .join(", ")
    );

    let finder = Arc::new(ProductFinder::new(
        scrapers,
        config.scraping.per_store_timeout,
        config.scraping.overall_timeout,
    ));
    let sessions = Arc::new(SessionRegistry::new(&config.default_session_id));
    let router = Arc::new(CommandRouter::new(finder, sessions));

    let state = ApiState {
        router,
        tts: TtsClient::new(&config.tts_endpoint),
    };

    api::start_server(&config.server, state).await
}
