//! Text-to-speech passthrough: a thin wrapper around an external TTS HTTP
//! service. Not part of the core — the browser falls back to its own
//! speech synthesis when this endpoint misbehaves.

use anyhow::Result;
use reqwest::Client;
use tracing::info;

#[derive(Clone)]
pub struct TtsClient {
    client: Client,
    endpoint: String,
}

impl TtsClient {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            endpoint: endpoint.into(),
        }
    }

    /// Fetch synthesized audio bytes for a text snippet.
    pub async fn synthesize(&self, text: &str) -> Result<Vec<u8>> {
        let url = format!(
            "{}?ie=UTF-8&client=tw-ob&tl=en&q={}",
            self.endpoint,
            urlencoding::encode(text)
        );

        let response = self.client.get(&url).send().await?;
        if !response.status().is_success() {
            return Err(anyhow::anyhow!(
                "TTS service returned {}",
                response.status()
            ));
        }

        let audio = response.bytes().await?.to_vec();
        info!("TTS synthesized {} bytes for {} chars", audio.len(), text.len());
        Ok(audio)
    }
}
