use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

use crate::config::RemoteConfig;
use crate::error::{Result, VerbaError};
use super::TranslateApi;

#[derive(Debug, Clone, Deserialize)]
struct TranslateResponse {
    #[serde(default)]
    text: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
struct LanguagesResponse {
    #[serde(default)]
    langs: HashMap<String, String>,
}

/// Client for a Yandex-compatible translation API
pub struct YandexClient {
    client: Client,
    config: RemoteConfig,
}

impl YandexClient {
    pub fn new(config: RemoteConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| VerbaError::Config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self { client, config })
    }
}

#[async_trait]
impl TranslateApi for YandexClient {
    async fn translate_word(&self, word: &str, source: &str, target: &str) -> Result<String> {
        let url = format!("{}/translate", self.config.base_url);
        let lang = format!("{}-{}", source, target);

        debug!("Sending translation request for '{}' ({})", word, lang);

        let response = self
            .client
            .get(&url)
            .query(&[
                ("key", self.config.api_key.as_str()),
                ("text", word),
                ("lang", lang.as_str()),
            ])
            .send()
            .await
            .map_err(|e| VerbaError::Upstream(format!("translation request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(VerbaError::Upstream(format!(
                "translation resource returned {}: {}",
                status, error_text
            )));
        }

        let parsed: TranslateResponse = response
            .json()
            .await
            .map_err(|e| VerbaError::Upstream(format!("failed to parse translation response: {}", e)))?;

        let translated = parsed
            .text
            .into_iter()
            .next()
            .ok_or_else(|| VerbaError::Upstream("translation resource returned no text".to_string()))?;

        if translated.trim().is_empty() {
            return Err(VerbaError::Upstream("empty translation received".to_string()));
        }

        debug!("Translated '{}' -> '{}'", word, translated);
        Ok(translated)
    }

    async fn fetch_languages(&self) -> Result<HashMap<String, String>> {
        let url = format!("{}/getLangs", self.config.base_url);

        let response = self
            .client
            .get(&url)
            .query(&[("key", self.config.api_key.as_str()), ("ui", "en")])
            .send()
            .await
            .map_err(|e| VerbaError::Upstream(format!("language fetch failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(VerbaError::Upstream(format!(
                "language fetch returned {}",
                response.status()
            )));
        }

        let parsed: LanguagesResponse = response
            .json()
            .await
            .map_err(|e| VerbaError::Upstream(format!("failed to parse language response: {}", e)))?;

        if parsed.langs.is_empty() {
            return Err(VerbaError::Upstream(
                "translation resource returned no languages".to_string(),
            ));
        }

        Ok(parsed.langs)
    }
}
