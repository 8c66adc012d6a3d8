// Remote translation resource boundary
//
// The orchestrator sees one opaque, possibly slow, possibly failing
// dependency behind this trait. The concrete client speaks the Yandex
// tr.json wire format.

pub mod yandex;

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;

pub use yandex::YandexClient;

use crate::config::RemoteConfig;
use crate::error::Result;

/// Main trait for the remote translation resource
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TranslateApi: Send + Sync {
    /// Translate a single word between the given language pair.
    /// One attempt per call; the caller does not retry.
    async fn translate_word(&self, word: &str, source: &str, target: &str) -> Result<String>;

    /// Fetch the code -> name map of languages the resource supports
    async fn fetch_languages(&self) -> Result<HashMap<String, String>>;
}

/// Factory for creating remote client instances
pub struct TranslateApiFactory;

impl TranslateApiFactory {
    /// Create the default client for the configured translation resource
    pub fn create_client(config: RemoteConfig) -> Result<Arc<dyn TranslateApi>> {
        Ok(Arc::new(yandex::YandexClient::new(config)?))
    }
}
