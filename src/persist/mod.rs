// Durable recording of completed translations
//
// Invoked only for successful requests; a sink failure turns the request
// into a failure, so a translation is not complete until it is recorded.

pub mod sqlite;

use std::sync::Arc;

use async_trait::async_trait;

pub use sqlite::SqliteSink;

use crate::config::DatabaseConfig;
use crate::error::Result;

/// One durably recorded translation
#[derive(Debug, Clone)]
pub struct TranslationRecord {
    pub client_id: String,
    pub original_text: String,
    pub translated_text: String,
}

/// Main trait for the translation record sink
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RecordSink: Send + Sync {
    /// Durably record one completed translation
    async fn record(&self, record: &TranslationRecord) -> Result<()>;
}

/// Factory for creating record sink instances
pub struct RecordSinkFactory;

impl RecordSinkFactory {
    /// Create the default SQLite-backed sink
    pub fn create_sink(config: &DatabaseConfig) -> Result<Arc<dyn RecordSink>> {
        Ok(Arc::new(sqlite::SqliteSink::new(config)?))
    }
}
