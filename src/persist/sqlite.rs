use std::path::PathBuf;

use async_trait::async_trait;
use chrono::Utc;
use rusqlite::Connection;
use tracing::debug;

use crate::config::DatabaseConfig;
use crate::error::{Result, VerbaError};
use super::{RecordSink, TranslationRecord};

/// SQLite-backed sink writing one row per completed translation
pub struct SqliteSink {
    db_path: PathBuf,
}

impl SqliteSink {
    pub fn new(config: &DatabaseConfig) -> Result<Self> {
        let sink = Self {
            db_path: PathBuf::from(&config.path),
        };

        sink.init_db()?;

        Ok(sink)
    }

    fn init_db(&self) -> Result<()> {
        let conn = self.connect()?;

        conn.execute(
            "CREATE TABLE IF NOT EXISTS translations (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                client_id TEXT NOT NULL,
                original_text TEXT NOT NULL,
                translated_text TEXT NOT NULL,
                created_at TEXT NOT NULL
            )",
            [],
        )
        .map_err(|e| VerbaError::Persistence(format!("Failed to create translations table: {}", e)))?;

        Ok(())
    }

    fn connect(&self) -> Result<Connection> {
        Connection::open(&self.db_path).map_err(|e| {
            VerbaError::Persistence(format!(
                "Failed to open database {}: {}",
                self.db_path.display(),
                e
            ))
        })
    }

    fn insert(&self, record: &TranslationRecord) -> Result<()> {
        let conn = self.connect()?;
        let created_at = Utc::now().to_rfc3339();

        conn.execute(
            "INSERT INTO translations (client_id, original_text, translated_text, created_at)
             VALUES (?1, ?2, ?3, ?4)",
            [
                &record.client_id,
                &record.original_text,
                &record.translated_text,
                &created_at,
            ],
        )
        .map_err(|e| VerbaError::Persistence(format!("Failed to insert translation: {}", e)))?;

        Ok(())
    }
}

#[async_trait]
impl RecordSink for SqliteSink {
    async fn record(&self, record: &TranslationRecord) -> Result<()> {
        let sink = Self {
            db_path: self.db_path.clone(),
        };
        let owned = record.clone();

        // rusqlite is synchronous; keep the insert off the async workers.
        tokio::task::spawn_blocking(move || sink.insert(&owned))
            .await
            .map_err(|e| VerbaError::Persistence(format!("record task failed: {}", e)))??;

        debug!("Recorded translation for client {}", record.client_id);
        Ok(())
    }
}
