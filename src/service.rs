use std::sync::Arc;

use serde::Deserialize;
use tokio::sync::Semaphore;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::cache::{CacheKey, TranslationCache};
use crate::error::{Result, VerbaError};
use crate::language::LanguageRegistry;
use crate::persist::{RecordSink, TranslationRecord};
use crate::remote::TranslateApi;

/// One inbound translation request
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TranslationRequest {
    pub client_id: String,
    pub text: String,
    pub source_lang: String,
    pub target_lang: String,
}

/// Per-request translation orchestrator.
///
/// Splits the text into words, fans one lookup per word out onto the
/// process-wide worker pool, joins all lookups, and reassembles the result
/// in the original word order. The cache and the pool are shared across
/// every request served by this instance.
pub struct TranslationService {
    registry: LanguageRegistry,
    cache: Arc<TranslationCache>,
    api: Arc<dyn TranslateApi>,
    sink: Arc<dyn RecordSink>,
    permits: Arc<Semaphore>,
}

impl TranslationService {
    pub fn new(
        registry: LanguageRegistry,
        cache: Arc<TranslationCache>,
        api: Arc<dyn TranslateApi>,
        sink: Arc<dyn RecordSink>,
        pool_size: usize,
    ) -> Self {
        Self {
            registry,
            cache,
            api,
            sink,
            permits: Arc::new(Semaphore::new(pool_size)),
        }
    }

    pub fn registry(&self) -> &LanguageRegistry {
        &self.registry
    }

    /// Translate the request's text word by word.
    ///
    /// Returns the space-joined translation in original word order, or the
    /// first failure in position order after every lookup has reported.
    pub async fn translate(&self, request: &TranslationRequest) -> Result<String> {
        let request_id = Uuid::new_v4();
        info!(
            "Starting translation request {} ({} -> {})",
            request_id, request.source_lang, request.target_lang
        );

        validate_fields(request)?;
        self.registry
            .validate_pair(&request.source_lang, &request.target_lang)?;

        let words: Vec<String> = request
            .text
            .split_whitespace()
            .map(str::to_string)
            .collect();

        let translated = if words.is_empty() {
            String::new()
        } else {
            self.translate_words(&words, &request.source_lang, &request.target_lang)
                .await?
        };

        let record = TranslationRecord {
            client_id: request.client_id.clone(),
            original_text: request.text.clone(),
            translated_text: translated.clone(),
        };
        self.sink.record(&record).await?;

        info!("Translation request {} completed", request_id);
        Ok(translated)
    }

    async fn translate_words(&self, words: &[String], source: &str, target: &str) -> Result<String> {
        debug!("Dispatching {} word lookups", words.len());

        let mut handles: Vec<JoinHandle<(usize, Result<String>)>> =
            Vec::with_capacity(words.len());

        for (position, word) in words.iter().enumerate() {
            let word = word.clone();
            let source = source.to_string();
            let target = target.to_string();
            let cache = Arc::clone(&self.cache);
            let api = Arc::clone(&self.api);
            let permits = Arc::clone(&self.permits);

            handles.push(tokio::spawn(async move {
                let _permit = match permits.acquire_owned().await {
                    Ok(permit) => permit,
                    Err(e) => {
                        return (
                            position,
                            Err(VerbaError::Interrupted(format!("worker pool closed: {}", e))),
                        );
                    }
                };

                let outcome = lookup_word(&cache, api.as_ref(), &word, &source, &target).await;
                (position, outcome)
            }));
        }

        // Join every lookup before deciding the outcome. A failed word does
        // not cancel its siblings; they run to completion and still fill
        // the cache.
        let mut outcomes: Vec<Option<Result<String>>> = Vec::new();
        outcomes.resize_with(words.len(), || None);

        for handle in handles {
            match handle.await {
                Ok((position, outcome)) => outcomes[position] = Some(outcome),
                Err(e) => {
                    return Err(VerbaError::Interrupted(format!(
                        "word lookup did not finish: {}",
                        e
                    )));
                }
            }
        }

        let mut translated = Vec::with_capacity(words.len());
        for (position, outcome) in outcomes.into_iter().enumerate() {
            match outcome {
                Some(Ok(word)) => translated.push(word),
                Some(Err(e)) => {
                    warn!("Word at position {} failed: {}", position, e);
                    return Err(e);
                }
                None => {
                    return Err(VerbaError::Interrupted(format!(
                        "no outcome reported for word at position {}",
                        position
                    )));
                }
            }
        }

        Ok(translated.join(" "))
    }
}

/// One lookup: cache first, remote on miss, cache fill on remote success
async fn lookup_word(
    cache: &TranslationCache,
    api: &dyn TranslateApi,
    word: &str,
    source: &str,
    target: &str,
) -> Result<String> {
    let key = CacheKey::new(word, source, target);

    if let Some(cached) = cache.get(&key) {
        debug!("Cache hit for word '{}'", word);
        return Ok(cached);
    }

    let translated = api.translate_word(word, source, target).await?;
    cache.put(key, translated.clone());

    Ok(translated)
}

fn validate_fields(request: &TranslationRequest) -> Result<()> {
    if request.client_id.trim().is_empty() {
        return Err(VerbaError::Validation(
            "client identifier is required".to_string(),
        ));
    }
    if request.source_lang.trim().is_empty() {
        return Err(VerbaError::Validation(
            "source language is required".to_string(),
        ));
    }
    if request.target_lang.trim().is_empty() {
        return Err(VerbaError::Validation(
            "target language is required".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::time::Duration;

    use crate::persist::MockRecordSink;
    use crate::remote::MockTranslateApi;

    fn test_registry() -> LanguageRegistry {
        let mut languages = HashMap::new();
        languages.insert("ru".to_string(), "Russian".to_string());
        languages.insert("en".to_string(), "English".to_string());
        languages.insert("es".to_string(), "Spanish".to_string());
        LanguageRegistry::new(languages)
    }

    fn service(api: MockTranslateApi, sink: MockRecordSink) -> TranslationService {
        TranslationService::new(
            test_registry(),
            Arc::new(TranslationCache::new(Duration::from_secs(3600), 100)),
            Arc::new(api),
            Arc::new(sink),
            4,
        )
    }

    fn request(text: &str) -> TranslationRequest {
        TranslationRequest {
            client_id: "test-client".to_string(),
            text: text.to_string(),
            source_lang: "ru".to_string(),
            target_lang: "en".to_string(),
        }
    }

    fn recording_sink() -> MockRecordSink {
        let mut sink = MockRecordSink::new();
        sink.expect_record().returning(|_| Ok(()));
        sink
    }

    #[tokio::test]
    async fn test_translates_word_by_word_preserving_order() {
        let mut api = MockTranslateApi::new();
        api.expect_translate_word()
            .times(2)
            .returning(|word, _, _| match word {
                "привет" => Ok("hello".to_string()),
                "мир" => Ok("world".to_string()),
                other => Err(VerbaError::Upstream(format!("unexpected word '{}'", other))),
            });

        let mut sink = MockRecordSink::new();
        sink.expect_record()
            .withf(|record| {
                record.original_text == "привет мир" && record.translated_text == "hello world"
            })
            .times(1)
            .returning(|_| Ok(()));

        let service = service(api, sink);
        let translated = service.translate(&request("привет мир")).await.unwrap();
        assert_eq!(translated, "hello world");
    }

    #[tokio::test]
    async fn test_one_lookup_per_token() {
        let mut api = MockTranslateApi::new();
        api.expect_translate_word()
            .times(3)
            .returning(|word, _, _| Ok(word.to_uppercase()));

        let service = service(api, recording_sink());
        let translated = service.translate(&request("a b c")).await.unwrap();
        assert_eq!(translated, "A B C");
    }

    #[tokio::test]
    async fn test_cache_hit_avoids_remote_call() {
        let mut api = MockTranslateApi::new();
        api.expect_translate_word()
            .withf(|word, _, _| word == "привет")
            .times(1)
            .returning(|_, _, _| Ok("hello".to_string()));

        let service = service(api, recording_sink());

        let first = service.translate(&request("привет")).await.unwrap();
        let second = service.translate(&request("привет")).await.unwrap();
        assert_eq!(first, "hello");
        assert_eq!(second, "hello");
    }

    #[tokio::test]
    async fn test_expired_entry_triggers_fresh_remote_call() {
        let mut api = MockTranslateApi::new();
        api.expect_translate_word()
            .times(2)
            .returning(|_, _, _| Ok("hello".to_string()));

        let service = TranslationService::new(
            test_registry(),
            Arc::new(TranslationCache::new(Duration::from_millis(1), 100)),
            Arc::new(api),
            Arc::new(recording_sink()),
            4,
        );

        service.translate(&request("привет")).await.unwrap();
        tokio::time::sleep(Duration::from_millis(20)).await;
        service.translate(&request("привет")).await.unwrap();
    }

    #[tokio::test]
    async fn test_unsupported_source_fails_before_dispatch() {
        // No expectations: any remote call or sink write would panic.
        let api = MockTranslateApi::new();
        let sink = MockRecordSink::new();

        let service = service(api, sink);
        let mut req = request("привет мир");
        req.source_lang = "xx".to_string();

        let err = service.translate(&req).await.unwrap_err();
        assert!(matches!(err, VerbaError::Validation(_)));
        assert!(err.to_string().contains("source language 'xx'"));
    }

    #[tokio::test]
    async fn test_first_position_error_wins() {
        let mut api = MockTranslateApi::new();
        api.expect_translate_word()
            .times(3)
            .returning(|word, _, _| match word {
                "a" => Err(VerbaError::Upstream("alpha is down".to_string())),
                "b" => Ok("B".to_string()),
                _ => Err(VerbaError::Upstream("gamma is down".to_string())),
            });

        let sink = MockRecordSink::new();
        let service = service(api, sink);

        let err = service.translate(&request("a b c")).await.unwrap_err();
        assert!(err.to_string().contains("alpha is down"), "{}", err);
    }

    #[tokio::test]
    async fn test_empty_text_succeeds_without_dispatch() {
        let api = MockTranslateApi::new();

        let mut sink = MockRecordSink::new();
        sink.expect_record()
            .withf(|record| record.translated_text.is_empty())
            .times(1)
            .returning(|_| Ok(()));

        let service = service(api, sink);
        let translated = service.translate(&request("   ")).await.unwrap();
        assert_eq!(translated, "");
    }

    #[tokio::test]
    async fn test_persistence_failure_fails_the_request() {
        let mut api = MockTranslateApi::new();
        api.expect_translate_word()
            .returning(|_, _, _| Ok("hello".to_string()));

        let mut sink = MockRecordSink::new();
        sink.expect_record()
            .times(1)
            .returning(|_| Err(VerbaError::Persistence("disk full".to_string())));

        let service = service(api, sink);
        let err = service.translate(&request("привет")).await.unwrap_err();
        assert!(matches!(err, VerbaError::Persistence(_)));
    }

    #[tokio::test]
    async fn test_blank_client_id_is_rejected() {
        let service = service(MockTranslateApi::new(), MockRecordSink::new());
        let mut req = request("привет");
        req.client_id = "  ".to_string();

        let err = service.translate(&req).await.unwrap_err();
        assert!(matches!(err, VerbaError::Validation(_)));
    }
}
