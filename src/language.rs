use std::collections::HashMap;

use tracing::info;

use crate::config::RegistryConfig;
use crate::error::{Result, VerbaError};
use crate::remote::TranslateApi;

/// Supported-language set, populated once at startup from the translation
/// resource or from static configuration. Queries are read-only afterwards.
pub struct LanguageRegistry {
    languages: HashMap<String, String>,
}

impl LanguageRegistry {
    /// Create a registry from a code -> display name map
    pub fn new(languages: HashMap<String, String>) -> Self {
        Self { languages }
    }

    /// Populate the registry once at startup: a non-empty static list in the
    /// configuration wins, otherwise the set is fetched from the translation
    /// resource.
    pub async fn bootstrap(config: &RegistryConfig, api: &dyn TranslateApi) -> Result<Self> {
        if config.languages.is_empty() {
            info!("Fetching supported languages from the translation resource");
            let languages = api.fetch_languages().await?;
            info!("Registry initialized with {} languages", languages.len());
            Ok(Self::new(languages))
        } else {
            info!(
                "Using {} statically configured languages",
                config.languages.len()
            );
            Ok(Self::new(config.languages.clone()))
        }
    }

    /// Check whether a language code is in the supported set
    pub fn is_supported(&self, code: &str) -> bool {
        self.languages.contains_key(code)
    }

    /// Validate a source/target pair, failing before any work is dispatched.
    /// The message names which side of the pair is unsupported.
    pub fn validate_pair(&self, source: &str, target: &str) -> Result<()> {
        if !self.is_supported(source) {
            return Err(VerbaError::Validation(format!(
                "source language '{}' is not supported",
                source
            )));
        }
        if !self.is_supported(target) {
            return Err(VerbaError::Validation(format!(
                "target language '{}' is not supported",
                target
            )));
        }
        Ok(())
    }

    pub fn languages(&self) -> &HashMap<String, String> {
        &self.languages
    }

    pub fn len(&self) -> usize {
        self.languages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.languages.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry() -> LanguageRegistry {
        let mut languages = HashMap::new();
        languages.insert("ru".to_string(), "Russian".to_string());
        languages.insert("en".to_string(), "English".to_string());
        LanguageRegistry::new(languages)
    }

    #[test]
    fn test_membership() {
        let registry = registry();
        assert!(registry.is_supported("ru"));
        assert!(registry.is_supported("en"));
        assert!(!registry.is_supported("xx"));
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn test_unsupported_source_names_source() {
        let err = registry().validate_pair("xx", "en").unwrap_err();
        let message = err.to_string();
        assert!(message.contains("source language 'xx'"), "{}", message);
    }

    #[test]
    fn test_unsupported_target_names_target() {
        let err = registry().validate_pair("ru", "yy").unwrap_err();
        let message = err.to_string();
        assert!(message.contains("target language 'yy'"), "{}", message);
    }

    #[test]
    fn test_valid_pair_passes() {
        assert!(registry().validate_pair("ru", "en").is_ok());
    }

    #[tokio::test]
    async fn test_bootstrap_prefers_static_configuration() {
        // No expectations: a remote fetch would panic.
        let api = crate::remote::MockTranslateApi::new();

        let mut languages = HashMap::new();
        languages.insert("de".to_string(), "German".to_string());
        let config = RegistryConfig { languages };

        let registry = LanguageRegistry::bootstrap(&config, &api).await.unwrap();
        assert!(registry.is_supported("de"));
        assert_eq!(registry.len(), 1);
    }

    #[tokio::test]
    async fn test_bootstrap_fetches_when_no_static_list() {
        let mut api = crate::remote::MockTranslateApi::new();
        api.expect_fetch_languages().times(1).returning(|| {
            let mut languages = HashMap::new();
            languages.insert("ru".to_string(), "Russian".to_string());
            Ok(languages)
        });

        let registry = LanguageRegistry::bootstrap(&RegistryConfig::default(), &api)
            .await
            .unwrap();
        assert!(registry.is_supported("ru"));
    }
}
