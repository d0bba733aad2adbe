/*!
 * Direct translation execution.
 *
 * Runs one hop of a route whose pair the resolver already found to be
 * direct: picks the engine family and model key, obtains the cached handle,
 * preprocesses, generates with the family's fixed parameters and cleans up
 * the decoded output.
 */

use async_trait::async_trait;
use log::debug;
use std::sync::Arc;

use crate::errors::TranslationError;

use super::cache::{Direction, ModelCache, ModelKey};
use super::catalog::LanguageCatalog;
use super::profile::FamilyProfile;

/// Translates one direct hop
#[async_trait]
pub trait DirectTranslator: Send + Sync {
    /// Translate `text` for a pair known to be direct
    async fn execute(&self, source: &str, target: &str, text: &str) -> Result<String, TranslationError>;
}

/// Executes direct hops against cached model handles
pub struct TranslationExecutor {
    catalog: Arc<LanguageCatalog>,
    cache: Arc<ModelCache>,
}

impl TranslationExecutor {
    pub fn new(catalog: Arc<LanguageCatalog>, cache: Arc<ModelCache>) -> Self {
        Self { catalog, cache }
    }

    /// Model key serving a direct pair
    pub fn model_key(&self, source: &str, target: &str) -> Option<ModelKey> {
        let family = self.catalog.family_for(source, target)?;
        let direction = if source == self.catalog.hub_language().as_str() {
            Direction::FromHub
        } else {
            Direction::ToHub
        };
        Some(ModelKey::new(family, direction))
    }
}

#[async_trait]
impl DirectTranslator for TranslationExecutor {
    async fn execute(&self, source: &str, target: &str, text: &str) -> Result<String, TranslationError> {
        let key = self
            .model_key(source, target)
            .ok_or_else(|| TranslationError::unsupported_pair(source, target))?;

        let handle = self.cache.get_or_load(&key).await?;
        let profile = FamilyProfile::for_family(key.family);

        let input = handle.preprocessor().preprocess(text, source, target);
        debug!("Generating {} -> {} with {}", source, target, handle.model_id());

        let decoded = handle.generate(&input, &profile.params).await?;
        Ok(handle.preprocessor().postprocess(&decoded, target))
    }
}
