/*!
 * Core translation service implementation.
 *
 * `TranslationService` composes the catalog, model cache, executor, resolver
 * and batch processor from a configuration and exposes the operations
 * callers use: single-text translation, document translation and catalog
 * queries.
 */

use anyhow::{Context, Result};
use log::{error, info, warn};
use serde::Serialize;
use std::path::Path;
use std::sync::Arc;

use crate::app_config::Config;
use crate::errors::{DocumentError, InferenceError, TranslationError};
use crate::file_utils::FileManager;
use crate::providers::local_store::LocalArtifactStore;
use crate::providers::remote::RemoteEngine;
use crate::providers::{ArtifactStore, InferenceEngine};

use super::batch::{BatchOutcome, BatchProcessor, DocumentFormat};
use super::cache::{ArtifactModelLoader, CacheStats, ModelCache};
use super::catalog::{DirectPair, LanguageCatalog, LanguageCode};
use super::executor::TranslationExecutor;
use super::routing::{RoutingResolver, TranslationResult};

/// A supported language with its display name
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LanguageInfo {
    pub code: LanguageCode,
    pub name: String,
}

/// Languages and pairs the service can translate
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SupportedLanguages {
    pub languages: Vec<LanguageInfo>,
    pub direct_pairs: Vec<DirectPair>,
    pub hub_language: LanguageCode,
    /// Pairs reachable through the hub are translated in two hops
    pub multistep_available: bool,
}

/// Diagnostics about the running service
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SystemInfo {
    pub engine: String,
    pub hub_language: LanguageCode,
    pub families: Vec<String>,
    pub direct_pairs: usize,
    pub loaded_models: Vec<String>,
    pub cache: CacheStats,
}

/// Translation service façade
pub struct TranslationService {
    config: Config,
    catalog: Arc<LanguageCatalog>,
    cache: Arc<ModelCache>,
    resolver: Arc<RoutingResolver>,
    batch: BatchProcessor,
    engine: Arc<dyn InferenceEngine>,
}

impl TranslationService {
    /// Create a service talking to the configured inference server
    pub fn new(config: Config) -> Result<Self> {
        let models_dir = FileManager::expand_home(&config.models.models_dir);
        let store = LocalArtifactStore::new(models_dir, config.models.require_local);
        let families: Vec<_> = config.models.families.iter().map(|f| f.family).collect();
        store
            .prepare(&families)
            .with_context(|| format!("Failed to prepare models directory {:?}", store.base_dir()))?;

        let engine = RemoteEngine::new(&config.engine.endpoint, config.engine.timeout_secs)
            .context("Failed to create inference engine client")?;

        Self::with_engine(config, Arc::new(store), Arc::new(engine))
    }

    /// Create a service with explicit collaborators
    pub fn with_engine(
        config: Config,
        store: Arc<dyn ArtifactStore>,
        engine: Arc<dyn InferenceEngine>,
    ) -> Result<Self> {
        config.validate()?;

        let catalog = Arc::new(config.build_catalog()?);
        let loader = ArtifactModelLoader::new(config.models.families.clone(), store, Arc::clone(&engine));
        let cache = Arc::new(ModelCache::new(Arc::new(loader)));
        let executor = TranslationExecutor::new(Arc::clone(&catalog), Arc::clone(&cache));
        let resolver = Arc::new(RoutingResolver::new(Arc::clone(&catalog), Arc::new(executor)));
        let batch = BatchProcessor::new(Arc::clone(&resolver));

        info!(
            "Translation service ready: {} languages, {} direct pairs, hub {} ({})",
            catalog.languages().count(),
            catalog.direct_pairs().len(),
            catalog.hub_language(),
            engine.name()
        );

        Ok(Self {
            config,
            catalog,
            cache,
            resolver,
            batch,
            engine,
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn catalog(&self) -> &LanguageCatalog {
        &self.catalog
    }

    pub fn cache(&self) -> &ModelCache {
        &self.cache
    }

    pub fn resolver(&self) -> &RoutingResolver {
        &self.resolver
    }

    /// Check that the inference engine is reachable
    pub async fn test_connection(&self) -> Result<(), InferenceError> {
        self.engine.test_connection().await
    }

    /// Translate a single text
    ///
    /// Routing, loading and inference failures are reported in the result
    /// with status `error`, never swallowed.
    pub async fn translate_text(&self, text: &str, source: &str, target: &str) -> TranslationResult {
        match self.resolver.translate(source, target, text).await {
            Ok(result) => result,
            Err(e) => {
                if e.is_client_error() {
                    warn!("Rejected translation {} -> {}: {}", source, target, e);
                } else {
                    error!("Translation {} -> {} failed: {}", source, target, e);
                }
                TranslationResult::failure(&e, source, target)
            }
        }
    }

    /// Translate a document held in memory
    pub async fn translate_content(
        &self,
        content: &str,
        format: DocumentFormat,
        source: &str,
        target: &str,
    ) -> Result<BatchOutcome, TranslationError> {
        self.batch.process(format, content, source, target).await
    }

    /// Translate a document, writing `<stem>_translated.<ext>` next to it
    pub async fn translate_document(
        &self,
        path: &Path,
        format: DocumentFormat,
        source: &str,
        target: &str,
    ) -> Result<BatchOutcome, TranslationError> {
        let output = FileManager::translated_output_path(path, None);
        self.translate_document_to(path, &output, format, source, target)
            .await
    }

    /// Translate a document into an explicit output path
    pub async fn translate_document_to(
        &self,
        input: &Path,
        output: &Path,
        format: DocumentFormat,
        source: &str,
        target: &str,
    ) -> Result<BatchOutcome, TranslationError> {
        let content = tokio::fs::read_to_string(input)
            .await
            .map_err(|e| DocumentError::Unreadable {
                path: input.display().to_string(),
                reason: e.to_string(),
            })?;

        let mut outcome = match self.batch.process(format, &content, source, target).await {
            Ok(outcome) => outcome,
            Err(e) => {
                error!("Batch translation of {:?} failed: {}", input, e);
                return Err(e);
            }
        };

        write_output(output, &outcome.document).await?;
        info!("Wrote {:?}", output);

        outcome.input_file = Some(input.display().to_string());
        outcome.output_file = Some(output.display().to_string());
        Ok(outcome)
    }

    /// Supported languages and direct pairs
    pub fn list_supported_languages(&self) -> SupportedLanguages {
        SupportedLanguages {
            languages: self
                .catalog
                .languages()
                .map(|(code, name)| LanguageInfo {
                    code: code.clone(),
                    name: name.to_string(),
                })
                .collect(),
            direct_pairs: self.catalog.direct_pairs().to_vec(),
            hub_language: self.catalog.hub_language().clone(),
            multistep_available: true,
        }
    }

    /// Targets reachable from `source`
    pub fn list_available_targets(&self, source: &str, include_multistep: bool) -> Vec<LanguageCode> {
        self.resolver.available_targets(source, include_multistep)
    }

    /// Engine, catalog and cache diagnostics
    pub fn system_info(&self) -> SystemInfo {
        SystemInfo {
            engine: self.engine.name().to_string(),
            hub_language: self.catalog.hub_language().clone(),
            families: self
                .catalog
                .families()
                .iter()
                .map(|family| family.display_name().to_string())
                .collect(),
            direct_pairs: self.catalog.direct_pairs().len(),
            loaded_models: self.cache.loaded_keys().iter().map(|key| key.to_string()).collect(),
            cache: self.cache.stats(),
        }
    }
}

async fn write_output(output: &Path, document: &str) -> Result<(), DocumentError> {
    let write_error = |path: &Path, e: std::io::Error| DocumentError::Write {
        path: path.display().to_string(),
        reason: e.to_string(),
    };

    if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent)
            .await
            .map_err(|e| write_error(parent, e))?;
    }

    tokio::fs::write(output, document)
        .await
        .map_err(|e| write_error(output, e))
}
