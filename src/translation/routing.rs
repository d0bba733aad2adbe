/*!
 * Language-pair routing.
 *
 * Decides whether a request is an identity no-op, a direct translation, a
 * two-hop pivot through the hub language, or unsupported, and drives the
 * direct translator accordingly. The only intermediate language ever used is
 * the catalog's hub.
 */

use log::debug;
use serde::Serialize;
use std::sync::Arc;

use crate::errors::TranslationError;

use super::catalog::{LanguageCatalog, LanguageCode};
use super::executor::DirectTranslator;

/// Outcome of route resolution for a (source, target) pair
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteDecision {
    /// Source and target are the same language
    Identity,
    /// A dedicated model serves the pair
    Direct,
    /// Two hops through the hub language
    Pivot,
    /// No route exists
    Unsupported,
}

/// How a text was translated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TranslationMethod {
    None,
    Direct,
    MultiStep,
}

/// Whether a translation request succeeded
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TranslationStatus {
    Success,
    Error,
}

/// Result of a single text translation
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TranslationResult {
    pub translated_text: String,
    pub translation_method: TranslationMethod,
    pub source_language: String,
    pub target_language: String,
    pub status: TranslationStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl TranslationResult {
    pub fn success(text: String, method: TranslationMethod, source: &str, target: &str) -> Self {
        Self {
            translated_text: text,
            translation_method: method,
            source_language: source.to_string(),
            target_language: target.to_string(),
            status: TranslationStatus::Success,
            error: None,
        }
    }

    pub fn failure(error: &TranslationError, source: &str, target: &str) -> Self {
        Self {
            translated_text: String::new(),
            translation_method: TranslationMethod::None,
            source_language: source.to_string(),
            target_language: target.to_string(),
            status: TranslationStatus::Error,
            error: Some(error.to_string()),
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == TranslationStatus::Success
    }
}

/// Resolves routes and executes them against a direct translator
pub struct RoutingResolver {
    catalog: Arc<LanguageCatalog>,
    translator: Arc<dyn DirectTranslator>,
}

impl RoutingResolver {
    pub fn new(catalog: Arc<LanguageCatalog>, translator: Arc<dyn DirectTranslator>) -> Self {
        Self { catalog, translator }
    }

    pub fn catalog(&self) -> &LanguageCatalog {
        &self.catalog
    }

    /// Decide how to route a pair
    pub fn resolve(&self, source: &str, target: &str) -> RouteDecision {
        if source == target {
            return RouteDecision::Identity;
        }

        if self.catalog.is_direct(source, target) {
            return RouteDecision::Direct;
        }

        let hub = self.catalog.hub_language().as_str();
        let source_reaches_hub = source == hub || self.catalog.is_direct(source, hub);
        let hub_reaches_target = target == hub || self.catalog.is_direct(hub, target);

        if source_reaches_hub && hub_reaches_target {
            RouteDecision::Pivot
        } else {
            RouteDecision::Unsupported
        }
    }

    /// Translate text along the resolved route
    pub async fn translate(
        &self,
        source: &str,
        target: &str,
        text: &str,
    ) -> Result<TranslationResult, TranslationError> {
        if text.trim().is_empty() {
            return Ok(TranslationResult::success(text.to_string(), TranslationMethod::None, source, target));
        }

        match self.resolve(source, target) {
            RouteDecision::Identity => {
                Ok(TranslationResult::success(text.to_string(), TranslationMethod::None, source, target))
            }
            RouteDecision::Direct => {
                let translated = self.translator.execute(source, target, text).await?;
                Ok(TranslationResult::success(translated, TranslationMethod::Direct, source, target))
            }
            RouteDecision::Pivot => {
                let hub = self.catalog.hub_language().as_str();
                debug!("Pivoting {} -> {} through {}", source, target, hub);

                // Unreachable while resolve() reports hub-endpoint pairs as Direct
                let intermediate = if source == hub {
                    text.to_string()
                } else {
                    self.translator.execute(source, hub, text).await?
                };

                let translated = if target == hub {
                    intermediate
                } else {
                    self.translator.execute(hub, target, &intermediate).await?
                };

                Ok(TranslationResult::success(translated, TranslationMethod::MultiStep, source, target))
            }
            RouteDecision::Unsupported => Err(TranslationError::unsupported_pair(source, target)),
        }
    }

    /// Targets reachable from a source, in catalog order
    pub fn available_targets(&self, source: &str, include_multistep: bool) -> Vec<LanguageCode> {
        if include_multistep {
            self.catalog
                .languages()
                .map(|(code, _)| code)
                .filter(|code| code.as_str() != source)
                .filter(|code| {
                    matches!(self.resolve(source, code.as_str()), RouteDecision::Direct | RouteDecision::Pivot)
                })
                .cloned()
                .collect()
        } else {
            self.catalog
                .direct_pairs()
                .iter()
                .filter(|pair| pair.source.as_str() == source)
                .map(|pair| pair.target.clone())
                .collect()
        }
    }
}
