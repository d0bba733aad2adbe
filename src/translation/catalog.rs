/*!
 * Language catalog.
 *
 * Static registry of supported language codes, the designated hub language
 * and the set of directly modeled pairs. Built once at startup and shared
 * read-only afterwards. Construction fails if the pair set references a code
 * the catalog does not know, or declares a pair with no hub endpoint.
 */

use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::collections::{HashMap, HashSet};
use std::fmt;

use crate::app_config::EngineFamily;
use crate::errors::CatalogError;

/// Identifier of a supported language, compared by value
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LanguageCode(String);

impl LanguageCode {
    pub fn new(code: impl Into<String>) -> Self {
        Self(code.into().trim().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for LanguageCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Borrow<str> for LanguageCode {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&str> for LanguageCode {
    fn from(code: &str) -> Self {
        Self::new(code)
    }
}

impl PartialEq<str> for LanguageCode {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for LanguageCode {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

/// An ordered (source, target) pair served by a dedicated model
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DirectPair {
    pub source: LanguageCode,
    pub target: LanguageCode,
    pub family: EngineFamily,
}

/// Registry of supported languages and direct pairs
#[derive(Debug, Clone)]
pub struct LanguageCatalog {
    /// Languages in declaration order with their display names
    languages: Vec<(LanguageCode, String)>,

    /// Hub language for two-hop routes
    hub: LanguageCode,

    /// Direct pairs in declaration order
    pairs: Vec<DirectPair>,

    /// source -> target -> family
    pair_index: HashMap<LanguageCode, HashMap<LanguageCode, EngineFamily>>,
}

impl LanguageCatalog {
    /// Build a catalog, rejecting inconsistent pair sets
    pub fn new<L, P>(languages: L, hub: &str, pairs: P) -> Result<Self, CatalogError>
    where
        L: IntoIterator<Item = (String, String)>,
        P: IntoIterator<Item = (String, String, EngineFamily)>,
    {
        let mut seen = HashSet::new();
        let mut entries = Vec::new();
        for (code, name) in languages {
            let code = LanguageCode::new(code);
            if !seen.insert(code.clone()) {
                return Err(CatalogError::DuplicateLanguage(code.0));
            }
            entries.push((code, name));
        }

        if entries.is_empty() {
            return Err(CatalogError::Empty);
        }

        let hub = LanguageCode::new(hub);
        if !seen.contains(&hub) {
            return Err(CatalogError::UnknownHub(hub.0));
        }

        let mut direct = Vec::new();
        let mut pair_index: HashMap<LanguageCode, HashMap<LanguageCode, EngineFamily>> = HashMap::new();
        for (source, target, family) in pairs {
            let source = LanguageCode::new(source);
            let target = LanguageCode::new(target);

            for code in [&source, &target] {
                if !seen.contains(code) {
                    return Err(CatalogError::UnknownLanguage {
                        source_language: source.0.clone(),
                        target_language: target.0.clone(),
                        code: code.0.clone(),
                    });
                }
            }

            if source == target {
                return Err(CatalogError::SelfPair(source.0));
            }

            // Models are keyed by direction relative to the hub
            if source != hub && target != hub {
                return Err(CatalogError::PairBypassesHub(source.0, target.0, hub.0.clone()));
            }

            let targets = pair_index.entry(source.clone()).or_default();
            if targets.insert(target.clone(), family).is_some() {
                return Err(CatalogError::DuplicatePair(source.0, target.0));
            }

            direct.push(DirectPair { source, target, family });
        }

        Ok(Self {
            languages: entries,
            hub,
            pairs: direct,
            pair_index,
        })
    }

    /// Whether the code names a supported language
    pub fn is_supported(&self, code: &str) -> bool {
        self.languages.iter().any(|(c, _)| c == code)
    }

    /// The pivot language
    pub fn hub_language(&self) -> &LanguageCode {
        &self.hub
    }

    /// Direct pairs in declaration order
    pub fn direct_pairs(&self) -> &[DirectPair] {
        &self.pairs
    }

    /// Whether a dedicated model exists for the pair
    pub fn is_direct(&self, source: &str, target: &str) -> bool {
        self.family_for(source, target).is_some()
    }

    /// Engine family serving a direct pair
    pub fn family_for(&self, source: &str, target: &str) -> Option<EngineFamily> {
        self.pair_index
            .get(source)
            .and_then(|targets| targets.get(target))
            .copied()
    }

    /// Supported languages in declaration order
    pub fn languages(&self) -> impl Iterator<Item = (&LanguageCode, &str)> {
        self.languages.iter().map(|(code, name)| (code, name.as_str()))
    }

    /// Display name of a supported language
    pub fn language_name(&self, code: &str) -> Option<&str> {
        self.languages
            .iter()
            .find(|(c, _)| c == code)
            .map(|(_, name)| name.as_str())
    }

    /// Engine families referenced by at least one direct pair
    pub fn families(&self) -> Vec<EngineFamily> {
        let mut families: Vec<EngineFamily> = self.pairs.iter().map(|p| p.family).collect();
        families.sort();
        families.dedup();
        families
    }
}
