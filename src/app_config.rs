use anyhow::{Context, Result, anyhow};
use serde::{Deserialize, Serialize};
use std::default::Default;
use std::path::Path;

use crate::translation::catalog::LanguageCatalog;

/// Application configuration module
/// This module handles the engine configuration including loading,
/// validating and saving configuration settings.
/// Represents the application configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Config {
    /// Pivot language used to bridge pairs without a direct model
    #[serde(default = "default_hub_language")]
    pub hub_language: String,

    /// Supported languages
    #[serde(default = "default_languages")]
    pub languages: Vec<LanguageEntry>,

    /// Language pairs served by a dedicated model
    #[serde(default = "default_direct_pairs")]
    pub direct_pairs: Vec<DirectPairConfig>,

    /// Model registry and artifact layout
    #[serde(default)]
    pub models: ModelsConfig,

    /// Inference engine connection
    #[serde(default)]
    pub engine: EngineConfig,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// Engine family serving a direct pair
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum EngineFamily {
    // @family: IndicTrans2 (Indic languages <-> English)
    #[serde(rename = "indictrans2")]
    IndicTrans,
    // @family: OPUS-MT (Marian models, one per direction)
    OpusMt,
}

impl EngineFamily {
    // @returns: Human-readable family name
    pub fn display_name(&self) -> &str {
        match self {
            Self::IndicTrans => "IndicTrans2",
            Self::OpusMt => "OPUS-MT",
        }
    }

    // @returns: Identifier used in config files and artifact paths
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::IndicTrans => "indictrans2",
            Self::OpusMt => "opus_mt",
        }
    }
}

impl std::fmt::Display for EngineFamily {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for EngineFamily {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "indictrans2" | "indictrans" => Ok(Self::IndicTrans),
            "opus_mt" | "opus-mt" | "opus" => Ok(Self::OpusMt),
            _ => Err(anyhow!("Invalid engine family: {}", s)),
        }
    }
}

/// A supported language
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct LanguageEntry {
    /// Catalog tag, e.g. `eng_Latn` or `zh`
    pub code: String,

    /// Display name
    pub name: String,
}

impl LanguageEntry {
    pub fn new(code: &str, name: &str) -> Self {
        Self {
            code: code.to_string(),
            name: name.to_string(),
        }
    }
}

/// A directly modeled language pair and the family that serves it
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct DirectPairConfig {
    pub source: String,
    pub target: String,
    pub family: EngineFamily,
}

impl DirectPairConfig {
    pub fn new(source: &str, target: &str, family: EngineFamily) -> Self {
        Self {
            source: source.to_string(),
            target: target.to_string(),
            family,
        }
    }
}

/// One model in the registry
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct ModelSpec {
    /// Direction key, also used as the artifact directory name
    pub key: String,

    /// Registry identifier of the weights
    pub model_id: String,
}

impl ModelSpec {
    pub fn new(key: &str, model_id: &str) -> Self {
        Self {
            key: key.to_string(),
            model_id: model_id.to_string(),
        }
    }
}

/// Models for one engine family, one per direction relative to the hub
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct FamilyModels {
    pub family: EngineFamily,

    /// Model translating out of the hub language
    pub from_hub: ModelSpec,

    /// Model translating into the hub language
    pub to_hub: ModelSpec,
}

/// Model registry and artifact layout
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ModelsConfig {
    /// Root directory of the artifact store
    #[serde(default = "default_models_dir")]
    pub models_dir: String,

    /// Refuse to load models whose artifacts are not already on disk
    #[serde(default)]
    pub require_local: bool,

    /// Registered models per family
    #[serde(default = "default_families")]
    pub families: Vec<FamilyModels>,
}

impl Default for ModelsConfig {
    fn default() -> Self {
        Self {
            models_dir: default_models_dir(),
            require_local: false,
            families: default_families(),
        }
    }
}

impl ModelsConfig {
    /// Get the registered models for a family
    pub fn family(&self, family: EngineFamily) -> Option<&FamilyModels> {
        self.families.iter().find(|f| f.family == family)
    }
}

/// Inference engine connection settings
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct EngineConfig {
    /// Base URL of the inference server
    #[serde(default = "default_engine_endpoint")]
    pub endpoint: String,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            endpoint: default_engine_endpoint(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// Log verbosity level
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

fn default_hub_language() -> String {
    "eng_Latn".to_string()
}

fn default_languages() -> Vec<LanguageEntry> {
    vec![
        LanguageEntry::new("eng_Latn", "English"),
        LanguageEntry::new("hin_Deva", "Hindi"),
        LanguageEntry::new("urd_Arab", "Urdu"),
        LanguageEntry::new("zh", "Chinese"),
    ]
}

fn default_direct_pairs() -> Vec<DirectPairConfig> {
    vec![
        DirectPairConfig::new("eng_Latn", "hin_Deva", EngineFamily::IndicTrans),
        DirectPairConfig::new("hin_Deva", "eng_Latn", EngineFamily::IndicTrans),
        DirectPairConfig::new("eng_Latn", "urd_Arab", EngineFamily::IndicTrans),
        DirectPairConfig::new("urd_Arab", "eng_Latn", EngineFamily::IndicTrans),
        DirectPairConfig::new("eng_Latn", "zh", EngineFamily::OpusMt),
        DirectPairConfig::new("zh", "eng_Latn", EngineFamily::OpusMt),
    ]
}

fn default_families() -> Vec<FamilyModels> {
    vec![
        FamilyModels {
            family: EngineFamily::IndicTrans,
            from_hub: ModelSpec::new("en_to_indic", "ai4bharat/indictrans2-en-indic-dist-200M"),
            to_hub: ModelSpec::new("indic_to_en", "ai4bharat/indictrans2-indic-en-dist-200M"),
        },
        FamilyModels {
            family: EngineFamily::OpusMt,
            from_hub: ModelSpec::new("en_to_zh", "Helsinki-NLP/opus-mt-en-zh"),
            to_hub: ModelSpec::new("zh_to_en", "Helsinki-NLP/opus-mt-zh-en"),
        },
    ]
}

fn default_models_dir() -> String {
    "ds_models/translation".to_string()
}

fn default_engine_endpoint() -> String {
    "http://localhost:8089".to_string()
}

fn default_timeout_secs() -> u64 {
    120
}

impl Config {
    /// Load a configuration from a JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;

        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {:?}", path))
    }

    /// Save the configuration as pretty JSON
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let content = serde_json::to_string_pretty(self)
            .context("Failed to serialize config to JSON")?;

        std::fs::write(path, content)
            .with_context(|| format!("Failed to write config file: {:?}", path))
    }

    /// Build the language catalog described by this configuration
    pub fn build_catalog(&self) -> Result<LanguageCatalog> {
        let catalog = LanguageCatalog::new(
            self.languages.iter().map(|l| (l.code.clone(), l.name.clone())),
            &self.hub_language,
            self.direct_pairs
                .iter()
                .map(|p| (p.source.clone(), p.target.clone(), p.family)),
        )?;
        Ok(catalog)
    }

    /// Validate the configuration for consistency and required values
    pub fn validate(&self) -> Result<()> {
        self.build_catalog()
            .context("Invalid language catalog")?;

        for pair in &self.direct_pairs {
            if self.models.family(pair.family).is_none() {
                return Err(anyhow!(
                    "No models registered for family '{}' used by {} -> {}",
                    pair.family, pair.source, pair.target
                ));
            }
        }

        if self.engine.endpoint.trim().is_empty() {
            return Err(anyhow!("Inference engine endpoint cannot be empty"));
        }

        Ok(())
    }
}

/// Default implementation for Config
impl Default for Config {
    fn default() -> Self {
        Config {
            hub_language: default_hub_language(),
            languages: default_languages(),
            direct_pairs: default_direct_pairs(),
            models: ModelsConfig::default(),
            engine: EngineConfig::default(),
            log_level: LogLevel::default(),
        }
    }
}
