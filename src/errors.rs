/*!
 * Error types for the lingbridge engine.
 *
 * Each layer has its own error enum, defined with the thiserror crate:
 * catalog construction, model loading, inference, document parsing and the
 * translation layer that ties them together.
 */

use thiserror::Error;

/// Errors raised while building the language catalog from configuration
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CatalogError {
    /// The catalog has no languages at all
    #[error("Language catalog is empty")]
    Empty,

    /// The same language code is declared twice
    #[error("Duplicate language code in catalog: {0}")]
    DuplicateLanguage(String),

    /// The hub language is not part of the catalog
    #[error("Hub language '{0}' is not in the catalog")]
    UnknownHub(String),

    /// A direct pair references a code absent from the catalog
    #[error("Direct pair {source_language} -> {target_language} references unknown language '{code}'")]
    UnknownLanguage {
        /// Source side of the offending pair
        source_language: String,
        /// Target side of the offending pair
        target_language: String,
        /// The code that was not found
        code: String,
    },

    /// A direct pair maps a language onto itself
    #[error("Direct pair maps '{0}' onto itself")]
    SelfPair(String),

    /// The same direct pair is declared twice
    #[error("Duplicate direct pair: {0} -> {1}")]
    DuplicatePair(String, String),

    /// A direct pair touches neither side of the hub, so no model direction serves it
    #[error("Direct pair {0} -> {1} must start or end at hub language '{2}'")]
    PairBypassesHub(String, String, String),
}

/// Errors that occur while materializing a model handle
#[derive(Error, Debug, Clone)]
pub enum ModelLoadError {
    /// No model identifier is registered for the requested key
    #[error("No model registered for {0}")]
    UnknownModel(String),

    /// The artifact store could not provide the model weights
    #[error("Model artifact '{model_id}' unavailable: {reason}")]
    ArtifactUnavailable {
        /// Registry identifier of the model
        model_id: String,
        /// Why the artifact could not be opened
        reason: String,
    },

    /// The inference engine failed to construct the model
    #[error("Engine failed to load '{model_id}': {reason}")]
    EngineConstruction {
        /// Registry identifier of the model
        model_id: String,
        /// Engine-reported failure
        reason: String,
    },
}

/// Errors reported by the inference engine on a generate call
#[derive(Error, Debug, Clone)]
pub enum InferenceError {
    /// Generation failed for the given input
    #[error("Generation failed: {0}")]
    GenerationFailed(String),

    /// The engine ran out of memory, slots or similar
    #[error("Inference resources exhausted: {0}")]
    ResourceExhausted(String),

    /// Transport to the engine failed
    #[error("Inference request failed: {0}")]
    RequestFailed(String),

    /// The engine answered with something that could not be decoded
    #[error("Failed to decode inference response: {0}")]
    InvalidResponse(String),
}

/// Errors raised by the document walkers before or after translation
#[derive(Error, Debug)]
pub enum DocumentError {
    /// The input document could not be read
    #[error("Cannot read document {path}: {reason}")]
    Unreadable {
        /// Path of the document
        path: String,
        /// Underlying reason
        reason: String,
    },

    /// The document does not parse under its declared format
    #[error("Document is not valid {format}: {message}")]
    Format {
        /// Declared format name
        format: String,
        /// Parser message
        message: String,
    },

    /// The translated document could not be serialized or written
    #[error("Cannot write document {path}: {reason}")]
    Write {
        /// Path of the output document
        path: String,
        /// Underlying reason
        reason: String,
    },

    /// The format tag or extension is not one of the supported formats
    #[error("Unsupported document format: {0}")]
    UnsupportedFormat(String),
}

/// Errors that can occur during translation
#[derive(Error, Debug)]
pub enum TranslationError {
    /// Neither a direct nor a pivot route exists for the pair
    #[error("Unsupported language pair: {source_language} -> {target_language}")]
    UnsupportedPair {
        /// Requested source language
        source_language: String,
        /// Requested target language
        target_language: String,
    },

    /// A model handle could not be loaded
    #[error("Model load error: {0}")]
    ModelLoad(#[from] ModelLoadError),

    /// The inference engine failed on valid input
    #[error("Inference error: {0}")]
    Inference(#[from] InferenceError),

    /// The document could not be read, parsed or written
    #[error("Document error: {0}")]
    Document(#[from] DocumentError),
}

impl TranslationError {
    /// Create an unsupported pair error for the two codes
    pub fn unsupported_pair(source: impl Into<String>, target: impl Into<String>) -> Self {
        Self::UnsupportedPair {
            source_language: source.into(),
            target_language: target.into(),
        }
    }

    /// Whether a later call with the same input may succeed
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::ModelLoad(_) | Self::Inference(_))
    }

    /// Whether the failure stems from the caller's input
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Self::UnsupportedPair { .. }
                | Self::Document(DocumentError::Format { .. })
                | Self::Document(DocumentError::UnsupportedFormat(_))
        )
    }
}

/// Main application error type that wraps all other errors
#[derive(Error, Debug)]
pub enum AppError {
    /// Error from a file operation
    #[error("File error: {0}")]
    File(String),

    /// Error in the configuration or catalog
    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),

    /// Error from translation
    #[error("Translation error: {0}")]
    Translation(#[from] TranslationError),

    /// Any other error
    #[error("Unknown error: {0}")]
    Unknown(String),
}

impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        Self::Unknown(error.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(error: std::io::Error) -> Self {
        Self::File(error.to_string())
    }
}
