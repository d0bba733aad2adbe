/*!
 * Collaborators of the translation engine.
 *
 * The engine never performs neural inference or artifact downloads itself.
 * It talks to two capabilities defined here:
 * - `ArtifactStore`: opens (fetching on first use if needed) model weights
 * - `InferenceEngine`: turns an artifact into a `LoadedModel` that generates text
 *
 * Implementations:
 * - `local_store`: filesystem artifact layout
 * - `remote`: HTTP inference server client
 * - `mock`: deterministic in-process engine for tests and dry runs
 */

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt::Debug;
use std::path::PathBuf;

use crate::app_config::{EngineFamily, ModelSpec};
use crate::errors::{InferenceError, ModelLoadError};

/// Decoding parameters passed to every generate call
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GenerationParams {
    /// Maximum length of the generated sequence
    pub max_length: usize,
    /// Beam search width
    pub num_beams: u32,
    /// Exponential length penalty applied to beam scores
    pub length_penalty: f32,
    /// Stop beams once `num_beams` finished candidates exist
    pub early_stopping: bool,
}

/// A locally addressable model artifact
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactHandle {
    /// Registry identifier
    pub model_id: String,
    /// Where the artifact lives (or will be materialized)
    pub location: PathBuf,
    /// Whether the weights were already present before this call
    pub cached: bool,
}

/// Store of model weights
#[async_trait]
pub trait ArtifactStore: Send + Sync + Debug {
    /// Open the artifact for a model, fetching it on first use
    ///
    /// Idempotent per model; safe to call from within the model cache's load path.
    async fn fetch_or_open(&self, family: EngineFamily, spec: &ModelSpec) -> Result<ArtifactHandle, ModelLoadError>;
}

/// Constructs inference-ready models
#[async_trait]
pub trait InferenceEngine: Send + Sync + Debug {
    /// Load a model from an artifact
    async fn load(&self, family: EngineFamily, artifact: &ArtifactHandle) -> Result<Box<dyn LoadedModel>, ModelLoadError>;

    /// Test the connection to the engine
    async fn test_connection(&self) -> Result<(), InferenceError>;

    /// Short engine name for diagnostics
    fn name(&self) -> &str;
}

/// A loaded model ready for generation
#[async_trait]
pub trait LoadedModel: Send + Sync + Debug {
    /// Generate decoded output for a preprocessed input
    async fn generate(&self, input: &str, params: &GenerationParams) -> Result<String, InferenceError>;

    /// Whether concurrent generate calls on this model are safe
    ///
    /// When false, callers serialize generation on the handle.
    fn supports_concurrent_generation(&self) -> bool {
        true
    }
}

pub mod local_store;
pub mod mock;
pub mod remote;
