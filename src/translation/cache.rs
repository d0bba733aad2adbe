/*!
 * Model handle caching.
 *
 * Loading a model is expensive, so each (engine family, direction) key is
 * loaded at most once per process and the handle is shared afterwards.
 * Concurrent first requests for the same key wait on a per-key lock and
 * observe the handle produced by whichever request loaded it. A failed or
 * cancelled load leaves the key absent so a later call can retry.
 */

use async_trait::async_trait;
use log::{debug, info, warn};
use parking_lot::{Mutex, RwLock};
use serde::Serialize;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Instant;

use crate::app_config::{EngineFamily, FamilyModels, ModelSpec};
use crate::errors::{InferenceError, ModelLoadError};
use crate::providers::{ArtifactStore, GenerationParams, InferenceEngine, LoadedModel};

use super::profile::Preprocessor;

/// Direction of a model relative to the hub language
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    /// Translates out of the hub language
    FromHub,
    /// Translates into the hub language
    ToHub,
}

/// Cache key: one handle per family and direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct ModelKey {
    pub family: EngineFamily,
    pub direction: Direction,
}

impl ModelKey {
    pub fn new(family: EngineFamily, direction: Direction) -> Self {
        Self { family, direction }
    }
}

impl fmt::Display for ModelKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let direction = match self.direction {
            Direction::FromHub => "from_hub",
            Direction::ToHub => "to_hub",
        };
        write!(f, "{}/{}", self.family, direction)
    }
}

/// A loaded model together with its preprocessor
#[derive(Debug)]
pub struct ModelHandle {
    key: ModelKey,
    model_id: String,
    model: Box<dyn LoadedModel>,
    preprocessor: Preprocessor,
    /// Serializes generation for models that are not safe to share
    gate: Option<tokio::sync::Mutex<()>>,
}

impl ModelHandle {
    pub fn new(key: ModelKey, model_id: impl Into<String>, model: Box<dyn LoadedModel>) -> Self {
        let gate = if model.supports_concurrent_generation() {
            None
        } else {
            Some(tokio::sync::Mutex::new(()))
        };

        Self {
            key,
            model_id: model_id.into(),
            model,
            preprocessor: Preprocessor::for_family(key.family),
            gate,
        }
    }

    pub fn key(&self) -> ModelKey {
        self.key
    }

    pub fn model_id(&self) -> &str {
        &self.model_id
    }

    pub fn preprocessor(&self) -> &Preprocessor {
        &self.preprocessor
    }

    /// Run generation, holding the handle's gate when the model requires it
    pub async fn generate(&self, input: &str, params: &GenerationParams) -> Result<String, InferenceError> {
        match &self.gate {
            Some(gate) => {
                let _exclusive = gate.lock().await;
                self.model.generate(input, params).await
            }
            None => self.model.generate(input, params).await,
        }
    }
}

/// Produces model handles for the cache
#[async_trait]
pub trait ModelLoader: Send + Sync {
    /// Load the handle for a key
    async fn load(&self, key: &ModelKey) -> Result<ModelHandle, ModelLoadError>;
}

/// Loader that resolves the model identifier from the registry, opens the
/// artifact and asks the inference engine to construct the model
#[derive(Debug)]
pub struct ArtifactModelLoader {
    registry: Vec<FamilyModels>,
    store: Arc<dyn ArtifactStore>,
    engine: Arc<dyn InferenceEngine>,
}

impl ArtifactModelLoader {
    pub fn new(registry: Vec<FamilyModels>, store: Arc<dyn ArtifactStore>, engine: Arc<dyn InferenceEngine>) -> Self {
        Self { registry, store, engine }
    }

    /// Registered model for a key
    pub fn spec_for(&self, key: &ModelKey) -> Option<&ModelSpec> {
        self.registry
            .iter()
            .find(|f| f.family == key.family)
            .map(|f| match key.direction {
                Direction::FromHub => &f.from_hub,
                Direction::ToHub => &f.to_hub,
            })
    }
}

#[async_trait]
impl ModelLoader for ArtifactModelLoader {
    async fn load(&self, key: &ModelKey) -> Result<ModelHandle, ModelLoadError> {
        let spec = self
            .spec_for(key)
            .ok_or_else(|| ModelLoadError::UnknownModel(key.to_string()))?;

        let artifact = self.store.fetch_or_open(key.family, spec).await?;
        let model = self.engine.load(key.family, &artifact).await?;

        Ok(ModelHandle::new(*key, spec.model_id.clone(), model))
    }
}

/// Cache statistics
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct CacheStats {
    /// Lookups answered from the cache
    pub hits: usize,
    /// Lookups that had to wait for or perform a load
    pub misses: usize,
    /// Successful loads
    pub loads: usize,
    /// Failed loads
    pub failures: usize,
    /// Handles currently cached
    pub cached: usize,
}

/// Process-wide cache of model handles
pub struct ModelCache {
    loader: Arc<dyn ModelLoader>,

    /// Published handles
    handles: RwLock<HashMap<ModelKey, Arc<ModelHandle>>>,

    /// Per-key load locks
    load_locks: Mutex<HashMap<ModelKey, Arc<tokio::sync::Mutex<()>>>>,

    hits: AtomicUsize,
    misses: AtomicUsize,
    loads: AtomicUsize,
    failures: AtomicUsize,
}

impl ModelCache {
    /// Create an empty cache backed by a loader
    pub fn new(loader: Arc<dyn ModelLoader>) -> Self {
        Self {
            loader,
            handles: RwLock::new(HashMap::new()),
            load_locks: Mutex::new(HashMap::new()),
            hits: AtomicUsize::new(0),
            misses: AtomicUsize::new(0),
            loads: AtomicUsize::new(0),
            failures: AtomicUsize::new(0),
        }
    }

    fn lookup(&self, key: &ModelKey) -> Option<Arc<ModelHandle>> {
        self.handles.read().get(key).cloned()
    }

    /// Get the handle for a key, loading it on first use
    pub async fn get_or_load(&self, key: &ModelKey) -> Result<Arc<ModelHandle>, ModelLoadError> {
        if let Some(handle) = self.lookup(key) {
            self.hits.fetch_add(1, Ordering::Relaxed);
            debug!("Model cache hit for {}", key);
            return Ok(handle);
        }

        self.misses.fetch_add(1, Ordering::Relaxed);
        debug!("Model cache miss for {}", key);

        let key_lock = {
            let mut locks = self.load_locks.lock();
            Arc::clone(locks.entry(*key).or_default())
        };
        let _loading = key_lock.lock().await;

        // Another request may have published the handle while we waited
        if let Some(handle) = self.lookup(key) {
            self.load_locks.lock().remove(key);
            return Ok(handle);
        }

        info!("Loading model for {}", key);
        let start = Instant::now();

        match self.loader.load(key).await {
            Ok(handle) => {
                let handle = Arc::new(handle);
                self.handles.write().insert(*key, Arc::clone(&handle));
                // Published handles are found by lookup; the load lock is no longer needed
                self.load_locks.lock().remove(key);
                self.loads.fetch_add(1, Ordering::Relaxed);
                info!("Loaded {} ({}) in {:.1}s", key, handle.model_id(), start.elapsed().as_secs_f64());
                Ok(handle)
            }
            Err(e) => {
                self.failures.fetch_add(1, Ordering::Relaxed);
                warn!("Failed to load model for {}: {}", key, e);
                Err(e)
            }
        }
    }

    /// Whether a handle is cached for the key
    pub fn contains(&self, key: &ModelKey) -> bool {
        self.handles.read().contains_key(key)
    }

    /// Keys of every cached handle, sorted
    pub fn loaded_keys(&self) -> Vec<ModelKey> {
        let mut keys: Vec<ModelKey> = self.handles.read().keys().copied().collect();
        keys.sort();
        keys
    }

    /// Get the number of cached handles
    pub fn len(&self) -> usize {
        self.handles.read().len()
    }

    /// Check if the cache is empty
    pub fn is_empty(&self) -> bool {
        self.handles.read().is_empty()
    }

    /// Get cache statistics
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            loads: self.loads.load(Ordering::Relaxed),
            failures: self.failures.load(Ordering::Relaxed),
            cached: self.len(),
        }
    }
}
