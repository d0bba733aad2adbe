use async_trait::async_trait;
use log::debug;
use std::path::{Path, PathBuf};

use crate::app_config::{EngineFamily, ModelSpec};
use crate::errors::ModelLoadError;

use super::{ArtifactHandle, ArtifactStore};

/// Filesystem artifact store
///
/// Layout: `<base_dir>/<family>/<direction key with '_' replaced by '-'>`.
/// A model counts as cached when its directory exists and is non-empty;
/// otherwise the directory is created and the engine is expected to
/// materialize the weights there, unless `require_local` is set.
#[derive(Debug, Clone)]
pub struct LocalArtifactStore {
    base_dir: PathBuf,
    require_local: bool,
}

impl LocalArtifactStore {
    pub fn new(base_dir: impl Into<PathBuf>, require_local: bool) -> Self {
        Self {
            base_dir: base_dir.into(),
            require_local,
        }
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// Directory holding the artifact of one model
    pub fn artifact_dir(&self, family: EngineFamily, spec: &ModelSpec) -> PathBuf {
        self.base_dir
            .join(family.as_str())
            .join(spec.key.replace('_', "-"))
    }

    /// Create the per-family directories up front
    pub fn prepare(&self, families: &[EngineFamily]) -> std::io::Result<()> {
        for family in families {
            std::fs::create_dir_all(self.base_dir.join(family.as_str()))?;
        }
        Ok(())
    }

    async fn is_cached(path: &Path) -> bool {
        match tokio::fs::read_dir(path).await {
            Ok(mut entries) => matches!(entries.next_entry().await, Ok(Some(_))),
            Err(_) => false,
        }
    }
}

#[async_trait]
impl ArtifactStore for LocalArtifactStore {
    async fn fetch_or_open(&self, family: EngineFamily, spec: &ModelSpec) -> Result<ArtifactHandle, ModelLoadError> {
        let location = self.artifact_dir(family, spec);
        let cached = Self::is_cached(&location).await;

        if !cached {
            if self.require_local {
                return Err(ModelLoadError::ArtifactUnavailable {
                    model_id: spec.model_id.clone(),
                    reason: format!("no local artifact at {:?}", location),
                });
            }

            tokio::fs::create_dir_all(&location)
                .await
                .map_err(|e| ModelLoadError::ArtifactUnavailable {
                    model_id: spec.model_id.clone(),
                    reason: format!("cannot create {:?}: {}", location, e),
                })?;
        }

        debug!(
            "Artifact for {} at {:?} ({})",
            spec.model_id,
            location,
            if cached { "cached" } else { "to be fetched" }
        );

        Ok(ArtifactHandle {
            model_id: spec.model_id.clone(),
            location,
            cached,
        })
    }
}
