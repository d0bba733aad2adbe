use anyhow::{Result, anyhow};
use async_trait::async_trait;
use log::{debug, error};
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use url::Url;

use crate::app_config::EngineFamily;
use crate::errors::{InferenceError, ModelLoadError};

use super::{ArtifactHandle, GenerationParams, InferenceEngine, LoadedModel};

/// Client for an HTTP inference server hosting seq2seq translation models
#[derive(Debug, Clone)]
pub struct RemoteEngine {
    /// Base URL of the server, always ending in '/'
    base_url: Url,
    /// HTTP client shared by every model loaded through this engine
    client: Client,
}

/// Load request for the inference server
#[derive(Debug, Serialize, Deserialize)]
pub struct LoadRequest {
    /// Registry identifier of the model
    pub model_id: String,
    /// Engine family, selects the server-side tokenizer and architecture
    pub family: EngineFamily,
    /// Directory the server should read or populate
    pub cache_dir: String,
    /// Whether the weights are already in `cache_dir`
    pub cached: bool,
}

/// Load response from the inference server
#[derive(Debug, Serialize, Deserialize)]
pub struct LoadResponse {
    /// Identifier the server uses for the loaded model
    pub model_id: String,
    /// Whether the server accepts concurrent generate calls for the model
    #[serde(default = "default_concurrent")]
    pub concurrent: bool,
}

fn default_concurrent() -> bool {
    true
}

/// Generate request for the inference server
#[derive(Debug, Serialize, Deserialize)]
pub struct GenerateRequest {
    /// Loaded model to use
    pub model_id: String,
    /// Preprocessed input text
    pub inputs: String,
    /// Decoding parameters
    #[serde(flatten)]
    pub params: GenerationParams,
}

/// Generate response from the inference server
#[derive(Debug, Serialize, Deserialize)]
pub struct GenerateResponse {
    /// Decoded output text
    pub output: String,
}

impl RemoteEngine {
    /// Create a new client for the server at `endpoint`
    pub fn new(endpoint: &str, timeout_secs: u64) -> Result<Self> {
        if endpoint.trim().is_empty() {
            return Err(anyhow!("Endpoint cannot be empty"));
        }

        let with_scheme = if endpoint.starts_with("http://") || endpoint.starts_with("https://") {
            endpoint.to_string()
        } else {
            format!("http://{}", endpoint)
        };
        let with_slash = if with_scheme.ends_with('/') {
            with_scheme
        } else {
            format!("{}/", with_scheme)
        };

        let base_url = Url::parse(&with_slash)?;
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .pool_idle_timeout(Duration::from_secs(90))
            .build()?;

        Ok(Self { base_url, client })
    }

    /// Base URL of the server
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn url(&self, path: &str) -> Result<Url, url::ParseError> {
        self.base_url.join(path)
    }
}

#[async_trait]
impl InferenceEngine for RemoteEngine {
    async fn load(&self, family: EngineFamily, artifact: &ArtifactHandle) -> Result<Box<dyn LoadedModel>, ModelLoadError> {
        let construction = |reason: String| ModelLoadError::EngineConstruction {
            model_id: artifact.model_id.clone(),
            reason,
        };

        let url = self.url("models/load").map_err(|e| construction(e.to_string()))?;
        let request = LoadRequest {
            model_id: artifact.model_id.clone(),
            family,
            cache_dir: artifact.location.to_string_lossy().to_string(),
            cached: artifact.cached,
        };

        debug!("Requesting load of {} from {}", artifact.model_id, url);

        let response = self.client
            .post(url)
            .json(&request)
            .send()
            .await
            .map_err(|e| construction(format!("request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!("Model load rejected ({}): {}", status, body);
            return Err(construction(format!("{} - {}", status.as_u16(), body)));
        }

        let loaded: LoadResponse = response
            .json()
            .await
            .map_err(|e| construction(format!("invalid load response: {}", e)))?;

        let generate_url = self.url("generate").map_err(|e| construction(e.to_string()))?;

        Ok(Box::new(RemoteModel {
            client: self.client.clone(),
            generate_url,
            model_id: loaded.model_id,
            concurrent: loaded.concurrent,
        }))
    }

    async fn test_connection(&self) -> Result<(), InferenceError> {
        let url = self.url("health")
            .map_err(|e| InferenceError::RequestFailed(e.to_string()))?;

        let response = self.client
            .get(url)
            .send()
            .await
            .map_err(|e| InferenceError::RequestFailed(e.to_string()))?;

        if response.status().is_success() {
            Ok(())
        } else {
            Err(InferenceError::RequestFailed(format!(
                "health check returned {}",
                response.status()
            )))
        }
    }

    fn name(&self) -> &str {
        "remote"
    }
}

/// A model hosted by the inference server
#[derive(Debug)]
pub struct RemoteModel {
    client: Client,
    generate_url: Url,
    model_id: String,
    concurrent: bool,
}

/// Map a non-success status to an inference error
fn status_error(status: StatusCode, body: String) -> InferenceError {
    match status {
        StatusCode::TOO_MANY_REQUESTS | StatusCode::SERVICE_UNAVAILABLE | StatusCode::INSUFFICIENT_STORAGE => {
            InferenceError::ResourceExhausted(format!("{} - {}", status.as_u16(), body))
        }
        _ => InferenceError::GenerationFailed(format!("{} - {}", status.as_u16(), body)),
    }
}

#[async_trait]
impl LoadedModel for RemoteModel {
    async fn generate(&self, input: &str, params: &GenerationParams) -> Result<String, InferenceError> {
        let request = GenerateRequest {
            model_id: self.model_id.clone(),
            inputs: input.to_string(),
            params: *params,
        };

        let response = self.client
            .post(self.generate_url.clone())
            .json(&request)
            .send()
            .await
            .map_err(|e| InferenceError::RequestFailed(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(status_error(status, body));
        }

        let generated: GenerateResponse = response
            .json()
            .await
            .map_err(|e| InferenceError::InvalidResponse(e.to_string()))?;

        Ok(generated.output)
    }

    fn supports_concurrent_generation(&self) -> bool {
        self.concurrent
    }
}
