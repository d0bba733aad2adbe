/*!
 * Mock engine implementations for testing.
 *
 * This module provides an in-process engine whose models simulate different behaviors:
 * - `MockEngine::uppercase()` - Always succeeds, uppercasing the input
 * - `MockEngine::echo()` - Always succeeds, returning the input unchanged
 * - `MockEngine::failing()` - Every generate call fails
 * - `MockEngine::fail_on(text)` - Fails only for inputs containing `text`
 *
 * Mock models consume the family's input conventions the way real models do:
 * IndicTrans2 inputs carry a `<src> <tgt>` tag prefix which is stripped before
 * the behavior is applied.
 */

use async_trait::async_trait;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use crate::app_config::EngineFamily;
use crate::errors::{InferenceError, ModelLoadError};

use super::{ArtifactHandle, GenerationParams, InferenceEngine, LoadedModel};

/// Behavior mode for mock models
#[derive(Debug, Clone, PartialEq)]
pub enum MockBehavior {
    /// Uppercase the input
    Uppercase,
    /// Return the input unchanged
    Echo,
    /// Prefix the output with the model identifier
    Tagged,
    /// Always fails with an inference error
    Failing,
    /// Fails when the input contains the given text
    FailOn(String),
    /// Simulates slow generation before uppercasing
    Slow { delay_ms: u64 },
}

/// Mock engine for testing model loading and generation
#[derive(Debug, Clone)]
pub struct MockEngine {
    /// Behavior of every model this engine loads
    behavior: MockBehavior,
    /// Number of load calls
    load_count: Arc<AtomicUsize>,
    /// Number of generate calls across all models
    generate_count: Arc<AtomicUsize>,
    /// Number of initial load calls that fail
    failing_loads: Arc<AtomicUsize>,
    /// Artificial delay for each load
    load_delay: Duration,
    /// Whether loaded models accept concurrent generate calls
    concurrent: bool,
}

impl MockEngine {
    /// Create a new mock engine with the specified behavior
    pub fn new(behavior: MockBehavior) -> Self {
        Self {
            behavior,
            load_count: Arc::new(AtomicUsize::new(0)),
            generate_count: Arc::new(AtomicUsize::new(0)),
            failing_loads: Arc::new(AtomicUsize::new(0)),
            load_delay: Duration::ZERO,
            concurrent: true,
        }
    }

    /// Create a mock engine that uppercases input
    pub fn uppercase() -> Self {
        Self::new(MockBehavior::Uppercase)
    }

    /// Create a mock engine that echoes input
    pub fn echo() -> Self {
        Self::new(MockBehavior::Echo)
    }

    /// Create a mock engine whose models always fail
    pub fn failing() -> Self {
        Self::new(MockBehavior::Failing)
    }

    /// Create a mock engine failing on inputs containing `text`
    pub fn fail_on(text: &str) -> Self {
        Self::new(MockBehavior::FailOn(text.to_string()))
    }

    /// Make the first `count` load calls fail
    pub fn with_failing_loads(self, count: usize) -> Self {
        self.failing_loads.store(count, Ordering::SeqCst);
        self
    }

    /// Delay every load call
    pub fn with_load_delay(mut self, delay: Duration) -> Self {
        self.load_delay = delay;
        self
    }

    /// Mark loaded models as unsafe for concurrent generation
    pub fn exclusive(mut self) -> Self {
        self.concurrent = false;
        self
    }

    /// Number of load calls so far
    pub fn load_count(&self) -> usize {
        self.load_count.load(Ordering::SeqCst)
    }

    /// Number of generate calls so far
    pub fn generate_count(&self) -> usize {
        self.generate_count.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl InferenceEngine for MockEngine {
    async fn load(&self, family: EngineFamily, artifact: &ArtifactHandle) -> Result<Box<dyn LoadedModel>, ModelLoadError> {
        self.load_count.fetch_add(1, Ordering::SeqCst);

        if !self.load_delay.is_zero() {
            tokio::time::sleep(self.load_delay).await;
        }

        let should_fail = self
            .failing_loads
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok();
        if should_fail {
            return Err(ModelLoadError::EngineConstruction {
                model_id: artifact.model_id.clone(),
                reason: "Simulated load failure".to_string(),
            });
        }

        Ok(Box::new(MockModel {
            family,
            model_id: artifact.model_id.clone(),
            behavior: self.behavior.clone(),
            generate_count: Arc::clone(&self.generate_count),
            concurrent: self.concurrent,
        }))
    }

    async fn test_connection(&self) -> Result<(), InferenceError> {
        Ok(())
    }

    fn name(&self) -> &str {
        "mock"
    }
}

/// Model produced by `MockEngine`
#[derive(Debug)]
pub struct MockModel {
    family: EngineFamily,
    model_id: String,
    behavior: MockBehavior,
    generate_count: Arc<AtomicUsize>,
    concurrent: bool,
}

impl MockModel {
    /// Drop the language tags an IndicTrans2 model consumes
    fn strip_tags<'a>(&self, input: &'a str) -> &'a str {
        match self.family {
            EngineFamily::IndicTrans => input.splitn(3, ' ').nth(2).unwrap_or(""),
            EngineFamily::OpusMt => input,
        }
    }
}

#[async_trait]
impl LoadedModel for MockModel {
    async fn generate(&self, input: &str, _params: &GenerationParams) -> Result<String, InferenceError> {
        self.generate_count.fetch_add(1, Ordering::SeqCst);
        let body = self.strip_tags(input);

        match &self.behavior {
            MockBehavior::Uppercase => Ok(body.to_uppercase()),
            MockBehavior::Echo => Ok(body.to_string()),
            MockBehavior::Tagged => Ok(format!("[{}] {}", self.model_id, body)),
            MockBehavior::Failing => Err(InferenceError::GenerationFailed(
                "Simulated engine failure".to_string(),
            )),
            MockBehavior::FailOn(needle) => {
                if body.contains(needle.as_str()) {
                    Err(InferenceError::ResourceExhausted(format!(
                        "Simulated failure on '{}'",
                        needle
                    )))
                } else {
                    Ok(body.to_uppercase())
                }
            }
            MockBehavior::Slow { delay_ms } => {
                tokio::time::sleep(Duration::from_millis(*delay_ms)).await;
                Ok(body.to_uppercase())
            }
        }
    }

    fn supports_concurrent_generation(&self) -> bool {
        self.concurrent
    }
}
