/*!
 * Tests for the artifact store and inference engine implementations
 */

use std::path::PathBuf;

use lingbridge::app_config::{EngineFamily, ModelSpec};
use lingbridge::errors::{InferenceError, ModelLoadError};
use lingbridge::providers::local_store::LocalArtifactStore;
use lingbridge::providers::mock::{MockBehavior, MockEngine};
use lingbridge::providers::remote::RemoteEngine;
use lingbridge::providers::{ArtifactHandle, ArtifactStore, InferenceEngine};
use lingbridge::translation::profile::FamilyProfile;

use crate::common;

fn artifact(model_id: &str) -> ArtifactHandle {
    ArtifactHandle {
        model_id: model_id.to_string(),
        location: PathBuf::from("/nonexistent"),
        cached: false,
    }
}

#[tokio::test]
async fn test_localStore_shouldBeIdempotent() {
    let dir = common::create_temp_dir().unwrap();
    let store = LocalArtifactStore::new(dir.path(), false);
    let spec = ModelSpec::new("zh_to_en", "Helsinki-NLP/opus-mt-zh-en");

    let first = store.fetch_or_open(EngineFamily::OpusMt, &spec).await.unwrap();
    let second = store.fetch_or_open(EngineFamily::OpusMt, &spec).await.unwrap();

    assert_eq!(first.location, second.location);
    assert_eq!(first.location, dir.path().join("opus_mt").join("zh-to-en"));
    assert_eq!(first.model_id, "Helsinki-NLP/opus-mt-zh-en");
}

#[tokio::test]
async fn test_mockEngine_taggedBehavior_shouldPrefixModelId() {
    let engine = MockEngine::new(MockBehavior::Tagged);
    let model = engine
        .load(EngineFamily::OpusMt, &artifact("Helsinki-NLP/opus-mt-en-zh"))
        .await
        .unwrap();
    let params = FamilyProfile::for_family(EngineFamily::OpusMt).params;

    assert_eq!(
        model.generate("hello", &params).await.unwrap(),
        "[Helsinki-NLP/opus-mt-en-zh] hello"
    );
}

#[tokio::test]
async fn test_mockEngine_slowBehavior_shouldStillUppercase() {
    let engine = MockEngine::new(MockBehavior::Slow { delay_ms: 5 });
    let model = engine.load(EngineFamily::OpusMt, &artifact("m")).await.unwrap();
    let params = FamilyProfile::for_family(EngineFamily::OpusMt).params;

    assert_eq!(model.generate("slow", &params).await.unwrap(), "SLOW");
    assert!(model.supports_concurrent_generation());
}

#[tokio::test]
async fn test_mockEngine_exclusive_shouldReportNonConcurrentModels() {
    let engine = MockEngine::echo().exclusive();
    let model = engine.load(EngineFamily::IndicTrans, &artifact("m")).await.unwrap();
    assert!(!model.supports_concurrent_generation());
    assert!(engine.test_connection().await.is_ok());
    assert_eq!(engine.name(), "mock");
}

#[tokio::test]
async fn test_remoteEngine_withUnreachableServer_shouldFailCleanly() {
    let engine = RemoteEngine::new("http://127.0.0.1:1", 2).unwrap();

    let health = engine.test_connection().await;
    assert!(matches!(health, Err(InferenceError::RequestFailed(_))));

    let load = engine.load(EngineFamily::OpusMt, &artifact("Helsinki-NLP/opus-mt-en-zh")).await;
    assert!(matches!(load, Err(ModelLoadError::EngineConstruction { .. })));
    assert_eq!(engine.name(), "remote");
}
