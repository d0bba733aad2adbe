/*!
 * Tests for the model handle cache
 */

use std::sync::Arc;
use std::time::Duration;

use lingbridge::app_config::{EngineFamily, ModelsConfig};
use lingbridge::errors::ModelLoadError;
use lingbridge::providers::mock::MockEngine;
use lingbridge::translation::cache::ArtifactModelLoader;
use lingbridge::translation::{Direction, ModelCache, ModelKey};

use crate::common::mock_providers::{CountingLoader, RecordingStore};

fn all_keys() -> Vec<ModelKey> {
    let mut keys = Vec::new();
    for family in [EngineFamily::IndicTrans, EngineFamily::OpusMt] {
        for direction in [Direction::FromHub, Direction::ToHub] {
            keys.push(ModelKey::new(family, direction));
        }
    }
    keys
}

#[tokio::test]
async fn test_concurrentRequests_acrossKeys_shouldLoadEachKeyOnce() {
    let loader = Arc::new(CountingLoader::new(MockEngine::echo()).with_delay(Duration::from_millis(30)));
    let cache = Arc::new(ModelCache::new(loader.clone()));

    let mut tasks = Vec::new();
    for _ in 0..5 {
        for key in all_keys() {
            let cache = Arc::clone(&cache);
            tasks.push(tokio::spawn(async move { cache.get_or_load(&key).await.map(|h| h.key()) }));
        }
    }

    for task in tasks {
        task.await.unwrap().unwrap();
    }

    assert_eq!(loader.load_count(), 4);
    assert_eq!(cache.len(), 4);
    assert_eq!(cache.loaded_keys(), all_keys());
}

#[tokio::test]
async fn test_artifactLoader_shouldFetchRegisteredModelPerDirection() {
    let store = Arc::new(RecordingStore::new());
    let loader = ArtifactModelLoader::new(ModelsConfig::default().families, store.clone(), Arc::new(MockEngine::echo()));
    let cache = ModelCache::new(Arc::new(loader));

    let to_hub = cache
        .get_or_load(&ModelKey::new(EngineFamily::IndicTrans, Direction::ToHub))
        .await
        .unwrap();
    cache
        .get_or_load(&ModelKey::new(EngineFamily::IndicTrans, Direction::ToHub))
        .await
        .unwrap();
    cache
        .get_or_load(&ModelKey::new(EngineFamily::OpusMt, Direction::FromHub))
        .await
        .unwrap();

    assert_eq!(to_hub.model_id(), "ai4bharat/indictrans2-indic-en-dist-200M");
    assert_eq!(
        store.fetched(),
        vec![
            "ai4bharat/indictrans2-indic-en-dist-200M".to_string(),
            "Helsinki-NLP/opus-mt-en-zh".to_string(),
        ]
    );
}

#[tokio::test]
async fn test_unavailableArtifact_shouldNotPoisonOtherKeys() {
    let store = Arc::new(RecordingStore::unavailable());
    let loader = ArtifactModelLoader::new(ModelsConfig::default().families, store.clone(), Arc::new(MockEngine::echo()));
    let cache = ModelCache::new(Arc::new(loader));
    let key = ModelKey::new(EngineFamily::OpusMt, Direction::ToHub);

    for _ in 0..2 {
        let err = cache.get_or_load(&key).await.unwrap_err();
        assert!(matches!(err, ModelLoadError::ArtifactUnavailable { .. }));
    }

    // Each failed attempt leaves the key absent, so the store is asked again
    assert_eq!(store.fetched().len(), 2);
    assert!(cache.is_empty());
    assert_eq!(cache.stats().failures, 2);
}

#[test]
fn test_modelKey_display_shouldNameFamilyAndDirection() {
    assert_eq!(
        ModelKey::new(EngineFamily::IndicTrans, Direction::FromHub).to_string(),
        "indictrans2/from_hub"
    );
    assert_eq!(ModelKey::new(EngineFamily::OpusMt, Direction::ToHub).to_string(), "opus_mt/to_hub");
}
