/*!
 * Common test utilities for the lingbridge test suite
 */

use anyhow::Result;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tempfile::TempDir;

use lingbridge::app_config::Config;
use lingbridge::providers::local_store::LocalArtifactStore;
use lingbridge::providers::mock::MockEngine;
use lingbridge::translation::{LanguageCatalog, RoutingResolver, TranslationService};


use mock_providers::StubTranslator;

/// Creates a temporary directory for test files
pub fn create_temp_dir() -> Result<TempDir> {
    Ok(TempDir::new()?)
}

/// Creates a test file with the given content in the specified directory
pub fn create_test_file(dir: &Path, filename: &str, content: &str) -> Result<PathBuf> {
    let file_path = dir.join(filename);
    fs::write(&file_path, content)?;
    Ok(file_path)
}

/// Catalog built from the default configuration
pub fn default_catalog() -> Arc<LanguageCatalog> {
    Arc::new(Config::default().build_catalog().expect("default catalog is valid"))
}

/// Resolver over the default catalog driving a stub translator
pub fn stub_resolver(translator: Arc<StubTranslator>) -> RoutingResolver {
    RoutingResolver::new(default_catalog(), translator)
}

/// Service over the default configuration, storing artifacts under `dir`
pub fn mock_service(engine: MockEngine, dir: &Path) -> TranslationService {
    let store = LocalArtifactStore::new(dir.join("models"), false);
    TranslationService::with_engine(Config::default(), Arc::new(store), Arc::new(engine))
        .expect("default configuration is valid")
}
