/*!
 * Tests for configuration loading, validation and catalog construction
 */

use lingbridge::app_config::{Config, DirectPairConfig, EngineFamily, LanguageEntry, LogLevel};
use lingbridge::errors::CatalogError;

use crate::common;

#[test]
fn test_default_shouldValidate() {
    let config = Config::default();
    assert!(config.validate().is_ok());
    assert_eq!(config.hub_language, "eng_Latn");
    assert_eq!(config.log_level, LogLevel::Info);
}

#[test]
fn test_fromFile_withPartialJson_shouldFillDefaults() {
    let dir = common::create_temp_dir().unwrap();
    let path = common::create_test_file(dir.path(), "conf.json", r#"{"log_level": "debug"}"#).unwrap();

    let config = Config::from_file(&path).unwrap();
    assert_eq!(config.log_level, LogLevel::Debug);
    assert_eq!(config.languages.len(), 4);
    assert_eq!(config.direct_pairs.len(), 6);
    assert_eq!(config.engine.timeout_secs, 120);
}

#[test]
fn test_saveToFile_thenLoad_shouldKeepCustomPairs() {
    let dir = common::create_temp_dir().unwrap();
    let path = dir.path().join("conf.json");

    let mut config = Config::default();
    config.languages.push(LanguageEntry::new("ben_Beng", "Bengali"));
    config
        .direct_pairs
        .push(DirectPairConfig::new("eng_Latn", "ben_Beng", EngineFamily::IndicTrans));
    config.save_to_file(&path).unwrap();

    let loaded = Config::from_file(&path).unwrap();
    let catalog = loaded.build_catalog().unwrap();
    assert!(catalog.is_direct("eng_Latn", "ben_Beng"));
    assert_eq!(catalog.family_for("eng_Latn", "ben_Beng"), Some(EngineFamily::IndicTrans));
}

#[test]
fn test_buildCatalog_withPairOutsideCatalog_shouldFailFast() {
    let mut config = Config::default();
    config
        .direct_pairs
        .push(DirectPairConfig::new("eng_Latn", "fra_Latn", EngineFamily::OpusMt));

    let err = config.build_catalog().unwrap_err();
    let catalog_error = err.downcast_ref::<CatalogError>().unwrap();
    assert!(matches!(catalog_error, CatalogError::UnknownLanguage { code, .. } if code == "fra_Latn"));
    assert!(config.validate().is_err());
}

#[test]
fn test_validate_withPairBetweenNonHubLanguages_shouldFail() {
    let mut config = Config::default();
    config
        .direct_pairs
        .push(DirectPairConfig::new("hin_Deva", "urd_Arab", EngineFamily::IndicTrans));

    let err = config.build_catalog().unwrap_err();
    let catalog_error = err.downcast_ref::<CatalogError>().unwrap();
    assert_eq!(
        catalog_error,
        &CatalogError::PairBypassesHub("hin_Deva".into(), "urd_Arab".into(), "eng_Latn".into())
    );
    assert!(config.validate().is_err());
}
