/*!
 * Tests for the error taxonomy
 */

use lingbridge::errors::{AppError, CatalogError, DocumentError, InferenceError, ModelLoadError, TranslationError};

#[test]
fn test_translationError_fromLayers_shouldWrapVariants() {
    let load: TranslationError = ModelLoadError::ArtifactUnavailable {
        model_id: "Helsinki-NLP/opus-mt-en-zh".to_string(),
        reason: "offline".to_string(),
    }
    .into();
    assert!(matches!(load, TranslationError::ModelLoad(_)));
    assert!(load.to_string().contains("opus-mt-en-zh"));

    let inference: TranslationError = InferenceError::GenerationFailed("beam search".to_string()).into();
    assert!(matches!(inference, TranslationError::Inference(_)));
}

#[test]
fn test_unreadableDocument_shouldBeNeitherRetryableNorClientError() {
    let err: TranslationError = DocumentError::Unreadable {
        path: "/tmp/x.txt".to_string(),
        reason: "permission denied".to_string(),
    }
    .into();
    assert!(!err.is_retryable());
    assert!(!err.is_client_error());
}

#[test]
fn test_unsupportedFormat_shouldBeClientError() {
    let err: TranslationError = DocumentError::UnsupportedFormat("xlsx".to_string()).into();
    assert!(err.is_client_error());
}

#[test]
fn test_appError_conversions() {
    let from_catalog: AppError = CatalogError::UnknownHub("fra_Latn".to_string()).into();
    assert!(from_catalog.to_string().contains("fra_Latn"));

    let from_io: AppError = std::io::Error::new(std::io::ErrorKind::NotFound, "gone").into();
    assert!(matches!(from_io, AppError::File(_)));

    let from_anyhow: AppError = anyhow::anyhow!("boom").into();
    assert!(matches!(from_anyhow, AppError::Unknown(message) if message == "boom"));

    let from_translation: AppError = TranslationError::unsupported_pair("a", "b").into();
    assert!(matches!(from_translation, AppError::Translation(_)));
}
