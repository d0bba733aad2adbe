/*!
 * Tests for the document walkers
 */

use serde_json::{Value, json};
use std::sync::Arc;

use lingbridge::errors::{DocumentError, TranslationError};
use lingbridge::providers::mock::MockEngine;
use lingbridge::translation::{BatchProcessor, BatchStatus, DocumentFormat};

use crate::common::{self, mock_providers::StubTranslator};

fn processor(translator: Arc<StubTranslator>) -> BatchProcessor {
    BatchProcessor::new(Arc::new(common::stub_resolver(translator)))
}

#[tokio::test]
async fn test_lineWalker_withStubUppercase_shouldMatchExpectedOutput() {
    let outcome = processor(Arc::new(StubTranslator::new()))
        .process(DocumentFormat::Text, "Hello\n\nWorld\n", "eng_Latn", "zh")
        .await
        .unwrap();

    assert_eq!(outcome.document, "Hello\n\nWorld\n".to_uppercase());
    assert_eq!(outcome.units_translated, 2);
}

#[tokio::test]
async fn test_lineWalker_withPivot_shouldTranslateEachLineInTwoHops() {
    let translator = Arc::new(StubTranslator::new());
    let outcome = processor(translator.clone())
        .process(DocumentFormat::Text, "a\nb\n", "hin_Deva", "zh")
        .await
        .unwrap();

    assert_eq!(outcome.document, "A\nB\n");
    assert_eq!(translator.call_count(), 4);
}

#[tokio::test]
async fn test_lineWalker_withIdentityPair_shouldNotTranslate() {
    let translator = Arc::new(StubTranslator::new());
    let outcome = processor(translator.clone())
        .process(DocumentFormat::Text, "keep\nme\n", "zh", "zh")
        .await
        .unwrap();

    assert_eq!(outcome.document, "keep\nme\n");
    assert_eq!(outcome.units_translated, 2);
    assert_eq!(translator.call_count(), 0);
}

#[tokio::test]
async fn test_lineWalker_withEmptyDocument_shouldSucceedWithZeroUnits() {
    let outcome = processor(Arc::new(StubTranslator::new()))
        .process(DocumentFormat::Text, "", "eng_Latn", "zh")
        .await
        .unwrap();

    assert_eq!(outcome.document, "");
    assert_eq!(outcome.units_attempted, 0);
    assert_eq!(outcome.status, BatchStatus::Success);
}

#[tokio::test]
async fn test_treeWalker_withExampleDocument_shouldTranslateTwoLeaves() {
    let outcome = processor(Arc::new(StubTranslator::new()))
        .process(
            DocumentFormat::Json,
            r#"{"a": "hi", "b": {"c": "bye"}, "d": 5}"#,
            "eng_Latn",
            "hin_Deva",
        )
        .await
        .unwrap();

    let output: Value = serde_json::from_str(&outcome.document).unwrap();
    assert_eq!(output, json!({"a": "HI", "b": {"c": "BYE"}, "d": 5}));
    assert_eq!(outcome.units_translated, 2);
}

#[tokio::test]
async fn test_treeWalker_shouldKeepKeyOrderAndNonAscii() {
    let outcome = processor(Arc::new(StubTranslator::new()))
        .process(DocumentFormat::Json, r#"{"z": "ok", "a": "ß"}"#, "eng_Latn", "zh")
        .await
        .unwrap();

    let z = outcome.document.find("\"z\"").unwrap();
    let a = outcome.document.find("\"a\"").unwrap();
    assert!(z < a);
    assert!(outcome.document.contains("SS"));
}

#[tokio::test]
async fn test_treeWalker_withDeepNesting_shouldReachLeaves() {
    let mut document = json!("deep");
    for _ in 0..30 {
        document = json!({ "child": [document] });
    }

    let outcome = processor(Arc::new(StubTranslator::new()))
        .process(DocumentFormat::Json, &document.to_string(), "eng_Latn", "zh")
        .await
        .unwrap();

    assert!(outcome.document.contains("\"DEEP\""));
    assert_eq!(outcome.units_translated, 1);
}

#[tokio::test]
async fn test_treeWalker_withFailingLeaf_shouldAbortBatch() {
    let err = processor(Arc::new(StubTranslator::failing_on("bye")))
        .process(DocumentFormat::Json, r#"{"a": "hi", "b": "bye"}"#, "eng_Latn", "zh")
        .await
        .unwrap_err();
    assert!(matches!(err, TranslationError::Inference(_)));
}

#[tokio::test]
async fn test_tabularWalker_withFailingCell_shouldRevertThatCellOnly() {
    let translator = Arc::new(StubTranslator::failing_on("bye"));
    let outcome = processor(translator.clone())
        .process(DocumentFormat::Csv, "x\nhi\nbye\n", "eng_Latn", "zh")
        .await
        .unwrap();

    assert_eq!(outcome.document, "x\nHI\nbye\n");
    assert_eq!(outcome.units_translated, 1);
    assert_eq!(outcome.status, BatchStatus::Success);
    assert_eq!(translator.call_count(), 2);
}

#[tokio::test]
async fn test_tabularWalker_shouldQuoteCellsThatNeedIt() {
    let outcome = processor(Arc::new(StubTranslator::new()))
        .process(DocumentFormat::Csv, "name,note\nann,\"a, b\"\n", "eng_Latn", "zh")
        .await
        .unwrap();

    assert_eq!(outcome.document, "name,note\nANN,\"A, B\"\n");
}

#[tokio::test]
async fn test_tabularWalker_withHeaderOnly_shouldWriteHeader() {
    let outcome = processor(Arc::new(StubTranslator::new()))
        .process(DocumentFormat::Csv, "x,y\n", "eng_Latn", "zh")
        .await
        .unwrap();

    assert_eq!(outcome.document, "x,y\n");
    assert_eq!(outcome.units_attempted, 0);
}

#[tokio::test]
async fn test_tabularWalker_withUnsupportedPair_shouldFailBeforeParsing() {
    let translator = Arc::new(StubTranslator::new());
    let err = processor(translator.clone())
        .process(DocumentFormat::Csv, "not,\"valid", "fra_Latn", "zh")
        .await
        .unwrap_err();

    assert!(matches!(err, TranslationError::UnsupportedPair { .. }));
    assert_eq!(translator.call_count(), 0);
}

#[tokio::test]
async fn test_tabularWalker_withModelLoadFailure_shouldAbortWithoutOutput() {
    let dir = common::create_temp_dir().unwrap();
    let service = common::mock_service(MockEngine::uppercase().with_failing_loads(1), dir.path());
    let input = common::create_test_file(dir.path(), "notes.csv", "x\nhi\nbye\n").unwrap();

    let err = service
        .translate_document(&input, DocumentFormat::Csv, "eng_Latn", "zh")
        .await
        .unwrap_err();

    assert!(matches!(err, TranslationError::ModelLoad(_)));
    assert!(!dir.path().join("notes_translated.csv").exists());

    // The failed load is not cached; the next batch loads and succeeds
    let outcome = service
        .translate_document(&input, DocumentFormat::Csv, "eng_Latn", "zh")
        .await
        .unwrap();
    assert_eq!(outcome.units_translated, 2);
    assert!(dir.path().join("notes_translated.csv").exists());
}

#[test]
fn test_documentFormat_display_shouldMatchExtension() {
    assert_eq!(DocumentFormat::Csv.to_string(), "csv");
    assert_eq!(DocumentFormat::Text.extension(), "txt");
    assert!(matches!(
        "docx".parse::<DocumentFormat>(),
        Err(DocumentError::UnsupportedFormat(ext)) if ext == "docx"
    ));
}
