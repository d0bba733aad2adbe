/*!
 * Tests for file utilities
 */

use std::path::{Path, PathBuf};

use lingbridge::file_utils::FileManager;

use crate::common;

#[test]
fn test_translatedOutputPath_withoutExtension_shouldOnlyAppendSuffix() {
    let path = FileManager::translated_output_path("/data/README", None);
    assert_eq!(path, PathBuf::from("/data/README_translated"));
}

#[test]
fn test_isTranslatedOutput_shouldRecognizeSuffix() {
    assert!(FileManager::is_translated_output("notes_translated.txt"));
    assert!(!FileManager::is_translated_output("notes.txt"));
    assert!(!FileManager::is_translated_output(Path::new("translated/notes.txt")));
}

#[test]
fn test_findDocuments_withEmptyDir_shouldReturnNothing() {
    let dir = common::create_temp_dir().unwrap();
    assert!(FileManager::find_documents(dir.path()).unwrap().is_empty());
}

#[test]
fn test_findDocuments_shouldReturnSortedSupportedFiles() {
    let dir = common::create_temp_dir().unwrap();
    common::create_test_file(dir.path(), "b.csv", "x\n").unwrap();
    common::create_test_file(dir.path(), "a.json", "{}").unwrap();
    common::create_test_file(dir.path(), "c.srt", "1").unwrap();

    let found = FileManager::find_documents(dir.path()).unwrap();
    assert_eq!(found, vec![dir.path().join("a.json"), dir.path().join("b.csv")]);
}

#[test]
fn test_fileAndDirExists_shouldDistinguishKinds() {
    let dir = common::create_temp_dir().unwrap();
    let file = common::create_test_file(dir.path(), "a.txt", "a").unwrap();

    assert!(FileManager::file_exists(&file));
    assert!(!FileManager::dir_exists(&file));
    assert!(FileManager::dir_exists(dir.path()));
    assert!(!FileManager::file_exists(dir.path().join("missing.txt")));
}

#[test]
fn test_readToString_withMissingFile_shouldFail() {
    let dir = common::create_temp_dir().unwrap();
    assert!(FileManager::read_to_string(dir.path().join("missing.txt")).is_err());
}
