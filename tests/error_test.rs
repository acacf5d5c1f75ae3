//! エラーケーステスト
//!
//! 各種エラー条件でのエラーハンドリングを検証

use ocr_batch::batch::ImageSource;
use ocr_batch::error::OcrBatchError;
use ocr_batch::recognizer::{validate_language, Recognizer, TesseractCli};
use ocr_batch::scanner;
use ocr_batch_common::parse_results;
use std::fs::File;
use std::path::{Path, PathBuf};
use tempfile::tempdir;

/// 存在しないフォルダをスキャンした場合
#[test]
fn test_scan_nonexistent_folder() {
    let result = scanner::scan_folder(Path::new("/nonexistent/path/12345"), false);
    assert!(matches!(result, Err(OcrBatchError::FolderNotFound(_))));
}

/// 空のフォルダをスキャンした場合
#[test]
fn test_scan_empty_folder() {
    let dir = tempdir().expect("Failed to create temp dir");
    let result = scanner::scan_folder(dir.path(), false);

    // 空フォルダはエラーではなく空のVecを返す
    assert!(result.unwrap().is_empty());
}

/// 存在しない入力ファイル
#[test]
fn test_collect_missing_input() {
    let result = scanner::collect_sources(&[PathBuf::from("/nonexistent/scan.png")], false);
    assert!(matches!(result, Err(OcrBatchError::FileNotFound(_))));
}

/// 画像以外のファイルはスキップされる
#[test]
fn test_collect_skips_non_images() {
    let dir = tempdir().expect("Failed to create temp dir");
    let note = dir.path().join("notes.txt");
    let scan = dir.path().join("scan.PNG");
    File::create(&note).unwrap();
    File::create(&scan).unwrap();

    let sources = scanner::collect_sources(&[note, scan], false).unwrap();
    assert_eq!(sources.len(), 1);
    assert_eq!(sources[0].name(), "scan.PNG");
}

/// 画像として判別できないバイト列
#[test]
fn test_bytes_not_an_image() {
    let result = ImageSource::from_bytes("clipboard", b"plain text".to_vec());
    assert!(matches!(result, Err(OcrBatchError::NotAnImage(_))));
}

/// 不正な言語コード
#[test]
fn test_invalid_language_codes() {
    for lang in ["", "eng jpn", "--psm", "eng+", "eng;rm"] {
        let result = validate_language(lang);
        assert!(matches!(result, Err(OcrBatchError::InvalidLanguage(_))), "{:?}", lang);
    }
}

/// 壊れた結果JSON
#[test]
fn test_invalid_results_json() {
    let result = parse_results("{ invalid json }");
    assert!(result.is_err());

    let err: OcrBatchError = result.unwrap_err().into();
    assert!(matches!(err, OcrBatchError::JsonParse(_)));
    assert!(err.to_string().starts_with("JSON解析エラー"));
}

/// tesseract が見つからない場合はサービス利用不可
#[tokio::test]
async fn test_missing_tesseract() {
    let engine = TesseractCli::new("/nonexistent/tesseract-12345");
    let err = engine.ensure_available().await.unwrap_err();

    assert!(matches!(err, OcrBatchError::ServiceUnavailable(_)));
    assert!(err.to_string().contains("--set-tesseract-path"));
}
