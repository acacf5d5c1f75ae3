//! Tesseract 実機テスト
//!
//! tesseract がインストールされていない環境では何もしない

use ocr_batch::recognizer::{Recognizer, TesseractCli};

fn engine() -> TesseractCli {
    TesseractCli::new("tesseract")
}

#[tokio::test]
async fn test_version_and_languages() {
    let engine = engine();
    if engine.ensure_available().await.is_err() {
        eprintln!("tesseract not installed, skipping");
        return;
    }

    let version = engine.version().await.unwrap();
    assert!(!version.is_empty());

    let langs = engine.languages().await.unwrap();
    assert!(langs.iter().all(|lang| !lang.contains(' ')));
}
