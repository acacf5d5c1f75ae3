//! 重複画像スキップ機能テスト
//!
//! 同一内容の画像はエンジンを再度呼ばないことを検証

use async_trait::async_trait;
use ocr_batch::batch::{BatchRunner, ImageSource, ItemStatus, NoopObserver};
use ocr_batch::error::{OcrBatchError, Result};
use ocr_batch::recognizer::{DedupRecognizer, Recognizer};
use std::sync::atomic::{AtomicUsize, Ordering};

const PNG_HEADER: &[u8] = b"\x89PNG\r\n\x1a\n";

/// 呼び出し回数を数える認識器（内容の長さを返す）
#[derive(Default)]
struct CountingRecognizer {
    calls: AtomicUsize,
    fail: bool,
}

#[async_trait]
impl Recognizer for CountingRecognizer {
    async fn ensure_available(&self) -> Result<()> {
        Ok(())
    }

    async fn recognize(
        &self,
        source: &ImageSource,
        _language: &str,
        on_progress: &mut (dyn FnMut(f32) + Send),
    ) -> Result<String> {
        let n = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
        on_progress(1.0);
        if self.fail {
            return Err(OcrBatchError::Recognition(source.name()));
        }
        Ok(format!("call {}", n))
    }
}

fn image(name: &str, extra: &[u8]) -> ImageSource {
    let mut data = PNG_HEADER.to_vec();
    data.extend_from_slice(extra);
    ImageSource::from_bytes(name, data).expect("PNG header should be detected")
}

/// 同じ画像は1回だけ認識
#[tokio::test]
async fn test_duplicate_images_recognized_once() {
    let mut runner = BatchRunner::new(DedupRecognizer::new(CountingRecognizer::default()));
    runner.add_items(vec![
        image("a.png", b"same"),
        image("copy_of_a.png", b"same"),
        image("b.png", b"other"),
    ]);

    runner.start("eng", &mut NoopObserver).await.unwrap();

    assert_eq!(runner.recognizer().inner().calls.load(Ordering::SeqCst), 2);
    assert_eq!(runner.recognizer().len(), 2);

    let texts: Vec<_> = runner.results().iter().map(|e| e.text.as_str()).collect();
    assert_eq!(texts, vec!["call 1", "call 1", "call 2"]);
    // 名前は各アイテムのもの
    assert_eq!(runner.results()[1].name, "copy_of_a.png");
}

/// 言語が違えば別扱い
#[tokio::test]
async fn test_language_is_part_of_key() {
    let recognizer = DedupRecognizer::new(CountingRecognizer::default());
    let source = image("a.png", b"same");
    let mut progress = |_: f32| {};

    recognizer.recognize(&source, "eng", &mut progress).await.unwrap();
    recognizer.recognize(&source, "jpn", &mut progress).await.unwrap();
    recognizer.recognize(&source, "eng", &mut progress).await.unwrap();

    assert_eq!(recognizer.inner().calls.load(Ordering::SeqCst), 2);
}

/// 失敗はキャッシュしない
#[tokio::test]
async fn test_failures_not_cached() {
    let mut runner = BatchRunner::new(DedupRecognizer::new(CountingRecognizer {
        fail: true,
        ..Default::default()
    }));
    runner.add_items(vec![image("a.png", b"same"), image("a2.png", b"same")]);

    runner.start("eng", &mut NoopObserver).await.unwrap();

    assert_eq!(runner.recognizer().inner().calls.load(Ordering::SeqCst), 2);
    assert!(runner.recognizer().is_empty());
    assert_eq!(runner.queue().statuses(), vec![ItemStatus::Error, ItemStatus::Error]);
}

/// ファイル入力は内容でハッシュする
#[tokio::test]
async fn test_file_sources_hashed_by_content() {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let first = dir.path().join("first.png");
    let second = dir.path().join("second.png");
    std::fs::write(&first, b"identical").unwrap();
    std::fs::write(&second, b"identical").unwrap();

    let recognizer = DedupRecognizer::new(CountingRecognizer::default());
    let mut progress = |_: f32| {};
    recognizer.recognize(&ImageSource::from_path(&first), "eng", &mut progress).await.unwrap();
    recognizer.recognize(&ImageSource::from_path(&second), "eng", &mut progress).await.unwrap();

    assert_eq!(recognizer.inner().calls.load(Ordering::SeqCst), 1);
}
