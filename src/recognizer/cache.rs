//! 認識結果キャッシュ
//!
//! 画像内容のSHA-256 + 言語コードをキーにして認識結果を保持し、
//! 同じ画像の再認識をスキップする。保持はプロセス内のみ（ファイルには書かない）。

use super::Recognizer;
use crate::batch::ImageSource;
use crate::error::Result;
use async_trait::async_trait;
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::sync::Mutex;

/// 重複画像をスキップするラッパー
pub struct DedupRecognizer<R> {
    inner: R,
    entries: Mutex<HashMap<String, String>>,
}

impl<R: Recognizer> DedupRecognizer<R> {
    pub fn new(inner: R) -> Self {
        Self {
            inner,
            entries: Mutex::new(HashMap::new()),
        }
    }

    pub fn inner(&self) -> &R {
        &self.inner
    }

    /// キャッシュ件数
    pub fn len(&self) -> usize {
        self.entries.lock().map(|entries| entries.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lookup(&self, key: &str) -> Option<String> {
        self.entries.lock().ok()?.get(key).cloned()
    }

    fn store(&self, key: String, text: String) {
        if let Ok(mut entries) = self.entries.lock() {
            entries.insert(key, text);
        }
    }
}

/// キャッシュキー（画像内容のハッシュ + 言語）
pub(crate) async fn cache_key(source: &ImageSource, language: &str) -> Result<String> {
    let mut hasher = Sha256::new();
    match source {
        ImageSource::File(path) => hasher.update(tokio::fs::read(path).await?),
        ImageSource::Bytes { data, .. } => hasher.update(data),
    }
    Ok(format!("{}:{}", hex::encode(hasher.finalize()), language))
}

#[async_trait]
impl<R: Recognizer> Recognizer for DedupRecognizer<R> {
    async fn ensure_available(&self) -> Result<()> {
        self.inner.ensure_available().await
    }

    async fn recognize(
        &self,
        source: &ImageSource,
        language: &str,
        on_progress: &mut (dyn FnMut(f32) + Send),
    ) -> Result<String> {
        // ハッシュ計算失敗時はキャッシュを使わずに認識する
        let key = match cache_key(source, language).await {
            Ok(key) => key,
            Err(e) => {
                log::debug!("キャッシュキー計算失敗: {}: {}", source.name(), e);
                return self.inner.recognize(source, language, on_progress).await;
            }
        };

        if let Some(text) = self.lookup(&key) {
            log::debug!("キャッシュ使用: {}", source.name());
            on_progress(1.0);
            return Ok(text);
        }

        let text = self.inner.recognize(source, language, on_progress).await?;
        self.store(key, text.clone());
        Ok(text)
    }
}
