//! OCRエンジン連携
//!
//! バッチ実行器はこのトレイト越しにエンジンを呼ぶ。
//! - tesseract: Tesseract CLI（子プロセス）
//! - cache: 同一画像の再認識を省く（セッション内のみ）

mod cache;
mod tesseract;

pub use cache::DedupRecognizer;
pub use tesseract::{parse_language_list, parse_version, TesseractCli};

use crate::batch::ImageSource;
use crate::error::{OcrBatchError, Result};
use async_trait::async_trait;
use regex::Regex;

/// OCRエンジン
///
/// 1セッション内で何度でも逐次呼び出せること。
#[async_trait]
pub trait Recognizer: Send + Sync {
    /// エンジンが利用可能か確認（不可なら ServiceUnavailable）
    async fn ensure_available(&self) -> Result<()>;

    /// 画像1枚を認識してテキストを返す
    ///
    /// `on_progress` には 0.0-1.0 の進捗を通知する。
    async fn recognize(
        &self,
        source: &ImageSource,
        language: &str,
        on_progress: &mut (dyn FnMut(f32) + Send),
    ) -> Result<String>;
}

#[async_trait]
impl<R: Recognizer + ?Sized> Recognizer for Box<R> {
    async fn ensure_available(&self) -> Result<()> {
        (**self).ensure_available().await
    }

    async fn recognize(
        &self,
        source: &ImageSource,
        language: &str,
        on_progress: &mut (dyn FnMut(f32) + Send),
    ) -> Result<String> {
        (**self).recognize(source, language, on_progress).await
    }
}

/// 言語コードの検証（"eng", "eng+jpn", "chi_sim", "script/Latin" など）
pub fn validate_language(language: &str) -> Result<()> {
    lazy_static::lazy_static! {
        static ref LANGUAGE_RE: Regex =
            Regex::new(r"^[A-Za-z0-9_][A-Za-z0-9_\-/]*(\+[A-Za-z0-9_][A-Za-z0-9_\-/]*)*$").unwrap();
    }

    if LANGUAGE_RE.is_match(language) {
        Ok(())
    } else {
        Err(OcrBatchError::InvalidLanguage(language.to_string()))
    }
}
