use crate::error::{OcrBatchError, Result};
use crate::recognizer::validate_language;
use ocr_batch_common::layout::DEFAULT_ATTRIBUTION;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Tesseract実行ファイルの上書き用環境変数
pub const TESSERACT_ENV: &str = "OCR_BATCH_TESSERACT";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub tesseract_path: Option<String>,
    pub tessdata_path: Option<String>,
    pub default_language: String,
    /// ページセグメンテーションモード（--psm）
    pub psm: u8,
    /// OCRエンジンモード（--oem）
    pub oem: u8,
    pub timeout_seconds: u64,
    /// 出力ファイル名（拡張子なし）
    pub output_name: String,
    /// PDFフッターの表記
    pub attribution: String,
}

impl Default for Config {
    fn default() -> Self {
        Self::default_config()
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            let config: Config = serde_json::from_str(&content)?;
            Ok(config)
        } else {
            Ok(Self::default_config())
        }
    }

    pub fn save(&self) -> Result<()> {
        let config_path = Self::config_path()?;

        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(&config_path, content)?;
        log::debug!("設定を保存: {}", config_path.display());
        Ok(())
    }

    pub fn config_path() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| OcrBatchError::Config("ホームディレクトリが見つかりません".into()))?;
        Ok(home.join(".config").join("ocr-batch").join("config.json"))
    }

    fn default_config() -> Self {
        Self {
            tesseract_path: None,
            tessdata_path: None,
            default_language: "eng".into(),
            psm: 3,  // 完全自動ページ分割
            oem: 3,  // エンジン既定
            timeout_seconds: 120,
            output_name: "ocr_batch".into(),
            attribution: DEFAULT_ATTRIBUTION.into(),
        }
    }

    /// Tesseract実行ファイル（環境変数 > 設定 > PATH）
    pub fn tesseract_binary(&self) -> String {
        if let Ok(path) = std::env::var(TESSERACT_ENV) {
            if !path.trim().is_empty() {
                return path;
            }
        }

        self.tesseract_path
            .clone()
            .unwrap_or_else(|| "tesseract".to_string())
    }

    pub fn set_default_language(&mut self, language: String) -> Result<()> {
        validate_language(&language)?;
        self.default_language = language;
        self.save()
    }

    pub fn set_tesseract_path(&mut self, path: String) -> Result<()> {
        self.tesseract_path = Some(path);
        self.save()
    }

    pub fn set_tessdata_path(&mut self, path: String) -> Result<()> {
        self.tessdata_path = Some(path);
        self.save()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.default_language, "eng");
        assert_eq!(config.output_name, "ocr_batch");
        assert_eq!(config.timeout_seconds, 120);
        assert!(config.tesseract_path.is_none());
    }

    #[test]
    fn test_partial_config_fills_defaults() {
        let config: Config = serde_json::from_str(r#"{"default_language": "jpn"}"#).unwrap();
        assert_eq!(config.default_language, "jpn");
        assert_eq!(config.psm, 3);
        assert_eq!(config.attribution, DEFAULT_ATTRIBUTION);
    }

    #[test]
    fn test_configured_tesseract_path() {
        let config = Config {
            tesseract_path: Some("/opt/tesseract/bin/tesseract".into()),
            ..Config::default()
        };
        // 環境変数が設定されていない前提
        if std::env::var(TESSERACT_ENV).is_err() {
            assert_eq!(config.tesseract_binary(), "/opt/tesseract/bin/tesseract");
        }
    }
}
