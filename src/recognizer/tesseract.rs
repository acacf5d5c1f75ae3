//! Tesseract OCR（CLI ラッパー）
//!
//! `tesseract <image> stdout -l <lang>` を子プロセスとして実行する。
//! CLIは進捗を出さないため、実行中は経過時間から推定した進捗を通知する。

use super::Recognizer;
use crate::batch::ImageSource;
use crate::config::Config;
use crate::error::{OcrBatchError, Result};
use async_trait::async_trait;
use image::ImageFormat;
use std::io::Write;
use std::path::PathBuf;
use std::process::Stdio;
use std::time::{Duration, Instant};
use tempfile::NamedTempFile;
use tokio::process::Command;

/// 推定進捗の通知間隔
const PROGRESS_TICK: Duration = Duration::from_millis(250);
/// 推定進捗の時定数（秒）
const EXPECTED_SECONDS: f32 = 4.0;
/// 完了前に通知する推定進捗の上限
const MAX_ESTIMATE: f32 = 0.95;

/// Tesseract CLI エンジン
#[derive(Debug, Clone)]
pub struct TesseractCli {
    binary: String,
    tessdata_path: Option<String>,
    psm: u8,
    oem: u8,
    timeout: Duration,
}

impl TesseractCli {
    pub fn new(binary: impl Into<String>) -> Self {
        Self {
            binary: binary.into(),
            tessdata_path: None,
            psm: 3,
            oem: 3,
            timeout: Duration::from_secs(120),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self {
            binary: config.tesseract_binary(),
            tessdata_path: config.tessdata_path.clone(),
            psm: config.psm,
            oem: config.oem,
            timeout: Duration::from_secs(config.timeout_seconds.max(1)),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn binary(&self) -> &str {
        &self.binary
    }

    fn command(&self) -> Command {
        let mut cmd = Command::new(&self.binary);
        if let Some(tessdata_path) = &self.tessdata_path {
            cmd.env("TESSDATA_PREFIX", tessdata_path);
        }
        cmd.stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        cmd
    }

    fn unavailable(&self, reason: impl std::fmt::Display) -> OcrBatchError {
        OcrBatchError::ServiceUnavailable(format!("{} ({})", self.binary, reason))
    }

    /// バージョン取得（実行できなければ ServiceUnavailable）
    pub async fn version(&self) -> Result<String> {
        let output = self
            .command()
            .arg("--version")
            .output()
            .await
            .map_err(|e| self.unavailable(e))?;

        if !output.status.success() {
            return Err(self.unavailable("--version が失敗しました"));
        }

        // バージョンは stdout / stderr のどちらかに出る
        let combined = format!(
            "{}{}",
            String::from_utf8_lossy(&output.stdout),
            String::from_utf8_lossy(&output.stderr)
        );
        Ok(parse_version(&combined).unwrap_or_else(|| "unknown".to_string()))
    }

    /// インストール済み言語一覧
    pub async fn languages(&self) -> Result<Vec<String>> {
        let output = self
            .command()
            .arg("--list-langs")
            .output()
            .await
            .map_err(|e| self.unavailable(e))?;

        let combined = format!(
            "{}{}",
            String::from_utf8_lossy(&output.stdout),
            String::from_utf8_lossy(&output.stderr)
        );
        Ok(parse_language_list(&combined))
    }
}

#[async_trait]
impl Recognizer for TesseractCli {
    async fn ensure_available(&self) -> Result<()> {
        let version = self.version().await?;
        log::debug!("[Tesseract] {} バージョン: {}", self.binary, version);
        Ok(())
    }

    async fn recognize(
        &self,
        source: &ImageSource,
        language: &str,
        on_progress: &mut (dyn FnMut(f32) + Send),
    ) -> Result<String> {
        on_progress(0.0);

        // メモリ上の画像は一時ファイルに書き出す（この関数を抜けると削除）
        let staged;
        let input: PathBuf = match source {
            ImageSource::File(path) => {
                if !path.exists() {
                    return Err(OcrBatchError::FileNotFound(path.display().to_string()));
                }
                path.clone()
            }
            ImageSource::Bytes { data, format, .. } => {
                staged = stage_bytes(data, *format)?;
                staged.path().to_path_buf()
            }
        };

        let mut cmd = self.command();
        cmd.arg(&input)
            .arg("stdout")
            .arg("-l")
            .arg(language)
            .arg("--psm")
            .arg(self.psm.to_string())
            .arg("--oem")
            .arg(self.oem.to_string());

        log::debug!(
            "[Tesseract] 実行: {} {} stdout -l {} --psm {} --oem {}",
            self.binary,
            input.display(),
            language,
            self.psm,
            self.oem
        );

        let child = cmd.spawn().map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound | std::io::ErrorKind::PermissionDenied => self.unavailable(e),
            _ => OcrBatchError::Recognition(format!("tesseract 起動失敗: {}", e)),
        })?;

        let started = Instant::now();
        let wait = child.wait_with_output();
        tokio::pin!(wait);
        let deadline = tokio::time::sleep(self.timeout);
        tokio::pin!(deadline);
        let mut ticker = tokio::time::interval(PROGRESS_TICK);
        ticker.tick().await;

        let output = loop {
            tokio::select! {
                result = &mut wait => {
                    break result.map_err(|e| OcrBatchError::Recognition(format!("tesseract 待機失敗: {}", e)))?;
                }
                _ = &mut deadline => {
                    return Err(OcrBatchError::Recognition(format!(
                        "タイムアウト ({}秒): {}",
                        self.timeout.as_secs(),
                        input.display()
                    )));
                }
                _ = ticker.tick() => {
                    on_progress(estimate_progress(started.elapsed()));
                }
            }
        };

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(OcrBatchError::Recognition(format!(
                "Tesseract 実行失敗 (code {:?}): {}",
                output.status.code(),
                stderr.trim()
            )));
        }

        let text = String::from_utf8_lossy(&output.stdout).to_string();
        log::debug!(
            "[Tesseract] 完了: {} ms, {} 文字",
            started.elapsed().as_millis(),
            text.chars().count()
        );

        on_progress(1.0);
        Ok(text)
    }
}

/// 経過時間からの推定進捗（0.0 → MAX_ESTIMATE に漸近）
fn estimate_progress(elapsed: Duration) -> f32 {
    let t = elapsed.as_secs_f32() / EXPECTED_SECONDS;
    MAX_ESTIMATE * (1.0 - (-t).exp())
}

fn stage_bytes(data: &[u8], format: ImageFormat) -> Result<NamedTempFile> {
    let extension = format.extensions_str().first().copied().unwrap_or("img");
    let mut file = tempfile::Builder::new()
        .prefix("ocr-batch-")
        .suffix(&format!(".{}", extension))
        .tempfile()?;
    file.write_all(data)?;
    file.flush()?;
    Ok(file)
}

/// `tesseract --version` の出力からバージョンを取り出す
///
/// 形式は "tesseract 5.3.0" または "tesseract v5.3.0"
pub fn parse_version(output: &str) -> Option<String> {
    output
        .lines()
        .map(str::trim)
        .filter(|line| line.to_lowercase().starts_with("tesseract"))
        .find_map(|line| line.split_whitespace().nth(1))
        .map(|v| v.trim_start_matches('v').to_string())
}

/// `tesseract --list-langs` の出力から言語コードを取り出す
pub fn parse_language_list(output: &str) -> Vec<String> {
    let mut langs = Vec::new();
    let mut found_list = false;

    for line in output.lines() {
        let line = line.trim();
        if line.contains("List of available languages") {
            found_list = true;
            continue;
        }
        if found_list && !line.is_empty() && !line.contains(':') && !line.contains(' ') {
            langs.push(line.to_string());
        }
    }

    langs
}
