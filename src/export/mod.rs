pub mod pdf;
pub mod text;

use crate::error::{OcrBatchError, Result};
use ocr_batch_common::{DocumentLayout, ResultEntry, ResultReport};
use std::path::{Path, PathBuf};

/// 出力形式
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ExportFormat {
    #[default]
    Pdf,
    Text,
    Json,
    All,
}

impl ExportFormat {
    fn extensions(&self) -> &'static [&'static str] {
        match self {
            ExportFormat::Pdf => &["pdf"],
            ExportFormat::Text => &["txt"],
            ExportFormat::Json => &["json"],
            ExportFormat::All => &["pdf", "txt", "json"],
        }
    }
}

impl std::str::FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pdf" => Ok(ExportFormat::Pdf),
            "txt" | "text" => Ok(ExportFormat::Text),
            "json" => Ok(ExportFormat::Json),
            "all" => Ok(ExportFormat::All),
            _ => Err(format!("Unknown format: {}. Use pdf, txt, json, or all", s)),
        }
    }
}

impl std::fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExportFormat::Pdf => write!(f, "pdf"),
            ExportFormat::Text => write!(f, "txt"),
            ExportFormat::Json => write!(f, "json"),
            ExportFormat::All => write!(f, "all"),
        }
    }
}

/// 出力オプション
#[derive(Debug, Clone)]
pub struct ExportOptions {
    /// ファイル名（拡張子なし）
    pub name: String,
    /// PDFタイトル（文書プロパティ）
    pub title: String,
    /// 認識言語（JSONレポートに記録）
    pub language: String,
    pub layout: DocumentLayout,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            name: "ocr_batch".into(),
            title: "OCR Batch".into(),
            language: String::new(),
            layout: DocumentLayout::a4(),
        }
    }
}

/// 出力先パスを決定
///
/// - フォルダ（または拡張子なし）: `<output>/<name>.<ext>`
/// - ファイル: 単一形式ならそのまま、複数形式なら拡張子を差し替え
pub fn output_path_for(output: &Path, name: &str, extension: &str, single: bool) -> PathBuf {
    if output.is_dir() || output.extension().is_none() {
        return output.join(format!("{}.{}", name, extension));
    }

    if single {
        output.to_path_buf()
    } else {
        output.with_extension(extension)
    }
}

/// 認識結果を出力（書き出したファイルのパスを返す）
pub fn export_results(
    entries: &[ResultEntry],
    format: ExportFormat,
    output: &Path,
    options: &ExportOptions,
) -> Result<Vec<PathBuf>> {
    if entries.is_empty() {
        return Err(OcrBatchError::NoResults);
    }

    let extensions = format.extensions();
    let single = extensions.len() == 1;
    let mut written = Vec::new();

    for extension in extensions {
        let path = output_path_for(output, &options.name, extension, single);
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        match *extension {
            "pdf" => {
                println!("- PDFを生成中... ({}件)", entries.len());
                pdf::generate_pdf(entries, &path, &options.title, &options.layout)?;
                println!("✔ PDF出力: {}", path.display());
            }
            "txt" => {
                text::generate_text(entries, &path)?;
                println!("✔ テキスト出力: {}", path.display());
            }
            _ => {
                generate_json(entries, &path, &options.language)?;
                println!("✔ JSON出力: {}", path.display());
            }
        }
        written.push(path);
    }

    Ok(written)
}

/// 結果レポート（JSON）を出力
pub fn generate_json(entries: &[ResultEntry], output_path: &Path, language: &str) -> Result<()> {
    let report = ResultReport {
        generated_at: chrono::Utc::now().to_rfc3339(),
        language: language.to_string(),
        entries: entries.to_vec(),
    };
    let json = serde_json::to_string_pretty(&report)?;
    std::fs::write(output_path, json)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_from_str() {
        assert_eq!("pdf".parse::<ExportFormat>().unwrap(), ExportFormat::Pdf);
        assert_eq!("TXT".parse::<ExportFormat>().unwrap(), ExportFormat::Text);
        assert_eq!("text".parse::<ExportFormat>().unwrap(), ExportFormat::Text);
        assert_eq!("all".parse::<ExportFormat>().unwrap(), ExportFormat::All);
        assert!("xlsx".parse::<ExportFormat>().is_err());
    }

    #[test]
    fn test_output_path_for_directory() {
        let dir = tempfile::tempdir().unwrap();
        let path = output_path_for(dir.path(), "ocr_batch", "pdf", true);
        assert_eq!(path, dir.path().join("ocr_batch.pdf"));
    }

    #[test]
    fn test_output_path_for_file() {
        let out = Path::new("/tmp/out/scans.pdf");
        assert_eq!(output_path_for(out, "ocr_batch", "pdf", true), out);
        assert_eq!(
            output_path_for(out, "ocr_batch", "json", false),
            PathBuf::from("/tmp/out/scans.json")
        );
    }

    #[test]
    fn test_export_empty_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let result = export_results(&[], ExportFormat::Pdf, dir.path(), &ExportOptions::default());
        assert!(matches!(result, Err(OcrBatchError::NoResults)));
    }
}
