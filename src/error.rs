use thiserror::Error;

#[derive(Error, Debug)]
pub enum OcrBatchError {
    #[error("設定エラー: {0}")]
    Config(String),

    #[error("OCRエンジンが利用できません: {0}。`ocr-batch config --set-tesseract-path PATH` で設定してください")]
    ServiceUnavailable(String),

    #[error("OCR実行エラー: {0}")]
    Recognition(String),

    #[error("言語コードが不正です: {0}")]
    InvalidLanguage(String),

    #[error("キューに画像がありません")]
    EmptyQueue,

    #[error("バッチ処理が既に実行中です")]
    AlreadyRunning,

    #[error("出力できる認識結果がありません")]
    NoResults,

    #[error("ファイルが見つかりません: {0}")]
    FileNotFound(String),

    #[error("フォルダが見つかりません: {0}")]
    FolderNotFound(String),

    #[error("画像ファイルではありません: {0}")]
    NotAnImage(String),

    #[error("画像が見つかりません: {0}")]
    NoImagesFound(String),

    #[error("PDF生成エラー: {0}")]
    PdfGeneration(String),

    #[error("レイアウトエラー: {0}")]
    Layout(#[source] ocr_batch_common::Error),

    #[error("JSON解析エラー: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("IOエラー: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, OcrBatchError>;

impl From<ocr_batch_common::Error> for OcrBatchError {
    fn from(err: ocr_batch_common::Error) -> Self {
        match err {
            ocr_batch_common::Error::Json(e) => OcrBatchError::JsonParse(e),
            other => OcrBatchError::Layout(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_common_json_error_is_json_parse() {
        let err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let converted: OcrBatchError = ocr_batch_common::Error::Json(err).into();
        assert!(matches!(converted, OcrBatchError::JsonParse(_)));
        assert!(converted.to_string().starts_with("JSON解析エラー"));
    }

    #[test]
    fn test_common_layout_error_is_layout() {
        let converted: OcrBatchError = ocr_batch_common::Error::EmptyDocument.into();
        assert!(matches!(converted, OcrBatchError::Layout(_)));
    }
}
