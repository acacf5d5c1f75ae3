//! 認識結果レポート（JSON）
//!
//! `run` コマンドが出力し、`export` コマンドが読み戻す。

use crate::error::Result;
use crate::types::ResultEntry;
use serde::{Deserialize, Serialize};

/// 結果レポート
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultReport {
    /// 生成日時（RFC3339）
    #[serde(default)]
    pub generated_at: String,

    /// 認識言語コード
    #[serde(default)]
    pub language: String,

    /// 処理順の結果
    pub entries: Vec<ResultEntry>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ResultsInput {
    Report(ResultReport),
    Entries(Vec<ResultEntry>),
}

/// レポートJSONから結果一覧を取り出す
///
/// レポート形式（`{"entries": [...]}`）と配列形式（`[...]`）の両方を受け付ける。
pub fn parse_results(json: &str) -> Result<Vec<ResultEntry>> {
    let input: ResultsInput = serde_json::from_str(json)?;
    Ok(match input {
        ResultsInput::Report(report) => report.entries,
        ResultsInput::Entries(entries) => entries,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_report_object() {
        let json = r#"{
            "generatedAt": "2026-01-18T10:00:00+00:00",
            "language": "eng",
            "entries": [
                {"name": "a.png", "text": "Hello"},
                {"name": "b.png", "text": ""}
            ]
        }"#;
        let entries = parse_results(json).unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0], ResultEntry::new("a.png", "Hello"));
        assert!(!entries[1].has_text());
    }

    #[test]
    fn test_parse_bare_array() {
        let json = r#"[{"name": "only.jpg", "text": "x"}]"#;
        let entries = parse_results(json).unwrap();
        assert_eq!(entries, vec![ResultEntry::new("only.jpg", "x")]);
    }

    #[test]
    fn test_parse_invalid() {
        assert!(parse_results("{\"foo\": 1}").is_err());
        assert!(parse_results("not json").is_err());
    }

    #[test]
    fn test_report_serializes_camel_case() {
        let report = ResultReport {
            generated_at: "now".into(),
            language: "jpn".into(),
            entries: vec![ResultEntry::new("x.png", "y")],
        };
        let json = serde_json::to_string(&report).unwrap();
        assert!(json.contains("\"generatedAt\""));
        assert_eq!(parse_results(&json).unwrap().len(), 1);
    }
}
