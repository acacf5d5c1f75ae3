//! テキスト出力
//!
//! 結果ごとに "File: <name>" 見出し + 本文を並べたプレーンテキスト。

use crate::error::Result;
use ocr_batch_common::layout::NO_TEXT_PLACEHOLDER;
use ocr_batch_common::ResultEntry;
use std::path::Path;

const SEPARATOR: &str = "----------------------------------------";

pub fn render_text(entries: &[ResultEntry]) -> String {
    entries
        .iter()
        .map(|entry| {
            let body = if entry.has_text() { entry.text.as_str() } else { NO_TEXT_PLACEHOLDER };
            format!("File: {}\n\n{}\n", entry.name, body)
        })
        .collect::<Vec<_>>()
        .join(&format!("\n{}\n\n", SEPARATOR))
}

pub fn generate_text(entries: &[ResultEntry], output_path: &Path) -> Result<()> {
    std::fs::write(output_path, render_text(entries))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_text() {
        let entries = vec![
            ResultEntry::new("a.png", "Hello\nWorld"),
            ResultEntry::new("b.png", ""),
        ];
        let text = render_text(&entries);
        assert!(text.starts_with("File: a.png\n\nHello\nWorld\n"));
        assert!(text.contains(SEPARATOR));
        assert!(text.contains("File: b.png\n\n(No text recognized)\n"));
    }

    #[test]
    fn test_render_single_has_no_separator() {
        let text = render_text(&[ResultEntry::new("a.png", "x")]);
        assert!(!text.contains(SEPARATOR));
    }
}
