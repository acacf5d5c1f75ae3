//! PDF出力
//!
//! ページ割り付けは `ocr_batch_common::plan_document` で計算し、
//! ここでは printpdf の描画命令に変換するだけ。

use crate::error::{OcrBatchError, Result};
use ocr_batch_common::{plan_document, DocumentLayout, Helvetica, PagePlan, ResultEntry, TextStyle};
use printpdf::*;
use std::path::Path;

/// フッター文字色（グレー）
const FOOTER_GRAY: f32 = 120.0 / 255.0;
/// 本文・見出しの文字色
const TEXT_GRAY: f32 = 20.0 / 255.0;

/// PDFを生成してバイト列で返す
pub fn render_pdf(entries: &[ResultEntry], layout: &DocumentLayout, title: &str) -> Result<Vec<u8>> {
    let plans = plan_document(entries, layout, &Helvetica)?;

    let pages: Vec<PdfPage> = plans
        .iter()
        .map(|plan| {
            PdfPage::new(
                Mm(layout.page_width_mm),
                Mm(layout.page_height_mm),
                page_ops(plan),
            )
        })
        .collect();

    let mut doc = PdfDocument::new(title);
    let mut warnings = Vec::new();
    let bytes = doc
        .with_pages(pages)
        .save(&PdfSaveOptions::default(), &mut warnings);

    if !warnings.is_empty() {
        log::debug!("[PDF] 警告 {}件", warnings.len());
    }
    if bytes.is_empty() {
        return Err(OcrBatchError::PdfGeneration("PDFの出力が空です".into()));
    }

    log::info!("[PDF] {}ページ生成 ({}件)", plans.len(), entries.len());
    Ok(bytes)
}

/// PDFを生成してファイルに保存
pub fn generate_pdf(
    entries: &[ResultEntry],
    output_path: &Path,
    title: &str,
    layout: &DocumentLayout,
) -> Result<()> {
    let bytes = render_pdf(entries, layout, title)?;
    std::fs::write(output_path, bytes)?;
    Ok(())
}

fn page_ops(plan: &PagePlan) -> Vec<Op> {
    let mut ops = Vec::new();

    for line in &plan.lines {
        let gray = match line.style {
            TextStyle::Footer => FOOTER_GRAY,
            TextStyle::Title | TextStyle::Body => TEXT_GRAY,
        };
        if line.text.is_empty() {
            continue;
        }

        ops.push(Op::StartTextSection);
        ops.push(Op::SetFillColor {
            col: Color::Rgb(Rgb::new(gray, gray, gray, None)),
        });
        ops.push(Op::SetFontSizeBuiltinFont {
            size: Pt(line.font_size),
            font: BuiltinFont::Helvetica,
        });
        ops.push(Op::SetTextCursor {
            pos: Point {
                x: Pt(line.x_pt),
                y: Pt(line.y_pt),
            },
        });
        ops.push(Op::WriteTextBuiltinFont {
            items: vec![TextItem::Text(to_win_ansi(&line.text))],
            font: BuiltinFont::Helvetica,
        });
        ops.push(Op::EndTextSection);
    }

    ops
}

/// WinAnsiEncoding の 0x80-0x9F に割り当てられた文字
const WIN_ANSI_EXTRAS: [char; 27] = [
    '€', '‚', 'ƒ', '„', '…', '†', '‡', 'ˆ', '‰', 'Š', '‹', 'Œ', 'Ž', '‘', '’', '“', '”', '•', '–',
    '—', '˜', '™', 'š', '›', 'œ', 'ž', 'Ÿ',
];

/// 組み込みフォント（WinAnsi）で表せない文字は '?' に置き換える
fn to_win_ansi(text: &str) -> String {
    text.chars()
        .map(|c| match c as u32 {
            0x00..=0x1F | 0x80..=0x9F => ' ',
            0x20..=0xFF => c,
            _ if WIN_ANSI_EXTRAS.contains(&c) => c,
            _ => '?',
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_win_ansi() {
        assert_eq!(to_win_ansi("Café"), "Café");
        assert_eq!(to_win_ansi("写真 OK"), "?? OK");
        assert_eq!(to_win_ansi("a\tb"), "a b");
    }

    #[test]
    fn test_to_win_ansi_keeps_typographic_punctuation() {
        assert_eq!(to_win_ansi("don’t “x” — 5€"), "don’t “x” — 5€");
        assert_eq!(to_win_ansi("wait… • 2–3 ™"), "wait… • 2–3 ™");
    }

    #[test]
    fn test_to_win_ansi_c1_controls_become_spaces() {
        assert_eq!(to_win_ansi("a\u{0085}b\u{009F}c"), "a b c");
    }

    #[test]
    fn test_page_ops_per_line() {
        let entries = vec![ResultEntry::new("a.png", "Hello")];
        let plans = plan_document(&entries, &DocumentLayout::a4(), &Helvetica).unwrap();
        let ops = page_ops(&plans[0]);
        let writes = ops
            .iter()
            .filter(|op| matches!(op, Op::WriteTextBuiltinFont { .. }))
            .count();
        // 見出し + 本文 + フッター2つ
        assert_eq!(writes, 4);
    }

    #[test]
    fn test_render_pdf_header() {
        let entries = vec![
            ResultEntry::new("a.png", "Hello"),
            ResultEntry::new("b.png", ""),
        ];
        let bytes = render_pdf(&entries, &DocumentLayout::a4(), "OCR Batch").unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }

    #[test]
    fn test_render_pdf_empty() {
        let result = render_pdf(&[], &DocumentLayout::a4(), "OCR Batch");
        assert!(matches!(result, Err(OcrBatchError::Layout(_))));
    }
}
