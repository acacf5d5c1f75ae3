//! PDF export core utilities shared by CLI and other front-ends.
//!
//! 認識結果からページ構成（どのページのどこに何を書くか）を計算する。
//! 座標はPDF座標系（左下原点、pt）。描画はCLI側の printpdf が担当。

use crate::error::{Error, Result};
use crate::layout::{DocumentLayout, NO_TEXT_PLACEHOLDER};
use crate::metrics::{wrap_text, TextMeasure};
use crate::types::ResultEntry;

/// 文字列の役割（フォントサイズと色の決定に使う）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextStyle {
    Title,
    Body,
    Footer,
}

/// 配置済みの1行
#[derive(Debug, Clone, PartialEq)]
pub struct PlacedText {
    pub text: String,
    pub style: TextStyle,
    pub font_size: f32,
    /// 左端X（pt）
    pub x_pt: f32,
    /// ベースラインY（pt、下端から）
    pub y_pt: f32,
}

/// 1ページ分の構成
#[derive(Debug, Clone)]
pub struct PagePlan {
    /// ページ番号（1始まり）
    pub number: usize,
    /// このページが属する結果のインデックス
    pub entry_index: usize,
    /// 本文の続きページか
    pub continuation: bool,
    pub lines: Vec<PlacedText>,
}

impl PagePlan {
    /// 指定スタイルの行
    pub fn lines_with_style(&self, style: TextStyle) -> impl Iterator<Item = &PlacedText> {
        self.lines.iter().filter(move |line| line.style == style)
    }
}

/// 結果一覧からページ構成を計算
///
/// - 各結果は新しいページから始まる（タイトル "File: <name>" + 本文）
/// - 本文が下余白に達したら同じ結果の続きページを追加
/// - 全ページに フッター（左: 固定表記、右: ページ番号）
pub fn plan_document(
    entries: &[ResultEntry],
    layout: &DocumentLayout,
    measure: &dyn TextMeasure,
) -> Result<Vec<PagePlan>> {
    if entries.is_empty() {
        return Err(Error::EmptyDocument);
    }
    layout.validate()?;

    let page_height = layout.page_height_pt();
    let margin = layout.margin_pt();
    let usable_width = layout.usable_width_pt();
    let bottom_limit = page_height - margin;

    let mut pages = Vec::new();

    for (entry_index, entry) in entries.iter().enumerate() {
        let mut page = PagePlan {
            number: pages.len() + 1,
            entry_index,
            continuation: false,
            lines: Vec::new(),
        };

        // タイトル（上端からの距離で管理）
        let title = format!("File: {}", entry.name);
        let title_lines = wrap_text(&title, measure, layout.title_font_size, usable_width);
        for (i, line) in title_lines.iter().enumerate() {
            let top = margin + layout.title_line_height * i as f32;
            page.lines.push(PlacedText {
                text: line.clone(),
                style: TextStyle::Title,
                font_size: layout.title_font_size,
                x_pt: margin,
                y_pt: page_height - top,
            });
        }

        // 本文はタイトルの下に1行空けて開始
        let body = if entry.text.is_empty() { NO_TEXT_PLACEHOLDER } else { entry.text.as_str() };
        let body_lines = wrap_text(body, measure, layout.body_font_size, usable_width);
        let mut top = margin + layout.title_line_height * (title_lines.len() + 1) as f32;

        for line in body_lines {
            if top > bottom_limit {
                push_footer(&mut page, layout, measure);
                pages.push(page);
                page = PagePlan {
                    number: pages.len() + 1,
                    entry_index,
                    continuation: true,
                    lines: Vec::new(),
                };
                top = margin;
            }

            if !line.is_empty() {
                page.lines.push(PlacedText {
                    text: line,
                    style: TextStyle::Body,
                    font_size: layout.body_font_size,
                    x_pt: margin,
                    y_pt: page_height - top,
                });
            }
            top += layout.body_line_height;
        }

        push_footer(&mut page, layout, measure);
        pages.push(page);
    }

    Ok(pages)
}

/// フッター: 左に固定表記、右にページ番号（右揃え）
fn push_footer(page: &mut PagePlan, layout: &DocumentLayout, measure: &dyn TextMeasure) {
    let margin = layout.margin_pt();
    let size = layout.footer_font_size;
    let number = page.number.to_string();
    let number_width = measure.text_width(&number, size);

    page.lines.push(PlacedText {
        text: layout.attribution.clone(),
        style: TextStyle::Footer,
        font_size: size,
        x_pt: margin,
        y_pt: layout.footer_offset_pt,
    });
    page.lines.push(PlacedText {
        text: number,
        style: TextStyle::Footer,
        font_size: size,
        x_pt: layout.page_width_pt() - margin - number_width,
        y_pt: layout.footer_offset_pt,
    });
}
