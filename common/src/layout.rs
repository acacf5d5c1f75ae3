//! レイアウト設定モジュール
//!
//! mm基準のページ寸法とpt基準の文字設定をまとめて定義する。
//! 描画エンジン（printpdf）とレイアウト計算（pdf_core）の両方がここを参照する。

use crate::error::{Error, Result};

// ============================================
// mm基準ページ寸法（Source of Truth）
// ============================================

/// A4サイズ（mm）
pub const A4_WIDTH_MM: f32 = 210.0;
pub const A4_HEIGHT_MM: f32 = 297.0;

/// 余白（mm）: 0.5inch
pub const MARGIN_MM: f32 = 12.7;

// ============================================
// 変換係数
// ============================================

/// mm → pt変換 (1mm = 72/25.4 pt ≈ 2.835pt)
pub const MM_TO_PT: f32 = 72.0 / 25.4;

// ============================================
// 文字設定（pt）
// ============================================

/// タイトル行（"File: <name>"）
pub const TITLE_FONT_SIZE: f32 = 11.0;
pub const TITLE_LINE_HEIGHT: f32 = 14.0;

/// 本文
pub const BODY_FONT_SIZE: f32 = 10.0;
pub const BODY_LINE_HEIGHT_FACTOR: f32 = 1.15;

/// フッター（ページ下端からのベースライン位置）
pub const FOOTER_FONT_SIZE: f32 = 9.0;
pub const FOOTER_OFFSET_PT: f32 = 18.0;

/// フッター左側の固定表記
pub const DEFAULT_ATTRIBUTION: &str = "Generated by Image->Text OCR";

/// テキストなしの場合の本文
pub const NO_TEXT_PLACEHOLDER: &str = "(No text recognized)";

// ============================================
// レイアウト設定構造体
// ============================================

/// 文書レイアウト設定
#[derive(Debug, Clone)]
pub struct DocumentLayout {
    /// ページ幅（mm）
    pub page_width_mm: f32,
    /// ページ高さ（mm）
    pub page_height_mm: f32,
    /// 余白（mm）
    pub margin_mm: f32,
    pub title_font_size: f32,
    pub title_line_height: f32,
    pub body_font_size: f32,
    pub body_line_height: f32,
    pub footer_font_size: f32,
    /// フッターのベースライン（ページ下端から、pt）
    pub footer_offset_pt: f32,
    /// フッター左側の表記
    pub attribution: String,
}

impl DocumentLayout {
    /// A4縦・標準設定
    pub fn a4() -> Self {
        Self {
            page_width_mm: A4_WIDTH_MM,
            page_height_mm: A4_HEIGHT_MM,
            margin_mm: MARGIN_MM,
            title_font_size: TITLE_FONT_SIZE,
            title_line_height: TITLE_LINE_HEIGHT,
            body_font_size: BODY_FONT_SIZE,
            body_line_height: BODY_FONT_SIZE * BODY_LINE_HEIGHT_FACTOR,
            footer_font_size: FOOTER_FONT_SIZE,
            footer_offset_pt: FOOTER_OFFSET_PT,
            attribution: DEFAULT_ATTRIBUTION.to_string(),
        }
    }

    /// フッター表記を差し替え
    pub fn with_attribution(mut self, attribution: impl Into<String>) -> Self {
        self.attribution = attribution.into();
        self
    }

    pub fn page_width_pt(&self) -> f32 {
        mm_to_pt(self.page_width_mm)
    }

    pub fn page_height_pt(&self) -> f32 {
        mm_to_pt(self.page_height_mm)
    }

    pub fn margin_pt(&self) -> f32 {
        mm_to_pt(self.margin_mm)
    }

    /// 利用可能幅（pt）= ページ幅 - 余白×2
    pub fn usable_width_pt(&self) -> f32 {
        self.page_width_pt() - self.margin_pt() * 2.0
    }

    /// 寸法の妥当性チェック
    pub fn validate(&self) -> Result<()> {
        if self.usable_width_pt() <= 0.0 {
            return Err(Error::Layout(format!(
                "usable width must be positive (page {}mm, margin {}mm)",
                self.page_width_mm, self.margin_mm
            )));
        }

        // タイトル1行 + 本文1行が収まらない設定は不可
        let min_height = self.margin_pt() * 2.0 + self.title_line_height * 2.0 + self.body_line_height;
        if self.page_height_pt() < min_height {
            return Err(Error::Layout(format!(
                "page height {}mm is too small for margin {}mm",
                self.page_height_mm, self.margin_mm
            )));
        }

        if self.title_font_size <= 0.0 || self.body_font_size <= 0.0 || self.footer_font_size <= 0.0 {
            return Err(Error::Layout("font sizes must be positive".into()));
        }

        Ok(())
    }
}

impl Default for DocumentLayout {
    fn default() -> Self {
        Self::a4()
    }
}

// ============================================
// ヘルパー関数
// ============================================

/// mm → pt 変換
#[inline]
pub fn mm_to_pt(mm: f32) -> f32 {
    mm * MM_TO_PT
}

/// pt → mm 変換
#[inline]
pub fn pt_to_mm(pt: f32) -> f32 {
    pt / MM_TO_PT
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_a4_dimensions() {
        let layout = DocumentLayout::a4();
        assert!((layout.page_width_pt() - 595.28).abs() < 0.1);
        assert!((layout.page_height_pt() - 841.89).abs() < 0.1);
        assert!((layout.margin_pt() - 36.0).abs() < 0.01);
        assert!((layout.usable_width_pt() - 523.28).abs() < 0.1);
    }

    #[test]
    fn test_title_larger_than_body() {
        let layout = DocumentLayout::default();
        assert!(layout.title_font_size > layout.body_font_size);
        assert!((layout.body_line_height - 11.5).abs() < 0.001);
    }

    #[test]
    fn test_conversion() {
        assert!((MM_TO_PT - 2.835).abs() < 0.01);
        assert!((mm_to_pt(10.0) - 28.35).abs() < 0.1);
        assert!((pt_to_mm(mm_to_pt(42.0)) - 42.0).abs() < 0.001);
    }

    #[test]
    fn test_validate() {
        assert!(DocumentLayout::a4().validate().is_ok());

        let mut too_wide_margin = DocumentLayout::a4();
        too_wide_margin.margin_mm = 120.0;
        assert!(matches!(too_wide_margin.validate(), Err(Error::Layout(_))));

        let mut no_font = DocumentLayout::a4();
        no_font.body_font_size = 0.0;
        assert!(no_font.validate().is_err());
    }

    #[test]
    fn test_with_attribution() {
        let layout = DocumentLayout::a4().with_attribution("Scanned at desk 3");
        assert_eq!(layout.attribution, "Scanned at desk 3");
    }
}
