//! 文字幅計測・折り返しモジュール
//!
//! PDF組み込みフォント（Helvetica）の標準メトリクスで文字列幅を計算し、
//! 指定幅に収まるよう行を分割する。

/// 文字列幅の計測
pub trait TextMeasure {
    /// `font_size`（pt）で描画したときの幅（pt）
    fn text_width(&self, text: &str, font_size: f32) -> f32;
}

/// Helvetica 標準メトリクス（1/1000 em, 0x20..=0x7E）
const HELVETICA_ASCII_WIDTHS: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278, // ' '..'/'
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, // '0'..'9'
    278, 278, 584, 584, 584, 556, 1015, // ':'..'@'
    667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, // 'A'..'M'
    722, 778, 667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, // 'N'..'Z'
    278, 278, 278, 469, 556, 333, // '['..'`'
    556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, // 'a'..'m'
    556, 556, 556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, // 'n'..'z'
    334, 260, 334, 584, // '{'..'~'
];

/// Latin-1 補助範囲などの未登録文字
const DEFAULT_WIDTH: u16 = 556;
/// CJK など全角相当の文字
const WIDE_WIDTH: u16 = 1000;

/// PDF組み込みフォント Helvetica のメトリクス
#[derive(Debug, Clone, Copy, Default)]
pub struct Helvetica;

impl Helvetica {
    /// 1文字の幅（1/1000 em）
    pub fn char_width(ch: char) -> u16 {
        if let Some(width) = win_ansi_punctuation_width(ch) {
            return width;
        }
        let code = ch as u32;
        match code {
            0x20..=0x7E => HELVETICA_ASCII_WIDTHS[(code - 0x20) as usize],
            0x00..=0x1F => 0,
            0x7F..=0x2FFF => DEFAULT_WIDTH,
            _ => WIDE_WIDTH,
        }
    }
}

/// WinAnsi 拡張文字（引用符・ダッシュ等）の幅
fn win_ansi_punctuation_width(ch: char) -> Option<u16> {
    let width = match ch {
        '‘' | '’' | '‚' => 222,
        '“' | '”' | '„' | 'ˆ' | '˜' | '‹' | '›' => 333,
        '•' => 350,
        '–' | '€' | '†' | '‡' | 'ƒ' => 556,
        '—' | '…' | '‰' | '™' | 'Œ' => 1000,
        'œ' => 944,
        'Š' | 'Ÿ' => 667,
        'Ž' => 611,
        'š' | 'ž' => 500,
        _ => return None,
    };
    Some(width)
}

impl TextMeasure for Helvetica {
    fn text_width(&self, text: &str, font_size: f32) -> f32 {
        let units: u32 = text.chars().map(|c| Self::char_width(c) as u32).sum();
        units as f32 * font_size / 1000.0
    }
}

/// テキストを指定幅で折り返す
///
/// 改行は段落区切りとして保持し（空行は空文字列の行になる）、
/// 段落内は単語単位で詰める。1単語が幅を超える場合は文字単位で分割する。
/// 戻り値は最低1行。
pub fn wrap_text(text: &str, measure: &dyn TextMeasure, font_size: f32, max_width: f32) -> Vec<String> {
    let mut lines = Vec::new();

    for paragraph in text.lines() {
        let paragraph = paragraph.replace('\t', "    ");
        if paragraph.trim().is_empty() {
            lines.push(String::new());
            continue;
        }

        let mut current = String::new();
        for word in paragraph.split_whitespace() {
            for piece in split_long_word(word, measure, font_size, max_width) {
                if current.is_empty() {
                    current = piece;
                    continue;
                }

                let candidate = format!("{} {}", current, piece);
                if measure.text_width(&candidate, font_size) <= max_width {
                    current = candidate;
                } else {
                    lines.push(std::mem::replace(&mut current, piece));
                }
            }
        }

        if !current.is_empty() {
            lines.push(current);
        }
    }

    if lines.is_empty() {
        lines.push(String::new());
    }

    lines
}

/// 幅を超える単語を文字単位で分割（各片は最低1文字）
fn split_long_word(word: &str, measure: &dyn TextMeasure, font_size: f32, max_width: f32) -> Vec<String> {
    if measure.text_width(word, font_size) <= max_width {
        return vec![word.to_string()];
    }

    let mut pieces = Vec::new();
    let mut current = String::new();
    for ch in word.chars() {
        current.push(ch);
        if current.chars().count() > 1 && measure.text_width(&current, font_size) > max_width {
            current.pop();
            pieces.push(std::mem::take(&mut current));
            current.push(ch);
        }
    }
    if !current.is_empty() {
        pieces.push(current);
    }

    pieces
}
