//! バッチ処理の型定義
//!
//! - ResultEntry: 1画像分の認識結果（名前 + テキスト）
//! - ItemStatus: キュー内アイテムの状態

use serde::{Deserialize, Serialize};
use std::fmt;

/// 認識結果1件
///
/// 失敗・テキストなしの場合も空文字列で1件として記録する。
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultEntry {
    pub name: String,

    #[serde(default)]
    pub text: String,
}

impl ResultEntry {
    pub fn new(name: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            text: text.into(),
        }
    }

    /// テキストが認識されたか
    pub fn has_text(&self) -> bool {
        !self.text.is_empty()
    }
}

/// キュー内アイテムの状態
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", content = "percent", rename_all = "camelCase")]
pub enum ItemStatus {
    /// 待機中
    #[default]
    Queued,
    /// 認識中（0-100%）
    Recognizing(u8),
    /// テキストあり
    Done,
    /// 認識成功だがテキストなし
    NoText,
    /// 認識失敗
    Error,
}

impl ItemStatus {
    /// 処理済み（Done / NoText / Error）か
    pub fn is_terminal(&self) -> bool {
        matches!(self, ItemStatus::Done | ItemStatus::NoText | ItemStatus::Error)
    }
}

impl fmt::Display for ItemStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ItemStatus::Queued => write!(f, "Queued"),
            ItemStatus::Recognizing(percent) => write!(f, "Recognizing {}%", percent),
            ItemStatus::Done => write!(f, "Done"),
            ItemStatus::NoText => write!(f, "No text"),
            ItemStatus::Error => write!(f, "Error"),
        }
    }
}
