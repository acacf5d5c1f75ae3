//! 画像キュー
//!
//! 投入された画像1枚ごとに WorkItem を作り、投入順に保持する。

use crate::error::{OcrBatchError, Result};
use image::ImageFormat;
use ocr_batch_common::ItemStatus;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_ITEM_ID: AtomicU64 = AtomicU64::new(1);

/// アイテム識別子（プロセス内で一意）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ItemId(u64);

impl ItemId {
    fn next() -> Self {
        Self(NEXT_ITEM_ID.fetch_add(1, Ordering::Relaxed))
    }

    pub fn value(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "item-{}", self.0)
    }
}

/// 認識対象の画像
#[derive(Debug, Clone)]
pub enum ImageSource {
    /// ディスク上の画像ファイル
    File(PathBuf),
    /// メモリ上の画像（標準入力など）
    Bytes {
        name: String,
        data: Vec<u8>,
        format: ImageFormat,
    },
}

impl ImageSource {
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        ImageSource::File(path.into())
    }

    /// バイト列から作成（画像形式を判定できなければエラー）
    pub fn from_bytes(name: impl Into<String>, data: Vec<u8>) -> Result<Self> {
        let name = name.into();
        let format = image::guess_format(&data)
            .map_err(|_| OcrBatchError::NotAnImage(name.clone()))?;
        Ok(ImageSource::Bytes { name, data, format })
    }

    /// 表示名（ファイル名）
    pub fn name(&self) -> String {
        match self {
            ImageSource::File(path) => path
                .file_name()
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_else(|| path.display().to_string()),
            ImageSource::Bytes { name, .. } => name.clone(),
        }
    }

    pub fn path(&self) -> Option<&Path> {
        match self {
            ImageSource::File(path) => Some(path),
            ImageSource::Bytes { .. } => None,
        }
    }
}

/// キュー内の1アイテム
#[derive(Debug)]
pub struct WorkItem {
    pub(crate) id: ItemId,
    pub(crate) name: String,
    pub(crate) source: ImageSource,
    pub(crate) status: ItemStatus,
}

impl WorkItem {
    pub fn id(&self) -> ItemId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn source(&self) -> &ImageSource {
        &self.source
    }

    pub fn status(&self) -> ItemStatus {
        self.status
    }
}

/// 投入順の画像キュー
#[derive(Debug, Default)]
pub struct ItemQueue {
    items: Vec<WorkItem>,
}

impl ItemQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// 画像を末尾に追加（Queued状態）。既存アイテムは変更しない
    pub fn add_items<I>(&mut self, sources: I) -> Vec<ItemId>
    where
        I: IntoIterator<Item = ImageSource>,
    {
        sources
            .into_iter()
            .map(|source| {
                let item = WorkItem {
                    id: ItemId::next(),
                    name: source.name(),
                    source,
                    status: ItemStatus::Queued,
                };
                let id = item.id;
                self.items.push(item);
                id
            })
            .collect()
    }

    /// 全アイテムを破棄（画像データも解放される）
    pub fn clear(&mut self) {
        self.items.clear();
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &WorkItem> {
        self.items.iter()
    }

    pub fn get(&self, id: ItemId) -> Option<&WorkItem> {
        self.items.iter().find(|item| item.id == id)
    }

    /// 投入順の状態一覧
    pub fn statuses(&self) -> Vec<ItemStatus> {
        self.items.iter().map(|item| item.status).collect()
    }

    pub(crate) fn item_mut(&mut self, index: usize) -> Option<&mut WorkItem> {
        self.items.get_mut(index)
    }

    pub(crate) fn reset_statuses(&mut self) {
        for item in &mut self.items {
            item.status = ItemStatus::Queued;
        }
    }
}
