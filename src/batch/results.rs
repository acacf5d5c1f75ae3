//! 結果集約
//!
//! 処理順に (名前, テキスト) を追記する。PDF生成の入力。

use ocr_batch_common::ResultEntry;

#[derive(Debug, Default)]
pub struct ResultAggregator {
    entries: Vec<ResultEntry>,
}

impl ResultAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reset(&mut self) {
        self.entries.clear();
    }

    pub fn append(&mut self, entry: ResultEntry) {
        self.entries.push(entry);
    }

    /// 読み取り専用ビュー
    pub fn snapshot(&self) -> &[ResultEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
