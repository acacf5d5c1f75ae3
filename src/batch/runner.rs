//! バッチ実行
//!
//! キューの画像を投入順に1枚ずつOCRにかける。
//!
//! - 並列実行はしない（次の画像は前の画像の認識完了後に開始）
//! - キャンセルは画像の境界でのみ判定。認識中の画像は最後まで処理される
//! - 1枚の失敗はバッチを中断しない（Error状態 + 空テキストで記録）

use super::queue::{ImageSource, ItemId, ItemQueue, WorkItem};
use super::results::ResultAggregator;
use crate::error::{OcrBatchError, Result};
use crate::recognizer::{validate_language, Recognizer};
use ocr_batch_common::{ItemStatus, ResultEntry};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// 実行中バッチの操作ハンドル
///
/// 別タスク（Ctrl-C監視など）からキャンセル要求・実行状態の確認に使う。
#[derive(Debug, Clone, Default)]
pub struct BatchHandle {
    cancel_requested: Arc<AtomicBool>,
    running: Arc<AtomicBool>,
}

impl BatchHandle {
    pub fn new() -> Self {
        Self::default()
    }

    /// キャンセル要求（次の画像の開始前に反映）
    pub fn cancel(&self) {
        self.cancel_requested.store(true, Ordering::SeqCst);
    }

    pub fn is_cancel_requested(&self) -> bool {
        self.cancel_requested.load(Ordering::SeqCst)
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    fn reset_cancel(&self) {
        self.cancel_requested.store(false, Ordering::SeqCst);
    }
}

/// 実行中フラグ（実行が途中で破棄されても確実に下ろす）
struct RunningGuard<'a>(&'a AtomicBool);

impl<'a> RunningGuard<'a> {
    fn engage(flag: &'a AtomicBool) -> Self {
        flag.store(true, Ordering::SeqCst);
        Self(flag)
    }
}

impl Drop for RunningGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

/// 進捗通知の受け口
pub trait BatchObserver: Send {
    /// アイテムの状態が変わった
    fn on_item_status(&mut self, _id: ItemId, _status: ItemStatus) {}

    /// 全体進捗（画像1枚の処理完了ごと、0-100）
    fn on_overall_progress(&mut self, _percent: u8) {}

    /// バッチ終了（完走・キャンセルとも）
    fn on_batch_finished(&mut self, _summary: &BatchSummary) {}
}

/// 通知不要時のオブザーバ
#[derive(Debug, Default)]
pub struct NoopObserver;

impl BatchObserver for NoopObserver {}

/// バッチ結果の集計
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchSummary {
    pub total: usize,
    pub processed: usize,
    pub done: usize,
    pub no_text: usize,
    pub failed: usize,
    pub cancelled: bool,
}

impl BatchSummary {
    /// 記録された結果件数（= 処理済み枚数）
    pub fn result_count(&self) -> usize {
        self.processed
    }

    /// キャンセルで未処理のまま残った枚数
    pub fn remaining(&self) -> usize {
        self.total - self.processed
    }
}

/// 認識エンジンの進捗（0.0-1.0）→ アイテム進捗（%、切り捨て）
pub fn item_percent(fraction: f32) -> u8 {
    if !fraction.is_finite() {
        return 0;
    }
    (fraction.clamp(0.0, 1.0) * 100.0).floor() as u8
}

/// 全体進捗（%、切り上げ）: 3枚なら 34, 67, 100
pub fn overall_percent(processed: usize, total: usize) -> u8 {
    if total == 0 {
        return 100;
    }
    ((processed.min(total) * 100).div_ceil(total)) as u8
}

/// バッチ実行器
///
/// キュー・結果・キャンセル状態を1インスタンスで保持する。
pub struct BatchRunner<R> {
    recognizer: R,
    queue: ItemQueue,
    results: ResultAggregator,
    handle: BatchHandle,
}

impl<R: Recognizer> BatchRunner<R> {
    pub fn new(recognizer: R) -> Self {
        Self {
            recognizer,
            queue: ItemQueue::new(),
            results: ResultAggregator::new(),
            handle: BatchHandle::new(),
        }
    }

    pub fn recognizer(&self) -> &R {
        &self.recognizer
    }

    pub fn queue(&self) -> &ItemQueue {
        &self.queue
    }

    /// 処理順の認識結果
    pub fn results(&self) -> &[ResultEntry] {
        self.results.snapshot()
    }

    /// PDF生成可能か（結果が1件以上）
    pub fn can_compose(&self) -> bool {
        !self.results.is_empty()
    }

    pub fn handle(&self) -> BatchHandle {
        self.handle.clone()
    }

    pub fn is_running(&self) -> bool {
        self.handle.is_running()
    }

    pub fn cancel(&self) {
        self.handle.cancel();
    }

    pub fn add_items<I>(&mut self, sources: I) -> Vec<ItemId>
    where
        I: IntoIterator<Item = ImageSource>,
    {
        self.queue.add_items(sources)
    }

    /// キューと結果を破棄。実行中は何もしない（false）
    pub fn clear(&mut self) -> bool {
        if self.handle.is_running() {
            log::warn!("実行中のためクリアできません");
            return false;
        }
        self.queue.clear();
        self.results.reset();
        true
    }

    /// バッチ実行
    ///
    /// 前提条件（キュー非空・未実行・言語コード・エンジン利用可能）を満たさない場合は
    /// 状態を変更せずにエラーを返す。
    pub async fn start(
        &mut self,
        language: &str,
        observer: &mut dyn BatchObserver,
    ) -> Result<BatchSummary> {
        if self.handle.is_running() {
            return Err(OcrBatchError::AlreadyRunning);
        }
        if self.queue.is_empty() {
            return Err(OcrBatchError::EmptyQueue);
        }
        validate_language(language)?;
        self.recognizer.ensure_available().await?;

        self.handle.reset_cancel();
        self.results.reset();
        self.queue.reset_statuses();
        let running_guard = RunningGuard::engage(&self.handle.running);

        let total = self.queue.len();
        let mut summary = BatchSummary {
            total,
            ..Default::default()
        };
        log::info!("バッチ開始: {}枚 (言語: {})", total, language);

        for index in 0..total {
            if self.handle.is_cancel_requested() {
                log::info!("キャンセル: {}/{}枚で停止", summary.processed, total);
                summary.cancelled = true;
                break;
            }

            let Some(item) = self.queue.item_mut(index) else {
                break;
            };
            let WorkItem {
                id,
                name,
                source,
                status,
            } = item;
            let id = *id;

            *status = ItemStatus::Recognizing(0);
            observer.on_item_status(id, *status);
            log::debug!("認識開始: {} ({})", name, id);

            let outcome = {
                let mut on_progress = |fraction: f32| {
                    let next = ItemStatus::Recognizing(item_percent(fraction));
                    if *status != next {
                        *status = next;
                        observer.on_item_status(id, next);
                    }
                };
                self.recognizer
                    .recognize(source, language, &mut on_progress)
                    .await
            };

            let entry = match outcome {
                Ok(text) => {
                    let text = text.trim();
                    if text.is_empty() {
                        *status = ItemStatus::NoText;
                        summary.no_text += 1;
                        ResultEntry::new(name.clone(), "")
                    } else {
                        *status = ItemStatus::Done;
                        summary.done += 1;
                        ResultEntry::new(name.clone(), text)
                    }
                }
                Err(e) => {
                    log::warn!("認識失敗: {}: {}", name, e);
                    *status = ItemStatus::Error;
                    summary.failed += 1;
                    ResultEntry::new(name.clone(), "")
                }
            };
            observer.on_item_status(id, *status);
            self.results.append(entry);

            summary.processed += 1;
            observer.on_overall_progress(overall_percent(summary.processed, total));
        }

        log::info!(
            "バッチ終了: 処理 {}/{}枚 (テキストあり {}, なし {}, 失敗 {})",
            summary.processed,
            total,
            summary.done,
            summary.no_text,
            summary.failed
        );
        drop(running_guard);
        observer.on_batch_finished(&summary);

        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_item_percent() {
        assert_eq!(item_percent(0.0), 0);
        assert_eq!(item_percent(0.259), 25);
        assert_eq!(item_percent(0.999), 99);
        assert_eq!(item_percent(1.0), 100);
        assert_eq!(item_percent(1.7), 100);
        assert_eq!(item_percent(-0.2), 0);
        assert_eq!(item_percent(f32::NAN), 0);
    }

    #[test]
    fn test_overall_percent() {
        assert_eq!(overall_percent(1, 3), 34);
        assert_eq!(overall_percent(2, 3), 67);
        assert_eq!(overall_percent(3, 3), 100);
        assert_eq!(overall_percent(1, 4), 25);
        assert_eq!(overall_percent(0, 5), 0);
        assert_eq!(overall_percent(0, 0), 100);
    }

    #[test]
    fn test_handle_shares_state() {
        let handle = BatchHandle::new();
        let clone = handle.clone();
        clone.cancel();
        assert!(handle.is_cancel_requested());
        handle.reset_cancel();
        assert!(!clone.is_cancel_requested());
    }

    #[test]
    fn test_running_guard_resets_flag() {
        let handle = BatchHandle::new();
        {
            let _guard = RunningGuard::engage(&handle.running);
            assert!(handle.is_running());
        }
        assert!(!handle.is_running());
    }

    #[test]
    fn test_summary_counts() {
        let summary = BatchSummary {
            total: 5,
            processed: 3,
            done: 1,
            no_text: 1,
            failed: 1,
            cancelled: true,
        };
        assert_eq!(summary.result_count(), 3);
        assert_eq!(summary.remaining(), 2);
    }
}
