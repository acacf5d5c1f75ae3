//! バッチ処理パイプライン
//!
//! キュー（queue）→ 逐次実行（runner）→ 結果集約（results）

mod queue;
mod results;
mod runner;

pub use queue::{ImageSource, ItemId, ItemQueue, WorkItem};
pub use results::ResultAggregator;
pub use runner::{
    item_percent, overall_percent, BatchHandle, BatchObserver, BatchRunner, BatchSummary,
    NoopObserver,
};
pub use ocr_batch_common::{ItemStatus, ResultEntry};
