//! Ctrl-C 処理
//!
//! 1回目: 処理中の画像の完了後に停止（キャンセル要求）
//! 2回目: 即時終了

use crate::batch::BatchHandle;
use std::future::Future;

/// 強制終了時の終了コード（128 + SIGINT）
pub const INTERRUPTED_EXIT_CODE: i32 = 130;

/// 割り込みを監視してキャンセル要求に変換する
///
/// 2回目の割り込みを受けたら `true` を返す（呼び出し側で即時終了する）。
/// 割り込みの監視自体に失敗した場合は `false`。
pub async fn watch_interrupts<F, Fut>(handle: BatchHandle, mut next_interrupt: F) -> bool
where
    F: FnMut() -> Fut,
    Fut: Future<Output = std::io::Result<()>>,
{
    let mut received = 0usize;
    loop {
        if let Err(e) = next_interrupt().await {
            log::warn!("Ctrl-C の監視に失敗: {}", e);
            return false;
        }
        received += 1;

        if received == 1 {
            eprintln!("\nキャンセル要求を受け付けました（処理中の画像の完了後に停止。もう一度 Ctrl-C で強制終了）");
            handle.cancel();
        } else {
            return true;
        }
    }
}
