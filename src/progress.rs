//! コンソール進捗表示

use crate::batch::{BatchObserver, BatchSummary, ItemId, ItemQueue, ItemStatus};
use indicatif::{ProgressBar, ProgressStyle};
use std::collections::HashMap;

const BAR_TEMPLATE: &str = "[{elapsed_precise}] {bar:40.cyan/blue} {pos:>3}% {msg}";

/// 画像ごとの状態とバッチ全体の進捗をターミナルに表示する
pub struct ConsoleObserver {
    bar: ProgressBar,
    names: HashMap<ItemId, String>,
}

impl ConsoleObserver {
    pub fn new(queue: &ItemQueue) -> Self {
        let bar = ProgressBar::new(100);
        bar.set_style(
            ProgressStyle::default_bar()
                .template(BAR_TEMPLATE)
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("=>-"),
        );

        let names = queue
            .iter()
            .map(|item| (item.id(), item.name().to_string()))
            .collect();

        Self { bar, names }
    }

    fn name(&self, id: ItemId) -> &str {
        self.names.get(&id).map(String::as_str).unwrap_or("?")
    }
}

impl BatchObserver for ConsoleObserver {
    fn on_item_status(&mut self, id: ItemId, status: ItemStatus) {
        match status {
            ItemStatus::Recognizing(_) => {
                let message = format!("{}: {}", self.name(id), status);
                self.bar.set_message(message);
            }
            _ => {
                let mark = match status {
                    ItemStatus::Done => "✔",
                    ItemStatus::NoText => "-",
                    ItemStatus::Error => "✘",
                    _ => " ",
                };
                self.bar.println(format!("{} {}: {}", mark, self.name(id), status));
            }
        }
    }

    fn on_overall_progress(&mut self, percent: u8) {
        self.bar.set_position(percent as u64);
    }

    fn on_batch_finished(&mut self, summary: &BatchSummary) {
        if summary.cancelled {
            self.bar.abandon_with_message(format!(
                "キャンセル ({}/{}枚)",
                summary.processed, summary.total
            ));
        } else {
            self.bar.finish_with_message("完了");
        }
    }
}
