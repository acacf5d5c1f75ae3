//! OCR Batch Common Library
//!
//! CLIと将来のフロントエンドで共有される型とレイアウト計算

pub mod types;
pub mod layout;
pub mod metrics;
pub mod error;
pub mod report;
pub mod export;

pub use types::{ItemStatus, ResultEntry};
pub use layout::DocumentLayout;
pub use metrics::{wrap_text, Helvetica, TextMeasure};
pub use error::{Error, Result};
pub use report::{parse_results, ResultReport};
pub use export::pdf_core::{plan_document, PagePlan, PlacedText, TextStyle};
