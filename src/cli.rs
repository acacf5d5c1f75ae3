use crate::export::ExportFormat;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "ocr-batch")]
#[command(about = "画像一括OCR・テキストPDF生成ツール", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// 詳細ログを出力
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// 画像を一括OCRしてPDF等を出力
    Run {
        /// 画像ファイル/フォルダ（"-" で標準入力）
        #[arg(required = true)]
        inputs: Vec<PathBuf>,

        /// 認識言語（例: eng, jpn, eng+jpn。省略時は設定値）
        #[arg(short, long)]
        language: Option<String>,

        /// 出力ファイル/ディレクトリ（デフォルト: カレント）
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// 出力形式 (pdf/txt/json/all)
        #[arg(short, long, default_value = "pdf")]
        format: ExportFormat,

        /// サブフォルダも再帰的にスキャン
        #[arg(short = 'r', long)]
        recursive: bool,

        /// 同一内容の画像は再認識しない
        #[arg(long)]
        dedupe: bool,
    },

    /// 画像1枚をOCRしてテキストを出力
    Recognize {
        /// 画像ファイル（"-" で標準入力）
        #[arg(required = true)]
        image: PathBuf,

        /// 認識言語
        #[arg(short, long)]
        language: Option<String>,

        /// 出力テキストファイル（"-" で標準出力、デフォルト: ocr.txt）
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// 結果JSONからPDF等を再生成
    Export {
        /// 入力JSONファイル
        #[arg(required = true)]
        input: PathBuf,

        /// 出力形式 (pdf/txt/json/all)
        #[arg(short, long, default_value = "pdf")]
        format: ExportFormat,

        /// 出力ファイル/ディレクトリ
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// ドキュメントタイトル
        #[arg(short, long, default_value = "OCR Batch")]
        title: String,
    },

    /// インストール済みの認識言語を表示
    Langs,

    /// 設定を表示/編集
    Config {
        /// 既定の認識言語を設定
        #[arg(long)]
        set_language: Option<String>,

        /// tesseract 実行ファイルのパスを設定
        #[arg(long)]
        set_tesseract_path: Option<String>,

        /// tessdata ディレクトリを設定
        #[arg(long)]
        set_tessdata_path: Option<String>,

        /// 設定を表示
        #[arg(long)]
        show: bool,
    },
}
