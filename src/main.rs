use clap::Parser;
use ocr_batch::batch::{item_percent, BatchRunner, ImageSource};
use ocr_batch::export::{self, ExportOptions};
use ocr_batch::recognizer::{DedupRecognizer, Recognizer, TesseractCli};
use ocr_batch::{cli, config, error, interrupt, progress, scanner};
use cli::{Cli, Commands};
use config::Config;
use error::{OcrBatchError, Result};
use indicatif::{ProgressBar, ProgressStyle};
use ocr_batch_common::{parse_results, DocumentLayout};
use std::path::{Path, PathBuf};

/// 単一画像の出力先（省略時）
const DEFAULT_TEXT_OUTPUT: &str = "ocr.txt";

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logger(cli.verbose);
    let config = Config::load()?;

    match cli.command {
        Commands::Run { inputs, language, output, format, recursive, dedupe } => {
            println!("🔎 ocr-batch - 一括OCR\n");
            let language = language.unwrap_or_else(|| config.default_language.clone());

            // 1. 入力収集
            println!("[1/3] 画像を収集中...");
            let sources = scanner::collect_sources(&inputs, recursive)?;
            if sources.is_empty() {
                let joined = inputs
                    .iter()
                    .map(|p| p.display().to_string())
                    .collect::<Vec<_>>()
                    .join(", ");
                return Err(OcrBatchError::NoImagesFound(joined));
            }
            println!("✔ {}枚の画像を検出\n", sources.len());

            // 2. OCR
            println!("[2/3] OCR実行中... (言語: {}){}", language, if dedupe { " (重複スキップ有効)" } else { "" });
            let engine = TesseractCli::from_config(&config);
            let recognizer: Box<dyn Recognizer> = if dedupe {
                Box::new(DedupRecognizer::new(engine))
            } else {
                Box::new(engine)
            };

            let mut runner = BatchRunner::new(recognizer);
            runner.add_items(sources);

            let handle = runner.handle();
            tokio::spawn(async move {
                if interrupt::watch_interrupts(handle, tokio::signal::ctrl_c).await {
                    eprintln!("強制終了します");
                    std::process::exit(interrupt::INTERRUPTED_EXIT_CODE);
                }
            });

            let mut observer = progress::ConsoleObserver::new(runner.queue());
            let summary = runner.start(&language, &mut observer).await?;

            println!(
                "\n✔ {}/{}枚処理 (テキストあり {}, なし {}, 失敗 {})",
                summary.processed, summary.total, summary.done, summary.no_text, summary.failed
            );
            if summary.cancelled {
                println!("⚠ キャンセルにより {}枚が未処理です", summary.remaining());
            }

            // 3. 出力
            if !runner.can_compose() {
                println!("\n出力する結果がありません");
                return Ok(());
            }
            println!("\n[3/3] 出力中...");
            let output = output.unwrap_or_else(|| PathBuf::from("."));
            let options = export_options(&config, "OCR Batch", &language);
            export::export_results(runner.results(), format, &output, &options)?;

            println!("\n✅ 完了");
        }

        Commands::Recognize { image, language, output } => {
            let language = language.unwrap_or_else(|| config.default_language.clone());
            let source = if image.as_os_str() == scanner::STDIN_ARG {
                scanner::read_stdin_image()?
            } else if image.is_file() {
                ImageSource::from_path(&image)
            } else {
                return Err(OcrBatchError::FileNotFound(image.display().to_string()));
            };

            let engine = TesseractCli::from_config(&config);
            recognizer_ready(&engine, &language).await?;

            let bar = ProgressBar::new(100);
            bar.set_style(
                ProgressStyle::default_bar()
                    .template("{bar:40.cyan/blue} {pos:>3}% {msg}")
                    .unwrap_or_else(|_| ProgressStyle::default_bar())
                    .progress_chars("=>-"),
            );
            bar.set_message(source.name());

            let outcome = {
                let mut on_progress = |fraction: f32| bar.set_position(item_percent(fraction) as u64);
                engine.recognize(&source, &language, &mut on_progress).await
            };
            bar.finish_and_clear();
            let text = outcome?;

            if text.trim().is_empty() {
                println!("テキストが検出されませんでした。鮮明な画像・コントラストの高い画像、または別の言語を試してください。");
                return Ok(());
            }

            let output = output.unwrap_or_else(|| PathBuf::from(DEFAULT_TEXT_OUTPUT));
            if is_stdout(&output) {
                print!("{}", text);
            } else {
                std::fs::write(&output, &text)?;
                println!("✔ テキスト出力: {}", output.display());
            }
        }

        Commands::Export { input, format, output, title } => {
            println!("📄 ocr-batch - エクスポート\n");

            let content = std::fs::read_to_string(&input)?;
            let entries = parse_results(&content)?;
            println!("✔ {}件の結果を読み込み", entries.len());

            let output = output.unwrap_or_else(|| PathBuf::from("."));
            let options = export_options(&config, &title, "");
            export::export_results(&entries, format, &output, &options)?;

            println!("\n✅ エクスポート完了");
        }

        Commands::Langs => {
            let engine = TesseractCli::from_config(&config);
            let version = engine.version().await?;
            let langs = engine.languages().await?;

            println!("tesseract {} ({})", version, engine.binary());
            if langs.is_empty() {
                println!("認識言語がインストールされていません");
            }
            for lang in langs {
                println!("  {}", lang);
            }
        }

        Commands::Config { set_language, set_tesseract_path, set_tessdata_path, show } => {
            let mut config = config;

            if let Some(language) = set_language {
                config.set_default_language(language)?;
                println!("✔ 既定の言語を設定しました");
            }

            if let Some(path) = set_tesseract_path {
                config.set_tesseract_path(path)?;
                println!("✔ tesseract のパスを設定しました");
            }

            if let Some(path) = set_tessdata_path {
                config.set_tessdata_path(path)?;
                println!("✔ tessdata のパスを設定しました");
            }

            if show {
                println!("設定:");
                println!("  設定ファイル: {}", Config::config_path()?.display());
                println!("  tesseract: {}", config.tesseract_binary());
                println!("  tessdata: {}", config.tessdata_path.as_deref().unwrap_or("(既定)"));
                println!("  既定の言語: {}", config.default_language);
                println!("  PSM / OEM: {} / {}", config.psm, config.oem);
                println!("  タイムアウト: {}秒", config.timeout_seconds);
                println!("  出力ファイル名: {}", config.output_name);
                println!("  フッター表記: {}", config.attribution);
            }
        }
    }

    Ok(())
}

/// `--verbose` で debug、それ以外は warn（RUST_LOG があればそちらを優先）
fn init_logger(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .format_timestamp(None)
        .init();
}

async fn recognizer_ready(engine: &TesseractCli, language: &str) -> Result<()> {
    ocr_batch::recognizer::validate_language(language)?;
    engine.ensure_available().await
}

fn export_options(config: &Config, title: &str, language: &str) -> ExportOptions {
    ExportOptions {
        name: config.output_name.clone(),
        title: title.to_string(),
        language: language.to_string(),
        layout: DocumentLayout::a4().with_attribution(config.attribution.clone()),
    }
}

fn is_stdout(path: &Path) -> bool {
    path.as_os_str() == "-"
}
