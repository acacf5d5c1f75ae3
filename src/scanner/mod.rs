//! 入力画像の収集
//!
//! コマンドライン引数（ファイル / フォルダ / `-`=標準入力）から
//! キューに投入する ImageSource の一覧を作る。

use crate::batch::ImageSource;
use crate::error::{OcrBatchError, Result};
use std::io::Read;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// 標準入力を表す引数
pub const STDIN_ARG: &str = "-";

const IMAGE_EXTENSIONS: &[&str] = &[
    "jpg", "jpeg", "png", "gif", "bmp", "tif", "tiff", "webp", "pbm", "pgm", "ppm",
];

/// 拡張子が対応画像形式か（大文字小文字は区別しない）
pub fn is_image_path(path: &Path) -> bool {
    path.extension()
        .map(|ext| ext.to_string_lossy().to_lowercase())
        .is_some_and(|ext| IMAGE_EXTENSIONS.contains(&ext.as_str()))
}

/// フォルダ内の画像をファイル名順で取得
pub fn scan_folder(folder: &Path, recursive: bool) -> Result<Vec<PathBuf>> {
    if !folder.is_dir() {
        return Err(OcrBatchError::FolderNotFound(folder.display().to_string()));
    }

    let max_depth = if recursive { usize::MAX } else { 1 };
    let mut images: Vec<PathBuf> = WalkDir::new(folder)
        .max_depth(max_depth)
        .into_iter()
        .filter_map(|e| e.ok())
        .map(|entry| entry.into_path())
        .filter(|path| path.is_file() && is_image_path(path))
        .collect();

    // ファイル名でソート（再帰時はパス順）
    images.sort();

    Ok(images)
}

/// 引数一覧から画像を収集（引数の順序を保つ）
///
/// - フォルダ: 中の画像をファイル名順に展開
/// - ファイル: 画像拡張子でなければ警告してスキップ
/// - `-`: 標準入力から画像を1枚読む
pub fn collect_sources(inputs: &[PathBuf], recursive: bool) -> Result<Vec<ImageSource>> {
    let mut sources = Vec::new();

    for input in inputs {
        if input.as_os_str() == STDIN_ARG {
            sources.push(read_stdin_image()?);
            continue;
        }

        if input.is_dir() {
            let images = scan_folder(input, recursive)?;
            log::debug!("{}: {}枚", input.display(), images.len());
            sources.extend(images.into_iter().map(ImageSource::from_path));
        } else if input.is_file() {
            if is_image_path(input) {
                sources.push(ImageSource::from_path(input.clone()));
            } else {
                log::warn!("画像ファイルではないためスキップ: {}", input.display());
            }
        } else {
            return Err(OcrBatchError::FileNotFound(input.display().to_string()));
        }
    }

    Ok(sources)
}

/// 標準入力から画像を読み込む
pub fn read_stdin_image() -> Result<ImageSource> {
    let mut data = Vec::new();
    std::io::stdin().lock().read_to_end(&mut data)?;
    ImageSource::from_bytes("stdin", data)
}
