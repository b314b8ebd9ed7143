//! 入力ファイル検証
//!
//! 宣言されたMIMEタイプとサイズだけで判定する純関数。I/Oは行わない。

use crate::error::ValidationError;
use crate::types::FileInfo;
use std::path::Path;

/// 受け付けるMIMEタイプ
pub const ACCEPTED_MEDIA_TYPES: &[&str] = &[
    "application/pdf",
    "image/png",
    "image/jpeg",
    "image/jpg",
    "image/webp",
];

/// ファイル選択ダイアログの拡張子フィルタ
pub const ACCEPTED_EXTENSIONS: &[&str] = &[".pdf", ".png", ".jpg", ".jpeg", ".webp"];

/// 最大ファイルサイズ（25 MiB）
pub const MAX_FILE_SIZE: u64 = 25 * 1024 * 1024;

/// ファイルを検証する
///
/// 判定順: 未指定 → 形式 → サイズ。形式が不正ならサイズに関係なく形式エラー。
pub fn validate_file(file: Option<&FileInfo>) -> Result<(), ValidationError> {
    let file = file.ok_or(ValidationError::Missing)?;

    if !is_accepted_media_type(&file.media_type) {
        return Err(ValidationError::UnsupportedFormat(file.media_type.clone()));
    }

    if file.size > MAX_FILE_SIZE {
        return Err(ValidationError::TooLarge(file.size));
    }

    Ok(())
}

pub fn is_accepted_media_type(media_type: &str) -> bool {
    ACCEPTED_MEDIA_TYPES.contains(&media_type)
}

/// `<input accept=...>` 用の文字列
pub fn accept_attribute() -> String {
    ACCEPTED_EXTENSIONS.join(",")
}

/// 拡張子からMIMEタイプを推定（ブラウザが宣言しない環境向け）
///
/// 未知の拡張子は `application/octet-stream` を返し、検証で弾かれる。
pub fn media_type_for_path(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .map(|e| e.to_string_lossy().to_lowercase())
        .unwrap_or_default();

    match ext.as_str() {
        "pdf" => "application/pdf",
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "webp" => "image/webp",
        _ => "application/octet-stream",
    }
}
