//! エラー型定義
//!
//! 表示文字列はそのままUIに出すため、人が読める英文にしている。

use thiserror::Error;

/// 入力ファイル検証エラー
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("No file selected")]
    Missing,

    #[error("Unsupported file format. Please upload a PDF, PNG, JPG, or WEBP file.")]
    UnsupportedFormat(String),

    #[error("File size exceeds 25MB limit. Current: {:.2}MB", as_mib(.0))]
    TooLarge(u64),
}

fn as_mib(bytes: &u64) -> f64 {
    *bytes as f64 / (1024.0 * 1024.0)
}

/// プレビュー生成エラー（原因の種類は区別しない）
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PreviewError {
    #[error("Failed to read file")]
    ReadFailed,
}

/// 抽出エラー
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ExtractionError {
    #[error("PDF extraction failed: {0}")]
    Pdf(String),

    #[error("OCR extraction failed: {0}")]
    Ocr(String),
}

/// 共通エラー型
#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Preview(#[from] PreviewError),

    #[error(transparent)]
    Extraction(#[from] ExtractionError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result型エイリアス
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_too_large_message_has_two_decimals() {
        let error = ValidationError::TooLarge(30 * 1024 * 1024);
        assert_eq!(error.to_string(), "File size exceeds 25MB limit. Current: 30.00MB");

        let error = ValidationError::TooLarge(26_843_546);
        assert_eq!(error.to_string(), "File size exceeds 25MB limit. Current: 25.60MB");
    }

    #[test]
    fn test_unsupported_message_ignores_media_type() {
        let a = ValidationError::UnsupportedFormat("text/plain".to_string());
        let b = ValidationError::UnsupportedFormat("image/gif".to_string());
        assert_eq!(a.to_string(), b.to_string());
        assert!(a.to_string().starts_with("Unsupported file format"));
    }

    #[test]
    fn test_extraction_error_prefixes() {
        let pdf = ExtractionError::Pdf("Invalid file header".to_string());
        assert_eq!(pdf.to_string(), "PDF extraction failed: Invalid file header");

        let ocr = ExtractionError::Ocr("worker crashed".to_string());
        assert_eq!(ocr.to_string(), "OCR extraction failed: worker crashed");
    }

    #[test]
    fn test_preview_error_is_generic() {
        assert_eq!(PreviewError::ReadFailed.to_string(), "Failed to read file");
    }

    #[test]
    fn test_error_transparent_display() {
        let error: Error = ValidationError::Missing.into();
        assert_eq!(error.to_string(), "No file selected");
        assert!(matches!(error, Error::Validation(_)));
    }

    #[test]
    fn test_error_from_io() {
        let io_error = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "access denied");
        let error: Error = io_error.into();
        assert!(matches!(error, Error::Io(_)));
        assert!(error.to_string().contains("access denied"));
    }
}
