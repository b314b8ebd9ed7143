//! 抽出処理の型定義
//!
//! CLIとWeb(WASM)で共有される型:
//! - FileInfo / UploadedFile: 入力ファイル
//! - ExtractionProgress: 進捗レコード（同時に1件のみ）
//! - ExtractedResult: 抽出結果（生成後は不変）

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// PDFのMIMEタイプ
pub const PDF_MEDIA_TYPE: &str = "application/pdf";

/// 入力ファイルのメタ情報（検証はこれだけで行う）
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileInfo {
    pub name: String,
    pub media_type: String,
    pub size: u64,
}

/// アップロードされたファイル本体
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub info: FileInfo,
    pub bytes: Vec<u8>,
}

impl UploadedFile {
    pub fn new(name: impl Into<String>, media_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            info: FileInfo {
                name: name.into(),
                media_type: media_type.into(),
                size: bytes.len() as u64,
            },
            bytes,
        }
    }

    pub fn file_type(&self) -> FileType {
        FileType::from_media_type(&self.info.media_type)
    }
}

/// ファイル種別
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileType {
    Document,
    Image,
}

impl FileType {
    /// `application/pdf` のみ文書扱い、それ以外は画像
    pub fn from_media_type(media_type: &str) -> Self {
        if media_type == PDF_MEDIA_TYPE {
            FileType::Document
        } else {
            FileType::Image
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            FileType::Document => "document",
            FileType::Image => "image",
        }
    }
}

/// 進捗ステータス
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExtractionStatus {
    #[default]
    Idle,
    Uploading,
    Extracting,
    Complete,
    Error,
}

impl ExtractionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExtractionStatus::Idle => "idle",
            ExtractionStatus::Uploading => "uploading",
            ExtractionStatus::Extracting => "extracting",
            ExtractionStatus::Complete => "complete",
            ExtractionStatus::Error => "error",
        }
    }
}

/// 進捗レコード
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractionProgress {
    pub file_name: String,
    /// 0〜100
    pub progress: u8,
    pub status: ExtractionStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ExtractionProgress {
    pub fn new(file_name: impl Into<String>, status: ExtractionStatus) -> Self {
        Self {
            file_name: file_name.into(),
            progress: 0,
            status,
            error: None,
        }
    }
}

/// 抽出結果
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractedResult {
    pub file_name: String,
    pub file_type: FileType,
    pub extracted_text: String,
    /// プレビュー用Data URL
    pub preview_url: String,
    /// OCR信頼度（0〜100、PDFではNone）
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f32>,
    pub extracted_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_type_dispatch() {
        assert_eq!(FileType::from_media_type("application/pdf"), FileType::Document);
        assert_eq!(FileType::from_media_type("image/png"), FileType::Image);
        assert_eq!(FileType::from_media_type("image/webp"), FileType::Image);
    }

    #[test]
    fn test_uploaded_file_size_from_bytes() {
        let file = UploadedFile::new("scan.png", "image/png", vec![0u8; 42]);
        assert_eq!(file.info.size, 42);
        assert_eq!(file.file_type(), FileType::Image);
    }

    #[test]
    fn test_extraction_progress_serialize() {
        let progress = ExtractionProgress {
            file_name: "report.pdf".to_string(),
            progress: 67,
            status: ExtractionStatus::Extracting,
            error: None,
        };

        let json = serde_json::to_string(&progress).expect("シリアライズ失敗");
        assert!(json.contains("\"fileName\":\"report.pdf\""));
        assert!(json.contains("\"status\":\"extracting\""));
        assert!(!json.contains("\"error\""));
    }

    #[test]
    fn test_extracted_result_deserialize_without_confidence() {
        let json = r#"{
            "fileName": "report.pdf",
            "fileType": "document",
            "extractedText": "Hello",
            "previewUrl": "data:application/pdf;base64,JVBERg==",
            "extractedAt": "2026-01-18T09:30:00Z"
        }"#;

        let result: ExtractedResult = serde_json::from_str(json).expect("デシリアライズ失敗");
        assert_eq!(result.file_type, FileType::Document);
        assert_eq!(result.extracted_text, "Hello");
        assert_eq!(result.confidence, None);
    }
}
