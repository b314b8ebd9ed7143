//! 抽出エンジン
//!
//! MIMEタイプで処理を振り分ける:
//! - `application/pdf`: ページごとに位置付きテキスト断片を取得し、Y座標の差で改行を復元
//! - それ以外: OCR（英語固定）
//!
//! PDFパーサとOCRは外部ライブラリなのでトレイトで受け取る。
//! ブラウザ側のFutureは `Send` ではないため、トレイトにも `Send` 制約は付けない。

use crate::error::ExtractionError;
use crate::types::{FileType, UploadedFile};
use serde::{Deserialize, Serialize};

/// OCR認識言語
pub const OCR_LANGUAGE: &str = "eng";

/// 連続する断片のY座標差がこれを超えたら改行とみなす
pub const LINE_BREAK_THRESHOLD: f32 = 5.0;

/// 位置付きテキスト断片
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextFragment {
    pub text: String,
    /// ベースラインのY座標（PDF座標系）
    pub y: f32,
}

impl TextFragment {
    pub fn new(text: impl Into<String>, y: f32) -> Self {
        Self { text: text.into(), y }
    }
}

/// 進捗通知（0〜100の整数パーセント）
pub trait ProgressReporter {
    fn report(&self, percent: u8);
}

impl<F: Fn(u8)> ProgressReporter for F {
    fn report(&self, percent: u8) {
        self(percent)
    }
}

/// 開いたPDF文書
#[allow(async_fn_in_trait)]
pub trait PdfDocument {
    fn page_count(&self) -> usize;

    /// `page_number` は1始まり
    async fn page_fragments(&self, page_number: usize) -> Result<Vec<TextFragment>, String>;
}

/// PDFパーサ
#[allow(async_fn_in_trait)]
pub trait DocumentParser {
    type Document: PdfDocument;

    async fn open(&self, bytes: &[u8]) -> Result<Self::Document, String>;
}

/// OCRの生出力
#[derive(Debug, Clone, PartialEq, Default)]
pub struct OcrOutput {
    pub text: String,
    pub confidence: Option<f32>,
}

/// OCRエンジン
///
/// `on_progress` にはライブラリが報告する [0, 1] の割合をそのまま渡す。
#[allow(async_fn_in_trait)]
pub trait OcrEngine {
    async fn recognize(
        &self,
        bytes: &[u8],
        media_type: &str,
        language: &str,
        on_progress: &dyn Fn(f32),
    ) -> Result<OcrOutput, String>;
}

/// 抽出結果（エンジン出力）
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractionOutput {
    pub text: String,
    pub confidence: Option<f32>,
}

pub struct ExtractionEngine<P, O> {
    parser: P,
    ocr: O,
}

impl<P, O> ExtractionEngine<P, O>
where
    P: DocumentParser,
    O: OcrEngine,
{
    pub fn new(parser: P, ocr: O) -> Self {
        Self { parser, ocr }
    }

    pub async fn extract(
        &self,
        file: &UploadedFile,
        progress: &dyn ProgressReporter,
    ) -> Result<ExtractionOutput, ExtractionError> {
        match file.file_type() {
            FileType::Document => self.extract_document(&file.bytes, progress).await,
            FileType::Image => {
                self.extract_image(&file.bytes, &file.info.media_type, progress)
                    .await
            }
        }
    }

    async fn extract_document(
        &self,
        bytes: &[u8],
        progress: &dyn ProgressReporter,
    ) -> Result<ExtractionOutput, ExtractionError> {
        let document = self.parser.open(bytes).await.map_err(ExtractionError::Pdf)?;
        let total = document.page_count();
        tracing::debug!("PDF opened: {} pages", total);

        let mut pages = Vec::with_capacity(total);
        for page_number in 1..=total {
            let fragments = document
                .page_fragments(page_number)
                .await
                .map_err(ExtractionError::Pdf)?;
            tracing::debug!("page {}/{}: {} fragments", page_number, total, fragments.len());

            pages.push(reconstruct_page_text(&fragments));
            progress.report(page_percent(page_number, total));
        }

        Ok(ExtractionOutput {
            text: pages.join("\n\n").trim().to_string(),
            confidence: None,
        })
    }

    async fn extract_image(
        &self,
        bytes: &[u8],
        media_type: &str,
        progress: &dyn ProgressReporter,
    ) -> Result<ExtractionOutput, ExtractionError> {
        let on_progress = |fraction: f32| progress.report(fraction_to_percent(fraction));

        let output = self
            .ocr
            .recognize(bytes, media_type, OCR_LANGUAGE, &on_progress)
            .await
            .map_err(ExtractionError::Ocr)?;

        Ok(ExtractionOutput {
            text: output.text.trim().to_string(),
            confidence: Some(normalize_confidence(output.confidence)),
        })
    }
}

/// 1ページ分の断片を連結する
///
/// 直前の断片とのY差が閾値を超えれば改行、同じ行なら空白1つで区切る。
/// 空の断片は位置情報ごと無視する。
pub fn reconstruct_page_text(fragments: &[TextFragment]) -> String {
    let mut text = String::new();
    let mut last_y: Option<f32> = None;

    for fragment in fragments {
        if fragment.text.is_empty() {
            continue;
        }

        if let Some(y) = last_y {
            if (y - fragment.y).abs() > LINE_BREAK_THRESHOLD {
                text.push('\n');
            } else if !text.ends_with(char::is_whitespace)
                && !fragment.text.starts_with(char::is_whitespace)
            {
                text.push(' ');
            }
        }

        text.push_str(&fragment.text);
        last_y = Some(fragment.y);
    }

    text
}

/// ページ進捗（四捨五入）
pub fn page_percent(page_number: usize, total: usize) -> u8 {
    if total == 0 {
        return 100;
    }
    let percent = (page_number as f64 * 100.0 / total as f64).round();
    percent.clamp(0.0, 100.0) as u8
}

/// [0, 1] の割合を整数パーセントへ
pub fn fraction_to_percent(fraction: f32) -> u8 {
    if !fraction.is_finite() {
        return 0;
    }
    (fraction.clamp(0.0, 1.0) * 100.0).round() as u8
}

fn normalize_confidence(confidence: Option<f32>) -> f32 {
    match confidence {
        Some(c) if c.is_finite() => c.clamp(0.0, 100.0),
        _ => 0.0,
    }
}


#[cfg(test)]
mod tests {
    use super::testing::{FakeOcr, FakeParser};
    use super::*;
    use futures::executor::block_on;
    use std::cell::RefCell;

    fn pdf_file() -> UploadedFile {
        UploadedFile::new("report.pdf", "application/pdf", b"%PDF-1.4".to_vec())
    }

    fn png_file() -> UploadedFile {
        UploadedFile::new("scan.png", "image/png", vec![0x89, b'P', b'N', b'G'])
    }

    #[test]
    fn test_reconstruct_line_breaks_by_y_delta() {
        let fragments = vec![
            TextFragment::new("Hello", 700.0),
            TextFragment::new("world", 700.0),
            TextFragment::new("next", 686.0),
            TextFragment::new("line", 683.0),
        ];
        assert_eq!(reconstruct_page_text(&fragments), "Hello world\nnext line");
    }

    #[test]
    fn test_reconstruct_threshold_is_exclusive() {
        let fragments = vec![TextFragment::new("a", 100.0), TextFragment::new("b", 95.0)];
        assert_eq!(reconstruct_page_text(&fragments), "a b");

        let fragments = vec![TextFragment::new("a", 100.0), TextFragment::new("b", 94.9)];
        assert_eq!(reconstruct_page_text(&fragments), "a\nb");
    }

    #[test]
    fn test_reconstruct_skips_empty_and_avoids_double_spaces() {
        let fragments = vec![
            TextFragment::new("Total:", 500.0),
            TextFragment::new("", 100.0),
            TextFragment::new(" ", 500.0),
            TextFragment::new("42", 500.0),
        ];
        assert_eq!(reconstruct_page_text(&fragments), "Total: 42");
    }

    #[test]
    fn test_page_percent_rounding() {
        assert_eq!(page_percent(1, 3), 33);
        assert_eq!(page_percent(2, 3), 67);
        assert_eq!(page_percent(3, 3), 100);
        assert_eq!(page_percent(1, 1), 100);
        assert_eq!(page_percent(0, 0), 100);
    }

    #[test]
    fn test_fraction_to_percent() {
        assert_eq!(fraction_to_percent(0.0), 0);
        assert_eq!(fraction_to_percent(0.504), 50);
        assert_eq!(fraction_to_percent(1.0), 100);
        assert_eq!(fraction_to_percent(1.7), 100);
        assert_eq!(fraction_to_percent(-0.2), 0);
        assert_eq!(fraction_to_percent(f32::NAN), 0);
    }

    #[test]
    fn test_three_page_document_progress() {
        let engine = ExtractionEngine::new(FakeParser::with_pages(3, 10), FakeOcr::failing());
        let ticks = RefCell::new(Vec::new());
        let reporter = |p: u8| ticks.borrow_mut().push(p);

        let output = block_on(engine.extract(&pdf_file(), &reporter)).expect("抽出失敗");

        assert_eq!(*ticks.borrow(), vec![33, 67, 100]);
        assert!(!output.text.is_empty());
        assert_eq!(output.confidence, None);
        assert!(output.text.contains("p1l0\np1l1"));
        assert!(output.text.contains("p1l9\n\np2l0"));
        assert_eq!(engine.ocr.calls.get(), 0);
    }

    #[test]
    fn test_many_pages_progress_is_non_decreasing() {
        let engine = ExtractionEngine::new(FakeParser::with_pages(17, 2), FakeOcr::failing());
        let ticks = RefCell::new(Vec::new());
        let reporter = |p: u8| ticks.borrow_mut().push(p);

        block_on(engine.extract(&pdf_file(), &reporter)).expect("抽出失敗");

        let ticks = ticks.into_inner();
        assert_eq!(ticks.len(), 17);
        assert!(ticks.windows(2).all(|w| w[0] <= w[1]));
        assert_eq!(*ticks.last().unwrap(), 100);
    }

    #[test]
    fn test_corrupt_document_error_prefix() {
        let engine = ExtractionEngine::new(FakeParser::corrupt(), FakeOcr::failing());
        let err = block_on(engine.extract(&pdf_file(), &|_: u8| {})).unwrap_err();
        assert_eq!(err, ExtractionError::Pdf("Invalid PDF structure".to_string()));
        assert!(err.to_string().starts_with("PDF extraction failed:"));
    }

    #[test]
    fn test_image_path_uses_ocr_and_scales_progress() {
        let ocr = FakeOcr::recognizing("  Receipt\nTotal 42  \n", Some(91.5));
        let engine = ExtractionEngine::new(FakeParser::corrupt(), ocr);
        let ticks = RefCell::new(Vec::new());
        let reporter = |p: u8| ticks.borrow_mut().push(p);

        let output = block_on(engine.extract(&png_file(), &reporter)).expect("OCR失敗");

        assert_eq!(output.text, "Receipt\nTotal 42");
        assert_eq!(output.confidence, Some(91.5));
        assert_eq!(*ticks.borrow(), vec![0, 25, 50, 100]);
        assert_eq!(engine.ocr.calls.get(), 1);
    }

    #[test]
    fn test_image_missing_confidence_is_zero() {
        let engine = ExtractionEngine::new(
            FakeParser::corrupt(),
            FakeOcr::recognizing("text", None),
        );
        let output = block_on(engine.extract(&png_file(), &|_: u8| {})).expect("OCR失敗");
        assert_eq!(output.confidence, Some(0.0));
    }

    #[test]
    fn test_image_failure_error_prefix() {
        let engine = ExtractionEngine::new(FakeParser::corrupt(), FakeOcr::failing());
        let err = block_on(engine.extract(&png_file(), &|_: u8| {})).unwrap_err();
        assert!(err.to_string().starts_with("OCR extraction failed:"));
    }

    #[test]
    fn test_confidence_is_clamped() {
        assert_eq!(normalize_confidence(Some(140.0)), 100.0);
        assert_eq!(normalize_confidence(Some(-3.0)), 0.0);
        assert_eq!(normalize_confidence(Some(f32::NAN)), 0.0);
    }
}
