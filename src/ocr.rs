//! tesseract実行ファイルによるOCR
//!
//! 入力画像は一度PNGに変換して一時ファイルに書き出し、
//! `tesseract <png> stdout -l <lang> tsv` の出力を解析する。
//! 一時ファイルは成功・失敗どちらでも関数を抜けた時点で削除される。

use crate::config::Config;
use crate::error::{Result, TextsnapError};
use image::ImageFormat;
use std::time::Duration;
use tempfile::NamedTempFile;
use textsnap_common::{OcrEngine, OcrOutput};
use tokio::process::Command;

pub struct TesseractCli {
    command: String,
    timeout: Duration,
}

impl TesseractCli {
    pub fn new(command: impl Into<String>, timeout: Duration) -> Self {
        Self {
            command: command.into(),
            timeout,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(
            config.tesseract_command(),
            Duration::from_secs(config.timeout_seconds),
        )
    }

    async fn run(&self, bytes: &[u8], language: &str, on_progress: &dyn Fn(f32)) -> Result<OcrOutput> {
        on_progress(0.0);
        let png = to_png_tempfile(bytes)?;
        tracing::debug!("tesseract input: {}", png.path().display());

        let mut command = Command::new(&self.command);
        command
            .arg(png.path())
            .arg("stdout")
            .args(["-l", language])
            .arg("tsv")
            .kill_on_drop(true);

        let output = tokio::time::timeout(self.timeout, command.output())
            .await
            .map_err(|_| {
                TextsnapError::Tesseract(format!("{}秒でタイムアウトしました", self.timeout.as_secs()))
            })?
            .map_err(|e| TextsnapError::Tesseract(format!("{} を起動できません: {}", self.command, e)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(TextsnapError::Tesseract(format!(
                "tesseract failed (code {:?}): {}",
                output.status.code(),
                stderr.trim()
            )));
        }
        on_progress(1.0);

        let tsv = String::from_utf8_lossy(&output.stdout);
        Ok(parse_tsv(&tsv))
    }
}

impl OcrEngine for TesseractCli {
    async fn recognize(
        &self,
        bytes: &[u8],
        media_type: &str,
        language: &str,
        on_progress: &dyn Fn(f32),
    ) -> std::result::Result<OcrOutput, String> {
        tracing::debug!("OCR start: {} ({} bytes)", media_type, bytes.len());
        self.run(bytes, language, on_progress)
            .await
            .map_err(|e| e.to_string())
    }
}

/// 画像をデコードしてPNGの一時ファイルにする
fn to_png_tempfile(bytes: &[u8]) -> Result<NamedTempFile> {
    let image = image::load_from_memory(bytes).map_err(|e| TextsnapError::ImageLoad(e.to_string()))?;

    let file = tempfile::Builder::new()
        .prefix("textsnap-")
        .suffix(".png")
        .tempfile()?;
    image
        .save_with_format(file.path(), ImageFormat::Png)
        .map_err(|e| TextsnapError::ImageLoad(e.to_string()))?;

    Ok(file)
}

/// tesseractのTSV出力からテキストと平均信頼度を作る
///
/// 単語(level 5)だけを使い、同じ行は空白、行が変われば改行、
/// ブロックが変われば空行で区切る。単語がなければ信頼度はNone。
pub fn parse_tsv(tsv: &str) -> OcrOutput {
    let mut text = String::new();
    let mut last: Option<[u32; 4]> = None;
    let mut conf_sum = 0.0f64;
    let mut conf_count = 0usize;

    for row in tsv.lines().skip(1) {
        let cols: Vec<&str> = row.splitn(12, '\t').collect();
        if cols.len() < 12 || cols[0] != "5" {
            continue;
        }
        let word = cols[11].trim();
        if word.is_empty() {
            continue;
        }

        // page, block, par, line
        let key: [u32; 4] = [cols[1], cols[2], cols[3], cols[4]].map(|c| c.trim().parse().unwrap_or(0));
        if let Some(prev) = last {
            if prev[..2] != key[..2] {
                text.push_str("\n\n");
            } else if prev != key {
                text.push('\n');
            } else {
                text.push(' ');
            }
        }
        text.push_str(word);
        last = Some(key);

        if let Ok(conf) = cols[10].trim().parse::<f64>() {
            if conf >= 0.0 {
                conf_sum += conf;
                conf_count += 1;
            }
        }
    }

    OcrOutput {
        text,
        confidence: (conf_count > 0).then(|| (conf_sum / conf_count as f64) as f32),
    }
}
