//! Tesseract.js によるOCR
//!
//! 画像はObject URLとして渡す。URLは `gloo::file::ObjectUrl` が保持し、
//! 認識の成否にかかわらずスコープを抜けた時点で解放される。

use super::js_error_message;
use futures::channel::mpsc;
use futures::{FutureExt, StreamExt};
use gloo::file::{Blob, ObjectUrl};
use serde::Deserialize;
use textsnap_common::{OcrEngine, OcrOutput};
use wasm_bindgen::prelude::*;

#[wasm_bindgen(module = "/js/ocr-bridge.js")]
extern "C" {
    /// 認識を実行して `{text, confidence}` を返す
    ///
    /// `on_progress` には認識段階の進捗（0〜1）が渡される。
    #[wasm_bindgen(js_name = "recognize", catch)]
    async fn recognize_js(
        image_url: &str,
        language: &str,
        on_progress: &Closure<dyn FnMut(f64)>,
    ) -> Result<JsValue, JsValue>;
}

#[derive(Debug, Deserialize)]
struct JsOcrResult {
    text: String,
    confidence: Option<f32>,
}

#[derive(Debug, Default, Clone, Copy)]
pub struct TesseractJs;

impl OcrEngine for TesseractJs {
    async fn recognize(
        &self,
        bytes: &[u8],
        media_type: &str,
        language: &str,
        on_progress: &dyn Fn(f32),
    ) -> Result<OcrOutput, String> {
        let url = ObjectUrl::from(Blob::new_with_options(bytes, Some(media_type)));

        // JSのコールバックは 'static が必要なのでチャネル経由で受け取る
        let (tx, mut rx) = mpsc::unbounded::<f32>();
        let callback = Closure::<dyn FnMut(f64)>::new(move |fraction: f64| {
            let _ = tx.unbounded_send(fraction as f32);
        });

        let recognition = recognize_js(&url, language, &callback).fuse();
        futures::pin_mut!(recognition);

        let result = loop {
            futures::select! {
                fraction = rx.next() => {
                    if let Some(fraction) = fraction {
                        on_progress(fraction);
                    }
                }
                result = recognition => break result,
            }
        };
        while let Ok(Some(fraction)) = rx.try_next() {
            on_progress(fraction);
        }

        let value = result.map_err(|e| {
            let message = js_error_message(&e);
            gloo::console::error!(format!("OCR failed: {}", message));
            message
        })?;
        let output: JsOcrResult =
            serde_wasm_bindgen::from_value(value).map_err(|e| e.to_string())?;

        Ok(OcrOutput {
            text: output.text,
            confidence: output.confidence,
        })
    }
}
