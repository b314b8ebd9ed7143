//! JavaScriptライブラリとの橋渡し
//!
//! pdf.js / Tesseract.js / クリップボード・ダウンロードはJS側に置き、
//! ここでは `wasm-bindgen` の宣言と共通トレイトの実装だけを持つ。

pub mod dom;
pub mod ocr;
pub mod pdf;

use wasm_bindgen::{JsCast, JsValue};

/// JS例外を表示用文字列にする
pub fn js_error_message(value: &JsValue) -> String {
    if let Some(error) = value.dyn_ref::<js_sys::Error>() {
        return String::from(error.message());
    }
    value.as_string().unwrap_or_else(|| format!("{:?}", value))
}
