//! クリップボードとファイル保存

use textsnap_common::{text_file_bytes, text_file_name, ExtractedResult};
use wasm_bindgen::prelude::*;

#[wasm_bindgen(module = "/js/download.js")]
extern "C" {
    /// バイト列を `text/plain` として保存させる
    #[wasm_bindgen(js_name = "downloadText")]
    fn download_text_js(data: &[u8], filename: &str);

    #[wasm_bindgen(js_name = "copyText", catch)]
    pub async fn copy_text_js(text: &str) -> Result<(), JsValue>;
}

/// 抽出テキストを `<元の名前>.txt` で保存
pub fn download_text(result: &ExtractedResult) {
    download_text_js(
        &text_file_bytes(&result.extracted_text),
        &text_file_name(&result.file_name),
    );
}
