//! pdf.js によるPDFテキスト断片取得

use super::js_error_message;
use textsnap_common::{DocumentParser, PdfDocument, TextFragment};
use wasm_bindgen::prelude::*;

#[wasm_bindgen(module = "/js/pdf-bridge.js")]
extern "C" {
    /// PDFを開いて文書ハンドルを返す
    ///
    /// `data` はワーカーへ転送されるため、WASMメモリとは別のコピーを渡す。
    #[wasm_bindgen(js_name = "openDocument", catch)]
    async fn open_document_js(data: js_sys::Uint8Array) -> Result<JsValue, JsValue>;

    #[wasm_bindgen(js_name = "pageCount")]
    fn page_count_js(handle: &JsValue) -> u32;

    /// 1ページ分の `[{text, y}]` をJSON文字列で返す
    #[wasm_bindgen(js_name = "pageFragments", catch)]
    async fn page_fragments_js(handle: &JsValue, page_number: u32) -> Result<JsValue, JsValue>;

    #[wasm_bindgen(js_name = "closeDocument")]
    fn close_document_js(handle: &JsValue);
}

#[derive(Debug, Default, Clone, Copy)]
pub struct PdfJsParser;

/// 開いた文書。ドロップ時にpdf.js側の資源を解放する
pub struct PdfJsDocument {
    handle: JsValue,
    pages: usize,
}

impl DocumentParser for PdfJsParser {
    type Document = PdfJsDocument;

    async fn open(&self, bytes: &[u8]) -> Result<PdfJsDocument, String> {
        let data = js_sys::Uint8Array::from(bytes);
        let handle = open_document_js(data)
            .await
            .map_err(|e| js_error_message(&e))?;
        let pages = page_count_js(&handle) as usize;
        Ok(PdfJsDocument { handle, pages })
    }
}

impl PdfDocument for PdfJsDocument {
    fn page_count(&self) -> usize {
        self.pages
    }

    async fn page_fragments(&self, page_number: usize) -> Result<Vec<TextFragment>, String> {
        let json = page_fragments_js(&self.handle, page_number as u32)
            .await
            .map_err(|e| js_error_message(&e))?
            .as_string()
            .ok_or_else(|| format!("page {}: unexpected text content", page_number))?;

        parse_fragments(&json)
    }
}

impl Drop for PdfJsDocument {
    fn drop(&mut self) {
        close_document_js(&self.handle);
    }
}

fn parse_fragments(json: &str) -> Result<Vec<TextFragment>, String> {
    serde_json::from_str(json).map_err(|e| format!("invalid text content: {}", e))
}
