//! lopdfによるPDFテキスト断片抽出（ネイティブ用）
//!
//! ページのコンテンツストリームを解釈し、テキスト行列のY座標を追いながら
//! 文字列表示オペレータごとに断片を1つ出す。レイアウト解析はしない。

use crate::engine::{DocumentParser, PdfDocument, TextFragment};
use lopdf::content::Content;
use lopdf::{Document, Object, ObjectId};

/// TJ配列内でこれより大きく左に詰める調整値（1/1000 em）は単語区切りとみなす
const TJ_SPACE_ADJUSTMENT: f32 = -200.0;

#[derive(Debug, Default, Clone, Copy)]
pub struct LopdfParser;

impl LopdfParser {
    pub fn new() -> Self {
        Self
    }
}

pub struct LopdfDocument {
    document: Document,
    page_ids: Vec<ObjectId>,
}

impl DocumentParser for LopdfParser {
    type Document = LopdfDocument;

    async fn open(&self, bytes: &[u8]) -> Result<LopdfDocument, String> {
        let document = Document::load_mem(bytes).map_err(|e| e.to_string())?;

        if document.trailer.get(b"Encrypt").is_ok() {
            return Err("encrypted documents are not supported".to_string());
        }

        let page_ids = document.get_pages().into_values().collect();
        Ok(LopdfDocument { document, page_ids })
    }
}

impl PdfDocument for LopdfDocument {
    fn page_count(&self) -> usize {
        self.page_ids.len()
    }

    async fn page_fragments(&self, page_number: usize) -> Result<Vec<TextFragment>, String> {
        let page_id = page_number
            .checked_sub(1)
            .and_then(|i| self.page_ids.get(i))
            .ok_or_else(|| format!("page {} does not exist", page_number))?;

        let data = self
            .document
            .get_page_content(*page_id)
            .map_err(|e| format!("page {}: {}", page_number, e))?;
        let content =
            Content::decode(&data).map_err(|e| format!("page {}: {}", page_number, e))?;

        Ok(interpret_text_operations(&content))
    }
}

/// 行行列 `[a b c d e f]` と行送り量
///
/// Td/TD/T* の移動量はテキスト空間の値なので、行行列を通してから
/// ベースラインに反映する。
#[derive(Debug)]
struct TextCursor {
    line_matrix: [f32; 6],
    leading: f32,
}

const IDENTITY: [f32; 6] = [1.0, 0.0, 0.0, 1.0, 0.0, 0.0];

impl Default for TextCursor {
    fn default() -> Self {
        Self {
            line_matrix: IDENTITY,
            leading: 0.0,
        }
    }
}

impl TextCursor {
    fn baseline(&self) -> f32 {
        self.line_matrix[5]
    }

    fn translate(&mut self, tx: f32, ty: f32) {
        let [a, b, c, d, e, f] = self.line_matrix;
        self.line_matrix[4] = a * tx + c * ty + e;
        self.line_matrix[5] = b * tx + d * ty + f;
    }

    fn next_line(&mut self) {
        self.translate(0.0, -self.leading);
    }
}

fn interpret_text_operations(content: &Content) -> Vec<TextFragment> {
    let mut cursor = TextCursor::default();
    let mut fragments = Vec::new();

    for operation in &content.operations {
        let operands = &operation.operands;
        match operation.operator.as_str() {
            "BT" => cursor.line_matrix = IDENTITY,
            "Tm" => {
                let values: Vec<f32> = operands.iter().filter_map(number).collect();
                if let Ok(matrix) = <[f32; 6]>::try_from(values) {
                    cursor.line_matrix = matrix;
                }
            }
            "Td" | "TD" => {
                if let (Some(tx), Some(ty)) = (
                    operands.first().and_then(number),
                    operands.get(1).and_then(number),
                ) {
                    if operation.operator == "TD" {
                        cursor.leading = -ty;
                    }
                    cursor.translate(tx, ty);
                }
            }
            "TL" => {
                if let Some(leading) = operands.first().and_then(number) {
                    cursor.leading = leading;
                }
            }
            "T*" => cursor.next_line(),
            "Tj" => {
                if let Some(text) = operands.first().and_then(string_operand) {
                    fragments.push(TextFragment::new(text, cursor.baseline()));
                }
            }
            "'" => {
                cursor.next_line();
                if let Some(text) = operands.first().and_then(string_operand) {
                    fragments.push(TextFragment::new(text, cursor.baseline()));
                }
            }
            "\"" => {
                cursor.next_line();
                if let Some(text) = operands.get(2).and_then(string_operand) {
                    fragments.push(TextFragment::new(text, cursor.baseline()));
                }
            }
            "TJ" => {
                if let Some(Object::Array(items)) = operands.first() {
                    fragments.push(TextFragment::new(join_tj_array(items), cursor.baseline()));
                }
            }
            _ => {}
        }
    }

    fragments
}

#[allow(clippy::unnecessary_cast)]
fn number(object: &Object) -> Option<f32> {
    object.as_float().ok().map(|v| v as f32)
}

fn string_operand(object: &Object) -> Option<String> {
    match object {
        Object::String(bytes, _) => Some(decode_pdf_string(bytes)),
        _ => None,
    }
}

fn join_tj_array(items: &[Object]) -> String {
    let mut text = String::new();
    for item in items {
        match item {
            Object::String(bytes, _) => text.push_str(&decode_pdf_string(bytes)),
            other => {
                if let Some(adjustment) = number(other) {
                    if adjustment < TJ_SPACE_ADJUSTMENT && !text.ends_with(' ') {
                        text.push(' ');
                    }
                }
            }
        }
    }
    text
}

/// WinAnsiEncoding の 0x80..=0x9F（未定義は置換文字）
const WIN_ANSI_HIGH: [char; 32] = [
    '€', '\u{FFFD}', '‚', 'ƒ', '„', '…', '†', '‡', 'ˆ', '‰', 'Š', '‹', 'Œ', '\u{FFFD}', 'Ž',
    '\u{FFFD}', '\u{FFFD}', '‘', '’', '“', '”', '•', '–', '—', '˜', '™', 'š', '›', 'œ',
    '\u{FFFD}', 'ž', 'Ÿ',
];

fn win_ansi_char(byte: u8) -> char {
    match byte {
        0x80..=0x9F => WIN_ANSI_HIGH[(byte - 0x80) as usize],
        _ => byte as char,
    }
}

/// PDF文字列をデコード
///
/// BOM付きはUTF-16BE、それ以外はWinAnsiEncodingとして1バイト1文字で扱う。
/// フォントごとのEncoding辞書は見ない。CIDフォントのグリフIDは復元できない。
pub fn decode_pdf_string(bytes: &[u8]) -> String {
    if let Some(utf16) = bytes.strip_prefix(&[0xFE, 0xFF]) {
        let units = utf16
            .chunks_exact(2)
            .map(|pair| u16::from_be_bytes([pair[0], pair[1]]));
        return char::decode_utf16(units)
            .map(|r| r.unwrap_or(char::REPLACEMENT_CHARACTER))
            .collect();
    }

    bytes.iter().map(|&b| win_ansi_char(b)).collect()
}
