//! テキストのエクスポート
//!
//! ダウンロードされるファイルの中身は抽出テキストそのもの（UTF-8、BOMなし）。

use std::path::Path;

/// `report.pdf` → `report.txt`
///
/// 拡張子がなければそのまま `.txt` を付ける。パス区切りは取り除く。
pub fn text_file_name(file_name: &str) -> String {
    let base = file_name
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or(file_name);
    let stem = Path::new(base)
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| "extracted".to_string());
    format!("{}.txt", stem)
}

pub fn text_file_bytes(text: &str) -> Vec<u8> {
    text.as_bytes().to_vec()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_file_name() {
        assert_eq!(text_file_name("report.pdf"), "report.txt");
        assert_eq!(text_file_name("scan.final.png"), "scan.final.txt");
        assert_eq!(text_file_name("README"), "README.txt");
        assert_eq!(text_file_name("dir/sub\\photo.jpeg"), "photo.txt");
        assert_eq!(text_file_name(""), "extracted.txt");
    }

    #[test]
    fn test_download_round_trip_is_exact() {
        let text = "Invoice 2026-001\n\n  Total: 42.00 €\nありがとう";
        let bytes = text_file_bytes(text);
        assert_eq!(String::from_utf8(bytes).unwrap(), text);
    }
}
