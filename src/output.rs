//! 抽出結果のファイル出力

use crate::error::Result;
use serde::Serialize;
use std::path::{Path, PathBuf};
use textsnap_common::export::{text_file_bytes, text_file_name};

/// テキストの出力先
///
/// 優先順: 明示指定 → 出力ディレクトリ → 入力ファイルの隣
pub fn text_output_path(input: &Path, output: Option<&Path>, output_dir: Option<&Path>) -> PathBuf {
    if let Some(path) = output {
        return path.to_path_buf();
    }

    let name = text_file_name(&input.file_name().map(|n| n.to_string_lossy()).unwrap_or_default());
    match output_dir {
        Some(dir) => dir.join(name),
        None => input.with_file_name(name),
    }
}

pub fn write_text(path: &Path, text: &str) -> Result<()> {
    ensure_parent(path)?;
    std::fs::write(path, text_file_bytes(text))?;
    Ok(())
}

pub fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<()> {
    ensure_parent(path)?;
    let json = serde_json::to_string_pretty(value)?;
    std::fs::write(path, json)?;
    Ok(())
}

fn ensure_parent(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_text_output_path() {
        let input = Path::new("/data/in/report.pdf");
        assert_eq!(
            text_output_path(input, None, None),
            PathBuf::from("/data/in/report.txt")
        );
        assert_eq!(
            text_output_path(input, None, Some(Path::new("/out"))),
            PathBuf::from("/out/report.txt")
        );
        assert_eq!(
            text_output_path(input, Some(Path::new("x.txt")), Some(Path::new("/out"))),
            PathBuf::from("x.txt")
        );
    }

    #[test]
    fn test_write_text_creates_parent() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("a").join("b").join("out.txt");
        write_text(&path, "hello\n").unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "hello\n");
    }
}
