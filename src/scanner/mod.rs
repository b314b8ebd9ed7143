use crate::error::{Result, TextsnapError};
use std::path::{Path, PathBuf};
use textsnap_common::validator::{is_accepted_media_type, media_type_for_path};
use walkdir::WalkDir;

#[derive(Debug, Clone)]
pub struct SourceFile {
    pub path: PathBuf,
    pub file_name: String,
    pub media_type: &'static str,
}

impl SourceFile {
    /// 受け付けない拡張子ならNone
    pub fn from_path(path: &Path) -> Option<Self> {
        let media_type = media_type_for_path(path);
        if !is_accepted_media_type(media_type) {
            return None;
        }

        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();

        Some(Self {
            path: path.to_path_buf(),
            file_name,
            media_type,
        })
    }
}

pub fn scan_folder(folder: &Path, recursive: bool) -> Result<Vec<SourceFile>> {
    if !folder.is_dir() {
        return Err(TextsnapError::FolderNotFound(folder.display().to_string()));
    }

    let max_depth = if recursive { usize::MAX } else { 1 };
    let mut files: Vec<SourceFile> = WalkDir::new(folder)
        .max_depth(max_depth)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .filter_map(|e| SourceFile::from_path(e.path()))
        .collect();

    // パスでソート（サブフォルダ単位にまとまる）
    files.sort_by(|a, b| a.path.cmp(&b.path));

    Ok(files)
}
