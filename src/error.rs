use thiserror::Error;

#[derive(Error, Debug)]
pub enum TextsnapError {
    #[error(transparent)]
    Common(#[from] textsnap_common::Error),

    #[error("設定エラー: {0}")]
    Config(String),

    #[error("ファイルが見つかりません: {0}")]
    FileNotFound(String),

    #[error("フォルダが見つかりません: {0}")]
    FolderNotFound(String),

    #[error("対象ファイルが見つかりません: {0}")]
    NoFilesFound(String),

    #[error("画像読み込みエラー: {0}")]
    ImageLoad(String),

    #[error("Tesseract実行エラー: {0}")]
    Tesseract(String),

    #[error("{0}")]
    Extraction(String),

    #[error("JSON解析エラー: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("IOエラー: {0}")]
    Io(#[from] std::io::Error),
}

impl From<textsnap_common::ValidationError> for TextsnapError {
    fn from(e: textsnap_common::ValidationError) -> Self {
        TextsnapError::Common(e.into())
    }
}

impl From<textsnap_common::PreviewError> for TextsnapError {
    fn from(e: textsnap_common::PreviewError) -> Self {
        TextsnapError::Common(e.into())
    }
}

pub type Result<T> = std::result::Result<T, TextsnapError>;
