use crate::error::{Result, TextsnapError};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// 実行ファイルの上書き用環境変数
pub const TESSERACT_ENV: &str = "TEXTSNAP_TESSERACT";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub tesseract_path: String,
    pub timeout_seconds: u64,
    /// 出力先（未指定なら入力ファイルの隣）
    pub output_dir: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            tesseract_path: "tesseract".into(),
            timeout_seconds: 120,
            output_dir: None,
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            let config: Config = serde_json::from_str(&content)?;
            Ok(config)
        } else {
            Ok(Self::default())
        }
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn config_path() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| TextsnapError::Config("ホームディレクトリが見つかりません".into()))?;
        Ok(home.join(".config").join("textsnap").join("config.json"))
    }

    /// 環境変数を優先
    pub fn tesseract_command(&self) -> String {
        std::env::var(TESSERACT_ENV)
            .ok()
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| self.tesseract_path.clone())
    }

    pub fn set_tesseract(&mut self, path: String) -> Result<()> {
        self.tesseract_path = path;
        self.save()
    }

    pub fn set_timeout(&mut self, seconds: u64) -> Result<()> {
        if seconds == 0 {
            return Err(TextsnapError::Config("タイムアウトは1秒以上にしてください".into()));
        }
        self.timeout_seconds = seconds;
        self.save()
    }
}
