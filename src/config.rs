use crate::error::{CliError, Result};
use service_colors_common::ColorConfig;
use std::path::{Path, PathBuf};

/// CLI設定（設定ファイルの場所と内容）
#[derive(Debug, Clone)]
pub struct Config {
    pub path: PathBuf,
    pub colors: ColorConfig,
}

impl Config {
    /// 設定を読み込む（ファイルがなければ既定値）
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = match path {
            Some(p) => p.to_path_buf(),
            None => Self::config_path()?,
        };

        let colors = if path.exists() {
            ColorConfig::from_file(&path)?
        } else {
            tracing::debug!("config not found, using defaults: {}", path.display());
            ColorConfig::default()
        };

        Ok(Self { path, colors })
    }

    pub fn save(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(&self.colors)?;
        std::fs::write(&self.path, content)?;
        Ok(())
    }

    pub fn config_path() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| CliError::Config("ホームディレクトリが見つかりません".into()))?;
        Ok(home.join(".config").join("service-colors").join("config.json"))
    }
}
