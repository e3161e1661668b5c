use thiserror::Error;

#[derive(Error, Debug)]
pub enum CliError {
    #[error("設定エラー: {0}")]
    Config(String),

    #[error("属性の形式が不正です（KEY=VALUE）: {0}")]
    InvalidAttribute(String),

    #[error("JSON解析エラー: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("IOエラー: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Common(#[from] service_colors_common::Error),
}

pub type Result<T> = std::result::Result<T, CliError>;
