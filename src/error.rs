use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiRequestsError {
    #[error("No rules! Rules are needed to build and run tasks.")]
    NoRules,

    #[error("{} doesn't exist!", .0.display())]
    RulesNotFound(PathBuf),

    #[error("规则校验失败: {0}")]
    Validation(String),

    #[error("解析错误: {0}")]
    ParseError(String),

    #[error("任务 {num} 请求失败: {source}")]
    Transport {
        num: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("HTTP 客户端错误: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("配置错误: {0}")]
    ConfigError(String),

    #[error("IO 错误: {0}")]
    IoError(#[from] std::io::Error),

    #[error("JSON 解析错误: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("URL 解析错误: {0}")]
    UrlParseError(#[from] url::ParseError),

    #[error("{0}")]
    Other(String),
}

impl From<anyhow::Error> for ApiRequestsError {
    fn from(err: anyhow::Error) -> Self {
        ApiRequestsError::Other(err.to_string())
    }
}

impl From<toml::de::Error> for ApiRequestsError {
    fn from(err: toml::de::Error) -> Self {
        ApiRequestsError::ConfigError(err.to_string())
    }
}

/// Result type for apirequests crate
pub type Result<T> = std::result::Result<T, ApiRequestsError>;
