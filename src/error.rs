// src/error.rs
use std::path::PathBuf;

use thiserror::Error;

/// ナビゲーションシェル全体で使うエラー型
#[derive(Debug, Error)]
pub enum ShellError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("config error: {0}")]
    Config(#[from] toml::de::Error),

    /// SWC がソースファイルを解析できなかった
    #[error("parse error in {}: {message}", .path.display())]
    Parse { path: PathBuf, message: String },

    /// 同じ階層に同じパスが二度宣言された
    #[error("duplicate route path `{path}` under `{parent}`")]
    DuplicatePath { parent: String, path: String },

    #[error("invalid route path `{path}`: {reason}")]
    InvalidPath { path: String, reason: &'static str },

    #[error("unknown component `{0}`")]
    UnknownComponent(String),

    #[error("navigation item `{label}` targets undeclared route `{target}`")]
    DanglingNavTarget { label: String, target: String },

    #[error("no router declarations found under {}", .0.display())]
    NoRouterFound(PathBuf),
}

pub type Result<T> = std::result::Result<T, ShellError>;
