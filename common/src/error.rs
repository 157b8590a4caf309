//! エラー型定義

use thiserror::Error;

use crate::decoder::DecodeError;
use crate::uploader::ValidationError;

/// 共通エラー型
#[derive(Error, Debug)]
pub enum Error {
    #[error("Decode error: {0}")]
    Decode(#[from] DecodeError),

    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Data URI error: {0}")]
    DataUri(String),

    #[error("Invalid file: {0}")]
    InvalidFile(String),
}

/// Result型エイリアス
pub type Result<T> = std::result::Result<T, Error>;
