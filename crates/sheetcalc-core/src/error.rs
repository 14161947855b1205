//! Error types for sheetcalc core.

use thiserror::Error;

/// Errors raised by the host-side sheet model and config loading.
#[derive(Error, Debug)]
pub enum SheetError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Config error in {path}: {message}")]
    Config { path: String, message: String },

    #[error("Invalid cell address: {0}")]
    InvalidAddress(String),
}

pub type Result<T> = std::result::Result<T, SheetError>;
