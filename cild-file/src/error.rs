use cild_ir::Token;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(String),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Invalid token {0:?}")]
    InvalidToken(String),

    #[error("Invalid IL bytes in method {method}: {reason}")]
    InvalidHex { method: String, reason: String },

    #[error("Invalid type name {name:?}: {reason}")]
    InvalidTypeName { name: String, reason: &'static str },

    #[error("Duplicate token {0}")]
    DuplicateToken(Token),

    #[error("Unknown method {0:?}")]
    UnknownMethod(String),
}

pub type Result<T> = std::result::Result<T, Error>;
