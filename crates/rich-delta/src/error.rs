//! Error type shared by every delta module.

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DeltaError {
    /// Retain and delete lengths must be strictly positive.
    #[error("INVALID_LENGTH: length should be greater than 0, got {0}")]
    InvalidLength(i64),
    #[error("NOT_TEXT: insert content is not text")]
    NotText,
    #[error("NOT_INSERT: only insert operations carry content")]
    NotInsert,
    #[error("INVALID_OP: {0}")]
    InvalidOp(String),
}

pub type Result<T> = std::result::Result<T, DeltaError>;
