use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ModelError {
    #[error("invalid sync mode: {0} (expected: incremental|bootstrap)")]
    InvalidSyncMode(String),
}
