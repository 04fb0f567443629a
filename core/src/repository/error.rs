use thiserror::Error;

pub type StoreResult<T> = Result<T, StoreError>;

/// Failures of the record store. Missing ids are not errors.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("task store directory unavailable: {0}")]
    Io(#[from] std::io::Error),
    #[error("task store unavailable: {0}")]
    Unavailable(#[from] rusqlite::Error),
}
