use thiserror::Error;

use crate::repository::StoreError;

pub type SyncResult<T> = Result<T, SyncError>;

#[derive(Debug, Error)]
pub enum SyncError {
    #[error(transparent)]
    Store(#[from] StoreError),
    /// The UI asked for a position the current list does not have.
    #[error("no task at position {position} (list has {len} tasks)")]
    NoSuchPosition { position: usize, len: usize },
}
