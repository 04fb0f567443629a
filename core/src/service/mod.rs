pub mod error;
pub mod task_service;

pub use error::{SyncError, SyncResult};
pub use task_service::TaskService;
