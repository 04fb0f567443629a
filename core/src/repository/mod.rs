pub mod error;
pub mod sqlite;
pub mod traits;

// Re-export
pub use error::{StoreError, StoreResult};
pub use sqlite::{SqliteTaskRepository, DB_FILE_NAME, SCHEMA_VERSION};
pub use traits::TaskRepository;
