pub mod config;
pub mod convert;
pub mod input;
pub mod model;
pub mod repository;
pub mod service;
pub mod time;
pub mod view;

pub use config::Config;
pub use convert::{convert_length, ConvertError, LengthUnit};
pub use input::{parse_form, parse_form_line, FormError};
pub use model::task::{NewTask, Task};
pub use repository::{SqliteTaskRepository, StoreError, TaskRepository};
pub use service::{SyncError, TaskService};
pub use time::{format_deadline, parse_deadline};
pub use view::{ListChange, TaskList};
