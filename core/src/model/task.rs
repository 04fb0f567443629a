use serde::{Deserialize, Serialize};

/// Field values handed over by the creation form.
///
/// The form is responsible for rejecting an empty title before one of these
/// is built; nothing downstream checks it again.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
pub struct NewTask {
    pub title: String,
    pub description: String,
    pub deadline: String,
    pub duration: String,
}

impl NewTask {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Task {
    /// Store-assigned row id, or `UNSAVED_ID` while the task only lives in memory.
    pub id: i64,
    pub title: String,
    pub description: String,

    // Kept as the text the form produced (D/M/YYYY or empty).
    // The store never parses it.
    pub deadline: String,

    pub duration: String,
    pub is_done: bool,
}

impl Task {
    pub const UNSAVED_ID: i64 = -1;

    pub fn new(title: String, description: String, deadline: String, duration: String) -> Self {
        Self {
            id: Self::UNSAVED_ID,
            title,
            description,
            deadline,
            duration,
            is_done: false,
        }
    }

    pub fn is_persisted(&self) -> bool {
        self.id != Self::UNSAVED_ID
    }

    /// The durable id, if the task has been written to the store.
    pub fn persisted_id(&self) -> Option<i64> {
        self.is_persisted().then_some(self.id)
    }
}

impl From<NewTask> for Task {
    fn from(draft: NewTask) -> Self {
        Task::new(draft.title, draft.description, draft.deadline, draft.duration)
    }
}
