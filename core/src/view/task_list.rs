use crate::model::task::Task;

/// What the rendering surface has to redraw after a mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListChange {
    Inserted(usize),
    Removed(usize),
    Changed(usize),
    /// The whole sequence was replaced.
    Reset,
}

/// Ordered in-memory tasks backing the visible list.
///
/// Positions are only valid until the next structural change. Every
/// mutation queues exactly one `ListChange`, which the surface collects
/// with `drain_changes`.
#[derive(Debug, Default)]
pub struct TaskList {
    tasks: Vec<Task>,
    changes: Vec<ListChange>,
}

impl TaskList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn get(&self, position: usize) -> Option<&Task> {
        self.tasks.get(position)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Task> {
        self.tasks.iter()
    }

    pub fn as_slice(&self) -> &[Task] {
        &self.tasks
    }

    pub fn ids(&self) -> Vec<i64> {
        self.tasks.iter().map(|t| t.id).collect()
    }

    pub fn append(&mut self, task: Task) {
        self.tasks.push(task);
        self.changes.push(ListChange::Inserted(self.tasks.len() - 1));
    }

    pub fn remove_at(&mut self, position: usize) -> Option<Task> {
        if position >= self.tasks.len() {
            return None;
        }
        let removed = self.tasks.remove(position);
        self.changes.push(ListChange::Removed(position));
        Some(removed)
    }

    /// Flips the completion flag in place and returns the new value.
    pub fn toggle_done_at(&mut self, position: usize) -> Option<bool> {
        let task = self.tasks.get_mut(position)?;
        task.is_done = !task.is_done;
        let is_done = task.is_done;
        self.changes.push(ListChange::Changed(position));
        Some(is_done)
    }

    pub fn reset(&mut self, tasks: Vec<Task>) {
        self.tasks = tasks;
        self.changes.push(ListChange::Reset);
    }

    pub fn drain_changes(&mut self) -> Vec<ListChange> {
        std::mem::take(&mut self.changes)
    }
}
