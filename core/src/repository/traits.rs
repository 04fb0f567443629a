use crate::model::task::Task;
use crate::repository::error::StoreResult;

/// Durable CRUD over task rows keyed by their store-assigned id.
pub trait TaskRepository {
    /// Writes every field except `id` and returns the id the store assigned.
    fn insert(&self, task: &Task) -> StoreResult<i64>;

    /// Sets only the completion flag. An unknown id changes nothing.
    fn update_done(&self, id: i64, is_done: bool) -> StoreResult<()>;

    /// Removes the row. Deleting an unknown id succeeds.
    fn delete(&self, id: i64) -> StoreResult<()>;

    /// All rows in insertion order.
    fn list_all(&self) -> StoreResult<Vec<Task>>;
}

impl<R: TaskRepository + ?Sized> TaskRepository for &R {
    fn insert(&self, task: &Task) -> StoreResult<i64> {
        (**self).insert(task)
    }

    fn update_done(&self, id: i64, is_done: bool) -> StoreResult<()> {
        (**self).update_done(id, is_done)
    }

    fn delete(&self, id: i64) -> StoreResult<()> {
        (**self).delete(id)
    }

    fn list_all(&self) -> StoreResult<Vec<Task>> {
        (**self).list_all()
    }
}
