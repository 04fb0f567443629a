use crate::model::task::{NewTask, Task};
use crate::repository::{StoreError, TaskRepository};
use crate::service::error::{SyncError, SyncResult};
use crate::view::{ListChange, TaskList};
use tracing::{debug, info, warn};

/// Keeps the task list and the record store in step.
///
/// The store is always written first; the list only changes once the store
/// has accepted the write. When a toggle or delete fails in the store the
/// list is reloaded from `list_all` before the error is returned, so it never
/// shows anything the store does not hold.
///
/// Mutating methods take `&mut self`. A position is resolved and acted on
/// inside the same call, so it cannot go stale in between.
pub struct TaskService<R: TaskRepository> {
    repo: R,
    list: TaskList,
}

impl<R: TaskRepository> TaskService<R> {
    pub fn new(repo: R) -> Self {
        Self {
            repo,
            list: TaskList::new(),
        }
    }

    /// Builds the service and seeds the list with every stored task.
    pub fn load(repo: R) -> SyncResult<Self> {
        let mut service = Self::new(repo);
        service.resync()?;
        info!(count = service.list.len(), "loaded tasks");
        Ok(service)
    }

    pub fn tasks(&self) -> &TaskList {
        &self.list
    }

    pub fn repository(&self) -> &R {
        &self.repo
    }

    pub fn drain_changes(&mut self) -> Vec<ListChange> {
        self.list.drain_changes()
    }

    pub fn create_task(&mut self, draft: NewTask) -> SyncResult<i64> {
        let mut task = Task::from(draft);
        let id = self.repo.insert(&task).map_err(|err| {
            warn!(error = %err, title = %task.title, "insert failed, task not added");
            err
        })?;

        task.id = id;
        debug!(id, position = self.list.len(), "appending created task");
        self.list.append(task);
        Ok(id)
    }

    /// Flips the completion flag of the task at `position` and returns the new value.
    pub fn toggle_done_at(&mut self, position: usize) -> SyncResult<bool> {
        let (id, target) = {
            let task = self.resolve(position)?;
            (task.persisted_id(), !task.is_done)
        };

        match id {
            Some(id) => {
                if let Err(err) = self.repo.update_done(id, target) {
                    return Err(self.fail_closed(err));
                }
            }
            None => debug!(position, "toggling unsaved task in memory only"),
        }

        match self.list.toggle_done_at(position) {
            Some(is_done) => Ok(is_done),
            None => Err(self.no_such_position(position)),
        }
    }

    /// Deletes the task at `position` from the store and the list.
    ///
    /// The same `position` that picked the task is used for the removal.
    pub fn delete_at(&mut self, position: usize) -> SyncResult<Task> {
        let id = self.resolve(position)?.persisted_id();

        match id {
            Some(id) => {
                if let Err(err) = self.repo.delete(id) {
                    return Err(self.fail_closed(err));
                }
            }
            None => debug!(position, "removing unsaved task from memory only"),
        }

        match self.list.remove_at(position) {
            Some(task) => Ok(task),
            None => Err(self.no_such_position(position)),
        }
    }

    /// Replaces the list with a fresh read of the store.
    pub fn resync(&mut self) -> SyncResult<()> {
        let tasks = self.repo.list_all()?;
        self.list.reset(tasks);
        Ok(())
    }

    fn resolve(&self, position: usize) -> SyncResult<&Task> {
        self.list
            .get(position)
            .ok_or_else(|| self.no_such_position(position))
    }

    fn no_such_position(&self, position: usize) -> SyncError {
        SyncError::NoSuchPosition {
            position,
            len: self.list.len(),
        }
    }

    fn fail_closed(&mut self, err: StoreError) -> SyncError {
        warn!(error = %err, "store write failed, reloading list from store");
        if let Err(reload) = self.resync() {
            warn!(error = %reload, "reload failed, keeping list as it was");
        }
        SyncError::Store(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::StoreResult;
    use std::cell::{Cell, RefCell};

    #[derive(Default)]
    struct MockTaskRepo {
        rows: RefCell<Vec<Task>>,
        next_id: Cell<i64>,
        fail_writes: Cell<bool>,
        fail_reads: Cell<bool>,
    }

    fn unavailable() -> StoreError {
        StoreError::Unavailable(rusqlite::Error::InvalidQuery)
    }

    impl TaskRepository for MockTaskRepo {
        fn insert(&self, task: &Task) -> StoreResult<i64> {
            if self.fail_writes.get() {
                return Err(unavailable());
            }
            let id = self.next_id.get();
            self.next_id.set(id + 1);
            let mut row = task.clone();
            row.id = id;
            self.rows.borrow_mut().push(row);
            Ok(id)
        }

        fn update_done(&self, id: i64, is_done: bool) -> StoreResult<()> {
            if self.fail_writes.get() {
                return Err(unavailable());
            }
            if let Some(row) = self.rows.borrow_mut().iter_mut().find(|t| t.id == id) {
                row.is_done = is_done;
            }
            Ok(())
        }

        fn delete(&self, id: i64) -> StoreResult<()> {
            if self.fail_writes.get() {
                return Err(unavailable());
            }
            self.rows.borrow_mut().retain(|t| t.id != id);
            Ok(())
        }

        fn list_all(&self) -> StoreResult<Vec<Task>> {
            if self.fail_reads.get() {
                return Err(unavailable());
            }
            Ok(self.rows.borrow().clone())
        }
    }

    fn stored_ids(repo: &MockTaskRepo) -> Vec<i64> {
        repo.rows.borrow().iter().map(|t| t.id).collect()
    }

    fn assert_in_sync(service: &TaskService<MockTaskRepo>) {
        assert_eq!(service.tasks().ids(), stored_ids(service.repository()));
        assert_eq!(service.tasks().as_slice(), &service.repository().rows.borrow()[..]);
    }

    #[test]
    fn test_load_seeds_list_in_store_order() {
        let repo = MockTaskRepo::default();
        repo.insert(&Task::from(NewTask::new("first"))).unwrap();
        repo.insert(&Task::from(NewTask::new("second"))).unwrap();

        let mut service = TaskService::load(repo).unwrap();
        assert_eq!(service.tasks().ids(), vec![0, 1]);
        assert_eq!(service.drain_changes(), vec![ListChange::Reset]);
    }

    #[test]
    fn test_buy_milk_lifecycle() {
        let mut service = TaskService::load(MockTaskRepo::default()).unwrap();
        service.drain_changes();

        let id = service.create_task(NewTask::new("Buy milk")).unwrap();
        assert!(id >= 0);
        let task = service.tasks().get(0).unwrap();
        assert_eq!(task.id, id);
        assert!(!task.is_done);

        assert!(service.toggle_done_at(0).unwrap());
        assert!(service.repository().rows.borrow()[0].is_done);

        let removed = service.delete_at(0).unwrap();
        assert_eq!(removed.id, id);
        assert!(service.repository().list_all().unwrap().is_empty());
        assert!(service.tasks().is_empty());

        assert_eq!(
            service.drain_changes(),
            vec![
                ListChange::Inserted(0),
                ListChange::Changed(0),
                ListChange::Removed(0)
            ]
        );
    }

    #[test]
    fn test_delete_middle_keeps_neighbours_in_order() {
        let mut service = TaskService::new(MockTaskRepo::default());
        let first = service.create_task(NewTask::new("one")).unwrap();
        let second = service.create_task(NewTask::new("two")).unwrap();
        let third = service.create_task(NewTask::new("three")).unwrap();

        let removed = service.delete_at(1).unwrap();
        assert_eq!(removed.id, second);
        assert_eq!(service.tasks().ids(), vec![first, third]);
        assert!(!stored_ids(service.repository()).contains(&second));
        assert_in_sync(&service);
    }

    #[test]
    fn test_failed_insert_appends_nothing() {
        let repo = MockTaskRepo::default();
        repo.fail_writes.set(true);
        let mut service = TaskService::new(repo);

        let err = service.create_task(NewTask::new("nope")).unwrap_err();
        assert!(matches!(err, SyncError::Store(StoreError::Unavailable(_))));
        assert!(service.tasks().is_empty());
        assert!(service.drain_changes().is_empty());
    }

    #[test]
    fn test_failed_toggle_leaves_flag_unchanged() {
        let mut service = TaskService::new(MockTaskRepo::default());
        service.create_task(NewTask::new("stubborn")).unwrap();
        service.repository().fail_writes.set(true);

        assert!(service.toggle_done_at(0).is_err());
        assert!(!service.tasks().get(0).unwrap().is_done);
        assert_in_sync(&service);
    }

    #[test]
    fn test_failed_delete_keeps_row_visible() {
        let mut service = TaskService::new(MockTaskRepo::default());
        service.create_task(NewTask::new("a")).unwrap();
        service.create_task(NewTask::new("b")).unwrap();
        service.drain_changes();
        service.repository().fail_writes.set(true);

        assert!(matches!(service.delete_at(1), Err(SyncError::Store(_))));
        assert_eq!(service.tasks().len(), 2);
        assert_eq!(service.drain_changes(), vec![ListChange::Reset]);
        assert_in_sync(&service);
    }

    #[test]
    fn test_failed_reload_keeps_previous_list() {
        let mut service = TaskService::new(MockTaskRepo::default());
        service.create_task(NewTask::new("a")).unwrap();
        service.drain_changes();
        service.repository().fail_writes.set(true);
        service.repository().fail_reads.set(true);

        assert!(service.delete_at(0).is_err());
        assert_eq!(service.tasks().len(), 1);
        assert!(service.drain_changes().is_empty());
    }

    #[test]
    fn test_stale_position_is_rejected() {
        let mut service = TaskService::new(MockTaskRepo::default());
        service.create_task(NewTask::new("only")).unwrap();

        match service.delete_at(3) {
            Err(SyncError::NoSuchPosition { position, len }) => {
                assert_eq!((position, len), (3, 1));
            }
            other => panic!("unexpected result: {other:?}"),
        }
        assert!(service.toggle_done_at(1).is_err());
        assert_in_sync(&service);
    }

    #[test]
    fn test_no_drift_over_mixed_operations() {
        let mut service = TaskService::new(MockTaskRepo::default());

        // Deterministic walk over create/toggle/delete with occasional failures.
        let mut seed: u64 = 42;
        for step in 0..200 {
            seed = seed.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
            let roll = (seed >> 33) as usize;
            service.repository().fail_writes.set(roll % 11 == 0);

            let len = service.tasks().len();
            let _ = match roll % 3 {
                0 => service.create_task(NewTask::new(format!("task {step}"))).map(|_| ()),
                1 if len > 0 => service.toggle_done_at(roll % len).map(|_| ()),
                2 if len > 0 => service.delete_at(roll % len).map(|_| ()),
                _ => Ok(()),
            };
            assert_in_sync(&service);
        }
    }
}
