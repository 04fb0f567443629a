use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use rusqlite::{params, Connection, Row};
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::model::task::Task;
use crate::repository::error::StoreResult;
use crate::repository::traits::TaskRepository;

pub const SCHEMA_VERSION: i64 = 1;
pub const DB_FILE_NAME: &str = "tasks.db";

const CREATE_TABLE: &str = "CREATE TABLE IF NOT EXISTS tasks (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    title TEXT NOT NULL,
    description TEXT,
    deadline TEXT,
    duration TEXT,
    is_done INTEGER DEFAULT 0
);";
const DROP_TABLE: &str = "DROP TABLE IF EXISTS tasks;";
const INSERT_TASK: &str =
    "INSERT INTO tasks (title, description, deadline, duration, is_done) VALUES (?1, ?2, ?3, ?4, ?5)";
const UPDATE_IS_DONE: &str = "UPDATE tasks SET is_done = ?1 WHERE id = ?2";
const DELETE_TASK: &str = "DELETE FROM tasks WHERE id = ?1";
const SELECT_TASKS: &str =
    "SELECT id, title, description, deadline, duration, is_done FROM tasks ORDER BY id";

/// SQLite-backed task table.
///
/// Holds only the database path: every operation opens its own connection
/// and drops it before returning, whether the operation succeeded or not.
#[derive(Clone, Debug)]
pub struct SqliteTaskRepository {
    db_path: PathBuf,
}

impl SqliteTaskRepository {
    /// Opens (or creates) `tasks.db` inside `data_dir` and brings its schema
    /// up to `SCHEMA_VERSION`.
    pub fn new(data_dir: impl AsRef<Path>) -> StoreResult<Self> {
        let data_dir = data_dir.as_ref();
        fs::create_dir_all(data_dir)?;

        let repo = SqliteTaskRepository {
            db_path: data_dir.join(DB_FILE_NAME),
        };
        // Fail at startup rather than on the first user action.
        repo.connect()?;
        Ok(repo)
    }

    pub fn from_config(config: &Config) -> StoreResult<Self> {
        Self::new(&config.data_dir)
    }

    pub fn db_path(&self) -> &Path {
        &self.db_path
    }

    fn connect(&self) -> StoreResult<Connection> {
        let conn = Connection::open(&self.db_path)?;
        conn.busy_timeout(Duration::from_secs(5))?;
        ensure_schema(&conn)?;
        Ok(conn)
    }
}

fn ensure_schema(conn: &Connection) -> StoreResult<()> {
    let version: i64 = conn.query_row("PRAGMA user_version", [], |row| row.get(0))?;

    match version {
        SCHEMA_VERSION => Ok(()),
        0 => {
            info!(version = SCHEMA_VERSION, "creating task table");
            conn.execute_batch(&format!(
                "BEGIN; {CREATE_TABLE} PRAGMA user_version = {SCHEMA_VERSION}; COMMIT;"
            ))?;
            Ok(())
        }
        old => {
            // No migrations: a different version loses every stored task.
            warn!(
                from = old,
                to = SCHEMA_VERSION,
                "schema version mismatch, dropping task table"
            );
            conn.execute_batch(&format!(
                "BEGIN; {DROP_TABLE} {CREATE_TABLE} PRAGMA user_version = {SCHEMA_VERSION}; COMMIT;"
            ))?;
            Ok(())
        }
    }
}

fn task_from_row(row: &Row) -> rusqlite::Result<Task> {
    Ok(Task {
        id: row.get(0)?,
        title: row.get(1)?,
        description: row.get::<_, Option<String>>(2)?.unwrap_or_default(),
        deadline: row.get::<_, Option<String>>(3)?.unwrap_or_default(),
        duration: row.get::<_, Option<String>>(4)?.unwrap_or_default(),
        is_done: row.get::<_, Option<bool>>(5)?.unwrap_or(false),
    })
}

impl TaskRepository for SqliteTaskRepository {
    fn insert(&self, task: &Task) -> StoreResult<i64> {
        let conn = self.connect()?;
        conn.execute(
            INSERT_TASK,
            params![
                task.title,
                task.description,
                task.deadline,
                task.duration,
                task.is_done
            ],
        )?;
        let id = conn.last_insert_rowid();
        debug!(id, title = %task.title, "inserted task");
        Ok(id)
    }

    fn update_done(&self, id: i64, is_done: bool) -> StoreResult<()> {
        let conn = self.connect()?;
        let affected = conn.execute(UPDATE_IS_DONE, params![is_done, id])?;
        debug!(id, is_done, affected, "updated completion flag");
        Ok(())
    }

    fn delete(&self, id: i64) -> StoreResult<()> {
        let conn = self.connect()?;
        let affected = conn.execute(DELETE_TASK, params![id])?;
        debug!(id, affected, "deleted task");
        Ok(())
    }

    fn list_all(&self) -> StoreResult<Vec<Task>> {
        let conn = self.connect()?;
        let mut stmt = conn.prepare(SELECT_TASKS)?;
        let tasks = stmt
            .query_map([], task_from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        debug!(count = tasks.len(), "listed tasks");
        Ok(tasks)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::StoreError;
    use tempfile::TempDir;

    fn setup() -> (TempDir, SqliteTaskRepository) {
        let dir = TempDir::new().unwrap();
        let repo = SqliteTaskRepository::new(dir.path()).unwrap();
        (dir, repo)
    }

    fn task(title: &str) -> Task {
        Task::new(title.to_string(), String::new(), String::new(), String::new())
    }

    fn ids(repo: &SqliteTaskRepository) -> Vec<i64> {
        repo.list_all().unwrap().iter().map(|t| t.id).collect()
    }

    #[test]
    fn test_insert_then_list_returns_row_with_assigned_id() {
        let (_dir, repo) = setup();
        let mut buy = Task::new(
            "Buy milk".to_string(),
            "two litres".to_string(),
            "3/7/2025".to_string(),
            "15m".to_string(),
        );

        let id = repo.insert(&buy).unwrap();
        assert!(id >= 0);

        let tasks = repo.list_all().unwrap();
        assert_eq!(tasks.len(), 1);
        buy.id = id;
        assert_eq!(tasks[0], buy);
        assert!(!tasks[0].is_done);
    }

    #[test]
    fn test_ids_are_unique_and_listed_in_insertion_order() {
        let (_dir, repo) = setup();
        let a = repo.insert(&task("a")).unwrap();
        let b = repo.insert(&task("b")).unwrap();
        let c = repo.insert(&task("c")).unwrap();

        assert!(a < b && b < c);
        let titles: Vec<String> = repo.list_all().unwrap().into_iter().map(|t| t.title).collect();
        assert_eq!(titles, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_update_done_round_trip_and_idempotence() {
        let (_dir, repo) = setup();
        let id = repo.insert(&task("toggle me")).unwrap();

        repo.update_done(id, true).unwrap();
        repo.update_done(id, true).unwrap();
        assert!(repo.list_all().unwrap()[0].is_done);

        repo.update_done(id, false).unwrap();
        assert!(!repo.list_all().unwrap()[0].is_done);
    }

    #[test]
    fn test_update_done_on_unknown_id_is_noop() {
        let (_dir, repo) = setup();
        let id = repo.insert(&task("only")).unwrap();

        repo.update_done(id + 100, true).unwrap();
        assert!(!repo.list_all().unwrap()[0].is_done);
    }

    #[test]
    fn test_delete_is_idempotent() {
        let (_dir, repo) = setup();
        let keep = repo.insert(&task("keep")).unwrap();
        let gone = repo.insert(&task("gone")).unwrap();

        repo.delete(gone).unwrap();
        repo.delete(gone).unwrap();
        assert_eq!(ids(&repo), vec![keep]);
    }

    #[test]
    fn test_deleted_id_is_not_reused() {
        let (_dir, repo) = setup();
        let first = repo.insert(&task("first")).unwrap();
        repo.delete(first).unwrap();

        let second = repo.insert(&task("second")).unwrap();
        assert_ne!(first, second);
    }

    #[test]
    fn test_store_accepts_empty_title() {
        let (_dir, repo) = setup();
        let id = repo.insert(&task("")).unwrap();
        assert_eq!(repo.list_all().unwrap()[0].id, id);
    }

    #[test]
    fn test_null_columns_read_back_as_empty() {
        let (dir, repo) = setup();
        let conn = Connection::open(dir.path().join(DB_FILE_NAME)).unwrap();
        conn.execute("INSERT INTO tasks (title) VALUES ('bare')", []).unwrap();
        drop(conn);

        let tasks = repo.list_all().unwrap();
        assert_eq!(tasks[0].title, "bare");
        assert_eq!(tasks[0].deadline, "");
        assert!(!tasks[0].is_done);
    }

    #[test]
    fn test_from_config_opens_file_in_data_dir() {
        let dir = TempDir::new().unwrap();
        let data_dir = dir.path().join("nested");
        let config = Config::new(Some(data_dir.clone())).unwrap();

        let repo = SqliteTaskRepository::from_config(&config).unwrap();
        assert_eq!(repo.db_path(), data_dir.join("tasks.db"));
        assert!(repo.db_path().is_file());
    }

    #[test]
    fn test_rows_survive_reopen_with_same_version() {
        let (dir, repo) = setup();
        let id = repo.insert(&task("persisted")).unwrap();
        drop(repo);

        let reopened = SqliteTaskRepository::new(dir.path()).unwrap();
        assert_eq!(ids(&reopened), vec![id]);
    }

    #[test]
    fn test_version_mismatch_drops_and_recreates_table() {
        let (dir, repo) = setup();
        repo.insert(&task("doomed")).unwrap();

        let conn = Connection::open(repo.db_path()).unwrap();
        conn.execute_batch("PRAGMA user_version = 2;").unwrap();
        drop(conn);

        let reopened = SqliteTaskRepository::new(dir.path()).unwrap();
        assert!(reopened.list_all().unwrap().is_empty());

        let conn = Connection::open(reopened.db_path()).unwrap();
        let version: i64 = conn
            .query_row("PRAGMA user_version", [], |row| row.get(0))
            .unwrap();
        assert_eq!(version, SCHEMA_VERSION);
    }

    #[test]
    fn test_unopenable_database_is_unavailable() {
        let dir = TempDir::new().unwrap();
        // A directory where the database file should be.
        std::fs::create_dir(dir.path().join(DB_FILE_NAME)).unwrap();

        let err = SqliteTaskRepository::new(dir.path()).unwrap_err();
        assert!(matches!(err, StoreError::Unavailable(_)));
    }
}
