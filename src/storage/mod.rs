//! Storage layer for Docket tasks.
//!
//! One SQLite database (`tasks.db`) in the data directory holds the single
//! `tasks` table. Timestamps are stored as fixed-width RFC 3339 text so
//! `ORDER BY created_at` compares correctly as strings.
//!
//! Input validation runs before any write, so no row violating the title
//! invariants can ever be persisted.

use crate::models::{Task, TaskChanges, TaskInput};
use crate::{Error, Result};
use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::{Connection, Row, params};
use std::fs;
use std::path::{Path, PathBuf};

/// Database file name inside the data directory.
const DB_FILE: &str = "tasks.db";

/// Storage manager for the task database.
pub struct Storage {
    /// Data directory holding the database file
    pub root: PathBuf,
    /// SQLite connection
    conn: Connection,
}

impl Storage {
    /// Initialize storage in the given data directory, creating it if needed.
    pub fn init(data_dir: &Path) -> Result<Self> {
        fs::create_dir_all(data_dir)?;

        let conn = Connection::open(data_dir.join(DB_FILE))?;
        Self::init_schema(&conn)?;

        Ok(Self {
            root: data_dir.to_path_buf(),
            conn,
        })
    }

    /// Open previously initialized storage.
    pub fn open(data_dir: &Path) -> Result<Self> {
        let db_path = data_dir.join(DB_FILE);
        if !db_path.exists() {
            return Err(Error::NotInitialized);
        }

        let conn = Connection::open(&db_path)?;
        Self::init_schema(&conn)?;

        Ok(Self {
            root: data_dir.to_path_buf(),
            conn,
        })
    }

    /// Check if storage exists in the given data directory.
    pub fn exists(data_dir: &Path) -> bool {
        data_dir.join(DB_FILE).exists()
    }

    /// Initialize the SQLite schema.
    fn init_schema(conn: &Connection) -> Result<()> {
        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS tasks (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                title TEXT NOT NULL,
                description TEXT,
                completed INTEGER NOT NULL DEFAULT 0,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_tasks_completed ON tasks(completed);
            CREATE INDEX IF NOT EXISTS idx_tasks_created_at ON tasks(created_at);
            "#,
        )?;

        Ok(())
    }

    // === Task Operations ===

    /// Create a new task.
    ///
    /// The stored row has `completed = false` and equal creation/update
    /// timestamps. Fails with a validation error on a bad title, leaving
    /// the store unchanged.
    pub fn create_task(&mut self, input: &TaskInput) -> Result<Task> {
        let input = input.normalized();
        input.validate()?;

        let stamp = encode_timestamp(Utc::now());
        self.conn.execute(
            "INSERT INTO tasks (title, description, completed, created_at, updated_at)
             VALUES (?1, ?2, 0, ?3, ?3)",
            params![input.title, input.description, stamp],
        )?;

        self.get_task(self.conn.last_insert_rowid())
    }

    /// Get a task by ID.
    pub fn get_task(&self, id: i64) -> Result<Task> {
        self.conn
            .query_row(
                "SELECT id, title, description, completed, created_at, updated_at
                 FROM tasks WHERE id = ?1",
                [id],
                row_to_task,
            )
            .map_err(|e| match e {
                rusqlite::Error::QueryReturnedNoRows => Error::NotFound(id),
                other => other.into(),
            })
    }

    /// List all tasks, most recently created first.
    ///
    /// Ties on `created_at` break by descending id, so the order is
    /// deterministic.
    pub fn list_tasks(&self) -> Result<Vec<Task>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, title, description, completed, created_at, updated_at
             FROM tasks ORDER BY created_at DESC, id DESC",
        )?;

        let tasks = stmt
            .query_map([], row_to_task)?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(tasks)
    }

    /// Update a task, overwriting title, description and completion flag.
    ///
    /// Fails with NotFound if the id does not exist and with a validation
    /// error on a bad title; either way the row is untouched.
    pub fn update_task(&mut self, id: i64, changes: &TaskChanges) -> Result<Task> {
        // Verify the task exists before validating input, so a missing id
        // reports NotFound rather than a validation error.
        self.get_task(id)?;

        let changes = changes.normalized();
        changes.validate()?;

        let stamp = encode_timestamp(Utc::now());
        self.conn.execute(
            "UPDATE tasks SET title = ?1, description = ?2, completed = ?3, updated_at = ?4
             WHERE id = ?5",
            params![
                changes.title,
                changes.description,
                changes.completed,
                stamp,
                id
            ],
        )?;

        self.get_task(id)
    }

    /// Delete a task by ID. Deleting an already-deleted id fails with
    /// NotFound.
    pub fn delete_task(&mut self, id: i64) -> Result<()> {
        let affected = self.conn.execute("DELETE FROM tasks WHERE id = ?1", [id])?;
        if affected == 0 {
            return Err(Error::NotFound(id));
        }

        Ok(())
    }
}

/// Default data directory: `~/.local/share/docket` (platform equivalent).
pub fn default_data_dir() -> Result<PathBuf> {
    dirs::data_local_dir()
        .map(|dir| dir.join("docket"))
        .ok_or_else(|| Error::Other("Could not determine data directory; pass --data-dir".into()))
}

/// Encode a timestamp for storage. Fixed microsecond precision keeps the
/// text form totally ordered under string comparison.
fn encode_timestamp(t: DateTime<Utc>) -> String {
    t.to_rfc3339_opts(SecondsFormat::Micros, true)
}

fn row_to_task(row: &Row<'_>) -> rusqlite::Result<Task> {
    Ok(Task {
        id: row.get(0)?,
        title: row.get(1)?,
        description: row.get(2)?,
        completed: row.get(3)?,
        created_at: decode_timestamp(row, 4)?,
        updated_at: decode_timestamp(row, 5)?,
    })
}

fn decode_timestamp(row: &Row<'_>, idx: usize) -> rusqlite::Result<DateTime<Utc>> {
    let text: String = row.get(idx)?;
    DateTime::parse_from_rfc3339(&text)
        .map(|t| t.with_timezone(&Utc))
        .map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(idx, rusqlite::types::Type::Text, Box::new(e))
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::TestEnv;

    fn input(title: &str, description: Option<&str>) -> TaskInput {
        TaskInput {
            title: title.to_string(),
            description: description.map(str::to_string),
        }
    }

    fn changes_from(task: &Task, completed: bool) -> TaskChanges {
        TaskChanges {
            title: task.title.clone(),
            description: task.description.clone(),
            completed,
        }
    }

    #[test]
    fn test_init_creates_database() {
        let env = TestEnv::new();
        env.init_storage();
        assert!(Storage::exists(env.data_path()));
    }

    #[test]
    fn test_open_uninitialized_fails() {
        let env = TestEnv::new();
        match Storage::open(env.data_path()) {
            Err(Error::NotInitialized) => {}
            other => panic!("expected NotInitialized, got {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn test_create_task_defaults() {
        let env = TestEnv::new();
        let mut storage = env.init_storage();

        let task = storage
            .create_task(&input("Buy groceries", Some("from the market")))
            .unwrap();

        assert!(task.id > 0);
        assert_eq!(task.title, "Buy groceries");
        assert_eq!(task.description.as_deref(), Some("from the market"));
        assert!(!task.completed);
        assert_eq!(task.created_at, task.updated_at);
    }

    #[test]
    fn test_create_task_trims_input() {
        let env = TestEnv::new();
        let mut storage = env.init_storage();

        let task = storage
            .create_task(&input("  Buy groceries  ", Some("   ")))
            .unwrap();

        assert_eq!(task.title, "Buy groceries");
        assert_eq!(task.description, None);
    }

    #[test]
    fn test_create_empty_title_leaves_store_unchanged() {
        let env = TestEnv::new();
        let mut storage = env.init_storage();

        let result = storage.create_task(&input("   ", None));
        assert!(matches!(result, Err(Error::Validation(_))));
        assert!(storage.list_tasks().unwrap().is_empty());
    }

    #[test]
    fn test_create_overlong_title_rejected() {
        let env = TestEnv::new();
        let mut storage = env.init_storage();

        let long = "a".repeat(256);
        let result = storage.create_task(&input(&long, None));
        assert!(matches!(result, Err(Error::Validation(_))));
        assert!(storage.list_tasks().unwrap().is_empty());
    }

    #[test]
    fn test_create_title_at_limit_accepted() {
        let env = TestEnv::new();
        let mut storage = env.init_storage();

        let title = "a".repeat(255);
        let task = storage.create_task(&input(&title, None)).unwrap();
        assert_eq!(task.title.chars().count(), 255);
    }

    #[test]
    fn test_list_orders_by_creation_descending() {
        let env = TestEnv::new();
        let mut storage = env.init_storage();

        storage.create_task(&input("A", None)).unwrap();
        storage.create_task(&input("B", None)).unwrap();
        storage.create_task(&input("C", None)).unwrap();

        let titles: Vec<String> = storage
            .list_tasks()
            .unwrap()
            .into_iter()
            .map(|t| t.title)
            .collect();
        assert_eq!(titles, vec!["C", "B", "A"]);
    }

    #[test]
    fn test_list_breaks_timestamp_ties_by_id() {
        let env = TestEnv::new();
        let mut storage = env.init_storage();

        // Insert two rows with identical timestamps directly, bypassing
        // create_task's clock.
        let stamp = encode_timestamp(Utc::now());
        for title in ["first", "second"] {
            storage
                .conn
                .execute(
                    "INSERT INTO tasks (title, description, completed, created_at, updated_at)
                     VALUES (?1, NULL, 0, ?2, ?2)",
                    params![title, stamp],
                )
                .unwrap();
        }

        let tasks = storage.list_tasks().unwrap();
        assert_eq!(tasks[0].title, "second");
        assert_eq!(tasks[1].title, "first");
        assert!(tasks[0].id > tasks[1].id);
    }

    #[test]
    fn test_update_toggle_preserves_fields() {
        let env = TestEnv::new();
        let mut storage = env.init_storage();

        let task = storage
            .create_task(&input("Buy groceries", Some("from the market")))
            .unwrap();
        let updated = storage
            .update_task(task.id, &changes_from(&task, true))
            .unwrap();

        assert_eq!(updated.title, task.title);
        assert_eq!(updated.description, task.description);
        assert!(updated.completed);
        assert_eq!(updated.created_at, task.created_at);
        assert!(updated.updated_at >= task.updated_at);
    }

    #[test]
    fn test_update_missing_task() {
        let env = TestEnv::new();
        let mut storage = env.init_storage();

        let changes = TaskChanges {
            title: "Title".to_string(),
            description: None,
            completed: false,
        };
        assert!(matches!(
            storage.update_task(42, &changes),
            Err(Error::NotFound(42))
        ));
    }

    #[test]
    fn test_update_invalid_title_leaves_row_unchanged() {
        let env = TestEnv::new();
        let mut storage = env.init_storage();

        let task = storage.create_task(&input("Buy groceries", None)).unwrap();
        let bad = TaskChanges {
            title: "  ".to_string(),
            description: None,
            completed: true,
        };
        assert!(matches!(
            storage.update_task(task.id, &bad),
            Err(Error::Validation(_))
        ));

        let unchanged = storage.get_task(task.id).unwrap();
        assert_eq!(unchanged.title, "Buy groceries");
        assert!(!unchanged.completed);
        assert_eq!(unchanged.updated_at, task.updated_at);
    }

    #[test]
    fn test_delete_then_delete_again() {
        let env = TestEnv::new();
        let mut storage = env.init_storage();

        let task = storage.create_task(&input("Buy groceries", None)).unwrap();
        storage.delete_task(task.id).unwrap();
        assert!(storage.list_tasks().unwrap().is_empty());

        let second = storage.delete_task(task.id);
        assert!(matches!(second, Err(Error::NotFound(_))));
    }

    #[test]
    fn test_ids_are_not_reused_after_delete() {
        let env = TestEnv::new();
        let mut storage = env.init_storage();

        let first = storage.create_task(&input("first", None)).unwrap();
        storage.delete_task(first.id).unwrap();
        let second = storage.create_task(&input("second", None)).unwrap();

        assert!(second.id > first.id);
    }

    #[test]
    fn test_tasks_survive_reopen() {
        let env = TestEnv::new();
        {
            let mut storage = env.init_storage();
            storage.create_task(&input("Buy groceries", None)).unwrap();
        }

        let storage = env.open_storage();
        let tasks = storage.list_tasks().unwrap();
        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0].title, "Buy groceries");
    }
}
