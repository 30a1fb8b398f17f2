//! Storage layer: key-value backends and the task list codec.

use crate::id::generate_id;
use crate::types::Task;
use eyre::{Context, Result};
use rusqlite::{Connection, OptionalExtension, params};
use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::Path;

/// SQLite database file name inside the data directory.
pub const DB_FILE: &str = "tasklist.db";

/// Key the task list is stored under unless configured otherwise.
pub const DEFAULT_STORAGE_KEY: &str = "todoTasks";

/// Minimal string key-value persistence, the only thing the task store
/// needs from its backend.
pub trait KeyValueStore {
    /// Read the value stored under `key`, if any.
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Overwrite the value stored under `key`.
    fn set(&mut self, key: &str, value: &str) -> Result<()>;
}

/// Key-value store backed by a single SQLite table.
pub struct SqliteStore {
    db: Connection,
}

impl SqliteStore {
    /// Open (or create) the database in `data_dir`.
    pub fn open(data_dir: &Path) -> Result<Self> {
        fs::create_dir_all(data_dir).context("Failed to create data directory")?;
        let db_path = data_dir.join(DB_FILE);
        let db = Connection::open(&db_path).context("Failed to open SQLite database")?;

        let store = Self { db };
        store.init_schema()?;
        Ok(store)
    }

    /// Open a private in-memory database.
    pub fn in_memory() -> Result<Self> {
        let db = Connection::open_in_memory().context("Failed to open in-memory database")?;
        let store = Self { db };
        store.init_schema()?;
        Ok(store)
    }

    fn init_schema(&self) -> Result<()> {
        self.db
            .execute_batch(
                r#"
                CREATE TABLE IF NOT EXISTS kv (
                    key TEXT PRIMARY KEY,
                    value TEXT NOT NULL,
                    updated_at TEXT NOT NULL
                );
            "#,
            )
            .context("Failed to initialize schema")?;

        Ok(())
    }
}

impl KeyValueStore for SqliteStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let value: Option<String> = self
            .db
            .query_row("SELECT value FROM kv WHERE key = ?", params![key], |row| row.get(0))
            .optional()
            .context("Failed to read key")?;

        Ok(value)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.db
            .execute(
                "INSERT OR REPLACE INTO kv (key, value, updated_at) VALUES (?, ?, ?)",
                params![key, value, chrono::Utc::now().to_rfc3339()],
            )
            .context("Failed to write key")?;

        Ok(())
    }
}

/// Backend chosen at startup: SQLite when the database opens, memory otherwise.
pub enum Backend {
    Sqlite(SqliteStore),
    Memory(MemoryStore),
}

impl Backend {
    /// Open the SQLite database in `data_dir`, falling back to a volatile
    /// store when it cannot be opened. Never fails.
    pub fn open_or_memory(data_dir: &Path) -> Self {
        match SqliteStore::open(data_dir) {
            Ok(store) => Backend::Sqlite(store),
            Err(e) => {
                log::error!("Error opening task database, changes will not be saved: {:#}", e);
                Backend::Memory(MemoryStore::new())
            }
        }
    }

    pub fn is_persistent(&self) -> bool {
        matches!(self, Backend::Sqlite(_))
    }
}

impl KeyValueStore for Backend {
    fn get(&self, key: &str) -> Result<Option<String>> {
        match self {
            Backend::Sqlite(store) => store.get(key),
            Backend::Memory(store) => store.get(key),
        }
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        match self {
            Backend::Sqlite(store) => store.set(key, value),
            Backend::Memory(store) => store.set(key, value),
        }
    }
}

/// Volatile key-value store.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Serialize the full task list as a JSON array.
pub fn encode_tasks(tasks: &[Task]) -> Result<String> {
    serde_json::to_string(tasks).context("Failed to serialize tasks")
}

/// Parse a JSON array of tasks.
///
/// Text is trimmed. Elements that do not parse as a task, or whose text is
/// blank, are skipped with a warning; a payload that is not valid JSON or not
/// an array is an error.
pub fn decode_tasks(raw: &str) -> Result<Vec<Task>> {
    let value: serde_json::Value = serde_json::from_str(raw).context("Failed to parse task list")?;
    let serde_json::Value::Array(elements) = value else {
        eyre::bail!("Stored task list is not an array");
    };

    let mut tasks = Vec::with_capacity(elements.len());
    for (index, element) in elements.into_iter().enumerate() {
        match serde_json::from_value::<Task>(element) {
            Ok(mut task) => {
                let trimmed = task.text.trim();
                if trimmed.is_empty() {
                    log::warn!("Skipping task {} at index {}: blank text", task.id, index);
                    continue;
                }
                if trimmed.len() != task.text.len() {
                    task.text = trimmed.to_string();
                }
                tasks.push(task);
            }
            Err(e) => log::warn!("Failed to parse task at index {}: {}", index, e),
        }
    }

    Ok(tasks)
}

/// Load the task list stored under `key`.
///
/// Never fails: a missing key, a backend error or an unparsable payload all
/// yield an empty list. A task whose id repeats an earlier one is kept under
/// a fresh id.
pub fn load_tasks(kv: &impl KeyValueStore, key: &str) -> Vec<Task> {
    let raw = match kv.get(key) {
        Ok(Some(raw)) => raw,
        Ok(None) => {
            log::info!("No stored tasks under '{}', starting empty", key);
            return Vec::new();
        }
        Err(e) => {
            log::error!("Error loading tasks: {:#}", e);
            return Vec::new();
        }
    };

    let tasks = match decode_tasks(&raw) {
        Ok(tasks) => tasks,
        Err(e) => {
            log::error!("Error loading tasks: {:#}", e);
            return Vec::new();
        }
    };

    let mut seen: HashSet<String> = tasks.iter().map(|task| task.id.clone()).collect();
    let mut kept = HashSet::new();
    let tasks: Vec<Task> = tasks
        .into_iter()
        .map(|mut task| {
            if !kept.insert(task.id.clone()) {
                let mut id = generate_id(task.created_at);
                while seen.contains(&id) {
                    id = generate_id(task.created_at);
                }
                log::warn!("Task {} has a duplicate id, reassigned {}", task.id, id);
                seen.insert(id.clone());
                kept.insert(id.clone());
                task.id = id;
            }
            task
        })
        .collect();

    log::info!("Loaded {} task(s) from '{}'", tasks.len(), key);
    tasks
}

/// Write the full task list under `key`.
///
/// Errors are logged and swallowed; returns whether the write succeeded.
pub fn save_tasks(kv: &mut impl KeyValueStore, key: &str, tasks: &[Task]) -> bool {
    let result = encode_tasks(tasks).and_then(|json| kv.set(key, &json));
    match result {
        Ok(()) => {
            log::debug!("Saved {} task(s) to '{}'", tasks.len(), key);
            true
        }
        Err(e) => {
            log::error!("Error saving tasks: {:#}", e);
            false
        }
    }
}
