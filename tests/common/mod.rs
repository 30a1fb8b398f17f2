//! Shared test infrastructure for tasklist integration tests.
//!
//! Provides TestEnv helper for consistent test setup/teardown.

#![allow(dead_code)]

use eyre::Result;
use tasklist::{Filter, KeyValueStore, SqliteStore, Surface, Task, TaskStore, View};
use tempfile::TempDir;

/// Surface that remembers every view it was given.
#[derive(Debug, Default)]
pub struct RecordingSurface {
    pub views: Vec<View>,
}

impl RecordingSurface {
    pub fn last(&self) -> &View {
        self.views.last().expect("No view rendered yet")
    }
}

impl Surface for RecordingSurface {
    fn display(&mut self, view: &View) {
        self.views.push(view.clone());
    }
}

/// Key-value store whose writes always fail.
#[derive(Debug, Default)]
pub struct FailingStore {
    pub initial: Option<String>,
    pub write_attempts: usize,
}

impl KeyValueStore for FailingStore {
    fn get(&self, _key: &str) -> Result<Option<String>> {
        Ok(self.initial.clone())
    }

    fn set(&mut self, _key: &str, _value: &str) -> Result<()> {
        self.write_attempts += 1;
        eyre::bail!("quota exceeded")
    }
}

/// Key-value store whose reads always fail.
#[derive(Debug, Default)]
pub struct UnreadableStore;

impl KeyValueStore for UnreadableStore {
    fn get(&self, _key: &str) -> Result<Option<String>> {
        eyre::bail!("storage unavailable")
    }

    fn set(&mut self, _key: &str, _value: &str) -> Result<()> {
        Ok(())
    }
}

/// Test environment with automatic cleanup.
pub struct TestEnv {
    pub temp_dir: TempDir,
    pub store: TaskStore<SqliteStore, RecordingSurface>,
}

impl TestEnv {
    /// Create a new test environment with an empty SQLite-backed store.
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let kv = SqliteStore::open(temp_dir.path()).expect("Failed to open store");
        let store = TaskStore::new(kv, RecordingSurface::default());
        Self { temp_dir, store }
    }

    /// Open a second store over the same data directory, as on a new session.
    pub fn reopen(&self) -> TaskStore<SqliteStore, RecordingSurface> {
        let kv = SqliteStore::open(self.temp_dir.path()).expect("Failed to reopen store");
        TaskStore::new(kv, RecordingSurface::default())
    }

    /// Add a task and return a copy of it.
    pub fn add(&mut self, text: &str) -> Task {
        self.store.add_task(text).expect("Task was not added").clone()
    }

    /// Add a task and mark it completed.
    pub fn add_completed(&mut self, text: &str) -> Task {
        let task = self.add(text);
        assert!(self.store.toggle_task(&task.id));
        self.store.get(&task.id).expect("Task vanished").clone()
    }

    pub fn texts(&self) -> Vec<String> {
        self.store.tasks().iter().map(|t| t.text.clone()).collect()
    }

    pub fn filtered_texts(&self, filter: Filter) -> Vec<String> {
        View::build(self.store.tasks(), filter)
            .rows
            .into_iter()
            .map(|row| row.text)
            .collect()
    }

    pub fn renders(&self) -> usize {
        self.store.surface().views.len()
    }
}

impl Default for TestEnv {
    fn default() -> Self {
        Self::new()
    }
}
