//! Integration tests for persistence.
//!
//! Tests write-through, reload, and fail-open behaviour of storage.

mod common;

use common::{FailingStore, RecordingSurface, TestEnv, UnreadableStore};
use std::fs;
use tasklist::{
    Backend, DB_FILE, DEFAULT_STORAGE_KEY, Filter, KeyValueStore, MemoryStore, NullSurface, SqliteStore, TaskStore,
    decode_tasks, encode_tasks, load_tasks,
};
use tempfile::TempDir;

// =============================================================================
// Reload
// =============================================================================

#[test]
fn test_reload_reproduces_list() {
    let mut env = TestEnv::new();

    env.add("first");
    env.add_completed("second");
    env.add("third  ");

    let reopened = env.reopen();
    assert_eq!(reopened.tasks(), env.store.tasks());
}

#[test]
fn test_reload_resets_filter() {
    let mut env = TestEnv::new();

    env.add("a");
    env.store.set_filter(Filter::Completed);

    let reopened = env.reopen();
    assert_eq!(reopened.filter(), Filter::All);
    assert_eq!(reopened.surface().views.len(), 1);
    assert_eq!(reopened.surface().last().rows.len(), 1);
}

#[test]
fn test_reload_after_delete() {
    let mut env = TestEnv::new();

    let a = env.add("a");
    env.add("b");
    env.store.delete_task(&a.id);

    let reopened = env.reopen();
    assert_eq!(reopened.tasks().len(), 1);
    assert_eq!(reopened.tasks()[0].text, "b");
}

#[test]
fn test_codec_roundtrip_preserves_fields() {
    let mut env = TestEnv::new();

    env.add("x");
    env.add_completed("y");

    let json = encode_tasks(env.store.tasks()).unwrap();
    let decoded = decode_tasks(&json).unwrap();
    assert_eq!(decoded, env.store.tasks());
}

#[test]
fn test_separate_keys_are_independent() {
    let temp_dir = TempDir::new().unwrap();

    {
        let kv = SqliteStore::open(temp_dir.path()).unwrap();
        let mut work = TaskStore::with_key(kv, NullSurface, "work");
        work.add_task("Write report");
    }

    let kv = SqliteStore::open(temp_dir.path()).unwrap();
    let home = TaskStore::new(kv, NullSurface);
    assert!(home.tasks().is_empty());
    assert_eq!(home.storage_key(), DEFAULT_STORAGE_KEY);

    let kv = SqliteStore::open(temp_dir.path()).unwrap();
    let work = TaskStore::with_key(kv, NullSurface, "work");
    assert_eq!(work.tasks().len(), 1);
}

// =============================================================================
// Fail-open reads
// =============================================================================

#[test]
fn test_corrupt_payload_starts_empty() {
    let mut kv = MemoryStore::new();
    kv.set(DEFAULT_STORAGE_KEY, "[{\"id\": oops").unwrap();

    let store = TaskStore::new(kv, RecordingSurface::default());
    assert!(store.tasks().is_empty());
    assert_eq!(
        store.surface().last().empty_state.map(|e| e.title),
        Some("No tasks yet")
    );
}

#[test]
fn test_non_array_payload_starts_empty() {
    let mut kv = MemoryStore::new();
    kv.set(DEFAULT_STORAGE_KEY, r#"{"tasks": []}"#).unwrap();

    let store = TaskStore::new(kv, NullSurface);
    assert!(store.tasks().is_empty());
}

#[test]
fn test_unreadable_backend_starts_empty() {
    let mut store = TaskStore::new(UnreadableStore, NullSurface);
    assert!(store.tasks().is_empty());
    assert!(store.add_task("still works").is_some());
}

#[test]
fn test_corrupt_database_starts_empty() {
    let temp_dir = TempDir::new().unwrap();
    fs::write(temp_dir.path().join(DB_FILE), vec![0xAB_u8; 8192]).unwrap();

    let backend = Backend::open_or_memory(temp_dir.path());
    assert!(!backend.is_persistent());

    let mut store = TaskStore::new(backend, RecordingSurface::default());
    assert!(store.tasks().is_empty());
    assert_eq!(
        store.surface().last().empty_state.map(|e| e.title),
        Some("No tasks yet")
    );
    assert!(store.add_task("still usable").is_some());
    assert_eq!(store.tasks().len(), 1);
}

#[test]
fn test_healthy_database_uses_sqlite() {
    let env = TestEnv::new();
    let backend = Backend::open_or_memory(env.temp_dir.path());
    assert!(backend.is_persistent());
}

#[test]
fn test_same_millisecond_ids_survive_write_through() {
    let mut kv = MemoryStore::new();
    kv.set(
        DEFAULT_STORAGE_KEY,
        r#"[{"id":1700000000000,"text":"Buy milk","completed":false,"createdAt":"2023-11-14T22:13:20.000Z"},
            {"id":1700000000000,"text":"Call mom","completed":false,"createdAt":"2023-11-14T22:13:20.000Z"}]"#,
    )
    .unwrap();

    let mut store = TaskStore::new(kv, NullSurface);
    store.add_task("x");

    let texts: Vec<&str> = store.tasks().iter().map(|t| t.text.as_str()).collect();
    assert_eq!(texts, vec!["x", "Buy milk", "Call mom"]);

    // The reassigned id can be toggled on its own
    let mom = store.tasks()[2].id.clone();
    assert!(store.toggle_task(&mom));
    assert!(!store.tasks()[1].completed);
    assert!(store.tasks()[2].completed);
}

#[test]
fn test_reload_restores_text_invariant() {
    let mut kv = MemoryStore::new();
    kv.set(
        DEFAULT_STORAGE_KEY,
        r#"[{"id":"td-a","text":"  Walk dog ","completed":false,"createdAt":"2024-01-01T00:00:00Z"},
            {"id":"td-b","text":" ","completed":true,"createdAt":"2024-01-01T00:00:00Z"}]"#,
    )
    .unwrap();

    let loaded = load_tasks(&kv, DEFAULT_STORAGE_KEY);
    assert_eq!(loaded.len(), 1);
    assert_eq!(loaded[0].text, "Walk dog");
}

#[test]
fn test_legacy_payload_loads() {
    let mut kv = MemoryStore::new();
    kv.set(
        DEFAULT_STORAGE_KEY,
        r#"[{"id":1700000000001,"text":"Newer","completed":false,"createdAt":"2024-01-02T10:00:00.000Z"},
            {"id":1700000000000,"text":"Older","completed":true,"createdAt":"2024-01-01T10:00:00.000Z"}]"#,
    )
    .unwrap();

    let mut store = TaskStore::new(kv, NullSurface);
    assert_eq!(store.tasks().len(), 2);
    assert_eq!(store.tasks()[0].id, "1700000000001");
    assert!(store.toggle_task("1700000000000"));
    assert!(!store.get("1700000000000").unwrap().completed);
}

// =============================================================================
// Swallowed writes
// =============================================================================

#[test]
fn test_write_failure_keeps_memory_state() {
    let mut store = TaskStore::new(FailingStore::default(), RecordingSurface::default());

    let id = store.add_task("Unsaved").unwrap().id.clone();
    assert_eq!(store.tasks().len(), 1);
    assert!(store.toggle_task(&id));
    assert!(store.get(&id).unwrap().completed);

    // Every mutation still rendered
    assert_eq!(store.surface().views.len(), 3);
    assert_eq!(store.stats().completed, 1);
}
