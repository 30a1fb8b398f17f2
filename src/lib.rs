//! Tasklist: a small persistent to-do list.
//!
//! A [`TaskStore`] owns an ordered list of tasks and the active [`Filter`].
//! Storage and display are injected: any [`KeyValueStore`] holds the list,
//! and any [`Surface`] receives a recomputed [`View`] after every change.
//!
//! # Example
//!
//! ```
//! use tasklist::{Filter, HtmlSurface, MemoryStore, TaskStore};
//!
//! let mut store = TaskStore::new(MemoryStore::new(), HtmlSurface::new());
//!
//! let id = store.add_task("Buy milk").unwrap().id.clone();
//! assert_eq!(store.stats().to_string(), "1 task total • 1 active • 0 completed");
//!
//! store.toggle_task(&id);
//! assert_eq!(store.stats().to_string(), "1 task total • 0 active • 1 completed");
//!
//! store.set_filter(Filter::Active);
//! assert!(store.filtered_tasks().is_empty());
//! assert!(store.surface().html().contains("All done!"));
//! ```

mod id;
mod storage;
mod store;
mod types;

pub mod command;
pub mod config;
pub mod session;
pub mod view;

// Re-export public API
pub use command::{Command, Outcome, dispatch};
pub use config::Config;
pub use id::{ID_PREFIX, generate_id};
pub use session::{Input, Session};
pub use storage::{
    Backend, DB_FILE, DEFAULT_STORAGE_KEY, KeyValueStore, MemoryStore, SqliteStore, decode_tasks, encode_tasks, load_tasks,
    save_tasks,
};
pub use store::TaskStore;
pub use types::{EmptyState, Filter, ParseFilterError, Stats, Task};
pub use view::{Action, ActionKind, HtmlSurface, NullSurface, Surface, TaskRow, View, escape_html, render_html};
