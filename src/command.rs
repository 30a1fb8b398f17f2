//! Explicit command dispatch between a host and the task store.

use crate::storage::KeyValueStore;
use crate::store::TaskStore;
use crate::types::{Filter, Task};
use crate::view::Surface;
use serde::{Deserialize, Serialize};

/// A user intent, as produced by an input affordance or an [`Action`](crate::Action).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Command {
    /// Submit new task text.
    Add { text: String },

    /// Flip a task's completion flag.
    Toggle { id: String },

    /// Remove a task.
    Delete { id: String },

    /// Select which tasks are shown.
    SetFilter { filter: Filter },

    /// Remove every completed task.
    ClearCompleted,
}

/// What a dispatched command did.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Added { task: Task },
    Toggled { id: String, completed: bool },
    Deleted { id: String },
    Cleared { count: usize },
    FilterChanged { filter: Filter },
    /// Blank text or unknown id; nothing changed.
    Ignored,
}

/// Apply a command to the store.
pub fn dispatch<K: KeyValueStore, S: Surface>(store: &mut TaskStore<K, S>, command: Command) -> Outcome {
    match command {
        Command::Add { text } => match store.add_task(&text) {
            Some(task) => Outcome::Added { task: task.clone() },
            None => Outcome::Ignored,
        },
        Command::Toggle { id } => {
            if store.toggle_task(&id) {
                let completed = store.get(&id).is_some_and(|task| task.completed);
                Outcome::Toggled { id, completed }
            } else {
                Outcome::Ignored
            }
        }
        Command::Delete { id } => {
            if store.delete_task(&id) {
                Outcome::Deleted { id }
            } else {
                Outcome::Ignored
            }
        }
        Command::SetFilter { filter } => {
            store.set_filter(filter);
            Outcome::FilterChanged { filter }
        }
        Command::ClearCompleted => Outcome::Cleared {
            count: store.clear_completed(),
        },
    }
}
