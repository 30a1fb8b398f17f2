//! The task store: owns the task list and the active filter.

use crate::id::generate_id;
use crate::storage::{DEFAULT_STORAGE_KEY, KeyValueStore, load_tasks, save_tasks};
use crate::types::{Filter, Stats, Task};
use crate::view::{Surface, View};
use chrono::Utc;

/// In-memory owner of the task list.
///
/// Every mutation writes the whole list through to the key-value store and
/// pushes a freshly computed [`View`] to the surface before returning.
pub struct TaskStore<K, S> {
    kv: K,
    surface: S,
    key: String,
    tasks: Vec<Task>,
    filter: Filter,
}

impl<K: KeyValueStore, S: Surface> TaskStore<K, S> {
    /// Load the list stored under the default key and render it once.
    pub fn new(kv: K, surface: S) -> Self {
        Self::with_key(kv, surface, DEFAULT_STORAGE_KEY)
    }

    /// Load the list stored under `key` and render it once.
    pub fn with_key(kv: K, surface: S, key: impl Into<String>) -> Self {
        let key = key.into();
        let tasks = load_tasks(&kv, &key);
        let mut store = Self {
            kv,
            surface,
            key,
            tasks,
            filter: Filter::default(),
        };
        store.render();
        store
    }

    /// Add a task built from `raw`. Blank input is ignored.
    pub fn add_task(&mut self, raw: &str) -> Option<&Task> {
        let text = raw.trim();
        if text.is_empty() {
            log::debug!("Ignoring blank task text");
            return None;
        }

        let now = Utc::now();
        let mut id = generate_id(now);
        while self.position(&id).is_some() {
            id = generate_id(now);
        }

        let task = Task {
            id,
            text: text.to_string(),
            completed: false,
            created_at: now,
        };
        log::debug!("Adding task {}", task.id);

        self.tasks.insert(0, task);
        self.commit();
        self.tasks.first()
    }

    /// Flip a task's completion flag. Returns false if the id is unknown.
    pub fn toggle_task(&mut self, id: &str) -> bool {
        let Some(index) = self.position(id) else {
            log::debug!("Toggle ignored, no task {}", id);
            return false;
        };

        let task = &mut self.tasks[index];
        task.completed = !task.completed;
        log::debug!("Toggled task {} to completed={}", id, task.completed);

        self.commit();
        true
    }

    /// Remove a task. Returns false if the id is unknown.
    pub fn delete_task(&mut self, id: &str) -> bool {
        let Some(index) = self.position(id) else {
            log::debug!("Delete ignored, no task {}", id);
            return false;
        };

        self.tasks.remove(index);
        log::debug!("Deleted task {}", id);

        self.commit();
        true
    }

    /// Remove every completed task and return how many were removed.
    pub fn clear_completed(&mut self) -> usize {
        let before = self.tasks.len();
        self.tasks.retain(|task| !task.completed);
        let removed = before - self.tasks.len();

        if removed > 0 {
            log::debug!("Cleared {} completed task(s)", removed);
            self.commit();
        }
        removed
    }

    /// Change the active filter.
    pub fn set_filter(&mut self, filter: Filter) {
        self.filter = filter;
        self.render();
    }

    /// Change the active filter from an untrusted name.
    ///
    /// Unrecognized names leave the filter unchanged and return false.
    pub fn select_filter(&mut self, raw: &str) -> bool {
        match raw.parse::<Filter>() {
            Ok(filter) => {
                self.set_filter(filter);
                true
            }
            Err(e) => {
                log::warn!("{}", e);
                false
            }
        }
    }

    /// Tasks matching the current filter, in list order.
    pub fn filtered_tasks(&self) -> Vec<&Task> {
        self.tasks.iter().filter(|task| self.filter.matches(task)).collect()
    }

    /// Counts over the whole list.
    pub fn stats(&self) -> Stats {
        Stats::from_tasks(&self.tasks)
    }

    pub fn view(&self) -> View {
        View::build(&self.tasks, self.filter)
    }

    /// The full list, most recent first.
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn get(&self, id: &str) -> Option<&Task> {
        self.tasks.iter().find(|task| task.id == id)
    }

    pub fn filter(&self) -> Filter {
        self.filter
    }

    pub fn storage_key(&self) -> &str {
        &self.key
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    /// Redraw the current view.
    pub fn render(&mut self) {
        let view = self.view();
        self.surface.display(&view);
    }

    fn position(&self, id: &str) -> Option<usize> {
        self.tasks.iter().position(|task| task.id == id)
    }

    fn commit(&mut self) {
        // A failed write leaves memory ahead of storage until the next success
        save_tasks(&mut self.kv, &self.key, &self.tasks);
        self.render();
    }
}
