//! Derived view of the task list and the rendering surface contract.
//!
//! A [`View`] is recomputed from the store after every change and handed to a
//! [`Surface`]. Rows carry [`Action`] descriptors instead of callbacks; the
//! host turns an activated action into a [`Command`] and dispatches it.

use crate::command::Command;
use crate::types::{EmptyState, Filter, Stats, Task};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt::Write;

/// What an affordance on a task row does.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionKind {
    Toggle,
    Delete,
}

impl ActionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ActionKind::Toggle => "toggle",
            ActionKind::Delete => "delete",
        }
    }
}

/// Opaque action descriptor bound to one task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Action {
    pub kind: ActionKind,
    pub task_id: String,
}

impl Action {
    /// The store command this action triggers.
    pub fn command(&self) -> Command {
        match self.kind {
            ActionKind::Toggle => Command::Toggle {
                id: self.task_id.clone(),
            },
            ActionKind::Delete => Command::Delete {
                id: self.task_id.clone(),
            },
        }
    }
}

/// One visible task.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TaskRow {
    pub id: String,
    pub text: String,
    pub completed: bool,
    pub created_at: DateTime<Utc>,
    pub toggle: Action,
    pub delete: Action,
}

impl TaskRow {
    fn from_task(task: &Task) -> Self {
        Self {
            id: task.id.clone(),
            text: task.text.clone(),
            completed: task.completed,
            created_at: task.created_at,
            toggle: Action {
                kind: ActionKind::Toggle,
                task_id: task.id.clone(),
            },
            delete: Action {
                kind: ActionKind::Delete,
                task_id: task.id.clone(),
            },
        }
    }
}

/// Everything a surface needs to draw the list.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct View {
    pub filter: Filter,
    pub rows: Vec<TaskRow>,
    pub stats: Stats,
    /// Set iff `rows` is empty.
    pub empty_state: Option<EmptyState>,
}

impl View {
    /// Compute the view of `tasks` under `filter`.
    pub fn build(tasks: &[Task], filter: Filter) -> Self {
        let rows: Vec<TaskRow> = tasks
            .iter()
            .filter(|task| filter.matches(task))
            .map(TaskRow::from_task)
            .collect();
        let empty_state = rows.is_empty().then(|| filter.empty_state());

        Self {
            filter,
            rows,
            stats: Stats::from_tasks(tasks),
            empty_state,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Anything that can display a view.
pub trait Surface {
    fn display(&mut self, view: &View);
}

impl<S: Surface + ?Sized> Surface for &mut S {
    fn display(&mut self, view: &View) {
        (**self).display(view);
    }
}

/// Surface that discards every view.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSurface;

impl Surface for NullSurface {
    fn display(&mut self, _view: &View) {}
}

/// Surface that keeps the markup of the most recent view.
#[derive(Debug, Default, Clone)]
pub struct HtmlSurface {
    html: String,
    renders: usize,
}

impl HtmlSurface {
    pub fn new() -> Self {
        Self::default()
    }

    /// Markup of the last displayed view.
    pub fn html(&self) -> &str {
        &self.html
    }

    /// Number of views displayed so far.
    pub fn renders(&self) -> usize {
        self.renders
    }
}

impl Surface for HtmlSurface {
    fn display(&mut self, view: &View) {
        self.html = render_html(view);
        self.renders += 1;
    }
}

/// Escape text so it is displayed literally inside HTML.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Render a view as the task container markup plus stats line.
pub fn render_html(view: &View) -> String {
    let mut html = String::new();

    let _ = writeln!(html, "<div class=\"stats\">{}</div>", escape_html(&view.stats.to_string()));
    let _ = writeln!(
        html,
        "<div class=\"tasks\" data-filter=\"{}\">",
        view.filter.as_str()
    );

    if let Some(empty) = &view.empty_state {
        let _ = writeln!(html, "  <div class=\"empty-state\">");
        let _ = writeln!(html, "    <h3>{}</h3>", escape_html(empty.title));
        let _ = writeln!(html, "    <p>{}</p>", escape_html(empty.message));
        let _ = writeln!(html, "  </div>");
    }

    for row in &view.rows {
        let id = escape_html(&row.id);
        let done = if row.completed { " completed" } else { "" };
        let checked = if row.completed { " checked" } else { "" };
        let _ = writeln!(html, "  <div class=\"task-item{}\">", done);
        let _ = writeln!(
            html,
            "    <div class=\"task-checkbox{}\" data-action=\"{}\" data-id=\"{}\"></div>",
            checked,
            row.toggle.kind.as_str(),
            id
        );
        let _ = writeln!(html, "    <div class=\"task-text\">{}</div>", escape_html(&row.text));
        let _ = writeln!(
            html,
            "    <button class=\"delete-btn\" data-action=\"{}\" data-id=\"{}\">×</button>",
            row.delete.kind.as_str(),
            id
        );
        let _ = writeln!(html, "  </div>");
    }

    html.push_str("</div>\n");
    html
}
