//! Line-oriented interactive session.
//!
//! Plain lines are submitted as new tasks. Lines starting with `/` address
//! rows by their 1-based position in the current view:
//!
//! ```text
//! Buy milk          add a task
//! /toggle 2         flip the second visible row
//! /delete 1         remove the first visible row
//! /filter active    show only active tasks
//! /clear            remove completed tasks
//! /quit
//! ```

use crate::command::{Command, Outcome, dispatch};
use crate::storage::KeyValueStore;
use crate::store::TaskStore;
use crate::types::Filter;
use crate::view::{ActionKind, Surface};
use eyre::{Context, Result};
use std::io::{BufRead, Write};

pub const HELP: &str = "\
Type a task and press Enter to add it.
  /toggle N        toggle the Nth visible task
  /delete N        delete the Nth visible task
  /filter NAME     show all, active or completed tasks
  /clear           remove completed tasks
  /help            show this help
  /quit            leave the session";

/// A parsed line of input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    Blank,
    Submit(String),
    Row(ActionKind, usize),
    Filter(String),
    ClearCompleted,
    Help,
    Quit,
    Invalid(String),
}

impl Input {
    pub fn parse(line: &str) -> Self {
        let line = line.trim();
        if line.is_empty() {
            return Input::Blank;
        }
        let Some(rest) = line.strip_prefix('/') else {
            return Input::Submit(line.to_string());
        };

        let mut parts = rest.split_whitespace();
        let name = parts.next().unwrap_or_default();
        let arg = parts.next();

        match (name, arg) {
            ("toggle" | "t", Some(n)) => parse_row(ActionKind::Toggle, n),
            ("delete" | "d", Some(n)) => parse_row(ActionKind::Delete, n),
            ("filter" | "f", Some(raw)) => Input::Filter(raw.to_string()),
            ("clear", None) => Input::ClearCompleted,
            ("help" | "h" | "?", None) => Input::Help,
            ("quit" | "q" | "exit", None) => Input::Quit,
            _ => Input::Invalid(format!("unrecognized command '{}', try /help", line)),
        }
    }
}

fn parse_row(kind: ActionKind, raw: &str) -> Input {
    match raw.parse::<usize>() {
        Ok(n) if n > 0 => Input::Row(kind, n),
        _ => Input::Invalid(format!("'{}' is not a row number", raw)),
    }
}

/// Drives a store from lines of text.
pub struct Session<'a, K, S> {
    store: &'a mut TaskStore<K, S>,
}

impl<'a, K: KeyValueStore, S: Surface> Session<'a, K, S> {
    pub fn new(store: &'a mut TaskStore<K, S>, initial_filter: Filter) -> Self {
        if store.filter() != initial_filter {
            store.set_filter(initial_filter);
        }
        Self { store }
    }

    /// Handle one input. Returns a message for the user, if any.
    pub fn handle(&mut self, input: Input) -> Option<String> {
        match input {
            Input::Blank | Input::Quit => None,
            Input::Submit(text) => {
                dispatch(self.store, Command::Add { text });
                None
            }
            Input::Row(kind, n) => {
                let view = self.store.view();
                let Some(row) = n.checked_sub(1).and_then(|index| view.rows.get(index)) else {
                    return Some(format!("No task at row {} ({} shown)", n, view.rows.len()));
                };
                let action = match kind {
                    ActionKind::Toggle => &row.toggle,
                    ActionKind::Delete => &row.delete,
                };
                match dispatch(self.store, action.command()) {
                    Outcome::Ignored => Some(format!("Task {} no longer exists", action.task_id)),
                    _ => None,
                }
            }
            Input::Filter(raw) => {
                if self.store.select_filter(&raw) {
                    None
                } else {
                    Some(format!("Unknown filter '{}': use all, active or completed", raw))
                }
            }
            Input::ClearCompleted => match dispatch(self.store, Command::ClearCompleted) {
                Outcome::Cleared { count: 0 } => Some("No completed tasks to clear".to_string()),
                _ => None,
            },
            Input::Help => Some(HELP.to_string()),
            Input::Invalid(message) => Some(message),
        }
    }

    /// Read lines until end of input or `/quit`.
    pub fn run(&mut self, input: impl BufRead, mut out: impl Write) -> Result<()> {
        for line in input.lines() {
            let line = line.context("Failed to read input")?;
            let parsed = Input::parse(&line);
            if parsed == Input::Quit {
                break;
            }
            if let Some(message) = self.handle(parsed) {
                writeln!(out, "{}", message).context("Failed to write output")?;
            }
        }
        out.flush().context("Failed to flush output")?;
        Ok(())
    }
}
