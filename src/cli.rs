//! CLI argument parsing for tasklist.

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tasklist::Filter;

#[derive(Parser)]
#[command(
    name = "tl",
    about = "A small persistent to-do list",
    version = env!("GIT_DESCRIBE"),
    after_help = "Logs are written to: ~/.local/share/tasklist/logs/tasklist.log"
)]
pub struct Cli {
    /// Data directory holding the task database (overrides config)
    #[arg(short = 'd', long, global = true)]
    pub dir: Option<PathBuf>,

    /// Path to config.yaml (default: ~/.config/tasklist/config.yaml)
    #[arg(short = 'c', long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Add a task
    Add {
        /// Task text (words are joined with spaces)
        #[arg(required = true, num_args = 1..)]
        text: Vec<String>,
    },

    /// Toggle a task between active and completed
    Toggle {
        /// Task ID
        id: String,
    },

    /// Delete a task
    Delete {
        /// Task ID
        id: String,
    },

    /// List tasks
    List {
        /// Which tasks to show (all, active, completed)
        #[arg(short, long)]
        filter: Option<Filter>,
    },

    /// Show task counts
    Stats,

    /// Delete all completed tasks
    ClearCompleted,

    /// Print the list as HTML
    Html {
        /// Which tasks to show (all, active, completed)
        #[arg(short, long)]
        filter: Option<Filter>,
    },

    /// Start an interactive session
    Shell,
}
