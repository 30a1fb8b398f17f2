//! Tasklist CLI - a small persistent to-do list.

use clap::Parser;
use colored::*;
use eyre::{Context, Result};
use log::info;
use std::fs;
use std::io;
use std::path::PathBuf;
use tasklist::{Backend, Config, HtmlSurface, Session, Surface, TaskStore, View};

mod cli;

use cli::{Cli, Command};

fn setup_logging() -> Result<()> {
    let log_dir = dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("tasklist")
        .join("logs");

    fs::create_dir_all(&log_dir).context("Failed to create log directory")?;

    let log_file = log_dir.join("tasklist.log");

    let target = Box::new(
        fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&log_file)
            .context("Failed to open log file")?,
    );

    env_logger::Builder::from_default_env()
        .target(env_logger::Target::Pipe(target))
        .init();

    info!("Logging initialized, writing to: {}", log_file.display());
    Ok(())
}

fn load_config(cli: &Cli) -> Result<Config> {
    let path = cli.config.clone().unwrap_or_else(Config::default_path);
    let mut config = Config::load(&path)?;
    if let Some(dir) = &cli.dir {
        config.data_dir = dir.clone();
    }
    Ok(config)
}

/// Prints every view it receives while `live`.
struct TerminalSurface {
    live: bool,
}

impl Surface for TerminalSurface {
    fn display(&mut self, view: &View) {
        if self.live {
            print_view(view);
        }
    }
}

/// Terminal-safe rendering of user text.
fn literal(text: &str) -> String {
    text.chars().map(|c| if c.is_control() { '\u{FFFD}' } else { c }).collect()
}

fn print_view(view: &View) {
    println!("{} {}", "Filter:".bold(), view.filter.to_string().cyan());

    if let Some(empty) = &view.empty_state {
        println!("  {}", empty.title.bold());
        println!("  {}", empty.message.dimmed());
    } else {
        for (index, row) in view.rows.iter().enumerate() {
            let (mark, text) = if row.completed {
                ("[x]".green(), literal(&row.text).dimmed().strikethrough())
            } else {
                ("[ ]".normal(), literal(&row.text).normal())
            };
            println!("{:>3}. {} {} {}", index + 1, mark, text, literal(&row.id).dimmed());
        }
    }

    println!("{}", view.stats.to_string().dimmed());
}

fn run(cli: Cli) -> Result<()> {
    let config = load_config(&cli).context("Failed to load config")?;
    if !config.color {
        colored::control::set_override(false);
    }

    let open_backend = || {
        let kv = Backend::open_or_memory(&config.data_dir);
        if !kv.is_persistent() {
            eprintln!(
                "{} Could not open the task database in {}, changes will not be saved",
                "!".yellow(),
                config.data_dir.display()
            );
        }
        kv
    };
    let open_store = || TaskStore::with_key(open_backend(), TerminalSurface { live: false }, config.storage_key.clone());

    match cli.command {
        Command::Add { text } => {
            let mut store = open_store();
            match store.add_task(&text.join(" ")) {
                Some(task) => println!("{} Added: {} {}", "✓".green(), literal(&task.id).cyan(), literal(&task.text)),
                None => println!("{}", "Nothing to add".dimmed()),
            }
        }

        Command::Toggle { id } => {
            let mut store = open_store();
            if !store.toggle_task(&id) {
                eprintln!("{} Task not found: {}", "✗".red(), literal(&id));
                std::process::exit(1);
            }
            let state = match store.get(&id) {
                Some(task) if task.completed => "completed".blue(),
                _ => "active".green(),
            };
            println!("{} {} is now {}", "✓".green(), literal(&id).cyan(), state);
        }

        Command::Delete { id } => {
            let mut store = open_store();
            if !store.delete_task(&id) {
                eprintln!("{} Task not found: {}", "✗".red(), literal(&id));
                std::process::exit(1);
            }
            println!("{} Deleted: {}", "✓".green(), literal(&id).cyan());
        }

        Command::List { filter } => {
            let mut store = open_store();
            store.set_filter(filter.unwrap_or(config.default_filter));
            print_view(&store.view());
        }

        Command::Stats => {
            let store = open_store();
            println!("{}", store.stats());
        }

        Command::ClearCompleted => {
            let mut store = open_store();
            let count = store.clear_completed();
            println!("{} Cleared {} completed task(s)", "✓".green(), count);
        }

        Command::Html { filter } => {
            let mut store = TaskStore::with_key(open_backend(), HtmlSurface::new(), config.storage_key.clone());
            store.set_filter(filter.unwrap_or(config.default_filter));
            print!("{}", store.surface().html());
        }

        Command::Shell => {
            let mut store = open_store();
            store.surface_mut().live = true;
            println!("{}", "Type a task and press Enter. /help for commands.".dimmed());
            store.set_filter(config.default_filter);
            let stdin = io::stdin();
            Session::new(&mut store, config.default_filter)
                .run(stdin.lock(), io::stdout())
                .context("Session failed")?;
        }
    }

    Ok(())
}

fn main() -> Result<()> {
    setup_logging().context("Failed to setup logging")?;

    let cli = Cli::parse();
    info!("Command: {:?}", std::env::args().collect::<Vec<_>>());

    if let Err(e) = run(cli) {
        eprintln!("{} {:#}", "Error:".red().bold(), e);
        std::process::exit(1);
    }

    Ok(())
}
