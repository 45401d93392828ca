//! # td - Interactive console task deck
//!
//! A line-based task manager built on a small console navigation framework:
//! views with shortcut-keyed actions, a back-stack, numbered menus and forms
//! that validate field by field.
//!
//! ## Key Features
//!
//! - **Screens and actions**: every screen lists its actions as `(key) Name` and
//!   waits for a key; `(b) Back` appears whenever there is somewhere to go back to
//! - **Forms that keep your input**: each field is checked as it is entered and
//!   saving an incomplete form shows the problem without losing what was typed
//! - **Menus**: a numbered main menu with composite entries (quick add, then summary)
//! - **Local File Storage**: a single JSON file, written atomically on every change
//! - **Scriptable**: `--script answers.txt` replays answers for demos and tests
//!
//! ## Quick Start
//!
//! ```bash
//! # Main menu
//! td
//!
//! # Straight to the task list
//! td tasks
//!
//! # Print open tasks carrying a label
//! td list --label home
//! ```
//!
//! ## Key Commands
//!
//! - `td menu` - Main menu (the default)
//! - `td tasks` / `td labels` - Start in a list view
//! - `td list` - Print the task table
//! - `td completions <shell>` - Shell completions
//!
//! Data is stored in `~/.taskdeck/tasks.json` unless `--db` says otherwise.

use std::path::PathBuf;

use clap::Parser;
use tracing::error;

pub mod app;
pub mod cli;
pub mod cmd;
pub mod console {
    pub mod action;
    pub mod colors;
    pub mod command_view;
    pub mod edit;
    pub mod io;
    pub mod menu;
    pub mod navigator;
    pub mod shortcut;
    pub mod validation;
    pub mod view;
}
pub mod db;
pub mod error;
pub mod fields;
pub mod forms {
    pub mod label_form;
    pub mod task_form;
}
pub mod logging;
pub mod task;
pub mod views {
    pub mod labels;
    pub mod shared;
    pub mod tasks;
}

use cli::Cli;
use cmd::*;
use console::io::{Console, ScriptedConsole, TerminalConsole};
use db::Store;
use error::{ConsoleError, Result};
use logging::{init_subscriber, Verbosity};

fn default_db_path() -> PathBuf {
    let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
    PathBuf::from(home).join(".taskdeck").join("tasks.json")
}

fn run(cli: Cli) -> Result<()> {
    let db_path = cli.db.unwrap_or_else(default_db_path);

    match cli.command.unwrap_or(Commands::Menu) {
        Commands::Completions { shell } => {
            cmd_completions(shell);
            Ok(())
        },
        Commands::List { all, status, label } => {
            cmd_list(&Store::open(&db_path), all, status, label);
            Ok(())
        },
        interactive => {
            let store = Store::open(&db_path);
            let mut console: Box<dyn Console> = match &cli.script {
                Some(path) => Box::new(ScriptedConsole::from_file(path)?),
                None => Box::new(TerminalConsole::new(cli.no_color)),
            };
            match interactive {
                Commands::Tasks => cmd_tasks(&store, console.as_mut()),
                Commands::Labels => cmd_labels(&store, console.as_mut()),
                _ => cmd_menu(&store, console.as_mut()),
            }
        },
    }
}

fn main() {
    let cli = Cli::parse();
    init_subscriber(Verbosity::from_flags(cli.verbose, cli.quiet), cli.no_color);

    match run(cli) {
        Ok(()) | Err(ConsoleError::InputClosed) => {},
        Err(e) => {
            error!(error = %e, "session aborted");
            eprintln!("Error: {}", e);
            std::process::exit(e.exit_code());
        },
    }
}
