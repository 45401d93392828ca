use std::path::PathBuf;

use clap::Parser;

use crate::cmd::Commands;

/// Console task deck with menus, forms and a back-stack.
/// Storage defaults to ~/.taskdeck/tasks.json or a path passed via --db.
#[derive(Parser)]
#[command(name = "td", version, about = "Interactive console task deck")]
pub struct Cli {
    /// Path to the JSON database file.
    #[arg(long, global = true)]
    pub db: Option<PathBuf>,

    /// Log debug output to stderr.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Only log errors.
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable colored output.
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Answer prompts from a file, one line per answer.
    #[arg(long, global = true)]
    pub script: Option<PathBuf>,

    /// Defaults to `menu`.
    #[command(subcommand)]
    pub command: Option<Commands>,
}
