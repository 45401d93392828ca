//! Tracing subscriber setup.
//!
//! Filter priority, highest first: `TASKDECK_LOG`, `RUST_LOG`, the `-v`/`-q`
//! flags, then `warn`. Logs go to stderr so they never mix with the
//! interactive output on stdout.

use tracing::Level;
use tracing_subscriber::fmt;
use tracing_subscriber::prelude::*;
use tracing_subscriber::EnvFilter;

pub const LOG_ENV: &str = "TASKDECK_LOG";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verbosity {
    Quiet,
    Normal,
    Verbose,
}

impl Verbosity {
    /// `-v` wins over `-q` when both are given.
    pub fn from_flags(verbose: bool, quiet: bool) -> Self {
        if verbose {
            Verbosity::Verbose
        } else if quiet {
            Verbosity::Quiet
        } else {
            Verbosity::Normal
        }
    }

    pub fn default_level(self) -> Level {
        match self {
            Verbosity::Quiet => Level::ERROR,
            Verbosity::Normal => Level::WARN,
            Verbosity::Verbose => Level::DEBUG,
        }
    }
}

/// Install the global subscriber. Call once, first thing in `main`.
pub fn init_subscriber(verbosity: Verbosity, no_color: bool) {
    let use_ansi = !no_color && std::io::IsTerminal::is_terminal(&std::io::stderr());
    let layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_ansi(use_ansi)
        .with_target(verbosity == Verbosity::Verbose)
        .without_time()
        .compact();

    tracing_subscriber::registry().with(filter_from(std::env::var(LOG_ENV).ok(), verbosity)).with(layer).init();
}

// An unparseable TASKDECK_LOG falls through to RUST_LOG and then the flags.
fn filter_from(directives: Option<String>, verbosity: Verbosity) -> EnvFilter {
    if let Some(filter) = directives.and_then(|d| EnvFilter::try_new(d).ok()) {
        return filter;
    }
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return filter;
    }
    EnvFilter::new(verbosity.default_level().as_str())
}
