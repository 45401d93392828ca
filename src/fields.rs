//! Enumerations for task state.
//!
//! Status values and the transitions allowed between them.

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Task completion status.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, ValueEnum, PartialEq, Eq, Hash)]
#[serde(rename_all = "kebab-case")]
pub enum Status {
    #[serde(alias = "Open")]
    Open,
    #[serde(alias = "InProgress")]
    InProgress,
    #[serde(alias = "Done")]
    Done,
}

impl Status {
    /// Statuses reachable from this one.
    pub fn next_allowed(self) -> &'static [Status] {
        match self {
            Status::Open => &[Status::InProgress],
            Status::InProgress => &[Status::Done, Status::Open],
            Status::Done => &[Status::Open],
        }
    }

    pub fn can_become(self, to: Status) -> bool {
        self.next_allowed().contains(&to)
    }
}
