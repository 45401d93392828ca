//! Task and label records.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::fields::*;

/// A work item.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Task {
    pub id: u64,
    pub title: String,
    pub description: Option<String>,
    pub due: Option<NaiveDate>,
    #[serde(default)]
    pub labels: Vec<String>,
    pub status: Status,
    pub created_at_utc: i64,
    pub updated_at_utc: i64,
}

/// A named tag that tasks can carry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Label {
    pub name: String,
    pub color: Option<String>,
}

/// The validated content of a task form, ready to be stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskInput {
    pub id: u64,
    pub title: String,
    pub description: Option<String>,
    pub due: Option<NaiveDate>,
    pub labels: Vec<String>,
}
