//! Database operations and utility functions for tasks and labels.
//!
//! This module provides the `Database` struct, the shared `Store` handle the
//! console views post into, and helpers for date parsing, formatting and
//! label normalisation.

use std::cell::RefCell;
use std::collections::HashMap;
use std::fs::{self, File};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use std::rc::Rc;

use chrono::{Datelike, Duration, Local, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::{ConsoleError, Result};
use crate::fields::*;
use crate::task::{Label, Task, TaskInput};

/// In-memory database for tasks and labels.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Database {
    pub tasks: Vec<Task>,
    #[serde(default)]
    pub labels: Vec<Label>,
}

impl Database {
    /// Load database from JSON file, creating a new empty database if file doesn't exist.
    pub fn load(path: &Path) -> Self {
        if !path.exists() {
            return Database::default();
        }
        let mut buf = String::new();
        match File::open(path).and_then(|mut f| f.read_to_string(&mut buf)) {
            Ok(_) => match serde_json::from_str(&buf) {
                Ok(db) => db,
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "error parsing database, starting fresh");
                    Database::default()
                }
            },
            Err(e) => {
                warn!(path = %path.display(), error = %e, "error reading database, starting fresh");
                Database::default()
            }
        }
    }

    /// Save database to JSON file using atomic write (temp file + rename).
    pub fn save(&self, path: &Path) -> std::io::Result<()> {
        if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(dir)?;
        }
        let tmp = path.with_extension("json.tmp");
        let mut f = File::create(&tmp)?;
        let data = serde_json::to_string_pretty(self)?;
        f.write_all(data.as_bytes())?;
        f.flush()?;
        fs::rename(tmp, path)?;
        Ok(())
    }

    /// Generate the next available task ID.
    pub fn next_task_id(&self) -> u64 {
        self.tasks.iter().map(|t| t.id).max().unwrap_or(0) + 1
    }

    /// Get a task by ID.
    pub fn get(&self, id: u64) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    /// Get a mutable reference to a task by ID.
    pub fn get_mut(&mut self, id: u64) -> Option<&mut Task> {
        self.tasks.iter_mut().find(|t| t.id == id)
    }

    /// Store a new task and return its ID. A taken ID is replaced by the next free one.
    pub fn add_task(&mut self, input: TaskInput) -> u64 {
        let id = if self.get(input.id).is_some() || input.id == 0 { self.next_task_id() } else { input.id };
        let now = Utc::now().timestamp();
        self.tasks.push(Task {
            id,
            title: input.title,
            description: input.description,
            due: input.due,
            labels: input.labels,
            status: Status::Open,
            created_at_utc: now,
            updated_at_utc: now,
        });
        id
    }

    /// Overwrite the editable fields of an existing task.
    pub fn update_task(&mut self, input: TaskInput) -> std::result::Result<(), String> {
        let task = self.get_mut(input.id).ok_or_else(|| format!("Task with ID {} not found", input.id))?;
        task.title = input.title;
        task.description = input.description;
        task.due = input.due;
        task.labels = input.labels;
        task.updated_at_utc = Utc::now().timestamp();
        Ok(())
    }

    pub fn remove_task(&mut self, id: u64) -> Option<Task> {
        let idx = self.tasks.iter().position(|t| t.id == id)?;
        Some(self.tasks.remove(idx))
    }

    /// Move a task to `to` if the status table allows it. Returns the previous status.
    pub fn transition(&mut self, id: u64, to: Status) -> std::result::Result<Status, String> {
        let task = self.get_mut(id).ok_or_else(|| format!("Task with ID {} not found", id))?;
        let from = task.status;
        if !from.can_become(to) {
            return Err(format!(
                "Cannot move task {} from {} to {}",
                id,
                format_status(from),
                format_status(to)
            ));
        }
        task.status = to;
        task.updated_at_utc = Utc::now().timestamp();
        Ok(from)
    }

    pub fn label(&self, name: &str) -> Option<&Label> {
        self.labels.iter().find(|l| l.name == name)
    }

    pub fn add_label(&mut self, label: Label) -> std::result::Result<(), String> {
        if self.label(&label.name).is_some() {
            return Err(format!("Label '{}' already exists", label.name));
        }
        self.labels.push(label);
        self.labels.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(())
    }

    /// Remove a label and strip it from every task carrying it.
    pub fn remove_label(&mut self, name: &str) -> bool {
        let before = self.labels.len();
        self.labels.retain(|l| l.name != name);
        if self.labels.len() == before {
            return false;
        }
        for t in self.tasks.iter_mut() {
            t.labels.retain(|l| l != name);
        }
        true
    }

    /// Number of tasks per label name.
    pub fn label_usage(&self) -> HashMap<&str, usize> {
        let mut usage = HashMap::new();
        for t in &self.tasks {
            for l in &t.labels {
                *usage.entry(l.as_str()).or_insert(0) += 1;
            }
        }
        usage
    }
}

/// Shared handle to the database used by every view of a session.
///
/// Each `update` writes the whole database back to disk.
#[derive(Clone)]
pub struct Store {
    db: Rc<RefCell<Database>>,
    path: Rc<PathBuf>,
}

impl Store {
    pub fn open(path: &Path) -> Self {
        Store { db: Rc::new(RefCell::new(Database::load(path))), path: Rc::new(path.to_path_buf()) }
    }

    pub fn read<R>(&self, f: impl FnOnce(&Database) -> R) -> R {
        f(&*self.db.borrow())
    }

    /// Changes a copy and swaps it in only once it is on disk, so a failed
    /// save leaves the in-memory database as it was.
    pub fn update<R>(&self, f: impl FnOnce(&mut Database) -> R) -> Result<R> {
        let mut next = self.db.borrow().clone();
        let out = f(&mut next);
        next.save(&self.path).map_err(|source| ConsoleError::Storage {
            path: self.path.display().to_string(),
            source,
        })?;
        *self.db.borrow_mut() = next;
        info!(path = %self.path.display(), "database saved");
        Ok(out)
    }
}

/// Normalise a label by trimming, lowercasing, and replacing spaces with hyphens.
pub fn normalise_label(s: &str) -> String {
    s.trim().to_lowercase().split_whitespace().collect::<Vec<_>>().join("-")
}

/// Split comma-separated label input and normalise each label.
pub fn split_and_normalise_labels(input: &str) -> Vec<String> {
    let mut labels: Vec<String> = input
        .split(',')
        .map(normalise_label)
        .filter(|l| !l.is_empty())
        .collect();
    labels.sort();
    labels.dedup();
    labels
}

/// Parse human-readable due date input.
///
/// Supports:
/// - "today", "tomorrow", "yesterday"
/// - "monday" .. "sunday" and "next monday" etc.
/// - "end of week", "end of month"
/// - "in 3d", "in 2w"
/// - "YYYY-MM-DD" format
pub fn parse_due_input(s: &str) -> Option<NaiveDate> {
    parse_due_input_from(s, Local::now().date_naive())
}

/// [`parse_due_input`] relative to a fixed day.
pub fn parse_due_input_from(s: &str, today: NaiveDate) -> Option<NaiveDate> {
    let s = s.trim().to_lowercase();

    match s.as_str() {
        "today" => return Some(today),
        "tomorrow" => return Some(today + Duration::days(1)),
        "yesterday" => return Some(today - Duration::days(1)),
        "end of week" | "eow" => {
            let (_, end) = start_end_of_this_week(today);
            return Some(end);
        },
        "end of month" | "eom" => {
            let (year, month) = if today.month() == 12 { (today.year() + 1, 1) } else { (today.year(), today.month() + 1) };
            let first_of_next = NaiveDate::from_ymd_opt(year, month, 1)?;
            return Some(first_of_next - Duration::days(1));
        },
        _ => {}
    }

    if let Some(rest) = s.strip_prefix("in ") {
        if let Some(nd) = rest.strip_suffix('d') {
            if let Ok(days) = nd.trim().parse::<i64>() {
                return today.checked_add_signed(Duration::try_days(days)?);
            }
        }
        if let Some(nw) = rest.strip_suffix('w') {
            if let Ok(weeks) = nw.trim().parse::<i64>() {
                return today.checked_add_signed(Duration::try_weeks(weeks)?);
            }
        }
    }

    let weekdays = [
        ("monday", 0), ("tuesday", 1), ("wednesday", 2), ("thursday", 3),
        ("friday", 4), ("saturday", 5), ("sunday", 6),
        ("mon", 0), ("tue", 1), ("wed", 2), ("thu", 3),
        ("fri", 4), ("sat", 5), ("sun", 6),
    ];

    let current_day = today.weekday().num_days_from_monday() as i64;
    for (day_name, target_day) in weekdays {
        let days_ahead = (target_day + 7 - current_day) % 7;
        if s == day_name {
            return Some(today + Duration::days(days_ahead));
        }
        if s == format!("next {}", day_name) {
            let days_to_add = if days_ahead == 0 { 7 } else { days_ahead + 7 };
            return Some(today + Duration::days(days_to_add));
        }
    }

    NaiveDate::parse_from_str(&s, "%Y-%m-%d").ok()
}

/// Calculate the start and end dates of the current ISO week (Monday to Sunday).
pub fn start_end_of_this_week(today: NaiveDate) -> (NaiveDate, NaiveDate) {
    let weekday = today.weekday().num_days_from_monday() as i64;
    let start = today - Duration::days(weekday);
    let end = start + Duration::days(6);
    (start, end)
}

/// Format a due date relative to today ("today", "tomorrow", "in 3d", "2d late").
pub fn format_due_relative(due: Option<NaiveDate>, today: NaiveDate) -> String {
    match due {
        None => "-".into(),
        Some(d) => {
            let delta = (d - today).num_days();
            if delta == 0 {
                "today".into()
            } else if delta == 1 {
                "tomorrow".into()
            } else if delta > 1 {
                format!("in {}d", delta)
            } else {
                format!("{}d late", -delta)
            }
        }
    }
}

/// Format a task status for display.
pub fn format_status(s: Status) -> &'static str {
    match s {
        Status::Open => "Open",
        Status::InProgress => "InProgress",
        Status::Done => "Done",
    }
}

/// One table row per task, header first.
pub fn table_lines(tasks: &[&Task], today: NaiveDate) -> Vec<String> {
    let mut lines = vec![format!("{:<5} {:<11} {:<10} {}", "ID", "Status", "Due", "Title [labels]")];
    for t in tasks {
        let labels = if t.labels.is_empty() { String::new() } else { format!(" [{}]", t.labels.join(",")) };
        lines.push(format!(
            "{:<5} {:<11} {:<10} {}{}",
            t.id,
            format_status(t.status),
            format_due_relative(t.due, today),
            truncate(&t.title, 60),
            labels
        ));
    }
    lines
}

/// Print tasks in a formatted table.
pub fn print_table(tasks: &[&Task]) {
    for line in table_lines(tasks, Local::now().date_naive()) {
        println!("{}", line);
    }
}

/// Truncate a string to a maximum width, adding ellipsis if needed.
pub fn truncate(s: &str, width: usize) -> String {
    if s.chars().count() <= width {
        s.to_string()
    } else {
        let mut out = String::new();
        for (i, ch) in s.chars().enumerate() {
            if i + 1 >= width {
                out.push('…');
                break;
            }
            out.push(ch);
        }
        out
    }
}
