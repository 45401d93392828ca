//! Task draft used by the create and edit forms.
//!
//! Fields are set one at a time from raw console input. Every setter either
//! stores the parsed value or returns a violation and leaves the field alone.

use chrono::NaiveDate;

use crate::console::command_view::Draft;
use crate::console::validation::{ValidationError, Violations};
use crate::db::{parse_due_input, split_and_normalise_labels, Store};
use crate::task::{Task, TaskInput};

pub const TITLE_MAX: usize = 80;
pub const DESCRIPTION_MAX: usize = 500;

/// Nested part of the task draft; its violations surface as `details.<field>`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DetailsDraft {
    pub description: Option<String>,
    pub due: Option<NaiveDate>,
}

impl DetailsDraft {
    /// Empty input clears the description.
    pub fn set_description(&mut self, input: &str) -> Result<(), ValidationError> {
        let input = input.trim();
        if input.chars().count() > DESCRIPTION_MAX {
            return Err(ValidationError::field(
                "description",
                format!("must be at most {} characters", DESCRIPTION_MAX),
            ));
        }
        self.description = (!input.is_empty()).then(|| input.to_string());
        Ok(())
    }

    /// Empty input clears the due date.
    pub fn set_due(&mut self, input: &str) -> Result<(), ValidationError> {
        if input.trim().is_empty() {
            self.due = None;
            return Ok(());
        }
        match parse_due_input(input) {
            Some(date) => {
                self.due = Some(date);
                Ok(())
            }
            None => Err(ValidationError::field(
                "due",
                format!("'{}' is not a date (try YYYY-MM-DD, today, in 3d, friday)", input.trim()),
            )),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FormMode {
    Create,
    Edit,
}

pub struct TaskDraft {
    store: Store,
    mode: FormMode,
    pub id: Option<u64>,
    pub title: Option<String>,
    pub details: DetailsDraft,
    pub labels: Vec<String>,
}

impl TaskDraft {
    /// Empty draft for a new task; the ID is assigned on render.
    pub fn new(store: Store) -> Self {
        TaskDraft {
            store,
            mode: FormMode::Create,
            id: None,
            title: None,
            details: DetailsDraft::default(),
            labels: Vec::new(),
        }
    }

    /// Draft pre-filled from an existing task.
    pub fn from_task(store: Store, task: &Task) -> Self {
        TaskDraft {
            store,
            mode: FormMode::Edit,
            id: Some(task.id),
            title: Some(task.title.clone()),
            details: DetailsDraft { description: task.description.clone(), due: task.due },
            labels: task.labels.clone(),
        }
    }

    pub fn set_title(&mut self, input: &str) -> Result<(), ValidationError> {
        let input = input.trim();
        if input.is_empty() {
            return Err(ValidationError::field("title", "must not be empty"));
        }
        if input.chars().count() > TITLE_MAX {
            return Err(ValidationError::field("title", format!("must be at most {} characters", TITLE_MAX)));
        }
        self.title = Some(input.to_string());
        Ok(())
    }

    pub fn set_description(&mut self, input: &str) -> Result<(), ValidationError> {
        self.details.set_description(input).map_err(|e| e.nested("details"))
    }

    pub fn set_due(&mut self, input: &str) -> Result<(), ValidationError> {
        self.details.set_due(input).map_err(|e| e.nested("details"))
    }

    /// Comma-separated label names; every label must already exist.
    pub fn set_labels(&mut self, input: &str) -> Result<(), ValidationError> {
        let labels = split_and_normalise_labels(input);
        if let Some(reason) = self.unknown_labels(&labels) {
            return Err(ValidationError::field("labels", reason));
        }
        self.labels = labels;
        Ok(())
    }

    fn unknown_labels(&self, labels: &[String]) -> Option<String> {
        let unknown: Vec<&str> = self.store.read(|db| {
            labels.iter().filter(|l| db.label(l).is_none()).map(String::as_str).collect()
        });
        (!unknown.is_empty()).then(|| format!("unknown label(s): {}", unknown.join(", ")))
    }
}

impl Draft for TaskDraft {
    type Value = TaskInput;

    fn build(&self) -> Result<TaskInput, ValidationError> {
        let mut v = Violations::new();
        if self.id.is_none() {
            v.push("id", "has not been assigned");
        }
        if self.title.is_none() {
            v.push("title", "is required");
        }
        // A label may have been deleted since it was entered.
        if let Some(reason) = self.unknown_labels(&self.labels) {
            v.push("labels", reason);
        }
        v.finish(|| TaskInput {
            id: self.id.unwrap_or_default(),
            title: self.title.clone().unwrap_or_default(),
            description: self.details.description.clone(),
            due: self.details.due,
            labels: self.labels.clone(),
        })
    }

    fn reset(&mut self) {
        self.title = None;
        self.details = DetailsDraft::default();
        self.labels.clear();
    }

    fn refresh_identity(&mut self) {
        if self.mode == FormMode::Create {
            self.id = Some(self.store.read(|db| db.next_task_id()));
        }
    }
}

/// Body lines of a task form.
pub fn format_task_draft(draft: &TaskDraft) -> Vec<String> {
    let id = draft.id.map(|id| format!("#{}", id)).unwrap_or_else(|| "-".into());
    let labels = if draft.labels.is_empty() { "-".to_string() } else { draft.labels.join(", ") };
    vec![
        format!("ID:          {}", id),
        format!("Title:       {}", draft.title.as_deref().unwrap_or("-")),
        format!("Description: {}", draft.details.description.as_deref().unwrap_or("-")),
        format!("Due:         {}", draft.details.due.map(|d| d.to_string()).unwrap_or_else(|| "-".into())),
        format!("Labels:      {}", labels),
    ]
}
