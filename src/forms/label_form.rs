//! Label draft used by the new-label form.

use crate::console::command_view::Draft;
use crate::console::validation::{ValidationError, Violations};
use crate::db::{normalise_label, Store};
use crate::task::Label;

pub const NAME_MAX: usize = 32;

pub struct LabelDraft {
    store: Store,
    pub name: Option<String>,
    pub color: Option<String>,
}

impl LabelDraft {
    pub fn new(store: Store) -> Self {
        LabelDraft { store, name: None, color: None }
    }

    pub fn set_name(&mut self, input: &str) -> Result<(), ValidationError> {
        let name = normalise_label(input);
        if name.is_empty() {
            return Err(ValidationError::field("name", "must not be empty"));
        }
        if name.chars().count() > NAME_MAX {
            return Err(ValidationError::field("name", format!("must be at most {} characters", NAME_MAX)));
        }
        if self.taken(&name) {
            return Err(ValidationError::field("name", format!("'{}' already exists", name)));
        }
        self.name = Some(name);
        Ok(())
    }

    /// `#rrggbb`, or empty input to clear.
    pub fn set_color(&mut self, input: &str) -> Result<(), ValidationError> {
        let input = input.trim();
        if input.is_empty() {
            self.color = None;
            return Ok(());
        }
        let hex = input.strip_prefix('#').unwrap_or("");
        if hex.len() != 6 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(ValidationError::field("color", "must look like #a1b2c3"));
        }
        self.color = Some(input.to_lowercase());
        Ok(())
    }

    fn taken(&self, name: &str) -> bool {
        self.store.read(|db| db.label(name).is_some())
    }
}

impl Draft for LabelDraft {
    type Value = Label;

    fn build(&self) -> Result<Label, ValidationError> {
        let mut v = Violations::new();
        match &self.name {
            None => v.push("name", "is required"),
            Some(name) if self.taken(name) => v.push("name", format!("'{}' already exists", name)),
            Some(_) => {}
        }
        v.finish(|| Label { name: self.name.clone().unwrap_or_default(), color: self.color.clone() })
    }

    fn reset(&mut self) {
        self.name = None;
        self.color = None;
    }
}

pub fn format_label_draft(draft: &LabelDraft) -> Vec<String> {
    vec![
        format!("Name:  {}", draft.name.as_deref().unwrap_or("-")),
        format!("Color: {}", draft.color.as_deref().unwrap_or("-")),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> (tempfile::TempDir, Store) {
        let dir = tempfile::tempdir().unwrap();
        let store = Store::open(&dir.path().join("tasks.json"));
        (dir, store)
    }

    #[test]
    fn test_name_is_normalised_and_unique() {
        let (_dir, store) = store();
        store.update(|db| db.add_label(Label { name: "deep-work".into(), color: None })).unwrap().unwrap();

        let mut draft = LabelDraft::new(store);
        let err = draft.set_name(" Deep Work ").unwrap_err();
        assert_eq!(err.first().reason, "'deep-work' already exists");
        draft.set_name("Errands").unwrap();
        assert_eq!(draft.name.as_deref(), Some("errands"));
    }

    #[test]
    fn test_color_must_be_hex() {
        let (_dir, store) = store();
        let mut draft = LabelDraft::new(store);
        assert!(draft.set_color("red").is_err());
        assert!(draft.set_color("#12345g").is_err());
        draft.set_color("#A1B2C3").unwrap();
        assert_eq!(draft.color.as_deref(), Some("#a1b2c3"));
        draft.set_color("").unwrap();
        assert!(draft.color.is_none());
    }

    #[test]
    fn test_build_requires_a_name() {
        let (_dir, store) = store();
        let mut draft = LabelDraft::new(store);
        assert_eq!(draft.build().unwrap_err().first().path, "name");
        draft.set_name("home").unwrap();
        assert_eq!(draft.build().unwrap(), Label { name: "home".into(), color: None });
        draft.reset();
        assert!(draft.name.is_none());
    }
}
