//! Field violations produced by drafts, and the one-line formatter shown to users.

use std::fmt;

use thiserror::Error;

/// A single violated field, addressed by a dot-path such as `details.due`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    pub path: String,
    pub reason: String,
}

impl Violation {
    pub fn new(path: impl Into<String>, reason: impl Into<String>) -> Self {
        Violation { path: path.into(), reason: reason.into() }
    }

    /// Re-root the violation under `prefix`, for drafts nested in other drafts.
    pub fn nested(self, prefix: &str) -> Self {
        Violation { path: format!("{}.{}", prefix, self.path), reason: self.reason }
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.path, self.reason)
    }
}

/// One or more violations reported by a field setter or by `Draft::build`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("validation failed: {}", summary(.violations))]
pub struct ValidationError {
    violations: Vec<Violation>,
}

fn summary(violations: &[Violation]) -> String {
    violations.iter().map(ToString::to_string).collect::<Vec<_>>().join("; ")
}

impl ValidationError {
    pub fn field(path: impl Into<String>, reason: impl Into<String>) -> Self {
        ValidationError { violations: vec![Violation::new(path, reason)] }
    }

    /// Returns `None` when there is nothing to report.
    pub fn from_violations(violations: Vec<Violation>) -> Option<Self> {
        if violations.is_empty() {
            None
        } else {
            Some(ValidationError { violations })
        }
    }

    pub fn violations(&self) -> &[Violation] {
        &self.violations
    }

    pub fn first(&self) -> &Violation {
        // from_violations and field never build an empty list
        &self.violations[0]
    }

    pub fn nested(self, prefix: &str) -> Self {
        ValidationError {
            violations: self.violations.into_iter().map(|v| v.nested(prefix)).collect(),
        }
    }
}

/// Collects violations while a draft checks its fields.
#[derive(Debug, Default)]
pub struct Violations(Vec<Violation>);

impl Violations {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, path: impl Into<String>, reason: impl Into<String>) {
        self.0.push(Violation::new(path, reason));
    }

    pub fn extend(&mut self, err: ValidationError) {
        self.0.extend(err.violations);
    }

    /// `Ok(value)` when nothing was collected.
    pub fn finish<T>(self, value: impl FnOnce() -> T) -> Result<T, ValidationError> {
        match ValidationError::from_violations(self.0) {
            Some(err) => Err(err),
            None => Ok(value()),
        }
    }
}

/// Render a validation failure as a single line.
///
/// The first violation leads; any others are listed by path so a failed build
/// never hides a field the user still has to fix.
pub fn format_validation_error(err: &ValidationError) -> String {
    let first = err.first();
    let mut line = format!("Invalid {}: {}", first.path, first.reason);
    let rest: Vec<&str> = err.violations()[1..].iter().map(|v| v.path.as_str()).collect();
    if !rest.is_empty() {
        line.push_str(&format!(" (also invalid: {})", rest.join(", ")));
    }
    line
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_violation_formats_on_one_line() {
        let err = ValidationError::field("title", "must not be empty");
        assert_eq!(format_validation_error(&err), "Invalid title: must not be empty");
    }

    #[test]
    fn test_first_violation_leads_and_others_are_named() {
        let mut v = Violations::new();
        v.push("title", "must not be empty");
        v.extend(ValidationError::field("due", "not a date").nested("details"));
        v.push("labels", "unknown label 'x'");
        let err = v.finish(|| ()).unwrap_err();

        let line = format_validation_error(&err);
        assert_eq!(
            line,
            "Invalid title: must not be empty (also invalid: details.due, labels)"
        );
        assert!(!line.contains('\n'));
    }

    #[test]
    fn test_empty_collection_builds_value() {
        assert_eq!(Violations::new().finish(|| 7).unwrap(), 7);
        assert!(ValidationError::from_violations(Vec::new()).is_none());
    }
}
