//! Error type shared by the console framework and the task store.

use thiserror::Error;

use crate::console::shortcut::Shortcut;
use crate::console::validation::ValidationError;

#[derive(Error, Debug)]
pub enum ConsoleError {
    #[error("shortcut must not be empty")]
    EmptyShortcut,

    #[error("shortcut '{0}' is reserved for navigating back")]
    ReservedShortcut(Shortcut),

    #[error("an action with shortcut '{0}' is already registered")]
    DuplicateShortcut(Shortcut),

    /// Recoverable: the render loop turns this into a status line.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("input closed while waiting for an answer")]
    InputClosed,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to save {path}: {source}")]
    Storage {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

impl ConsoleError {
    /// Process exit code for errors that reach `main`.
    pub fn exit_code(&self) -> i32 {
        match self {
            ConsoleError::InputClosed => 0,
            ConsoleError::Storage { .. } | ConsoleError::Io(_) => 2,
            _ => 1,
        }
    }
}

pub type Result<T> = std::result::Result<T, ConsoleError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_errors_mention_the_field() {
        let err: ConsoleError = ValidationError::field("title", "is required").into();
        assert_eq!(err.exit_code(), 1);
        assert!(err.to_string().contains("title"));
    }

    #[test]
    fn test_storage_failures_exit_with_two() {
        let err = ConsoleError::Storage {
            path: "/nowhere/tasks.json".into(),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        };
        assert_eq!(err.exit_code(), 2);
        assert_eq!(ConsoleError::InputClosed.exit_code(), 0);
    }
}
