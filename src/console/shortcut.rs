//! Short user-input tokens that identify actions.

use std::fmt;

use crate::error::{ConsoleError, Result};

const BACK: &str = "b";

/// The token a user types to pick an action.
///
/// Never empty. Surrounding whitespace is trimmed so that `" n "` typed at the
/// prompt selects the action registered as `"n"`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Shortcut(String);

impl Shortcut {
    pub fn new(token: impl AsRef<str>) -> Result<Self> {
        let token = token.as_ref().trim();
        if token.is_empty() {
            return Err(ConsoleError::EmptyShortcut);
        }
        Ok(Shortcut(token.to_string()))
    }

    /// The reserved shortcut of the synthesized back action.
    pub fn back() -> Self {
        Shortcut(BACK.to_string())
    }

    pub fn is_back(&self) -> bool {
        self.0 == BACK
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Shortcut {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<u64> for Shortcut {
    fn from(index: u64) -> Self {
        Shortcut(index.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_empty_tokens() {
        assert!(matches!(Shortcut::new(""), Err(ConsoleError::EmptyShortcut)));
        assert!(matches!(Shortcut::new("   "), Err(ConsoleError::EmptyShortcut)));
    }

    #[test]
    fn test_trims_and_compares_by_value() {
        assert_eq!(Shortcut::new(" n ").unwrap(), Shortcut::new("n").unwrap());
        assert_ne!(Shortcut::new("n").unwrap(), Shortcut::new("N").unwrap());
        assert!(Shortcut::new("b").unwrap().is_back());
        assert_eq!(Shortcut::from(3_u64).as_str(), "3");
    }
}
