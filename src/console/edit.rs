//! Single-field edits bound as actions on a command view.

use std::cell::RefCell;
use std::rc::Rc;

use tracing::debug;

use crate::console::action::{CommandProducer, Transition};
use crate::console::io::Tone;
use crate::console::shortcut::Shortcut;
use crate::console::validation::{format_validation_error, ValidationError};

type Apply<D> = Rc<dyn Fn(&mut D, &str) -> Result<(), ValidationError>>;

/// Prompts for one field and writes it into the draft.
///
/// A rejected value prints one formatted line and asks for the same field
/// again. The draft is only touched by a write that succeeds.
pub struct EditOperation<D> {
    name: String,
    shortcut: Shortcut,
    prompt: String,
    apply: Apply<D>,
}

impl<D: 'static> EditOperation<D> {
    pub fn new(
        name: impl Into<String>,
        shortcut: Shortcut,
        prompt: impl Into<String>,
        apply: impl Fn(&mut D, &str) -> Result<(), ValidationError> + 'static,
    ) -> Self {
        EditOperation { name: name.into(), shortcut, prompt: prompt.into(), apply: Rc::new(apply) }
    }

    pub(crate) fn producer(self, draft: Rc<RefCell<D>>) -> CommandProducer {
        let EditOperation { name, shortcut, prompt, apply } = self;
        CommandProducer::new(name, shortcut, move |nav| loop {
            let input = nav.prompt_user(&prompt)?;
            let written = apply(&mut *draft.borrow_mut(), &input);
            match written {
                Ok(()) => return Ok(Transition::Stay),
                Err(err) => {
                    debug!(error = %err, "field rejected");
                    nav.println_styled(&format_validation_error(&err), Tone::Error)?;
                }
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::console::io::ScriptedConsole;
    use crate::console::navigator::Navigator;
    use crate::console::view::StaticView;

    fn positive(draft: &mut i64, input: &str) -> Result<(), ValidationError> {
        match input.trim().parse::<i64>() {
            Ok(n) if n > 0 => {
                *draft = n;
                Ok(())
            }
            _ => Err(ValidationError::field("count", "must be a positive number")),
        }
    }

    #[test]
    fn test_reprompts_until_the_field_accepts() {
        let draft = Rc::new(RefCell::new(7_i64));
        let op = EditOperation::new("Count", Shortcut::new("c").unwrap(), "Count: ", positive);
        let host = StaticView::handle("Host", &[]);
        let action = {
            use crate::console::action::ActionProducer;
            op.producer(draft.clone()).create(&host).unwrap()
        };

        let mut console = ScriptedConsole::new(["-1", "abc", "12"]);
        let transition = action.execute(&mut Navigator::new(&mut console)).unwrap();

        assert!(matches!(transition, Transition::Stay));
        assert_eq!(*draft.borrow(), 12);
        assert_eq!(
            console.transcript(),
            [
                "Count: -1",
                "Invalid count: must be a positive number",
                "Count: abc",
                "Invalid count: must be a positive number",
                "Count: 12",
            ]
        );
    }

    #[test]
    fn test_rejected_value_leaves_the_draft_alone() {
        let draft = Rc::new(RefCell::new(7_i64));
        let op = EditOperation::new("Count", Shortcut::new("c").unwrap(), "Count: ", positive);
        let host = StaticView::handle("Host", &[]);
        let action = {
            use crate::console::action::ActionProducer;
            op.producer(draft.clone()).create(&host).unwrap()
        };

        let mut console = ScriptedConsole::new(["0"]);
        let err = action.execute(&mut Navigator::new(&mut console)).unwrap_err();
        assert!(matches!(err, crate::error::ConsoleError::InputClosed));
        assert_eq!(*draft.borrow(), 7);
    }
}
