//! The navigator keeps the back-stack of rendered views and drives the render loop.

use tracing::{debug, trace};

use crate::console::action::{Action, Transition};
use crate::console::io::{Console, Tone};
use crate::console::shortcut::Shortcut;
use crate::console::view::ViewHandle;
use crate::error::Result;

/// Controller for one interactive session.
///
/// History is a pure back-stack: rendering the current view again is a no-op,
/// rendering the view just before the current one pops, anything else pushes.
pub struct Navigator<'c> {
    console: &'c mut dyn Console,
    history: Vec<ViewHandle>,
    status: Option<(String, Tone)>,
}

impl<'c> Navigator<'c> {
    pub fn new(console: &'c mut dyn Console) -> Self {
        Navigator { console, history: Vec::new(), status: None }
    }

    pub fn history(&self) -> &[ViewHandle] {
        &self.history
    }

    /// Apply the history rule for rendering `view`.
    pub fn enter(&mut self, view: &ViewHandle) {
        let len = self.history.len();
        if self.history.last() == Some(view) {
            trace!(view = %view.title(), "re-render");
        } else if len >= 2 && &self.history[len - 2] == view {
            let left = self.history.pop();
            debug!(view = %view.title(), left = ?left, depth = self.history.len(), "history pop");
        } else {
            self.history.push(view.clone());
            debug!(view = %view.title(), depth = self.history.len(), "history push");
        }
    }

    /// Render `view` and keep following the transitions its actions return.
    ///
    /// Returns when an action asks to leave the session, or when going back
    /// from the first view. History is cleared on the way out so the
    /// navigator can start another session.
    pub fn render_view(&mut self, view: ViewHandle) -> Result<()> {
        let mut next = view;
        loop {
            self.enter(&next);
            let transition = match next.render(self) {
                Ok(transition) => transition,
                Err(err) => {
                    self.history.clear();
                    return Err(err);
                }
            };
            next = match transition {
                Transition::Render(view) => view,
                Transition::Stay => next,
                Transition::Back => match self.previous() {
                    Some(view) => view,
                    None => break,
                },
                Transition::Exit => break,
            };
        }
        debug!(depth = self.history.len(), "session finished");
        self.history.clear();
        Ok(())
    }

    fn previous(&self) -> Option<ViewHandle> {
        let len = self.history.len();
        (len >= 2).then(|| self.history[len - 2].clone())
    }

    /// Synthesize a back action from the last two history entries.
    ///
    /// Computed fresh on every call and never changes history.
    pub fn create_back_action(&self, name: &str, shortcut: Shortcut) -> Option<Action> {
        let len = self.history.len();
        if len < 2 {
            return None;
        }
        Some(Action::back(name, shortcut, &self.history[len - 1], &self.history[len - 2]))
    }

    pub fn prompt_user(&mut self, prompt: &str) -> Result<String> {
        assert!(!prompt.is_empty(), "prompt must not be empty");
        self.console.prompt_user(prompt)
    }

    pub fn println(&mut self, message: &str) -> Result<()> {
        assert!(!message.is_empty(), "message must not be empty");
        self.console.println(message)
    }

    pub fn println_styled(&mut self, message: &str, tone: Tone) -> Result<()> {
        assert!(!message.is_empty(), "message must not be empty");
        self.console.println_styled(message, tone)
    }

    /// Title followed by a dash underline of the same width.
    pub fn heading(&mut self, title: &str) -> Result<()> {
        self.println_styled(title, Tone::Heading)?;
        self.println(&"-".repeat(title.chars().count()))
    }

    /// Queue a line for the next render, shown right after the body.
    pub fn set_status(&mut self, message: impl Into<String>, tone: Tone) {
        self.status = Some((message.into(), tone));
    }

    pub fn pending_status(&self) -> Option<&str> {
        self.status.as_ref().map(|(message, _)| message.as_str())
    }

    pub(crate) fn flush_status(&mut self) -> Result<()> {
        match self.status.take() {
            Some((message, tone)) if !message.is_empty() => self.println_styled(&message, tone),
            _ => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::console::action::CommandProducer;
    use crate::console::io::ScriptedConsole;
    use crate::console::view::{StaticView, BACK_NAME};

    fn views() -> (ViewHandle, ViewHandle, ViewHandle) {
        (
            StaticView::handle("One", &[]),
            StaticView::handle("Two", &[]),
            StaticView::handle("Three", &[]),
        )
    }

    #[test]
    fn test_history_pushes_ignores_rerender_and_pops_predecessor() {
        let (v1, v2, v3) = views();
        let mut console = ScriptedConsole::new(Vec::<String>::new());
        let mut nav = Navigator::new(&mut console);

        nav.enter(&v1);
        nav.enter(&v2);
        nav.enter(&v3);
        assert_eq!(nav.history(), [v1.clone(), v2.clone(), v3.clone()]);

        nav.enter(&v3);
        assert_eq!(nav.history(), [v1.clone(), v2.clone(), v3.clone()]);

        nav.enter(&v2);
        assert_eq!(nav.history(), [v1.clone(), v2.clone()]);

        // Not the predecessor: pushed again.
        nav.enter(&v3);
        nav.enter(&v1);
        assert_eq!(nav.history(), [v1.clone(), v2, v3, v1]);
    }

    #[test]
    fn test_back_action_needs_two_entries() {
        let (v1, v2, _) = views();
        let mut console = ScriptedConsole::new(Vec::<String>::new());
        let mut nav = Navigator::new(&mut console);

        nav.enter(&v1);
        assert!(nav.create_back_action(BACK_NAME, Shortcut::back()).is_none());

        nav.enter(&v2);
        let back = nav.create_back_action(BACK_NAME, Shortcut::back()).unwrap();
        assert_eq!(back.source(), Some(v2.clone()));
        assert_eq!(back.destination(), Some(v1.clone()));
        assert_eq!(back.name(), "Back");
        assert_eq!(nav.history(), [v1, v2]);
    }

    #[test]
    fn test_back_is_listed_last_and_walks_the_history() {
        let (v1, v2, _) = views();
        v1.add_action(&crate::console::action::TransitionProducer::new(
            "Two",
            Shortcut::new("2").unwrap(),
            v2.clone(),
        ))
        .unwrap();
        v1.add_action(&CommandProducer::new("Quit", Shortcut::new("q").unwrap(), |_| {
            Ok(Transition::Exit)
        }))
        .unwrap();

        let mut console = ScriptedConsole::new(["2", "b", "q"]);
        {
            let mut nav = Navigator::new(&mut console);
            nav.render_view(v1.clone()).unwrap();
            assert!(nav.history().is_empty());
        }

        let lines = console.transcript();
        let two_at = lines.iter().position(|l| l == "Two").unwrap();
        assert_eq!(lines[two_at + 2], "(b) Back");
        assert_eq!(lines[two_at + 3], "Select an action: b");
        // Back on v1: no back action offered at the root.
        let tail = &lines[two_at + 4..];
        assert_eq!(tail[0], "One");
        assert!(!tail.iter().any(|l| l == "(b) Back"));
    }

    #[test]
    fn test_status_is_shown_once_after_the_body() {
        let home = StaticView::handle("Home", &["body"]);
        home.add_action(&CommandProducer::new("Poke", Shortcut::new("p").unwrap(), |nav| {
            nav.set_status("Poked.", Tone::Notice);
            Ok(Transition::Stay)
        }))
        .unwrap();
        home.add_action(&CommandProducer::new("Quit", Shortcut::new("q").unwrap(), |_| {
            Ok(Transition::Exit)
        }))
        .unwrap();

        let mut console = ScriptedConsole::new(["p", "q"]);
        Navigator::new(&mut console).render_view(home).unwrap();

        let lines = console.transcript();
        assert_eq!(lines.iter().filter(|l| *l == "Poked.").count(), 1);
        let poked = lines.iter().position(|l| l == "Poked.").unwrap();
        assert_eq!(lines[poked - 1], "body");
    }

    #[test]
    fn test_closed_input_ends_the_session_with_an_error() {
        let home = StaticView::handle("Home", &[]);
        let mut console = ScriptedConsole::new(Vec::<String>::new());
        let mut nav = Navigator::new(&mut console);
        let err = nav.render_view(home).unwrap_err();
        assert!(matches!(err, crate::error::ConsoleError::InputClosed));
        assert!(nav.history().is_empty());
    }

    #[test]
    #[should_panic(expected = "message must not be empty")]
    fn test_empty_message_is_a_precondition_violation() {
        let mut console = ScriptedConsole::new(Vec::<String>::new());
        let _ = Navigator::new(&mut console).println("");
    }
}
