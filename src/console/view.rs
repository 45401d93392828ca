//! Views: a title, a body and a registry of shortcut-keyed actions.
//!
//! The render sequence is fixed and lives in [`ViewHandle::render`]; a
//! [`View`] implementation only supplies the title, the body and an optional
//! hook that runs before anything is printed.

use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

use tracing::debug;

use crate::console::action::{Action, ActionProducer, Transition};
use crate::console::io::Tone;
use crate::console::navigator::Navigator;
use crate::console::shortcut::Shortcut;
use crate::console::validation::format_validation_error;
use crate::error::{ConsoleError, Result};

pub const BACK_NAME: &str = "Back";
pub const SELECT_PROMPT: &str = "Select an action: ";
pub const NO_MATCH: &str = "No action with that shortcut.";

/// A renderable console screen.
pub trait View {
    /// Must not be empty.
    fn title(&self) -> String;

    /// Print the body. May prompt the user.
    fn render_body(&mut self, nav: &mut Navigator<'_>) -> Result<()>;

    /// Runs first on every render. Views with data-dependent actions rebuild
    /// them here through `this`. Must not call back into `this` for the title.
    fn before_render(&mut self, this: &ViewHandle) -> Result<()> {
        let _ = this;
        Ok(())
    }
}

/// Insertion-ordered actions, unique by shortcut.
#[derive(Debug, Default)]
pub struct ActionRegistry {
    actions: Vec<Action>,
}

impl ActionRegistry {
    /// Rejects the reserved back shortcut and shortcuts already present.
    pub fn insert(&mut self, action: Action) -> Result<()> {
        if action.shortcut().is_back() {
            return Err(ConsoleError::ReservedShortcut(action.shortcut().clone()));
        }
        if self.actions.contains(&action) {
            return Err(ConsoleError::DuplicateShortcut(action.shortcut().clone()));
        }
        self.actions.push(action);
        Ok(())
    }

    /// Replace the back action, or drop a stale one when `back` is `None`.
    /// The back action always sits last.
    pub fn set_back(&mut self, back: Option<Action>) {
        self.actions.retain(|a| !a.shortcut().is_back());
        if let Some(back) = back {
            self.actions.push(back);
        }
    }

    pub fn find(&self, shortcut: &Shortcut) -> Option<&Action> {
        self.actions.iter().find(|a| a.shortcut() == shortcut)
    }

    pub fn clear(&mut self) {
        self.actions.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = &Action> {
        self.actions.iter()
    }

    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }
}

struct ViewNode {
    view: RefCell<Box<dyn View>>,
    actions: RefCell<ActionRegistry>,
}

/// Shared reference to a view. Equality is identity.
#[derive(Clone)]
pub struct ViewHandle(Rc<ViewNode>);

#[derive(Clone)]
pub struct WeakView(Weak<ViewNode>);

impl WeakView {
    pub fn upgrade(&self) -> Option<ViewHandle> {
        self.0.upgrade().map(ViewHandle)
    }
}

impl fmt::Debug for WeakView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.upgrade() {
            Some(view) => write!(f, "WeakView({:?})", view),
            None => f.write_str("WeakView(<dropped>)"),
        }
    }
}

impl ViewHandle {
    pub fn new(view: impl View + 'static) -> Self {
        ViewHandle(Rc::new(ViewNode {
            view: RefCell::new(Box::new(view)),
            actions: RefCell::new(ActionRegistry::default()),
        }))
    }

    pub fn downgrade(&self) -> WeakView {
        WeakView(Rc::downgrade(&self.0))
    }

    pub fn title(&self) -> String {
        self.0.view.borrow().title()
    }

    /// Bind `producer` to this view and register the resulting action.
    pub fn add_action(&self, producer: &dyn ActionProducer) -> Result<()> {
        let action = producer.create(self)?;
        self.0.actions.borrow_mut().insert(action)
    }

    /// Empties the registry. History is untouched.
    pub fn clear_actions(&self) {
        self.0.actions.borrow_mut().clear();
    }

    /// Snapshot of the registered actions in display order.
    pub fn actions(&self) -> Vec<Action> {
        self.0.actions.borrow().iter().cloned().collect()
    }

    pub fn find_action(&self, shortcut: &Shortcut) -> Option<Action> {
        self.0.actions.borrow().find(shortcut).cloned()
    }

    /// Run the full render sequence and the selected action.
    ///
    /// A validation failure raised by the action is reported as a status line
    /// and turns into [`Transition::Stay`]; every other error propagates.
    pub fn render(&self, nav: &mut Navigator<'_>) -> Result<Transition> {
        self.0.view.borrow_mut().before_render(self)?;

        nav.heading(&self.title())?;
        self.0.view.borrow_mut().render_body(nav)?;
        nav.flush_status()?;

        let back = nav.create_back_action(BACK_NAME, Shortcut::back());
        self.0.actions.borrow_mut().set_back(back);

        let actions = self.actions();
        for action in &actions {
            nav.println(&format!("({}) {}", action.shortcut(), action.name()))?;
        }

        let chosen = loop {
            let input = nav.prompt_user(SELECT_PROMPT)?;
            let matched = Shortcut::new(&input)
                .ok()
                .and_then(|s| actions.iter().find(|a| *a.shortcut() == s));
            match matched {
                Some(action) => break action.clone(),
                None => nav.println_styled(NO_MATCH, Tone::Error)?,
            }
        };

        debug!(view = %self.title(), action = chosen.name(), shortcut = %chosen.shortcut(), "executing action");
        match chosen.execute(nav) {
            Err(ConsoleError::Validation(err)) => {
                debug!(view = %self.title(), error = %err, "validation failed, re-rendering");
                nav.set_status(format_validation_error(&err), Tone::Error);
                Ok(Transition::Stay)
            }
            other => other,
        }
    }
}

impl PartialEq for ViewHandle {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl Eq for ViewHandle {}

impl fmt::Debug for ViewHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0.view.try_borrow() {
            Ok(view) => write!(f, "ViewHandle({:?})", view.title()),
            Err(_) => f.write_str("ViewHandle(<rendering>)"),
        }
    }
}

/// A view with a fixed title and fixed body lines.
pub struct StaticView {
    title: String,
    lines: Vec<String>,
}

impl StaticView {
    pub fn new(title: impl Into<String>, lines: Vec<String>) -> Self {
        StaticView { title: title.into(), lines }
    }

    pub fn handle(title: &str, lines: &[&str]) -> ViewHandle {
        ViewHandle::new(StaticView::new(title, lines.iter().map(|l| l.to_string()).collect()))
    }
}

impl View for StaticView {
    fn title(&self) -> String {
        self.title.clone()
    }

    fn render_body(&mut self, nav: &mut Navigator<'_>) -> Result<()> {
        for line in &self.lines {
            nav.println(line)?;
        }
        Ok(())
    }
}
