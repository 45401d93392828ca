//! Actions, the producers that bind them to views, and the transitions they yield.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::rc::Rc;

use crate::console::navigator::Navigator;
use crate::console::shortcut::Shortcut;
use crate::console::view::{ViewHandle, WeakView};
use crate::error::Result;

/// What the navigator should do once an action has run.
#[derive(Debug, Clone)]
pub enum Transition {
    /// Render this view next (push, pop or re-render per the history rules).
    Render(ViewHandle),
    /// Render the current view again.
    Stay,
    /// Render the view before the current one.
    Back,
    /// Leave the navigation session.
    Exit,
}

pub type Effect = Rc<dyn Fn(&mut Navigator<'_>) -> Result<Transition>>;

#[derive(Clone)]
enum Link {
    Strong(ViewHandle),
    // Back actions point at views the history already owns.
    Weak(WeakView),
}

impl Link {
    fn get(&self) -> Option<ViewHandle> {
        match self {
            Link::Strong(view) => Some(view.clone()),
            Link::Weak(view) => view.upgrade(),
        }
    }
}

/// A named, shortcut-keyed operation offered by a view.
///
/// Equality and hashing look at the shortcut and nothing else. Two actions
/// with the same shortcut are the same action as far as a registry is
/// concerned, whatever their names or destinations. This is what lets a
/// freshly synthesized back action replace the one from the previous render.
#[derive(Clone)]
pub struct Action {
    name: String,
    shortcut: Shortcut,
    source: WeakView,
    destination: Option<Link>,
    effect: Option<Effect>,
}

impl Action {
    /// An action that renders `destination` when executed.
    pub fn transition(
        name: impl Into<String>,
        shortcut: Shortcut,
        source: &ViewHandle,
        destination: ViewHandle,
    ) -> Self {
        Action::build(name.into(), shortcut, source, Some(Link::Strong(destination)), None)
    }

    /// A transition back to a view that is already in history.
    pub fn back(
        name: impl Into<String>,
        shortcut: Shortcut,
        source: &ViewHandle,
        destination: &ViewHandle,
    ) -> Self {
        Action::build(name.into(), shortcut, source, Some(Link::Weak(destination.downgrade())), None)
    }

    /// An action that runs `effect` and follows the transition it returns.
    pub fn command(name: impl Into<String>, shortcut: Shortcut, source: &ViewHandle, effect: Effect) -> Self {
        Action::build(name.into(), shortcut, source, None, Some(effect))
    }

    fn build(
        name: String,
        shortcut: Shortcut,
        source: &ViewHandle,
        destination: Option<Link>,
        effect: Option<Effect>,
    ) -> Self {
        assert!(!name.trim().is_empty(), "action name must not be empty");
        Action { name, shortcut, source: source.downgrade(), destination, effect }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn shortcut(&self) -> &Shortcut {
        &self.shortcut
    }

    pub fn source(&self) -> Option<ViewHandle> {
        self.source.upgrade()
    }

    pub fn destination(&self) -> Option<ViewHandle> {
        self.destination.as_ref().and_then(Link::get)
    }

    pub fn execute(&self, nav: &mut Navigator<'_>) -> Result<Transition> {
        if let Some(effect) = &self.effect {
            return effect(nav);
        }
        match self.destination() {
            Some(view) => Ok(Transition::Render(view)),
            // The destination left history while this action was still listed.
            None => Ok(Transition::Back),
        }
    }
}

impl PartialEq for Action {
    fn eq(&self, other: &Self) -> bool {
        self.shortcut == other.shortcut
    }
}

impl Eq for Action {}

impl Hash for Action {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.shortcut.hash(state);
    }
}

impl fmt::Debug for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Action")
            .field("name", &self.name)
            .field("shortcut", &self.shortcut)
            .field("command", &self.effect.is_some())
            .finish()
    }
}

/// Deferred factory: turns into an [`Action`] once its source view is known.
///
/// Fails only when building the destination fails.
pub trait ActionProducer {
    fn create(&self, source: &ViewHandle) -> Result<Action>;
}

enum Target {
    Fixed(ViewHandle),
    Factory(Rc<dyn Fn() -> Result<ViewHandle>>),
}

/// Produces transition actions to a fixed view or to one built at bind time.
pub struct TransitionProducer {
    name: String,
    shortcut: Shortcut,
    target: Target,
}

impl TransitionProducer {
    pub fn new(name: impl Into<String>, shortcut: Shortcut, destination: ViewHandle) -> Self {
        TransitionProducer { name: name.into(), shortcut, target: Target::Fixed(destination) }
    }

    /// The factory runs every time the producer is bound, so each view that
    /// registers this producer gets a fresh destination.
    pub fn with_factory(
        name: impl Into<String>,
        shortcut: Shortcut,
        factory: impl Fn() -> Result<ViewHandle> + 'static,
    ) -> Self {
        TransitionProducer { name: name.into(), shortcut, target: Target::Factory(Rc::new(factory)) }
    }
}

impl ActionProducer for TransitionProducer {
    fn create(&self, source: &ViewHandle) -> Result<Action> {
        let destination = match &self.target {
            Target::Fixed(view) => view.clone(),
            Target::Factory(factory) => factory()?,
        };
        Ok(Action::transition(self.name.clone(), self.shortcut.clone(), source, destination))
    }
}

/// Produces command actions sharing one effect.
pub struct CommandProducer {
    name: String,
    shortcut: Shortcut,
    effect: Effect,
}

impl CommandProducer {
    pub fn new(
        name: impl Into<String>,
        shortcut: Shortcut,
        effect: impl Fn(&mut Navigator<'_>) -> Result<Transition> + 'static,
    ) -> Self {
        CommandProducer { name: name.into(), shortcut, effect: Rc::new(effect) }
    }
}

impl ActionProducer for CommandProducer {
    fn create(&self, source: &ViewHandle) -> Result<Action> {
        Ok(Action::command(self.name.clone(), self.shortcut.clone(), source, self.effect.clone()))
    }
}
