//! Actions shared by every application view.

use crate::console::action::{CommandProducer, Transition};
use crate::console::shortcut::Shortcut;
use crate::error::Result;

/// `(q) Quit to menu`: leaves the navigation session.
pub fn quit_producer() -> Result<CommandProducer> {
    Ok(CommandProducer::new("Quit to menu", Shortcut::new("q")?, |_| Ok(Transition::Exit)))
}
