//! Numbered menu of startable modes with a trailing exit entry.

use std::rc::Rc;

use crate::console::io::Tone;
use crate::console::navigator::Navigator;
use crate::console::view::ViewHandle;
use crate::error::Result;

pub const DEFAULT_EXIT_MESSAGE: &str = "Bye!";
pub const SEPARATOR: &str = ") ";
const MENU_PROMPT: &str = "Choose an option: ";
const UNKNOWN_OPTION: &str = "Unknown option.";

/// Something a menu entry can start.
pub trait Mode {
    fn start(&self, nav: &mut Navigator<'_>) -> Result<()>;
}

/// Starts a navigation session at a root view built on demand.
pub struct ViewSession {
    root: Box<dyn Fn() -> Result<ViewHandle>>,
}

impl ViewSession {
    pub fn new(root: impl Fn() -> Result<ViewHandle> + 'static) -> Self {
        ViewSession { root: Box::new(root) }
    }
}

impl Mode for ViewSession {
    fn start(&self, nav: &mut Navigator<'_>) -> Result<()> {
        let root = (self.root)()?;
        nav.render_view(root)
    }
}

/// Runs `mode`, then `parent` if there is one. Both run, in that order.
pub struct CompositeMode {
    mode: Rc<dyn Mode>,
    parent: Option<Rc<dyn Mode>>,
}

impl CompositeMode {
    pub fn new(mode: impl Mode + 'static) -> Self {
        CompositeMode { mode: Rc::new(mode), parent: None }
    }

    pub fn with_parent(mut self, parent: impl Mode + 'static) -> Self {
        self.parent = Some(Rc::new(parent));
        self
    }
}

impl Mode for CompositeMode {
    fn start(&self, nav: &mut Navigator<'_>) -> Result<()> {
        self.mode.start(nav)?;
        if let Some(parent) = &self.parent {
            parent.start(nav)?;
        }
        Ok(())
    }
}

struct ExitMode {
    message: String,
}

impl Mode for ExitMode {
    fn start(&self, nav: &mut Navigator<'_>) -> Result<()> {
        nav.println(&self.message)
    }
}

pub struct MenuItem {
    name: String,
    mode: Rc<dyn Mode>,
    exit: bool,
}

impl MenuItem {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_exit(&self) -> bool {
        self.exit
    }

    pub fn start(&self, nav: &mut Navigator<'_>) -> Result<()> {
        self.mode.start(nav)
    }
}

pub struct MenuBuilder {
    title: String,
    items: Vec<(String, Rc<dyn Mode>)>,
    exit_message: String,
}

impl MenuBuilder {
    pub fn item(mut self, name: impl Into<String>, mode: impl Mode + 'static) -> Self {
        let name = name.into();
        assert!(!name.trim().is_empty(), "menu item name must not be empty");
        self.items.push((name, Rc::new(mode)));
        self
    }

    pub fn exit_message(mut self, message: impl Into<String>) -> Self {
        self.exit_message = message.into();
        self
    }

    pub fn build(self) -> Menu {
        let mut items: Vec<MenuItem> = self
            .items
            .into_iter()
            .map(|(name, mode)| MenuItem { name, mode, exit: false })
            .collect();
        items.push(MenuItem {
            name: "Exit".to_string(),
            mode: Rc::new(ExitMode { message: self.exit_message }),
            exit: true,
        });
        Menu { title: self.title, items }
    }
}

/// A fixed list of items; the exit item is always present and always last.
pub struct Menu {
    title: String,
    items: Vec<MenuItem>,
}

impl Menu {
    pub fn builder(title: impl Into<String>) -> MenuBuilder {
        MenuBuilder { title: title.into(), items: Vec::new(), exit_message: DEFAULT_EXIT_MESSAGE.to_string() }
    }

    pub fn items(&self) -> &[MenuItem] {
        &self.items
    }

    /// Zero-based position of `item`, as typed by the user.
    pub fn identifier_of(&self, item: &MenuItem) -> Option<String> {
        self.items.iter().position(|i| std::ptr::eq(i, item)).map(|i| i.to_string())
    }

    pub fn string_representation_of(&self, item: &MenuItem) -> Option<String> {
        self.identifier_of(item).map(|id| format!("{}{}{}", id, SEPARATOR, item.name))
    }

    pub fn resolve(&self, identifier: &str) -> Option<&MenuItem> {
        identifier.trim().parse::<usize>().ok().and_then(|i| self.items.get(i))
    }

    /// Show the menu and start chosen modes until the exit item is picked.
    pub fn run(&self, nav: &mut Navigator<'_>) -> Result<()> {
        loop {
            nav.heading(&self.title)?;
            for item in &self.items {
                if let Some(line) = self.string_representation_of(item) {
                    nav.println(&line)?;
                }
            }
            let answer = nav.prompt_user(MENU_PROMPT)?;
            match self.resolve(&answer) {
                Some(item) => {
                    item.start(nav)?;
                    if item.is_exit() {
                        return Ok(());
                    }
                }
                None => nav.println_styled(UNKNOWN_OPTION, Tone::Error)?,
            }
        }
    }
}

impl Mode for Menu {
    fn start(&self, nav: &mut Navigator<'_>) -> Result<()> {
        self.run(nav)
    }
}
