//! Views that build a structured value field by field and submit it.
//!
//! The body of a [`CommandView`] is the live draft. Edit operations write one
//! field at a time and re-prompt until the field accepts the input. The submit
//! operation builds the draft; a validation failure comes back to the render
//! loop as a status line while every entered field stays as it was.

use std::cell::RefCell;
use std::rc::Rc;

use tracing::{debug, info};

use crate::console::action::{ActionProducer, CommandProducer, Transition};
use crate::console::edit::EditOperation;
use crate::console::io::Tone;
use crate::console::navigator::Navigator;
use crate::console::shortcut::Shortcut;
use crate::console::validation::ValidationError;
use crate::console::view::{View, ViewHandle};
use crate::error::Result;

/// A partially filled structured value.
pub trait Draft {
    type Value;

    /// Build the value, or report every violated field.
    fn build(&self) -> std::result::Result<Self::Value, ValidationError>;

    /// Put every user-entered field back to its default.
    fn reset(&mut self);

    /// Recompute generated identifiers. Runs before each render.
    fn refresh_identity(&mut self) {}
}

pub type SharedDraft<D> = Rc<RefCell<D>>;

type Formatter<D> = Box<dyn Fn(&D) -> Vec<String>>;

pub struct CommandView<D: Draft> {
    title: String,
    draft: SharedDraft<D>,
    format: Formatter<D>,
}

impl<D: Draft + 'static> CommandView<D> {
    pub fn builder(
        title: impl Into<String>,
        draft: SharedDraft<D>,
        format: impl Fn(&D) -> Vec<String> + 'static,
    ) -> CommandViewBuilder<D> {
        CommandViewBuilder {
            view: CommandView { title: title.into(), draft, format: Box::new(format) },
            edits: Vec::new(),
            submit: None,
            extra: Vec::new(),
        }
    }
}

impl<D: Draft + 'static> View for CommandView<D> {
    fn title(&self) -> String {
        self.title.clone()
    }

    fn before_render(&mut self, _this: &ViewHandle) -> Result<()> {
        self.draft.borrow_mut().refresh_identity();
        Ok(())
    }

    fn render_body(&mut self, nav: &mut Navigator<'_>) -> Result<()> {
        let lines = (self.format)(&self.draft.borrow());
        for line in lines.iter().filter(|l| !l.is_empty()) {
            nav.println(line)?;
        }
        Ok(())
    }
}

pub struct CommandViewBuilder<D: Draft> {
    view: CommandView<D>,
    edits: Vec<EditOperation<D>>,
    submit: Option<SubmitOperation<D>>,
    extra: Vec<Box<dyn ActionProducer>>,
}

impl<D: Draft + 'static> CommandViewBuilder<D> {
    pub fn edit(mut self, op: EditOperation<D>) -> Self {
        self.edits.push(op);
        self
    }

    pub fn submit(mut self, op: SubmitOperation<D>) -> Self {
        self.submit = Some(op);
        self
    }

    /// Any other action, listed after the edits and the submit action.
    pub fn action(mut self, producer: impl ActionProducer + 'static) -> Self {
        self.extra.push(Box::new(producer));
        self
    }

    pub fn build(self) -> Result<ViewHandle> {
        let draft = self.view.draft.clone();
        let handle = ViewHandle::new(self.view);
        for op in self.edits {
            handle.add_action(&op.producer(draft.clone()))?;
        }
        if let Some(submit) = self.submit {
            handle.add_action(&submit.producer(draft))?;
        }
        for producer in &self.extra {
            handle.add_action(producer.as_ref())?;
        }
        Ok(handle)
    }
}

/// Where to go after a successful submit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AfterSubmit {
    /// Show the same view again with a cleared draft.
    Stay,
    Back,
}

type Post<V> = Rc<dyn Fn(V) -> Result<()>>;

/// Builds the draft and hands the value to `post`.
pub struct SubmitOperation<D: Draft> {
    name: String,
    shortcut: Shortcut,
    post: Post<D::Value>,
    after: AfterSubmit,
    notice: Option<String>,
}

impl<D: Draft + 'static> SubmitOperation<D> {
    pub fn new(
        name: impl Into<String>,
        shortcut: Shortcut,
        post: impl Fn(D::Value) -> Result<()> + 'static,
    ) -> Self {
        SubmitOperation {
            name: name.into(),
            shortcut,
            post: Rc::new(post),
            after: AfterSubmit::Stay,
            notice: None,
        }
    }

    pub fn then(mut self, after: AfterSubmit) -> Self {
        self.after = after;
        self
    }

    /// Status line shown on the next render after a successful post.
    pub fn notice(mut self, message: impl Into<String>) -> Self {
        self.notice = Some(message.into());
        self
    }

    fn producer(self, draft: SharedDraft<D>) -> CommandProducer {
        let SubmitOperation { name, shortcut, post, after, notice } = self;
        CommandProducer::new(name, shortcut, move |nav| {
            let value = draft.borrow().build()?;
            post(value)?;
            draft.borrow_mut().reset();
            info!("draft submitted");
            if let Some(message) = &notice {
                nav.set_status(message.clone(), Tone::Notice);
            }
            debug!(?after, "after submit");
            Ok(match after {
                AfterSubmit::Stay => Transition::Stay,
                AfterSubmit::Back => Transition::Back,
            })
        })
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use super::*;
    use crate::console::io::ScriptedConsole;
    use crate::console::validation::Violations;
    use crate::error::ConsoleError;

    #[derive(Debug, Default)]
    struct PairDraft {
        a: Option<String>,
        b: Option<String>,
        serial: u32,
    }

    #[derive(Debug, Clone, PartialEq)]
    struct Pair {
        a: String,
        b: String,
    }

    impl PairDraft {
        fn set(field: &'static str) -> impl Fn(&mut PairDraft, &str) -> std::result::Result<(), ValidationError> {
            move |draft: &mut PairDraft, input: &str| {
                let input = input.trim();
                if input.is_empty() || input.contains(' ') {
                    return Err(ValidationError::field(field, "must be a single word"));
                }
                match field {
                    "a" => draft.a = Some(input.to_string()),
                    _ => draft.b = Some(input.to_string()),
                }
                Ok(())
            }
        }
    }

    impl Draft for PairDraft {
        type Value = Pair;

        fn build(&self) -> std::result::Result<Pair, ValidationError> {
            let mut v = Violations::new();
            if self.a.is_none() {
                v.push("a", "is required");
            }
            if self.b.is_none() {
                v.push("b", "is required");
            }
            v.finish(|| Pair {
                a: self.a.clone().unwrap_or_default(),
                b: self.b.clone().unwrap_or_default(),
            })
        }

        fn reset(&mut self) {
            self.a = None;
            self.b = None;
        }

        fn refresh_identity(&mut self) {
            self.serial += 1;
        }
    }

    fn pair_lines(d: &PairDraft) -> Vec<String> {
        vec![
            format!("Draft #{}", d.serial),
            format!("a: {}", d.a.as_deref().unwrap_or("-")),
            format!("b: {}", d.b.as_deref().unwrap_or("-")),
        ]
    }

    fn pair_view(draft: SharedDraft<PairDraft>, posted: Rc<RefCell<Vec<Pair>>>) -> ViewHandle {
        CommandView::builder("Pair", draft, pair_lines)
            .edit(EditOperation::new("Set a", Shortcut::new("a").unwrap(), "a: ", PairDraft::set("a")))
            .edit(EditOperation::new("Set b", Shortcut::new("e").unwrap(), "b: ", PairDraft::set("b")))
            .submit(
                SubmitOperation::new("Save", Shortcut::new("s").unwrap(), move |pair| {
                    posted.borrow_mut().push(pair);
                    Ok(())
                })
                .notice("Saved."),
            )
            .action(CommandProducer::new("Quit", Shortcut::new("q").unwrap(), |_| Ok(Transition::Exit)))
            .build()
            .unwrap()
    }

    #[test]
    fn test_invalid_field_keeps_other_fields_and_reports_once() {
        let draft = Rc::new(RefCell::new(PairDraft::default()));
        let posted = Rc::new(RefCell::new(Vec::new()));
        let view = pair_view(draft.clone(), posted.clone());

        let mut console = ScriptedConsole::new(["a", "x", "e", "two words", "y", "q"]);
        Navigator::new(&mut console).render_view(view).unwrap();

        assert_eq!(draft.borrow().a.as_deref(), Some("x"));
        assert_eq!(draft.borrow().b.as_deref(), Some("y"));
        let errors: Vec<&String> = console.transcript().iter().filter(|l| l.starts_with("Invalid")).collect();
        assert_eq!(errors, ["Invalid b: must be a single word"]);
        assert!(posted.borrow().is_empty());
    }

    #[test]
    fn test_failed_build_rerenders_with_draft_intact() {
        let draft = Rc::new(RefCell::new(PairDraft::default()));
        let posted = Rc::new(RefCell::new(Vec::new()));
        let view = pair_view(draft.clone(), posted.clone());

        let mut console = ScriptedConsole::new(["a", "x", "s", "q"]);
        Navigator::new(&mut console).render_view(view).unwrap();

        let lines = console.transcript();
        let error_at = lines.iter().position(|l| l == "Invalid b: is required").unwrap();
        // The re-rendered body still shows the entered field just above the error.
        assert_eq!(lines[error_at - 2], "a: x");
        assert_eq!(lines[error_at - 1], "b: -");
        assert!(posted.borrow().is_empty());
        assert_eq!(draft.borrow().a.as_deref(), Some("x"));
    }

    #[test]
    fn test_successful_build_posts_once_and_resets() {
        let draft = Rc::new(RefCell::new(PairDraft::default()));
        let posted = Rc::new(RefCell::new(Vec::new()));
        let view = pair_view(draft.clone(), posted.clone());

        let mut console = ScriptedConsole::new(["a", "x", "e", "y", "s", "q"]);
        Navigator::new(&mut console).render_view(view).unwrap();

        assert_eq!(*posted.borrow(), [Pair { a: "x".into(), b: "y".into() }]);
        assert!(draft.borrow().a.is_none());
        assert!(draft.borrow().b.is_none());

        let lines = console.transcript();
        let saved_at = lines.iter().position(|l| l == "Saved.").unwrap();
        assert_eq!(lines[saved_at - 2], "a: -");
        assert_eq!(lines[saved_at - 1], "b: -");
    }

    #[test]
    fn test_identity_is_refreshed_on_every_render() {
        let draft = Rc::new(RefCell::new(PairDraft::default()));
        let view = pair_view(draft.clone(), Rc::new(RefCell::new(Vec::new())));

        let mut console = ScriptedConsole::new(["a", "x", "q"]);
        Navigator::new(&mut console).render_view(view).unwrap();

        assert_eq!(draft.borrow().serial, 2);
        assert!(console.transcript().iter().any(|l| l == "Draft #2"));
    }

    #[test]
    fn test_post_failure_propagates() {
        let draft = Rc::new(RefCell::new(PairDraft {
            a: Some("x".into()),
            b: Some("y".into()),
            serial: 0,
        }));
        let calls = Rc::new(Cell::new(0));
        let counter = calls.clone();
        let view = CommandView::builder("Pair", draft.clone(), pair_lines)
            .submit(SubmitOperation::new("Save", Shortcut::new("s").unwrap(), move |_| {
                counter.set(counter.get() + 1);
                Err(ConsoleError::Io(std::io::Error::other("backend down")))
            }))
            .build()
            .unwrap();

        let mut console = ScriptedConsole::new(["s"]);
        let err = Navigator::new(&mut console).render_view(view).unwrap_err();
        assert!(matches!(err, ConsoleError::Io(_)));
        assert_eq!(calls.get(), 1);
        // Nothing was reset: the post never completed.
        assert_eq!(draft.borrow().a.as_deref(), Some("x"));
    }

    #[test]
    fn test_back_after_submit_leaves_the_form() {
        let draft = Rc::new(RefCell::new(PairDraft { a: Some("x".into()), b: Some("y".into()), serial: 0 }));
        let form = CommandView::builder("Pair", draft, pair_lines)
            .submit(SubmitOperation::new("Save", Shortcut::new("s").unwrap(), |_| Ok(())).then(AfterSubmit::Back))
            .build()
            .unwrap();
        let home = crate::console::view::StaticView::handle("Home", &[]);
        home.add_action(&crate::console::action::TransitionProducer::new("Form", Shortcut::new("f").unwrap(), form))
            .unwrap();
        home.add_action(&CommandProducer::new("Quit", Shortcut::new("q").unwrap(), |_| Ok(Transition::Exit)))
            .unwrap();

        let mut console = ScriptedConsole::new(["f", "s", "q"]);
        Navigator::new(&mut console).render_view(home).unwrap();
        let homes = console.transcript().iter().filter(|l| *l == "Home").count();
        assert_eq!(homes, 2);
    }
}
