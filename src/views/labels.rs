//! Label list and the new-label form.

use std::cell::RefCell;
use std::rc::Rc;

use tracing::info;

use crate::console::action::{CommandProducer, Transition, TransitionProducer};
use crate::console::command_view::{CommandView, SubmitOperation};
use crate::console::edit::EditOperation;
use crate::console::io::Tone;
use crate::console::navigator::Navigator;
use crate::console::shortcut::Shortcut;
use crate::console::validation::ValidationError;
use crate::console::view::{View, ViewHandle};
use crate::db::{normalise_label, Store};
use crate::error::Result;
use crate::forms::label_form::{format_label_draft, LabelDraft};
use crate::task::Label;
use crate::views::shared::quit_producer;

pub struct LabelListView {
    store: Store,
}

impl LabelListView {
    pub fn handle(store: Store) -> Result<ViewHandle> {
        let view = ViewHandle::new(LabelListView { store: store.clone() });

        let form_store = store.clone();
        view.add_action(&TransitionProducer::with_factory("New label", Shortcut::new("n")?, move || {
            create_label_view(form_store.clone())
        }))?;
        view.add_action(&CommandProducer::new("Delete label", Shortcut::new("x")?, move |nav| {
            let name = normalise_label(&nav.prompt_user("Label to delete: ")?);
            if !store.update(|db| db.remove_label(&name))? {
                return Err(ValidationError::field("name", format!("no label named '{}'", name)).into());
            }
            info!(label = %name, "label deleted");
            nav.set_status(format!("Deleted label '{}'.", name), Tone::Notice);
            Ok(Transition::Stay)
        }))?;
        view.add_action(&quit_producer()?)?;
        Ok(view)
    }
}

impl View for LabelListView {
    fn title(&self) -> String {
        "Labels".to_string()
    }

    fn render_body(&mut self, nav: &mut Navigator<'_>) -> Result<()> {
        let lines: Vec<String> = self.store.read(|db| {
            let usage = db.label_usage();
            db.labels
                .iter()
                .map(|l| {
                    format!(
                        "{:<20} {:<8} {} task(s)",
                        l.name,
                        l.color.as_deref().unwrap_or("-"),
                        usage.get(l.name.as_str()).copied().unwrap_or(0)
                    )
                })
                .collect()
        });
        if lines.is_empty() {
            return nav.println("No labels yet.");
        }
        for line in &lines {
            nav.println(line)?;
        }
        Ok(())
    }
}

/// Form for a new label. Saving keeps the form open with a cleared draft.
pub fn create_label_view(store: Store) -> Result<ViewHandle> {
    let draft = Rc::new(RefCell::new(LabelDraft::new(store.clone())));
    CommandView::builder("New label", draft, format_label_draft)
        .edit(EditOperation::new("Set name", Shortcut::new("n")?, "Name: ", LabelDraft::set_name))
        .edit(EditOperation::new(
            "Set color",
            Shortcut::new("c")?,
            "Color (#rrggbb; empty clears): ",
            LabelDraft::set_color,
        ))
        .submit(
            SubmitOperation::new("Save", Shortcut::new("s")?, move |label: Label| {
                let name = label.name.clone();
                store
                    .update(|db| db.add_label(label))?
                    .map_err(|message| ValidationError::field("name", message))?;
                info!(label = %name, "label created");
                Ok(())
            })
            .notice("Label saved."),
        )
        .action(quit_producer()?)
        .build()
}
