//! Task list, task detail and the task forms.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use chrono::Local;
use tracing::info;

use crate::console::action::{CommandProducer, Transition, TransitionProducer};
use crate::console::command_view::{AfterSubmit, CommandView, CommandViewBuilder, SubmitOperation};
use crate::console::edit::EditOperation;
use crate::console::io::Tone;
use crate::console::navigator::Navigator;
use crate::console::shortcut::Shortcut;
use crate::console::validation::ValidationError;
use crate::console::view::{StaticView, View, ViewHandle};
use crate::db::{format_due_relative, format_status, table_lines, truncate, Store};
use crate::error::Result;
use crate::fields::Status;
use crate::forms::task_form::{format_task_draft, TaskDraft};
use crate::task::{Task, TaskInput};
use crate::views::shared::quit_producer;

/// Open tasks, one action per task.
pub struct TaskListView {
    store: Store,
    show_done: Rc<Cell<bool>>,
}

impl TaskListView {
    pub fn handle(store: Store) -> ViewHandle {
        ViewHandle::new(TaskListView { store, show_done: Rc::new(Cell::new(false)) })
    }

    fn visible(&self) -> Vec<Task> {
        let show_done = self.show_done.get();
        self.store.read(|db| {
            db.tasks
                .iter()
                .filter(|t| show_done || t.status != Status::Done)
                .cloned()
                .collect()
        })
    }
}

impl View for TaskListView {
    fn title(&self) -> String {
        "Tasks".to_string()
    }

    // The task set changes between renders, so the actions are rebuilt each time.
    fn before_render(&mut self, this: &ViewHandle) -> Result<()> {
        this.clear_actions();

        let store = self.store.clone();
        this.add_action(&TransitionProducer::with_factory("New task", Shortcut::new("n")?, move || {
            create_task_view(store.clone())
        }))?;

        for task in self.visible() {
            let store = self.store.clone();
            let id = task.id;
            // Hand-edited files may carry blank titles.
            let name = match task.title.trim() {
                "" => format!("Task #{}", id),
                title => truncate(title, 40),
            };
            this.add_action(&TransitionProducer::with_factory(
                name,
                Shortcut::from(id),
                move || Ok(TaskDetailView::handle(store.clone(), id)),
            ))?;
        }

        let show_done = self.show_done.clone();
        let toggle = if show_done.get() { "Hide done tasks" } else { "Show done tasks" };
        this.add_action(&CommandProducer::new(toggle, Shortcut::new("a")?, move |_| {
            show_done.set(!show_done.get());
            Ok(Transition::Stay)
        }))?;

        this.add_action(&quit_producer()?)
    }

    fn render_body(&mut self, nav: &mut Navigator<'_>) -> Result<()> {
        let tasks = self.visible();
        if tasks.is_empty() {
            let message = if self.show_done.get() { "No tasks yet." } else { "No open tasks." };
            return nav.println(message);
        }
        let refs: Vec<&Task> = tasks.iter().collect();
        for line in table_lines(&refs, Local::now().date_naive()) {
            nav.println(&line)?;
        }
        Ok(())
    }
}

fn status_verb(to: Status) -> (&'static str, &'static str) {
    match to {
        Status::InProgress => ("Start", "s"),
        Status::Done => ("Mark done", "d"),
        Status::Open => ("Reopen", "o"),
    }
}

/// One task with its status transitions.
pub struct TaskDetailView {
    store: Store,
    id: u64,
}

impl TaskDetailView {
    pub fn handle(store: Store, id: u64) -> ViewHandle {
        ViewHandle::new(TaskDetailView { store, id })
    }

    fn task(&self) -> Option<Task> {
        self.store.read(|db| db.get(self.id).cloned())
    }
}

impl View for TaskDetailView {
    fn title(&self) -> String {
        format!("Task #{}", self.id)
    }

    fn before_render(&mut self, this: &ViewHandle) -> Result<()> {
        this.clear_actions();
        let Some(task) = self.task() else {
            return this.add_action(&quit_producer()?);
        };

        for &to in task.status.next_allowed() {
            let (name, key) = status_verb(to);
            let store = self.store.clone();
            let id = self.id;
            this.add_action(&CommandProducer::new(name, Shortcut::new(key)?, move |nav| {
                match store.update(|db| db.transition(id, to))? {
                    Ok(from) => {
                        info!(task = id, from = ?from, to = ?to, "status changed");
                        nav.set_status(format!("{} -> {}", format_status(from), format_status(to)), Tone::Notice);
                    }
                    Err(message) => nav.set_status(message, Tone::Error),
                }
                Ok(Transition::Stay)
            }))?;
        }

        let store = self.store.clone();
        let id = self.id;
        this.add_action(&TransitionProducer::with_factory("Edit", Shortcut::new("e")?, move || {
            edit_task_view(store.clone(), id)
        }))?;

        let store = self.store.clone();
        this.add_action(&CommandProducer::new("Delete", Shortcut::new("x")?, move |nav| {
            if store.update(|db| db.remove_task(id))?.is_some() {
                info!(task = id, "task deleted");
                nav.set_status(format!("Deleted task #{}.", id), Tone::Notice);
            }
            Ok(Transition::Back)
        }))?;

        this.add_action(&quit_producer()?)
    }

    fn render_body(&mut self, nav: &mut Navigator<'_>) -> Result<()> {
        let Some(task) = self.task() else {
            return nav.println(&format!("Task #{} no longer exists.", self.id));
        };
        let today = Local::now().date_naive();
        let labels = if task.labels.is_empty() { "-".to_string() } else { task.labels.join(", ") };
        nav.println(&format!("Title:       {}", task.title))?;
        nav.println(&format!("Status:      {}", format_status(task.status)))?;
        nav.println(&format!(
            "Due:         {} ({})",
            task.due.map(|d| d.to_string()).unwrap_or_else(|| "-".into()),
            format_due_relative(task.due, today)
        ))?;
        nav.println(&format!("Labels:      {}", labels))?;
        nav.println(&format!("Description: {}", task.description.as_deref().unwrap_or("-")))
    }
}

fn task_edits(builder: CommandViewBuilder<TaskDraft>) -> Result<CommandViewBuilder<TaskDraft>> {
    Ok(builder
        .edit(EditOperation::new("Set title", Shortcut::new("t")?, "Title: ", TaskDraft::set_title))
        .edit(EditOperation::new(
            "Set description",
            Shortcut::new("d")?,
            "Description (empty clears): ",
            TaskDraft::set_description,
        ))
        .edit(EditOperation::new(
            "Set due date",
            Shortcut::new("u")?,
            "Due (YYYY-MM-DD, today, in 3d, friday; empty clears): ",
            TaskDraft::set_due,
        ))
        .edit(EditOperation::new(
            "Set labels",
            Shortcut::new("l")?,
            "Labels (comma-separated; empty clears): ",
            TaskDraft::set_labels,
        )))
}

/// Form for a new task. Saving keeps the form open with a cleared draft.
pub fn create_task_view(store: Store) -> Result<ViewHandle> {
    let draft = Rc::new(RefCell::new(TaskDraft::new(store.clone())));
    task_edits(CommandView::builder("New task", draft, format_task_draft))?
        .submit(
            SubmitOperation::new("Save", Shortcut::new("s")?, move |input: TaskInput| {
                let id = store.update(|db| db.add_task(input))?;
                info!(task = id, "task created");
                Ok(())
            })
            .notice("Task saved."),
        )
        .action(quit_producer()?)
        .build()
}

/// Form pre-filled from task `id`. Saving goes back to where it was opened.
pub fn edit_task_view(store: Store, id: u64) -> Result<ViewHandle> {
    let Some(task) = store.read(|db| db.get(id).cloned()) else {
        return Ok(StaticView::handle("Edit task", &["That task no longer exists."]));
    };
    let draft = Rc::new(RefCell::new(TaskDraft::from_task(store.clone(), &task)));
    task_edits(CommandView::builder(format!("Edit task #{}", id), draft, format_task_draft))?
        .submit(
            SubmitOperation::new("Save", Shortcut::new("s")?, move |input: TaskInput| {
                store
                    .update(|db| db.update_task(input))?
                    .map_err(|message| ValidationError::field("id", message))?;
                info!(task = id, "task updated");
                Ok(())
            })
            .then(AfterSubmit::Back)
            .notice("Task updated."),
        )
        .action(quit_producer()?)
        .build()
}
