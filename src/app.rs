//! The application menu and the summary screen.

use chrono::Local;

use crate::console::menu::{CompositeMode, Menu, ViewSession};
use crate::console::view::{StaticView, ViewHandle};
use crate::db::{format_status, Store};
use crate::error::Result;
use crate::fields::Status;
use crate::views::labels::LabelListView;
use crate::views::shared::quit_producer;
use crate::views::tasks::{create_task_view, TaskListView};

pub const EXIT_MESSAGE: &str = "Goodbye.";

/// Counts per status, overdue tasks and labels, built from the current data.
pub fn summary_view(store: &Store) -> Result<ViewHandle> {
    let today = Local::now().date_naive();
    let lines: Vec<String> = store.read(|db| {
        let mut lines: Vec<String> = [Status::Open, Status::InProgress, Status::Done]
            .into_iter()
            .map(|s| {
                let n = db.tasks.iter().filter(|t| t.status == s).count();
                format!("{:<11} {}", format_status(s), n)
            })
            .collect();
        let overdue = db
            .tasks
            .iter()
            .filter(|t| t.status != Status::Done && t.due.is_some_and(|d| d < today))
            .count();
        lines.push(format!("{:<11} {}", "Overdue", overdue));
        lines.push(format!("{:<11} {}", "Labels", db.labels.len()));
        lines
    });
    let view = ViewHandle::new(StaticView::new("Summary", lines));
    view.add_action(&quit_producer()?)?;
    Ok(view)
}

pub fn main_menu(store: &Store) -> Menu {
    let tasks = store.clone();
    let labels = store.clone();
    let quick = store.clone();
    let after_quick = store.clone();
    let summary = store.clone();
    Menu::builder("taskdeck")
        .item("Tasks", ViewSession::new(move || Ok(TaskListView::handle(tasks.clone()))))
        .item("Labels", ViewSession::new(move || LabelListView::handle(labels.clone())))
        .item(
            "Quick add",
            CompositeMode::new(ViewSession::new(move || create_task_view(quick.clone())))
                .with_parent(ViewSession::new(move || summary_view(&after_quick))),
        )
        .item("Summary", ViewSession::new(move || summary_view(&summary)))
        .exit_message(EXIT_MESSAGE)
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::console::io::ScriptedConsole;
    use crate::console::navigator::Navigator;
    use crate::error::ConsoleError;

    fn store() -> (tempfile::TempDir, Store) {
        let dir = tempfile::tempdir().unwrap();
        let store = Store::open(&dir.path().join("tasks.json"));
        (dir, store)
    }

    #[test]
    fn test_menu_lists_items_with_exit_last() {
        let (_dir, store) = store();
        let menu = main_menu(&store);
        let lines: Vec<String> =
            menu.items().iter().filter_map(|i| menu.string_representation_of(i)).collect();
        assert_eq!(lines, ["0) Tasks", "1) Labels", "2) Quick add", "3) Summary", "4) Exit"]);
    }

    #[test]
    fn test_quick_add_then_summary_then_exit() {
        let (_dir, store) = store();
        let menu = main_menu(&store);
        let mut console = ScriptedConsole::new(["2", "t", "Call bank", "s", "q", "q", "4"]);
        menu.run(&mut Navigator::new(&mut console)).unwrap();

        assert_eq!(store.read(|db| db.tasks.len()), 1);
        let transcript = console.transcript();
        let summary_at = transcript.iter().position(|l| l == "Summary").unwrap();
        assert_eq!(transcript[summary_at + 2], "Open        1");
        assert_eq!(transcript.last().map(String::as_str), Some(EXIT_MESSAGE));
    }

    #[test]
    fn test_data_survives_a_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tasks.json");
        let store = Store::open(&path);
        let mut console = ScriptedConsole::new(["1", "n", "n", "errands", "s", "q"]);
        let err = main_menu(&store).run(&mut Navigator::new(&mut console)).unwrap_err();
        assert!(matches!(err, ConsoleError::InputClosed));

        let reopened = Store::open(&path);
        assert!(reopened.read(|db| db.label("errands").is_some()));
    }
}
