//! Command implementations for the CLI interface.
//!
//! The interactive commands open a navigation session on the given console;
//! `list` and `completions` print straight to stdout.

use clap::Subcommand;
use clap_complete::{generate, Shell};

use crate::app::main_menu;
use crate::console::io::Console;
use crate::console::navigator::Navigator;
use crate::db::*;
use crate::error::Result;
use crate::fields::Status;
use crate::task::Task;
use crate::views::labels::LabelListView;
use crate::views::tasks::TaskListView;

#[derive(Subcommand)]
pub enum Commands {
    /// Open the main menu.
    Menu,

    /// Go straight to the task list.
    Tasks,

    /// Go straight to the label list.
    Labels,

    /// Print tasks as a table.
    List {
        /// Include completed tasks.
        #[arg(long)]
        all: bool,
        /// Filter by status.
        #[arg(long, value_enum)]
        status: Option<Status>,
        /// Filter by label.
        #[arg(long)]
        label: Option<String>,
    },

    /// Generate shell completions.
    Completions {
        /// Shell to generate completions for.
        #[arg(value_enum)]
        shell: Shell,
    },
}

pub fn cmd_menu(store: &Store, console: &mut dyn Console) -> Result<()> {
    main_menu(store).run(&mut Navigator::new(console))
}

pub fn cmd_tasks(store: &Store, console: &mut dyn Console) -> Result<()> {
    Navigator::new(console).render_view(TaskListView::handle(store.clone()))
}

pub fn cmd_labels(store: &Store, console: &mut dyn Console) -> Result<()> {
    Navigator::new(console).render_view(LabelListView::handle(store.clone())?)
}

/// Tasks matching the `list` filters, in storage order.
pub fn filter_tasks<'a>(db: &'a Database, all: bool, status: Option<Status>, label: Option<&str>) -> Vec<&'a Task> {
    let label = label.map(normalise_label);
    db.tasks
        .iter()
        .filter(|t| all || status.is_some() || t.status != Status::Done)
        .filter(|t| status.map_or(true, |s| t.status == s))
        .filter(|t| label.as_ref().map_or(true, |l| t.labels.contains(l)))
        .collect()
}

pub fn cmd_list(store: &Store, all: bool, status: Option<Status>, label: Option<String>) {
    store.read(|db| {
        let tasks = filter_tasks(db, all, status, label.as_deref());
        if tasks.is_empty() {
            println!("No tasks.");
        } else {
            print_table(&tasks);
        }
    });
}

/// Generate shell completions.
pub fn cmd_completions(shell: Shell) {
    use clap::CommandFactory;
    use crate::cli::Cli;

    let mut app = Cli::command();
    let app_name = app.get_name().to_string();
    generate(shell, &mut app, app_name, &mut std::io::stdout());
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::task::TaskInput;

    fn input(title: &str, labels: &[&str]) -> TaskInput {
        TaskInput {
            id: 0,
            title: title.into(),
            description: None,
            due: None,
            labels: labels.iter().map(|l| l.to_string()).collect(),
        }
    }

    #[test]
    fn test_filter_tasks_hides_done_unless_asked() {
        let mut db = Database::default();
        let a = db.add_task(input("a", &["home"]));
        let b = db.add_task(input("b", &[]));
        db.transition(b, Status::InProgress).unwrap();
        db.transition(b, Status::Done).unwrap();

        let ids = |tasks: Vec<&Task>| tasks.iter().map(|t| t.id).collect::<Vec<_>>();
        assert_eq!(ids(filter_tasks(&db, false, None, None)), [a]);
        assert_eq!(ids(filter_tasks(&db, true, None, None)), [a, b]);
        assert_eq!(ids(filter_tasks(&db, false, Some(Status::Done), None)), [b]);
        assert_eq!(ids(filter_tasks(&db, true, None, Some("Home"))), [a]);
    }
}
