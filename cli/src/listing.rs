use tabled::settings::object::Rows;
use tabled::settings::{Color, Modify, Style};
use tabled::{Table, Tabled};
use todolist_core::Task;

// Helper struct for Table Row
#[derive(Tabled)]
struct TaskRow {
    #[tabled(rename = "#")]
    position: usize,
    #[tabled(rename = "Done")]
    done: &'static str,
    #[tabled(rename = "Title")]
    title: String,
    #[tabled(rename = "Deadline")]
    deadline: String,
    #[tabled(rename = "Duration")]
    duration: String,
    #[tabled(rename = "Description")]
    description: String,
}

fn or_dash(value: &str) -> String {
    if value.is_empty() {
        "-".to_string()
    } else {
        value.to_string()
    }
}

fn rows(tasks: &[Task]) -> Vec<TaskRow> {
    tasks
        .iter()
        .enumerate()
        .map(|(i, task)| TaskRow {
            // Positions are shown 1-based, as `done` and `delete` expect them.
            position: i + 1,
            done: if task.is_done { "✔" } else { "☐" },
            title: task.title.clone(),
            deadline: or_dash(&task.deadline),
            duration: or_dash(&task.duration),
            description: task.description.clone(),
        })
        .collect()
}

pub fn show_tasks(tasks: &[Task]) {
    if tasks.is_empty() {
        println!("No tasks found.");
        return;
    }

    let mut table = Table::new(rows(tasks));
    table
        .with(Style::modern())
        .with(Modify::new(Rows::first()).with(Color::FG_CYAN)); // Header color

    println!("{}", table);
}
