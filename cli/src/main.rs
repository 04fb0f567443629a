mod listing;
mod tui;

use std::fs::{self, OpenOptions};
use std::path::PathBuf;
use std::sync::Mutex;

use anyhow::{anyhow, Context, Result};
use clap::Parser;
use todolist_core::config::DATA_DIR_ENV;
use todolist_core::{
    convert_length, parse_form, Config, LengthUnit, SqliteTaskRepository, TaskService,
};
use tracing::debug;
use tracing_subscriber::EnvFilter;

const LOG_ENV: &str = "TODOLIST_LOG";
const LOG_FILE_NAME: &str = "todolist.log";

#[derive(Parser)]
#[command(name = "todolist")]
#[command(about = "A to-do list kept in a local SQLite file", long_about = None)]
struct Cli {
    /// Directory holding tasks.db (default: ~/.todolist)
    #[arg(long, global = true, env = DATA_DIR_ENV)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(clap::Subcommand)]
enum Commands {
    /// Add a new task (usage: add Buy milk desc:two_litres due:tom dur:15m)
    Add {
        /// Title words followed by optional key:value fields
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        args: Vec<String>,
    },
    /// List all tasks
    List {
        /// Print the tasks as JSON
        #[arg(long)]
        json: bool,
    },
    /// Toggle the done flag of the task at POSITION (as shown by `list`)
    Done { position: usize },
    /// Delete the task at POSITION (as shown by `list`)
    Delete { position: usize },
    /// Open the Terminal User Interface
    Tui,
    /// Convert a length between m, km, cm, mm, in and ft
    Convert {
        #[arg(allow_negative_numbers = true)]
        value: f64,
        from: String,
        to: String,
    },
}

fn init_logging(config: &Config, to_file: bool) -> Result<()> {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
    let builder = tracing_subscriber::fmt().with_env_filter(filter).with_target(false);

    if to_file {
        // stderr would draw over the TUI.
        fs::create_dir_all(&config.data_dir)?;
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(config.data_dir.join(LOG_FILE_NAME))?;
        builder.with_ansi(false).with_writer(Mutex::new(file)).init();
    } else {
        builder.with_writer(std::io::stderr).init();
    }
    Ok(())
}

fn open_service(config: &Config) -> Result<TaskService<SqliteTaskRepository>> {
    let repo = SqliteTaskRepository::from_config(config).with_context(|| {
        format!("Could not open task store in {}", config.data_dir.display())
    })?;
    Ok(TaskService::load(repo)?)
}

/// Maps a 1-based position from the command line onto the list.
fn list_index(position: usize, len: usize) -> Result<usize> {
    if position == 0 || position > len {
        return Err(anyhow!(
            "No task at position {} ({} tasks listed)",
            position,
            len
        ));
    }
    Ok(position - 1)
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = Config::new(cli.data_dir)?;
    let command = cli.command.unwrap_or(Commands::Tui);

    init_logging(&config, matches!(command, Commands::Tui))?;
    debug!(data_dir = %config.data_dir.display(), "using data directory");

    match command {
        Commands::Add { args } => {
            let draft = parse_form(&args)?;
            let title = draft.title.clone();
            let deadline = draft.deadline.clone();
            let duration = draft.duration.clone();

            let mut service = open_service(&config)?;
            let id = service.create_task(draft)?;

            println!("Task added: {} (ID: {})", title, id);
            if !deadline.is_empty() {
                println!("  Deadline: {}", deadline);
            }
            if !duration.is_empty() {
                println!("  Duration: {}", duration);
            }
        }
        Commands::List { json } => {
            let service = open_service(&config)?;
            let tasks = service.tasks().as_slice();
            if json {
                println!("{}", serde_json::to_string_pretty(tasks)?);
            } else {
                listing::show_tasks(tasks);
            }
        }
        Commands::Done { position } => {
            let mut service = open_service(&config)?;
            let index = list_index(position, service.tasks().len())?;
            let is_done = service.toggle_done_at(index)?;
            let title = service
                .tasks()
                .get(index)
                .map(|t| t.title.clone())
                .unwrap_or_default();
            let state = if is_done { "done" } else { "not done" };
            println!("Marked '{}' as {}", title, state);
        }
        Commands::Delete { position } => {
            let mut service = open_service(&config)?;
            let index = list_index(position, service.tasks().len())?;
            let removed = service.delete_at(index)?;
            println!("Deleted '{}'", removed.title);
        }
        Commands::Tui => {
            let service = open_service(&config)?;
            tui::run(service)?;
        }
        Commands::Convert { value, from, to } => {
            let from: LengthUnit = from.parse()?;
            let to: LengthUnit = to.parse()?;
            println!("{} {} = {} {}", value, from, convert_length(value, from, to), to);
        }
    }
    Ok(())
}
