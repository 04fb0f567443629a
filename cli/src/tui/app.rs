use ratatui::widgets::TableState;
use todolist_core::{parse_form_line, ListChange, SqliteTaskRepository, Task, TaskService};

pub enum InputMode {
    Normal,
    Adding,
}

pub struct App {
    pub service: TaskService<SqliteTaskRepository>,
    pub state: TableState,
    pub input: String,
    pub input_mode: InputMode,
    pub cursor_position: usize,
    /// Last error or confirmation, shown in the footer.
    pub status: Option<String>,
}

impl App {
    pub fn new(mut service: TaskService<SqliteTaskRepository>) -> App {
        // The initial load is already on screen.
        service.drain_changes();

        let mut state = TableState::default();
        if !service.tasks().is_empty() {
            state.select(Some(0));
        }
        App {
            service,
            state,
            input: String::new(),
            input_mode: InputMode::Normal,
            cursor_position: 0,
            status: None,
        }
    }

    pub fn tasks(&self) -> &[Task] {
        self.service.tasks().as_slice()
    }

    pub fn selected_task(&self) -> Option<&Task> {
        self.state.selected().and_then(|i| self.service.tasks().get(i))
    }

    pub fn next(&mut self) {
        let len = self.service.tasks().len();
        if len == 0 { return; }

        let i = match self.state.selected() {
            Some(i) => {
                if i >= len - 1 {
                    0
                } else {
                    i + 1
                }
            }
            None => 0,
        };
        self.state.select(Some(i));
    }

    pub fn previous(&mut self) {
        let len = self.service.tasks().len();
        if len == 0 { return; }

        let i = match self.state.selected() {
            Some(i) => {
                if i == 0 {
                    len - 1
                } else {
                    i - 1
                }
            }
            None => 0,
        };
        self.state.select(Some(i));
    }

    pub fn toggle_done(&mut self) {
        if let Some(i) = self.state.selected() {
            match self.service.toggle_done_at(i) {
                Ok(_) => self.status = None,
                Err(e) => self.status = Some(format!("Could not update task: {}", e)),
            }
            self.apply_changes();
        }
    }

    pub fn delete_task(&mut self) {
        if let Some(i) = self.state.selected() {
            match self.service.delete_at(i) {
                Ok(task) => self.status = Some(format!("Deleted '{}'", task.title)),
                Err(e) => self.status = Some(format!("Could not delete task: {}", e)),
            }
            self.apply_changes();
        }
    }

    pub fn reload(&mut self) {
        if let Err(e) = self.service.resync() {
            self.status = Some(format!("Could not reload tasks: {}", e));
        }
        self.apply_changes();
    }

    /// Moves the selection along with the list changes since the last draw.
    fn apply_changes(&mut self) {
        for change in self.service.drain_changes() {
            let len = self.service.tasks().len();
            match change {
                ListChange::Inserted(i) => self.state.select(Some(i)),
                ListChange::Removed(i) => {
                    if len == 0 {
                        self.state.select(None);
                    } else {
                        self.state.select(Some(i.min(len - 1)));
                    }
                }
                ListChange::Changed(_) => {}
                ListChange::Reset => {
                    let selected = match self.state.selected() {
                        _ if len == 0 => None,
                        Some(i) => Some(i.min(len - 1)),
                        None => Some(0),
                    };
                    self.state.select(selected);
                }
            }
        }
    }

    pub fn enter_add_mode(&mut self) {
        self.input_mode = InputMode::Adding;
        self.input.clear();
        self.cursor_position = 0;
    }

    pub fn exit_input_mode(&mut self) {
        self.input_mode = InputMode::Normal;
    }

    pub fn input_char(&mut self, c: char) {
        let byte_index = self.cursor_byte_index();
        self.input.insert(byte_index, c);
        self.cursor_position += 1;
    }

    pub fn delete_char(&mut self) {
        if self.cursor_position > 0 {
            let byte_index: usize = self.input.chars().take(self.cursor_position - 1).map(|c| c.len_utf8()).sum();
            self.input.remove(byte_index);
            self.cursor_position -= 1;
        }
    }

    pub fn move_cursor_left(&mut self) {
        if self.cursor_position > 0 {
            self.cursor_position -= 1;
        }
    }

    pub fn move_cursor_right(&mut self) {
        if self.cursor_position < self.input.chars().count() {
            self.cursor_position += 1;
        }
    }

    pub fn cursor_byte_index(&self) -> usize {
        self.input.chars().take(self.cursor_position).map(|c| c.len_utf8()).sum()
    }

    pub fn submit_command(&mut self) {
        if let InputMode::Adding = self.input_mode {
            self.submit_add();
        }

        self.input.clear();
        self.cursor_position = 0;
        self.exit_input_mode();
    }

    fn submit_add(&mut self) {
        let draft = match parse_form_line(&self.input) {
            Ok(draft) => draft,
            Err(e) => {
                self.status = Some(e.to_string());
                return;
            }
        };

        match self.service.create_task(draft) {
            Ok(_) => self.status = None,
            Err(e) => self.status = Some(format!("Could not save task: {}", e)),
        }
        self.apply_changes();
    }
}
