use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Position, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, BorderType, Paragraph, Row, Table, Wrap},
    Frame,
};
use unicode_width::UnicodeWidthStr;

use crate::tui::app::{App, InputMode};

pub fn draw(f: &mut Frame, app: &mut App) {
    let size = f.area();
    let footer_height = match app.input_mode {
        InputMode::Adding => 3,
        InputMode::Normal => 1,
    };

    // Header and Main Content Split
    let main_chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(0)
        .constraints([
            Constraint::Length(3),             // Header
            Constraint::Min(1),                // Content
            Constraint::Length(footer_height), // Footer/Help or form
        ])
        .split(size);

    // Header
    let header = Paragraph::new("TODO LIST")
        .style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL).border_type(BorderType::Rounded));
    f.render_widget(header, main_chunks[0]);

    // Split Content into Left (List) and Right (Detail)
    let content_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(50),
            Constraint::Percentage(50),
        ])
        .split(main_chunks[1]);

    draw_task_list(f, app, content_chunks[0]);
    draw_detail_view(f, app, content_chunks[1]);

    match app.input_mode {
        InputMode::Adding => draw_form(f, app, main_chunks[2]),
        InputMode::Normal => {
            let text = match &app.status {
                Some(status) => status.clone(),
                None => "j/k: Navigate | space: Done | a: Add | d: Delete | r: Reload | q: Quit".to_string(),
            };
            let footer = Paragraph::new(text)
                .style(Style::default().fg(Color::DarkGray))
                .alignment(Alignment::Center);
            f.render_widget(footer, main_chunks[2]);
        }
    }
}

fn draw_task_list(f: &mut Frame, app: &mut App, area: Rect) {
    let rows: Vec<Row> = app.service.tasks().iter().map(|task| {
        let status_icon = if task.is_done { "✔" } else { "☐" };
        let title_style = if task.is_done {
            Style::default().add_modifier(Modifier::CROSSED_OUT).fg(Color::DarkGray)
        } else {
            Style::default().add_modifier(Modifier::BOLD)
        };

        let deadline = if task.deadline.is_empty() { "-".to_string() } else { task.deadline.clone() };

        Row::new(vec![
            Span::raw(status_icon),
            Span::raw(deadline),
            Span::styled(task.title.clone(), title_style),
        ])
    }).collect();

    let table = Table::new(
        rows,
        [
            Constraint::Length(3),  // Status
            Constraint::Length(11), // Deadline
            Constraint::Min(10),    // Title
        ]
    )
    .header(Row::new(vec!["St", "Deadline", "Task"]).style(Style::default().fg(Color::Yellow)))
    .block(Block::default().title(" Tasks ").borders(Borders::ALL).border_type(BorderType::Rounded))
    .row_highlight_style(Style::default().bg(Color::DarkGray).add_modifier(Modifier::BOLD))
    .highlight_symbol(">> ");

    f.render_stateful_widget(table, area, &mut app.state);
}

fn draw_detail_view(f: &mut Frame, app: &App, area: Rect) {
    let block = Block::default().title(" Detail ").borders(Borders::ALL).border_type(BorderType::Rounded);

    let Some(task) = app.selected_task() else {
        f.render_widget(block, area);
        return;
    };

    let mut detail_text = vec![
        Line::from(vec![
            Span::styled("Title: ", Style::default().fg(Color::Blue)),
            Span::styled(task.title.as_str(), Style::default().add_modifier(Modifier::BOLD)),
        ]),
        Line::from(""),
        Line::from(vec![
            Span::styled("ID: ", Style::default().fg(Color::DarkGray)),
            Span::raw(task.id.to_string()),
        ]),
        Line::from(vec![
            Span::styled("Status: ", Style::default().fg(Color::Blue)),
            Span::raw(if task.is_done { "Done" } else { "Pending" }),
        ]),
        Line::from(vec![
            Span::styled("Deadline: ", Style::default().fg(Color::Blue)),
            Span::raw(if task.deadline.is_empty() { "None" } else { task.deadline.as_str() }),
        ]),
        Line::from(vec![
            Span::styled("Duration: ", Style::default().fg(Color::Blue)),
            Span::raw(if task.duration.is_empty() { "None" } else { task.duration.as_str() }),
        ]),
        Line::from(""),
    ];

    if !task.description.is_empty() {
        detail_text.push(Line::from(Span::styled("Description:", Style::default().fg(Color::Blue))));
        detail_text.push(Line::from(task.description.as_str()));
    }

    let detail_block = Paragraph::new(detail_text)
        .block(block)
        .wrap(Wrap { trim: true });
    f.render_widget(detail_block, area);
}

fn draw_form(f: &mut Frame, app: &App, area: Rect) {
    let form = Paragraph::new(app.input.as_str())
        .block(
            Block::default()
                .title(" New task: title desc:.. due:.. dur:.. (Enter: save, Esc: cancel) ")
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded),
        );
    f.render_widget(form, area);

    // Place the cursor after the typed text, measured in terminal columns.
    let typed = &app.input[..app.cursor_byte_index()];
    let x = area.x + 1 + UnicodeWidthStr::width(typed) as u16;
    f.set_cursor_position(Position::new(x, area.y + 1));
}
