use crate::app::{App, TaskDetails};
use crate::due_date::format_due_date;
use crate::filter::CategoryFilter;
use crate::task::{attachment_name, Task, TaskStatus, ViewType};
use crate::view::section_title;
use chrono::NaiveDate;
use crossterm::{
    event::{self, Event, KeyEventKind},
    terminal::{disable_raw_mode, enable_raw_mode},
};
use ratatui::{
    backend::Backend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, Paragraph},
    Frame, Terminal,
};
use std::io;

pub async fn run_app<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> io::Result<()> {
    loop {
        let today = App::today();
        terminal.draw(|f| draw(f, app, today))?;

        if let Event::Key(key) = tokio::task::block_in_place(event::read)? {
            if key.kind != KeyEventKind::Press {
                continue;
            }
            let mut input = |message: &str| tokio::task::block_in_place(|| prompt(message));
            if app.handle_key(key.code, today, &mut input).await {
                return Ok(());
            }
        }
    }
}

fn draw(f: &mut Frame, app: &App, today: NaiveDate) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints(vec![
            Constraint::Length(3),
            Constraint::Min(5),
            Constraint::Length(1),
        ])
        .split(f.area());

    f.render_widget(header(app), rows[0]);
    match app.view.view {
        ViewType::List => draw_list(f, app, today, rows[1]),
        ViewType::Board => draw_board(f, app, today, rows[1]),
    }
    f.render_widget(footer(app), rows[2]);

    if let Some(details) = &app.details {
        draw_details(f, details);
    }
}

fn header(app: &App) -> Paragraph<'static> {
    let category = match &app.filter.category {
        CategoryFilter::All => "all".to_string(),
        CategoryFilter::Only(c) => c.clone(),
    };
    let view = match app.view.view {
        ViewType::List => "List",
        ViewType::Board => "Board",
    };
    let line = Line::from(vec![
        Span::styled("TaskBuddy ", Style::default().add_modifier(Modifier::BOLD)),
        Span::raw(format!("[{}]  ", view)),
        Span::raw(format!("Category: {}  ", category)),
        Span::raw(format!("Due: {}  ", app.filter.due_date.as_str())),
        Span::raw(format!("Search: {}", app.filter.search)),
    ]);
    Paragraph::new(line).block(Block::default().borders(Borders::ALL))
}

fn footer(app: &App) -> Paragraph<'static> {
    let text = match &app.notice {
        Some(notice) => Span::styled(notice.clone(), Style::default().fg(Color::Red)),
        None => Span::raw(
            "q quit  v view  a add  e edit  d delete  h details  space done  </> move  c category  f due  / search",
        ),
    };
    Paragraph::new(Line::from(text))
}

fn section_color(status: TaskStatus) -> Color {
    match status {
        TaskStatus::Todo => Color::Magenta,
        TaskStatus::InProgress => Color::Blue,
        TaskStatus::Completed => Color::Green,
        TaskStatus::None => Color::Gray,
    }
}

fn task_line(task: &Task, today: NaiveDate, with_category: bool, selected: bool) -> ListItem<'static> {
    let done = task.status == TaskStatus::Completed;
    let title_style = if done {
        Style::default()
            .fg(Color::DarkGray)
            .add_modifier(Modifier::CROSSED_OUT)
    } else {
        Style::default().fg(Color::White)
    };
    let mut spans = vec![
        Span::raw(if done { "[x] " } else { "[ ] " }),
        Span::styled(task.title.clone(), title_style),
        Span::raw(format!(" ({})", format_due_date(&task.due_date, today))),
    ];
    if with_category {
        let category = task.category.clone().unwrap_or_else(|| "No Category".to_string());
        spans.push(Span::styled(
            format!("  {}", category),
            Style::default().fg(Color::Gray),
        ));
    } else if let Some(category) = &task.category {
        spans.push(Span::styled(
            format!("  {}", category),
            Style::default().fg(Color::Gray),
        ));
    }
    let item = ListItem::new(Line::from(spans));
    if selected {
        item.style(Style::default().add_modifier(Modifier::REVERSED))
    } else {
        item
    }
}

fn draw_list(f: &mut Frame, app: &App, today: NaiveDate, area: Rect) {
    let mut items: Vec<ListItem> = Vec::new();
    for (i, status) in TaskStatus::COLUMNS.iter().enumerate() {
        let tasks = app.column_tasks(*status, today);
        let expanded = app.view.is_expanded(*status);
        let marker = if expanded { "v" } else { ">" };
        let mut heading = Style::default()
            .fg(section_color(*status))
            .add_modifier(Modifier::BOLD);
        if app.selected_status == i {
            heading = heading.add_modifier(Modifier::UNDERLINED);
        }
        items.push(ListItem::new(Line::from(Span::styled(
            format!("{} {} ({})", marker, section_title(*status), tasks.len()),
            heading,
        ))));

        if !expanded {
            continue;
        }
        if tasks.is_empty() {
            items.push(ListItem::new(format!(
                "    No Tasks in {}",
                section_title(*status)
            )));
        }
        for (j, task) in tasks.iter().enumerate() {
            let selected = app.selected_status == i && app.selected_task == j;
            items.push(task_line(task, today, true, selected));
        }
    }

    let list = List::new(items).block(Block::default().title("Tasks").borders(Borders::ALL));
    f.render_widget(list, area);
}

fn draw_board(f: &mut Frame, app: &App, today: NaiveDate, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints(vec![
            Constraint::Percentage(33),
            Constraint::Percentage(33),
            Constraint::Percentage(34),
        ])
        .split(area);

    for (i, status) in TaskStatus::COLUMNS.iter().enumerate() {
        let tasks = app.column_tasks(*status, today);
        let column_name = status.as_str().replace('_', " ");
        let items: Vec<ListItem> = if tasks.is_empty() {
            vec![ListItem::new(format!("No Tasks In {}", column_name))]
        } else {
            tasks
                .iter()
                .enumerate()
                .map(|(j, t)| {
                    task_line(t, today, false, app.selected_status == i && app.selected_task == j)
                })
                .collect()
        };

        let list = List::new(items).block(
            Block::default()
                .title(column_name)
                .borders(Borders::ALL)
                .border_style(if app.selected_status == i {
                    Style::default().fg(Color::Cyan)
                } else {
                    Style::default().fg(section_color(*status))
                }),
        );

        f.render_widget(list, chunks[i]);
    }
}

fn draw_details(f: &mut Frame, details: &TaskDetails) {
    let area = centered(f.area(), 70, 50);
    let bold = Style::default().add_modifier(Modifier::BOLD);
    let mut lines = vec![Line::from(Span::styled("Attachments", bold))];
    if details.attachments.is_empty() {
        lines.push(Line::from("No attachments"));
    }
    for url in &details.attachments {
        lines.push(Line::from(format!("  {}", attachment_name(url))));
    }
    lines.push(Line::from(Span::styled("History", bold)));
    if details.history.is_empty() {
        lines.push(Line::from("No history available"));
    }
    for entry in &details.history {
        lines.push(Line::from(entry.clone()));
    }
    let popup = Paragraph::new(lines).block(
        Block::default()
            .title(format!("{} (any key to close)", details.title))
            .borders(Borders::ALL),
    );
    f.render_widget(Clear, area);
    f.render_widget(popup, area);
}

fn centered(area: Rect, percent_x: u16, percent_y: u16) -> Rect {
    let scale = |len: u16, percent: u16| (u32::from(len) * u32::from(percent.min(100)) / 100) as u16;
    let width = scale(area.width, percent_x);
    let height = scale(area.height, percent_y);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}

pub fn prompt(message: &str) -> Option<String> {
    disable_raw_mode().ok();
    println!("{}", message);
    let mut input = String::new();
    if io::stdin().read_line(&mut input).is_ok() {
        enable_raw_mode().ok();
        Some(input.trim().to_string())
    } else {
        enable_raw_mode().ok();
        None
    }
}
