mod app;
mod backend;
mod config;
mod due_date;
mod filter;
mod kanban_board;
mod task;
mod transition;
mod ui;
mod view;

use crate::app::App;
use crate::backend::{AuthProvider, JsonFileStore, LocalAuth};
use crate::config::Config;
use crate::filter::{CategoryFilter, DueDateFilter, TaskFilter};
use crate::kanban_board::KanbanBoard;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::{fs::OpenOptions, io, sync::Arc, sync::Mutex};
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env()?;

    // The terminal belongs to the UI, so logs go to a file.
    let log_file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&config.log_file)?;
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(&config.log_filter))
        .with(
            tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(Mutex::new(log_file)),
        )
        .init();
    info!(data_file = %config.data_file.display(), "starting");

    let auth = Arc::new(LocalAuth::new(Some(config.user.clone())));
    if let Err(err) = auth.sign_in().await {
        error!(code = %err.code, "sign-in failed: {}", err);
    }
    let store = if config.is_in_memory() {
        Arc::new(JsonFileStore::in_memory())
    } else {
        Arc::new(JsonFileStore::open(&config.data_file).await?)
    };

    let mut board = KanbanBoard::new(auth.clone(), store);
    board.fetch_tasks().await;
    if let Some(user) = board.current_user().await {
        info!(uid = %user.uid, email = ?user.email, photo = ?user.photo_url, "dashboard ready");
    }
    let mut app = App::new(board, config.default_category.clone());
    app.filter = TaskFilter {
        category: CategoryFilter::parse(&config.category_filter),
        due_date: DueDateFilter::parse(&config.due_filter),
        search: String::new(),
    };

    // Terminal setup
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = ui::run_app(&mut terminal, &mut app).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(err) = auth.sign_out().await {
        error!(code = %err.code, "sign-out failed: {}", err);
    }

    if let Err(err) = result {
        error!("ui loop failed: {}", err);
        eprintln!("{:?}", err);
    }
    Ok(())
}
