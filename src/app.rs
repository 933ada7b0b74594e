use crate::filter::{CategoryFilter, TaskFilter};
use crate::kanban_board::KanbanBoard;
use crate::task::{NewTask, Task, TaskStatus, ViewType};
use crate::transition::{DropLocation, DropResult};
use crate::view::{tasks_in_section, ViewState};
use chrono::{Local, NaiveDate};
use crossterm::event::KeyCode;
use tracing::{debug, info};

const CATEGORIES: [&str; 3] = ["all", "Work", "Personal"];

/// Contents of the detail popup for one task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskDetails {
    pub title: String,
    pub attachments: Vec<String>,
    pub history: Vec<String>,
}

/// Everything the dashboard renders, plus the key bindings that change it.
pub struct App {
    pub board: KanbanBoard,
    pub view: ViewState,
    pub filter: TaskFilter,
    pub selected_status: usize, // Index into TaskStatus::COLUMNS
    pub selected_task: usize,   // Index within the selected column
    pub details: Option<TaskDetails>,
    pub notice: Option<String>,
    pub default_category: String,
}

impl App {
    pub fn new(board: KanbanBoard, default_category: String) -> Self {
        Self {
            board,
            view: ViewState::new(),
            filter: TaskFilter::default(),
            selected_status: 0,
            selected_task: 0,
            details: None,
            notice: None,
            default_category,
        }
    }

    pub fn today() -> NaiveDate {
        Local::now().date_naive()
    }

    pub fn selected_column(&self) -> TaskStatus {
        TaskStatus::COLUMNS[self.selected_status]
    }

    pub fn displayed_tasks(&self, today: NaiveDate) -> Vec<&Task> {
        self.board.visible_tasks(&self.filter, today)
    }

    pub fn column_tasks(&self, status: TaskStatus, today: NaiveDate) -> Vec<&Task> {
        tasks_in_section(&self.displayed_tasks(today), status)
    }

    pub fn selected(&self, today: NaiveDate) -> Option<&Task> {
        self.column_tasks(self.selected_column(), today)
            .get(self.selected_task)
            .copied()
    }

    fn clamp_selection(&mut self, today: NaiveDate) {
        let len = self.column_tasks(self.selected_column(), today).len();
        self.selected_task = self.selected_task.min(len.saturating_sub(1));
    }

    fn displayed_snapshot(&self, today: NaiveDate) -> Vec<Task> {
        self.displayed_tasks(today).into_iter().cloned().collect()
    }

    /// Handles one key press. `input` asks the user for a line of text.
    /// Returns `true` when the app should quit.
    pub async fn handle_key<F>(&mut self, code: KeyCode, today: NaiveDate, input: &mut F) -> bool
    where
        F: FnMut(&str) -> Option<String>,
    {
        if self.details.take().is_some() {
            return false;
        }
        self.notice = None;

        match code {
            KeyCode::Char('q') => return true,
            KeyCode::Char('v') => self.view.toggle_view(),
            KeyCode::Left => {
                self.selected_status = self.selected_status.saturating_sub(1);
                self.selected_task = 0;
            }
            KeyCode::Right => {
                if self.selected_status < TaskStatus::COLUMNS.len() - 1 {
                    self.selected_status += 1;
                }
                self.selected_task = 0;
            }
            KeyCode::Tab => {
                self.selected_status = (self.selected_status + 1) % TaskStatus::COLUMNS.len();
                self.selected_task = 0;
            }
            KeyCode::Up => {
                self.selected_task = self.selected_task.saturating_sub(1);
            }
            KeyCode::Down => {
                let max_tasks = self.column_tasks(self.selected_column(), today).len();
                if self.selected_task + 1 < max_tasks {
                    self.selected_task += 1;
                }
            }
            KeyCode::Enter => {
                if self.view.view == ViewType::List {
                    self.view.toggle_section(self.selected_column());
                }
            }
            KeyCode::Char(' ') => {
                let selected = self
                    .selected(today)
                    .map(|t| (t.id.clone(), t.status != TaskStatus::Completed));
                if let Some((id, checked)) = selected {
                    let displayed = self.displayed_snapshot(today);
                    let refs: Vec<&Task> = displayed.iter().collect();
                    self.board.toggle_completion(&refs, &id, checked).await;
                }
            }
            KeyCode::Char('<') => self.move_selected(-1, today).await,
            KeyCode::Char('>') => self.move_selected(1, today).await,
            KeyCode::Char('a') => self.add_from_prompts(input).await,
            KeyCode::Char('e') => self.edit_from_prompts(today, input).await,
            KeyCode::Char('d') => {
                if let Some(id) = self.selected(today).map(|t| t.id.clone()) {
                    self.board.remove_task(&id).await;
                }
            }
            KeyCode::Char('h') => {
                let selected = self
                    .selected(today)
                    .map(|t| (t.id.clone(), t.title.clone(), t.attachments.clone()));
                if let Some((id, title, attachments)) = selected {
                    let history = self.board.fetch_task_history(&id).await;
                    self.details = Some(TaskDetails {
                        title,
                        attachments,
                        history,
                    });
                }
            }
            KeyCode::Char('c') => self.cycle_category(),
            KeyCode::Char('f') => {
                self.filter.due_date = self.filter.due_date.next();
                debug!(due = self.filter.due_date.as_str(), "due date filter changed");
            }
            KeyCode::Char('/') => {
                if let Some(search) = input("Search task titles (empty clears)") {
                    self.filter.search = search;
                }
            }
            KeyCode::Char('r') => self.board.fetch_tasks().await,
            _ => {}
        }

        self.clamp_selection(today);
        false
    }

    /// Moves the selected task one column over, as a drop at the end of that column.
    async fn move_selected(&mut self, direction: isize, today: NaiveDate) {
        let Some(id) = self.selected(today).map(|t| t.id.clone()) else {
            return;
        };
        let source = DropLocation {
            droppable_id: self.selected_column(),
            index: self.selected_task,
        };
        let target = (self.selected_status as isize + direction)
            .clamp(0, TaskStatus::COLUMNS.len() as isize - 1) as usize;
        let destination = if target == self.selected_status {
            source
        } else {
            DropLocation {
                droppable_id: TaskStatus::COLUMNS[target],
                index: self.column_tasks(TaskStatus::COLUMNS[target], today).len(),
            }
        };
        let result = DropResult {
            draggable_id: id,
            source,
            destination: Some(destination),
        };
        let displayed = self.displayed_snapshot(today);
        let refs: Vec<&Task> = displayed.iter().collect();
        if self.board.handle_drop(&refs, &result).await {
            self.selected_status = target;
            self.selected_task = destination.index;
        }
    }

    fn cycle_category(&mut self) {
        let current = match &self.filter.category {
            CategoryFilter::All => "all",
            CategoryFilter::Only(c) => c.as_str(),
        };
        let next = CATEGORIES
            .iter()
            .position(|c| *c == current)
            .map(|i| CATEGORIES[(i + 1) % CATEGORIES.len()])
            .unwrap_or("all");
        self.filter.category = CategoryFilter::parse(next);
    }

    async fn add_from_prompts<F>(&mut self, input: &mut F)
    where
        F: FnMut(&str) -> Option<String>,
    {
        let Some(title) = input("Enter task title") else {
            return;
        };
        let Some(description) = input("Enter task description") else {
            return;
        };
        let due_date = input("Enter due date (YYYY-MM-DD)").unwrap_or_default();
        let category = input(&format!("Enter category (blank for {})", self.default_category))
            .filter(|c| !c.is_empty())
            .unwrap_or_else(|| self.default_category.clone());
        let mut status = TaskStatus::Todo;
        let answer = input("Enter status (TODO, IN_PROGRESS, COMPLETED; blank for TODO)");
        if let Some(answer) = answer.filter(|s| !s.is_empty()) {
            match TaskStatus::parse(&answer) {
                Some(parsed) => status = parsed,
                None => self.notice = Some(format!("unknown status: {}", answer)),
            }
        }
        let attachments = input("Attachment URLs (comma separated)")
            .map(|urls| parse_attachments(&urls))
            .unwrap_or_default();

        let form = NewTask {
            title,
            description,
            category: Some(category),
            status,
            due_date,
            attachments,
        };
        match self.board.add_task(form).await {
            Ok(Some(id)) => {
                info!(task_id = %id, "task created");
                if let Some(column) = TaskStatus::COLUMNS.iter().position(|s| *s == status) {
                    if column != self.selected_status {
                        self.selected_status = column;
                        self.selected_task = 0;
                    }
                }
            }
            Ok(None) => {}
            Err(err) => self.notice = Some(err.to_string()),
        }
    }

    /// Blank answers keep the current value.
    async fn edit_from_prompts<F>(&mut self, today: NaiveDate, input: &mut F)
    where
        F: FnMut(&str) -> Option<String>,
    {
        let Some(mut task) = self.selected(today).cloned() else {
            return;
        };
        let mut ask = |label: &str, current: &str| {
            input(&format!("{} [{}]", label, current)).filter(|v| !v.is_empty())
        };

        if let Some(title) = ask("Task title", &task.title) {
            task.title = title;
        }
        if let Some(description) = ask("Description", &task.description) {
            task.description = description;
        }
        let category = task.category.clone().unwrap_or_default();
        if let Some(category) = ask("Category", &category) {
            task.category = Some(category);
        }
        if let Some(status) = ask("Status (TODO, IN_PROGRESS, COMPLETED)", task.status.as_str()) {
            match TaskStatus::parse(&status) {
                Some(status) => task.set_status(status),
                None => self.notice = Some(format!("unknown status: {}", status)),
            }
        }
        if let Some(due_date) = ask("Due on", &task.due_date) {
            task.due_date = due_date;
        }
        let current = task.attachments.join(", ");
        if let Some(urls) = ask("Attachment URLs", &current) {
            task.attachments = parse_attachments(&urls);
        }
        self.board.update_task(task).await;
    }
}

fn parse_attachments(urls: &str) -> Vec<String> {
    urls.split(',')
        .map(str::trim)
        .filter(|u| !u.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::{AuthProvider, JsonFileStore, LocalAuth, User};
    use crate::filter::DueDateFilter;
    use std::collections::VecDeque;
    use std::sync::Arc;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, 15).unwrap()
    }

    async fn app() -> App {
        let auth = Arc::new(LocalAuth::new(Some(User {
            uid: "u1".to_string(),
            email: None,
            photo_url: None,
        })));
        auth.sign_in().await.unwrap();
        let board = KanbanBoard::new(auth, Arc::new(JsonFileStore::in_memory()));
        App::new(board, "Work".to_string())
    }

    fn answers(lines: &[&str]) -> impl FnMut(&str) -> Option<String> {
        let mut queue: VecDeque<String> = lines.iter().map(|s| s.to_string()).collect();
        move |_: &str| queue.pop_front()
    }

    fn no_input() -> impl FnMut(&str) -> Option<String> {
        |_: &str| None
    }

    #[tokio::test]
    async fn test_add_and_complete_with_keys() {
        let mut app = app().await;
        let mut input = answers(&["Buy milk", "2 litres", "2024-05-15", ""]);
        app.handle_key(KeyCode::Char('a'), today(), &mut input).await;
        assert_eq!(app.board.tasks.len(), 1);
        assert_eq!(app.board.tasks[0].category.as_deref(), Some("Work"));

        app.handle_key(KeyCode::Char(' '), today(), &mut no_input()).await;
        assert!(app.board.tasks[0].completed);
        assert!(app.selected(today()).is_none());
    }

    #[tokio::test]
    async fn test_add_with_status_lands_in_that_column() {
        let mut app = app().await;
        let mut input = answers(&[
            "Quarterly report",
            "numbers",
            "2024-05-20",
            "",
            "IN_PROGRESS",
            "https://files.example.com/u1/q2.xlsx, https://files.example.com/u1/notes.txt",
        ]);
        app.handle_key(KeyCode::Char('a'), today(), &mut input).await;

        let task = &app.board.tasks[0];
        assert_eq!(task.status, TaskStatus::InProgress);
        assert!(!task.completed);
        assert_eq!(task.attachments.len(), 2);
        assert!(app.column_tasks(TaskStatus::Todo, today()).is_empty());
        assert_eq!(app.column_tasks(TaskStatus::InProgress, today()).len(), 1);
        assert_eq!(app.selected_column(), TaskStatus::InProgress);
        assert_eq!(app.selected(today()).map(|t| t.title.as_str()), Some("Quarterly report"));
    }

    #[tokio::test]
    async fn test_add_with_unknown_status_keeps_todo() {
        let mut app = app().await;
        let mut input = answers(&["Buy milk", "2 litres", "", "", "DONE"]);
        app.handle_key(KeyCode::Char('a'), today(), &mut input).await;
        assert_eq!(app.board.tasks[0].status, TaskStatus::Todo);
        assert_eq!(app.notice.as_deref(), Some("unknown status: DONE"));
    }

    #[tokio::test]
    async fn test_invalid_add_sets_notice() {
        let mut app = app().await;
        let mut input = answers(&["Buy milk", "", "", ""]);
        app.handle_key(KeyCode::Char('a'), today(), &mut input).await;
        assert!(app.board.tasks.is_empty());
        assert_eq!(
            app.notice.as_deref(),
            Some("task description must not be empty")
        );
    }

    #[tokio::test]
    async fn test_move_between_columns() {
        let mut app = app().await;
        let mut input = answers(&["Buy milk", "2 litres", "2024-05-15", ""]);
        app.handle_key(KeyCode::Char('a'), today(), &mut input).await;

        // Moving left from the first column is a drop in place.
        app.handle_key(KeyCode::Char('<'), today(), &mut no_input()).await;
        assert_eq!(app.board.tasks[0].status, TaskStatus::Todo);
        assert_eq!(app.board.fetch_task_history(&app.board.tasks[0].id).await.len(), 1);

        app.handle_key(KeyCode::Char('>'), today(), &mut no_input()).await;
        assert_eq!(app.board.tasks[0].status, TaskStatus::InProgress);
        assert_eq!(app.selected_column(), TaskStatus::InProgress);
        app.handle_key(KeyCode::Char('>'), today(), &mut no_input()).await;
        assert_eq!(app.board.tasks[0].status, TaskStatus::Completed);
        assert!(app.board.tasks[0].completed);
    }

    #[tokio::test]
    async fn test_edit_keeps_blank_answers() {
        let mut app = app().await;
        let mut input = answers(&["Buy milk", "2 litres", "2024-05-15", ""]);
        app.handle_key(KeyCode::Char('a'), today(), &mut input).await;

        let mut input = answers(&["Buy oat milk", "", "Personal", "IN_PROGRESS", ""]);
        app.handle_key(KeyCode::Char('e'), today(), &mut input).await;
        let task = &app.board.tasks[0];
        assert_eq!(task.title, "Buy oat milk");
        assert_eq!(task.description, "2 litres");
        assert_eq!(task.category.as_deref(), Some("Personal"));
        assert_eq!(task.status, TaskStatus::InProgress);
        assert_eq!(task.due_date, "2024-05-15");
    }

    #[tokio::test]
    async fn test_filters_and_sections() {
        let mut app = app().await;
        app.handle_key(KeyCode::Char('c'), today(), &mut no_input()).await;
        assert_eq!(app.filter.category, CategoryFilter::Only("Work".to_string()));
        app.handle_key(KeyCode::Char('c'), today(), &mut no_input()).await;
        app.handle_key(KeyCode::Char('c'), today(), &mut no_input()).await;
        assert_eq!(app.filter.category, CategoryFilter::All);

        app.handle_key(KeyCode::Char('f'), today(), &mut no_input()).await;
        assert_eq!(app.filter.due_date, DueDateFilter::Today);

        let mut input = answers(&["milk"]);
        app.handle_key(KeyCode::Char('/'), today(), &mut input).await;
        assert_eq!(app.filter.search, "milk");

        app.handle_key(KeyCode::Enter, today(), &mut no_input()).await;
        assert!(!app.view.is_expanded(TaskStatus::Todo));
        app.handle_key(KeyCode::Char('v'), today(), &mut no_input()).await;
        assert_eq!(app.view.view, ViewType::Board);
        // Enter does nothing on the board.
        app.handle_key(KeyCode::Enter, today(), &mut no_input()).await;
        assert!(!app.view.is_expanded(TaskStatus::Todo));

        assert!(app.handle_key(KeyCode::Char('q'), today(), &mut no_input()).await);
    }

    #[tokio::test]
    async fn test_history_popup_and_delete() {
        let mut app = app().await;
        let mut input = answers(&["Buy milk", "2 litres", "2024-05-15", ""]);
        app.handle_key(KeyCode::Char('a'), today(), &mut input).await;

        app.handle_key(KeyCode::Char('h'), today(), &mut no_input()).await;
        let details = app.details.clone().unwrap();
        assert_eq!(details.title, "Buy milk");
        assert_eq!(details.history.len(), 1);
        assert!(details.history[0].ends_with("Task created"));

        // Any key closes the popup without acting.
        app.handle_key(KeyCode::Char('d'), today(), &mut no_input()).await;
        assert!(app.details.is_none());
        assert_eq!(app.board.tasks.len(), 1);

        app.handle_key(KeyCode::Char('d'), today(), &mut no_input()).await;
        assert!(app.board.tasks.is_empty());
    }
}
