use crate::task::{Task, TaskStatus, ViewType};
use std::collections::HashSet;

/// Which view is shown and which list sections are open.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewState {
    pub view: ViewType,
    expanded: HashSet<TaskStatus>,
}

impl Default for ViewState {
    fn default() -> Self {
        Self {
            view: ViewType::List,
            expanded: TaskStatus::COLUMNS.into_iter().collect(),
        }
    }
}

impl ViewState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn toggle_view(&mut self) {
        self.view = self.view.toggled();
    }

    pub fn toggle_section(&mut self, status: TaskStatus) {
        if !self.expanded.remove(&status) {
            self.expanded.insert(status);
        }
    }

    pub fn is_expanded(&self, status: TaskStatus) -> bool {
        self.expanded.contains(&status)
    }
}

pub fn section_title(status: TaskStatus) -> &'static str {
    match status {
        TaskStatus::Todo => "Todo",
        TaskStatus::InProgress => "In-Progress",
        TaskStatus::Completed => "Completed",
        TaskStatus::None => "None",
    }
}

/// Tasks of one section, in display order.
pub fn tasks_in_section<'a>(tasks: &[&'a Task], status: TaskStatus) -> Vec<&'a Task> {
    tasks.iter().copied().filter(|t| t.status == status).collect()
}
