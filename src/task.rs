use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TaskStatus {
    Todo,
    InProgress,
    Completed,
    None,
}

impl TaskStatus {
    /// Statuses that get a section in the list view and a column on the board.
    pub const COLUMNS: [TaskStatus; 3] = [
        TaskStatus::Todo,
        TaskStatus::InProgress,
        TaskStatus::Completed,
    ];

    /// Identifier used for droppables and on the wire.
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::Todo => "TODO",
            TaskStatus::InProgress => "IN_PROGRESS",
            TaskStatus::Completed => "COMPLETED",
            TaskStatus::None => "NONE",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "TODO" => Some(TaskStatus::Todo),
            "IN_PROGRESS" => Some(TaskStatus::InProgress),
            "COMPLETED" => Some(TaskStatus::Completed),
            "NONE" => Some(TaskStatus::None),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            TaskStatus::Todo => "To Do",
            TaskStatus::InProgress => "In Progress",
            TaskStatus::Completed => "Completed",
            TaskStatus::None => "None",
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ViewType {
    #[default]
    List,
    Board,
}

impl ViewType {
    pub fn toggled(self) -> Self {
        match self {
            ViewType::List => ViewType::Board,
            ViewType::Board => ViewType::List,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    #[serde(default)]
    pub id: String,
    pub user_id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    pub status: TaskStatus,
    #[serde(default)]
    pub due_date: String,
    #[serde(default)]
    pub attachments: Vec<String>,
    #[serde(default)]
    pub completed: bool,
}

impl Task {
    /// Sets the status and keeps `completed` in step with it.
    pub fn set_status(&mut self, status: TaskStatus) {
        self.status = status;
        self.completed = status == TaskStatus::Completed;
    }

    /// Copy of this task moved to `status`.
    pub fn with_status(&self, status: TaskStatus) -> Task {
        let mut task = self.clone();
        task.set_status(status);
        task
    }
}

/// File name part of an attachment URL.
pub fn attachment_name(url: &str) -> &str {
    url.rsplit('/').next().unwrap_or(url)
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TaskError {
    #[error("task title must not be empty")]
    MissingTitle,

    #[error("task description must not be empty")]
    MissingDescription,
}

/// Contents of the create-task form before the backend assigns an id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTask {
    pub title: String,
    pub description: String,
    pub category: Option<String>,
    pub status: TaskStatus,
    pub due_date: String,
    pub attachments: Vec<String>,
}

impl Default for NewTask {
    fn default() -> Self {
        Self {
            title: String::new(),
            description: String::new(),
            category: Some("Work".to_string()),
            status: TaskStatus::Todo,
            due_date: String::new(),
            attachments: Vec::new(),
        }
    }
}

impl NewTask {
    pub fn validate(&self) -> Result<(), TaskError> {
        if self.title.is_empty() {
            return Err(TaskError::MissingTitle);
        }
        if self.description.is_empty() {
            return Err(TaskError::MissingDescription);
        }
        Ok(())
    }

    /// Builds the task owned by `user_id`. The id stays empty until stored.
    pub fn into_task(self, user_id: &str) -> Task {
        let mut task = Task {
            id: String::new(),
            user_id: user_id.to_string(),
            title: self.title,
            description: self.description,
            category: self.category,
            status: self.status,
            due_date: self.due_date,
            attachments: self.attachments,
            completed: false,
        };
        task.set_status(self.status);
        task
    }
}

#[cfg(test)]
pub(crate) fn sample(id: &str, title: &str, status: TaskStatus) -> Task {
    Task {
        id: id.to_string(),
        user_id: "u1".to_string(),
        title: title.to_string(),
        description: format!("{} details", title),
        category: Some("Work".to_string()),
        status,
        due_date: "2024-05-15".to_string(),
        attachments: Vec::new(),
        completed: status == TaskStatus::Completed,
    }
}
