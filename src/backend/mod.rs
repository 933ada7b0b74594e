//! Collaborators behind the task board: who is signed in, and where tasks live.

pub mod auth;
pub mod json_store;

use crate::task::Task;
use async_trait::async_trait;
use chrono::{DateTime, Local, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use auth::LocalAuth;
pub use json_store::JsonFileStore;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub uid: String,
    pub email: Option<String>,
    pub photo_url: Option<String>,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("authentication failed ({code}): {message}")]
pub struct AuthError {
    pub code: String,
    pub message: String,
}

impl AuthError {
    pub fn new(code: &str, message: impl Into<String>) -> Self {
        Self {
            code: code.to_string(),
            message: message.into(),
        }
    }
}

#[derive(Debug, Error)]
pub enum BackendError {
    #[error("user not authenticated")]
    NotAuthenticated,

    #[error("task not found: {0}")]
    NotFound(String),

    #[error("storage I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("storage document malformed: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// One record of the read-only `taskHistory` collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    pub task_id: String,
    pub timestamp: DateTime<Utc>,
    pub action: String,
}

impl HistoryEntry {
    /// `"<local time>: <action>"`, as listed in the edit dialog.
    pub fn display_line(&self) -> String {
        format!(
            "{}: {}",
            self.timestamp
                .with_timezone(&Local)
                .format("%Y-%m-%d %H:%M:%S"),
            self.action
        )
    }
}

#[async_trait]
pub trait AuthProvider: Send + Sync {
    async fn current_user(&self) -> Option<User>;
    async fn sign_in(&self) -> Result<User, AuthError>;
    async fn sign_out(&self) -> Result<(), AuthError>;
}

#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Stores a new task and returns the generated id.
    async fn add_task(&self, task: &Task) -> Result<String, BackendError>;
    async fn tasks_for_user(&self, user_id: &str) -> Result<Vec<Task>, BackendError>;
    async fn update_task(&self, task: &Task) -> Result<(), BackendError>;
    async fn delete_task(&self, id: &str) -> Result<(), BackendError>;
    /// History of one task, oldest first.
    async fn task_history(&self, task_id: &str) -> Result<Vec<HistoryEntry>, BackendError>;
}
