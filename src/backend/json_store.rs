use super::{BackendError, DocumentStore, HistoryEntry};
use crate::task::Task;
use async_trait::async_trait;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tokio::sync::RwLock;
use tracing::{debug, info};
use uuid::Uuid;

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Collections {
    #[serde(default)]
    tasks: Vec<Task>,
    #[serde(default)]
    task_history: Vec<HistoryEntry>,
}

impl Collections {
    fn record(&mut self, task_id: &str, action: impl Into<String>) {
        self.task_history.push(HistoryEntry {
            task_id: task_id.to_string(),
            timestamp: Utc::now(),
            action: action.into(),
        });
    }
}

/// Task and history collections kept in one pretty-printed JSON file.
///
/// The whole file is rewritten after every mutation. Without a path the store
/// lives only in memory.
pub struct JsonFileStore {
    path: Option<PathBuf>,
    data: RwLock<Collections>,
}

impl JsonFileStore {
    pub async fn open(path: impl AsRef<Path>) -> Result<Self, BackendError> {
        let path = path.as_ref().to_path_buf();
        let data = if tokio::fs::try_exists(&path).await? {
            let raw = tokio::fs::read_to_string(&path).await?;
            if raw.trim().is_empty() {
                Collections::default()
            } else {
                serde_json::from_str(&raw)?
            }
        } else {
            Collections::default()
        };
        info!(path = %path.display(), tasks = data.tasks.len(), "opened task store");
        Ok(Self {
            path: Some(path),
            data: RwLock::new(data),
        })
    }

    pub fn in_memory() -> Self {
        Self {
            path: None,
            data: RwLock::new(Collections::default()),
        }
    }

    async fn save(&self, data: &Collections) -> Result<(), BackendError> {
        if let Some(path) = &self.path {
            tokio::fs::write(path, serde_json::to_string_pretty(data)?).await?;
            debug!(path = %path.display(), "saved task store");
        }
        Ok(())
    }
}

#[async_trait]
impl DocumentStore for JsonFileStore {
    async fn add_task(&self, task: &Task) -> Result<String, BackendError> {
        let id = Uuid::new_v4().to_string();
        let mut stored = task.clone();
        stored.id = id.clone();

        let mut data = self.data.write().await;
        data.tasks.push(stored);
        data.record(&id, "Task created");
        self.save(&data).await?;
        Ok(id)
    }

    async fn tasks_for_user(&self, user_id: &str) -> Result<Vec<Task>, BackendError> {
        let data = self.data.read().await;
        Ok(data
            .tasks
            .iter()
            .filter(|t| t.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn update_task(&self, task: &Task) -> Result<(), BackendError> {
        let mut data = self.data.write().await;
        let existing = data
            .tasks
            .iter_mut()
            .find(|t| t.id == task.id)
            .ok_or_else(|| BackendError::NotFound(task.id.clone()))?;

        let action = if existing.status != task.status {
            format!("Status changed to {}", task.status.label())
        } else {
            "Task updated".to_string()
        };
        *existing = task.clone();
        data.record(&task.id, action);
        self.save(&data).await
    }

    async fn delete_task(&self, id: &str) -> Result<(), BackendError> {
        let mut data = self.data.write().await;
        let before = data.tasks.len();
        data.tasks.retain(|t| t.id != id);
        if data.tasks.len() == before {
            debug!(task_id = id, "delete of missing task ignored");
            return Ok(());
        }
        data.record(id, "Task deleted");
        self.save(&data).await
    }

    async fn task_history(&self, task_id: &str) -> Result<Vec<HistoryEntry>, BackendError> {
        let data = self.data.read().await;
        let mut history: Vec<HistoryEntry> = data
            .task_history
            .iter()
            .filter(|h| h.task_id == task_id)
            .cloned()
            .collect();
        history.sort_by_key(|h| h.timestamp);
        Ok(history)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::task::{sample, TaskStatus};

    #[tokio::test]
    async fn test_add_assigns_id_and_scopes_by_user() {
        let store = JsonFileStore::in_memory();
        let mine = sample("", "Buy milk", TaskStatus::Todo);
        let mut theirs = sample("", "Walk dog", TaskStatus::Todo);
        theirs.user_id = "u2".to_string();

        let id = store.add_task(&mine).await.unwrap();
        store.add_task(&theirs).await.unwrap();
        assert!(!id.is_empty());

        let tasks = store.tasks_for_user("u1").await.unwrap();
        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0].id, id);
        assert_eq!(tasks[0].title, "Buy milk");
    }

    #[tokio::test]
    async fn test_update_missing_task_is_not_found() {
        let store = JsonFileStore::in_memory();
        let task = sample("nope", "Ghost", TaskStatus::Todo);
        let err = store.update_task(&task).await.unwrap_err();
        assert!(matches!(err, BackendError::NotFound(id) if id == "nope"));
    }

    #[tokio::test]
    async fn test_history_is_ordered_and_describes_changes() {
        let store = JsonFileStore::in_memory();
        let id = store
            .add_task(&sample("", "Buy milk", TaskStatus::Todo))
            .await
            .unwrap();
        let mut task = store.tasks_for_user("u1").await.unwrap().remove(0);
        task.set_status(TaskStatus::InProgress);
        store.update_task(&task).await.unwrap();
        task.title = "Buy oat milk".to_string();
        store.update_task(&task).await.unwrap();

        let actions: Vec<String> = store
            .task_history(&id)
            .await
            .unwrap()
            .into_iter()
            .map(|h| h.action)
            .collect();
        assert_eq!(
            actions,
            vec!["Task created", "Status changed to In Progress", "Task updated"]
        );
        assert!(store.task_history("other").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_file_round_trip() -> Result<(), BackendError> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("tasks.json");
        {
            let store = JsonFileStore::open(&path).await.unwrap();
            let id = store
                .add_task(&sample("", "Quarterly report", TaskStatus::Completed))
                .await
                .unwrap();
            let doomed = store
                .add_task(&sample("", "Old chore", TaskStatus::Todo))
                .await
                .unwrap();
            store.delete_task(&doomed).await.unwrap();
            assert_ne!(id, doomed);
        }

        let reopened = JsonFileStore::open(&path).await.unwrap();
        let tasks = reopened.tasks_for_user("u1").await.unwrap();
        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0].title, "Quarterly report");
        assert!(tasks[0].completed);

        let raw: serde_json::Value = serde_json::from_str(&std::fs::read_to_string(&path)?)?;
        assert!(raw["tasks"].is_array());
        assert_eq!(raw["tasks"][0]["userId"], "u1");
        assert_eq!(raw["taskHistory"].as_array().map(Vec::len), Some(3));
        Ok(())
    }

    #[tokio::test]
    async fn test_delete_missing_task_is_ok() {
        let store = JsonFileStore::in_memory();
        store.delete_task("missing").await.unwrap();
        assert!(store.task_history("missing").await.unwrap().is_empty());
    }
}
