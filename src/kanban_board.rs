use crate::backend::{AuthProvider, BackendError, DocumentStore, User};
use crate::filter::TaskFilter;
use crate::task::{NewTask, Task, TaskError};
use crate::transition::{task_after_drop, task_after_toggle, DropResult};
use chrono::NaiveDate;
use std::sync::Arc;
use tracing::{debug, error, warn};

/// Client-side copy of the signed-in user's tasks.
///
/// Backend failures are logged and otherwise swallowed. Updates and removals
/// are applied locally even when the backend rejects them.
pub struct KanbanBoard {
    pub tasks: Vec<Task>,
    auth: Arc<dyn AuthProvider>,
    store: Arc<dyn DocumentStore>,
}

impl KanbanBoard {
    pub fn new(auth: Arc<dyn AuthProvider>, store: Arc<dyn DocumentStore>) -> Self {
        Self {
            tasks: Vec::new(),
            auth,
            store,
        }
    }

    pub async fn current_user(&self) -> Option<User> {
        self.auth.current_user().await
    }

    pub async fn fetch_tasks(&mut self) {
        let Some(user) = self.auth.current_user().await else {
            warn!("Error fetching tasks: {}", BackendError::NotAuthenticated);
            return;
        };
        match self.store.tasks_for_user(&user.uid).await {
            Ok(tasks) => {
                debug!(count = tasks.len(), "fetched tasks");
                self.tasks = tasks;
            }
            Err(err) => error!("Error fetching tasks: {}", err),
        }
    }

    /// Validates and stores the form. Returns the new id when it was stored.
    pub async fn add_task(&mut self, form: NewTask) -> Result<Option<String>, TaskError> {
        form.validate()?;
        let Some(user) = self.auth.current_user().await else {
            warn!("Error adding task: {}", BackendError::NotAuthenticated);
            return Ok(None);
        };
        let mut task = form.into_task(&user.uid);
        match self.store.add_task(&task).await {
            Ok(id) => {
                task.id = id.clone();
                let mut tasks = self.tasks.clone();
                tasks.push(task);
                self.tasks = tasks;
                Ok(Some(id))
            }
            Err(err) => {
                error!("Error adding task: {}", err);
                Ok(None)
            }
        }
    }

    pub async fn update_task(&mut self, task: Task) {
        if let Err(err) = self.store.update_task(&task).await {
            error!(task_id = %task.id, "Error updating task: {}", err);
        }
        self.tasks = self
            .tasks
            .iter()
            .map(|t| if t.id == task.id { task.clone() } else { t.clone() })
            .collect();
    }

    pub async fn remove_task(&mut self, task_id: &str) {
        if let Err(err) = self.store.delete_task(task_id).await {
            error!(task_id, "Error deleting task: {}", err);
        }
        self.tasks = self
            .tasks
            .iter()
            .filter(|t| t.id != task_id)
            .cloned()
            .collect();
    }

    /// History lines for the edit dialog; empty when the read fails.
    pub async fn fetch_task_history(&self, task_id: &str) -> Vec<String> {
        match self.store.task_history(task_id).await {
            Ok(history) => history.iter().map(|h| h.display_line()).collect(),
            Err(err) => {
                error!(task_id, "Error fetching task history: {}", err);
                Vec::new()
            }
        }
    }

    pub fn visible_tasks(&self, filter: &TaskFilter, today: NaiveDate) -> Vec<&Task> {
        filter.apply(&self.tasks, today)
    }

    /// Applies a drop against the displayed tasks. Returns whether an update was issued.
    pub async fn handle_drop(&mut self, displayed: &[&Task], result: &DropResult) -> bool {
        match task_after_drop(displayed, result) {
            Some(task) => {
                self.update_task(task).await;
                true
            }
            None => false,
        }
    }

    pub async fn toggle_completion(&mut self, displayed: &[&Task], task_id: &str, checked: bool) -> bool {
        match task_after_toggle(displayed, task_id, checked) {
            Some(task) => {
                self.update_task(task).await;
                true
            }
            None => false,
        }
    }
}
