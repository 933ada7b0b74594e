use crate::task::{Task, TaskStatus};

/// A slot in one status column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DropLocation {
    pub droppable_id: TaskStatus,
    pub index: usize,
}

/// Outcome of a drag gesture; `destination` is `None` when dropped outside a column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DropResult {
    pub draggable_id: String,
    pub source: DropLocation,
    pub destination: Option<DropLocation>,
}

/// The updated task a drop produces, or `None` when nothing changes.
pub fn task_after_drop(tasks: &[&Task], result: &DropResult) -> Option<Task> {
    let destination = result.destination?;
    if destination == result.source {
        return None;
    }
    tasks
        .iter()
        .find(|t| t.id == result.draggable_id)
        .map(|t| t.with_status(destination.droppable_id))
}

/// Checkbox: checked completes the task, unchecked sends it back to TODO.
pub fn task_after_toggle(tasks: &[&Task], task_id: &str, checked: bool) -> Option<Task> {
    let status = if checked {
        TaskStatus::Completed
    } else {
        TaskStatus::Todo
    };
    tasks
        .iter()
        .find(|t| t.id == task_id)
        .map(|t| t.with_status(status))
}
