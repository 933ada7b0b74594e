use crate::due_date::{end_of_month, end_of_week, parse_due_date};
use crate::task::Task;
use chrono::NaiveDate;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum CategoryFilter {
    #[default]
    All,
    Only(String),
}

impl CategoryFilter {
    pub fn parse(s: &str) -> Self {
        if s == "all" {
            CategoryFilter::All
        } else {
            CategoryFilter::Only(s.to_string())
        }
    }

    pub fn matches(&self, task: &Task) -> bool {
        match self {
            CategoryFilter::All => true,
            CategoryFilter::Only(category) => task.category.as_deref() == Some(category.as_str()),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DueDateFilter {
    #[default]
    All,
    Today,
    Week,
    Month,
}

impl DueDateFilter {
    /// Unknown strings fall back to `All`.
    pub fn parse(s: &str) -> Self {
        match s {
            "today" => DueDateFilter::Today,
            "week" => DueDateFilter::Week,
            "month" => DueDateFilter::Month,
            _ => DueDateFilter::All,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DueDateFilter::All => "all",
            DueDateFilter::Today => "today",
            DueDateFilter::Week => "week",
            DueDateFilter::Month => "month",
        }
    }

    pub fn next(self) -> Self {
        match self {
            DueDateFilter::All => DueDateFilter::Today,
            DueDateFilter::Today => DueDateFilter::Week,
            DueDateFilter::Week => DueDateFilter::Month,
            DueDateFilter::Month => DueDateFilter::All,
        }
    }

    /// Week and month are upper bounds only: overdue tasks stay in.
    pub fn matches(&self, task: &Task, today: NaiveDate) -> bool {
        if *self == DueDateFilter::All {
            return true;
        }
        let Some(due) = parse_due_date(&task.due_date) else {
            return false;
        };
        match self {
            DueDateFilter::All => true,
            DueDateFilter::Today => due == today,
            DueDateFilter::Week => due <= end_of_week(today),
            DueDateFilter::Month => due <= end_of_month(today),
        }
    }
}

/// The three criteria from the dashboard header.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskFilter {
    pub category: CategoryFilter,
    pub due_date: DueDateFilter,
    pub search: String,
}

impl TaskFilter {
    pub fn matches_search(&self, task: &Task) -> bool {
        self.search.is_empty()
            || task
                .title
                .to_lowercase()
                .contains(&self.search.to_lowercase())
    }

    /// Category, then due date, then title search. Input order is preserved.
    pub fn apply<'a>(&self, tasks: &'a [Task], today: NaiveDate) -> Vec<&'a Task> {
        tasks
            .iter()
            .filter(|t| self.category.matches(t))
            .filter(|t| self.due_date.matches(t, today))
            .filter(|t| self.matches_search(t))
            .collect()
    }
}
