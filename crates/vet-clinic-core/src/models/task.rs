//! Task models. Tasks are owner reminders with no tie to pets or appointments.

use serde::{Deserialize, Serialize};

use super::patch::{apply, double_option, require_text, required_text};
use super::time::{normalize_timestamp, now_rfc3339};
use crate::error::ClinicResult;

/// Status given to tasks created without one.
pub const DEFAULT_TASK_STATUS: &str = "Pending";

/// A reminder owned by one principal.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: String,
    pub owner_id: String,
    pub title: String,
    pub description: Option<String>,
    /// Free-form status label
    pub status: String,
    pub due_date: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl Task {
    /// Create a new pending task.
    pub fn new(owner_id: String, title: String) -> Self {
        let now = now_rfc3339();
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            owner_id,
            title,
            description: None,
            status: DEFAULT_TASK_STATUS.to_string(),
            due_date: None,
            created_at: now.clone(),
            updated_at: now,
        }
    }

    /// Touch the updated_at timestamp.
    pub fn touch(&mut self) {
        self.updated_at = now_rfc3339();
    }
}

/// Request body for creating a task.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTask {
    pub title: Option<String>,
    pub description: Option<String>,
    pub status: Option<String>,
    pub due_date: Option<String>,
}

impl NewTask {
    /// Validate and build the task for `owner_id`.
    pub fn into_task(self, owner_id: &str) -> ClinicResult<Task> {
        let title = require_text("title", self.title)?;
        let status = self
            .status
            .map(|status| require_text("status", Some(status)))
            .transpose()?;
        let due_date = self
            .due_date
            .map(|raw| normalize_timestamp("dueDate", &raw))
            .transpose()?;

        let mut task = Task::new(owner_id.to_string(), title);
        task.description = self.description;
        apply(&mut task.status, status);
        task.due_date = due_date;
        Ok(task)
    }
}

/// Partial update for a task.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskPatch {
    #[serde(default, deserialize_with = "double_option")]
    pub title: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub description: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub status: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub due_date: Option<Option<String>>,
}

impl TaskPatch {
    /// Validate every field, then apply the ones present.
    pub fn apply_to(self, task: &mut Task) -> ClinicResult<()> {
        let title = required_text("title", self.title)?;
        let status = required_text("status", self.status)?;
        let due_date = match self.due_date {
            Some(Some(raw)) => Some(Some(normalize_timestamp("dueDate", &raw)?)),
            Some(None) => Some(None),
            None => None,
        };

        apply(&mut task.title, title);
        apply(&mut task.description, self.description);
        apply(&mut task.status, status);
        apply(&mut task.due_date, due_date);
        Ok(())
    }
}
