//! Task board: owner-scoped CRUD over reminders.

use tracing::info;

use crate::db::Database;
use crate::error::{ClinicError, ClinicResult, ResourceKind};
use crate::guard::require_owned;
use crate::models::{NewTask, Task, TaskPatch};

pub struct TaskBoard<'a> {
    db: &'a Database,
}

impl<'a> TaskBoard<'a> {
    pub fn new(db: &'a Database) -> Self {
        Self { db }
    }

    pub fn list(&self, owner_id: &str) -> ClinicResult<Vec<Task>> {
        Ok(self.db.list_tasks_for_owner(owner_id)?)
    }

    pub fn get(&self, owner_id: &str, task_id: &str) -> ClinicResult<Task> {
        require_owned(ResourceKind::Task, task_id, self.db.get_task(task_id)?, owner_id)
    }

    pub fn create(&self, owner_id: &str, input: NewTask) -> ClinicResult<Task> {
        let task = input.into_task(owner_id)?;
        self.db.insert_task(&task)?;
        info!(task_id = %task.id, "task created");
        Ok(task)
    }

    pub fn update(&self, owner_id: &str, task_id: &str, patch: TaskPatch) -> ClinicResult<Task> {
        let mut task = self.get(owner_id, task_id)?;
        patch.apply_to(&mut task)?;
        task.touch();
        if !self.db.update_task(&task)? {
            return Err(ClinicError::not_found(ResourceKind::Task, task_id));
        }
        Ok(task)
    }

    pub fn delete(&self, owner_id: &str, task_id: &str) -> ClinicResult<()> {
        self.get(owner_id, task_id)?;
        if !self.db.delete_task(task_id)? {
            return Err(ClinicError::not_found(ResourceKind::Task, task_id));
        }
        info!(task_id, "task deleted");
        Ok(())
    }
}
