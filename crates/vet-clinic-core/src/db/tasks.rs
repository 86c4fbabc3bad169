//! Task database operations.

use rusqlite::{params, OptionalExtension, Row};

use super::{Database, DbResult};
use crate::models::Task;

const TASK_COLUMNS: &str =
    "id, owner_id, title, description, status, due_date, created_at, updated_at";

fn task_from_row(row: &Row<'_>) -> rusqlite::Result<Task> {
    Ok(Task {
        id: row.get(0)?,
        owner_id: row.get(1)?,
        title: row.get(2)?,
        description: row.get(3)?,
        status: row.get(4)?,
        due_date: row.get(5)?,
        created_at: row.get(6)?,
        updated_at: row.get(7)?,
    })
}

impl Database {
    /// Insert a new task.
    pub fn insert_task(&self, task: &Task) -> DbResult<()> {
        self.conn.execute(
            r#"
            INSERT INTO tasks (
                id, owner_id, title, description, status,
                due_date, created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
            "#,
            params![
                task.id,
                task.owner_id,
                task.title,
                task.description,
                task.status,
                task.due_date,
                task.created_at,
                task.updated_at,
            ],
        )?;
        Ok(())
    }

    /// Update an existing task.
    pub fn update_task(&self, task: &Task) -> DbResult<bool> {
        let rows_affected = self.conn.execute(
            r#"
            UPDATE tasks SET
                title = ?2,
                description = ?3,
                status = ?4,
                due_date = ?5,
                updated_at = ?6
            WHERE id = ?1
            "#,
            params![
                task.id,
                task.title,
                task.description,
                task.status,
                task.due_date,
                task.updated_at,
            ],
        )?;
        Ok(rows_affected > 0)
    }

    /// Get a task by ID.
    pub fn get_task(&self, id: &str) -> DbResult<Option<Task>> {
        self.conn
            .query_row(
                &format!("SELECT {TASK_COLUMNS} FROM tasks WHERE id = ?"),
                [id],
                task_from_row,
            )
            .optional()
            .map_err(Into::into)
    }

    /// List an owner's tasks, soonest due first.
    pub fn list_tasks_for_owner(&self, owner_id: &str) -> DbResult<Vec<Task>> {
        let mut stmt = self.conn.prepare(&format!(
            r#"
            SELECT {TASK_COLUMNS} FROM tasks
            WHERE owner_id = ?
            ORDER BY due_date IS NULL, due_date, created_at
            "#
        ))?;

        let rows = stmt.query_map([owner_id], task_from_row)?;

        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }

    /// Delete a task.
    pub fn delete_task(&self, id: &str) -> DbResult<bool> {
        let rows_affected = self.conn.execute("DELETE FROM tasks WHERE id = ?", [id])?;
        Ok(rows_affected > 0)
    }
}
