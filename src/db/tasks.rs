//! Task store gateway operations.
//!
//! The contract mirrors a per-user document holding a tasks array:
//! fetch the whole collection, append one element, replace or remove one
//! element by id, or overwrite the whole array (used by the sweep).

use super::Database;
use crate::types::{Importance, Task, TaskStatus};
use anyhow::{Result, anyhow};
use chrono::NaiveDate;
use rusqlite::{Row, params};
use uuid::Uuid;

fn parse_task_row(row: &Row) -> Result<Task> {
    let task_id: String = row.get("task_id")?;
    let task_name: String = row.get("task_name")?;
    let due_date: String = row.get("due_date")?;
    let category: String = row.get("category")?;
    let importance: String = row.get("importance")?;
    let comments: Option<String> = row.get("comments")?;
    let status: String = row.get("status")?;
    let created_at: i64 = row.get("created_at")?;
    let updated_at: i64 = row.get("updated_at")?;

    Ok(Task {
        task_id: Uuid::parse_str(&task_id)?,
        task_name,
        due_date: NaiveDate::parse_from_str(&due_date, "%Y-%m-%d")?,
        category,
        importance: Importance::parse(&importance)
            .ok_or_else(|| anyhow!("invalid importance in store: {}", importance))?,
        comments,
        status: TaskStatus::parse(&status)
            .ok_or_else(|| anyhow!("invalid status in store: {}", status))?,
        created_at,
        updated_at,
    })
}

impl Database {
    /// Fetch a user's full task collection in insertion order.
    /// Returns None when no user document exists.
    pub fn get_tasks_for_user(&self, user_id: &str) -> Result<Option<Vec<Task>>> {
        if !self.user_exists(user_id)? {
            return Ok(None);
        }
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT task_id, task_name, due_date, category, importance, comments,
                        status, created_at, updated_at
                 FROM tasks WHERE user_id = ?1 ORDER BY rowid",
            )?;
            let mut rows = stmt.query(params![user_id])?;
            let mut tasks = Vec::new();
            while let Some(row) = rows.next()? {
                tasks.push(parse_task_row(row)?);
            }
            Ok(Some(tasks))
        })
    }

    /// Fetch a single task by id.
    pub fn get_task(&self, user_id: &str, task_id: &Uuid) -> Result<Option<Task>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT task_id, task_name, due_date, category, importance, comments,
                        status, created_at, updated_at
                 FROM tasks WHERE user_id = ?1 AND task_id = ?2",
            )?;
            let mut rows = stmt.query(params![user_id, task_id.to_string()])?;
            match rows.next()? {
                Some(row) => Ok(Some(parse_task_row(row)?)),
                None => Ok(None),
            }
        })
    }

    /// Append one task to the user's collection.
    pub fn append_task(&self, user_id: &str, task: &Task) -> Result<()> {
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO tasks (user_id, task_id, task_name, due_date, category,
                                    importance, comments, status, created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
                params![
                    user_id,
                    task.task_id.to_string(),
                    task.task_name,
                    task.due_date.to_string(),
                    task.category,
                    task.importance.as_str(),
                    task.comments,
                    task.status.as_str(),
                    task.created_at,
                    task.updated_at,
                ],
            )?;
            Ok(())
        })
    }

    /// Replace the element whose task_id matches. Returns false when the
    /// task is absent.
    pub fn replace_task(&self, user_id: &str, task_id: &Uuid, updated: &Task) -> Result<bool> {
        self.with_conn(|conn| {
            let changed = conn.execute(
                "UPDATE tasks SET task_name = ?3, due_date = ?4, category = ?5,
                        importance = ?6, comments = ?7, status = ?8, updated_at = ?9
                 WHERE user_id = ?1 AND task_id = ?2",
                params![
                    user_id,
                    task_id.to_string(),
                    updated.task_name,
                    updated.due_date.to_string(),
                    updated.category,
                    updated.importance.as_str(),
                    updated.comments,
                    updated.status.as_str(),
                    updated.updated_at,
                ],
            )?;
            Ok(changed > 0)
        })
    }

    /// Remove the element whose task_id matches. Returns false when the
    /// task is absent (the collection is left unmodified).
    pub fn remove_task(&self, user_id: &str, task_id: &Uuid) -> Result<bool> {
        self.with_conn(|conn| {
            let removed = conn.execute(
                "DELETE FROM tasks WHERE user_id = ?1 AND task_id = ?2",
                params![user_id, task_id.to_string()],
            )?;
            Ok(removed > 0)
        })
    }

    /// Overwrite the user's whole collection in one transaction,
    /// preserving the given order. Used by the sweep write-back.
    pub fn replace_all_tasks(&self, user_id: &str, tasks: &[Task]) -> Result<()> {
        self.with_conn_mut(|conn| {
            let tx = conn.transaction()?;
            tx.execute("DELETE FROM tasks WHERE user_id = ?1", params![user_id])?;
            {
                let mut stmt = tx.prepare(
                    "INSERT INTO tasks (user_id, task_id, task_name, due_date, category,
                                        importance, comments, status, created_at, updated_at)
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
                )?;
                for task in tasks {
                    stmt.execute(params![
                        user_id,
                        task.task_id.to_string(),
                        task.task_name,
                        task.due_date.to_string(),
                        task.category,
                        task.importance.as_str(),
                        task.comments,
                        task.status.as_str(),
                        task.created_at,
                        task.updated_at,
                    ])?;
                }
            }
            tx.commit()?;
            Ok(())
        })
    }
}
