//! Task entity model: shape and validation rules for task records.
//!
//! Create and edit share the same field constraints; they differ only in
//! how the due date is checked (an edit may keep an already-elapsed due
//! date as long as it does not change it) and in what is preserved from
//! the existing record.

use chrono::NaiveDate;

use crate::error::{ApiError, ApiResult};
use crate::lifecycle::now_ms;
use crate::types::{
    Importance, MAX_COMMENTS_LEN, MAX_TASK_NAME_LEN, Task, TaskInput, TaskStatus, new_task_id,
};

/// Validate the shared field constraints and return the normalized parts.
fn validate_fields(
    input: &TaskInput,
) -> ApiResult<(String, NaiveDate, String, Importance, Option<String>)> {
    let task_name = input
        .task_name
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| ApiError::missing_field("taskName"))?;
    if task_name.chars().count() > MAX_TASK_NAME_LEN {
        return Err(ApiError::invalid_value(
            "taskName",
            format!("taskName must be at most {} characters", MAX_TASK_NAME_LEN),
        ));
    }

    let due_date = input
        .due_date
        .ok_or_else(|| ApiError::missing_field("dueDate"))?;

    let category = input
        .category
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| ApiError::missing_field("category"))?;

    let importance_raw = input
        .importance
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| ApiError::missing_field("importance"))?;
    let importance = Importance::parse(importance_raw).ok_or_else(|| {
        ApiError::invalid_value(
            "importance",
            format!("importance must be low, medium, or high (got '{}')", importance_raw),
        )
    })?;

    let comments = input
        .comments
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string);
    if let Some(ref c) = comments {
        if c.chars().count() > MAX_COMMENTS_LEN {
            return Err(ApiError::invalid_value(
                "comments",
                format!("comments must be at most {} characters", MAX_COMMENTS_LEN),
            ));
        }
    }

    Ok((
        task_name.to_string(),
        due_date,
        category.to_string(),
        importance,
        comments,
    ))
}

/// Validate a create payload and build the new task.
///
/// The due date must not be in the past at creation time (day
/// granularity). Status is forced to Active and a fresh id is generated;
/// whatever the client sent for either is ignored.
pub fn validate_for_create(input: &TaskInput, today: NaiveDate) -> ApiResult<Task> {
    let (task_name, due_date, category, importance, comments) = validate_fields(input)?;

    if due_date < today {
        return Err(ApiError::invalid_value(
            "dueDate",
            "dueDate must not be in the past",
        ));
    }

    let now = now_ms();
    Ok(Task {
        task_id: new_task_id(),
        task_name,
        due_date,
        category,
        importance,
        comments,
        status: TaskStatus::Active,
        created_at: now,
        updated_at: now,
    })
}

/// Validate an edit payload and merge it onto the existing task.
///
/// Same constraints as create, except the past-date check only applies
/// when the edit actually changes the due date: keeping an elapsed date
/// untouched is permitted. The id, status, and created_at are preserved
/// — edits never move a task through the lifecycle.
pub fn validate_for_edit(existing: &Task, input: &TaskInput, today: NaiveDate) -> ApiResult<Task> {
    let (task_name, due_date, category, importance, comments) = validate_fields(input)?;

    if due_date != existing.due_date && due_date < today {
        return Err(ApiError::invalid_value(
            "dueDate",
            "dueDate must not be in the past",
        ));
    }

    Ok(Task {
        task_id: existing.task_id,
        task_name,
        due_date,
        category,
        importance,
        comments,
        status: existing.status,
        created_at: existing.created_at,
        updated_at: now_ms(),
    })
}
