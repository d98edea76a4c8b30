//! Command/query facade tying the store gateway to the lifecycle engine
//! and the read-side views.
//!
//! Every operation takes an explicit [`UserContext`] rather than reading
//! ambient identity state. Commands never mutate local state before the
//! store confirms the write; callers receive the updated record (or
//! re-fetch) instead of patching optimistically.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use tracing::{debug, info};
use uuid::Uuid;

use crate::db::Database;
use crate::error::{ApiError, ApiResult};
use crate::lifecycle;
use crate::model;
use crate::query;
use crate::types::{
    Importance, SignupInput, Task, TaskInput, TaskStatus, UserProfile, YearStatistics,
};

/// Identity for one request, established at session start by the caller
/// (the auth provider integration lives outside this service).
#[derive(Debug, Clone)]
pub struct UserContext {
    pub user_id: String,
}

impl UserContext {
    pub fn new(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
        }
    }
}

/// Parsed constraints for the multi-axis filter query. Unknown labels are
/// rejected: an empty constraint set means "match everything" on that
/// axis, so silently dropping a typo'd label would widen the result set
/// instead of narrowing it.
#[derive(Debug, Clone, Default)]
pub struct FilterParams {
    pub statuses: Vec<TaskStatus>,
    pub importances: Vec<Importance>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

fn parse_labels<T>(
    raw: Option<&str>,
    field: &str,
    parse: impl Fn(&str) -> Option<T>,
) -> ApiResult<Vec<T>> {
    raw.unwrap_or_default()
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| {
            parse(s).ok_or_else(|| {
                ApiError::invalid_value(field, format!("unknown label '{}'", s))
            })
        })
        .collect()
}

impl FilterParams {
    /// Build from comma-separated label lists as sent by the client.
    pub fn from_labels(
        statuses: Option<&str>,
        importances: Option<&str>,
        start_date: Option<NaiveDate>,
        end_date: Option<NaiveDate>,
    ) -> ApiResult<Self> {
        if let (Some(start), Some(end)) = (start_date, end_date) {
            if start > end {
                return Err(ApiError::invalid_value("startDate", "invalid date range"));
            }
        }
        Ok(Self {
            statuses: parse_labels(statuses, "statuses", TaskStatus::parse)?,
            importances: parse_labels(importances, "importances", Importance::parse)?,
            start_date,
            end_date,
        })
    }
}

/// The task service: all commands and queries the presentation layer can
/// issue against a user's collection.
#[derive(Clone)]
pub struct TaskService {
    db: Database,
}

impl TaskService {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// Direct access to the underlying store, for maintenance tooling and
    /// tests that need to seed historical data.
    pub fn database(&self) -> &Database {
        &self.db
    }

    /// Register a user document. Idempotent: signing up twice is a no-op.
    pub fn signup(&self, input: &SignupInput) -> ApiResult<()> {
        if input.user_id.trim().is_empty() {
            return Err(ApiError::missing_field("userId"));
        }
        let created = self.db.create_user(
            &input.user_id,
            input.email.as_deref(),
            input.display_name.as_deref(),
        )?;
        if created {
            info!(user_id = %input.user_id, "User registered");
        } else {
            debug!(user_id = %input.user_id, "User already registered");
        }
        Ok(())
    }

    /// Fetch a user's tasks, failing with UserNotFound when no document
    /// exists.
    fn tasks_for(&self, ctx: &UserContext) -> ApiResult<Vec<Task>> {
        self.db
            .get_tasks_for_user(&ctx.user_id)?
            .ok_or_else(|| ApiError::user_not_found(&ctx.user_id))
    }

    // ---- Commands -------------------------------------------------------

    /// Validate and append a new task. Status is forced to Active and a
    /// fresh id is generated.
    pub fn create_task(&self, ctx: &UserContext, input: &TaskInput) -> ApiResult<Task> {
        if !self.db.user_exists(&ctx.user_id)? {
            return Err(ApiError::user_not_found(&ctx.user_id));
        }
        let task = model::validate_for_create(input, lifecycle::today())?;
        self.db.append_task(&ctx.user_id, &task)?;
        info!(user_id = %ctx.user_id, task_id = %task.task_id, "Task created");
        Ok(task)
    }

    /// Validated edit; the id and status are preserved (edits never move
    /// a task through the lifecycle).
    pub fn edit_task(&self, ctx: &UserContext, task_id: &Uuid, input: &TaskInput) -> ApiResult<Task> {
        let existing = self
            .db
            .get_task(&ctx.user_id, task_id)?
            .ok_or_else(|| ApiError::task_not_found(&task_id.to_string()))?;
        let merged = model::validate_for_edit(&existing, input, lifecycle::today())?;
        if !self.db.replace_task(&ctx.user_id, task_id, &merged)? {
            // Deleted between fetch and write; last write wins applies.
            return Err(ApiError::task_not_found(&task_id.to_string()));
        }
        debug!(user_id = %ctx.user_id, task_id = %task_id, "Task updated");
        Ok(merged)
    }

    /// Remove a task. Fails with TaskNotFound when absent, leaving the
    /// collection unmodified.
    pub fn delete_task(&self, ctx: &UserContext, task_id: &Uuid) -> ApiResult<()> {
        if !self.db.remove_task(&ctx.user_id, task_id)? {
            return Err(ApiError::task_not_found(&task_id.to_string()));
        }
        info!(user_id = %ctx.user_id, task_id = %task_id, "Task deleted");
        Ok(())
    }

    /// Complete rule: force Done regardless of prior status or due date.
    /// Completing an already-Done task is observably a no-op.
    pub fn complete_task(&self, ctx: &UserContext, task_id: &Uuid) -> ApiResult<Task> {
        let mut task = self
            .db
            .get_task(&ctx.user_id, task_id)?
            .ok_or_else(|| ApiError::task_not_found(&task_id.to_string()))?;
        if lifecycle::complete(&mut task) {
            if !self.db.replace_task(&ctx.user_id, task_id, &task)? {
                // Deleted between fetch and write; last write wins applies.
                return Err(ApiError::task_not_found(&task_id.to_string()));
            }
            info!(user_id = %ctx.user_id, task_id = %task_id, "Task completed");
        }
        Ok(task)
    }

    /// The overdue sweep: mark every overdue, non-Done task Not Finished
    /// and write the collection back only when something changed.
    /// Returns the number of tasks transitioned.
    pub fn sweep(&self, ctx: &UserContext) -> ApiResult<usize> {
        let mut tasks = self.tasks_for(ctx)?;
        let changed = lifecycle::sweep(&mut tasks, lifecycle::today());
        if changed > 0 {
            self.db.replace_all_tasks(&ctx.user_id, &tasks)?;
            info!(user_id = %ctx.user_id, changed, "Sweep marked overdue tasks Not Finished");
        }
        Ok(changed)
    }

    // ---- Queries --------------------------------------------------------

    /// Category buckets over the full collection.
    pub fn list_by_category(&self, ctx: &UserContext) -> ApiResult<BTreeMap<String, Vec<Task>>> {
        Ok(query::group_by_category(&self.tasks_for(ctx)?))
    }

    /// Active tasks in the upcoming window, annotated with urgency, for
    /// the home page. Runs the sweep first so the view never shows stale
    /// Active statuses.
    pub fn list_upcoming_active(&self, ctx: &UserContext) -> ApiResult<Vec<query::UpcomingTask>> {
        self.sweep(ctx)?;
        Ok(query::upcoming_active(
            &self.tasks_for(ctx)?,
            lifecycle::today(),
        ))
    }

    /// Full collection by due date, for the calendar view.
    pub fn list_calendar(&self, ctx: &UserContext) -> ApiResult<Vec<Task>> {
        Ok(query::calendar(&self.tasks_for(ctx)?))
    }

    /// Name-or-category search. An empty query is a validation error
    /// rather than a match-everything.
    pub fn search(&self, ctx: &UserContext, raw_query: &str) -> ApiResult<Vec<Task>> {
        if raw_query.trim().is_empty() {
            return Err(ApiError::missing_field("query"));
        }
        let grouped = query::group_by_category(&self.tasks_for(ctx)?);
        Ok(query::search(&grouped, raw_query))
    }

    /// Multi-axis filter over status, importance, and due-date range.
    pub fn filter(&self, ctx: &UserContext, params: &FilterParams) -> ApiResult<Vec<Task>> {
        Ok(query::filter_tasks(
            &self.tasks_for(ctx)?,
            &params.statuses,
            &params.importances,
            params.start_date,
            params.end_date,
        ))
    }

    /// Year-bounded statistics for the profile page.
    pub fn year_statistics(&self, ctx: &UserContext, year: i32) -> ApiResult<YearStatistics> {
        Ok(query::year_statistics(&self.tasks_for(ctx)?, year))
    }

    /// Profile fields plus the full task collection.
    pub fn profile(&self, ctx: &UserContext) -> ApiResult<UserProfile> {
        let user = self
            .db
            .get_user(&ctx.user_id)?
            .ok_or_else(|| ApiError::user_not_found(&ctx.user_id))?;
        let tasks = self.tasks_for(ctx)?;
        Ok(UserProfile {
            user_id: user.id,
            email: user.email,
            display_name: user.display_name,
            tasks,
        })
    }
}
