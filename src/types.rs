//! Core types for the OrganizeMe task service.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Maximum length of a task name.
pub const MAX_TASK_NAME_LEN: usize = 30;

/// Maximum length of the optional comments field.
pub const MAX_COMMENTS_LEN: usize = 130;

/// Lifecycle status of a task.
///
/// `Active` is the only state a task can be created in. `NotFinished` is
/// reached automatically by the overdue sweep; `Done` only by an explicit
/// complete command. There is no reopen path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TaskStatus {
    Active,
    #[serde(rename = "Not Finished")]
    NotFinished,
    Done,
}

impl TaskStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::Active => "Active",
            TaskStatus::NotFinished => "Not Finished",
            TaskStatus::Done => "Done",
        }
    }

    /// Parse a status label, case-insensitively. Accepts both the wire
    /// form ("Not Finished") and a snake_case form ("not_finished").
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "active" => Some(TaskStatus::Active),
            "not finished" | "not_finished" => Some(TaskStatus::NotFinished),
            "done" => Some(TaskStatus::Done),
            _ => None,
        }
    }

    /// Display ordering: Active sorts before Not Finished, which sorts
    /// before Done.
    pub fn sort_rank(&self) -> u8 {
        match self {
            TaskStatus::Active => 0,
            TaskStatus::NotFinished => 1,
            TaskStatus::Done => 2,
        }
    }
}

/// Three-level priority label, independent of status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Importance {
    Low,
    Medium,
    High,
}

impl Importance {
    pub fn as_str(&self) -> &'static str {
        match self {
            Importance::Low => "low",
            Importance::Medium => "medium",
            Importance::High => "high",
        }
    }

    /// Parse an importance label, case-insensitively. The original UI
    /// sends "Low"/"Medium"/"High" in filters but stores lowercase.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "low" => Some(Importance::Low),
            "medium" => Some(Importance::Medium),
            "high" => Some(Importance::High),
            _ => None,
        }
    }
}

/// A user-owned unit of work.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub task_id: Uuid,
    pub task_name: String,
    /// Due date at day granularity; no time-of-day component.
    pub due_date: NaiveDate,
    /// Free-form grouping label. The UI constrains it to a fixed set but
    /// buckets are derived from the data, so any string is accepted here.
    pub category: String,
    pub importance: Importance,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comments: Option<String>,
    pub status: TaskStatus,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Raw task payload from the client, for create and edit commands.
///
/// All fields are optional so that validation can report exactly which
/// required field is missing instead of failing at deserialization.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskInput {
    pub task_name: Option<String>,
    pub due_date: Option<NaiveDate>,
    pub category: Option<String>,
    pub importance: Option<String>,
    pub comments: Option<String>,
}

/// Signup payload. Identity is established by the external auth provider;
/// the service only records the opaque user id and profile fields.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignupInput {
    pub user_id: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub display_name: Option<String>,
}

/// User profile with the full task collection, as returned by the
/// profile endpoint (drives the statistics page).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub user_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    pub tasks: Vec<Task>,
}

/// Per-status task counts for one calendar year, plus the distinct
/// category list across the full collection (not year-filtered, so the
/// category chart selector always shows every category in use).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct YearStatistics {
    pub year: i32,
    pub total: i64,
    pub active: i64,
    pub not_finished: i64,
    pub done: i64,
    pub categories: Vec<String>,
}

/// Fresh task id. UUID v7 so ids within one user's collection also sort
/// by creation time.
pub fn new_task_id() -> Uuid {
    Uuid::now_v7()
}
