//! Status transition engine.
//!
//! The only non-trivial business rule in the system: how a task's status
//! evolves with time (the overdue sweep) and user action (the complete
//! command). All functions here are pure over an explicit reference date
//! so the rules can be tested at day granularity without touching a clock.

use chrono::{Days, Local, NaiveDate};

use crate::types::{Task, TaskStatus};

/// The reference date used by commands that run against "now".
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// Current timestamp in milliseconds, for created_at/updated_at bookkeeping.
pub fn now_ms() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// True when a task due on `due_date` counts as overdue on `today`:
/// due yesterday or earlier. A task due today is not yet overdue.
pub fn is_overdue(due_date: NaiveDate, today: NaiveDate) -> bool {
    due_date < today
}

/// Sweep rule for a single task: an overdue task that is not Done becomes
/// Not Finished; everything else keeps its status. Idempotent.
pub fn sweep_status(status: TaskStatus, due_date: NaiveDate, today: NaiveDate) -> TaskStatus {
    match status {
        TaskStatus::Done => TaskStatus::Done,
        TaskStatus::Active | TaskStatus::NotFinished => {
            if is_overdue(due_date, today) {
                TaskStatus::NotFinished
            } else {
                status
            }
        }
    }
}

/// Apply the sweep rule to a whole collection in place.
///
/// Returns the number of tasks whose status changed, so callers can skip
/// the store write-back when nothing moved.
pub fn sweep(tasks: &mut [Task], today: NaiveDate) -> usize {
    let now = now_ms();
    let mut changed = 0;
    for task in tasks.iter_mut() {
        let next = sweep_status(task.status, task.due_date, today);
        if next != task.status {
            task.status = next;
            task.updated_at = now;
            changed += 1;
        }
    }
    changed
}

/// Complete rule: Active or Not Finished becomes Done unconditionally,
/// with no due-date check. Completing a Done task is a no-op; returns
/// whether the status actually changed.
pub fn complete(task: &mut Task) -> bool {
    match task.status {
        TaskStatus::Done => false,
        TaskStatus::Active | TaskStatus::NotFinished => {
            task.status = TaskStatus::Done;
            task.updated_at = now_ms();
            true
        }
    }
}

/// Display urgency bucket derived from days until due. Purely a
/// presentation concern over the same day-granularity contract as the
/// sweep; the UI maps these to row colors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Urgency {
    /// Due within two days (or already past due).
    Imminent,
    /// Due within four days.
    Near,
    /// Further out.
    Distant,
}

/// Bucket a due date by how close it is to `today`.
pub fn urgency(due_date: NaiveDate, today: NaiveDate) -> Urgency {
    let days_until = (due_date - today).num_days();
    if days_until <= 2 {
        Urgency::Imminent
    } else if days_until <= 4 {
        Urgency::Near
    } else {
        Urgency::Distant
    }
}

/// Start of the upcoming-tasks window: yesterday relative to `today`.
pub fn window_start(today: NaiveDate) -> NaiveDate {
    today.checked_sub_days(Days::new(1)).unwrap_or(today)
}

/// End of the upcoming-tasks window: nine days after the window start.
pub fn window_end(today: NaiveDate) -> NaiveDate {
    window_start(today)
        .checked_add_days(Days::new(9))
        .unwrap_or(today)
}
