//! Read-side views over a user's task collection.
//!
//! Every function here derives a view without mutating the underlying
//! collection. Callers run the sweep first where the view is supposed to
//! reflect up-to-date statuses.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::Serialize;

use crate::lifecycle::{Urgency, urgency, window_end, window_start};
use crate::types::{Importance, Task, TaskStatus, YearStatistics};

/// Partition tasks into category buckets. Buckets are derived from the
/// data, not a fixed list; insertion order is preserved within each
/// bucket. The partition preserves the total task count.
pub fn group_by_category(tasks: &[Task]) -> BTreeMap<String, Vec<Task>> {
    let mut buckets: BTreeMap<String, Vec<Task>> = BTreeMap::new();
    for task in tasks {
        buckets
            .entry(task.category.clone())
            .or_default()
            .push(task.clone());
    }
    buckets
}

/// A task in the upcoming window, annotated with its urgency bucket so
/// the home-page table can style rows without redoing date math.
#[derive(Debug, Clone, Serialize)]
pub struct UpcomingTask {
    #[serde(flatten)]
    pub task: Task,
    pub urgency: Urgency,
}

/// Active tasks due within the upcoming window (yesterday through nine
/// days after yesterday), sorted by due date ascending. Drives the
/// home-page urgent-tasks table.
pub fn upcoming_active(tasks: &[Task], today: NaiveDate) -> Vec<UpcomingTask> {
    let start = window_start(today);
    let end = window_end(today);
    let mut out: Vec<Task> = tasks
        .iter()
        .filter(|t| t.status == TaskStatus::Active && t.due_date >= start && t.due_date <= end)
        .cloned()
        .collect();
    out.sort_by_key(|t| t.due_date);
    out.into_iter()
        .map(|task| UpcomingTask {
            urgency: urgency(task.due_date, today),
            task,
        })
        .collect()
}

/// Multi-axis filter. An empty constraint set matches everything on that
/// axis. Sorted by status rank (Active, Not Finished, Done) and then due
/// date ascending.
pub fn filter_tasks(
    tasks: &[Task],
    statuses: &[TaskStatus],
    importances: &[Importance],
    start_date: Option<NaiveDate>,
    end_date: Option<NaiveDate>,
) -> Vec<Task> {
    let mut out: Vec<Task> = tasks
        .iter()
        .filter(|t| statuses.is_empty() || statuses.contains(&t.status))
        .filter(|t| importances.is_empty() || importances.contains(&t.importance))
        .filter(|t| start_date.is_none_or(|start| t.due_date >= start))
        .filter(|t| end_date.is_none_or(|end| t.due_date <= end))
        .cloned()
        .collect();
    out.sort_by_key(|t| (t.status.sort_rank(), t.due_date));
    out
}

/// Case-insensitive substring search over category and task name,
/// evaluated per category bucket: a bucket whose category matches
/// contributes all of its tasks, then name matches are appended.
///
/// The two match lists are concatenated without dedup, matching the
/// observed behavior of the original client: a task whose category and
/// name both match appears twice.
pub fn search(tasks_by_category: &BTreeMap<String, Vec<Task>>, query: &str) -> Vec<Task> {
    let query = query.trim().to_lowercase();
    let mut out = Vec::new();
    for (category, tasks) in tasks_by_category {
        if category.to_lowercase().contains(&query) {
            out.extend(tasks.iter().cloned());
        }
        out.extend(
            tasks
                .iter()
                .filter(|t| t.task_name.to_lowercase().contains(&query))
                .cloned(),
        );
    }
    out
}

/// The full collection sorted by due date, for the calendar view.
pub fn calendar(tasks: &[Task]) -> Vec<Task> {
    let mut out = tasks.to_vec();
    out.sort_by_key(|t| t.due_date);
    out
}

/// Per-status counts for tasks whose due date falls in `year`. The
/// distinct category list spans the whole collection, not just the year.
pub fn year_statistics(tasks: &[Task], year: i32) -> YearStatistics {
    let mut stats = YearStatistics {
        year,
        total: 0,
        active: 0,
        not_finished: 0,
        done: 0,
        categories: Vec::new(),
    };

    for task in tasks {
        if chrono::Datelike::year(&task.due_date) == year {
            stats.total += 1;
            match task.status {
                TaskStatus::Active => stats.active += 1,
                TaskStatus::NotFinished => stats.not_finished += 1,
                TaskStatus::Done => stats.done += 1,
            }
        }
        if !stats.categories.contains(&task.category) {
            stats.categories.push(task.category.clone());
        }
    }

    stats
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::new_task_id;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn task(name: &str, category: &str, due: NaiveDate, status: TaskStatus) -> Task {
        Task {
            task_id: new_task_id(),
            task_name: name.into(),
            due_date: due,
            category: category.into(),
            importance: Importance::Medium,
            comments: None,
            status,
            created_at: 0,
            updated_at: 0,
        }
    }

    fn with_importance(mut t: Task, importance: Importance) -> Task {
        t.importance = importance;
        t
    }

    #[test]
    fn grouping_preserves_total_count_and_bucket_order() {
        let tasks = vec![
            task("a", "work", date(2024, 6, 1), TaskStatus::Active),
            task("b", "school", date(2024, 6, 2), TaskStatus::Active),
            task("c", "work", date(2024, 6, 3), TaskStatus::Done),
        ];
        let grouped = group_by_category(&tasks);

        let total: usize = grouped.values().map(Vec::len).sum();
        assert_eq!(total, tasks.len());

        let work = &grouped["work"];
        assert_eq!(work[0].task_name, "a");
        assert_eq!(work[1].task_name, "c");
    }

    #[test]
    fn upcoming_includes_window_edges_and_excludes_beyond() {
        let today = date(2024, 6, 1);
        // Window is [2024-05-31, 2024-06-09].
        let tasks = vec![
            task("edge-start", "work", date(2024, 5, 31), TaskStatus::Active),
            task("edge-end", "work", date(2024, 6, 9), TaskStatus::Active),
            task("beyond", "work", date(2024, 6, 10), TaskStatus::Active),
            task("before", "work", date(2024, 5, 30), TaskStatus::Active),
        ];
        let names: Vec<_> = upcoming_active(&tasks, today)
            .into_iter()
            .map(|t| t.task.task_name)
            .collect();
        assert_eq!(names, vec!["edge-start", "edge-end"]);
    }

    #[test]
    fn upcoming_excludes_non_active_statuses() {
        let today = date(2024, 6, 1);
        let tasks = vec![
            task("done", "work", date(2024, 6, 3), TaskStatus::Done),
            task("missed", "work", date(2024, 6, 3), TaskStatus::NotFinished),
            task("live", "work", date(2024, 6, 3), TaskStatus::Active),
        ];
        let names: Vec<_> = upcoming_active(&tasks, today)
            .into_iter()
            .map(|t| t.task.task_name)
            .collect();
        assert_eq!(names, vec!["live"]);
    }

    #[test]
    fn upcoming_sorts_by_due_date_ascending() {
        let today = date(2024, 6, 1);
        let tasks = vec![
            task("later", "work", date(2024, 6, 8), TaskStatus::Active),
            task("sooner", "work", date(2024, 6, 2), TaskStatus::Active),
        ];
        let names: Vec<_> = upcoming_active(&tasks, today)
            .into_iter()
            .map(|t| t.task.task_name)
            .collect();
        assert_eq!(names, vec!["sooner", "later"]);
    }

    #[test]
    fn upcoming_annotates_each_task_with_its_urgency_bucket() {
        let today = date(2024, 6, 1);
        let tasks = vec![
            task("soon", "work", date(2024, 6, 2), TaskStatus::Active),
            task("near", "work", date(2024, 6, 5), TaskStatus::Active),
            task("far", "work", date(2024, 6, 9), TaskStatus::Active),
        ];
        let buckets: Vec<_> = upcoming_active(&tasks, today)
            .into_iter()
            .map(|t| t.urgency)
            .collect();
        assert_eq!(buckets, vec![Urgency::Imminent, Urgency::Near, Urgency::Distant]);
    }

    #[test]
    fn empty_filter_returns_all_tasks() {
        let tasks = vec![
            task("a", "work", date(2024, 6, 1), TaskStatus::Done),
            task("b", "work", date(2024, 6, 2), TaskStatus::Active),
            task("c", "work", date(2024, 6, 3), TaskStatus::NotFinished),
        ];
        let result = filter_tasks(&tasks, &[], &[], None, None);
        assert_eq!(result.len(), tasks.len());
    }

    #[test]
    fn filter_sorts_by_status_then_due_date() {
        let tasks = vec![
            task("done-early", "work", date(2024, 6, 1), TaskStatus::Done),
            task("active-late", "work", date(2024, 6, 9), TaskStatus::Active),
            task("active-early", "work", date(2024, 6, 2), TaskStatus::Active),
            task("missed", "work", date(2024, 6, 1), TaskStatus::NotFinished),
        ];
        let names: Vec<_> = filter_tasks(&tasks, &[], &[], None, None)
            .into_iter()
            .map(|t| t.task_name)
            .collect();
        assert_eq!(names, vec!["active-early", "active-late", "missed", "done-early"]);
    }

    #[test]
    fn filter_applies_all_provided_axes() {
        let tasks = vec![
            with_importance(
                task("hit", "work", date(2024, 6, 5), TaskStatus::Active),
                Importance::High,
            ),
            with_importance(
                task("wrong-importance", "work", date(2024, 6, 5), TaskStatus::Active),
                Importance::Low,
            ),
            with_importance(
                task("wrong-status", "work", date(2024, 6, 5), TaskStatus::Done),
                Importance::High,
            ),
            with_importance(
                task("out-of-range", "work", date(2024, 7, 5), TaskStatus::Active),
                Importance::High,
            ),
        ];
        let names: Vec<_> = filter_tasks(
            &tasks,
            &[TaskStatus::Active],
            &[Importance::High],
            Some(date(2024, 6, 1)),
            Some(date(2024, 6, 30)),
        )
        .into_iter()
        .map(|t| t.task_name)
        .collect();
        assert_eq!(names, vec!["hit"]);
    }

    #[test]
    fn search_matches_name_and_category_case_insensitively() {
        let tasks = vec![
            task("Write Report", "work", date(2024, 6, 1), TaskStatus::Active),
            task("groceries", "personal", date(2024, 6, 1), TaskStatus::Active),
        ];
        let grouped = group_by_category(&tasks);

        let by_name = search(&grouped, "report");
        assert_eq!(by_name.len(), 1);
        assert_eq!(by_name[0].task_name, "Write Report");

        let by_category = search(&grouped, "PERSONAL");
        assert_eq!(by_category.len(), 1);
        assert_eq!(by_category[0].task_name, "groceries");
    }

    #[test]
    fn search_duplicates_a_task_matching_both_axes() {
        // Observed behavior of the original client: category matches and
        // name matches are concatenated without dedup.
        let tasks = vec![task("work on thesis", "work", date(2024, 6, 1), TaskStatus::Active)];
        let grouped = group_by_category(&tasks);
        let results = search(&grouped, "work");
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].task_id, results[1].task_id);
    }

    #[test]
    fn year_statistics_counts_by_status_within_year() {
        let tasks = vec![
            task("a", "work", date(2024, 3, 1), TaskStatus::Active),
            task("b", "work", date(2024, 4, 1), TaskStatus::Done),
            task("c", "school", date(2024, 5, 1), TaskStatus::NotFinished),
            task("d", "hobby", date(2023, 5, 1), TaskStatus::Done),
        ];
        let stats = year_statistics(&tasks, 2024);
        assert_eq!(stats.total, 3);
        assert_eq!(stats.active, 1);
        assert_eq!(stats.not_finished, 1);
        assert_eq!(stats.done, 1);
        // Categories span the whole collection, including the 2023 task.
        assert_eq!(stats.categories, vec!["work", "school", "hobby"]);
    }

    #[test]
    fn calendar_sorts_all_tasks_by_due_date() {
        let tasks = vec![
            task("late", "work", date(2024, 9, 1), TaskStatus::Done),
            task("early", "work", date(2024, 2, 1), TaskStatus::Active),
        ];
        let names: Vec<_> = calendar(&tasks).into_iter().map(|t| t.task_name).collect();
        assert_eq!(names, vec!["early", "late"]);
    }
}
