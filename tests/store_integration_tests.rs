//! Integration tests for the task store gateway.
//!
//! These tests verify the per-user collection operations using an
//! in-memory SQLite database.

use chrono::NaiveDate;
use organizeme::db::Database;
use organizeme::types::{Importance, Task, TaskStatus, new_task_id};

/// Helper to create a fresh in-memory database for testing.
fn setup_db() -> Database {
    Database::open_in_memory().expect("Failed to create in-memory database")
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn sample_task(name: &str) -> Task {
    Task {
        task_id: new_task_id(),
        task_name: name.into(),
        due_date: date(2026, 9, 15),
        category: "work".into(),
        importance: Importance::Medium,
        comments: None,
        status: TaskStatus::Active,
        created_at: 1,
        updated_at: 1,
    }
}

mod user_tests {
    use super::*;

    #[test]
    fn create_user_is_idempotent() {
        let db = setup_db();

        assert!(db.create_user("u1", Some("u1@example.com"), Some("User One")).unwrap());
        assert!(!db.create_user("u1", None, None).unwrap());

        let user = db.get_user("u1").unwrap().unwrap();
        assert_eq!(user.email.as_deref(), Some("u1@example.com"));
        assert_eq!(user.display_name.as_deref(), Some("User One"));
    }

    #[test]
    fn get_user_returns_none_for_unknown_id() {
        let db = setup_db();
        assert!(db.get_user("nobody").unwrap().is_none());
    }
}

mod collection_tests {
    use super::*;

    #[test]
    fn tasks_for_missing_user_is_none() {
        let db = setup_db();
        assert!(db.get_tasks_for_user("nobody").unwrap().is_none());
    }

    #[test]
    fn new_user_starts_with_empty_collection() {
        let db = setup_db();
        db.create_user("u1", None, None).unwrap();
        let tasks = db.get_tasks_for_user("u1").unwrap().unwrap();
        assert!(tasks.is_empty());
    }

    #[test]
    fn append_preserves_insertion_order() {
        let db = setup_db();
        db.create_user("u1", None, None).unwrap();

        for name in ["first", "second", "third"] {
            db.append_task("u1", &sample_task(name)).unwrap();
        }

        let names: Vec<_> = db
            .get_tasks_for_user("u1")
            .unwrap()
            .unwrap()
            .into_iter()
            .map(|t| t.task_name)
            .collect();
        assert_eq!(names, vec!["first", "second", "third"]);
    }

    #[test]
    fn round_trip_preserves_all_fields() {
        let db = setup_db();
        db.create_user("u1", None, None).unwrap();

        let mut task = sample_task("detailed");
        task.comments = Some("call ahead".into());
        task.importance = Importance::High;
        task.status = TaskStatus::NotFinished;
        db.append_task("u1", &task).unwrap();

        let stored = db.get_task("u1", &task.task_id).unwrap().unwrap();
        assert_eq!(stored, task);
    }

    #[test]
    fn collections_are_isolated_per_user() {
        let db = setup_db();
        db.create_user("u1", None, None).unwrap();
        db.create_user("u2", None, None).unwrap();

        db.append_task("u1", &sample_task("mine")).unwrap();

        assert_eq!(db.get_tasks_for_user("u1").unwrap().unwrap().len(), 1);
        assert!(db.get_tasks_for_user("u2").unwrap().unwrap().is_empty());
    }

    #[test]
    fn replace_task_updates_matching_element() {
        let db = setup_db();
        db.create_user("u1", None, None).unwrap();

        let task = sample_task("original");
        db.append_task("u1", &task).unwrap();

        let mut updated = task.clone();
        updated.task_name = "renamed".into();
        updated.status = TaskStatus::Done;
        assert!(db.replace_task("u1", &task.task_id, &updated).unwrap());

        let stored = db.get_task("u1", &task.task_id).unwrap().unwrap();
        assert_eq!(stored.task_name, "renamed");
        assert_eq!(stored.status, TaskStatus::Done);
    }

    #[test]
    fn replace_task_returns_false_for_unknown_id() {
        let db = setup_db();
        db.create_user("u1", None, None).unwrap();

        let ghost = sample_task("ghost");
        assert!(!db.replace_task("u1", &ghost.task_id, &ghost).unwrap());
    }

    #[test]
    fn remove_task_deletes_only_the_matching_element() {
        let db = setup_db();
        db.create_user("u1", None, None).unwrap();

        let keep = sample_task("keep");
        let drop = sample_task("drop");
        db.append_task("u1", &keep).unwrap();
        db.append_task("u1", &drop).unwrap();

        assert!(db.remove_task("u1", &drop.task_id).unwrap());

        let remaining = db.get_tasks_for_user("u1").unwrap().unwrap();
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].task_name, "keep");
    }

    #[test]
    fn remove_unknown_task_leaves_collection_unmodified() {
        let db = setup_db();
        db.create_user("u1", None, None).unwrap();
        db.append_task("u1", &sample_task("survivor")).unwrap();

        assert!(!db.remove_task("u1", &new_task_id()).unwrap());
        assert_eq!(db.get_tasks_for_user("u1").unwrap().unwrap().len(), 1);
    }

    #[test]
    fn replace_all_overwrites_the_whole_collection() {
        let db = setup_db();
        db.create_user("u1", None, None).unwrap();
        db.append_task("u1", &sample_task("old-a")).unwrap();
        db.append_task("u1", &sample_task("old-b")).unwrap();

        let replacement = vec![sample_task("new-a"), sample_task("new-b"), sample_task("new-c")];
        db.replace_all_tasks("u1", &replacement).unwrap();

        let names: Vec<_> = db
            .get_tasks_for_user("u1")
            .unwrap()
            .unwrap()
            .into_iter()
            .map(|t| t.task_name)
            .collect();
        assert_eq!(names, vec!["new-a", "new-b", "new-c"]);
    }
}

mod persistence_tests {
    use super::*;

    #[test]
    fn collection_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tasks.db");

        {
            let db = Database::open(&path).unwrap();
            db.create_user("u1", None, None).unwrap();
            db.append_task("u1", &sample_task("durable")).unwrap();
        }

        let db = Database::open(&path).unwrap();
        let tasks = db.get_tasks_for_user("u1").unwrap().unwrap();
        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0].task_name, "durable");
    }
}
