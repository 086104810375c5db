//! Integration tests for quiz attempt recording and analytics.

use std::sync::Arc;

use studyhub::config::{activity, GamificationConfig};
use studyhub::gamification::GamificationEngine;
use studyhub::progress::{ProgressError, ProgressTracker};
use studyhub::storage::{Database, ProgressStore};

fn tracker() -> ProgressTracker {
    let db = Arc::new(Database::open_in_memory().expect("in-memory database"));
    ProgressTracker::new(db)
}

fn tracker_with_db() -> (ProgressTracker, Arc<Database>) {
    let db = Arc::new(Database::open_in_memory().expect("in-memory database"));
    (ProgressTracker::new(db.clone()), db)
}

fn strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|s| s.to_string()).collect()
}

#[test]
fn test_mismatched_lengths_are_rejected() {
    let tracker = tracker();

    let result = tracker.record_quiz_attempt(
        "alice",
        "algebra",
        "easy",
        &strings(&["Q1", "Q2"]),
        &strings(&["a1"]),
        &strings(&["A1", "A2"]),
    );

    assert!(matches!(result, Err(ProgressError::Validation(_))));

    // Nothing was committed
    let analytics = tracker.get_student_analytics("alice").unwrap();
    assert_eq!(analytics.total_attempts, 0);
}

#[test]
fn test_answers_compared_normalized() {
    let tracker = tracker();

    let outcome = tracker
        .record_quiz_attempt(
            "alice",
            "algebra",
            "easy",
            &strings(&["Q1", "Q2"]),
            &strings(&["a1", " A2 "]),
            &strings(&["A1", "a2"]),
        )
        .unwrap();

    assert_eq!(outcome.correct_count, 2);
    assert_eq!(outcome.total_questions, 2);
    assert_eq!(outcome.accuracy, 100.0);
    assert!(outcome.quiz_id.starts_with("quiz_"));
}

#[test]
fn test_empty_quiz_scores_zero_accuracy() {
    let tracker = tracker();

    let outcome = tracker
        .record_quiz_attempt("alice", "algebra", "easy", &[], &[], &[])
        .unwrap();

    assert_eq!(outcome.total_questions, 0);
    assert_eq!(outcome.accuracy, 0.0);
}

#[test]
fn test_quiz_ids_are_unique() {
    let tracker = tracker();

    let a = tracker
        .record_quiz_attempt(
            "alice",
            "algebra",
            "easy",
            &strings(&["Q1"]),
            &strings(&["x"]),
            &strings(&["x"]),
        )
        .unwrap();
    let b = tracker
        .record_quiz_attempt(
            "alice",
            "algebra",
            "easy",
            &strings(&["Q1"]),
            &strings(&["x"]),
            &strings(&["x"]),
        )
        .unwrap();

    assert_ne!(a.quiz_id, b.quiz_id);
}

#[test]
fn test_analytics_for_student_with_no_attempts() {
    let tracker = tracker();

    let analytics = tracker.get_student_analytics("nobody").unwrap();
    assert_eq!(analytics.overall_accuracy, 0.0);
    assert_eq!(analytics.total_attempts, 0);
    assert!(analytics.topics.is_empty());
    assert!(analytics.weekly_trend.is_empty());
    assert_eq!(analytics.strongest_topic, "N/A");
    assert_eq!(analytics.weakest_topic, "N/A");
}

#[test]
fn test_recorded_attempt_is_reflected_immediately() {
    let tracker = tracker();

    tracker
        .record_quiz_attempt(
            "bob",
            "biology",
            "medium",
            &strings(&["Q1", "Q2", "Q3", "Q4"]),
            &strings(&["a", "b", "wrong", "d"]),
            &strings(&["a", "b", "c", "d"]),
        )
        .unwrap();

    let analytics = tracker.get_student_analytics("bob").unwrap();
    assert_eq!(analytics.total_attempts, 1);
    assert_eq!(analytics.overall_accuracy, 75.0);
    assert_eq!(analytics.topics.len(), 1);
    assert_eq!(analytics.topics[0].topic, "biology");
    assert_eq!(analytics.topics[0].accuracy, 75.0);
    assert_eq!(analytics.strongest_topic, "biology");
    assert_eq!(analytics.weakest_topic, "biology");
    assert_eq!(analytics.difficulty_distribution["medium"], 1);

    // Today's trend entry carries the attempt
    let today = analytics.weekly_trend.last().unwrap();
    assert_eq!(today.attempts, 1);
    assert_eq!(today.accuracy, 75.0);
}

#[test]
fn test_topic_rollup_tracks_raw_history() {
    let (tracker, db) = tracker_with_db();

    for _ in 0..3 {
        tracker
            .record_quiz_attempt(
                "carol",
                "chemistry",
                "hard",
                &strings(&["Q1", "Q2"]),
                &strings(&["a", "wrong"]),
                &strings(&["a", "b"]),
            )
            .unwrap();
    }

    let conn = db.connection();
    let store = ProgressStore::new(&conn);
    let rollup = store
        .get_topic_performance("carol", "chemistry")
        .unwrap()
        .expect("rollup exists");

    assert_eq!(rollup.total_attempts, 3);
    assert_eq!(rollup.correct_answers, 3);
    assert_eq!(rollup.difficulty_distribution["hard"], 3);
}

#[test]
fn test_strongest_and_weakest_across_topics() {
    let tracker = tracker();

    tracker
        .record_quiz_attempt(
            "dave",
            "history",
            "easy",
            &strings(&["Q1", "Q2"]),
            &strings(&["a", "b"]),
            &strings(&["a", "b"]),
        )
        .unwrap();
    tracker
        .record_quiz_attempt(
            "dave",
            "geography",
            "easy",
            &strings(&["Q1", "Q2"]),
            &strings(&["a", "wrong"]),
            &strings(&["a", "b"]),
        )
        .unwrap();

    let analytics = tracker.get_student_analytics("dave").unwrap();
    assert_eq!(analytics.strongest_topic, "history");
    assert_eq!(analytics.weakest_topic, "geography");
}

#[test]
fn test_perfect_quizzes_unlock_perfectionist_badge() {
    let db = Arc::new(Database::open_in_memory().expect("in-memory database"));
    let tracker = ProgressTracker::new(db.clone());
    let engine = GamificationEngine::new(db, GamificationConfig::default());

    for _ in 0..10 {
        tracker
            .record_quiz_attempt(
                "erin",
                "physics",
                "hard",
                &strings(&["Q1"]),
                &strings(&["42"]),
                &strings(&["42"]),
            )
            .unwrap();
        engine
            .award_xp("erin", activity::QUIZ_COMPLETION, None)
            .unwrap();
    }

    let outcome = engine.check_and_award_badges("erin").unwrap();
    assert!(outcome.new_badges.contains(&"PERFECTIONIST".to_string()));
}
