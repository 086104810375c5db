//! Tests that gamification and progress state survive a reopen.

use std::sync::Arc;

use studyhub::config::{activity, GamificationConfig};
use studyhub::gamification::GamificationEngine;
use studyhub::progress::ProgressTracker;
use studyhub::storage::Database;

#[test]
fn test_state_survives_database_reopen() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("studyhub.db");

    {
        let db = Arc::new(Database::open(&path).expect("open database"));
        let engine = GamificationEngine::new(db.clone(), GamificationConfig::default());
        let tracker = ProgressTracker::new(db);

        engine
            .award_xp("alice", activity::GRAPH_CREATION, None)
            .unwrap();
        engine.update_streak("alice").unwrap();
        tracker
            .record_quiz_attempt(
                "alice",
                "algebra",
                "easy",
                &["Q1".to_string()],
                &["x".to_string()],
                &["x".to_string()],
            )
            .unwrap();
    }

    // Reopen and verify everything is still there
    let db = Arc::new(Database::open(&path).expect("reopen database"));
    let engine = GamificationEngine::new(db.clone(), GamificationConfig::default());
    let tracker = ProgressTracker::new(db);

    let summary = engine.get_student_gamification("alice").unwrap();
    assert_eq!(summary.total_xp, 100);
    assert_eq!(summary.level, 2);
    assert_eq!(summary.current_streak, 1);
    assert_eq!(summary.recent_transactions.len(), 1);

    let analytics = tracker.get_student_analytics("alice").unwrap();
    assert_eq!(analytics.total_attempts, 1);
    assert_eq!(analytics.overall_accuracy, 100.0);
}
