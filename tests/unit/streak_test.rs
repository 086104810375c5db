//! Unit tests for streak transitions.

use chrono::NaiveDate;
use studyhub::gamification::{advance_streak, StreakStatus};

fn day(s: &str) -> NaiveDate {
    s.parse().unwrap()
}

#[test]
fn test_week_of_daily_activity() {
    let mut current = 0;
    let mut longest = 0;
    let mut last = None;

    let start = day("2025-06-01");
    for offset in 0..7 {
        let today = start + chrono::Duration::days(offset);
        let t = advance_streak(current, longest, last, today);
        current = t.current_streak;
        longest = t.longest_streak;
        last = Some(t.last_activity_date);

        if offset == 0 {
            assert_eq!(t.status, StreakStatus::Reset);
        } else {
            assert_eq!(t.status, StreakStatus::Continued);
        }
        assert!(longest >= current);
    }

    assert_eq!(current, 7);
    assert_eq!(longest, 7);
}

#[test]
fn test_longest_streak_never_decreases() {
    // Build a 3-day streak, break it, rebuild
    let t1 = advance_streak(0, 0, None, day("2025-06-01"));
    let t2 = advance_streak(t1.current_streak, t1.longest_streak, Some(day("2025-06-01")), day("2025-06-02"));
    let t3 = advance_streak(t2.current_streak, t2.longest_streak, Some(day("2025-06-02")), day("2025-06-03"));
    assert_eq!(t3.current_streak, 3);
    assert_eq!(t3.longest_streak, 3);

    let t4 = advance_streak(t3.current_streak, t3.longest_streak, Some(day("2025-06-03")), day("2025-06-10"));
    assert_eq!(t4.status, StreakStatus::Reset);
    assert_eq!(t4.current_streak, 1);
    assert_eq!(t4.longest_streak, 3);
}

#[test]
fn test_year_boundary_continues() {
    let t = advance_streak(5, 5, Some(day("2024-12-31")), day("2025-01-01"));
    assert_eq!(t.status, StreakStatus::Continued);
    assert_eq!(t.current_streak, 6);
}
