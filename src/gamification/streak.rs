//! Calendar-day streak tracking.
//!
//! A streak counts consecutive UTC calendar days with at least one
//! qualifying activity. The transition is keyed purely by the distance
//! between the last recorded activity day and today: same day is a no-op,
//! exactly one day continues the streak, anything else resets it to 1.
//! Activity at 23:59 followed by 00:01 the next day is a legitimate
//! continuation; there is no rolling-24h window.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Outcome tag for a streak update.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StreakStatus {
    /// Already active today; nothing changed.
    AlreadyCounted,
    /// Active yesterday; streak extended by one.
    Continued,
    /// Gap of two or more days, or first-ever activity; streak restarted at 1.
    Reset,
}

impl StreakStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            StreakStatus::AlreadyCounted => "already_counted",
            StreakStatus::Continued => "continued",
            StreakStatus::Reset => "reset",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "already_counted" => Some(StreakStatus::AlreadyCounted),
            "continued" => Some(StreakStatus::Continued),
            "reset" => Some(StreakStatus::Reset),
            _ => None,
        }
    }
}

/// Result of applying one day of activity to a streak.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StreakTransition {
    pub current_streak: u32,
    pub longest_streak: u32,
    pub status: StreakStatus,
    /// New last-activity day to persist (unchanged when already counted).
    pub last_activity_date: NaiveDate,
}

/// Apply today's activity to the streak state.
///
/// Longest streak never decreases and never drops below the current streak,
/// so a first-ever activity yields current 1 / longest 1.
pub fn advance_streak(
    current_streak: u32,
    longest_streak: u32,
    last_activity_date: Option<NaiveDate>,
    today: NaiveDate,
) -> StreakTransition {
    match last_activity_date {
        Some(last) if last == today => StreakTransition {
            current_streak,
            longest_streak,
            status: StreakStatus::AlreadyCounted,
            last_activity_date: last,
        },
        Some(last) if today - last == chrono::Duration::days(1) => {
            let current = current_streak + 1;
            StreakTransition {
                current_streak: current,
                longest_streak: longest_streak.max(current),
                status: StreakStatus::Continued,
                last_activity_date: today,
            }
        }
        _ => StreakTransition {
            current_streak: 1,
            longest_streak: longest_streak.max(1),
            status: StreakStatus::Reset,
            last_activity_date: today,
        },
    }
}
