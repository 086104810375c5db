//! Core types for gamification features.
//!
//! Defines student profiles, the XP ledger record, earned badges, and the
//! result payloads returned by the engine operations.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::streak::StreakStatus;

/// Per-student gamification profile.
///
/// `level` is always derived from `total_xp` via the level table after any
/// mutation, and `longest_streak` never drops below `current_streak`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StudentProfile {
    pub student_id: String,
    pub total_xp: i64,
    pub level: u32,
    pub current_streak: u32,
    pub longest_streak: u32,
    /// UTC calendar day of the most recent streak-qualifying activity.
    pub last_activity_date: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl StudentProfile {
    /// Create a new zero-state profile.
    pub fn new(student_id: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            student_id: student_id.into(),
            total_xp: 0,
            level: 1,
            current_streak: 0,
            longest_streak: 0,
            last_activity_date: None,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Immutable XP ledger entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct XpTransaction {
    pub id: i64,
    pub student_id: String,
    pub xp_amount: i64,
    pub activity_type: String,
    pub description: Option<String>,
    pub timestamp: DateTime<Utc>,
}

/// Earned badge record. Immutable once created; never revoked.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EarnedBadge {
    pub student_id: String,
    pub badge_id: String,
    pub badge_type: String,
    pub earned_date: DateTime<Utc>,
}

/// Result of an `award_xp` call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AwardOutcome {
    pub xp_awarded: i64,
    pub total_xp: i64,
    pub level: u32,
    /// True iff the level increased as a result of this award.
    pub level_up: bool,
}

/// Result of an `update_streak` call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StreakOutcome {
    pub current_streak: u32,
    pub longest_streak: u32,
    pub streak_status: StreakStatus,
}

/// Result of a `check_and_award_badges` call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BadgeCheckOutcome {
    /// Badge ids newly awarded by this call.
    pub new_badges: Vec<String>,
    /// Count of badges currently satisfied by the stats snapshot.
    pub total_badges: usize,
}

/// Combined result of a full activity pass (XP, streak, badges).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActivityOutcome {
    pub award: AwardOutcome,
    pub streak: StreakOutcome,
    pub badges: BadgeCheckOutcome,
}

/// Full gamification view for a student: profile, badges, recent ledger.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GamificationSummary {
    pub student_id: String,
    pub total_xp: i64,
    pub level: u32,
    pub current_streak: u32,
    pub longest_streak: u32,
    pub last_activity_date: Option<NaiveDate>,
    pub badges: Vec<EarnedBadge>,
    pub recent_transactions: Vec<XpTransaction>,
}
