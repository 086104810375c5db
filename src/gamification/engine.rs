//! Gamification engine: XP awards, streak updates, badge checks.
//!
//! Orchestrates the level table, streak transitions, and badge eligibility
//! against a student's persisted profile. Every mutation runs inside a
//! transaction on the mutex-guarded connection, so concurrent award calls
//! for the same student cannot lose an update.

use std::collections::HashSet;
use std::sync::Arc;

use chrono::Utc;

use super::badges::{eligible_badge_ids, StudentStats, BADGE_TYPE_ACHIEVEMENT};
use super::streak::{advance_streak, StreakStatus};
use super::types::{
    ActivityOutcome, AwardOutcome, BadgeCheckOutcome, GamificationSummary, StreakOutcome,
    StudentProfile,
};
use crate::config::{activity, GamificationConfig};
use crate::storage::database::{map_sqlite_err, with_busy_retry, DatabaseError};
use crate::storage::{Database, GamificationStore, ProgressStore};

/// Chat role whose messages count toward the chat-interaction badge stat.
pub const ROLE_STUDENT: &str = "student";

/// Ledger entries returned by `get_student_gamification`.
const RECENT_TRANSACTIONS_LIMIT: u32 = 10;

/// Gamification engine. Stateless beyond configuration; all mutable state
/// lives in the database.
pub struct GamificationEngine {
    db: Arc<Database>,
    config: GamificationConfig,
}

impl GamificationEngine {
    /// Create a new engine over the given database.
    pub fn new(db: Arc<Database>, config: GamificationConfig) -> Self {
        Self { db, config }
    }

    /// The active configuration.
    pub fn config(&self) -> &GamificationConfig {
        &self.config
    }

    /// Get or create a student's profile. Profiles are created lazily on
    /// first interaction and never deleted.
    pub fn get_or_create_profile(
        &self,
        student_id: &str,
    ) -> Result<StudentProfile, GamificationError> {
        let conn = self.db.connection();
        let store = GamificationStore::new(&conn);
        Ok(store.get_or_create_profile(student_id)?)
    }

    /// Award XP for an activity.
    ///
    /// Unrecognized activity types award 0 XP rather than failing; the
    /// zero-amount ledger row still gets written so typos stay auditable.
    /// Profile update and ledger append commit together or not at all.
    pub fn award_xp(
        &self,
        student_id: &str,
        activity_type: &str,
        description: Option<&str>,
    ) -> Result<AwardOutcome, GamificationError> {
        let amount = self.config.rewards.amount(activity_type);
        if !self.config.rewards.is_known(activity_type) {
            tracing::debug!(activity_type, "unrecognized activity type, awarding 0 XP");
        }

        let outcome = with_busy_retry(|| {
            let mut conn = self.db.connection();
            let tx = conn.transaction().map_err(map_sqlite_err)?;
            let store = GamificationStore::new(&tx);

            let mut profile = store.get_or_create_profile(student_id)?;
            let old_level = profile.level;
            profile.total_xp += amount;
            profile.level = self.config.levels.level_for_xp(profile.total_xp);
            store.update_profile(&profile)?;

            let description = description
                .map(str::to_string)
                .unwrap_or_else(|| default_description(activity_type));
            store.insert_transaction(
                student_id,
                amount,
                activity_type,
                Some(&description),
                Utc::now(),
            )?;

            tx.commit().map_err(map_sqlite_err)?;
            Ok(AwardOutcome {
                xp_awarded: amount,
                total_xp: profile.total_xp,
                level: profile.level,
                level_up: profile.level > old_level,
            })
        })?;

        if outcome.level_up {
            tracing::info!(student_id, level = outcome.level, "student leveled up");
        }

        Ok(outcome)
    }

    /// Update the student's daily streak for today (UTC calendar day).
    ///
    /// Idempotent within a day: repeated calls report `already_counted` and
    /// change nothing.
    pub fn update_streak(&self, student_id: &str) -> Result<StreakOutcome, GamificationError> {
        let outcome = with_busy_retry(|| {
            let mut conn = self.db.connection();
            let tx = conn.transaction().map_err(map_sqlite_err)?;
            let store = GamificationStore::new(&tx);

            let mut profile = store.get_or_create_profile(student_id)?;
            let transition = advance_streak(
                profile.current_streak,
                profile.longest_streak,
                profile.last_activity_date,
                Utc::now().date_naive(),
            );

            if transition.status != StreakStatus::AlreadyCounted {
                profile.current_streak = transition.current_streak;
                profile.longest_streak = transition.longest_streak;
                profile.last_activity_date = Some(transition.last_activity_date);
                store.update_profile(&profile)?;
            }

            tx.commit().map_err(map_sqlite_err)?;
            Ok(StreakOutcome {
                current_streak: transition.current_streak,
                longest_streak: transition.longest_streak,
                streak_status: transition.status,
            })
        })?;

        Ok(outcome)
    }

    /// Evaluate the badge catalog against a fresh stats snapshot and persist
    /// any newly-earned badges. Idempotent: an unchanged snapshot awards
    /// nothing new. Badges are never revoked.
    pub fn check_and_award_badges(
        &self,
        student_id: &str,
    ) -> Result<BadgeCheckOutcome, GamificationError> {
        let outcome = with_busy_retry(|| {
            let mut conn = self.db.connection();
            let tx = conn.transaction().map_err(map_sqlite_err)?;
            let store = GamificationStore::new(&tx);
            let progress = ProgressStore::new(&tx);

            let profile = store.get_or_create_profile(student_id)?;
            let stats = StudentStats {
                quizzes_completed: progress.count_attempts(student_id)?,
                graphs_created: store
                    .count_transactions_by_activity(student_id, activity::GRAPH_CREATION)?,
                longest_streak: i64::from(profile.longest_streak),
                current_streak: i64::from(profile.current_streak),
                total_xp: profile.total_xp,
                perfect_quizzes: progress.count_perfect_attempts(student_id)?,
                level: i64::from(profile.level),
                chat_interactions: store.count_chat_messages(student_id, ROLE_STUDENT)?,
            };

            let eligible = eligible_badge_ids(&self.config.badges, &stats);
            let owned: HashSet<String> = store
                .list_badges(student_id)?
                .into_iter()
                .map(|b| b.badge_id)
                .collect();

            let new_badges: Vec<String> = eligible
                .iter()
                .filter(|id| !owned.contains(*id))
                .cloned()
                .collect();

            let now = Utc::now();
            for badge_id in &new_badges {
                store.insert_badge(student_id, badge_id, BADGE_TYPE_ACHIEVEMENT, now)?;
            }

            tx.commit().map_err(map_sqlite_err)?;
            Ok(BadgeCheckOutcome {
                new_badges,
                total_badges: eligible.len(),
            })
        })?;

        if !outcome.new_badges.is_empty() {
            tracing::info!(student_id, badges = ?outcome.new_badges, "awarded new badges");
        }

        Ok(outcome)
    }

    /// Full gamification view: profile, earned badges, recent ledger entries.
    pub fn get_student_gamification(
        &self,
        student_id: &str,
    ) -> Result<GamificationSummary, GamificationError> {
        let conn = self.db.connection();
        let store = GamificationStore::new(&conn);

        let profile = store.get_or_create_profile(student_id)?;
        let badges = store.list_badges(student_id)?;
        let recent_transactions =
            store.recent_transactions(student_id, RECENT_TRANSACTIONS_LIMIT)?;

        Ok(GamificationSummary {
            student_id: profile.student_id,
            total_xp: profile.total_xp,
            level: profile.level,
            current_streak: profile.current_streak,
            longest_streak: profile.longest_streak,
            last_activity_date: profile.last_activity_date,
            badges,
            recent_transactions,
        })
    }

    /// Run the full activity pass callers trigger after a student-facing
    /// action: award XP, update the streak, then check badges.
    pub fn record_activity(
        &self,
        student_id: &str,
        activity_type: &str,
        description: Option<&str>,
    ) -> Result<ActivityOutcome, GamificationError> {
        let award = self.award_xp(student_id, activity_type, description)?;
        let streak = self.update_streak(student_id)?;
        let badges = self.check_and_award_badges(student_id)?;

        Ok(ActivityOutcome {
            award,
            streak,
            badges,
        })
    }

    /// Best-effort variant of [`record_activity`](Self::record_activity) for
    /// call sites where gamification is a side effect of some unrelated
    /// primary action. Errors are logged and swallowed so the primary action
    /// never fails on account of gamification.
    pub fn record_activity_best_effort(
        &self,
        student_id: &str,
        activity_type: &str,
        description: Option<&str>,
    ) -> Option<ActivityOutcome> {
        match self.record_activity(student_id, activity_type, description) {
            Ok(outcome) => Some(outcome),
            Err(e) => {
                tracing::warn!(student_id, activity_type, error = %e, "gamification side effect failed");
                None
            }
        }
    }

    /// Persist one chat message. Student-authored messages feed the
    /// chat-interaction badge stat.
    pub fn log_chat_message(
        &self,
        student_id: &str,
        role: &str,
        content: &str,
    ) -> Result<(), GamificationError> {
        let conn = self.db.connection();
        let store = GamificationStore::new(&conn);
        Ok(store.log_chat_message(student_id, role, content)?)
    }
}

/// Default ledger description: the activity type, title-cased.
fn default_description(activity_type: &str) -> String {
    activity_type
        .split('_')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Gamification errors.
#[derive(Debug, thiserror::Error)]
pub enum GamificationError {
    #[error("Database error: {0}")]
    Database(#[from] DatabaseError),
}
