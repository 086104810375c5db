//! Gamification features: XP ledger, levels, streaks, badges.

pub mod badges;
pub mod engine;
pub mod levels;
pub mod streak;
pub mod types;

pub use badges::{default_badges, BadgeDefinition, StudentStats};
pub use engine::{GamificationEngine, GamificationError, ROLE_STUDENT};
pub use levels::LevelTable;
pub use streak::{advance_streak, StreakStatus};
pub use types::{
    ActivityOutcome, AwardOutcome, BadgeCheckOutcome, EarnedBadge, GamificationSummary,
    StreakOutcome, StudentProfile, XpTransaction,
};
