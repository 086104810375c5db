//! StudyHub - AI-Assisted Learning Backend Core
//!
//! Provides the stateful core of an AI-assisted learning backend:
//! a gamification engine (XP ledger, levels, calendar-day streaks, badges)
//! and a progress tracker (quiz attempt recording and per-student
//! analytics), both persisted in SQLite. LLM-facing concerns are reduced to
//! a text-generation boundary used for optional analytics feedback.

pub mod config;
pub mod feedback;
pub mod gamification;
pub mod progress;
pub mod storage;

// Re-export commonly used types
pub use config::{load_config, GamificationConfig, RewardTable};
pub use feedback::{FeedbackGenerator, HttpTextClient, TextGenerator};
pub use gamification::{GamificationEngine, StudentProfile};
pub use progress::{ProgressTracker, StudentAnalytics};
pub use storage::Database;
