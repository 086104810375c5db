//! Quiz progress tracking and analytics.

pub mod analytics;
pub mod tracker;
pub mod types;

pub use tracker::{ProgressError, ProgressTracker};
pub use types::{
    AnalyticsWithFeedback, QuizAttempt, QuizAttemptOutcome, StudentAnalytics, TopicBreakdown,
    TopicPerformance, TrendPoint,
};
