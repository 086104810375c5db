//! Core types for quiz progress tracking and analytics.

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Sentinel topic label used when a student has no attempts yet.
pub const NO_TOPIC: &str = "N/A";

/// One submitted quiz. Immutable once recorded.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuizAttempt {
    pub id: i64,
    pub quiz_id: String,
    pub student_id: String,
    pub topic: String,
    pub difficulty: String,
    /// Question texts, in presentation order.
    pub questions: Vec<String>,
    /// The student's answers, parallel to `questions`.
    pub answers: Vec<String>,
    pub correct_count: u32,
    pub total_questions: u32,
    pub timestamp: DateTime<Utc>,
}

/// Incrementally maintained rollup for one (student, topic) pair.
///
/// Kept consistent with the raw attempt history by updating it in the same
/// transaction that inserts each attempt.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TopicPerformance {
    pub student_id: String,
    pub topic: String,
    pub total_attempts: u32,
    pub correct_answers: u32,
    pub last_attempted: DateTime<Utc>,
    /// Difficulty label -> count of attempts at that difficulty.
    pub difficulty_distribution: BTreeMap<String, u32>,
}

impl TopicPerformance {
    /// Fresh zero rollup for a topic's first attempt.
    pub fn new(student_id: &str, topic: &str) -> Self {
        Self {
            student_id: student_id.to_string(),
            topic: topic.to_string(),
            total_attempts: 0,
            correct_answers: 0,
            last_attempted: Utc::now(),
            difficulty_distribution: BTreeMap::new(),
        }
    }
}

/// Result of recording a quiz attempt.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuizAttemptOutcome {
    pub quiz_id: String,
    /// Percentage, 2-decimal rounded; 0 for an empty quiz.
    pub accuracy: f64,
    pub correct_count: u32,
    pub total_questions: u32,
    pub timestamp: DateTime<Utc>,
}

/// Per-topic accuracy breakdown, recomputed from raw attempts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopicBreakdown {
    pub topic: String,
    pub accuracy: f64,
    pub total_attempts: u32,
    pub correct_answers: u32,
    pub total_questions: u32,
}

/// One calendar day of the trailing-week trend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendPoint {
    pub date: NaiveDate,
    /// 0 when the day has no attempts.
    pub accuracy: f64,
    pub attempts: u32,
}

/// Full analytics payload for a student.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StudentAnalytics {
    pub student_id: String,
    pub overall_accuracy: f64,
    pub total_attempts: u32,
    /// Sorted by topic name ascending for reproducible ordering.
    pub topics: Vec<TopicBreakdown>,
    /// One entry per day for the trailing 7 days, oldest first.
    pub weekly_trend: Vec<TrendPoint>,
    pub strongest_topic: String,
    pub weakest_topic: String,
    pub difficulty_distribution: BTreeMap<String, u32>,
}

impl StudentAnalytics {
    /// Zeroed placeholder payload for a student with no attempts.
    pub fn empty(student_id: &str) -> Self {
        Self {
            student_id: student_id.to_string(),
            overall_accuracy: 0.0,
            total_attempts: 0,
            topics: Vec::new(),
            weekly_trend: Vec::new(),
            strongest_topic: NO_TOPIC.to_string(),
            weakest_topic: NO_TOPIC.to_string(),
            difficulty_distribution: BTreeMap::new(),
        }
    }
}

/// Analytics payload augmented with AI-generated feedback strings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyticsWithFeedback {
    #[serde(flatten)]
    pub analytics: StudentAnalytics,
    pub ai_strength_feedback: String,
    pub ai_weakness_feedback: String,
}
