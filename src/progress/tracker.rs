//! Quiz attempt recording and student analytics.
//!
//! `record_quiz_attempt` writes the immutable attempt row and the
//! incremental topic rollup in one transaction; `get_student_analytics`
//! recomputes everything from the raw history so dashboard numbers are
//! correct independent of the incremental path.

use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;

use super::analytics::{accuracy_percent, compute_analytics, score_answers};
use super::types::{
    AnalyticsWithFeedback, QuizAttempt, QuizAttemptOutcome, StudentAnalytics, TopicPerformance,
};
use crate::feedback::{FeedbackGenerator, TextGenerator};
use crate::storage::database::{map_sqlite_err, with_busy_retry, DatabaseError};
use crate::storage::{Database, ProgressStore};

/// Placeholder strength feedback for students with no attempts.
const FEEDBACK_NO_ATTEMPTS_STRENGTH: &str =
    "Complete some quizzes to receive personalized feedback!";
/// Placeholder weakness feedback for students with no attempts.
const FEEDBACK_NO_ATTEMPTS_WEAKNESS: &str = "Start your learning journey today!";
/// Placeholder used when the text generator is unavailable.
const FEEDBACK_UNAVAILABLE: &str = "Feedback is temporarily unavailable.";

/// Progress tracker: quiz attempt recording and analytics queries.
pub struct ProgressTracker {
    db: Arc<Database>,
}

impl ProgressTracker {
    /// Create a new tracker over the given database.
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    /// Record a submitted quiz.
    ///
    /// The three sequences must have equal length. Answers are compared
    /// case-insensitively after trimming surrounding whitespace; no fuzzy
    /// matching. The attempt row and the topic rollup commit atomically.
    pub fn record_quiz_attempt(
        &self,
        student_id: &str,
        topic: &str,
        difficulty: &str,
        questions: &[String],
        user_answers: &[String],
        correct_answers: &[String],
    ) -> Result<QuizAttemptOutcome, ProgressError> {
        if questions.len() != user_answers.len() || questions.len() != correct_answers.len() {
            return Err(ProgressError::Validation(format!(
                "mismatched sequence lengths: {} questions, {} answers, {} correct answers",
                questions.len(),
                user_answers.len(),
                correct_answers.len()
            )));
        }

        let correct_count = score_answers(user_answers, correct_answers);
        let total_questions = questions.len() as u32;
        let accuracy = accuracy_percent(correct_count, total_questions);
        let quiz_id = format!("quiz_{}", &Uuid::new_v4().simple().to_string()[..8]);
        let timestamp = Utc::now();

        with_busy_retry(|| {
            let mut conn = self.db.connection();
            let tx = conn.transaction().map_err(map_sqlite_err)?;
            let store = ProgressStore::new(&tx);

            store.insert_attempt(&QuizAttempt {
                id: 0,
                quiz_id: quiz_id.clone(),
                student_id: student_id.to_string(),
                topic: topic.to_string(),
                difficulty: difficulty.to_string(),
                questions: questions.to_vec(),
                answers: user_answers.to_vec(),
                correct_count,
                total_questions,
                timestamp,
            })?;

            let mut performance = store
                .get_topic_performance(student_id, topic)?
                .unwrap_or_else(|| TopicPerformance::new(student_id, topic));
            performance.total_attempts += 1;
            performance.correct_answers += correct_count;
            performance.last_attempted = timestamp;
            *performance
                .difficulty_distribution
                .entry(difficulty.to_string())
                .or_insert(0) += 1;
            store.save_topic_performance(&performance)?;

            tx.commit().map_err(map_sqlite_err)?;
            Ok(())
        })?;

        tracing::debug!(student_id, topic, accuracy, "recorded quiz attempt");

        Ok(QuizAttemptOutcome {
            quiz_id,
            accuracy,
            correct_count,
            total_questions,
            timestamp,
        })
    }

    /// Analytics payload for a student: overall/topic accuracy, weekly
    /// trend, strongest/weakest topic, difficulty distribution. A student
    /// with no attempts gets a zeroed payload, never an error.
    pub fn get_student_analytics(
        &self,
        student_id: &str,
    ) -> Result<StudentAnalytics, ProgressError> {
        let conn = self.db.connection();
        let store = ProgressStore::new(&conn);

        let attempts = store.list_attempts(student_id)?;
        let analytics = compute_analytics(student_id, &attempts, Utc::now().date_naive());

        self.check_rollup_drift(&store, &analytics)?;

        Ok(analytics)
    }

    /// Analytics augmented with AI feedback strings. A text-generator
    /// failure degrades to placeholder strings and is logged; the base
    /// analytics are never affected.
    pub async fn get_student_analytics_with_ai_feedback<G: TextGenerator>(
        &self,
        student_id: &str,
        feedback: &FeedbackGenerator<G>,
    ) -> Result<AnalyticsWithFeedback, ProgressError> {
        let analytics = self.get_student_analytics(student_id)?;

        if analytics.total_attempts == 0 {
            return Ok(AnalyticsWithFeedback {
                analytics,
                ai_strength_feedback: FEEDBACK_NO_ATTEMPTS_STRENGTH.to_string(),
                ai_weakness_feedback: FEEDBACK_NO_ATTEMPTS_WEAKNESS.to_string(),
            });
        }

        let strongest = analytics
            .topics
            .iter()
            .find(|t| t.topic == analytics.strongest_topic);
        let weakest = analytics
            .topics
            .iter()
            .find(|t| t.topic == analytics.weakest_topic);

        let ai_strength_feedback = match strongest {
            Some(topic) => feedback
                .strength_feedback(&topic.topic, topic.accuracy, topic.total_attempts)
                .await
                .unwrap_or_else(|e| {
                    tracing::warn!(student_id, error = %e, "strength feedback unavailable");
                    FEEDBACK_UNAVAILABLE.to_string()
                }),
            None => FEEDBACK_UNAVAILABLE.to_string(),
        };

        let ai_weakness_feedback = match weakest {
            Some(topic) => feedback
                .weakness_feedback(&topic.topic, topic.accuracy, topic.total_attempts)
                .await
                .unwrap_or_else(|e| {
                    tracing::warn!(student_id, error = %e, "weakness feedback unavailable");
                    FEEDBACK_UNAVAILABLE.to_string()
                }),
            None => FEEDBACK_UNAVAILABLE.to_string(),
        };

        Ok(AnalyticsWithFeedback {
            analytics,
            ai_strength_feedback,
            ai_weakness_feedback,
        })
    }

    /// On-read consistency check between the incremental topic rollups and
    /// the numbers recomputed from raw attempts. Drift is logged, not fixed
    /// silently.
    fn check_rollup_drift(
        &self,
        store: &ProgressStore<'_>,
        analytics: &StudentAnalytics,
    ) -> Result<(), ProgressError> {
        let rollups = store.list_topic_performance(&analytics.student_id)?;

        for rollup in rollups {
            if let Some(topic) = analytics.topics.iter().find(|t| t.topic == rollup.topic) {
                if rollup.total_attempts != topic.total_attempts
                    || rollup.correct_answers != topic.correct_answers
                {
                    tracing::warn!(
                        student_id = %analytics.student_id,
                        topic = %rollup.topic,
                        rollup_attempts = rollup.total_attempts,
                        raw_attempts = topic.total_attempts,
                        rollup_correct = rollup.correct_answers,
                        raw_correct = topic.correct_answers,
                        "topic rollup drifted from raw attempt history"
                    );
                }
            }
        }

        Ok(())
    }
}

/// Progress tracking errors.
#[derive(Debug, thiserror::Error)]
pub enum ProgressError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Database error: {0}")]
    Database(#[from] DatabaseError),
}
