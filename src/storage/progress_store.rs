//! Quiz progress storage operations.
//!
//! Provides persistence for:
//! - Raw quiz attempts (immutable history)
//! - Per-topic performance rollups (incrementally maintained)

use rusqlite::{params, Connection};

use crate::progress::types::{QuizAttempt, TopicPerformance};
use crate::storage::database::{map_sqlite_err, DatabaseError};
use crate::storage::gamification_store::parse_utc;

/// Store for persisting quiz attempts and topic rollups.
pub struct ProgressStore<'a> {
    conn: &'a Connection,
}

impl<'a> ProgressStore<'a> {
    /// Create a new progress store with the given connection.
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    // ========== Quiz Attempt Operations ==========

    /// Insert a quiz attempt. The attempt's `id` field is ignored; SQLite
    /// assigns the row id.
    pub fn insert_attempt(&self, attempt: &QuizAttempt) -> Result<(), DatabaseError> {
        let questions_json = serde_json::to_string(&attempt.questions)
            .map_err(|e| DatabaseError::SerializationError(e.to_string()))?;
        let answers_json = serde_json::to_string(&attempt.answers)
            .map_err(|e| DatabaseError::SerializationError(e.to_string()))?;

        self.conn
            .execute(
                "INSERT INTO quiz_attempts (quiz_id, student_id, topic, difficulty,
                                            questions_json, answers_json, correct_count,
                                            total_questions, timestamp)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
                params![
                    attempt.quiz_id,
                    attempt.student_id,
                    attempt.topic,
                    attempt.difficulty,
                    questions_json,
                    answers_json,
                    attempt.correct_count,
                    attempt.total_questions,
                    attempt.timestamp.to_rfc3339(),
                ],
            )
            .map_err(map_sqlite_err)?;
        Ok(())
    }

    /// All attempts for a student, oldest first.
    pub fn list_attempts(&self, student_id: &str) -> Result<Vec<QuizAttempt>, DatabaseError> {
        let mut stmt = self
            .conn
            .prepare(
                "SELECT id, quiz_id, student_id, topic, difficulty, questions_json,
                        answers_json, correct_count, total_questions, timestamp
                 FROM quiz_attempts WHERE student_id = ?1 ORDER BY timestamp, id",
            )
            .map_err(|e| DatabaseError::QueryFailed(e.to_string()))?;

        let rows = stmt
            .query_map(params![student_id], |row| {
                Ok((
                    row.get::<_, i64>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, String>(2)?,
                    row.get::<_, String>(3)?,
                    row.get::<_, String>(4)?,
                    row.get::<_, String>(5)?,
                    row.get::<_, String>(6)?,
                    row.get::<_, u32>(7)?,
                    row.get::<_, u32>(8)?,
                    row.get::<_, String>(9)?,
                ))
            })
            .map_err(|e| DatabaseError::QueryFailed(e.to_string()))?;

        let mut attempts = Vec::new();
        for row in rows {
            let (
                id,
                quiz_id,
                student_id,
                topic,
                difficulty,
                questions_json,
                answers_json,
                correct_count,
                total_questions,
                ts_str,
            ) = row.map_err(|e| DatabaseError::QueryFailed(e.to_string()))?;

            attempts.push(QuizAttempt {
                id,
                quiz_id,
                student_id,
                topic,
                difficulty,
                questions: serde_json::from_str(&questions_json)
                    .map_err(|e| DatabaseError::SerializationError(e.to_string()))?,
                answers: serde_json::from_str(&answers_json)
                    .map_err(|e| DatabaseError::SerializationError(e.to_string()))?,
                correct_count,
                total_questions,
                timestamp: parse_utc(&ts_str)?,
            });
        }

        Ok(attempts)
    }

    /// Count all attempts for a student.
    pub fn count_attempts(&self, student_id: &str) -> Result<i64, DatabaseError> {
        self.conn
            .query_row(
                "SELECT COUNT(*) FROM quiz_attempts WHERE student_id = ?1",
                params![student_id],
                |row| row.get(0),
            )
            .map_err(|e| DatabaseError::QueryFailed(e.to_string()))
    }

    /// Count attempts with a perfect score.
    pub fn count_perfect_attempts(&self, student_id: &str) -> Result<i64, DatabaseError> {
        self.conn
            .query_row(
                "SELECT COUNT(*) FROM quiz_attempts
                 WHERE student_id = ?1 AND correct_count = total_questions AND total_questions > 0",
                params![student_id],
                |row| row.get(0),
            )
            .map_err(|e| DatabaseError::QueryFailed(e.to_string()))
    }

    // ========== Topic Performance Operations ==========

    /// Get the rollup for one (student, topic) pair.
    pub fn get_topic_performance(
        &self,
        student_id: &str,
        topic: &str,
    ) -> Result<Option<TopicPerformance>, DatabaseError> {
        let mut stmt = self
            .conn
            .prepare(
                "SELECT student_id, topic, total_attempts, correct_answers, last_attempted,
                        difficulty_distribution_json
                 FROM topic_performance WHERE student_id = ?1 AND topic = ?2",
            )
            .map_err(|e| DatabaseError::QueryFailed(e.to_string()))?;

        let mut rows = stmt
            .query(params![student_id, topic])
            .map_err(|e| DatabaseError::QueryFailed(e.to_string()))?;

        if let Some(row) = rows
            .next()
            .map_err(|e| DatabaseError::QueryFailed(e.to_string()))?
        {
            Ok(Some(row_to_topic_performance(row)?))
        } else {
            Ok(None)
        }
    }

    /// All rollups for a student, topic name ascending.
    pub fn list_topic_performance(
        &self,
        student_id: &str,
    ) -> Result<Vec<TopicPerformance>, DatabaseError> {
        let mut stmt = self
            .conn
            .prepare(
                "SELECT student_id, topic, total_attempts, correct_answers, last_attempted,
                        difficulty_distribution_json
                 FROM topic_performance WHERE student_id = ?1 ORDER BY topic",
            )
            .map_err(|e| DatabaseError::QueryFailed(e.to_string()))?;

        let mut rows = stmt
            .query(params![student_id])
            .map_err(|e| DatabaseError::QueryFailed(e.to_string()))?;

        let mut rollups = Vec::new();
        while let Some(row) = rows
            .next()
            .map_err(|e| DatabaseError::QueryFailed(e.to_string()))?
        {
            rollups.push(row_to_topic_performance(row)?);
        }

        Ok(rollups)
    }

    /// Insert or update a rollup. The difficulty distribution replaces the
    /// stored one wholesale; callers fold the new attempt in first.
    pub fn save_topic_performance(
        &self,
        performance: &TopicPerformance,
    ) -> Result<(), DatabaseError> {
        let distribution_json = serde_json::to_string(&performance.difficulty_distribution)
            .map_err(|e| DatabaseError::SerializationError(e.to_string()))?;

        self.conn
            .execute(
                "INSERT INTO topic_performance (student_id, topic, total_attempts, correct_answers,
                                                last_attempted, difficulty_distribution_json)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)
                 ON CONFLICT(student_id, topic) DO UPDATE SET
                     total_attempts = excluded.total_attempts,
                     correct_answers = excluded.correct_answers,
                     last_attempted = excluded.last_attempted,
                     difficulty_distribution_json = excluded.difficulty_distribution_json",
                params![
                    performance.student_id,
                    performance.topic,
                    performance.total_attempts,
                    performance.correct_answers,
                    performance.last_attempted.to_rfc3339(),
                    distribution_json,
                ],
            )
            .map_err(map_sqlite_err)?;
        Ok(())
    }
}

fn row_to_topic_performance(row: &rusqlite::Row<'_>) -> Result<TopicPerformance, DatabaseError> {
    let last_attempted_str: String = row
        .get(4)
        .map_err(|e| DatabaseError::QueryFailed(e.to_string()))?;
    let distribution_json: String = row
        .get(5)
        .map_err(|e| DatabaseError::QueryFailed(e.to_string()))?;

    Ok(TopicPerformance {
        student_id: row
            .get(0)
            .map_err(|e| DatabaseError::QueryFailed(e.to_string()))?,
        topic: row
            .get(1)
            .map_err(|e| DatabaseError::QueryFailed(e.to_string()))?,
        total_attempts: row
            .get(2)
            .map_err(|e| DatabaseError::QueryFailed(e.to_string()))?,
        correct_answers: row
            .get(3)
            .map_err(|e| DatabaseError::QueryFailed(e.to_string()))?,
        last_attempted: parse_utc(&last_attempted_str)?,
        difficulty_distribution: serde_json::from_str(&distribution_json)
            .map_err(|e| DatabaseError::SerializationError(e.to_string()))?,
    })
}
