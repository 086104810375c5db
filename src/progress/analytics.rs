//! Analytics computations over raw quiz-attempt history.
//!
//! Everything here folds over the full attempt list rather than reading the
//! incremental topic rollups, so the numbers stay correct even if the
//! incremental path ever drifts. Percentages are 2-decimal rounded.

use std::collections::BTreeMap;

use chrono::NaiveDate;

use super::types::{QuizAttempt, StudentAnalytics, TopicBreakdown, TrendPoint};

/// Days covered by the weekly trend, including today.
const TREND_DAYS: i64 = 7;

/// Round to 2 decimal places.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Normalize an answer for comparison: surrounding whitespace stripped,
/// lowercased. No fuzzy matching beyond that.
pub fn normalize_answer(answer: &str) -> String {
    answer.trim().to_lowercase()
}

/// Count positions where the user's normalized answer equals the correct one.
pub fn score_answers(user_answers: &[String], correct_answers: &[String]) -> u32 {
    user_answers
        .iter()
        .zip(correct_answers)
        .filter(|(user, correct)| normalize_answer(user) == normalize_answer(correct))
        .count() as u32
}

/// Accuracy as a percentage; 0 when there were no questions.
pub fn accuracy_percent(correct: u32, total: u32) -> f64 {
    if total == 0 {
        return 0.0;
    }
    round2(f64::from(correct) / f64::from(total) * 100.0)
}

/// Compute the full analytics payload from a student's attempt history.
///
/// `today` anchors the trailing-7-day trend; callers pass the current UTC
/// date.
pub fn compute_analytics(
    student_id: &str,
    attempts: &[QuizAttempt],
    today: NaiveDate,
) -> StudentAnalytics {
    if attempts.is_empty() {
        return StudentAnalytics::empty(student_id);
    }

    let total_correct: u32 = attempts.iter().map(|a| a.correct_count).sum();
    let total_questions: u32 = attempts.iter().map(|a| a.total_questions).sum();
    let overall_accuracy = accuracy_percent(total_correct, total_questions);

    let topics = topic_breakdowns(attempts);
    let (strongest_topic, weakest_topic) = extreme_topics(&topics);

    let mut difficulty_distribution = BTreeMap::new();
    for attempt in attempts {
        *difficulty_distribution
            .entry(attempt.difficulty.clone())
            .or_insert(0) += 1;
    }

    StudentAnalytics {
        student_id: student_id.to_string(),
        overall_accuracy,
        total_attempts: attempts.len() as u32,
        topics,
        weekly_trend: weekly_trend(attempts, today),
        strongest_topic,
        weakest_topic,
        difficulty_distribution,
    }
}

/// Per-topic accuracy recomputed from raw attempts, topics sorted ascending.
pub fn topic_breakdowns(attempts: &[QuizAttempt]) -> Vec<TopicBreakdown> {
    // BTreeMap keeps topics name-ascending, making tie-breaks deterministic
    let mut by_topic: BTreeMap<&str, (u32, u32, u32)> = BTreeMap::new();
    for attempt in attempts {
        let entry = by_topic.entry(&attempt.topic).or_insert((0, 0, 0));
        entry.0 += 1;
        entry.1 += attempt.correct_count;
        entry.2 += attempt.total_questions;
    }

    by_topic
        .into_iter()
        .map(
            |(topic, (total_attempts, correct_answers, total_questions))| TopicBreakdown {
                topic: topic.to_string(),
                accuracy: accuracy_percent(correct_answers, total_questions),
                total_attempts,
                correct_answers,
                total_questions,
            },
        )
        .collect()
}

/// Strongest and weakest topic labels; ties go to the first topic in
/// name-ascending order.
fn extreme_topics(topics: &[TopicBreakdown]) -> (String, String) {
    let mut strongest: Option<&TopicBreakdown> = None;
    let mut weakest: Option<&TopicBreakdown> = None;

    for topic in topics {
        if strongest.map_or(true, |s| topic.accuracy > s.accuracy) {
            strongest = Some(topic);
        }
        if weakest.map_or(true, |w| topic.accuracy < w.accuracy) {
            weakest = Some(topic);
        }
    }

    (
        strongest.map_or_else(|| super::types::NO_TOPIC.to_string(), |t| t.topic.clone()),
        weakest.map_or_else(|| super::types::NO_TOPIC.to_string(), |t| t.topic.clone()),
    )
}

/// One trend point per calendar day for the trailing week, oldest first.
/// Days with no attempts report 0 accuracy and 0 attempts.
pub fn weekly_trend(attempts: &[QuizAttempt], today: NaiveDate) -> Vec<TrendPoint> {
    (0..TREND_DAYS)
        .map(|offset| {
            let date = today - chrono::Duration::days(TREND_DAYS - 1 - offset);
            let mut day_attempts = 0u32;
            let mut day_correct = 0u32;
            let mut day_total = 0u32;

            for attempt in attempts {
                if attempt.timestamp.date_naive() == date {
                    day_attempts += 1;
                    day_correct += attempt.correct_count;
                    day_total += attempt.total_questions;
                }
            }

            TrendPoint {
                date,
                accuracy: accuracy_percent(day_correct, day_total),
                attempts: day_attempts,
            }
        })
        .collect()
}
