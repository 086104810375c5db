//! AI feedback generation for progress analytics.
//!
//! Builds tutor-style prompts from a student's strongest/weakest topics and
//! hands them to the external text generator.

pub mod client;

pub use client::{FeedbackError, HttpTextClient, TextGenerator};

use crate::progress::types::TopicBreakdown;

/// Generates short natural-language feedback strings via a text generator.
pub struct FeedbackGenerator<G: TextGenerator> {
    llm: G,
}

impl<G: TextGenerator> FeedbackGenerator<G> {
    /// Wrap a text generator.
    pub fn new(llm: G) -> Self {
        Self { llm }
    }

    /// Encouraging feedback for the student's strongest topic.
    pub async fn strength_feedback(
        &self,
        topic: &str,
        accuracy: f64,
        attempts: u32,
    ) -> Result<String, FeedbackError> {
        let prompt = format!(
            "You are an encouraging AI tutor. A student has shown strength in {topic} \
             with {accuracy}% accuracy over {attempts} attempts.\n\n\
             Provide 2-3 sentences of encouraging feedback that:\n\
             1. Celebrates their achievement\n\
             2. Suggests ways to maintain or deepen this strength\n\
             3. Keeps a warm, motivational tone\n\n\
             Feedback:"
        );
        self.llm.complete(&prompt).await
    }

    /// Constructive feedback for the student's weakest topic.
    pub async fn weakness_feedback(
        &self,
        topic: &str,
        accuracy: f64,
        attempts: u32,
    ) -> Result<String, FeedbackError> {
        let prompt = format!(
            "You are a supportive AI tutor. A student needs improvement in {topic} \
             with {accuracy}% accuracy over {attempts} attempts.\n\n\
             Provide 2-3 sentences of constructive feedback that:\n\
             1. Acknowledges the challenge without discouragement\n\
             2. Offers specific, actionable practice recommendations\n\
             3. Maintains an encouraging, supportive tone\n\n\
             Feedback:"
        );
        self.llm.complete(&prompt).await
    }

    /// A short overall-progress insight across topics.
    pub async fn overall_insight(
        &self,
        overall_accuracy: f64,
        total_attempts: u32,
        topics: &[TopicBreakdown],
    ) -> Result<String, FeedbackError> {
        let topics_summary = topics
            .iter()
            .take(3)
            .map(|t| format!("{} ({}%)", t.topic, t.accuracy))
            .collect::<Vec<_>>()
            .join(", ");

        let prompt = format!(
            "You are an insightful AI learning coach. Review this student's progress:\n\
             - Overall Accuracy: {overall_accuracy}%\n\
             - Total Quizzes: {total_attempts}\n\
             - Topic Performance: {topics_summary}\n\n\
             Provide 2-3 sentences that:\n\
             1. Summarize their learning journey\n\
             2. Highlight patterns or trends\n\
             3. Suggest next steps for improvement\n\n\
             Insight:"
        );
        self.llm.complete(&prompt).await
    }
}
