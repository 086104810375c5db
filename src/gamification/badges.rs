//! Badge catalog and eligibility evaluation.
//!
//! A badge is eligible when every criterion in its requirement map is met
//! by the student's stats snapshot (AND semantics). Badges are one-way
//! achievements: once awarded they are never revoked, even if a later
//! snapshot no longer satisfies the criteria.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Badge type recorded for every catalog badge.
pub const BADGE_TYPE_ACHIEVEMENT: &str = "achievement";

/// A badge definition with its eligibility criteria.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BadgeDefinition {
    pub id: String,
    pub name: String,
    pub description: String,
    /// Stat key -> minimum required value.
    pub criteria: BTreeMap<String, i64>,
}

impl BadgeDefinition {
    pub fn new(
        id: &str,
        name: &str,
        description: &str,
        criteria: &[(&str, i64)],
    ) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            description: description.to_string(),
            criteria: criteria
                .iter()
                .map(|(k, v)| (k.to_string(), *v))
                .collect(),
        }
    }

    /// Whether the stats snapshot satisfies every criterion. Unknown stat
    /// keys count as zero, so a badge with a misspelled criterion is simply
    /// never earned.
    pub fn is_eligible(&self, stats: &StudentStats) -> bool {
        self.criteria
            .iter()
            .all(|(key, required)| stats.get(key) >= *required)
    }
}

/// Snapshot of the stats badge criteria are evaluated against.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StudentStats {
    pub quizzes_completed: i64,
    pub graphs_created: i64,
    pub longest_streak: i64,
    pub current_streak: i64,
    pub total_xp: i64,
    pub perfect_quizzes: i64,
    pub level: i64,
    pub chat_interactions: i64,
}

impl StudentStats {
    /// Look up a stat by its criteria key; unknown keys are 0.
    pub fn get(&self, key: &str) -> i64 {
        match key {
            "quizzes_completed" => self.quizzes_completed,
            "graphs_created" => self.graphs_created,
            "longest_streak" => self.longest_streak,
            "current_streak" => self.current_streak,
            "total_xp" => self.total_xp,
            "perfect_quizzes" => self.perfect_quizzes,
            "level" => self.level,
            "chat_interactions" => self.chat_interactions,
            _ => 0,
        }
    }
}

/// Ids of all badges in the catalog satisfied by the snapshot, in catalog
/// order.
pub fn eligible_badge_ids(catalog: &[BadgeDefinition], stats: &StudentStats) -> Vec<String> {
    catalog
        .iter()
        .filter(|badge| badge.is_eligible(stats))
        .map(|badge| badge.id.clone())
        .collect()
}

/// The default badge catalog.
pub fn default_badges() -> Vec<BadgeDefinition> {
    vec![
        BadgeDefinition::new(
            "QUIZ_MASTER",
            "Quiz Master",
            "Complete 50 quizzes",
            &[("quizzes_completed", 50)],
        ),
        BadgeDefinition::new(
            "QUIZ_LEGEND",
            "Quiz Legend",
            "Complete 100 quizzes",
            &[("quizzes_completed", 100)],
        ),
        BadgeDefinition::new(
            "GRAPH_GURU",
            "Graph Guru",
            "Create 20 knowledge graphs",
            &[("graphs_created", 20)],
        ),
        BadgeDefinition::new(
            "GRAPH_MASTER",
            "Graph Master",
            "Create 50 knowledge graphs",
            &[("graphs_created", 50)],
        ),
        BadgeDefinition::new(
            "CONSISTENCY_CHAMP",
            "Consistency Champ",
            "Maintain a 30-day streak",
            &[("longest_streak", 30)],
        ),
        BadgeDefinition::new(
            "STREAK_WARRIOR",
            "Streak Warrior",
            "Maintain a 7-day streak",
            &[("current_streak", 7)],
        ),
        BadgeDefinition::new(
            "PERFECTIONIST",
            "Perfectionist",
            "Score 100% on 10 quizzes",
            &[("perfect_quizzes", 10)],
        ),
        BadgeDefinition::new(
            "KNOWLEDGE_SEEKER",
            "Knowledge Seeker",
            "Earn 1000 total XP",
            &[("total_xp", 1000)],
        ),
        BadgeDefinition::new(
            "ELITE_LEARNER",
            "Elite Learner",
            "Reach Level 10",
            &[("level", 10)],
        ),
        BadgeDefinition::new(
            "CHAT_ENTHUSIAST",
            "Chat Enthusiast",
            "Have 50 chat interactions",
            &[("chat_interactions", 50)],
        ),
    ]
}
