//! Database schema definitions for StudyHub.

/// SQL schema for creating all database tables.
pub const SCHEMA: &str = r#"
-- Student gamification profiles
CREATE TABLE IF NOT EXISTS student_profiles (
    student_id TEXT PRIMARY KEY,
    total_xp INTEGER NOT NULL DEFAULT 0,
    level INTEGER NOT NULL DEFAULT 1,
    current_streak INTEGER NOT NULL DEFAULT 0,
    longest_streak INTEGER NOT NULL DEFAULT 0,
    last_activity_date TEXT,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);

-- XP ledger: append-only record of XP-granting events
CREATE TABLE IF NOT EXISTS xp_transactions (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    student_id TEXT NOT NULL REFERENCES student_profiles(student_id),
    xp_amount INTEGER NOT NULL,
    activity_type TEXT NOT NULL,
    description TEXT,
    timestamp TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_xp_transactions_student_id ON xp_transactions(student_id);
CREATE INDEX IF NOT EXISTS idx_xp_transactions_timestamp ON xp_transactions(timestamp);
CREATE INDEX IF NOT EXISTS idx_xp_transactions_activity ON xp_transactions(activity_type);

-- Earned badges, at most one row per (student, badge)
CREATE TABLE IF NOT EXISTS student_badges (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    student_id TEXT NOT NULL REFERENCES student_profiles(student_id),
    badge_id TEXT NOT NULL,
    badge_type TEXT NOT NULL,
    earned_date TEXT NOT NULL,
    UNIQUE(student_id, badge_id)
);

CREATE INDEX IF NOT EXISTS idx_student_badges_student_id ON student_badges(student_id);

-- Raw quiz attempts, immutable once recorded
CREATE TABLE IF NOT EXISTS quiz_attempts (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    quiz_id TEXT NOT NULL,
    student_id TEXT NOT NULL,
    topic TEXT NOT NULL,
    difficulty TEXT NOT NULL,
    questions_json TEXT NOT NULL,
    answers_json TEXT NOT NULL,
    correct_count INTEGER NOT NULL,
    total_questions INTEGER NOT NULL,
    timestamp TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_quiz_attempts_student_id ON quiz_attempts(student_id);
CREATE INDEX IF NOT EXISTS idx_quiz_attempts_timestamp ON quiz_attempts(timestamp);

-- Incrementally maintained per-topic rollups
CREATE TABLE IF NOT EXISTS topic_performance (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    student_id TEXT NOT NULL,
    topic TEXT NOT NULL,
    total_attempts INTEGER NOT NULL DEFAULT 0,
    correct_answers INTEGER NOT NULL DEFAULT 0,
    last_attempted TEXT NOT NULL,
    difficulty_distribution_json TEXT NOT NULL DEFAULT '{}',
    UNIQUE(student_id, topic)
);

CREATE INDEX IF NOT EXISTS idx_topic_performance_student_id ON topic_performance(student_id);

-- Chat transcript rows; student-authored rows feed the chat badge stat
CREATE TABLE IF NOT EXISTS chat_messages (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    student_id TEXT NOT NULL,
    role TEXT NOT NULL,
    content TEXT NOT NULL,
    timestamp TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_chat_messages_student_id ON chat_messages(student_id);
"#;

/// Schema version tracking table.
pub const SCHEMA_VERSION_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS schema_version (
    version INTEGER PRIMARY KEY,
    applied_at TEXT NOT NULL
);
"#;

/// Current schema version.
pub const CURRENT_VERSION: i32 = 1;
