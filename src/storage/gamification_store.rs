//! Gamification data storage operations.
//!
//! Provides persistence for:
//! - Student profiles (XP, level, streak fields)
//! - XP transactions (append-only ledger)
//! - Earned badges
//! - Chat messages (feeds the chat-interaction badge stat)

use chrono::{DateTime, NaiveDate, Utc};
use rusqlite::{params, Connection};

use crate::gamification::types::{EarnedBadge, StudentProfile, XpTransaction};
use crate::storage::database::{map_sqlite_err, DatabaseError};

/// Store for persisting gamification state.
pub struct GamificationStore<'a> {
    conn: &'a Connection,
}

impl<'a> GamificationStore<'a> {
    /// Create a new gamification store with the given connection.
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    // ========== Profile Operations ==========

    /// Get a profile by student id.
    pub fn get_profile(&self, student_id: &str) -> Result<Option<StudentProfile>, DatabaseError> {
        let mut stmt = self
            .conn
            .prepare(
                "SELECT student_id, total_xp, level, current_streak, longest_streak,
                        last_activity_date, created_at, updated_at
                 FROM student_profiles WHERE student_id = ?1",
            )
            .map_err(|e| DatabaseError::QueryFailed(e.to_string()))?;

        let mut rows = stmt
            .query(params![student_id])
            .map_err(|e| DatabaseError::QueryFailed(e.to_string()))?;

        if let Some(row) = rows
            .next()
            .map_err(|e| DatabaseError::QueryFailed(e.to_string()))?
        {
            Ok(Some(row_to_profile(row)?))
        } else {
            Ok(None)
        }
    }

    /// Get or create a profile, lazily creating the zero state on first use.
    pub fn get_or_create_profile(
        &self,
        student_id: &str,
    ) -> Result<StudentProfile, DatabaseError> {
        if let Some(profile) = self.get_profile(student_id)? {
            return Ok(profile);
        }

        let profile = StudentProfile::new(student_id);
        self.insert_profile(&profile)?;
        Ok(profile)
    }

    /// Insert a new profile.
    pub fn insert_profile(&self, profile: &StudentProfile) -> Result<(), DatabaseError> {
        self.conn
            .execute(
                "INSERT INTO student_profiles (student_id, total_xp, level, current_streak,
                                               longest_streak, last_activity_date, created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
                params![
                    profile.student_id,
                    profile.total_xp,
                    profile.level,
                    profile.current_streak,
                    profile.longest_streak,
                    profile.last_activity_date.map(|d| d.to_string()),
                    profile.created_at.to_rfc3339(),
                    profile.updated_at.to_rfc3339(),
                ],
            )
            .map_err(map_sqlite_err)?;
        Ok(())
    }

    /// Update a profile's mutable fields.
    pub fn update_profile(&self, profile: &StudentProfile) -> Result<(), DatabaseError> {
        self.conn
            .execute(
                "UPDATE student_profiles SET total_xp = ?2, level = ?3, current_streak = ?4,
                                             longest_streak = ?5, last_activity_date = ?6, updated_at = ?7
                 WHERE student_id = ?1",
                params![
                    profile.student_id,
                    profile.total_xp,
                    profile.level,
                    profile.current_streak,
                    profile.longest_streak,
                    profile.last_activity_date.map(|d| d.to_string()),
                    Utc::now().to_rfc3339(),
                ],
            )
            .map_err(map_sqlite_err)?;
        Ok(())
    }

    // ========== XP Ledger Operations ==========

    /// Append a transaction to the XP ledger.
    pub fn insert_transaction(
        &self,
        student_id: &str,
        xp_amount: i64,
        activity_type: &str,
        description: Option<&str>,
        timestamp: DateTime<Utc>,
    ) -> Result<(), DatabaseError> {
        self.conn
            .execute(
                "INSERT INTO xp_transactions (student_id, xp_amount, activity_type, description, timestamp)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                params![
                    student_id,
                    xp_amount,
                    activity_type,
                    description,
                    timestamp.to_rfc3339(),
                ],
            )
            .map_err(map_sqlite_err)?;
        Ok(())
    }

    /// The most recent ledger entries for a student, newest first.
    pub fn recent_transactions(
        &self,
        student_id: &str,
        limit: u32,
    ) -> Result<Vec<XpTransaction>, DatabaseError> {
        let mut stmt = self
            .conn
            .prepare(
                "SELECT id, student_id, xp_amount, activity_type, description, timestamp
                 FROM xp_transactions WHERE student_id = ?1
                 ORDER BY timestamp DESC, id DESC LIMIT ?2",
            )
            .map_err(|e| DatabaseError::QueryFailed(e.to_string()))?;

        let rows = stmt
            .query_map(params![student_id, limit], |row| {
                Ok((
                    row.get::<_, i64>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, i64>(2)?,
                    row.get::<_, String>(3)?,
                    row.get::<_, Option<String>>(4)?,
                    row.get::<_, String>(5)?,
                ))
            })
            .map_err(|e| DatabaseError::QueryFailed(e.to_string()))?;

        let mut transactions = Vec::new();
        for row in rows {
            let (id, student_id, xp_amount, activity_type, description, ts_str) =
                row.map_err(|e| DatabaseError::QueryFailed(e.to_string()))?;
            transactions.push(XpTransaction {
                id,
                student_id,
                xp_amount,
                activity_type,
                description,
                timestamp: parse_utc(&ts_str)?,
            });
        }

        Ok(transactions)
    }

    /// Count ledger entries for a student with the given activity type.
    pub fn count_transactions_by_activity(
        &self,
        student_id: &str,
        activity_type: &str,
    ) -> Result<i64, DatabaseError> {
        self.conn
            .query_row(
                "SELECT COUNT(*) FROM xp_transactions WHERE student_id = ?1 AND activity_type = ?2",
                params![student_id, activity_type],
                |row| row.get(0),
            )
            .map_err(|e| DatabaseError::QueryFailed(e.to_string()))
    }

    // ========== Badge Operations ==========

    /// Record an earned badge. Idempotent: re-inserting an already-owned
    /// badge is a no-op thanks to the (student_id, badge_id) uniqueness.
    pub fn insert_badge(
        &self,
        student_id: &str,
        badge_id: &str,
        badge_type: &str,
        earned_date: DateTime<Utc>,
    ) -> Result<(), DatabaseError> {
        self.conn
            .execute(
                "INSERT OR IGNORE INTO student_badges (student_id, badge_id, badge_type, earned_date)
                 VALUES (?1, ?2, ?3, ?4)",
                params![student_id, badge_id, badge_type, earned_date.to_rfc3339()],
            )
            .map_err(map_sqlite_err)?;
        Ok(())
    }

    /// All badges earned by a student, oldest first.
    pub fn list_badges(&self, student_id: &str) -> Result<Vec<EarnedBadge>, DatabaseError> {
        let mut stmt = self
            .conn
            .prepare(
                "SELECT student_id, badge_id, badge_type, earned_date
                 FROM student_badges WHERE student_id = ?1 ORDER BY earned_date, id",
            )
            .map_err(|e| DatabaseError::QueryFailed(e.to_string()))?;

        let rows = stmt
            .query_map(params![student_id], |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, String>(2)?,
                    row.get::<_, String>(3)?,
                ))
            })
            .map_err(|e| DatabaseError::QueryFailed(e.to_string()))?;

        let mut badges = Vec::new();
        for row in rows {
            let (student_id, badge_id, badge_type, earned_str) =
                row.map_err(|e| DatabaseError::QueryFailed(e.to_string()))?;
            badges.push(EarnedBadge {
                student_id,
                badge_id,
                badge_type,
                earned_date: parse_utc(&earned_str)?,
            });
        }

        Ok(badges)
    }

    // ========== Chat Message Operations ==========

    /// Log a chat message for a student.
    pub fn log_chat_message(
        &self,
        student_id: &str,
        role: &str,
        content: &str,
    ) -> Result<(), DatabaseError> {
        self.conn
            .execute(
                "INSERT INTO chat_messages (student_id, role, content, timestamp)
                 VALUES (?1, ?2, ?3, ?4)",
                params![student_id, role, content, Utc::now().to_rfc3339()],
            )
            .map_err(map_sqlite_err)?;
        Ok(())
    }

    /// Count chat messages authored by the student under the given role.
    pub fn count_chat_messages(
        &self,
        student_id: &str,
        role: &str,
    ) -> Result<i64, DatabaseError> {
        self.conn
            .query_row(
                "SELECT COUNT(*) FROM chat_messages WHERE student_id = ?1 AND role = ?2",
                params![student_id, role],
                |row| row.get(0),
            )
            .map_err(|e| DatabaseError::QueryFailed(e.to_string()))
    }
}

fn row_to_profile(row: &rusqlite::Row<'_>) -> Result<StudentProfile, DatabaseError> {
    let last_activity_str: Option<String> = row
        .get(5)
        .map_err(|e| DatabaseError::QueryFailed(e.to_string()))?;
    let created_str: String = row
        .get(6)
        .map_err(|e| DatabaseError::QueryFailed(e.to_string()))?;
    let updated_str: String = row
        .get(7)
        .map_err(|e| DatabaseError::QueryFailed(e.to_string()))?;

    Ok(StudentProfile {
        student_id: row
            .get(0)
            .map_err(|e| DatabaseError::QueryFailed(e.to_string()))?,
        total_xp: row
            .get(1)
            .map_err(|e| DatabaseError::QueryFailed(e.to_string()))?,
        level: row
            .get(2)
            .map_err(|e| DatabaseError::QueryFailed(e.to_string()))?,
        current_streak: row
            .get(3)
            .map_err(|e| DatabaseError::QueryFailed(e.to_string()))?,
        longest_streak: row
            .get(4)
            .map_err(|e| DatabaseError::QueryFailed(e.to_string()))?,
        last_activity_date: last_activity_str
            .map(|s| parse_date(&s))
            .transpose()?,
        created_at: parse_utc(&created_str)?,
        updated_at: parse_utc(&updated_str)?,
    })
}

pub(crate) fn parse_utc(s: &str) -> Result<DateTime<Utc>, DatabaseError> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| DatabaseError::QueryFailed(e.to_string()))
}

pub(crate) fn parse_date(s: &str) -> Result<NaiveDate, DatabaseError> {
    s.parse::<NaiveDate>()
        .map_err(|e| DatabaseError::QueryFailed(e.to_string()))
}
