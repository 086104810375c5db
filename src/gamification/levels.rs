//! Level calculations from cumulative XP.
//!
//! Levels are defined by an ascending sequence of XP thresholds: index 0 is
//! level 1's minimum, index i is level i+1's minimum. A student's level is
//! the largest `i + 1` whose threshold they have reached.

use serde::{Deserialize, Serialize};

/// Default XP thresholds. Level 1 starts at 0, level 15 at 10500.
const DEFAULT_THRESHOLDS: [i64; 15] = [
    0, 100, 300, 600, 1000, 1500, 2100, 2800, 3600, 4500, 5500, 6600, 7800, 9100, 10500,
];

/// Ascending XP thresholds defining the level ladder.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LevelTable {
    thresholds: Vec<i64>,
}

impl Default for LevelTable {
    fn default() -> Self {
        Self {
            thresholds: DEFAULT_THRESHOLDS.to_vec(),
        }
    }
}

impl LevelTable {
    /// Create a table from custom thresholds. The sequence must be ascending
    /// and non-empty; the defaults are used otherwise.
    pub fn new(thresholds: Vec<i64>) -> Self {
        if thresholds.is_empty() || thresholds.windows(2).any(|w| w[0] >= w[1]) {
            return Self::default();
        }
        Self { thresholds }
    }

    /// Highest reachable level.
    pub fn max_level(&self) -> u32 {
        self.thresholds.len() as u32
    }

    /// Level for a cumulative XP total. XP below the first threshold yields
    /// level 1.
    pub fn level_for_xp(&self, xp: i64) -> u32 {
        for (i, threshold) in self.thresholds.iter().enumerate().rev() {
            if xp >= *threshold {
                return (i + 1) as u32;
            }
        }
        1
    }

    /// XP remaining until the next level, 0 at the max level.
    pub fn xp_to_next_level(&self, xp: i64) -> i64 {
        let level = self.level_for_xp(xp) as usize;
        if level < self.thresholds.len() {
            self.thresholds[level] - xp
        } else {
            0
        }
    }

    /// Progress through the current level as a 0-100 percentage, rounded to
    /// 2 decimals and clamped to 100 at the max level.
    pub fn progress_percentage(&self, xp: i64) -> f64 {
        let level = self.level_for_xp(xp) as usize;
        if level >= self.thresholds.len() {
            return 100.0;
        }
        let start = self.thresholds[level - 1];
        let end = self.thresholds[level];
        let fraction = (xp - start) as f64 / (end - start) as f64;
        (fraction * 10000.0).round() / 100.0
    }
}
