//! Recent daily scores, the "last 7 days" panel
//!
//! Windows are calendar days ending today, not rolling 24h spans.

use chrono::NaiveDate;

use super::clock::window_start;
use super::models::{DailyScore, Profile};

pub const DEFAULT_WINDOW_DAYS: u32 = 7;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeaderboardView {
    pub from: NaiveDate,
    pub to: NaiveDate,
    /// Days with a score row in the window, newest first
    pub days: Vec<DailyScore>,
    pub total: i64,
}

impl LeaderboardView {
    pub fn best(&self) -> Option<&DailyScore> {
        self.days.iter().max_by_key(|d| d.points)
    }
}

/// Score rows from the last `window_days` calendar days, today included.
pub fn recent_days(profile: &Profile, today: NaiveDate, window_days: u32) -> LeaderboardView {
    let from = window_start(today, window_days);
    let days: Vec<DailyScore> = profile.stats.daily_scores.between(from, today).rev().collect();
    let total = days.iter().map(|d| d.points).sum();

    LeaderboardView {
        from,
        to: today,
        days,
        total,
    }
}
