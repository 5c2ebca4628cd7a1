//! Daily streak tracking
//!
//! The streak only moves when a day's first score event commits. Nothing
//! breaks a streak in the background: a player who stops playing keeps the
//! old number until their next event, at which point it drops back to 1.
//! Use [`display_streak`] when showing the number to the player.

use chrono::NaiveDate;

use super::clock::{days_between, is_next_day, is_same_day};
use super::models::StreakState;

/// Result of feeding a committed score into the streak.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreakTransition {
    /// No previous streak; started at 1
    Started,
    /// Played on the day after the last streak day
    Extended(u32),
    /// Already counted today
    Unchanged,
    /// A gap of two or more days; back to 1
    Reset { previous: u32 },
}

impl StreakTransition {
    /// Streak length after the transition, if it changed.
    pub fn count(&self) -> Option<u32> {
        match self {
            Self::Started | Self::Reset { .. } => Some(1),
            Self::Extended(n) => Some(*n),
            Self::Unchanged => None,
        }
    }
}

/// Apply a score committed on `today` to the streak.
pub fn on_score_committed(streak: &mut StreakState, today: NaiveDate) -> StreakTransition {
    let transition = match streak.last_streak_date {
        None => {
            streak.current_streak = 1;
            StreakTransition::Started
        }
        Some(last) if is_same_day(last, today) => return StreakTransition::Unchanged,
        Some(last) if is_next_day(last, today) => {
            streak.current_streak = streak.current_streak.saturating_add(1).max(1);
            StreakTransition::Extended(streak.current_streak)
        }
        Some(last) => {
            // Clock went backwards: count today without touching the run.
            if days_between(last, today) < 0 {
                tracing::warn!(
                    "Score committed on {} before last streak day {}; streak left unchanged",
                    today,
                    last
                );
                return StreakTransition::Unchanged;
            }
            let previous = streak.current_streak;
            streak.current_streak = 1;
            StreakTransition::Reset { previous }
        }
    };

    streak.last_streak_date = Some(today);
    streak.best_streak = streak.best_streak.max(streak.current_streak);
    tracing::debug!("Streak transition on {}: {:?}", today, transition);
    transition
}

/// Streak as it should be shown today: 0 once a day has been missed.
pub fn display_streak(streak: &StreakState, today: NaiveDate) -> u32 {
    match streak.last_streak_date {
        Some(last) if (0..=1).contains(&days_between(last, today)) => streak.current_streak,
        _ => 0,
    }
}

/// True if playing today would extend (rather than start or keep) the streak.
pub fn can_extend(streak: &StreakState, today: NaiveDate) -> bool {
    streak
        .last_streak_date
        .is_some_and(|last| is_next_day(last, today))
}
