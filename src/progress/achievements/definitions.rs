//! Achievement definitions
//!
//! Unlock conditions are plain functions over the profile. The profile only
//! stores the ids of unlocked achievements.

use std::fmt;

use crate::progress::error::RuleError;
use crate::progress::models::{counters, GameId, Profile};

/// Unlock condition. Must be pure: no I/O, no clock, no randomness.
pub type Predicate = fn(&Profile) -> Result<bool, RuleError>;

/// Achievement category for grouping in UI
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AchievementCategory {
    Milestone,
    Score,
    Game,
    Streak,
    Quest,
}

impl AchievementCategory {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Milestone => "Milestones",
            Self::Score => "Score",
            Self::Game => "Games",
            Self::Streak => "Streaks",
            Self::Quest => "Quests",
        }
    }
}

/// Achievement definition with all metadata
#[derive(Clone, Copy)]
pub struct Achievement {
    pub id: &'static str,
    pub title: &'static str,
    pub description: &'static str,
    pub icon: &'static str,
    pub category: AchievementCategory,
    pub points: u32,
    pub predicate: Predicate,
}

impl fmt::Debug for Achievement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Achievement")
            .field("id", &self.id)
            .field("points", &self.points)
            .finish_non_exhaustive()
    }
}

/// All achievement definitions, in evaluation and display order
pub static ACHIEVEMENTS: &[Achievement] = &[
    // === MILESTONE ===
    Achievement {
        id: "first_game",
        title: "First Steps",
        description: "Play your first game",
        icon: "🏁",
        category: AchievementCategory::Milestone,
        points: 10,
        predicate: |p| Ok(p.stats.games_played > 0),
    },
    Achievement {
        id: "veteran",
        title: "Trivia Veteran",
        description: "Play 50 games",
        icon: "🎖️",
        category: AchievementCategory::Milestone,
        points: 40,
        predicate: |p| Ok(p.stats.games_played >= 50),
    },
    // === SCORE ===
    Achievement {
        id: "movie_master",
        title: "Movie Master",
        description: "Reach a total score of 500 points",
        icon: "🏆",
        category: AchievementCategory::Score,
        points: 50,
        predicate: |p| Ok(p.stats.total_score >= 500),
    },
    Achievement {
        id: "big_day",
        title: "Blockbuster Day",
        description: "Score 300 points in a single day",
        icon: "💥",
        category: AchievementCategory::Score,
        points: 30,
        predicate: |p| Ok(p.stats.daily_scores.best_day().is_some_and(|d| d.points >= 300)),
    },
    // === GAME ===
    Achievement {
        id: "poster_expert",
        title: "Poster Expert",
        description: "Guess 20 movie posters correctly",
        icon: "🖼️",
        category: AchievementCategory::Game,
        points: 30,
        predicate: |p| Ok(p.stats.counter(GameId::Poster, counters::CORRECT_GUESSES) >= 20),
    },
    Achievement {
        id: "genre_diversity",
        title: "Genre Explorer",
        description: "Play all 5 different movie games",
        icon: "🌈",
        category: AchievementCategory::Game,
        points: 60,
        predicate: |p| {
            let played = GameId::hub_games()
                .iter()
                .filter(|g| p.stats.counter(**g, counters::PLAYS) > 0)
                .count();
            Ok(played == GameId::hub_games().len())
        },
    },
    // === STREAK ===
    Achievement {
        id: "on_fire",
        title: "On Fire",
        description: "Play 3 days in a row",
        icon: "🔥",
        category: AchievementCategory::Streak,
        points: 15,
        predicate: |p| Ok(p.stats.streak.current_streak >= 3),
    },
    Achievement {
        id: "daily_streak",
        title: "Consistent Player",
        description: "Play games for 7 consecutive days",
        icon: "📅",
        category: AchievementCategory::Streak,
        points: 40,
        predicate: |p| Ok(p.stats.streak.current_streak >= 7),
    },
    // === QUEST ===
    Achievement {
        id: "quest_hunter",
        title: "Quest Hunter",
        description: "Complete 10 daily quests",
        icon: "🗺️",
        category: AchievementCategory::Quest,
        points: 35,
        predicate: |p| Ok(p.daily_quests.lifetime_completed >= 10),
    },
];

impl Achievement {
    /// Look up a definition in the default catalogue
    pub fn get(id: &str) -> Option<&'static Achievement> {
        ACHIEVEMENTS.iter().find(|a| a.id == id)
    }

    /// Total possible points from all achievements
    pub fn total_points() -> u32 {
        ACHIEVEMENTS.iter().map(|a| a.points).sum()
    }
}
