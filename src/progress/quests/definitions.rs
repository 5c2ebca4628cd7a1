//! Daily quest definitions
//!
//! Quest conditions only look at activity from the quest day itself, so a
//! long-time player does not finish a quest the moment it is handed out.

use std::fmt;

use crate::progress::error::RuleError;
use crate::progress::models::{counters, DailyActivity, GameId, Profile};

pub type QuestPredicate = fn(&Profile) -> Result<bool, RuleError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuestDifficulty {
    Easy,
    Medium,
    Hard,
}

impl QuestDifficulty {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Easy => "easy",
            Self::Medium => "medium",
            Self::Hard => "hard",
        }
    }
}

#[derive(Clone, Copy)]
pub struct DailyQuest {
    pub id: &'static str,
    pub title: &'static str,
    pub description: &'static str,
    pub icon: &'static str,
    pub difficulty: QuestDifficulty,
    /// Points credited to the total score on completion
    pub reward: i64,
    pub predicate: QuestPredicate,
}

impl fmt::Debug for DailyQuest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DailyQuest")
            .field("id", &self.id)
            .field("reward", &self.reward)
            .finish_non_exhaustive()
    }
}

/// Activity on the profile's quest day; `None` if nothing happened yet.
fn quest_day_activity(p: &Profile) -> Result<Option<&DailyActivity>, RuleError> {
    let day = p.daily_quests.for_date.ok_or(RuleError::NoQuestDay)?;
    Ok(p.stats.activity_on(day))
}

pub static DAILY_QUESTS: &[DailyQuest] = &[
    DailyQuest {
        id: "poster_challenge",
        title: "Poster Detective",
        description: "Correctly guess 5 movie posters",
        icon: "🕵️",
        difficulty: QuestDifficulty::Medium,
        reward: 50,
        predicate: |p| {
            Ok(quest_day_activity(p)?
                .is_some_and(|a| a.counter(GameId::Poster, counters::CORRECT_GUESSES) >= 5))
        },
    },
    DailyQuest {
        id: "rating_expert",
        title: "Rating Guru",
        description: "Guess movie ratings with 80% accuracy",
        icon: "⭐",
        difficulty: QuestDifficulty::Hard,
        reward: 75,
        predicate: |p| {
            let Some(rating) = quest_day_activity(p)?.and_then(|a| a.per_game.get(&GameId::Rating))
            else {
                return Ok(false);
            };
            // Games that report no accuracy simply do not count
            Ok(rating
                .try_get(counters::ACCURACY)
                .is_some_and(|accuracy| accuracy >= 80))
        },
    },
    DailyQuest {
        id: "genre_master",
        title: "Genre Explorer",
        description: "Play 3 different movie games today",
        icon: "🌈",
        difficulty: QuestDifficulty::Hard,
        reward: 100,
        predicate: |p| Ok(quest_day_activity(p)?.is_some_and(|a| a.games_touched() >= 3)),
    },
    DailyQuest {
        id: "speed_challenge",
        title: "Speed Runner",
        description: "Complete the Timed Challenge game",
        icon: "⏱️",
        difficulty: QuestDifficulty::Medium,
        reward: 60,
        predicate: |p| {
            Ok(quest_day_activity(p)?
                .is_some_and(|a| a.counter(GameId::TimedChallenge, counters::COMPLETED) > 0))
        },
    },
    DailyQuest {
        id: "hat_trick",
        title: "Winning Streak",
        description: "Win 5 games today",
        icon: "🎯",
        difficulty: QuestDifficulty::Easy,
        reward: 40,
        predicate: |p| Ok(quest_day_activity(p)?.is_some_and(|a| a.wins >= 5)),
    },
    DailyQuest {
        id: "point_collector",
        title: "Box Office Hit",
        description: "Earn 200 points today",
        icon: "🎟️",
        difficulty: QuestDifficulty::Medium,
        reward: 50,
        predicate: |p| {
            let day = p.daily_quests.for_date.ok_or(RuleError::NoQuestDay)?;
            Ok(p.stats.daily_scores.get(day) >= 200)
        },
    },
];

impl DailyQuest {
    /// Look up a definition in the default catalogue
    pub fn get(id: &str) -> Option<&'static DailyQuest> {
        DAILY_QUESTS.iter().find(|q| q.id == id)
    }
}
