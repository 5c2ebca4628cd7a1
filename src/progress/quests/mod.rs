//! Daily quests: three objectives per calendar day, each completable once

mod definitions;
mod tracker;

pub use definitions::{DailyQuest, QuestDifficulty, QuestPredicate, DAILY_QUESTS};
pub use tracker::{DailyQuestEngine, QuestStatus, QUESTS_PER_DAY};
