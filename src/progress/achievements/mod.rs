//! Achievements: one-time unlocks evaluated against the whole profile

mod checker;
mod definitions;

pub use checker::{AchievementEngine, AchievementStatus};
pub use definitions::{Achievement, AchievementCategory, Predicate, ACHIEVEMENTS};
