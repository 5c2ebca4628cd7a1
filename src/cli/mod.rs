//! CLI command implementations

pub mod achievements;
pub mod init;
pub mod leaderboard;
pub mod profile;
pub mod quests;
pub mod record;
pub mod status;

use marquee::{ProgressEvent, ProgressOutcome};

/// One line per event, the terminal version of the hub's toasts.
pub(crate) fn print_events(outcome: &ProgressOutcome) {
    for event in &outcome.events {
        match event {
            ProgressEvent::StreakChanged(transition) => {
                if let Some(count) = transition.count() {
                    println!("  🔥 Streak: {} day(s)", count);
                }
            }
            ProgressEvent::QuestsRotated { day, quest_ids } => {
                println!("  📅 New quests for {}: {}", day, quest_ids.join(", "));
            }
            ProgressEvent::AchievementUnlocked(unlocked) => {
                let a = unlocked.achievement;
                println!("  {} Achievement unlocked: {} (+{} pts)", a.icon, a.title, a.points);
            }
            ProgressEvent::QuestCompleted(completed) => {
                let q = completed.quest;
                println!("  {} Quest complete: {} (+{} pts)", q.icon, q.title, q.reward);
            }
        }
    }
}
