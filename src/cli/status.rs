//! Status command implementation

use anyhow::Result;

use marquee::progress::streaks;
use marquee::ProgressEngine;

/// Show the profile summary. Opening the hub also rotates today's quests.
pub fn status_command(engine: &ProgressEngine, json: bool) -> Result<()> {
    let outcome = engine.refresh()?;
    let profile = &outcome.profile;

    if json {
        println!("{}", serde_json::to_string_pretty(profile)?);
        return Ok(());
    }

    let stats = &profile.stats;
    println!("{} {}", profile.avatar, profile.username);
    println!("  Total score:   {}", stats.total_score);
    println!("  Today:         {}", stats.daily_scores.get(outcome.day));
    println!("  Games played:  {}", stats.games_played);
    println!(
        "  Streak:        {} (best {})",
        streaks::display_streak(&stats.streak, outcome.day),
        stats.streak.best_streak
    );
    println!(
        "  Achievements:  {}/{} ({} pts)",
        profile.achievements.unlocked.len(),
        engine.achievements().catalogue().len(),
        profile.achievements.total_points
    );
    println!(
        "  Quests today:  {}/{}",
        profile.daily_quests.completed_ids.len(),
        profile.daily_quests.quest_ids.len()
    );

    if !outcome.events.is_empty() {
        println!();
        super::print_events(&outcome);
    }

    Ok(())
}
