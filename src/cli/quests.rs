//! Quests command implementation

use anyhow::Result;
use serde_json::json;

use marquee::ProgressEngine;

/// Show today's quests
pub fn quests_command(engine: &ProgressEngine, json: bool) -> Result<()> {
    let outcome = engine.refresh()?;
    let statuses = engine.quest_statuses()?;
    let quests = &outcome.profile.daily_quests;

    if json {
        let items: Vec<_> = statuses
            .iter()
            .map(|s| {
                json!({
                    "id": s.quest.id,
                    "title": s.quest.title,
                    "difficulty": s.quest.difficulty.label(),
                    "reward": s.quest.reward,
                    "completed": s.completed,
                })
            })
            .collect();
        println!(
            "{}",
            serde_json::to_string_pretty(&json!({
                "date": quests.for_date,
                "quests": items,
                "rewardTotal": quests.reward_total,
            }))?
        );
        return Ok(());
    }

    println!("Daily quests for {}:\n", outcome.day);
    for status in &statuses {
        let q = status.quest;
        let mark = if status.completed { "✓" } else { " " };
        println!(
            "  [{}] {} {} ({}, +{})",
            mark,
            q.icon,
            q.title,
            q.difficulty.label(),
            q.reward
        );
        println!("      {}", q.description);
    }
    println!("\n  Rewards earned today: {}", quests.reward_total);

    Ok(())
}
