//! Achievements command implementation

use anyhow::Result;
use serde_json::json;

use marquee::ProgressEngine;

pub fn achievements_command(engine: &ProgressEngine, json: bool) -> Result<()> {
    let statuses = engine.achievement_progress()?;

    if json {
        let items: Vec<_> = statuses
            .iter()
            .map(|s| {
                json!({
                    "id": s.achievement.id,
                    "title": s.achievement.title,
                    "category": s.achievement.category.label(),
                    "points": s.achievement.points,
                    "unlocked": s.unlocked,
                })
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&items)?);
        return Ok(());
    }

    let unlocked = statuses.iter().filter(|s| s.unlocked).count();
    println!("Achievements ({}/{}):\n", unlocked, statuses.len());

    for status in &statuses {
        let a = status.achievement;
        let icon = if status.unlocked { a.icon } else { "🔒" };
        println!("  {} {} [{}] +{}", icon, a.title, a.category.label(), a.points);
        println!("      {}", a.description);
    }

    Ok(())
}
