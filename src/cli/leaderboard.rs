//! Leaderboard command implementation

use anyhow::Result;

use marquee::ProgressEngine;

/// Show the recent-days score panel
pub fn leaderboard_command(engine: &ProgressEngine, json: bool) -> Result<()> {
    let view = engine.leaderboard()?;

    if json {
        println!("{}", serde_json::to_string_pretty(&view.days)?);
        return Ok(());
    }

    if view.days.is_empty() {
        println!("No scores between {} and {}.", view.from, view.to);
        return Ok(());
    }

    let best = view.best().map(|d| d.date);
    println!("Scores {} .. {}:\n", view.from, view.to);
    for day in &view.days {
        let marker = if Some(day.date) == best { " 🏆" } else { "" };
        println!("  {}  {:>6}{}", day.date, day.points, marker);
    }
    println!("\n  Total: {}", view.total);

    Ok(())
}
