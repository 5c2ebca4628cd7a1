//! Record command implementation

use std::collections::BTreeMap;

use anyhow::{bail, Context, Result};
use chrono::Utc;

use marquee::{CounterUpdate, Outcome, ProgressEngine, ScoreEvent};

/// Parse `name=value` pairs into counter updates of one kind.
fn parse_counters(
    pairs: &[String],
    make: fn(i64) -> CounterUpdate,
    into: &mut BTreeMap<String, CounterUpdate>,
) -> Result<()> {
    for pair in pairs {
        let Some((name, value)) = pair.split_once('=') else {
            bail!("Expected name=value, got '{}'", pair);
        };
        let value: i64 = value
            .trim()
            .parse()
            .with_context(|| format!("Counter '{}' needs an integer value", name))?;
        into.insert(name.trim().to_string(), make(value));
    }
    Ok(())
}

/// Record one game outcome and print what it unlocked
pub fn record_command(
    engine: &ProgressEngine,
    game: &str,
    points: f64,
    outcome: &str,
    add: &[String],
    max: &[String],
    set: &[String],
) -> Result<()> {
    let Some(outcome) = Outcome::from_str(outcome) else {
        bail!("Unknown outcome '{}' (expected win, loss or progress)", outcome);
    };

    let mut counters = BTreeMap::new();
    parse_counters(add, CounterUpdate::Add, &mut counters)?;
    parse_counters(max, CounterUpdate::Max, &mut counters)?;
    parse_counters(set, CounterUpdate::Set, &mut counters)?;

    let event = ScoreEvent {
        game_id: game.to_string(),
        points_delta: points,
        occurred_at: Utc::now(),
        outcome,
        counters,
    };

    let result = engine.record(&event)?;
    println!(
        "Recorded {} {:+} for {} (total {})",
        outcome.as_str(),
        points,
        game,
        result.profile.stats.total_score
    );
    super::print_events(&result);

    Ok(())
}
