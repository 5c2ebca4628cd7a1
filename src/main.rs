use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use marquee::config::Config;
use marquee::ProgressEngine;

mod cli;

#[derive(Parser)]
#[command(name = "marquee")]
#[command(about = "Movie game hub progression - scores, streaks, achievements and daily quests")]
#[command(version)]
struct Cli {
    /// Path to the config file (defaults to ~/.marquee/config.toml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the profile summary (default)
    Status {
        /// Print the stored profile as JSON
        #[arg(long)]
        json: bool,
    },

    /// Record the outcome of a game round
    Record {
        /// Game id (guesser, criteria, poster, rating, timed_challenge, oscar_wins, quote)
        game: String,

        /// Points won or lost
        #[arg(allow_negative_numbers = true)]
        points: f64,

        /// win, loss or progress
        #[arg(long, default_value = "win")]
        outcome: String,

        /// Add to a game counter, e.g. --add correctGuesses=1
        #[arg(long, value_name = "NAME=N")]
        add: Vec<String>,

        /// Keep the larger value, e.g. --max highScore=90
        #[arg(long, value_name = "NAME=N")]
        max: Vec<String>,

        /// Overwrite a counter, e.g. --set accuracy=85
        #[arg(long, value_name = "NAME=N")]
        set: Vec<String>,
    },

    /// Show today's daily quests
    Quests {
        #[arg(long)]
        json: bool,
    },

    /// List achievements and which are unlocked
    Achievements {
        #[arg(long)]
        json: bool,
    },

    /// Show scores for the last few days
    Leaderboard {
        /// Number of calendar days, today included
        #[arg(long)]
        days: Option<u32>,

        #[arg(long)]
        json: bool,
    },

    /// Change username and/or avatar
    Rename {
        username: Option<String>,

        #[arg(long)]
        avatar: Option<String>,
    },

    /// Delete all progress
    Reset {
        #[arg(long)]
        yes: bool,
    },

    /// Initialize a new ~/.marquee/config.toml configuration file
    Init {
        /// Overwrite existing config file
        #[arg(long)]
        force: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    let open_engine = || -> Result<ProgressEngine> {
        let config = Config::load_from(cli.config.as_deref())?;
        ProgressEngine::from_config(&config)
    };

    match cli.command.unwrap_or(Commands::Status { json: false }) {
        Commands::Status { json } => cli::status::status_command(&open_engine()?, json)?,
        Commands::Record {
            game,
            points,
            outcome,
            add,
            max,
            set,
        } => cli::record::record_command(&open_engine()?, &game, points, &outcome, &add, &max, &set)?,
        Commands::Quests { json } => cli::quests::quests_command(&open_engine()?, json)?,
        Commands::Achievements { json } => {
            cli::achievements::achievements_command(&open_engine()?, json)?
        }
        Commands::Leaderboard { days, json } => {
            let mut engine = open_engine()?;
            if let Some(days) = days {
                engine = engine.leaderboard_days(days);
            }
            cli::leaderboard::leaderboard_command(&engine, json)?
        }
        Commands::Rename { username, avatar } => {
            cli::profile::rename_command(&open_engine()?, username, avatar)?
        }
        Commands::Reset { yes } => cli::profile::reset_command(&open_engine()?, yes)?,
        Commands::Init { force } => cli::init::init_command(cli.config.clone(), force)?,
    }

    Ok(())
}
