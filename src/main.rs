//! Command-line driver: play one game from a settings file and print the
//! reports.

use clap::Parser;
use rust_ladders::simulation::{play_a_game, ReportFrequency};
use rust_ladders::Settings;
use std::path::PathBuf;
use tracing::info;

#[derive(Parser)]
#[command(name = "ladders")]
#[command(about = "Simulate a snakes-and-ladders race with rock-paper-scissors duels")]
struct Args {
    /// Settings file (JSON with a top-level "settings" object)
    #[arg(short, long, default_value = "./config/settings.json")]
    settings: PathBuf,

    /// Override the seed from the settings file
    #[arg(long)]
    seed: Option<u64>,

    /// Override the round cap from the settings file
    #[arg(long)]
    max_turns: Option<u32>,

    /// When to capture reports
    #[arg(long, value_enum, default_value = "turn")]
    report: ReportFrequency,

    /// Print reports as JSON lines instead of text
    #[arg(long)]
    json: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    // Silent by default, only show warnings/errors
    let filter = if args.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let mut settings = Settings::load(&args.settings)?;
    if let Some(seed) = args.seed {
        settings.seed = seed;
    }
    if let Some(max_turns) = args.max_turns {
        settings.max_turns = max_turns;
    }
    info!(path = %args.settings.display(), players = settings.players.len(), "loaded settings");

    let record = play_a_game(&settings, args.report)?;

    for report in record.reports.values() {
        if args.json {
            println!("{}", report.to_json()?);
        } else {
            println!("{report}\n");
        }
    }

    if !args.json {
        match &record.winners {
            Some(winners) => println!("Game over after {} turns: {}", record.turns, winners.join(", ")),
            None => println!("No winner after {} turns", record.turns),
        }
    }

    Ok(())
}
