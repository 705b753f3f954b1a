use std::path::PathBuf;

use anyhow::Result;
use chrono::Weekday;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use swisspair::config::{self, RunConfig};
use swisspair::engine;
use swisspair::loader::load_roster;
use swisspair::report::render_roster;
use swisspair::roster::Roster;
use swisspair::writer::write_roster;

#[derive(Parser)]
#[command(name = "swisspair")]
#[command(about = "Swiss-style tournament pairing scheduler")]
#[command(version)]
struct Cli {
    /// Day of week to schedule: 0-6 (Monday is 0) or a day name
    #[arg(short, long, default_value = "5", value_parser = config::parse_day)]
    day: Weekday,

    /// Maximum score difference between paired opponents (inclusive)
    #[arg(short = 'p', long, default_value_t = 1.0)]
    max_point_difference: f32,

    /// Earliest time a match may start, as a float hour (12.5 is 12:30)
    #[arg(short, long, default_value_t = 12.0)]
    earliest_time: f32,

    /// Minimum gap between matches, in minutes
    #[arg(short = 't', long, default_value_t = 30)]
    min_time_gap: u16,

    /// Roster file to read
    #[arg(long, default_value = "Players.txt")]
    input: PathBuf,

    /// Updated roster file to write
    #[arg(long, default_value = "newPlayerList.txt")]
    output: PathBuf,

    /// Print the ranked roster with availability before pairing
    #[arg(short = 'v', long)]
    roster: bool,

    /// Emit the report as JSON instead of text
    #[arg(long)]
    json: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    log_level: String,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&cli.log_level));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = RunConfig {
        day: cli.day,
        max_point_difference: cli.max_point_difference,
        min_time_gap: cli.min_time_gap,
        earliest_time: cli.earliest_time,
    };
    config.validate()?;

    let players = load_roster(&cli.input)?;
    let mut roster = Roster::build(players)?;
    tracing::info!("loaded roster of {} players, pairing for {}", roster.len(), config.day);

    if cli.roster {
        print!("{}", render_roster(&roster, config.day));
    }

    let report = engine::run(&mut roster, &config);

    if cli.json {
        println!("{}", report.to_json()?);
    } else {
        print!("{}", report.render_text());
    }

    write_roster(&cli.output, &roster)?;

    Ok(())
}
