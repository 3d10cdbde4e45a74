#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that plays a wave survival run headlessly and prints
//! the final run snapshot as JSON.

mod autopilot;
mod settings;

use std::{path::PathBuf, time::Duration};

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;
use wave_survival_core::{Command, Event, Tuning};
use wave_survival_world::{apply, query, World};

use crate::autopilot::Autopilot;

/// Command-line arguments accepted by the wave survival binary.
#[derive(Debug, Parser)]
#[command(name = "wave-survival", about = "Plays a headless wave survival run")]
struct CliArgs {
    /// TOML file overriding any subset of the default tuning.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Seed for every random stream, overriding the tuning file.
    #[arg(long)]
    seed: Option<u64>,
    /// Maximum number of simulation ticks to run.
    #[arg(long, default_value_t = 36_000)]
    ticks: u32,
    /// Simulated milliseconds per tick.
    #[arg(long, default_value_t = 16)]
    tick_ms: u64,
    /// Pretty-print the final snapshot.
    #[arg(long)]
    pretty: bool,
}

/// Entry point for the wave survival command-line interface.
fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = CliArgs::parse();
    let mut tuning = match &args.config {
        Some(path) => settings::load(path)?,
        None => Tuning::default(),
    };
    if let Some(seed) = args.seed {
        tuning.seed = seed;
    }

    let mut world = World::new(tuning).context("invalid tuning")?;
    let ticks = run(&mut world, args.ticks, Duration::from_millis(args.tick_ms));

    let state = query::run_state(&world);
    info!(
        ticks,
        score = state.score,
        wave = state.highest_wave,
        kills = state.kills,
        "autopilot finished"
    );

    let snapshot = query::snapshot(&world);
    let json = if args.pretty {
        serde_json::to_string_pretty(&snapshot)
    } else {
        serde_json::to_string(&snapshot)
    }
    .context("failed to serialize run snapshot")?;
    println!("{json}");
    Ok(())
}

/// Plays until the run ends or the tick budget is spent and returns the
/// number of ticks simulated.
fn run(world: &mut World, max_ticks: u32, dt: Duration) -> u32 {
    let mut autopilot = Autopilot::default();
    let mut events = Vec::new();
    apply(world, Command::StartRun, &mut events);

    let mut ticks = 0;
    while ticks < max_ticks && !query::is_run_over(world) {
        for command in autopilot.intents(world) {
            apply(world, command, &mut events);
        }
        apply(world, Command::Tick { dt }, &mut events);
        ticks += 1;
        for command in autopilot.overlaps(world) {
            apply(world, command, &mut events);
        }
        if let Some(command) = autopilot.spend_points(world) {
            apply(world, command, &mut events);
        }
        report(&events);
        events.clear();
    }
    ticks
}

fn report(events: &[Event]) {
    for event in events {
        match event {
            Event::LevelUp { level, .. } => info!(level, "level up"),
            Event::AchievementUnlocked { category, tier, .. } => {
                info!(%category, tier, "achievement unlocked");
            }
            Event::ChallengeCompleted { challenge, .. } => {
                info!(%challenge, "challenge completed");
            }
            Event::SkillUpgraded { skill, level } => info!(%skill, level, "skill upgraded"),
            _ => {}
        }
    }
}
