#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that loads a level and lets a strategy play it.

mod config;
mod runner;

use anyhow::{Context, Result};
use clap::Parser;
use snake_pilot_world::{query, World};
use tracing::{info, Level};

use crate::config::{Cli, RunConfig};

/// Entry point for the snake-pilot command-line interface.
fn main() -> Result<()> {
    let cli = Cli::parse();
    let max_level = match cli.verbosity() {
        0 => Level::INFO,
        1 => Level::DEBUG,
        _ => Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(max_level)
        .with_writer(std::io::stderr)
        .init();

    let config = RunConfig::load(&cli)?;
    let level = runner::load_level(config.level())?;
    let mut world = World::from_level(level, config.seed()).context("level is not playable")?;
    let mut strategy = config.strategy();
    info!(
        strategy = strategy.name(),
        ticks = config.ticks(),
        seed = config.seed(),
        "starting run"
    );

    let render = config.render();
    if render {
        println!("{}", query::level(&world));
    }
    let summary = runner::run(&mut world, &mut strategy, config.ticks(), |world| {
        if render {
            println!("tick {}\n{}", query::tick_index(world), query::level(world));
        }
    });

    info!(
        ticks = summary.ticks(),
        score = summary.score(),
        outcome = ?summary.outcome(),
        "run finished"
    );
    println!("{summary}");
    Ok(())
}
