//! Headless tick loop.

use std::{
    fmt, fs,
    path::Path,
    time::{Duration, Instant},
};

use anyhow::{Context, Result};
use snake_pilot_core::Direction;
use snake_pilot_system_strategy::Strategy;
use snake_pilot_world::{query, Level, StepOutcome, World};
use tracing::{debug, info};

/// Level used when no file is given.
pub(crate) const ARENA: &str = "
####################
#..................#
#..................#
#....#######.......#
#..........#.......#
#..........#.......#
#..>>>.....#...*...#
#..........#.......#
#..................#
#......#######.....#
#..................#
#..................#
####################
";

/// Reads a level file, or parses the built-in arena when `path` is `None`.
pub(crate) fn load_level(path: Option<&Path>) -> Result<Level> {
    let Some(path) = path else {
        return Level::parse(ARENA).context("built-in arena is malformed");
    };
    let contents = fs::read_to_string(path)
        .with_context(|| format!("failed to read level {}", path.display()))?;
    Level::parse(&contents).with_context(|| format!("invalid level {}", path.display()))
}

/// What happened over a whole run.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct RunSummary {
    ticks: u64,
    score: u32,
    outcome: Option<StepOutcome>,
    slowest_decision: Duration,
    total_decision: Duration,
}

impl RunSummary {
    pub(crate) const fn ticks(&self) -> u64 {
        self.ticks
    }

    pub(crate) const fn score(&self) -> u32 {
        self.score
    }

    /// Terminal outcome, or `None` when the tick budget ran out first.
    pub(crate) const fn outcome(&self) -> Option<StepOutcome> {
        self.outcome
    }
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let ending = match self.outcome {
            Some(StepOutcome::Crashed) => "crashed",
            Some(StepOutcome::Stalled) => "no move available",
            Some(StepOutcome::Moved | StepOutcome::Grew) | None => "tick budget spent",
        };
        let mean = self
            .total_decision
            .checked_div(u32::try_from(self.ticks).unwrap_or(u32::MAX))
            .unwrap_or_default();
        write!(
            f,
            "ticks: {}, score: {}, ending: {ending}, mean decision: {mean:?}, slowest decision: {:?}",
            self.ticks, self.score, self.slowest_decision
        )
    }
}

/// Runs up to `ticks` ticks, calling `on_tick` after each applied step.
///
/// The loop stops early when the run ends or when the board has no room left
/// for an apple.
pub(crate) fn run(
    world: &mut World,
    strategy: &mut Strategy,
    ticks: u64,
    mut on_tick: impl FnMut(&World),
) -> RunSummary {
    let mut summary = RunSummary {
        ticks: 0,
        score: 0,
        outcome: None,
        slowest_decision: Duration::ZERO,
        total_decision: Duration::ZERO,
    };

    for _ in 0..ticks {
        let Some(target) = query::target(world) else {
            info!("board is full");
            break;
        };

        let started = Instant::now();
        let direction: Option<Direction> = {
            let view = query::grid_view(world);
            strategy.get_direction(query::body(world), &view, target)
        };
        let latency = started.elapsed();
        summary.total_decision += latency;
        summary.slowest_decision = summary.slowest_decision.max(latency);
        debug!(
            tick = query::tick_index(world) + 1,
            ?direction,
            ?latency,
            "decision taken"
        );

        let outcome = world.step(direction);
        summary.ticks += 1;
        on_tick(world);
        if outcome.is_terminal() {
            summary.outcome = Some(outcome);
            break;
        }
    }

    summary.score = query::score(world);
    summary
}
