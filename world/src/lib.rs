#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative world state for a single snake run.
//!
//! The world owns the tile map and the live body. Strategies never mutate it:
//! they read it through [`query`] and hand a direction back to [`World::step`].

mod level;

pub use level::{Level, LevelError, Tile};

use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use snake_pilot_core::{trace_body, Body, Cell, Direction, MapQuery, Occupancy, TraceError};
use thiserror::Error;
use tracing::{debug, info, warn};

/// Result of applying a single tick to the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum StepOutcome {
    /// The snake moved without growing.
    Moved,
    /// The snake ate the apple and grew by one segment.
    Grew,
    /// The snake ran into a wall or its own body; the run is over.
    Crashed,
    /// No direction was supplied; the run is over.
    Stalled,
}

impl StepOutcome {
    /// Reports whether the outcome ends the run.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Crashed | Self::Stalled)
    }
}

/// Errors raised while building a world from a level.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum WorldError {
    /// The level itself is malformed.
    #[error(transparent)]
    Level(#[from] LevelError),
    /// The snake could not be traced from its tail.
    #[error(transparent)]
    Trace(#[from] TraceError),
}

/// Represents the authoritative state of one run.
#[derive(Debug)]
pub struct World {
    level: Level,
    body: Body,
    apple: Option<Cell>,
    rng: ChaCha8Rng,
    score: u32,
    tick_index: u64,
    finished: Option<StepOutcome>,
}

impl World {
    /// Creates a world from a parsed level.
    ///
    /// The body is traced from the level's tail. The drawn apple becomes the
    /// target; when none is drawn one is spawned with the seeded generator.
    pub fn from_level(level: Level, seed: u64) -> Result<Self, WorldError> {
        let tail = level.find_tail()?;
        let body = trace_body(tail, &level)?;
        let apple = level.apple();

        let mut world = Self {
            level,
            body,
            apple,
            rng: ChaCha8Rng::seed_from_u64(seed),
            score: 0,
            tick_index: 0,
            finished: None,
        };
        if world.apple.is_none() {
            world.spawn_apple();
        }

        info!(
            length = world.body.len(),
            head = %world.body.head().position,
            apple = ?world.apple,
            "world created"
        );
        Ok(world)
    }

    /// Applies one tick.
    ///
    /// `None` means the caller had no move to offer, which ends the run.
    /// Once the run is over every further call returns the terminal outcome
    /// unchanged.
    pub fn step(&mut self, direction: Option<Direction>) -> StepOutcome {
        if let Some(outcome) = self.finished {
            return outcome;
        }
        self.tick_index += 1;

        let Some(direction) = direction else {
            warn!(tick = self.tick_index, "no direction supplied, stopping");
            return self.finish(StepOutcome::Stalled);
        };

        let next_head = self.body.head().position.step(direction);
        let outcome = match self.level.classify(next_head) {
            Occupancy::Wall | Occupancy::Collide => {
                info!(
                    tick = self.tick_index,
                    cell = %next_head,
                    score = self.score,
                    "snake crashed"
                );
                return self.finish(StepOutcome::Crashed);
            }
            Occupancy::Grow => {
                self.repaint(|body| body.grow(direction));
                self.score += 1;
                self.apple = None;
                self.spawn_apple();
                info!(
                    tick = self.tick_index,
                    score = self.score,
                    apple = ?self.apple,
                    "apple eaten"
                );
                StepOutcome::Grew
            }
            Occupancy::Empty => {
                self.repaint(|body| body.advance_in_place(direction));
                StepOutcome::Moved
            }
        };

        debug!(tick = self.tick_index, ?direction, ?outcome, "tick applied");
        outcome
    }

    fn finish(&mut self, outcome: StepOutcome) -> StepOutcome {
        self.finished = Some(outcome);
        outcome
    }

    fn repaint(&mut self, mutate: impl FnOnce(&mut Body)) {
        for cell in self.body.cells() {
            self.level.set_tile(cell, Tile::Empty);
        }
        mutate(&mut self.body);
        for segment in self.body.segments() {
            self.level
                .set_tile(segment.position, Tile::Snake(segment.facing));
        }
    }

    fn spawn_apple(&mut self) {
        let free: Vec<Cell> = self.level.empty_cells().collect();
        self.apple = free.choose(&mut self.rng).copied();
        match self.apple {
            Some(cell) => self.level.set_tile(cell, Tile::Apple),
            None => warn!("no free cell left for an apple"),
        }
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use snake_pilot_core::{Body, Cell, GridView};

    use super::{Level, StepOutcome, World};

    /// Live body of the snake.
    #[must_use]
    pub fn body(world: &World) -> &Body {
        &world.body
    }

    /// Tile map including the painted snake and apple.
    #[must_use]
    pub fn level(world: &World) -> &Level {
        &world.level
    }

    /// Current target cell, absent once the board is full.
    #[must_use]
    pub fn target(world: &World) -> Option<Cell> {
        world.apple
    }

    /// Number of segments grown since the run started.
    #[must_use]
    pub fn score(world: &World) -> u32 {
        world.score
    }

    /// Number of ticks applied so far.
    #[must_use]
    pub fn tick_index(world: &World) -> u64 {
        world.tick_index
    }

    /// Terminal outcome, once the run has ended.
    #[must_use]
    pub fn finished(world: &World) -> Option<StepOutcome> {
        world.finished
    }

    /// Read-only grid view over the whole level.
    #[must_use]
    pub fn grid_view(world: &World) -> GridView<'_> {
        GridView::new(world.level.bounds(), &world.level)
    }
}
