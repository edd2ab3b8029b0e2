#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Decision strategies that pick the snake's next move.
//!
//! A strategy is consulted once per tick with the live body, a read-only
//! view of the grid and the current target. It answers with a direction, or
//! `None` when it has no move to offer.

use std::collections::VecDeque;

use snake_pilot_core::{Body, Cell, Direction, GridView, Segment};
use tracing::{debug, trace};

pub use snake_pilot_system_pathfinding::SearchConfig;
use snake_pilot_system_pathfinding::find_path;

/// Closed set of available strategies.
#[derive(Clone, Debug)]
pub enum Strategy {
    /// Distance-minimising single step.
    Greedy(Greedy),
    /// Whole-body search with a cached plan.
    SearchBased(SearchBased),
}

impl Strategy {
    /// Creates the greedy baseline.
    #[must_use]
    pub const fn greedy() -> Self {
        Self::Greedy(Greedy)
    }

    /// Creates a search-based strategy with the provided configuration.
    #[must_use]
    pub fn search_based(config: SearchConfig) -> Self {
        Self::SearchBased(SearchBased::new(config))
    }

    /// Short human-readable name.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Greedy(_) => "greedy",
            Self::SearchBased(_) => "search",
        }
    }

    /// Picks the next move for `body` toward `target`.
    pub fn get_direction(
        &mut self,
        body: &Body,
        grid: &GridView<'_>,
        target: Cell,
    ) -> Option<Direction> {
        match self {
            Self::Greedy(greedy) => greedy.get_direction(body, target),
            Self::SearchBased(search) => search.get_direction(body, grid, target),
        }
    }
}

/// Stateless baseline that steps toward the target without look-ahead.
///
/// It never reverses, but it will happily walk into walls or its own body.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Greedy;

impl Greedy {
    /// Preference among equally close moves.
    pub const TIE_ORDER: [Direction; 4] = [
        Direction::East,
        Direction::West,
        Direction::North,
        Direction::South,
    ];

    /// Picks the non-reversing move whose head lands closest to `target`.
    #[must_use]
    pub fn get_direction(&self, body: &Body, target: Cell) -> Option<Direction> {
        let head = body.head();
        let mut best: Option<(u32, Direction)> = None;
        for direction in Self::TIE_ORDER {
            if direction == head.facing.opposite() {
                continue;
            }
            let distance = head.position.step(direction).manhattan_distance(target);
            if best.map_or(true, |(closest, _)| distance < closest) {
                best = Some((distance, direction));
            }
        }
        best.map(|(_, direction)| direction)
    }
}

/// Search-based strategy that plans a full path and replays it tick by tick.
#[derive(Clone, Debug)]
pub struct SearchBased {
    config: SearchConfig,
    cached: VecDeque<Segment>,
    planned_for: Option<Cell>,
}

impl SearchBased {
    /// Creates the strategy with an empty plan cache.
    #[must_use]
    pub fn new(config: SearchConfig) -> Self {
        Self {
            config,
            cached: VecDeque::new(),
            planned_for: None,
        }
    }

    /// Configuration fixed at construction.
    #[must_use]
    pub const fn config(&self) -> SearchConfig {
        self.config
    }

    /// Number of planned steps still waiting in the cache.
    #[must_use]
    pub fn cached_steps(&self) -> usize {
        self.cached.len()
    }

    /// Replays the cached plan, searching anew when the cache is empty or
    /// no longer matches the body and target.
    pub fn get_direction(
        &mut self,
        body: &Body,
        grid: &GridView<'_>,
        target: Cell,
    ) -> Option<Direction> {
        self.drop_stale_plan(body, target);
        if let Some(step) = self.cached.pop_front() {
            return Some(step.facing);
        }

        let Some(report) = find_path(body, grid, target, self.config) else {
            self.planned_for = None;
            return None;
        };
        debug!(
            target = %target,
            steps = report.plan().len(),
            expanded = report.expanded(),
            elapsed = ?report.elapsed(),
            "planned new path"
        );

        self.cached = report.into_plan().into();
        self.planned_for = Some(target);
        self.cached.pop_front().map(|step| step.facing)
    }

    fn drop_stale_plan(&mut self, body: &Body, target: Cell) {
        if self.cached.is_empty() {
            return;
        }
        if self.planned_for != Some(target) {
            trace!(target = %target, "target moved, dropping plan");
        } else if self
            .cached
            .front()
            .is_some_and(|step| step.position != body.head().position)
        {
            trace!(head = %body.head().position, "body left the plan, dropping it");
        } else {
            return;
        }
        self.cached.clear();
        self.planned_for = None;
    }
}
