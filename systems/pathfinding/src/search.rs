//! Best-first search over whole-body states.

use std::{
    cmp::Reverse,
    collections::BinaryHeap,
    time::{Duration, Instant},
};

use serde::{Deserialize, Serialize};
use snake_pilot_core::{Body, Cell, Direction, GridView, Segment};
use tracing::{debug, trace, warn};

use crate::connectivity::{self, BlockedGrid, Verdict};

/// Switches that shape which successors the search considers.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Run the connectivity analyzer on every candidate move.
    pub avoid_separating_spaces: bool,
    /// Among equally ranked successors, expand the roomier one first.
    pub prefer_more_paths: bool,
}

impl SearchConfig {
    /// Creates a configuration from its two switches.
    #[must_use]
    pub const fn new(avoid_separating_spaces: bool, prefer_more_paths: bool) -> Self {
        Self {
            avoid_separating_spaces,
            prefer_more_paths,
        }
    }
}

/// Successful search result.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SearchReport {
    plan: Vec<Segment>,
    expanded: usize,
    elapsed: Duration,
}

impl SearchReport {
    /// Planned steps: each segment is a head position and the move made from it.
    #[must_use]
    pub fn plan(&self) -> &[Segment] {
        &self.plan
    }

    /// Consumes the report, yielding the plan.
    #[must_use]
    pub fn into_plan(self) -> Vec<Segment> {
        self.plan
    }

    /// Number of states expanded before the target was reached.
    #[must_use]
    pub const fn expanded(&self) -> usize {
        self.expanded
    }

    /// Wall-clock time spent searching.
    #[must_use]
    pub const fn elapsed(&self) -> Duration {
        self.elapsed
    }
}

#[derive(Debug)]
struct SearchState {
    body: Body,
    plan: Vec<Segment>,
}

#[derive(Debug)]
struct Successor {
    direction: Direction,
    body: Body,
    room: usize,
}

impl Successor {
    fn new(direction: Direction, body: Body, layout: &BlockedGrid) -> Self {
        let room = layout
            .free_neighbours(body.head().position, direction)
            .len();
        Self {
            direction,
            body,
            room,
        }
    }

    fn from_state(state: &Body, direction: Direction, obstacles: &BlockedGrid) -> Self {
        let body = state.clone_and_advance(direction);
        let layout = obstacles.with_body(&body);
        Self::new(direction, body, &layout)
    }
}

/// Searches for a plan that brings the head of `body` onto `target`.
///
/// States are expanded in ascending `plan length + Manhattan distance` order,
/// oldest first among equals. Each head cell is expanded at most once, so the
/// search touches at most one state per grid cell. Returns `None` when the
/// frontier drains without reaching the target.
pub fn find_path(
    body: &Body,
    grid: &GridView<'_>,
    target: Cell,
    config: SearchConfig,
) -> Option<SearchReport> {
    let started = Instant::now();
    if grid.is_wall(target) {
        warn!(target = %target, "target is not enterable");
        return None;
    }

    let bounds = grid.bounds();
    let obstacles = BlockedGrid::from_view(grid, body);
    let mut visited = vec![false; bounds.area()];
    let mut states: Vec<Option<SearchState>> = Vec::new();
    let mut frontier = BinaryHeap::new();
    let mut expanded = 0;

    enqueue(
        &mut states,
        &mut frontier,
        SearchState {
            body: body.clone(),
            plan: Vec::new(),
        },
        target,
    );

    while let Some((_, Reverse(slot))) = frontier.pop() {
        let Some(state) = states.get_mut(slot).and_then(Option::take) else {
            continue;
        };
        let head = state.body.head().position;

        if head == target {
            let report = SearchReport {
                plan: state.plan,
                expanded,
                elapsed: started.elapsed(),
            };
            debug!(
                target = %target,
                steps = report.plan.len(),
                expanded,
                elapsed = ?report.elapsed,
                "path found"
            );
            return Some(report);
        }

        let Some(seen) = bounds.index(head).and_then(|index| visited.get_mut(index)) else {
            continue;
        };
        if *seen {
            continue;
        }
        *seen = true;
        expanded += 1;

        let is_visited = |cell: Cell| {
            bounds
                .index(cell)
                .and_then(|index| visited.get(index).copied())
                .unwrap_or(false)
        };
        let next_states = successors(&state.body, &obstacles, grid, config, is_visited);

        for successor in next_states {
            let mut plan = Vec::with_capacity(state.plan.len() + 1);
            plan.extend_from_slice(&state.plan);
            plan.push(Segment::new(head, successor.direction));
            enqueue(
                &mut states,
                &mut frontier,
                SearchState {
                    body: successor.body,
                    plan,
                },
                target,
            );
        }
    }

    warn!(
        target = %target,
        expanded,
        elapsed = ?started.elapsed(),
        "no path to target"
    );
    None
}

fn enqueue(
    states: &mut Vec<Option<SearchState>>,
    frontier: &mut BinaryHeap<(Reverse<usize>, Reverse<usize>)>,
    state: SearchState,
    target: Cell,
) {
    let distance = usize::try_from(state.body.head().position.manhattan_distance(target))
        .unwrap_or(usize::MAX);
    let priority = state.plan.len().saturating_add(distance);
    let slot = states.len();
    states.push(Some(state));
    frontier.push((Reverse(priority), Reverse(slot)));
}

/// Moves that neither reverse the head nor enter a blocked cell or the body.
fn legal_directions(body: &Body, obstacles: &BlockedGrid) -> Vec<Direction> {
    let head = body.head();
    Direction::ALL
        .into_iter()
        .filter(|direction| *direction != head.facing.opposite())
        .filter(|direction| {
            let next = head.position.step(*direction);
            !obstacles.is_blocked(next) && !body.contains(next)
        })
        .collect()
}

fn successors(
    state: &Body,
    obstacles: &BlockedGrid,
    grid: &GridView<'_>,
    config: SearchConfig,
    is_visited: impl Fn(Cell) -> bool,
) -> Vec<Successor> {
    let legal = legal_directions(state, obstacles);
    let mut chosen: Vec<Successor> = Vec::with_capacity(legal.len());

    for &direction in &legal {
        let body = state.clone_and_advance(direction);
        let head = body.head().position;
        let layout = obstacles.with_body(&body);

        if !config.avoid_separating_spaces {
            if !is_visited(head) {
                chosen.push(Successor::new(direction, body, &layout));
            }
            continue;
        }

        match connectivity::assess(&layout, grid, head, direction, is_visited(head)) {
            Verdict::Accept => chosen.push(Successor::new(direction, body, &layout)),
            Verdict::Visited | Verdict::Corridor => {}
            Verdict::Force(forced) => {
                let forced: Vec<Direction> = forced
                    .into_iter()
                    .filter(|candidate| legal.contains(candidate))
                    .filter(|candidate| holds_on_its_own(state, *candidate, obstacles, grid))
                    .collect();
                if forced.is_empty() {
                    trace!(?direction, "no forced move holds up from here, rejecting");
                    continue;
                }

                chosen.clear();
                chosen.extend(
                    forced
                        .into_iter()
                        .map(|forced| Successor::from_state(state, forced, obstacles)),
                );
                break;
            }
        }
    }

    if config.prefer_more_paths {
        chosen.sort_by(|a, b| b.room.cmp(&a.room));
    }
    chosen
}

/// Assesses a forced move as a candidate of its own from the state head.
///
/// Side directions are worked out around the hypothetical head but applied
/// from the current one, so they only survive if the analyzer accepts them
/// there or forces them itself.
fn holds_on_its_own(
    state: &Body,
    direction: Direction,
    obstacles: &BlockedGrid,
    grid: &GridView<'_>,
) -> bool {
    let body = state.clone_and_advance(direction);
    let layout = obstacles.with_body(&body);
    match connectivity::assess(&layout, grid, body.head().position, direction, false) {
        Verdict::Accept => true,
        Verdict::Force(forced) => forced.contains(&direction),
        Verdict::Visited | Verdict::Corridor => false,
    }
}
