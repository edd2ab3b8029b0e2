//! Steppable reachability probes.

use std::{cmp::Reverse, collections::BinaryHeap};

use snake_pilot_core::{Cell, Direction};

use crate::connectivity::BlockedGrid;

/// Best-first cursor looking for `goal` on a blocked grid, one expansion at a
/// time.
///
/// Cells are marked as discovered when pushed, so each free cell is expanded
/// at most once and the frontier drains after exactly as many steps as the
/// start's component has cells.
#[derive(Clone, Debug)]
pub struct ReachabilityProbe<'a> {
    layout: &'a BlockedGrid,
    goal: Cell,
    frontier: BinaryHeap<(Reverse<u32>, Reverse<u64>, Cell, u32)>,
    discovered: Vec<bool>,
    sequence: u64,
    found: bool,
}

impl<'a> ReachabilityProbe<'a> {
    /// Starts a probe at `start`. A blocked start yields an exhausted probe.
    #[must_use]
    pub fn new(layout: &'a BlockedGrid, start: Cell, goal: Cell) -> Self {
        let mut probe = Self {
            layout,
            goal,
            frontier: BinaryHeap::new(),
            discovered: vec![false; layout.bounds().area()],
            sequence: 0,
            found: false,
        };
        probe.discover(start, 0);
        probe
    }

    /// Expands the most promising frontier cell.
    pub fn step(&mut self) {
        let Some((_, _, cell, cost)) = self.frontier.pop() else {
            return;
        };
        for direction in Direction::ALL {
            self.discover(cell.step(direction), cost + 1);
        }
    }

    fn discover(&mut self, cell: Cell, cost: u32) {
        if self.layout.is_blocked(cell) {
            return;
        }
        let Some(slot) = self
            .layout
            .bounds()
            .index(cell)
            .and_then(|index| self.discovered.get_mut(index))
        else {
            return;
        };
        if *slot {
            return;
        }
        *slot = true;

        if cell == self.goal {
            self.found = true;
        }
        let priority = cost.saturating_add(cell.manhattan_distance(self.goal));
        self.frontier
            .push((Reverse(priority), Reverse(self.sequence), cell, cost));
        self.sequence += 1;
    }

    /// Reports whether the goal has been discovered.
    #[must_use]
    pub const fn found(&self) -> bool {
        self.found
    }

    /// Reports whether the frontier is empty.
    #[must_use]
    pub fn is_exhausted(&self) -> bool {
        self.frontier.is_empty()
    }
}

/// Result of running two probes against each other.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PairVerdict {
    connected: bool,
    first_exhausted: bool,
    second_exhausted: bool,
}

impl PairVerdict {
    /// Reports whether either probe reached the other's start.
    #[must_use]
    pub const fn connected(&self) -> bool {
        self.connected
    }

    /// Reports whether the probe started at the first cell ran dry.
    #[must_use]
    pub const fn first_exhausted(&self) -> bool {
        self.first_exhausted
    }

    /// Reports whether the probe started at the second cell ran dry.
    #[must_use]
    pub const fn second_exhausted(&self) -> bool {
        self.second_exhausted
    }
}

/// Steps a probe from `first` toward `second` and one the other way in
/// lockstep until either finds its goal or either runs out of frontier.
///
/// The probe that runs dry first is sealed into the smaller component.
#[must_use]
pub fn probe_pair(layout: &BlockedGrid, first: Cell, second: Cell) -> PairVerdict {
    let mut forward = ReachabilityProbe::new(layout, first, second);
    let mut backward = ReachabilityProbe::new(layout, second, first);

    loop {
        forward.step();
        backward.step();

        if forward.found() || backward.found() {
            return PairVerdict {
                connected: true,
                first_exhausted: false,
                second_exhausted: false,
            };
        }
        if forward.is_exhausted() || backward.is_exhausted() {
            return PairVerdict {
                connected: false,
                first_exhausted: forward.is_exhausted(),
                second_exhausted: backward.is_exhausted(),
            };
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use snake_pilot_core::{Body, GridBounds, GridView, MapQuery, Occupancy};

    /// Open field split by a vertical wall at `x == wall`, optionally with a gap.
    struct Divided {
        wall: i32,
        gap: Option<i32>,
    }

    impl MapQuery for Divided {
        fn classify(&self, cell: Cell) -> Occupancy {
            if cell.x() == self.wall && Some(cell.y()) != self.gap {
                Occupancy::Wall
            } else {
                Occupancy::Empty
            }
        }

        fn in_bounds(&self, _cell: Cell) -> bool {
            true
        }

        fn segment_facing(&self, _cell: Cell) -> Option<Direction> {
            None
        }
    }

    fn layout(map: &Divided) -> BlockedGrid {
        let view = GridView::new(GridBounds::from_size(6, 4), map);
        let body = Body::straight(Cell::new(5, 3), Direction::North, 1).expect("valid body");
        BlockedGrid::from_view(&view, &body)
    }

    #[test]
    fn probe_finds_a_reachable_goal() {
        let map = Divided {
            wall: 2,
            gap: Some(3),
        };
        let grid = layout(&map);
        let mut probe = ReachabilityProbe::new(&grid, Cell::new(0, 0), Cell::new(5, 0));
        while !probe.found() && !probe.is_exhausted() {
            probe.step();
        }
        assert!(probe.found());
    }

    #[test]
    fn probe_exhausts_inside_a_sealed_region() {
        let map = Divided { wall: 2, gap: None };
        let grid = layout(&map);
        let mut probe = ReachabilityProbe::new(&grid, Cell::new(0, 0), Cell::new(5, 0));
        let mut steps = 0;
        while !probe.is_exhausted() {
            probe.step();
            steps += 1;
        }
        assert!(!probe.found());
        assert_eq!(steps, 8);
    }

    #[test]
    fn smaller_side_runs_dry_first() {
        let map = Divided { wall: 2, gap: None };
        let grid = layout(&map);
        let verdict = probe_pair(&grid, Cell::new(0, 0), Cell::new(5, 0));
        assert!(!verdict.connected());
        assert!(verdict.first_exhausted());
        assert!(!verdict.second_exhausted());
    }

    #[test]
    fn connected_cells_are_reported() {
        let map = Divided {
            wall: 2,
            gap: Some(1),
        };
        let grid = layout(&map);
        let verdict = probe_pair(&grid, Cell::new(0, 0), Cell::new(5, 0));
        assert!(verdict.connected());
    }
}
