//! Local connectivity analysis around a hypothetical head.
//!
//! A move can be perfectly legal and still cut the free space in two, leaving
//! the snake sealed into the smaller half. The analyzer inspects the cells
//! around the head the move would produce and either accepts the move,
//! rejects it, or overrides the whole candidate list with the move(s) that
//! keep the snake on the surviving side.

use snake_pilot_core::{Body, Cell, Direction, GridBounds, GridView, Occupancy};
use tracing::trace;

use crate::probe::probe_pair;

/// Dense blocked/free map over the grid bounds.
///
/// Cells outside the bounds are always blocked.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BlockedGrid {
    bounds: GridBounds,
    blocked: Vec<bool>,
}

impl BlockedGrid {
    /// Captures the static obstacles visible through the view.
    ///
    /// Walls are blocked. `Collide` cells are blocked unless `initial` covers
    /// them, since the live body moves away and is tracked per search state.
    #[must_use]
    pub fn from_view(grid: &GridView<'_>, initial: &Body) -> Self {
        let bounds = grid.bounds();
        let blocked = bounds
            .cells()
            .map(|cell| match grid.classify(cell) {
                Occupancy::Wall => true,
                Occupancy::Collide => !initial.contains(cell),
                Occupancy::Empty | Occupancy::Grow => false,
            })
            .collect();
        Self { bounds, blocked }
    }

    /// Copy of the grid with every cell of `body` marked as blocked.
    #[must_use]
    pub fn with_body(&self, body: &Body) -> Self {
        let mut layout = self.clone();
        for cell in body.cells() {
            if let Some(slot) = self
                .bounds
                .index(cell)
                .and_then(|index| layout.blocked.get_mut(index))
            {
                *slot = true;
            }
        }
        layout
    }

    /// Bounds covered by the grid.
    #[must_use]
    pub const fn bounds(&self) -> GridBounds {
        self.bounds
    }

    /// Reports whether the cell cannot be entered.
    #[must_use]
    pub fn is_blocked(&self, cell: Cell) -> bool {
        self.bounds
            .index(cell)
            .and_then(|index| self.blocked.get(index).copied())
            .unwrap_or(true)
    }

    /// Free orthogonal neighbours of `cell`, skipping the cell it was entered
    /// from. Neighbours are listed North, East, South, West.
    #[must_use]
    pub fn free_neighbours(&self, cell: Cell, arrived: Direction) -> FreeNeighbours {
        let mut neighbours = FreeNeighbours::default();
        for direction in Direction::ALL {
            if direction == arrived.opposite() {
                continue;
            }
            if !self.is_blocked(cell.step(direction)) {
                neighbours.push(direction);
            }
        }
        neighbours
    }
}

/// Directions toward the free neighbours of a cell, in compass order.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FreeNeighbours {
    buffer: [Option<Direction>; 4],
    len: usize,
}

impl FreeNeighbours {
    fn push(&mut self, direction: Direction) {
        if self.len < self.buffer.len() {
            self.buffer[self.len] = Some(direction);
            self.len += 1;
        }
    }

    /// Number of free neighbours.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.len
    }

    /// Reports whether no neighbour is free.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Iterates the directions toward the free neighbours.
    pub fn directions(&self) -> impl Iterator<Item = Direction> + '_ {
        self.buffer[..self.len].iter().flatten().copied()
    }
}

/// Cell completing the 2×2 square spanned by `h` and its neighbours `p`, `q`.
#[must_use]
pub const fn fourth_corner(h: Cell, p: Cell, q: Cell) -> Cell {
    Cell::new(p.x() + q.x() - h.x(), p.y() + q.y() - h.y())
}

/// Outcome of assessing one candidate move.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Verdict {
    /// Keep the candidate.
    Accept,
    /// The resulting head was already expanded during this search.
    Visited,
    /// The move squeezes into a corridor whose far end is open.
    Corridor,
    /// Replace every candidate of the state with these directions and stop
    /// examining the rest.
    Force(Vec<Direction>),
}

/// Assesses the move `direction` that lands the head on `head`.
///
/// `layout` must already contain the body as it would be after the move.
/// `visited` reports whether `head` was expanded earlier in the search; it
/// only matters once the dead-end rule has been ruled out.
#[must_use]
pub fn assess(
    layout: &BlockedGrid,
    grid: &GridView<'_>,
    head: Cell,
    direction: Direction,
    visited: bool,
) -> Verdict {
    let free = layout.free_neighbours(head, direction);
    if free.len() <= 1 {
        trace!(cell = %head, ?direction, free = free.len(), "dead end must be taken now");
        return Verdict::Force(vec![direction]);
    }

    if visited {
        return Verdict::Visited;
    }

    let directions: Vec<Direction> = free.directions().collect();
    match directions.as_slice() {
        &[first, second] if first == second.opposite() => {
            assess_corridor(layout, grid, head, direction, first, second)
        }
        &[first, second] => {
            let side = if first == direction { second } else { first };
            let corner = fourth_corner(head, head.step(first), head.step(second));
            if layout.is_blocked(corner) {
                trace!(cell = %head, ?direction, corner = %corner, ?side, "closed pocket, forcing side");
                Verdict::Force(vec![side])
            } else {
                Verdict::Accept
            }
        }
        &[_, _, _] => {
            let ahead = head.step(direction);
            for side in directions.iter().copied().filter(|side| *side != direction) {
                let corner = fourth_corner(head, ahead, head.step(side));
                if layout.is_blocked(corner) {
                    trace!(cell = %head, ?direction, corner = %corner, ?side, "closed pocket, forcing side");
                    return Verdict::Force(vec![side]);
                }
            }
            Verdict::Accept
        }
        _ => Verdict::Accept,
    }
}

fn assess_corridor(
    layout: &BlockedGrid,
    grid: &GridView<'_>,
    head: Cell,
    direction: Direction,
    first: Direction,
    second: Direction,
) -> Verdict {
    if !grid.is_wall(head.step(direction)) {
        return Verdict::Corridor;
    }

    let verdict = probe_pair(layout, head.step(first), head.step(second));
    if verdict.connected() {
        return Verdict::Accept;
    }

    let mut forced = Vec::with_capacity(2);
    if verdict.first_exhausted() {
        forced.push(second);
    }
    if verdict.second_exhausted() {
        forced.push(first);
    }
    trace!(cell = %head, ?direction, ?forced, "move would split the free space");
    Verdict::Force(forced)
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;
    use snake_pilot_core::{MapQuery, Segment};

    struct Open;

    impl MapQuery for Open {
        fn classify(&self, _cell: Cell) -> Occupancy {
            Occupancy::Empty
        }

        fn in_bounds(&self, _cell: Cell) -> bool {
            true
        }

        fn segment_facing(&self, _cell: Cell) -> Option<Direction> {
            None
        }
    }

    struct Walls(HashSet<Cell>);

    impl Walls {
        fn new(cells: &[(i32, i32)]) -> Self {
            Self(cells.iter().map(|&(x, y)| Cell::new(x, y)).collect())
        }
    }

    impl MapQuery for Walls {
        fn classify(&self, cell: Cell) -> Occupancy {
            if self.0.contains(&cell) {
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

    /// Assesses the eastward move that put the head of a straight body on (3,3).
    fn assess_east_into(map: &dyn MapQuery) -> Verdict {
        let view = GridView::new(GridBounds::from_size(7, 7), map);
        let moved = Body::straight(Cell::new(3, 3), Direction::East, 3).expect("valid body");
        let layout = BlockedGrid::from_view(&view, &moved).with_body(&moved);
        assess(&layout, &view, Cell::new(3, 3), Direction::East, false)
    }

    #[test]
    fn fourth_corner_completes_the_square() {
        let h = Cell::new(2, 2);
        assert_eq!(
            fourth_corner(h, Cell::new(2, 3), Cell::new(3, 2)),
            Cell::new(3, 3)
        );
        assert_eq!(
            fourth_corner(h, Cell::new(1, 2), Cell::new(2, 1)),
            Cell::new(1, 1)
        );
    }

    #[test]
    fn outside_cells_are_blocked() {
        let map = Open;
        let view = GridView::new(GridBounds::from_size(3, 3), &map);
        let body = Body::straight(Cell::new(1, 1), Direction::East, 2).expect("valid body");
        let grid = BlockedGrid::from_view(&view, &body);

        assert!(!grid.is_blocked(Cell::new(1, 1)));
        assert!(grid.is_blocked(Cell::new(3, 1)));
        assert!(grid.with_body(&body).is_blocked(Cell::new(1, 1)));
    }

    #[test]
    fn free_neighbours_skip_the_cell_behind() {
        let map = Open;
        let view = GridView::new(GridBounds::from_size(3, 3), &map);
        let body = Body::straight(Cell::new(0, 1), Direction::East, 1).expect("valid body");
        let grid = BlockedGrid::from_view(&view, &body);

        let free: Vec<_> = grid
            .free_neighbours(Cell::new(1, 1), Direction::East)
            .directions()
            .collect();
        assert_eq!(free, [Direction::North, Direction::East, Direction::South]);

        let corner: Vec<_> = grid
            .free_neighbours(Cell::new(0, 0), Direction::South)
            .directions()
            .collect();
        assert_eq!(corner, [Direction::East]);
    }

    #[test]
    fn open_space_is_accepted() {
        let map = Open;
        let view = GridView::new(GridBounds::from_size(7, 7), &map);
        let body = Body::straight(Cell::new(2, 3), Direction::East, 3).expect("valid body");
        let moved = body.clone_and_advance(Direction::East);
        let layout = BlockedGrid::from_view(&view, &body).with_body(&moved);

        assert_eq!(
            assess(&layout, &view, Cell::new(3, 3), Direction::East, false),
            Verdict::Accept
        );
        assert_eq!(
            assess(&layout, &view, Cell::new(3, 3), Direction::East, true),
            Verdict::Visited
        );
    }

    #[test]
    fn dead_ends_are_forced_even_when_visited() {
        let map = Open;
        let view = GridView::new(GridBounds::from_size(3, 1), &map);
        let body = Body::straight(Cell::new(1, 0), Direction::East, 2).expect("valid body");
        let moved = body.clone_and_advance(Direction::East);
        let layout = BlockedGrid::from_view(&view, &body).with_body(&moved);

        assert_eq!(
            assess(&layout, &view, Cell::new(2, 0), Direction::East, true),
            Verdict::Force(vec![Direction::East])
        );
    }

    #[test]
    fn corridor_with_an_open_far_end_is_rejected() {
        // The body curls round so that it blocks the cell ahead of the head.
        let map = Open;
        let view = GridView::new(GridBounds::from_size(7, 7), &map);
        let moved = Body::new(vec![
            Segment::new(Cell::new(4, 3), Direction::South),
            Segment::new(Cell::new(4, 2), Direction::South),
            Segment::new(Cell::new(4, 1), Direction::West),
            Segment::new(Cell::new(3, 1), Direction::West),
            Segment::new(Cell::new(2, 1), Direction::North),
            Segment::new(Cell::new(2, 2), Direction::North),
            Segment::new(Cell::new(2, 3), Direction::East),
            Segment::new(Cell::new(3, 3), Direction::East),
        ])
        .expect("valid body");
        let layout = BlockedGrid::from_view(&view, &moved).with_body(&moved);

        assert_eq!(
            assess(&layout, &view, Cell::new(3, 3), Direction::East, false),
            Verdict::Corridor
        );
    }

    #[test]
    fn bend_with_a_blocked_corner_forces_the_side() {
        assert_eq!(
            assess_east_into(&Walls::new(&[(3, 2), (4, 4)])),
            Verdict::Force(vec![Direction::North])
        );
        assert_eq!(assess_east_into(&Walls::new(&[(3, 2)])), Verdict::Accept);
    }

    #[test]
    fn three_way_junction_forces_the_side_with_a_blocked_corner() {
        assert_eq!(
            assess_east_into(&Walls::new(&[(4, 2)])),
            Verdict::Force(vec![Direction::South])
        );
        assert_eq!(
            assess_east_into(&Walls::new(&[(4, 4)])),
            Verdict::Force(vec![Direction::North])
        );
        // North is checked first when both corners are blocked.
        assert_eq!(
            assess_east_into(&Walls::new(&[(4, 2), (4, 4)])),
            Verdict::Force(vec![Direction::North])
        );
        assert_eq!(assess_east_into(&Open), Verdict::Accept);
    }
}
