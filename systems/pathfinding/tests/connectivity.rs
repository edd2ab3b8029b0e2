use std::collections::{HashSet, VecDeque};

use snake_pilot_core::{trace_body, Body, Cell, Direction, GridView};
use snake_pilot_system_pathfinding::{
    connectivity::{assess, BlockedGrid, Verdict},
    find_path, SearchConfig,
};
use snake_pilot_world::{Level, Tile};

/// A wall segment on each side of row 2 leaves a three-cell gap that the
/// snake is lying in. Moving East would close the gap completely.
const GAP: &str = "
    .....
    .v...
    #>>.#
    .....
    .....
";

fn gap_level() -> Level {
    Level::parse(GAP).expect("valid level")
}

fn gap_body(level: &Level) -> Body {
    let tail = level.find_tail().expect("level has a tail");
    trace_body(tail, level).expect("traceable snake")
}

/// Counts the connected components of free cells once `body` is in place.
fn free_components(level: &Level, body: &Body) -> usize {
    let occupied: HashSet<Cell> = body.cells().collect();
    let free: HashSet<Cell> = level
        .bounds()
        .cells()
        .filter(|cell| level.tile(*cell) != Some(Tile::Wall) && !occupied.contains(cell))
        .collect();

    let mut seen = HashSet::new();
    let mut components = 0;
    for start in &free {
        if !seen.insert(*start) {
            continue;
        }
        components += 1;
        let mut queue = VecDeque::from([*start]);
        while let Some(cell) = queue.pop_front() {
            for direction in Direction::ALL {
                let next = cell.step(direction);
                if free.contains(&next) && seen.insert(next) {
                    queue.push_back(next);
                }
            }
        }
    }
    components
}

#[test]
fn closing_the_gap_forces_both_sides() {
    let level = gap_level();
    let view = GridView::new(level.bounds(), &level);
    let body = gap_body(&level);
    assert_eq!(body.head().position, Cell::new(2, 2));

    let obstacles = BlockedGrid::from_view(&view, &body);
    let moved = body.clone_and_advance(Direction::East);
    let layout = obstacles.with_body(&moved);

    assert_eq!(
        assess(&layout, &view, Cell::new(3, 2), Direction::East, false),
        Verdict::Force(vec![Direction::South, Direction::North])
    );
    assert_eq!(free_components(&level, &moved), 2);
}

#[test]
fn turning_out_of_the_gap_is_accepted() {
    let level = gap_level();
    let view = GridView::new(level.bounds(), &level);
    let body = gap_body(&level);

    let obstacles = BlockedGrid::from_view(&view, &body);
    let moved = body.clone_and_advance(Direction::North);
    let layout = obstacles.with_body(&moved);

    assert_eq!(
        assess(&layout, &view, Cell::new(2, 3), Direction::North, false),
        Verdict::Accept
    );
    assert_eq!(free_components(&level, &moved), 1);
}

#[test]
fn shortest_route_splits_the_board_without_avoidance() {
    let level = gap_level();
    let view = GridView::new(level.bounds(), &level);
    let body = gap_body(&level);
    let target = Cell::new(4, 1);

    let report = find_path(&body, &view, target, SearchConfig::default()).expect("path");
    let first = report.plan()[0].facing;
    assert_eq!(first, Direction::East);
    assert_eq!(free_components(&level, &body.clone_and_advance(first)), 2);
}

#[test]
fn avoidance_keeps_the_free_space_connected() {
    let level = gap_level();
    let view = GridView::new(level.bounds(), &level);
    let body = gap_body(&level);
    let target = Cell::new(4, 1);

    for prefer_more_paths in [false, true] {
        let config = SearchConfig::new(true, prefer_more_paths);
        let report = find_path(&body, &view, target, config).expect("path");
        let plan = report.plan();

        let first = plan[0].facing;
        assert_ne!(first, Direction::East);
        assert_eq!(free_components(&level, &body.clone_and_advance(first)), 1);

        let last = plan[plan.len() - 1];
        assert_eq!(last.position.step(last.facing), target);
    }
}
