use proptest::prelude::*;
use snake_pilot_core::{Cell, Direction};

fn cell() -> impl Strategy<Value = Cell> {
    (-500i32..500, -500i32..500).prop_map(|(x, y)| Cell::new(x, y))
}

fn walk_length(from: Cell, to: Cell) -> u32 {
    let mut cursor = from;
    let mut steps = 0;
    while cursor.x() != to.x() {
        let direction = if cursor.x() < to.x() {
            Direction::East
        } else {
            Direction::West
        };
        cursor = cursor.step(direction);
        steps += 1;
    }
    while cursor.y() != to.y() {
        let direction = if cursor.y() < to.y() {
            Direction::North
        } else {
            Direction::South
        };
        cursor = cursor.step(direction);
        steps += 1;
    }
    steps
}

proptest! {
    #[test]
    fn manhattan_distance_is_symmetric(a in cell(), b in cell()) {
        prop_assert_eq!(a.manhattan_distance(b), b.manhattan_distance(a));
    }

    #[test]
    fn manhattan_distance_obeys_triangle_inequality(a in cell(), b in cell(), c in cell()) {
        prop_assert!(a.manhattan_distance(c) <= a.manhattan_distance(b) + b.manhattan_distance(c));
    }

    #[test]
    fn manhattan_distance_never_exceeds_an_open_grid_walk(a in cell(), b in cell()) {
        prop_assert!(a.manhattan_distance(b) <= walk_length(a, b));
    }
}
