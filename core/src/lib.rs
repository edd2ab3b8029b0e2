#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the snake-pilot engine.
//!
//! This crate defines the vocabulary every other crate speaks: grid cells,
//! the four orthogonal [`Direction`]s, the [`Occupancy`] classification a map
//! reports for each cell, and the [`Body`] model that the search engine
//! clones and advances while exploring hypothetical futures. The map itself
//! is an external collaborator reached through the [`MapQuery`] trait and
//! wrapped by the read-only [`GridView`].

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

mod body;
mod grid;

pub use body::{trace_body, Body, BodyError, TraceError, TRACE_STEP_LIMIT};
pub use grid::{GridBounds, GridView};

/// Location of a single grid cell. `y` grows towards [`Direction::North`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Cell {
    x: i32,
    y: i32,
}

impl Cell {
    /// Creates a new cell coordinate.
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Horizontal coordinate of the cell.
    #[must_use]
    pub const fn x(&self) -> i32 {
        self.x
    }

    /// Vertical coordinate of the cell.
    #[must_use]
    pub const fn y(&self) -> i32 {
        self.y
    }

    /// Cell reached by moving one step in `direction`.
    #[must_use]
    pub const fn step(self, direction: Direction) -> Self {
        let (dx, dy) = direction.offset();
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }

    /// Computes the Manhattan distance between two cells.
    #[must_use]
    pub fn manhattan_distance(self, other: Cell) -> u32 {
        self.x.abs_diff(other.x) + self.y.abs_diff(other.y)
    }

    /// Direction leading from `self` to an orthogonally adjacent `other`.
    ///
    /// Returns `None` when the cells are not neighbours.
    #[must_use]
    pub fn direction_to(self, other: Cell) -> Option<Direction> {
        Direction::ALL
            .into_iter()
            .find(|direction| self.step(*direction) == other)
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Orthogonal unit moves available to the snake.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// Movement toward increasing `y`.
    North,
    /// Movement toward increasing `x`.
    East,
    /// Movement toward decreasing `y`.
    South,
    /// Movement toward decreasing `x`.
    West,
}

impl Direction {
    /// Every direction in clockwise order starting at [`Direction::North`].
    pub const ALL: [Direction; 4] = [
        Direction::North,
        Direction::East,
        Direction::South,
        Direction::West,
    ];

    /// Unit offset `(dx, dy)` applied by a step in this direction.
    #[must_use]
    pub const fn offset(self) -> (i32, i32) {
        match self {
            Self::North => (0, 1),
            Self::East => (1, 0),
            Self::South => (0, -1),
            Self::West => (-1, 0),
        }
    }

    /// Direction pointing the opposite way.
    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Self::North => Self::South,
            Self::East => Self::West,
            Self::South => Self::North,
            Self::West => Self::East,
        }
    }

    /// Reports whether the direction runs along the x axis.
    #[must_use]
    pub const fn is_horizontal(self) -> bool {
        matches!(self, Self::East | Self::West)
    }

    /// Converts a tile rotation in degrees into the direction it faces.
    ///
    /// Unrotated tiles face [`Direction::East`]; rotations advance
    /// counter-clockwise in quarter turns.
    pub fn from_rotation_degrees(degrees: i32) -> Result<Self, DirectionError> {
        match degrees.rem_euclid(360) {
            0 => Ok(Self::East),
            90 => Ok(Self::North),
            180 => Ok(Self::West),
            270 => Ok(Self::South),
            _ => Err(DirectionError::UnsupportedRotation(degrees)),
        }
    }

    /// Tile rotation in degrees that makes an unrotated tile face this direction.
    #[must_use]
    pub const fn rotation_degrees(self) -> i32 {
        match self {
            Self::East => 0,
            Self::North => 90,
            Self::West => 180,
            Self::South => 270,
        }
    }
}

/// Reasons a direction conversion may be rejected.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum DirectionError {
    /// The rotation is not one of the four primary angles.
    #[error("rotation of {0} degrees is not one of the four primary angles")]
    UnsupportedRotation(i32),
}

/// Classification a map reports for a single cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Occupancy {
    /// Nothing occupies the cell.
    Empty,
    /// Permanent obstacle.
    Wall,
    /// Entering the cell ends the run (obstacle or the snake's own body).
    Collide,
    /// Food; entering the cell is legal and lengthens the body.
    Grow,
}

/// Tile tag carried by a body segment.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SegmentKind {
    /// Trailing segment.
    Tail,
    /// Interior segment.
    Body,
    /// Leading segment.
    Head,
}

/// One cell of the snake together with the direction it is moving in.
///
/// For every segment but the head, `position.step(facing)` is the position of
/// the next segment toward the head.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Segment {
    /// Cell occupied by the segment.
    pub position: Cell,
    /// Direction the segment moves in on the next advance.
    pub facing: Direction,
    /// Tile tag of the segment.
    pub kind: SegmentKind,
}

impl Segment {
    /// Creates a segment tagged as an interior body tile.
    #[must_use]
    pub const fn new(position: Cell, facing: Direction) -> Self {
        Self {
            position,
            facing,
            kind: SegmentKind::Body,
        }
    }
}

/// Read access to whatever owns the persistent level state.
pub trait MapQuery {
    /// Classifies the provided cell.
    fn classify(&self, cell: Cell) -> Occupancy;

    /// Reports whether the cell belongs to the map at all.
    fn in_bounds(&self, cell: Cell) -> bool;

    /// Facing of the snake tile drawn at `cell`, if the cell holds one.
    ///
    /// Only used when seeding a body with [`trace_body`].
    fn segment_facing(&self, cell: Cell) -> Option<Direction>;
}
