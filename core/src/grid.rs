//! Bounded grid model layered over the external map collaborator.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{Cell, MapQuery, Occupancy};

/// Half-open rectangle `[x_min, x_max) × [y_min, y_max)` of playable cells.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GridBounds {
    x_min: i32,
    x_max: i32,
    y_min: i32,
    y_max: i32,
}

impl GridBounds {
    /// Creates bounds from explicit half-open ranges.
    #[must_use]
    pub const fn new(x_min: i32, x_max: i32, y_min: i32, y_max: i32) -> Self {
        Self {
            x_min,
            x_max,
            y_min,
            y_max,
        }
    }

    /// Creates bounds anchored at the origin with the provided dimensions.
    #[must_use]
    pub fn from_size(width: u32, height: u32) -> Self {
        let width = i32::try_from(width).unwrap_or(i32::MAX);
        let height = i32::try_from(height).unwrap_or(i32::MAX);
        Self::new(0, width, 0, height)
    }

    /// Smallest playable `x`.
    #[must_use]
    pub const fn x_min(&self) -> i32 {
        self.x_min
    }

    /// First `x` past the playable area.
    #[must_use]
    pub const fn x_max(&self) -> i32 {
        self.x_max
    }

    /// Smallest playable `y`.
    #[must_use]
    pub const fn y_min(&self) -> i32 {
        self.y_min
    }

    /// First `y` past the playable area.
    #[must_use]
    pub const fn y_max(&self) -> i32 {
        self.y_max
    }

    /// Number of columns covered by the bounds.
    #[must_use]
    pub fn width(&self) -> u32 {
        u32::try_from(i64::from(self.x_max) - i64::from(self.x_min)).unwrap_or(0)
    }

    /// Number of rows covered by the bounds.
    #[must_use]
    pub fn height(&self) -> u32 {
        u32::try_from(i64::from(self.y_max) - i64::from(self.y_min)).unwrap_or(0)
    }

    /// Total number of cells covered by the bounds.
    #[must_use]
    pub fn area(&self) -> usize {
        let width = usize::try_from(self.width()).unwrap_or(0);
        let height = usize::try_from(self.height()).unwrap_or(0);
        width.saturating_mul(height)
    }

    /// Reports whether the cell lies inside the bounds.
    #[must_use]
    pub const fn contains(&self, cell: Cell) -> bool {
        cell.x() >= self.x_min
            && cell.x() < self.x_max
            && cell.y() >= self.y_min
            && cell.y() < self.y_max
    }

    /// Row-major offset of the cell, if it lies inside the bounds.
    #[must_use]
    pub fn index(&self, cell: Cell) -> Option<usize> {
        if !self.contains(cell) {
            return None;
        }

        let column = usize::try_from(cell.x() - self.x_min).ok()?;
        let row = usize::try_from(cell.y() - self.y_min).ok()?;
        let width = usize::try_from(self.width()).ok()?;
        row.checked_mul(width)?.checked_add(column)
    }

    /// Iterates every cell in row-major order, starting at `(x_min, y_min)`.
    pub fn cells(&self) -> impl Iterator<Item = Cell> {
        let (x_min, x_max) = (self.x_min, self.x_max);
        (self.y_min..self.y_max).flat_map(move |y| (x_min..x_max).map(move |x| Cell::new(x, y)))
    }
}

/// Read-only view pairing grid bounds with the map collaborator.
///
/// The view never caches a classification: every query reaches the map, so
/// tiles that change between ticks are always observed fresh.
#[derive(Clone, Copy)]
pub struct GridView<'a> {
    bounds: GridBounds,
    map: &'a dyn MapQuery,
}

impl<'a> GridView<'a> {
    /// Captures a new view over the provided map.
    #[must_use]
    pub fn new(bounds: GridBounds, map: &'a dyn MapQuery) -> Self {
        Self { bounds, map }
    }

    /// Bounds the view covers.
    #[must_use]
    pub const fn bounds(&self) -> GridBounds {
        self.bounds
    }

    /// Underlying map collaborator.
    #[must_use]
    pub fn map(&self) -> &'a dyn MapQuery {
        self.map
    }

    /// Reports whether the cell is inside both the bounds and the map.
    #[must_use]
    pub fn in_bounds(&self, cell: Cell) -> bool {
        self.bounds.contains(cell) && self.map.in_bounds(cell)
    }

    /// Classifies the cell; anything outside the view is a wall.
    #[must_use]
    pub fn classify(&self, cell: Cell) -> Occupancy {
        if self.in_bounds(cell) {
            self.map.classify(cell)
        } else {
            Occupancy::Wall
        }
    }

    /// Reports whether the cell is a permanent obstacle or lies outside the view.
    #[must_use]
    pub fn is_wall(&self, cell: Cell) -> bool {
        self.classify(cell) == Occupancy::Wall
    }
}

impl fmt::Debug for GridView<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GridView")
            .field("bounds", &self.bounds)
            .finish_non_exhaustive()
    }
}
