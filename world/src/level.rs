//! ASCII tile maps.

use std::fmt;

use snake_pilot_core::{Cell, Direction, GridBounds, MapQuery, Occupancy};
use thiserror::Error;

/// Contents of a single map cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Tile {
    /// Nothing drawn.
    Empty,
    /// Permanent obstacle.
    Wall,
    /// Food the snake grows by eating.
    Apple,
    /// Snake segment moving in the given direction.
    Snake(Direction),
}

impl Tile {
    /// Glyph used by the ASCII level format.
    #[must_use]
    pub const fn glyph(self) -> char {
        match self {
            Self::Empty => '.',
            Self::Wall => '#',
            Self::Apple => '*',
            Self::Snake(Direction::North) => '^',
            Self::Snake(Direction::East) => '>',
            Self::Snake(Direction::South) => 'v',
            Self::Snake(Direction::West) => '<',
        }
    }

    fn from_glyph(glyph: char) -> Option<Self> {
        let tile = match glyph {
            '.' => Self::Empty,
            '#' => Self::Wall,
            '*' => Self::Apple,
            '^' => Self::Snake(Direction::North),
            '>' => Self::Snake(Direction::East),
            'v' => Self::Snake(Direction::South),
            '<' => Self::Snake(Direction::West),
            _ => return None,
        };
        Some(tile)
    }
}

/// Errors raised while reading a level.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum LevelError {
    /// The text holds no rows.
    #[error("level contains no rows")]
    Empty,
    /// A row is wider or narrower than the first one.
    #[error("row {row} has {found} columns, expected {expected}")]
    RaggedRow {
        /// Zero-based row counted from the top of the text.
        row: usize,
        /// Width of the first row.
        expected: usize,
        /// Width of the offending row.
        found: usize,
    },
    /// A character outside the level alphabet.
    #[error("unknown glyph {glyph:?} at row {row}, column {column}")]
    UnknownGlyph {
        /// Offending character.
        glyph: char,
        /// Zero-based row counted from the top of the text.
        row: usize,
        /// Zero-based column.
        column: usize,
    },
    /// No snake tiles were drawn.
    #[error("level contains no snake")]
    NoSnake,
    /// Every snake tile is pointed into by another one.
    #[error("snake has no tail")]
    NoTail,
    /// More than one snake tile could be the tail.
    #[error("snake has {count} candidate tails")]
    AmbiguousTail {
        /// Number of tail candidates.
        count: usize,
    },
    /// More than one apple was drawn.
    #[error("level contains {count} apples, at most one is allowed")]
    MultipleApples {
        /// Number of apples found.
        count: usize,
    },
    /// The level is too large to address with grid coordinates.
    #[error("level dimensions exceed the addressable grid")]
    TooLarge,
}

/// Dense tile map anchored at the origin with `y` growing upwards.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Level {
    bounds: GridBounds,
    tiles: Vec<Tile>,
}

impl Level {
    /// Parses the ASCII level format.
    ///
    /// Rows are listed from the top of the map (highest `y`) down; blank
    /// lines are ignored.
    pub fn parse(text: &str) -> Result<Self, LevelError> {
        let rows: Vec<&str> = text
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .collect();
        let Some(first) = rows.first() else {
            return Err(LevelError::Empty);
        };
        let width = first.chars().count();

        let mut parsed = Vec::with_capacity(rows.len());
        for (row, line) in rows.iter().enumerate() {
            let found = line.chars().count();
            if found != width {
                return Err(LevelError::RaggedRow {
                    row,
                    expected: width,
                    found,
                });
            }

            let mut tiles = Vec::with_capacity(width);
            for (column, glyph) in line.chars().enumerate() {
                let tile = Tile::from_glyph(glyph).ok_or(LevelError::UnknownGlyph {
                    glyph,
                    row,
                    column,
                })?;
                tiles.push(tile);
            }
            parsed.push(tiles);
        }

        // Storage is row-major from the bottom row.
        parsed.reverse();
        let width = u32::try_from(width).map_err(|_| LevelError::TooLarge)?;
        let height = u32::try_from(parsed.len()).map_err(|_| LevelError::TooLarge)?;
        let level = Self {
            bounds: GridBounds::from_size(width, height),
            tiles: parsed.into_iter().flatten().collect(),
        };

        let apples = level.tiles.iter().filter(|tile| **tile == Tile::Apple).count();
        if apples > 1 {
            return Err(LevelError::MultipleApples { count: apples });
        }
        level.find_tail().map(|_tail| level)
    }

    /// Bounds covered by the level.
    #[must_use]
    pub const fn bounds(&self) -> GridBounds {
        self.bounds
    }

    /// Tile stored at the cell, if the cell lies inside the level.
    #[must_use]
    pub fn tile(&self, cell: Cell) -> Option<Tile> {
        self.bounds
            .index(cell)
            .and_then(|index| self.tiles.get(index).copied())
    }

    /// Overwrites the tile at the cell. Cells outside the level are ignored.
    pub fn set_tile(&mut self, cell: Cell, tile: Tile) {
        if let Some(slot) = self
            .bounds
            .index(cell)
            .and_then(|index| self.tiles.get_mut(index))
        {
            *slot = tile;
        }
    }

    /// Location of the apple, if one is drawn.
    #[must_use]
    pub fn apple(&self) -> Option<Cell> {
        self.bounds
            .cells()
            .find(|cell| self.tile(*cell) == Some(Tile::Apple))
    }

    /// Cells holding nothing at all.
    pub fn empty_cells(&self) -> impl Iterator<Item = Cell> + '_ {
        self.bounds
            .cells()
            .filter(move |cell| self.tile(*cell) == Some(Tile::Empty))
    }

    /// Locates the snake segment that no other segment points into.
    pub fn find_tail(&self) -> Result<Cell, LevelError> {
        let snake: Vec<(Cell, Direction)> = self
            .bounds
            .cells()
            .filter_map(|cell| match self.tile(cell) {
                Some(Tile::Snake(facing)) => Some((cell, facing)),
                _ => None,
            })
            .collect();
        if snake.is_empty() {
            return Err(LevelError::NoSnake);
        }

        let pointed_into: Vec<Cell> = snake
            .iter()
            .map(|(cell, facing)| cell.step(*facing))
            .collect();
        let tails: Vec<Cell> = snake
            .iter()
            .map(|(cell, _)| *cell)
            .filter(|cell| !pointed_into.contains(cell))
            .collect();

        match tails.as_slice() {
            [] => Err(LevelError::NoTail),
            [tail] => Ok(*tail),
            _ => Err(LevelError::AmbiguousTail { count: tails.len() }),
        }
    }

    /// ASCII form of the level, top row first.
    #[must_use]
    pub fn render(&self) -> String {
        let mut out = String::with_capacity(self.tiles.len() + self.tiles.len() / 4);
        for y in (self.bounds.y_min()..self.bounds.y_max()).rev() {
            for x in self.bounds.x_min()..self.bounds.x_max() {
                out.push(self.tile(Cell::new(x, y)).map_or(' ', Tile::glyph));
            }
            out.push('\n');
        }
        out
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

impl MapQuery for Level {
    fn classify(&self, cell: Cell) -> Occupancy {
        match self.tile(cell) {
            None | Some(Tile::Wall) => Occupancy::Wall,
            Some(Tile::Empty) => Occupancy::Empty,
            Some(Tile::Apple) => Occupancy::Grow,
            Some(Tile::Snake(_)) => Occupancy::Collide,
        }
    }

    fn in_bounds(&self, cell: Cell) -> bool {
        self.bounds.contains(cell)
    }

    fn segment_facing(&self, cell: Cell) -> Option<Direction> {
        match self.tile(cell) {
            Some(Tile::Snake(facing)) => Some(facing),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SMALL: &str = "
        #####
        #.*.#
        #>>^#
        #####
    ";

    #[test]
    fn parse_puts_the_first_row_on_top() {
        let level = Level::parse(SMALL).expect("valid level");
        assert_eq!(level.bounds(), GridBounds::from_size(5, 4));
        assert_eq!(level.tile(Cell::new(2, 2)), Some(Tile::Apple));
        assert_eq!(level.tile(Cell::new(1, 1)), Some(Tile::Snake(Direction::East)));
        assert_eq!(level.tile(Cell::new(0, 0)), Some(Tile::Wall));
        assert_eq!(level.apple(), Some(Cell::new(2, 2)));
    }

    #[test]
    fn render_reproduces_the_source_rows() {
        let level = Level::parse(SMALL).expect("valid level");
        assert_eq!(level.render(), "#####\n#.*.#\n#>>^#\n#####\n");
    }

    #[test]
    fn tail_is_the_segment_nothing_points_into() {
        let level = Level::parse(SMALL).expect("valid level");
        assert_eq!(level.find_tail(), Ok(Cell::new(1, 1)));
    }

    #[test]
    fn classification_follows_tiles() {
        let level = Level::parse(SMALL).expect("valid level");
        assert_eq!(level.classify(Cell::new(0, 2)), Occupancy::Wall);
        assert_eq!(level.classify(Cell::new(1, 2)), Occupancy::Empty);
        assert_eq!(level.classify(Cell::new(2, 2)), Occupancy::Grow);
        assert_eq!(level.classify(Cell::new(3, 1)), Occupancy::Collide);
        assert_eq!(level.classify(Cell::new(9, 9)), Occupancy::Wall);
        assert_eq!(level.segment_facing(Cell::new(3, 1)), Some(Direction::North));
        assert_eq!(level.segment_facing(Cell::new(1, 2)), None);
    }

    #[test]
    fn malformed_levels_are_rejected() {
        assert_eq!(Level::parse("\n \n"), Err(LevelError::Empty));
        assert_eq!(
            Level::parse("###\n##\n"),
            Err(LevelError::RaggedRow {
                row: 1,
                expected: 3,
                found: 2
            })
        );
        assert_eq!(
            Level::parse("#>x\n"),
            Err(LevelError::UnknownGlyph {
                glyph: 'x',
                row: 0,
                column: 2
            })
        );
        assert_eq!(Level::parse("#.*#\n"), Err(LevelError::NoSnake));
        assert_eq!(Level::parse("><\n"), Err(LevelError::NoTail));
        assert_eq!(
            Level::parse(">.>\n"),
            Err(LevelError::AmbiguousTail { count: 2 })
        );
        assert_eq!(
            Level::parse(">.**\n"),
            Err(LevelError::MultipleApples { count: 2 })
        );
    }

    #[test]
    fn set_tile_ignores_cells_outside_the_level() {
        let mut level = Level::parse(SMALL).expect("valid level");
        let before = level.clone();
        level.set_tile(Cell::new(-1, 0), Tile::Apple);
        assert_eq!(level, before);

        level.set_tile(Cell::new(1, 2), Tile::Wall);
        assert_eq!(level.tile(Cell::new(1, 2)), Some(Tile::Wall));
    }
}
