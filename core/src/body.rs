//! Ordered body model of the snake.

use std::collections::HashSet;

use thiserror::Error;

use crate::{Cell, Direction, MapQuery, Segment, SegmentKind};

/// Maximum number of cells [`trace_body`] follows before giving up.
pub const TRACE_STEP_LIMIT: usize = 1000;

/// Snake body stored tail-first, head-last.
///
/// A body always holds at least one segment, so the move operations below
/// cannot fail.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Body {
    segments: Vec<Segment>,
}

/// Reasons a body may be rejected at construction.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum BodyError {
    /// No segments were supplied.
    #[error("a body needs at least one segment")]
    Empty,
    /// Two segments share a cell.
    #[error("more than one segment occupies {cell}")]
    Overlapping {
        /// Cell claimed twice.
        cell: Cell,
    },
    /// A segment's facing does not lead into the next segment.
    #[error("segment {index} does not lead into the segment ahead of it")]
    Broken {
        /// Tail-first index of the offending segment.
        index: usize,
    },
}

/// Reasons [`trace_body`] may fail to seed a body.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum TraceError {
    /// The starting cell does not hold a snake tile.
    #[error("no snake segment found at {start}")]
    NoSegment {
        /// Cell the trace started from.
        start: Cell,
    },
}

impl Body {
    /// Builds a body from tail-first segments, re-tagging the tail and head.
    pub fn new(segments: Vec<Segment>) -> Result<Self, BodyError> {
        if segments.is_empty() {
            return Err(BodyError::Empty);
        }

        let mut seen = HashSet::with_capacity(segments.len());
        for segment in &segments {
            if !seen.insert(segment.position) {
                return Err(BodyError::Overlapping {
                    cell: segment.position,
                });
            }
        }

        for (index, pair) in segments.windows(2).enumerate() {
            if pair[0].position.step(pair[0].facing) != pair[1].position {
                return Err(BodyError::Broken { index });
            }
        }

        Ok(Self::tagged(segments))
    }

    /// Builds a straight body of `length` segments whose head sits at `head`.
    pub fn straight(head: Cell, facing: Direction, length: usize) -> Result<Self, BodyError> {
        let mut segments = Vec::with_capacity(length);
        let mut position = head;
        for _ in 0..length {
            segments.push(Segment::new(position, facing));
            position = position.step(facing.opposite());
        }
        segments.reverse();
        Self::new(segments)
    }

    fn tagged(mut segments: Vec<Segment>) -> Self {
        let last = segments.len() - 1;
        for (index, segment) in segments.iter_mut().enumerate() {
            segment.kind = if index == last {
                SegmentKind::Head
            } else if index == 0 {
                SegmentKind::Tail
            } else {
                SegmentKind::Body
            };
        }
        Self { segments }
    }

    /// Leading segment.
    #[must_use]
    pub fn head(&self) -> &Segment {
        &self.segments[self.segments.len() - 1]
    }

    /// Trailing segment.
    #[must_use]
    pub fn tail(&self) -> &Segment {
        &self.segments[0]
    }

    /// Number of segments.
    #[allow(clippy::len_without_is_empty)]
    #[must_use]
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    /// Segments in tail-to-head order.
    #[must_use]
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Cells occupied by the body in tail-to-head order.
    pub fn cells(&self) -> impl Iterator<Item = Cell> + '_ {
        self.segments.iter().map(|segment| segment.position)
    }

    /// Reports whether any segment occupies the cell.
    #[must_use]
    pub fn contains(&self, cell: Cell) -> bool {
        self.segments.iter().any(|segment| segment.position == cell)
    }

    /// Moves the body one step without growing.
    ///
    /// The head commits to `direction`; every other segment slides into the
    /// cell of the segment ahead of it and inherits that segment's facing.
    pub fn advance_in_place(&mut self, direction: Direction) {
        let last = self.segments.len() - 1;
        self.segments[last].facing = direction;

        for index in 0..=last {
            let facing = self.segments[index].facing;
            self.segments[index].position = self.segments[index].position.step(facing);
            if index < last {
                self.segments[index].facing = self.segments[index + 1].facing;
            }
        }
    }

    /// Moves the head one step and leaves a new segment in its old cell.
    ///
    /// The tail stays where it is, so the body gains exactly one segment.
    pub fn grow(&mut self, direction: Direction) {
        let head_index = self.segments.len() - 1;
        let head = &mut self.segments[head_index];
        head.facing = direction;

        let left_behind = Segment {
            position: head.position,
            facing: direction,
            kind: if head_index == 0 {
                SegmentKind::Tail
            } else {
                SegmentKind::Body
            },
        };
        head.position = head.position.step(direction);
        self.segments.insert(head_index, left_behind);
    }

    /// Deep copy advanced one step in `direction`; `self` is untouched.
    #[must_use]
    pub fn clone_and_advance(&self, direction: Direction) -> Self {
        let mut next = self.clone();
        next.advance_in_place(direction);
        next
    }

    /// Deep copy advanced one step along the current head facing.
    #[must_use]
    pub fn clone_and_continue(&self) -> Self {
        self.clone_and_advance(self.head().facing)
    }
}

/// Seeds a body by following snake tiles from the tail at `start`.
///
/// Each tile's facing names the cell of the next segment. Tracing stops at
/// the first cell without a snake tile, at a cell already traced (a facing
/// cycle), or after [`TRACE_STEP_LIMIT`] steps; whatever was collected up to
/// that point becomes the body.
pub fn trace_body(start: Cell, map: &dyn MapQuery) -> Result<Body, TraceError> {
    let mut segments = Vec::new();
    let mut traced = HashSet::new();
    let mut cursor = start;

    for _ in 0..TRACE_STEP_LIMIT {
        let Some(facing) = map.segment_facing(cursor) else {
            break;
        };
        if !traced.insert(cursor) {
            break;
        }

        segments.push(Segment::new(cursor, facing));
        cursor = cursor.step(facing);
    }

    if segments.is_empty() {
        return Err(TraceError::NoSegment { start });
    }

    Ok(Body::tagged(segments))
}
