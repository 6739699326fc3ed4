use std::cmp::Ordering;
use std::fmt;

use serde::{Deserialize, Serialize};

use super::Position;

/// A span between two [`Position`]s, both ends inclusive for point tests.
///
/// Ranges produced by the document are always oriented (`start <= end`).
/// Ranges built by hand may be inverted; [`Range::fix_orientation`] swaps
/// them back.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Range {
    pub start: Position,
    pub end: Position,
}

/// How another range `B` relates to this range `A`, see [`Range::compare_range`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RangeComparison {
    /// B ends before A starts.
    Before,
    /// B starts before A and ends inside it.
    EndsInside,
    /// One range contains the other.
    Overlapping,
    /// B starts inside A and ends after it.
    StartsInside,
    /// B starts after A ends.
    After,
    /// B ends inside A but starts after A. Only reachable with an inverted B.
    InvertedOverlap,
}

impl RangeComparison {
    /// The classic numeric code: `-2, -1, 0, 1, 2`, and `42` for
    /// [`RangeComparison::InvertedOverlap`].
    pub fn code(self) -> i32 {
        match self {
            RangeComparison::Before => -2,
            RangeComparison::EndsInside => -1,
            RangeComparison::Overlapping => 0,
            RangeComparison::StartsInside => 1,
            RangeComparison::After => 2,
            RangeComparison::InvertedOverlap => 42,
        }
    }
}

impl Range {
    pub const fn new(
        start_row: usize,
        start_column: usize,
        end_row: usize,
        end_column: usize,
    ) -> Self {
        Self {
            start: Position::new(start_row, start_column),
            end: Position::new(end_row, end_column),
        }
    }

    pub const fn from_points(start: Position, end: Position) -> Self {
        Self { start, end }
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    pub fn is_multi_line(&self) -> bool {
        self.start.row != self.end.row
    }

    pub fn is_start(&self, row: usize, column: usize) -> bool {
        self.start == Position::new(row, column)
    }

    pub fn is_end(&self, row: usize, column: usize) -> bool {
        self.end == Position::new(row, column)
    }

    pub fn set_start(&mut self, position: impl Into<Position>) {
        self.start = position.into();
    }

    pub fn set_end(&mut self, position: impl Into<Position>) {
        self.end = position.into();
    }

    /// Where `(row, column)` lies relative to this range.
    ///
    /// `Less` if the point is before the range, `Greater` if after it and
    /// `Equal` if it lies within `[start, end]`. A single-line range only
    /// compares columns when the point is on its row.
    pub fn compare(&self, row: usize, column: usize) -> Ordering {
        if !self.is_multi_line() && row == self.start.row {
            return if column < self.start.column {
                Ordering::Less
            } else if column > self.end.column {
                Ordering::Greater
            } else {
                Ordering::Equal
            };
        }

        if row < self.start.row {
            return Ordering::Less;
        }
        if row > self.end.row {
            return Ordering::Greater;
        }
        if row == self.start.row {
            return if column >= self.start.column {
                Ordering::Equal
            } else {
                Ordering::Less
            };
        }
        if row == self.end.row {
            return if column <= self.end.column {
                Ordering::Equal
            } else {
                Ordering::Greater
            };
        }
        Ordering::Equal
    }

    pub fn compare_point(&self, point: Position) -> Ordering {
        self.compare(point.row, point.column)
    }

    /// Like [`Range::compare`], but the start itself counts as `Less`.
    pub fn compare_start(&self, row: usize, column: usize) -> Ordering {
        if self.is_start(row, column) {
            Ordering::Less
        } else {
            self.compare(row, column)
        }
    }

    /// Like [`Range::compare`], but the end itself counts as `Greater`.
    pub fn compare_end(&self, row: usize, column: usize) -> Ordering {
        if self.is_end(row, column) {
            Ordering::Greater
        } else {
            self.compare(row, column)
        }
    }

    /// Like [`Range::compare`], with both endpoints treated as outside.
    pub fn compare_inside(&self, row: usize, column: usize) -> Ordering {
        if self.is_end(row, column) {
            Ordering::Greater
        } else if self.is_start(row, column) {
            Ordering::Less
        } else {
            self.compare(row, column)
        }
    }

    pub fn compare_range(&self, other: &Range) -> RangeComparison {
        match self.compare_point(other.end) {
            Ordering::Greater => match self.compare_point(other.start) {
                Ordering::Greater => RangeComparison::After,
                Ordering::Equal => RangeComparison::StartsInside,
                Ordering::Less => RangeComparison::Overlapping,
            },
            Ordering::Less => RangeComparison::Before,
            Ordering::Equal => match self.compare_point(other.start) {
                Ordering::Less => RangeComparison::EndsInside,
                Ordering::Greater => RangeComparison::InvertedOverlap,
                Ordering::Equal => RangeComparison::Overlapping,
            },
        }
    }

    pub fn contains(&self, row: usize, column: usize) -> bool {
        self.compare(row, column) == Ordering::Equal
    }

    pub fn contains_range(&self, other: &Range) -> bool {
        self.compare_point(other.start) == Ordering::Equal
            && self.compare_point(other.end) == Ordering::Equal
    }

    pub fn intersects(&self, other: &Range) -> bool {
        matches!(
            self.compare_range(other),
            RangeComparison::EndsInside
                | RangeComparison::Overlapping
                | RangeComparison::StartsInside
        )
    }

    /// Strictly inside: contained and not on either endpoint.
    pub fn inside(&self, row: usize, column: usize) -> bool {
        self.contains(row, column) && !self.is_start(row, column) && !self.is_end(row, column)
    }

    pub fn inside_start(&self, row: usize, column: usize) -> bool {
        self.contains(row, column) && !self.is_end(row, column)
    }

    pub fn inside_end(&self, row: usize, column: usize) -> bool {
        self.contains(row, column) && !self.is_start(row, column)
    }

    /// Clips the range to the rows `first_row..=last_row`.
    ///
    /// Endpoints past `last_row` move to `(last_row + 1, 0)`, endpoints
    /// before `first_row` move to `(first_row, 0)`.
    pub fn clip_rows(&self, first_row: usize, last_row: usize) -> Range {
        let clip = |point: Position| {
            if point.row > last_row {
                Position::new(last_row + 1, 0)
            } else if point.row < first_row {
                Position::new(first_row, 0)
            } else {
                point
            }
        };
        Range::from_points(clip(self.start), clip(self.end))
    }

    /// Widens the range just enough to contain `(row, column)`.
    pub fn extend(&self, row: usize, column: usize) -> Range {
        let point = Position::new(row, column);
        match self.compare(row, column) {
            Ordering::Equal => *self,
            Ordering::Less => Range::from_points(point, self.end),
            Ordering::Greater => Range::from_points(self.start, point),
        }
    }

    /// Swaps an inverted range into canonical order. Returns whether a swap
    /// happened.
    pub fn fix_orientation(&mut self) -> bool {
        if self.start <= self.end {
            return false;
        }
        std::mem::swap(&mut self.start, &mut self.end);
        true
    }

    /// The whole rows covered by the range, as a range of line starts.
    ///
    /// An end at column 0 does not cover its row.
    pub fn collapse_rows(&self) -> Range {
        if self.end.column == 0 {
            let end_row = self.start.row.max(self.end.row.saturating_sub(1));
            Range::new(self.start.row, 0, end_row, 0)
        } else {
            Range::new(self.start.row, 0, self.end.row, 0)
        }
    }
}

impl fmt::Display for Range {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Range: {} -> {}", self.start, self.end)
    }
}
