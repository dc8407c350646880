//! Buffer coordinates.
//!
//! Rows and columns are **0-indexed** byte offsets. Text is treated as
//! single-byte characters, so column `n` is byte `n` of the row. The status
//! line converts to 1-indexed for the user; that conversion never belongs
//! here.

use std::fmt;

// ---------------------------------------------------------------------------
// Position
// ---------------------------------------------------------------------------

/// An absolute position in the buffer: (row, column), both 0-indexed.
///
/// Positions order row first, then column, which is the order region
/// normalization relies on.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Position {
    pub row: usize,
    pub col: usize,
}

impl Position {
    /// Row 0, column 0.
    pub const ZERO: Self = Self { row: 0, col: 0 };

    #[inline]
    #[must_use]
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }
}

impl Ord for Position {
    #[inline]
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.row.cmp(&other.row).then(self.col.cmp(&other.col))
    }
}

impl PartialOrd for Position {
    #[inline]
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Debug for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Pos({}:{})", self.row, self.col)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.row + 1, self.col + 1)
    }
}

// ---------------------------------------------------------------------------
// Range
// ---------------------------------------------------------------------------

/// A half-open span `[start, end)` with `start <= end`.
///
/// The region between point and mark is always built with
/// [`Range::ordered`], since the user may set the mark on either side.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Range {
    pub start: Position,
    pub end: Position,
}

impl Range {
    /// Create a range from two positions in either order.
    #[inline]
    #[must_use]
    pub fn ordered(a: Position, b: Position) -> Self {
        if a <= b {
            Self { start: a, end: b }
        } else {
            Self { start: b, end: a }
        }
    }

    #[inline]
    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.start.row == self.end.row && self.start.col == self.end.col
    }

    #[inline]
    #[must_use]
    pub const fn is_single_row(self) -> bool {
        self.start.row == self.end.row
    }

    /// True when `pos` falls within `[start, end)`.
    #[inline]
    #[must_use]
    pub fn contains(self, pos: Position) -> bool {
        pos >= self.start && pos < self.end
    }

    /// Top row, bottom row, left column and right column of the rectangle
    /// spanned by the two corners. Columns are taken independently of which
    /// corner they came from.
    #[must_use]
    pub fn rectangle(self) -> (usize, usize, usize, usize) {
        let left = self.start.col.min(self.end.col);
        let right = self.start.col.max(self.end.col);
        (self.start.row, self.end.row, left, right)
    }
}

impl fmt::Debug for Range {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Range({}:{} .. {}:{})",
            self.start.row, self.start.col, self.end.row, self.end.col
        )
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
