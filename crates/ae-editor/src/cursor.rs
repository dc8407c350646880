//! Point, mark and the scroll offsets.
//!
//! Point lives on screen: `(x, y)` is the cursor cell inside the text area
//! and `(col_offset, row_offset)` is how far the view is scrolled. The
//! absolute buffer position is their sum. Every motion that could push the
//! cursor off the text area scrolls instead.
//!
//! The mark is stored as an absolute position so it stays put while the
//! view scrolls.

use crate::position::{Position, Range};

// ---------------------------------------------------------------------------
// Viewport
// ---------------------------------------------------------------------------

/// Size of the text area in cells (the screen minus status and minibuffer
/// lines). Both dimensions are at least 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub rows: usize,
    pub cols: usize,
}

impl Viewport {
    #[must_use]
    pub fn new(rows: usize, cols: usize) -> Self {
        Self {
            rows: rows.max(1),
            cols: cols.max(1),
        }
    }

    /// Last screen row index.
    #[inline]
    #[must_use]
    pub const fn bottom(self) -> usize {
        self.rows - 1
    }

    /// Last screen column index.
    #[inline]
    #[must_use]
    pub const fn right(self) -> usize {
        self.cols - 1
    }
}

// ---------------------------------------------------------------------------
// Cursor
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Cursor {
    pub x: usize,
    pub y: usize,
    pub row_offset: usize,
    pub col_offset: usize,
    mark: Option<Position>,
    region_active: bool,
}

impl Cursor {
    /// Absolute buffer position of point.
    #[inline]
    #[must_use]
    pub const fn position(&self) -> Position {
        Position::new(self.y + self.row_offset, self.x + self.col_offset)
    }

    #[inline]
    #[must_use]
    pub const fn row(&self) -> usize {
        self.y + self.row_offset
    }

    #[inline]
    #[must_use]
    pub const fn col(&self) -> usize {
        self.x + self.col_offset
    }

    // -- Mark ---------------------------------------------------------------

    /// Drop the mark at point and activate the region.
    pub const fn set_mark(&mut self) {
        self.mark = Some(self.position());
        self.region_active = true;
    }

    /// Forget the mark and deactivate the region.
    pub const fn clear_mark(&mut self) {
        self.mark = None;
        self.region_active = false;
    }

    #[inline]
    #[must_use]
    pub const fn mark(&self) -> Option<Position> {
        self.mark
    }

    pub(crate) const fn set_mark_position(&mut self, pos: Position) {
        self.mark = Some(pos);
    }

    #[inline]
    #[must_use]
    pub const fn region_active(&self) -> bool {
        self.region_active
    }

    /// The normalized span between point and mark, when the region is active.
    #[must_use]
    pub fn region(&self) -> Option<Range> {
        match self.mark {
            Some(mark) if self.region_active => Some(Range::ordered(self.position(), mark)),
            _ => None,
        }
    }

    /// True when `pos` is inside the active region. The renderer's
    /// highlighting predicate.
    #[must_use]
    pub fn in_region(&self, pos: Position) -> bool {
        self.region().is_some_and(|r| r.contains(pos))
    }

    /// Exchange point and mark. Returns `false` when no mark is set.
    pub fn swap_point_and_mark(&mut self, view: Viewport) -> bool {
        let Some(mark) = self.mark else {
            return false;
        };
        let point = self.position();
        self.goto(mark, view);
        self.mark = Some(point);
        true
    }

    // -- Columns ------------------------------------------------------------

    /// One column right, scrolling at the right edge.
    pub const fn step_right(&mut self, view: Viewport) {
        if self.x < view.right() {
            self.x += 1;
        } else {
            self.col_offset += 1;
        }
    }

    /// One column left, scrolling at the left edge. No-op at column 0.
    pub const fn step_left(&mut self) {
        if self.x > 0 {
            self.x -= 1;
        } else if self.col_offset > 0 {
            self.col_offset -= 1;
        }
    }

    /// Move to `end_col` on the current row. A column past the right edge
    /// pins `x` to the edge and scrolls so `end_col` is the last visible
    /// column; otherwise the view is not scrolled.
    pub const fn point_to_end_line(&mut self, end_col: usize, view: Viewport) {
        if end_col > view.right() {
            self.x = view.right();
            self.col_offset = end_col - view.right();
        } else {
            self.x = end_col;
            self.col_offset = 0;
        }
    }

    /// Column 0, unscrolled.
    pub const fn line_start(&mut self) {
        self.x = 0;
        self.col_offset = 0;
    }

    // -- Rows ---------------------------------------------------------------

    /// Place point at `pos`, scrolling as little as possible.
    pub const fn reveal(&mut self, pos: Position, view: Viewport) {
        if pos.row < self.row_offset {
            self.row_offset = pos.row;
        } else if pos.row > self.row_offset + view.bottom() {
            self.row_offset = pos.row - view.bottom();
        }
        self.y = pos.row - self.row_offset;
        self.set_col(pos.col, view);
    }

    /// Place point at `pos`. A row already on screen keeps the scroll;
    /// anything else is centered.
    pub const fn goto(&mut self, pos: Position, view: Viewport) {
        let visible = pos.row >= self.row_offset && pos.row <= self.row_offset + view.bottom();
        if !visible {
            self.row_offset = pos.row.saturating_sub(view.rows / 2);
        }
        self.y = pos.row - self.row_offset;
        self.set_col(pos.col, view);
    }

    /// Scroll so point's row sits mid-viewport, never above row 0.
    pub const fn center(&mut self, view: Viewport) {
        let row = self.row();
        self.row_offset = row.saturating_sub(view.rows / 2);
        self.y = row - self.row_offset;
    }

    /// Move to `col` on the current row, keeping the horizontal scroll when
    /// the column is already visible.
    pub const fn set_col(&mut self, col: usize, view: Viewport) {
        if col >= self.col_offset && col <= self.col_offset + view.right() {
            self.x = col - self.col_offset;
        } else {
            self.point_to_end_line(col, view);
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const VIEW: Viewport = Viewport { rows: 10, cols: 20 };

    fn at(row: usize, col: usize) -> Cursor {
        let mut c = Cursor::default();
        c.goto(Position::new(row, col), VIEW);
        c
    }

    // -- Coordinates --------------------------------------------------------

    #[test]
    fn position_adds_offsets() {
        let c = Cursor {
            x: 3,
            y: 2,
            row_offset: 10,
            col_offset: 5,
            ..Cursor::default()
        };
        assert_eq!(c.position(), Position::new(12, 8));
    }

    #[test]
    fn viewport_is_never_empty() {
        assert_eq!(Viewport::new(0, 0), Viewport { rows: 1, cols: 1 });
    }

    // -- Mark & region ------------------------------------------------------

    #[test]
    fn set_and_clear_mark() {
        let mut c = at(1, 2);
        c.set_mark();
        assert_eq!(c.mark(), Some(Position::new(1, 2)));
        assert!(c.region_active());
        c.clear_mark();
        assert_eq!(c.mark(), None);
        assert!(!c.region_active());
        assert!(c.region().is_none());
    }

    #[test]
    fn region_is_normalized() {
        let mut c = at(3, 4);
        c.set_mark();
        c.goto(Position::new(1, 0), VIEW);
        let r = c.region().unwrap();
        assert_eq!(r.start, Position::new(1, 0));
        assert_eq!(r.end, Position::new(3, 4));
        assert!(c.in_region(Position::new(2, 0)));
        assert!(!c.in_region(Position::new(3, 4)));
    }

    #[test]
    fn swap_without_mark_fails() {
        let mut c = at(0, 0);
        assert!(!c.swap_point_and_mark(VIEW));
    }

    #[test]
    fn swap_exchanges_and_scrolls() {
        let mut c = at(2, 1);
        c.set_mark();
        c.goto(Position::new(50, 3), VIEW);
        assert!(c.swap_point_and_mark(VIEW));
        assert_eq!(c.position(), Position::new(2, 1));
        assert_eq!(c.mark(), Some(Position::new(50, 3)));
        assert!(c.swap_point_and_mark(VIEW));
        assert_eq!(c.position(), Position::new(50, 3));
        assert!(c.y < VIEW.rows);
    }

    // -- Columns ------------------------------------------------------------

    #[test]
    fn step_right_scrolls_at_edge() {
        let mut c = at(0, 19);
        assert_eq!((c.x, c.col_offset), (19, 0));
        c.step_right(VIEW);
        assert_eq!((c.x, c.col_offset), (19, 1));
        assert_eq!(c.col(), 20);
    }

    #[test]
    fn step_left_scrolls_back() {
        let mut c = Cursor {
            col_offset: 2,
            ..Cursor::default()
        };
        c.step_left();
        assert_eq!((c.x, c.col_offset), (0, 1));
        c.step_left();
        c.step_left();
        assert_eq!(c.col(), 0);
    }

    #[test]
    fn end_line_short_line() {
        let mut c = at(0, 0);
        c.point_to_end_line(7, VIEW);
        assert_eq!((c.x, c.col_offset), (7, 0));
    }

    #[test]
    fn end_line_long_line_pins_to_edge() {
        let mut c = at(0, 0);
        c.point_to_end_line(45, VIEW);
        assert_eq!((c.x, c.col_offset), (19, 26));
        assert_eq!(c.col(), 45);
    }

    // -- Rows ---------------------------------------------------------------

    #[test]
    fn goto_visible_row_keeps_scroll() {
        let mut c = at(0, 0);
        c.goto(Position::new(7, 2), VIEW);
        assert_eq!((c.y, c.row_offset), (7, 0));
    }

    #[test]
    fn goto_far_row_centers() {
        let mut c = at(0, 0);
        c.goto(Position::new(40, 0), VIEW);
        assert_eq!(c.row_offset, 35);
        assert_eq!(c.y, 5);
    }

    #[test]
    fn reveal_scrolls_minimally() {
        let mut c = at(0, 0);
        c.reveal(Position::new(12, 0), VIEW);
        assert_eq!((c.y, c.row_offset), (9, 3));
        c.reveal(Position::new(1, 0), VIEW);
        assert_eq!((c.y, c.row_offset), (0, 1));
    }

    #[test]
    fn center_never_scrolls_above_top() {
        let mut c = at(2, 0);
        c.center(VIEW);
        assert_eq!((c.y, c.row_offset), (2, 0));
        c.goto(Position::new(30, 0), VIEW);
        c.center(VIEW);
        assert_eq!((c.y, c.row_offset), (5, 25));
    }
}
