//! Mark handling and region operations: region kill and the rectangle
//! commands.
//!
//! Every operation commits pending edits, then normalizes point and mark
//! into a [`Range`]. The mark is clamped into the buffer first, since text
//! may have shrunk under it since it was set. Without an active region the
//! operations do nothing.
//!
//! Single rows are changed with the same one-shot gap commit typing uses,
//! through `cut_span` and `replace_span`. A region spanning rows joins the
//! head of its first row to the tail of its last.

use tracing::debug;

use crate::error::{EditError, Result};
use crate::position::{Position, Range};
use crate::state::EditorState;

impl EditorState {
    // -- Mark ---------------------------------------------------------------

    pub fn set_mark(&mut self) {
        self.update_navigation_state();
        self.cursor.set_mark();
        self.set_message("Mark set");
    }

    /// Exchange point and mark. Returns `false` when no mark is set.
    pub fn swap_point_and_mark(&mut self) -> bool {
        self.update_navigation_state();
        self.clamp_mark(false);
        self.cursor.swap_point_and_mark(self.view)
    }

    pub fn clear_mark(&mut self) {
        self.cursor.clear_mark();
    }

    /// True when `(row, col)` should be drawn highlighted.
    #[must_use]
    pub fn in_region(&self, pos: Position) -> bool {
        self.cursor.in_region(pos)
    }

    /// Pull the mark back into the buffer. Rectangles keep its column,
    /// which may lie past the end of a short row.
    fn clamp_mark(&mut self, keep_col: bool) {
        if let Some(mark) = self.cursor.mark() {
            let row = mark.row.min(self.lines.num_rows() - 1);
            let col = if keep_col {
                mark.col
            } else {
                mark.col.min(self.lines.line(row).end_col())
            };
            self.cursor.set_mark_position(Position::new(row, col));
        }
    }

    /// Commit, clamp the mark, and return the region if one is active.
    fn region_for_edit(&mut self) -> Option<Range> {
        self.update_navigation_state();
        self.clamp_mark(false);
        self.cursor.region()
    }

    fn rectangle_for_edit(&mut self) -> Option<Range> {
        self.update_navigation_state();
        self.clamp_mark(true);
        self.cursor.region()
    }

    // -- Region kill --------------------------------------------------------

    /// Delete the text between point and mark.
    ///
    /// # Errors
    ///
    /// [`EditError::ReadOnly`] for a read-only buffer.
    pub fn kill_region(&mut self) -> Result<()> {
        self.ensure_writable()?;
        let Some(region) = self.region_for_edit() else {
            return Ok(());
        };
        debug!(?region, "kill region");
        let Position { row: start_row, col: start_col } = region.start;
        let Position { row: stop_row, col: stop_col } = region.end;

        let stop = self.lines.line(stop_row);
        let empties_tail = start_col == 0
            && stop_row == self.lines.num_rows() - 1
            && !stop.has_newline()
            && stop_col == stop.end_col();

        if start_row == stop_row {
            self.cut_span(start_row, start_col, stop_col);
        } else {
            for _ in start_row + 1..stop_row {
                self.lines.delete_line(start_row + 1);
            }
            let mut joined = self.lines.line(start_row).text()[..start_col].to_vec();
            joined.extend_from_slice(&self.lines.line(start_row + 1).text()[stop_col..]);
            self.lines.delete_line(start_row + 1);
            self.lines.replace_line_text(start_row, joined);
        }
        // An unterminated last line emptied by the kill is dropped, not
        // turned into a bare newline.
        if empties_tail {
            self.lines.delete_line(start_row);
        }

        let row = start_row.min(self.lines.num_rows() - 1);
        let col = start_col.min(self.lines.line(row).end_col());
        self.cursor.goto(Position::new(row, col), self.view);
        self.cursor.clear_mark();
        if !region.is_empty() {
            self.mark_modified();
        }
        Ok(())
    }

    // -- Rectangles ---------------------------------------------------------

    /// Delete the columns `[left, right)` of every row in the rectangle.
    ///
    /// # Errors
    ///
    /// [`EditError::ReadOnly`] for a read-only buffer.
    pub fn kill_rectangle(&mut self) -> Result<()> {
        self.ensure_writable()?;
        let Some(region) = self.rectangle_for_edit() else {
            return Ok(());
        };
        let (top, bottom, left, right) = region.rectangle();
        let mut changed = false;
        for row in top..=bottom {
            let content = self.lines.line(row).content_len();
            if left < right.min(content) {
                self.cut_span(row, left, right.min(content));
                changed = true;
            }
        }
        self.finish_rectangle(top, left, changed);
        Ok(())
    }

    /// Replace the columns `[left, right)` of every row with `text`,
    /// padding short rows with spaces first.
    ///
    /// # Errors
    ///
    /// [`EditError::ReadOnly`] for a read-only buffer,
    /// [`EditError::AccumulatorFull`] when `text` is longer than the edit
    /// accumulator. Either way no row is changed.
    pub fn rectangle_insert(&mut self, text: &[u8]) -> Result<()> {
        self.ensure_writable()?;
        if text.len() > self.acc.capacity() {
            return Err(EditError::AccumulatorFull {
                capacity: self.acc.capacity(),
            });
        }
        let Some(region) = self.rectangle_for_edit() else {
            return Ok(());
        };
        let (top, bottom, left, right) = region.rectangle();
        for row in top..=bottom {
            self.pad_to(row, left)?;
            let content = self.lines.line(row).content_len();
            self.replace_span(row, left, right.min(content), text)?;
        }
        self.finish_rectangle(top, left, true);
        Ok(())
    }

    /// Insert a right-aligned 1-based counter and a space at the left edge
    /// of every row in the rectangle.
    ///
    /// # Errors
    ///
    /// [`EditError::ReadOnly`] for a read-only buffer.
    pub fn rectangle_number_lines(&mut self) -> Result<()> {
        self.ensure_writable()?;
        let Some(region) = self.rectangle_for_edit() else {
            return Ok(());
        };
        let (top, bottom, left, _) = region.rectangle();
        let width = (bottom - top + 1).to_string().len();
        for (i, row) in (top..=bottom).enumerate() {
            self.pad_to(row, left)?;
            let label = format!("{:>width$} ", i + 1);
            self.replace_span(row, left, left, label.as_bytes())?;
        }
        self.finish_rectangle(top, left, true);
        Ok(())
    }

    /// Append spaces to `row` until its content reaches `col`.
    fn pad_to(&mut self, row: usize, col: usize) -> Result<()> {
        loop {
            let content = self.lines.line(row).content_len();
            if content >= col {
                return Ok(());
            }
            let n = (col - content).min(self.acc.capacity());
            self.replace_span(row, content, content, &vec![b' '; n])?;
        }
    }

    fn finish_rectangle(&mut self, top: usize, left: usize, changed: bool) {
        let col = left.min(self.lines.line(top).end_col());
        self.cursor.goto(Position::new(top, col), self.view);
        self.cursor.clear_mark();
        if changed {
            self.mark_modified();
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
