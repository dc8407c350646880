//! Text editing through the per-line gap.
//!
//! Typing collects bytes in the accumulator against a zero-width gap at
//! point; deleting widens the gap instead of touching the line. The line is
//! rebuilt once, by [`update_line`](EditorState::update_line), when point
//! leaves it or an operation needs committed text.
//!
//! While an edit is pending, point's column is measured in the composed
//! line: `gap.left + accumulated` while inserting, `gap.left` while
//! deleting.

use tracing::debug;

use crate::error::{EditError, Result};
use crate::gap::{self, Gap};
use crate::motion::forward_word_target;
use crate::position::Position;
use crate::state::EditorState;

impl EditorState {
    // -- Commit -------------------------------------------------------------

    /// Fold the pending edit into its line. Returns `false` when there was
    /// nothing to commit, so a second call in a row is a no-op.
    pub fn update_line(&mut self) -> bool {
        let Some(row) = self.editing_row.take() else {
            return false;
        };
        if row < self.lines.num_rows() {
            let line = self.lines.line(row);
            if line.is_edited() {
                let text = gap::compose(line.text(), line.gap(), self.acc.as_bytes());
                debug!(row, gap = ?line.gap(), pending = self.acc.len(), "commit");
                self.lines.replace_line_text(row, text);
            }
        }
        self.acc.clear();
        true
    }

    /// Commit, and clear the minibuffer message. Called before every command
    /// that moves point or reads committed text.
    pub fn update_navigation_state(&mut self) {
        self.update_line();
        self.message = None;
    }

    /// Start a fresh edit with a zero-width gap at `pos`.
    fn begin_edit(&mut self, pos: Position) {
        self.lines.line_mut(pos.row).open_gap(pos.col);
        self.editing_row = Some(pos.row);
        self.acc.clear();
    }

    /// True when the pending edit on point's row is a deletion (nothing
    /// typed) whose gap starts at point.
    fn deleting_at(&self, pos: Position) -> bool {
        self.editing_row == Some(pos.row)
            && self.acc.is_empty()
            && self.lines.line(pos.row).gap().left() == pos.col
    }

    // -- Insertion ----------------------------------------------------------

    /// Insert `byte` at point and move right.
    ///
    /// # Errors
    ///
    /// [`EditError::ReadOnly`] for a read-only buffer.
    pub fn self_insert(&mut self, byte: u8) -> Result<()> {
        self.ensure_writable()?;
        let pos = self.cursor.position();
        let line = self.lines.line(pos.row);
        let continues = self.editing_row == Some(pos.row)
            && line.gap().is_empty()
            && line.gap().left() + self.acc.len() == pos.col
            && !self.acc.is_full();
        if !continues {
            self.update_line();
            self.begin_edit(pos);
        }
        self.acc.push(byte)?;
        self.mark_modified();
        self.cursor.step_right(self.view);
        Ok(())
    }

    /// Insert `tab_width` spaces.
    ///
    /// # Errors
    ///
    /// [`EditError::ReadOnly`] for a read-only buffer.
    pub fn insert_tab(&mut self) -> Result<()> {
        self.insert_spaces(self.config.tab_width)
    }

    fn insert_spaces(&mut self, n: usize) -> Result<()> {
        for _ in 0..n {
            self.self_insert(b' ')?;
        }
        Ok(())
    }

    /// Break the line at point and move to the start of the new line,
    /// copying the previous line's indentation when auto-indent is on.
    ///
    /// # Errors
    ///
    /// [`EditError::ReadOnly`] for a read-only buffer.
    pub fn newline(&mut self) -> Result<()> {
        self.ensure_writable()?;
        self.update_line();
        let pos = self.cursor.position();
        self.lines.split_line(pos.row, pos.col);
        self.cursor.reveal(Position::new(pos.row + 1, 0), self.view);
        self.mark_modified();
        if self.config.auto_indent {
            self.auto_indent()?;
        }
        Ok(())
    }

    fn auto_indent(&mut self) -> Result<()> {
        let row = self.cursor.row();
        let prev = self.lines.line(row - 1);
        if prev.is_blank() {
            return Ok(());
        }
        let indent = prev.indent().min(prev.content_len());
        self.insert_spaces(indent)
    }

    // -- Deletion -----------------------------------------------------------

    /// Delete the byte under point. At the end of a line nothing happens:
    /// the newline is never deleted forward.
    ///
    /// # Errors
    ///
    /// [`EditError::ReadOnly`] for a read-only buffer.
    pub fn delete_char(&mut self) -> Result<()> {
        self.ensure_writable()?;
        let pos = self.cursor.position();
        if !self.deleting_at(pos) {
            self.update_line();
            self.begin_edit(pos);
        }
        let limit = self.lines.line(pos.row).content_len();
        if self.lines.line_mut(pos.row).gap_mut().widen_right(limit) {
            self.mark_modified();
            return Ok(());
        }

        self.update_line();
        Ok(())
    }

    /// Delete the byte before point. At column 0 this line is merged into
    /// the one above; at the start of the buffer nothing happens.
    ///
    /// # Errors
    ///
    /// [`EditError::ReadOnly`] for a read-only buffer.
    pub fn backspace(&mut self) -> Result<()> {
        self.ensure_writable()?;
        let pos = self.cursor.position();
        if pos.col == 0 {
            self.update_line();
            if let Some(join) = self.lines.merge_with_previous(pos.row) {
                self.cursor.reveal(Position::new(pos.row - 1, join), self.view);
                self.mark_modified();
            }
            return Ok(());
        }

        if !self.deleting_at(pos) {
            self.update_line();
            self.begin_edit(pos);
        }
        if self.lines.line_mut(pos.row).gap_mut().widen_left() {
            self.cursor.step_left();
            self.mark_modified();
        }
        Ok(())
    }

    /// Kill from point to the end of the line. On an empty line that is not
    /// the last one, the line itself goes.
    ///
    /// # Errors
    ///
    /// [`EditError::ReadOnly`] for a read-only buffer.
    pub fn kill_line(&mut self) -> Result<()> {
        self.ensure_writable()?;
        self.update_navigation_state();
        let pos = self.cursor.position();
        let line = self.lines.line(pos.row);
        if line.is_blank() {
            if pos.row + 1 < self.lines.num_rows() && self.lines.delete_line(pos.row) {
                self.cursor.line_start();
                self.mark_modified();
            }
        } else if pos.col < line.content_len() {
            self.lines.truncate_at(pos.row, pos.col);
            self.mark_modified();
        }
        Ok(())
    }

    /// Kill from point to where `forward_word` would land.
    ///
    /// # Errors
    ///
    /// [`EditError::ReadOnly`] for a read-only buffer.
    pub fn kill_word(&mut self) -> Result<()> {
        self.ensure_writable()?;
        self.update_navigation_state();
        let pos = self.cursor.position();
        let end = forward_word_target(self.lines.line(pos.row).text(), pos.col);
        if end > pos.col {
            self.cut_span(pos.row, pos.col, end);
            self.mark_modified();
        }
        Ok(())
    }

    // -- Span edits ---------------------------------------------------------

    /// Remove `[from, to)` from `row` with a one-shot gap commit.
    pub(crate) fn cut_span(&mut self, row: usize, from: usize, to: usize) {
        self.update_line();
        let line = self.lines.line_mut(row);
        line.open_gap(from);
        *line.gap_mut() = Gap::span(from, to);
        self.editing_row = Some(row);
        self.update_line();
    }

    /// Replace `[from, to)` of `row` with `bytes` with a one-shot gap commit.
    ///
    /// # Errors
    ///
    /// [`EditError::AccumulatorFull`] when `bytes` is longer than the
    /// accumulator; the row is left untouched.
    pub(crate) fn replace_span(
        &mut self,
        row: usize,
        from: usize,
        to: usize,
        bytes: &[u8],
    ) -> Result<()> {
        if bytes.len() > self.acc.capacity() {
            return Err(EditError::AccumulatorFull {
                capacity: self.acc.capacity(),
            });
        }
        self.update_line();
        let line = self.lines.line_mut(row);
        line.open_gap(from);
        *line.gap_mut() = Gap::span(from, to);
        self.editing_row = Some(row);
        self.acc.extend(bytes)?;
        self.update_line();
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
