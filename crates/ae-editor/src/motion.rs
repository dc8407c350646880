//! Point motion: characters, words, lines, pages.
//!
//! Motions never change text, but each one commits the pending edit first
//! so the row it leaves is consistent. Row motions change either the screen
//! row or the row offset, never both, and pull the column back to the end
//! of a shorter line.

use crate::position::Position;
use crate::state::EditorState;

// ---------------------------------------------------------------------------
// Word scanning
// ---------------------------------------------------------------------------

/// Bytes that end a word for forward motion.
const fn ends_word(b: u8) -> bool {
    matches!(b, b' ' | b')' | b']' | b'\n')
}

/// Where `forward_word` lands from `col` on `text`.
///
/// Skips the rest of the word under `col`, the delimiters after it, then
/// the next word, stopping on the delimiter that ends it. Never moves past
/// the line's content.
#[must_use]
pub fn forward_word_target(text: &[u8], col: usize) -> usize {
    let end = text.iter().position(|&b| b == b'\n').unwrap_or(text.len());
    if col >= end {
        return col;
    }
    let mut c = col;
    while c < end && !ends_word(text[c]) {
        c += 1;
    }
    while c < end && matches!(text[c], b' ' | b')' | b']') {
        c += 1;
    }
    while c < end && !ends_word(text[c]) {
        c += 1;
    }
    c
}

/// Where `backward_word` lands from `col` on `text`, or `col` itself when
/// there is no earlier word on the line.
#[must_use]
pub fn backward_word_target(text: &[u8], col: usize) -> usize {
    if col == 0 {
        return 0;
    }
    let mut c = col - 1;
    while c > 0 && matches!(text[c], b' ' | b')' | b';' | b']') {
        c -= 1;
    }
    if text[c] == b' ' {
        return col;
    }
    while c > 0 && !matches!(text[c], b' ' | b'(' | b'[') {
        c -= 1;
    }
    if text[c] == b' ' {
        c += 1;
    }
    c
}

// ---------------------------------------------------------------------------
// Motions
// ---------------------------------------------------------------------------

impl EditorState {
    /// Put point at `pos`, clamped into the buffer.
    pub fn goto(&mut self, pos: Position) {
        self.update_navigation_state();
        let row = pos.row.min(self.lines.num_rows() - 1);
        let col = pos.col.min(self.lines.line(row).end_col());
        self.cursor.goto(Position::new(row, col), self.view);
    }

    fn end_col(&self) -> usize {
        self.lines.line(self.cursor.row()).end_col()
    }

    /// Pull point back to the end of the line if it is past it.
    fn clamp_col(&mut self) {
        let end = self.end_col();
        if self.cursor.col() > end {
            self.cursor.point_to_end_line(end, self.view);
        }
    }

    // -- Characters ---------------------------------------------------------

    pub fn point_forward(&mut self) {
        self.update_navigation_state();
        if self.cursor.col() < self.end_col() {
            self.cursor.step_right(self.view);
        }
    }

    pub fn point_backward(&mut self) {
        self.update_navigation_state();
        self.cursor.step_left();
    }

    // -- Words --------------------------------------------------------------

    pub fn forward_word(&mut self) {
        self.update_navigation_state();
        let pos = self.cursor.position();
        let target = forward_word_target(self.lines.line(pos.row).text(), pos.col);
        self.cursor.set_col(target, self.view);
    }

    pub fn backward_word(&mut self) {
        self.update_navigation_state();
        let pos = self.cursor.position();
        let target = backward_word_target(self.lines.line(pos.row).text(), pos.col);
        self.cursor.set_col(target, self.view);
    }

    // -- Lines --------------------------------------------------------------

    pub fn next_line(&mut self) {
        self.update_navigation_state();
        if self.cursor.row() + 1 >= self.lines.num_rows() {
            return;
        }
        if self.cursor.y < self.view.bottom() {
            self.cursor.y += 1;
        } else {
            self.cursor.row_offset += 1;
        }
        self.clamp_col();
    }

    pub fn prior_line(&mut self) {
        self.update_navigation_state();
        if self.cursor.row() == 0 {
            return;
        }
        if self.cursor.y > 0 {
            self.cursor.y -= 1;
        } else {
            self.cursor.row_offset -= 1;
        }
        self.clamp_col();
    }

    pub fn line_start(&mut self) {
        self.update_navigation_state();
        self.cursor.line_start();
    }

    pub fn line_end(&mut self) {
        self.update_navigation_state();
        let end = self.end_col();
        self.cursor.point_to_end_line(end, self.view);
    }

    // -- Pages --------------------------------------------------------------

    /// First stop is the bottom of the screen; from there, scroll so the
    /// bottom row becomes the top one. Near the end, go to the last row.
    pub fn page_down(&mut self) {
        self.update_navigation_state();
        let rows = self.view.rows;
        let bottom = self.view.bottom();
        let remaining = self.lines.num_rows() - self.cursor.row();
        if self.cursor.y < bottom {
            if remaining < rows {
                self.point_to_end_buffer();
                return;
            }
            self.cursor.y = bottom;
        } else if bottom == 0 {
            if remaining > 1 {
                self.cursor.row_offset += 1;
            }
        } else {
            self.cursor.row_offset += bottom;
            self.cursor.y = 0;
        }
        self.cursor.line_start();
    }

    /// Mirror of [`page_down`](Self::page_down).
    pub fn page_up(&mut self) {
        self.update_navigation_state();
        let bottom = self.view.bottom();
        if self.cursor.y > 0 {
            self.cursor.y = 0;
        } else if self.cursor.row_offset > self.view.rows && bottom > 0 {
            self.cursor.row_offset -= bottom;
            self.cursor.y = bottom;
        } else {
            self.point_to_beginning_buffer();
            return;
        }
        self.cursor.line_start();
    }

    /// Last row, column 0, with the last screenful visible.
    pub fn point_to_end_buffer(&mut self) {
        self.update_navigation_state();
        let num_rows = self.lines.num_rows();
        if num_rows <= self.view.rows {
            self.cursor.row_offset = 0;
            self.cursor.y = num_rows - 1;
        } else {
            self.cursor.row_offset = num_rows - self.view.rows;
            self.cursor.y = self.view.bottom();
        }
        self.cursor.line_start();
    }

    pub fn point_to_beginning_buffer(&mut self) {
        self.update_navigation_state();
        self.cursor.y = 0;
        self.cursor.row_offset = 0;
        self.cursor.line_start();
    }

    pub fn center_line(&mut self) {
        self.update_navigation_state();
        self.cursor.center(self.view);
    }

    /// Go to 1-based line `n`. Returns `false`, leaving point alone, when
    /// `n` is not a line of the buffer.
    pub fn jump_to_line(&mut self, n: usize) -> bool {
        self.update_navigation_state();
        let num_rows = self.lines.num_rows();
        if n < 1 || n > num_rows {
            return false;
        }
        if num_rows < self.view.rows {
            self.cursor.row_offset = 0;
            self.cursor.y = n - 1;
        } else {
            self.cursor.row_offset = n - 1;
            self.cursor.y = 0;
            self.cursor.center(self.view);
        }
        self.cursor.line_start();
        true
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buffer::LineStore;
    use crate::config::Config;
    use crate::cursor::Viewport;
    use pretty_assertions::assert_eq;

    fn state_with(lines: &[&str], rows: usize, cols: usize) -> EditorState {
        EditorState::with_lines(
            LineStore::from_lines(lines),
            Config::default(),
            Viewport::new(rows, cols),
        )
    }

    fn numbered(n: usize, rows: usize) -> EditorState {
        let lines: Vec<String> = (0..n).map(|i| format!("line {i}\n")).collect();
        EditorState::with_lines(
            LineStore::from_lines(&lines),
            Config::default(),
            Viewport::new(rows, 40),
        )
    }

    // -- Word scanning ------------------------------------------------------

    #[test]
    fn forward_word_stops_on_closing_paren() {
        assert_eq!(forward_word_target(b"foo (bar)\n", 0), 8);
    }

    #[test]
    fn forward_word_bounded_by_line_end() {
        assert_eq!(forward_word_target(b"foo\n", 0), 3);
        assert_eq!(forward_word_target(b"foo\n", 3), 3);
        assert_eq!(forward_word_target(b"a   \n", 1), 4);
        assert_eq!(forward_word_target(b"ab", 0), 2);
    }

    #[test]
    fn forward_word_from_delimiter() {
        assert_eq!(forward_word_target(b"foo bar baz\n", 3), 7);
    }

    #[test]
    fn backward_word_to_word_start() {
        assert_eq!(backward_word_target(b"foo bar\n", 7), 4);
        assert_eq!(backward_word_target(b"foo bar\n", 4), 0);
        assert_eq!(backward_word_target(b"f(x);\n", 5), 1);
    }

    #[test]
    fn backward_word_without_prior_word_stays() {
        assert_eq!(backward_word_target(b"   x\n", 3), 3);
        assert_eq!(backward_word_target(b"abc\n", 0), 0);
    }

    // -- Characters ---------------------------------------------------------

    #[test]
    fn point_forward_blocked_at_end_of_line() {
        let mut st = state_with(&["ab\n", "cd\n"], 10, 40);
        for _ in 0..5 {
            st.point_forward();
        }
        assert_eq!(st.point(), Position::new(0, 2));
    }

    #[test]
    fn point_backward_blocked_at_column_zero() {
        let mut st = state_with(&["ab\n", "cd\n"], 10, 40);
        st.goto(Position::new(1, 0));
        st.point_backward();
        assert_eq!(st.point(), Position::new(1, 0));
    }

    #[test]
    fn point_forward_scrolls_long_line() {
        let mut st = state_with(&["0123456789abcdef\n"], 10, 8);
        for _ in 0..10 {
            st.point_forward();
        }
        assert_eq!(st.point(), Position::new(0, 10));
        assert_eq!((st.cursor().x, st.cursor().col_offset), (7, 3));
    }

    #[test]
    fn forward_word_moves_point() {
        let mut st = state_with(&["foo (bar)\n"], 10, 40);
        st.forward_word();
        assert_eq!(st.point(), Position::new(0, 8));
        st.backward_word();
        assert_eq!(st.point(), Position::new(0, 4));
    }

    // -- Lines --------------------------------------------------------------

    #[test]
    fn next_line_clamps_column() {
        let mut st = state_with(&["long line\n", "ab\n", "longer line\n"], 10, 40);
        st.line_end();
        st.next_line();
        assert_eq!(st.point(), Position::new(1, 2));
        st.next_line();
        assert_eq!(st.point(), Position::new(2, 2));
    }

    #[test]
    fn next_line_stops_at_last_row() {
        let mut st = state_with(&["a\n", "b\n"], 10, 40);
        st.next_line();
        st.next_line();
        assert_eq!(st.point().row, 1);
        st.prior_line();
        st.prior_line();
        assert_eq!(st.point().row, 0);
    }

    #[test]
    fn next_line_scrolls_at_bottom() {
        let mut st = numbered(20, 5);
        for _ in 0..6 {
            st.next_line();
        }
        assert_eq!(st.point().row, 6);
        assert_eq!((st.cursor().y, st.cursor().row_offset), (4, 2));
        for _ in 0..6 {
            st.prior_line();
        }
        assert_eq!((st.cursor().y, st.cursor().row_offset), (0, 0));
    }

    #[test]
    fn line_end_on_long_line_scrolls() {
        let mut st = state_with(&["0123456789abcdef\n"], 10, 8);
        st.line_end();
        assert_eq!(st.point(), Position::new(0, 16));
        assert_eq!((st.cursor().x, st.cursor().col_offset), (7, 9));
        st.line_start();
        assert_eq!((st.cursor().x, st.cursor().col_offset), (0, 0));
    }

    #[test]
    fn motion_commits_pending_edit() {
        let mut st = state_with(&["ab\n", "cd\n"], 10, 40);
        st.self_insert(b'X').unwrap();
        st.next_line();
        assert_eq!(st.lines().line(0).text(), b"Xab\n");
        assert!(!st.lines().line(0).is_edited());
    }

    // -- Pages --------------------------------------------------------------

    #[test]
    fn page_down_goes_to_bottom_then_scrolls() {
        let mut st = numbered(100, 10);
        st.page_down();
        assert_eq!((st.cursor().y, st.cursor().row_offset), (9, 0));
        st.page_down();
        assert_eq!((st.cursor().y, st.cursor().row_offset), (0, 9));
        assert_eq!(st.point(), Position::new(9, 0));
    }

    #[test]
    fn page_down_near_end_goes_to_last_row() {
        let mut st = numbered(12, 10);
        st.goto(Position::new(5, 3));
        st.page_down();
        assert_eq!(st.point(), Position::new(11, 0));
    }

    #[test]
    fn page_up_mirrors_page_down() {
        let mut st = numbered(100, 10);
        st.goto(Position::new(50, 0));
        let offset = st.cursor().row_offset;
        st.page_up();
        assert_eq!(st.cursor().y, 0);
        assert_eq!(st.cursor().row_offset, offset);
        st.page_up();
        assert_eq!(st.cursor().y, 9);
        assert_eq!(st.cursor().row_offset, offset - 9);
    }

    #[test]
    fn page_up_near_top_goes_to_first_row() {
        let mut st = numbered(100, 10);
        st.goto(Position::new(7, 2));
        st.page_up();
        st.page_up();
        assert_eq!(st.point(), Position::ZERO);
    }

    #[test]
    fn end_and_beginning_of_buffer() {
        let mut st = numbered(100, 10);
        st.point_to_end_buffer();
        assert_eq!(st.point(), Position::new(99, 0));
        assert_eq!((st.cursor().y, st.cursor().row_offset), (9, 90));
        st.point_to_beginning_buffer();
        assert_eq!(st.point(), Position::ZERO);

        let mut short = numbered(3, 10);
        short.point_to_end_buffer();
        assert_eq!((short.cursor().y, short.cursor().row_offset), (2, 0));
    }

    #[test]
    fn center_line_never_above_top() {
        let mut st = numbered(100, 10);
        st.goto(Position::new(2, 0));
        st.center_line();
        assert_eq!(st.cursor().row_offset, 0);
        st.goto(Position::new(60, 0));
        st.center_line();
        assert_eq!((st.cursor().y, st.cursor().row_offset), (5, 55));
    }

    // -- jump_to_line -------------------------------------------------------

    #[test]
    fn jump_in_short_buffer() {
        let mut st = numbered(5, 10);
        assert!(st.jump_to_line(4));
        assert_eq!(st.point(), Position::new(3, 0));
        assert_eq!(st.cursor().row_offset, 0);
    }

    #[test]
    fn jump_in_long_buffer_centers() {
        let mut st = numbered(100, 10);
        assert!(st.jump_to_line(50));
        assert_eq!(st.point(), Position::new(49, 0));
        assert_eq!(st.cursor().row_offset, 44);
    }

    #[test]
    fn jump_out_of_range_is_ignored() {
        let mut st = numbered(5, 10);
        st.goto(Position::new(2, 1));
        assert!(!st.jump_to_line(0));
        assert!(!st.jump_to_line(6));
        assert_eq!(st.point(), Position::new(2, 1));
    }

    #[test]
    fn goto_clamps_into_buffer() {
        let mut st = state_with(&["abc\n", "de\n"], 10, 40);
        st.goto(Position::new(9, 9));
        assert_eq!(st.point(), Position::new(1, 2));
        st.assert_invariants();
    }
}
