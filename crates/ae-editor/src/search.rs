//! Literal substring search over committed line text.
//!
//! Forward search starts just past point and runs to the end of the buffer;
//! backward search takes the last match before point and runs to the top.
//! Neither wraps.
//!
//! # Repeating
//!
//! `C-s` prompts for a pattern. Once a forward search has been submitted,
//! pressing `C-s` again repeats it without prompting, and likewise for
//! `C-r`. Switching direction prompts again (an empty answer reuses the
//! last pattern). `C-g` ends the repeat.

use tracing::debug;

use crate::position::Position;
use crate::state::EditorState;

// ---------------------------------------------------------------------------
// Direction
// ---------------------------------------------------------------------------

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum SearchDirection {
    Forward,
    Backward,
}

// ---------------------------------------------------------------------------
// SearchState
// ---------------------------------------------------------------------------

/// The last pattern and whether the search keys currently repeat it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchState {
    last: Option<String>,
    repeating: Option<SearchDirection>,
}

impl SearchState {
    #[must_use]
    pub fn last_pattern(&self) -> Option<&str> {
        self.last.as_deref()
    }

    /// True when a search key in `direction` should repeat without a prompt.
    #[must_use]
    pub fn is_repeating(&self, direction: SearchDirection) -> bool {
        self.repeating == Some(direction) && self.last.is_some()
    }

    pub fn remember(&mut self, pattern: &str, direction: SearchDirection) {
        self.last = Some(pattern.to_string());
        self.repeating = Some(direction);
    }

    /// Stop repeating. The pattern is kept for the next prompt.
    pub const fn cancel(&mut self) {
        self.repeating = None;
    }
}

// ---------------------------------------------------------------------------
// Byte search
// ---------------------------------------------------------------------------

/// Offset of the first occurrence of `needle` in `hay`.
#[must_use]
pub fn find(hay: &[u8], needle: &[u8]) -> Option<usize> {
    if needle.is_empty() || needle.len() > hay.len() {
        return None;
    }
    hay.windows(needle.len()).position(|w| w == needle)
}

/// Offset of the last occurrence of `needle` in `hay`.
#[must_use]
pub fn rfind(hay: &[u8], needle: &[u8]) -> Option<usize> {
    if needle.is_empty() || needle.len() > hay.len() {
        return None;
    }
    hay.windows(needle.len()).rposition(|w| w == needle)
}

// ---------------------------------------------------------------------------
// Editor operations
// ---------------------------------------------------------------------------

impl EditorState {
    /// Move point to the next match after it. On failure point stays and
    /// the minibuffer says so.
    pub fn search_forward(&mut self, pattern: &str) -> bool {
        self.update_navigation_state();
        let needle = pattern.as_bytes();
        let point = self.cursor.position();

        let mut found = None;
        let text = self.lines.line(point.row).text();
        let from = point.col + 1;
        if from <= text.len() {
            found = find(&text[from..], needle).map(|i| Position::new(point.row, from + i));
        }
        if found.is_none() {
            found = (point.row + 1..self.lines.num_rows()).find_map(|row| {
                find(self.lines.line(row).text(), needle).map(|col| Position::new(row, col))
            });
        }
        self.finish_search(pattern, found)
    }

    /// Move point to the last match before it.
    pub fn search_backward(&mut self, pattern: &str) -> bool {
        self.update_navigation_state();
        let needle = pattern.as_bytes();
        let point = self.cursor.position();

        let text = self.lines.line(point.row).text();
        let mut found =
            rfind(&text[..point.col.min(text.len())], needle).map(|col| Position::new(point.row, col));
        if found.is_none() {
            found = (0..point.row).rev().find_map(|row| {
                rfind(self.lines.line(row).text(), needle).map(|col| Position::new(row, col))
            });
        }
        self.finish_search(pattern, found)
    }

    fn finish_search(&mut self, pattern: &str, found: Option<Position>) -> bool {
        if let Some(pos) = found {
            debug!(pattern, ?pos, "search hit");
            self.cursor.goto(pos, self.view);
            true
        } else {
            self.set_message(format!("Search failed: {pattern}"));
            false
        }
    }

    /// Run a search key. Returns `false` when the user has to be asked for a
    /// pattern first.
    pub fn repeat_search(&mut self, direction: SearchDirection) -> bool {
        if !self.search.is_repeating(direction) {
            return false;
        }
        if let Some(pattern) = self.search.last.clone() {
            self.search_in(direction, &pattern);
        }
        true
    }

    /// Search for a pattern typed at the prompt. An empty answer reuses the
    /// last pattern; with no last pattern nothing happens.
    pub fn submit_search(&mut self, direction: SearchDirection, input: &str) -> bool {
        let pattern = if input.is_empty() {
            match self.search.last.clone() {
                Some(last) => last,
                None => return false,
            }
        } else {
            input.to_string()
        };
        self.search.remember(&pattern, direction);
        self.search_in(direction, &pattern)
    }

    fn search_in(&mut self, direction: SearchDirection, pattern: &str) -> bool {
        match direction {
            SearchDirection::Forward => self.search_forward(pattern),
            SearchDirection::Backward => self.search_backward(pattern),
        }
    }

    /// Keyboard quit: drop the mark and stop repeating searches.
    pub fn cancel(&mut self) {
        self.update_navigation_state();
        self.cursor.clear_mark();
        self.search.cancel();
        self.set_message("Quit");
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

    fn state_with(lines: &[&str]) -> EditorState {
        EditorState::with_lines(
            LineStore::from_lines(lines),
            Config::default(),
            Viewport::new(10, 40),
        )
    }

    // -- Byte search --------------------------------------------------------

    #[test]
    fn find_and_rfind() {
        assert_eq!(find(b"abcabc", b"bc"), Some(1));
        assert_eq!(rfind(b"abcabc", b"bc"), Some(4));
        assert_eq!(find(b"abc", b"abcd"), None);
        assert_eq!(find(b"abc", b""), None);
    }

    // -- Forward ------------------------------------------------------------

    #[test]
    fn forward_skips_match_under_point() {
        let mut st = state_with(&["foo foo\n", "foo\n"]);
        assert!(st.search_forward("foo"));
        assert_eq!(st.point(), Position::new(0, 4));
        assert!(st.search_forward("foo"));
        assert_eq!(st.point(), Position::new(1, 0));
    }

    #[test]
    fn forward_does_not_wrap() {
        let mut st = state_with(&["needle\n", "hay\n"]);
        st.goto(Position::new(1, 0));
        assert!(!st.search_forward("needle"));
        assert_eq!(st.point(), Position::new(1, 0));
        assert_eq!(st.message(), Some("Search failed: needle"));
    }

    #[test]
    fn forward_scrolls_to_far_match() {
        let mut lines: Vec<String> = (0..100).map(|_| "x\n".to_string()).collect();
        lines[80] = "target\n".to_string();
        let mut st = EditorState::with_lines(
            LineStore::from_lines(&lines),
            Config::default(),
            Viewport::new(10, 40),
        );
        assert!(st.search_forward("target"));
        assert_eq!(st.point(), Position::new(80, 0));
        assert_eq!(st.cursor().row_offset, 75);
    }

    // -- Backward -----------------------------------------------------------

    #[test]
    fn backward_finds_last_match_before_point() {
        let mut st = state_with(&["ab ab\n", "ab ab ab\n"]);
        st.goto(Position::new(1, 6));
        assert!(st.search_backward("ab"));
        assert_eq!(st.point(), Position::new(1, 3));
        assert!(st.search_backward("ab"));
        assert!(st.search_backward("ab"));
        assert_eq!(st.point(), Position::new(0, 3));
    }

    #[test]
    fn backward_ignores_text_after_point() {
        let mut st = state_with(&["x needle\n"]);
        st.goto(Position::new(0, 2));
        assert!(!st.search_backward("needle"));
        assert_eq!(st.point(), Position::new(0, 2));
    }

    // -- Repeat -------------------------------------------------------------

    #[test]
    fn repeat_needs_a_submitted_pattern() {
        let mut st = state_with(&["a b a b\n"]);
        assert!(!st.repeat_search(SearchDirection::Forward));
        assert!(st.submit_search(SearchDirection::Forward, "b"));
        assert_eq!(st.point(), Position::new(0, 2));
        assert!(st.repeat_search(SearchDirection::Forward));
        assert_eq!(st.point(), Position::new(0, 6));
        // Other direction asks again.
        assert!(!st.repeat_search(SearchDirection::Backward));
    }

    #[test]
    fn empty_input_reuses_last_pattern() {
        let mut st = state_with(&["a b a b\n"]);
        assert!(!st.submit_search(SearchDirection::Forward, ""));
        st.submit_search(SearchDirection::Forward, "b");
        st.line_end();
        assert!(st.submit_search(SearchDirection::Backward, ""));
        assert_eq!(st.point(), Position::new(0, 6));
        assert_eq!(st.search_state().last_pattern(), Some("b"));
    }

    #[test]
    fn cancel_stops_repeating_and_clears_mark() {
        let mut st = state_with(&["a b\n"]);
        st.set_mark();
        st.submit_search(SearchDirection::Forward, "b");
        st.cancel();
        assert!(!st.search_state().is_repeating(SearchDirection::Forward));
        assert!(!st.cursor().region_active());
        assert_eq!(st.search_state().last_pattern(), Some("b"));
    }
}
