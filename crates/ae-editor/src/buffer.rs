//! Line store: the buffer as an ordered vector of owned lines.
//!
//! Each [`Line`] owns its bytes, newline included, plus the state of the
//! pending edit gap (see [`crate::gap`]). Inserting or deleting a line shifts
//! the rows after it, which is plenty for one interactively edited file.
//!
//! # Invariants
//!
//! - There is always at least one line. An empty file is a single `"\n"`.
//! - A line is never zero bytes long. Text that would become empty is
//!   stored as `"\n"`.
//! - Every line ends in `\n` except possibly the last one.
//!
//! Tabs are expanded into spaces on load. The expansion is not reversed on
//! save.

use std::fmt;
use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::Path;

use tracing::{debug, info};

use crate::error::{EditError, Result};
use crate::gap::Gap;

/// Rows reserved up front for a new line store.
pub const INITIAL_ROWS: usize = 512;

/// Default width of an expanded tab.
pub const DEFAULT_TAB_WIDTH: usize = 8;

// ---------------------------------------------------------------------------
// Line
// ---------------------------------------------------------------------------

/// One physical text line and its edit gap.
#[derive(Clone, PartialEq, Eq)]
pub struct Line {
    text: Vec<u8>,
    gap: Gap,
    edited: bool,
}

impl Line {
    /// A clean line holding `text`. Empty text becomes `"\n"`.
    #[must_use]
    pub fn new(text: Vec<u8>) -> Self {
        let text = if text.is_empty() { b"\n".to_vec() } else { text };
        Self {
            text,
            gap: Gap::default(),
            edited: false,
        }
    }

    /// A line holding only a newline.
    #[must_use]
    pub fn empty() -> Self {
        Self::new(Vec::new())
    }

    /// Committed bytes, newline included. Pending edits are not applied.
    #[inline]
    #[must_use]
    pub fn text(&self) -> &[u8] {
        &self.text
    }

    /// Byte count including the trailing newline.
    #[inline]
    #[must_use]
    #[allow(clippy::len_without_is_empty)] // a line is never empty
    pub fn len(&self) -> usize {
        self.text.len()
    }

    #[inline]
    #[must_use]
    pub fn has_newline(&self) -> bool {
        self.text.last() == Some(&b'\n')
    }

    /// Byte count without the trailing newline.
    #[inline]
    #[must_use]
    pub fn content_len(&self) -> usize {
        if self.has_newline() {
            self.text.len() - 1
        } else {
            self.text.len()
        }
    }

    /// The rightmost column point may occupy: the newline, or one past the
    /// last byte of an unterminated final line.
    #[inline]
    #[must_use]
    pub fn end_col(&self) -> usize {
        self.content_len()
    }

    /// True for a line with no content before its newline.
    #[inline]
    #[must_use]
    pub fn is_blank(&self) -> bool {
        self.content_len() == 0
    }

    /// Count of leading spaces.
    #[must_use]
    pub fn indent(&self) -> usize {
        self.text.iter().take_while(|&&b| b == b' ').count()
    }

    #[inline]
    #[must_use]
    pub const fn gap(&self) -> Gap {
        self.gap
    }

    /// True while a pending edit targets this line.
    #[inline]
    #[must_use]
    pub const fn is_edited(&self) -> bool {
        self.edited
    }

    /// Enter the editing state with a zero-width gap at `col`.
    pub(crate) fn open_gap(&mut self, col: usize) {
        debug_assert!(col <= self.text.len());
        self.gap = Gap::at(col);
        self.edited = true;
    }

    pub(crate) const fn gap_mut(&mut self) -> &mut Gap {
        &mut self.gap
    }

    fn replace(&mut self, text: Vec<u8>) {
        *self = Self::new(text);
    }
}

impl fmt::Debug for Line {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut s = f.debug_struct("Line");
        s.field("text", &String::from_utf8_lossy(&self.text));
        if self.edited {
            s.field("gap", &self.gap);
        }
        s.finish()
    }
}

// ---------------------------------------------------------------------------
// LineStore
// ---------------------------------------------------------------------------

/// The buffer's lines, indexed `0..num_rows()`.
///
/// Row and column arguments must be in range. Out-of-range indexing panics
/// through the slice bounds check.
#[derive(Clone, PartialEq, Eq)]
pub struct LineStore {
    lines: Vec<Line>,
}

impl LineStore {
    // -- Construction -------------------------------------------------------

    /// A buffer holding one empty line.
    #[must_use]
    pub fn new() -> Self {
        let mut lines = Vec::with_capacity(INITIAL_ROWS);
        lines.push(Line::empty());
        Self { lines }
    }

    /// Split raw file bytes into lines, expanding tabs.
    #[must_use]
    pub fn from_bytes(bytes: &[u8], tab_width: usize) -> Self {
        let mut lines = Vec::with_capacity(INITIAL_ROWS.max(bytes.len() / 32));
        for raw in bytes.split_inclusive(|&b| b == b'\n') {
            lines.push(Line::new(expand_tabs(raw, tab_width)));
        }
        if lines.is_empty() {
            lines.push(Line::empty());
        }
        Self { lines }
    }

    /// Build from string lines, mostly for tests.
    #[must_use]
    pub fn from_lines<S: AsRef<[u8]>>(lines: &[S]) -> Self {
        let mut store = Self {
            lines: lines.iter().map(|l| Line::new(l.as_ref().to_vec())).collect(),
        };
        if store.lines.is_empty() {
            store.lines.push(Line::empty());
        }
        store
    }

    /// Read `path` into lines.
    ///
    /// # Errors
    ///
    /// [`EditError::Read`] when the file cannot be read. Callers decide
    /// whether a missing file means a fresh buffer.
    pub fn load(path: &Path, tab_width: usize) -> Result<Self> {
        let bytes = fs::read(path).map_err(|source| EditError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let store = Self::from_bytes(&bytes, tab_width);
        info!(path = %path.display(), rows = store.num_rows(), "loaded");
        Ok(store)
    }

    /// Write every line in order. Returns the number of lines written.
    ///
    /// Pending edits are not part of the committed text; commit first.
    ///
    /// # Errors
    ///
    /// [`EditError::Write`] when the file cannot be created or written.
    pub fn save(&self, path: &Path) -> Result<usize> {
        let write = || -> io::Result<()> {
            let mut out = BufWriter::new(File::create(path)?);
            for line in &self.lines {
                out.write_all(line.text())?;
            }
            out.flush()
        };
        write().map_err(|source| EditError::Write {
            path: path.to_path_buf(),
            source,
        })?;
        info!(path = %path.display(), rows = self.num_rows(), "saved");
        Ok(self.num_rows())
    }

    // -- Access -------------------------------------------------------------

    #[inline]
    #[must_use]
    pub fn num_rows(&self) -> usize {
        self.lines.len()
    }

    #[inline]
    #[must_use]
    pub fn line(&self, row: usize) -> &Line {
        &self.lines[row]
    }

    #[inline]
    pub(crate) fn line_mut(&mut self, row: usize) -> &mut Line {
        &mut self.lines[row]
    }

    /// Byte length of `row`, newline included.
    #[inline]
    #[must_use]
    pub fn line_len(&self, row: usize) -> usize {
        self.lines[row].len()
    }

    #[inline]
    #[must_use]
    pub fn char_at(&self, row: usize, col: usize) -> u8 {
        self.lines[row].text[col]
    }

    #[inline]
    pub fn set_char(&mut self, row: usize, col: usize, byte: u8) {
        self.lines[row].text[col] = byte;
    }

    pub fn iter(&self) -> impl Iterator<Item = &Line> {
        self.lines.iter()
    }

    /// All committed bytes, as they would be saved.
    #[must_use]
    pub fn to_bytes(&self) -> Vec<u8> {
        self.lines.iter().flat_map(|l| l.text.iter().copied()).collect()
    }

    // -- Line mutation ------------------------------------------------------

    /// Swap a line's bytes. The gap resets and the line becomes clean.
    pub fn replace_line_text(&mut self, row: usize, text: Vec<u8>) {
        self.lines[row].replace(text);
    }

    /// Break `row` at `col`: `row` keeps `text[..col]` plus a newline and
    /// the rest becomes a new line right after it.
    pub fn split_line(&mut self, row: usize, col: usize) {
        let line = &mut self.lines[row];
        let tail = line.text.split_off(col);
        line.text.push(b'\n');
        line.gap = Gap::default();
        line.edited = false;
        self.lines.insert(row + 1, Line::new(tail));
        debug!(row, col, "split line");
    }

    /// Remove `row`. Refused, returning `false`, when it is the only line.
    pub fn delete_line(&mut self, row: usize) -> bool {
        if self.lines.len() <= 1 {
            return false;
        }
        self.lines.remove(row);
        true
    }

    /// Append `row` onto the line above it and remove `row`.
    ///
    /// Returns the column where the two joined, or `None` for row 0.
    pub fn merge_with_previous(&mut self, row: usize) -> Option<usize> {
        if row == 0 || row >= self.lines.len() {
            return None;
        }
        let tail = self.lines.remove(row);
        let prev = &mut self.lines[row - 1];
        let join = prev.content_len();
        let mut text = Vec::with_capacity(join + tail.len());
        text.extend_from_slice(&prev.text[..join]);
        text.extend_from_slice(&tail.text);
        prev.replace(text);
        debug!(row, join, "merged line");
        Some(join)
    }

    /// Drop everything from `col` to the end of the line's content. The
    /// newline, if any, stays.
    pub fn truncate_at(&mut self, row: usize, col: usize) {
        let line = &self.lines[row];
        let mut text = line.text[..col.min(line.content_len())].to_vec();
        if line.has_newline() {
            text.push(b'\n');
        }
        self.lines[row].replace(text);
    }
}

impl Default for LineStore {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for LineStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LineStore")
            .field("rows", &self.num_rows())
            .field("bytes", &self.lines.iter().map(Line::len).sum::<usize>())
            .finish_non_exhaustive()
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Replace every horizontal tab with `width` spaces.
#[must_use]
pub fn expand_tabs(raw: &[u8], width: usize) -> Vec<u8> {
    let tabs = raw.iter().filter(|&&b| b == b'\t').count();
    let mut out = Vec::with_capacity(raw.len() + tabs * width.saturating_sub(1));
    for &b in raw {
        if b == b'\t' {
            out.extend(std::iter::repeat_n(b' ', width));
        } else {
            out.push(b);
        }
    }
    out
}

/// True when `path` exists and its permissions forbid writing.
#[must_use]
pub fn is_read_only(path: &Path) -> bool {
    fs::metadata(path).is_ok_and(|m| m.permissions().readonly())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
