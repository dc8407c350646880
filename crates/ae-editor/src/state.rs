//! The editor state: one buffer, its point and mark, and the pending edit.
//!
//! Every editing, motion and region operation is a method on
//! [`EditorState`], split across the `edit`, `motion`, `search` and `region`
//! modules. This module holds the struct itself plus the file-level
//! operations (open, save, kill buffer) and what the renderer reads.

use std::borrow::Cow;
use std::fmt;
use std::io;
use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::buffer::{self, LineStore};
use crate::config::Config;
use crate::cursor::{Cursor, Viewport};
use crate::error::{EditError, Result};
use crate::gap::{self, EditAccumulator};
use crate::position::Position;
use crate::search::SearchState;

/// File name used when saving a buffer that never had one.
pub const DEFAULT_FILENAME: &str = "newfile.txt";

// ---------------------------------------------------------------------------
// BufferStatus
// ---------------------------------------------------------------------------

/// Shown in the status line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BufferStatus {
    /// Matches the file on disk.
    #[default]
    Original,
    Modified,
    /// The file's permissions forbid writing; edits are refused.
    ReadOnly,
}

impl fmt::Display for BufferStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Original => "ORIGINAL",
            Self::Modified => "MODIFIED",
            Self::ReadOnly => "READONLY",
        })
    }
}

// ---------------------------------------------------------------------------
// EditorState
// ---------------------------------------------------------------------------

pub struct EditorState {
    pub(crate) lines: LineStore,
    pub(crate) acc: EditAccumulator,
    pub(crate) cursor: Cursor,
    pub(crate) view: Viewport,
    /// Row holding the pending edit, if any.
    pub(crate) editing_row: Option<usize>,
    pub(crate) status: BufferStatus,
    pub(crate) filename: Option<PathBuf>,
    pub(crate) message: Option<String>,
    pub(crate) search: SearchState,
    pub(crate) config: Config,
}

impl EditorState {
    // -- Construction -------------------------------------------------------

    /// An unnamed buffer holding one empty line.
    #[must_use]
    pub fn new(config: Config, view: Viewport) -> Self {
        Self::with_lines(LineStore::new(), config, view)
    }

    #[must_use]
    pub fn with_lines(lines: LineStore, config: Config, view: Viewport) -> Self {
        Self {
            lines,
            acc: EditAccumulator::new(config.edit_capacity),
            cursor: Cursor::default(),
            view,
            editing_row: None,
            status: BufferStatus::Original,
            filename: None,
            message: None,
            search: SearchState::default(),
            config,
        }
    }

    // -- Accessors ----------------------------------------------------------

    #[inline]
    #[must_use]
    pub const fn lines(&self) -> &LineStore {
        &self.lines
    }

    #[inline]
    #[must_use]
    pub const fn cursor(&self) -> &Cursor {
        &self.cursor
    }

    /// Absolute position of point.
    #[inline]
    #[must_use]
    pub const fn point(&self) -> Position {
        self.cursor.position()
    }

    #[inline]
    #[must_use]
    pub const fn viewport(&self) -> Viewport {
        self.view
    }

    #[inline]
    #[must_use]
    pub const fn status(&self) -> BufferStatus {
        self.status
    }

    #[inline]
    #[must_use]
    pub fn is_modified(&self) -> bool {
        self.status == BufferStatus::Modified
    }

    #[inline]
    #[must_use]
    pub fn filename(&self) -> Option<&Path> {
        self.filename.as_deref()
    }

    /// The file name for the status line.
    #[must_use]
    pub fn display_name(&self) -> String {
        self.filename
            .as_ref()
            .map_or_else(|| DEFAULT_FILENAME.to_string(), |p| p.display().to_string())
    }

    #[inline]
    #[must_use]
    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    pub fn set_message(&mut self, message: impl Into<String>) {
        self.message = Some(message.into());
    }

    #[inline]
    #[must_use]
    pub const fn config(&self) -> &Config {
        &self.config
    }

    #[inline]
    #[must_use]
    pub const fn search_state(&self) -> &SearchState {
        &self.search
    }

    /// The text area changed size. Point stays on screen.
    pub fn set_viewport(&mut self, view: Viewport) {
        let pos = self.cursor.position();
        self.view = view;
        self.cursor.reveal(pos, view);
    }

    /// Row `row` as it should be drawn: pending edits composed in.
    #[must_use]
    pub fn display_line(&self, row: usize) -> Cow<'_, [u8]> {
        let line = self.lines.line(row);
        if self.editing_row == Some(row) && line.is_edited() {
            Cow::Owned(gap::compose(line.text(), line.gap(), self.acc.as_bytes()))
        } else {
            Cow::Borrowed(line.text())
        }
    }

    // -- Status -------------------------------------------------------------

    pub(crate) fn mark_modified(&mut self) {
        if self.status != BufferStatus::ReadOnly {
            self.status = BufferStatus::Modified;
        }
    }

    /// # Errors
    ///
    /// [`EditError::ReadOnly`] for a read-only buffer.
    pub(crate) fn ensure_writable(&self) -> Result<()> {
        if self.status == BufferStatus::ReadOnly {
            warn!("edit refused: buffer is read-only");
            return Err(EditError::ReadOnly);
        }
        Ok(())
    }

    // -- Files --------------------------------------------------------------

    /// Replace the buffer with the contents of `path`.
    ///
    /// A file that cannot be read is not an error: the buffer starts empty,
    /// keeps the name, and the minibuffer says why. A directory is refused
    /// and the current buffer stays.
    pub fn open(&mut self, path: &Path) {
        self.update_navigation_state();
        if path.is_dir() {
            warn!(path = %path.display(), "refusing to open a directory");
            self.set_message(format!("{} is a directory", path.display()));
            return;
        }
        let (lines, status) = match LineStore::load(path, self.config.tab_width) {
            Ok(lines) if buffer::is_read_only(path) => (lines, BufferStatus::ReadOnly),
            Ok(lines) => (lines, BufferStatus::Original),
            Err(EditError::Read { source, .. }) if source.kind() == io::ErrorKind::NotFound => {
                info!(path = %path.display(), "new file");
                self.set_message("Filename doesn't exist. Creating buffer for new file.");
                (LineStore::new(), BufferStatus::Original)
            }
            Err(err) => {
                warn!(error = %err, "open failed");
                self.set_message(err.to_string());
                (LineStore::new(), BufferStatus::Original)
            }
        };
        self.reset(lines);
        self.status = status;
        self.filename = Some(path.to_path_buf());
    }

    /// Write the buffer to its file, or to `newfile.txt` if it has none.
    ///
    /// # Errors
    ///
    /// [`EditError::ReadOnly`] for a read-only buffer, [`EditError::Write`]
    /// when the write fails.
    pub fn save(&mut self) -> Result<usize> {
        self.ensure_writable()?;
        let path = self
            .filename
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_FILENAME));
        self.save_as(&path)
    }

    /// Write the buffer to `path` and make it the buffer's file.
    ///
    /// # Errors
    ///
    /// [`EditError::Write`] when the write fails.
    pub fn save_as(&mut self, path: &Path) -> Result<usize> {
        self.update_line();
        let rows = self.lines.save(path)?;
        self.filename = Some(path.to_path_buf());
        self.status = BufferStatus::Original;
        self.set_message(format!("Wrote {rows} lines to {}", path.display()));
        Ok(rows)
    }

    /// Throw the buffer away and start an unnamed empty one.
    pub fn kill_buffer(&mut self) {
        self.reset(LineStore::new());
        self.status = BufferStatus::Original;
        self.filename = None;
    }

    fn reset(&mut self, lines: LineStore) {
        self.lines = lines;
        self.acc.clear();
        self.editing_row = None;
        self.cursor = Cursor::default();
    }

    /// Panics unless the buffer invariants hold.
    #[cfg(test)]
    pub(crate) fn assert_invariants(&self) {
        assert!(self.lines.num_rows() >= 1, "buffer has no rows");
        for (row, line) in self.lines.iter().enumerate() {
            let gap = line.gap();
            assert!(line.len() >= 1, "row {row} is empty");
            assert!(gap.left() <= gap.right(), "row {row}: {gap:?}");
            assert!(
                gap.right() <= line.content_len(),
                "row {row}: {gap:?} swallows the newline"
            );
            if line.is_edited() {
                assert_eq!(self.editing_row, Some(row), "row {row} edited out of turn");
            }
        }
        if self.editing_row.is_none() {
            assert!(self.acc.is_empty(), "pending bytes with no edited row");
        }
        let point = self.point();
        assert!(point.row < self.lines.num_rows(), "point {point:?} past end");
        let shown = self.display_line(point.row);
        let width = shown.strip_suffix(b"\n").unwrap_or(&shown[..]).len();
        assert!(point.col <= width, "point {point:?} past column {width}");
    }
}

impl fmt::Debug for EditorState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EditorState")
            .field("lines", &self.lines)
            .field("point", &self.point())
            .field("mark", &self.cursor.mark())
            .field("status", &self.status)
            .field("filename", &self.filename)
            .finish_non_exhaustive()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
