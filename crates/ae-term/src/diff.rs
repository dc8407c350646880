// SPDX-License-Identifier: MIT
//
// Differential renderer.
//
// Compares the current FrameBuffer against the previous one and emits
// escape sequences only for rows that changed. A keystroke in the editor
// usually touches the edited row, the status line and maybe the message
// line, so most of the screen is skipped with one slice comparison per row.
//
// The whole frame is accumulated in a Vec and written with one syscall,
// wrapped in synchronized output so terminals that support it never show
// a half-drawn frame.

use std::io::{self, Write};

use crate::ansi;
use crate::buffer::{Cell, FrameBuffer, Style};

/// Statistics from a render pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RenderStats {
    /// Rows redrawn.
    pub rows_rendered: usize,
    /// Rows identical to the previous frame.
    pub rows_skipped: usize,
    /// Total bytes of output generated.
    pub bytes_written: usize,
}

/// Row-level differential renderer.
pub struct DiffRenderer {
    output: Vec<u8>,
    previous: Option<FrameBuffer>,
}

impl DiffRenderer {
    /// Create a renderer; the first render draws everything.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            output: Vec::new(),
            previous: None,
        }
    }

    /// Diff `current` against the previous frame and build the output.
    pub fn render(&mut self, current: &FrameBuffer) -> RenderStats {
        self.output.clear();
        let mut stats = RenderStats::default();

        if current.width() == 0 || current.height() == 0 {
            self.store_frame(current);
            return stats;
        }

        // Writing into a Vec cannot fail.
        let out = &mut self.output;
        out.extend_from_slice(ansi::BEGIN_SYNC);

        let full_redraw = self
            .previous
            .as_ref()
            .is_none_or(|prev| prev.width() != current.width() || prev.height() != current.height());
        if full_redraw {
            out.extend_from_slice(ansi::style(Style::Normal));
            out.extend_from_slice(ansi::CLEAR_SCREEN);
        }

        for y in 0..current.height() {
            let Some(row) = current.row(y) else { break };
            if !full_redraw
                && self
                    .previous
                    .as_ref()
                    .and_then(|prev| prev.row(y))
                    .is_some_and(|prev_row| prev_row == row)
            {
                stats.rows_skipped += 1;
                continue;
            }
            ansi::cursor_to(out, 0, y).ok();
            write_row(out, row);
            stats.rows_rendered += 1;
        }

        out.extend_from_slice(ansi::style(Style::Normal));
        out.extend_from_slice(ansi::END_SYNC);
        stats.bytes_written = self.output.len();

        self.store_frame(current);
        stats
    }

    /// The bytes produced by the last render.
    #[must_use]
    pub fn output_bytes(&self) -> &[u8] {
        &self.output
    }

    /// Write the last render to stdout and clear it.
    ///
    /// # Errors
    ///
    /// Returns an error if writing to stdout fails.
    pub fn flush(&mut self) -> io::Result<()> {
        let stdout = io::stdout();
        let mut lock = stdout.lock();
        self.flush_to(&mut lock)
    }

    /// Write the last render to `w` and clear it.
    ///
    /// # Errors
    ///
    /// Returns an error if writing to `w` fails.
    pub fn flush_to(&mut self, w: &mut impl Write) -> io::Result<()> {
        w.write_all(&self.output)?;
        w.flush()?;
        self.output.clear();
        Ok(())
    }

    /// Forget the previous frame so the next render draws everything.
    pub fn force_redraw(&mut self) {
        self.previous = None;
    }

    fn store_frame(&mut self, current: &FrameBuffer) {
        match &mut self.previous {
            Some(prev)
                if prev.width() == current.width() && prev.height() == current.height() =>
            {
                prev.copy_from(current);
            }
            _ => self.previous = Some(current.clone()),
        }
    }
}

impl Default for DiffRenderer {
    fn default() -> Self {
        Self::new()
    }
}

/// Emit one row, switching attributes only where the style changes.
fn write_row(out: &mut Vec<u8>, row: &[Cell]) {
    let mut current = None;
    for cell in row {
        if current != Some(cell.style) {
            out.extend_from_slice(ansi::style(cell.style));
            current = Some(cell.style);
        }
        out.push(cell.byte);
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
