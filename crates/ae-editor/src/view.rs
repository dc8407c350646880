//! Painting editor state into an [`ae_term`] framebuffer.
//!
//! The screen is split into three bands:
//!
//! ```text
//! ┌────────────────────────────────────────┐
//! │ text rows (viewport)                   │
//! │ ~                                      │
//! ├────────────────────────────────────────┤
//! │--[ notes.txt ]----(MODIFIED)---- Row…  │  status line, inverse video
//! │Search: foo                             │  minibuffer
//! └────────────────────────────────────────┘
//! ```
//!
//! Painting is stateless: every call redraws the whole frame from
//! [`EditorState`], and the terminal's diff renderer sends only what changed.
//! Scroll state lives in the cursor, so the view never adjusts it.

use ae_term::buffer::{FrameBuffer, Style};

use crate::minibuffer::Prompt;
use crate::position::Position;
use crate::state::EditorState;

/// Screen rows below the text area: status line and minibuffer.
pub const CHROME_ROWS: u16 = 2;

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

/// Paint the whole frame. Returns where the hardware cursor belongs.
///
/// `prompt` is the minibuffer prompt in progress, if any; otherwise the
/// minibuffer shows `pending_prefix` (an unfinished key sequence) or the
/// state's message.
pub fn paint(
    state: &EditorState,
    frame: &mut FrameBuffer,
    prompt: Option<&Prompt>,
    pending_prefix: Option<&str>,
) -> Option<(u16, u16)> {
    let height = frame.height();
    if height == 0 || frame.width() == 0 {
        return None;
    }
    let text_rows = height.saturating_sub(CHROME_ROWS);

    for y in 0..text_rows {
        paint_text_row(state, frame, y);
    }
    if height >= CHROME_ROWS {
        paint_status_line(state, frame, height - CHROME_ROWS);
    }

    let mb_y = height - 1;
    let prompt_end = paint_minibuffer(state, frame, mb_y, prompt, pending_prefix);
    if prompt.is_some() {
        return Some((prompt_end, mb_y));
    }

    let cursor = state.cursor();
    let x = u16::try_from(cursor.x).ok()?;
    let y = u16::try_from(cursor.y).ok()?;
    (y < text_rows && x < frame.width()).then_some((x, y))
}

// ---------------------------------------------------------------------------
// Bands
// ---------------------------------------------------------------------------

fn paint_text_row(state: &EditorState, frame: &mut FrameBuffer, y: u16) {
    let cursor = state.cursor();
    let row = cursor.row_offset + usize::from(y);

    if row >= state.lines().num_rows() {
        let x = frame.put_bytes(0, y, b"~", Style::Normal);
        frame.fill_row(x, y, Style::Normal);
        return;
    }

    let line = state.display_line(row);
    let content = line.strip_suffix(b"\n").unwrap_or(&line[..]);
    let visible = content.get(cursor.col_offset..).unwrap_or_default();

    let mut x: u16 = 0;
    for (i, &byte) in visible.iter().enumerate() {
        if x >= frame.width() {
            break;
        }
        let pos = Position::new(row, cursor.col_offset + i);
        let style = if state.in_region(pos) {
            Style::Highlight
        } else {
            Style::Normal
        };
        x = frame.put_bytes(x, y, &[byte], style);
    }
    frame.fill_row(x, y, Style::Normal);
}

fn paint_status_line(state: &EditorState, frame: &mut FrameBuffer, y: u16) {
    let frame_width = usize::from(frame.width());
    let mut line = status_text(state);
    if line.len() < frame_width {
        line.push_str(&"-".repeat(frame_width - line.len()));
    }
    frame.put_bytes(0, y, line.as_bytes(), Style::Inverse);
}

/// Returns the column just past the prompt input.
fn paint_minibuffer(
    state: &EditorState,
    frame: &mut FrameBuffer,
    y: u16,
    prompt: Option<&Prompt>,
    pending_prefix: Option<&str>,
) -> u16 {
    let x = match (prompt, pending_prefix) {
        (Some(p), _) => {
            let x = frame.put_bytes(0, y, p.message().as_bytes(), Style::Normal);
            frame.put_bytes(x, y, p.input().as_bytes(), Style::Normal)
        }
        (None, Some(prefix)) => frame.put_bytes(0, y, prefix.as_bytes(), Style::Normal),
        (None, None) => {
            let msg = state.message().unwrap_or_default();
            frame.put_bytes(0, y, msg.as_bytes(), Style::Normal)
        }
    };
    frame.fill_row(x, y, Style::Normal);
    x.min(frame.width().saturating_sub(1))
}

/// `--[ name ]----(STATUS)---- Row r of n ---- Col c of m ----`, unpadded.
#[must_use]
pub fn status_text(state: &EditorState) -> String {
    let point = state.point();
    let line_len = state.display_line(point.row).len();
    format!(
        "--[ {} ]----({})---- Row {} of {} ---- Col {} of {} ----",
        state.display_name(),
        state.status(),
        point.row + 1,
        state.lines().num_rows(),
        point.col + 1,
        line_len,
    )
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
