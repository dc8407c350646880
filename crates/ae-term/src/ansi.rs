// SPDX-License-Identifier: MIT
//
// The escape sequences ae sends, and nothing else.
//
// Fixed sequences are byte constants the caller writes directly; only
// cursor placement is formatted. Coordinates are 0-indexed here and
// 1-indexed on the wire.

use std::io::{self, Write};

use crate::buffer::Style;

pub const HIDE_CURSOR: &[u8] = b"\x1b[?25l";
pub const SHOW_CURSOR: &[u8] = b"\x1b[?25h";
pub const CLEAR_SCREEN: &[u8] = b"\x1b[2J";

/// DEC mode 2026. Terminals without it ignore both.
pub const BEGIN_SYNC: &[u8] = b"\x1b[?2026h";
pub const END_SYNC: &[u8] = b"\x1b[?2026l";

/// Alternate screen, hidden cursor, blank page.
pub const ENTER_SCREEN: &[u8] = b"\x1b[?1049h\x1b[?25l\x1b[2J";

/// Undo everything a frame or [`ENTER_SCREEN`] may have left behind. The
/// alternate screen goes last so the shell reappears clean. Also written
/// raw from the panic hook.
pub const LEAVE_SCREEN: &[u8] = b"\x1b[?2026l\x1b[0m\x1b[?25h\x1b[?1049l";

/// CUP: move to column `x`, row `y`.
#[inline]
pub fn cursor_to(w: &mut impl Write, x: u16, y: u16) -> io::Result<()> {
    write!(w, "\x1b[{};{}H", u32::from(y) + 1, u32::from(x) + 1)
}

/// SGR switching to `s` from whatever attributes were on.
#[must_use]
pub const fn style(s: Style) -> &'static [u8] {
    match s {
        Style::Normal => b"\x1b[0m",
        Style::Highlight => b"\x1b[0;37;44m",
        Style::Inverse => b"\x1b[0;7m",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cup(x: u16, y: u16) -> String {
        let mut buf = Vec::new();
        cursor_to(&mut buf, x, y).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn cursor_to_is_one_based_row_first() {
        assert_eq!(cup(0, 0), "\x1b[1;1H");
        assert_eq!(cup(10, 20), "\x1b[21;11H");
    }

    #[test]
    fn cursor_to_max_coordinates() {
        assert_eq!(cup(u16::MAX, u16::MAX), "\x1b[65536;65536H");
    }

    #[test]
    fn every_style_starts_from_reset() {
        for s in [Style::Normal, Style::Highlight, Style::Inverse] {
            assert!(style(s).starts_with(b"\x1b[0"), "{s:?}");
        }
    }

    #[test]
    fn leave_undoes_enter() {
        let leave = std::str::from_utf8(LEAVE_SCREEN).unwrap();
        assert!(leave.ends_with("\x1b[?1049l"));
        assert!(leave.contains(std::str::from_utf8(SHOW_CURSOR).unwrap()));
        assert!(leave.contains(std::str::from_utf8(END_SYNC).unwrap()));
        assert!(ENTER_SCREEN.starts_with(b"\x1b[?1049h"));
        assert!(ENTER_SCREEN.ends_with(CLEAR_SCREEN));
    }
}
