// SPDX-License-Identifier: MIT
//
// ae-term: terminal layer for the ae editor.
//
// Raw mode through termios, key decoding for the legacy xterm encodings,
// a byte-cell frame buffer, and a row-level differential renderer. No
// TUI framework in between: the editor only needs a handful of escape
// sequences and this crate sends exactly those.

pub mod ansi;
pub mod buffer;
pub mod diff;
pub mod event_loop;
pub mod input;
pub mod reader;
pub mod terminal;
