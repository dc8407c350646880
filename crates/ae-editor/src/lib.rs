//! # ae-editor: editing core for the `ae` text editor
//!
//! A buffer is a vector of byte lines. Edits go through a per-line gap: the
//! row being edited has a span marked for replacement and a small
//! accumulator of typed bytes, and nothing is rewritten until the editor
//! commits the line (on leaving it or starting an edit elsewhere).
//!
//! - **[`position`]**: `Position` (row, col) and `Range`, 0-indexed
//! - **[`gap`]**: the per-line gap and the edit accumulator
//! - **[`buffer`]**: `Line` and `LineStore`, file load and save
//! - **[`cursor`]**: point, scroll offsets, mark and viewport
//! - **[`state`]**: `EditorState`, the whole editing session
//! - **[`edit`]**, **[`motion`]**, **[`search`]**, **[`region`]**: the
//!   commands, as methods on `EditorState`
//! - **[`keymap`]**: emacs-style key sequences to [`keymap::Command`]s
//! - **[`minibuffer`]**: one-line prompts
//! - **[`view`]**: painting into an `ae-term` framebuffer
//! - **[`config`]**: `:set`-style options
//! - **[`error`]**: `EditError`

pub mod buffer;
pub mod config;
pub mod cursor;
pub mod edit;
pub mod error;
pub mod gap;
pub mod keymap;
pub mod minibuffer;
pub mod motion;
pub mod position;
pub mod region;
pub mod search;
pub mod state;
pub mod view;
