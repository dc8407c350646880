// SPDX-License-Identifier: MIT
#![allow(unsafe_code)]
//
// Event loop: read keys, let the app handle them, repaint.
//
// The loop blocks in `KeyReader::read` for at most one tick (100ms by
// default). Input is handled as soon as it arrives; a timeout just falls
// through to the repaint, which keeps the status line current and flushes
// a pending lone ESC as the Escape key.
//
// Terminal resize is detected by a SIGWINCH handler that sets an
// `AtomicBool`. The handler is installed without SA_RESTART so the signal
// interrupts `poll()` and the resize is picked up right away.

use std::io::{self, Write};
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use crate::ansi;
use crate::buffer::FrameBuffer;
use crate::diff::DiffRenderer;
use crate::input::Event;
use crate::reader::{KeyReader, ReadOutcome};
use crate::terminal::{Size, Terminal};

// ─── SIGWINCH ────────────────────────────────────────────────────────────────

static SIGWINCH_RECEIVED: AtomicBool = AtomicBool::new(false);

#[cfg(unix)]
fn install_sigwinch_handler() {
    unsafe {
        let mut sa: libc::sigaction = std::mem::zeroed();
        sa.sa_sigaction = sigwinch_handler as *const () as usize;
        sa.sa_flags = 0;
        libc::sigemptyset(&raw mut sa.sa_mask);
        libc::sigaction(libc::SIGWINCH, &raw const sa, std::ptr::null_mut());
    }
}

#[cfg(unix)]
extern "C" fn sigwinch_handler(_sig: libc::c_int) {
    SIGWINCH_RECEIVED.store(true, Ordering::Relaxed);
}

#[cfg(not(unix))]
fn install_sigwinch_handler() {}

// ─── App Trait ───────────────────────────────────────────────────────────────

/// What the application tells the event loop after handling an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Continue,
    Quit,
}

/// Application interface for the event loop.
///
/// Each iteration the loop calls [`on_event`](App::on_event) for every
/// decoded key, [`on_resize`](App::on_resize) after SIGWINCH, then
/// [`paint`](App::paint) and [`cursor`](App::cursor). Only `paint` is
/// required.
pub trait App {
    /// Handle one key event. Return [`Action::Quit`] to leave the loop.
    fn on_event(&mut self, _event: &Event) -> Action {
        Action::Continue
    }

    /// The terminal changed size. The frame buffer is already resized.
    fn on_resize(&mut self, _size: Size) {}

    /// Paint the whole screen. The buffer is cleared before the call.
    fn paint(&mut self, buf: &mut FrameBuffer);

    /// Where to put the hardware cursor after painting, or `None` to hide it.
    fn cursor(&self) -> Option<(u16, u16)> {
        None
    }
}

// ─── Loop Config ─────────────────────────────────────────────────────────────

/// Event loop timing.
#[derive(Debug, Clone, Copy)]
pub struct LoopConfig {
    /// How long a read waits before giving up and repainting.
    pub tick: Duration,
}

impl Default for LoopConfig {
    fn default() -> Self {
        Self {
            tick: Duration::from_millis(100),
        }
    }
}

// ─── EventLoop ───────────────────────────────────────────────────────────────

/// Owns the terminal, key reader and renderer. [`run`](Self::run) returns
/// when the app answers [`Action::Quit`] or stdin closes.
pub struct EventLoop {
    terminal: Terminal,
    reader: KeyReader,
    renderer: DiffRenderer,
    config: LoopConfig,
}

impl EventLoop {
    /// # Errors
    ///
    /// Returns an error if the terminal cannot be initialized.
    pub fn with_config(config: LoopConfig) -> io::Result<Self> {
        Ok(Self {
            terminal: Terminal::new()?,
            reader: KeyReader::new(),
            renderer: DiffRenderer::new(),
            config,
        })
    }

    #[inline]
    #[must_use]
    pub const fn size(&self) -> Size {
        self.terminal.size()
    }

    /// Enter raw mode, run until quit, and restore the terminal even if the
    /// loop failed.
    ///
    /// # Errors
    ///
    /// Returns an error if terminal setup, input or output fails.
    pub fn run(&mut self, app: &mut impl App) -> io::Result<()> {
        self.terminal.enter()?;
        install_sigwinch_handler();

        let result = self.run_inner(app);
        self.terminal.leave()?;
        result
    }

    fn run_inner(&mut self, app: &mut impl App) -> io::Result<()> {
        let size = self.terminal.size();
        let mut frame = FrameBuffer::new(size.cols, size.rows);
        app.on_resize(size);

        loop {
            self.draw(app, &mut frame)?;

            match self.reader.read(self.config.tick)? {
                ReadOutcome::Events(events) => {
                    for event in &events {
                        if app.on_event(event) == Action::Quit {
                            return Ok(());
                        }
                    }
                }
                ReadOutcome::Timeout => {}
                ReadOutcome::Eof => return Ok(()),
            }

            if SIGWINCH_RECEIVED.swap(false, Ordering::Relaxed) {
                let new_size = self.terminal.refresh_size();
                frame.resize(new_size.cols, new_size.rows);
                self.renderer.force_redraw();
                app.on_resize(new_size);
            }
        }
    }

    fn draw(&mut self, app: &mut impl App, frame: &mut FrameBuffer) -> io::Result<()> {
        frame.clear();
        app.paint(frame);
        self.renderer.render(frame);
        self.renderer.flush()?;

        let stdout = io::stdout();
        let mut lock = stdout.lock();
        if let Some((x, y)) = app.cursor() {
            ansi::cursor_to(&mut lock, x, y)?;
            lock.write_all(ansi::SHOW_CURSOR)?;
        } else {
            lock.write_all(ansi::HIDE_CURSOR)?;
        }
        lock.flush()
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::{KeyCode, KeyEvent};

    #[test]
    fn default_tick_is_100ms() {
        assert_eq!(LoopConfig::default().tick, Duration::from_millis(100));
    }

    #[test]
    fn event_loop_with_custom_config() {
        let config = LoopConfig {
            tick: Duration::from_millis(250),
        };
        let event_loop = EventLoop::with_config(config).unwrap();
        assert_eq!(event_loop.config.tick, Duration::from_millis(250));
        assert!(event_loop.size().rows > 0);
    }

    #[test]
    fn sigwinch_flag_swap() {
        SIGWINCH_RECEIVED.store(true, Ordering::Relaxed);
        assert!(SIGWINCH_RECEIVED.swap(false, Ordering::Relaxed));
        assert!(!SIGWINCH_RECEIVED.load(Ordering::Relaxed));
    }

    struct MinimalApp;
    impl App for MinimalApp {
        fn paint(&mut self, _buf: &mut FrameBuffer) {}
    }

    #[test]
    fn app_defaults() {
        let mut app = MinimalApp;
        let event = Event::Key(KeyEvent::plain(KeyCode::Enter));
        assert_eq!(app.on_event(&event), Action::Continue);
        app.on_resize(Size { cols: 100, rows: 50 });
        assert!(app.cursor().is_none());
    }
}
