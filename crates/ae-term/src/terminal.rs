// SPDX-License-Identifier: MIT
//
// Raw mode and the alternate screen, entered once per run and always left.
//
// `Terminal::leave` runs on normal exit and on drop. A panic takes another
// path: the hook installed on first `enter` writes `ansi::LEAVE_SCREEN`
// straight to fd 1 (stdout's lock may be held by the frame being flushed)
// and puts back the termios saved in `SAVED_TERMIOS`.
#![allow(unsafe_code)]

use std::io::{self, Write};
use std::sync::{Mutex, Once};

use crate::ansi;

/// Terminal dimensions in character cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Size {
    pub cols: u16,
    pub rows: u16,
}

impl Size {
    /// Used when stdout is not a terminal.
    pub const FALLBACK: Self = Self { cols: 80, rows: 24 };
}

/// `TIOCGWINSZ` on stdout. `None` off a terminal or for a 0x0 answer.
#[cfg(unix)]
fn query_size() -> Option<Size> {
    // SAFETY: winsize is plain data; ioctl only writes into it.
    let mut ws: libc::winsize = unsafe { std::mem::zeroed() };
    let rc = unsafe { libc::ioctl(libc::STDOUT_FILENO, libc::TIOCGWINSZ, &mut ws) };
    (rc == 0 && ws.ws_col > 0 && ws.ws_row > 0).then_some(Size {
        cols: ws.ws_col,
        rows: ws.ws_row,
    })
}

#[cfg(not(unix))]
fn query_size() -> Option<Size> {
    None
}

// ─── Raw mode ───────────────────────────────────────────────────────────────

#[cfg(unix)]
static SAVED_TERMIOS: Mutex<Option<libc::termios>> = Mutex::new(None);

/// Saved line discipline while raw mode is on.
#[cfg(unix)]
struct RawMode {
    saved: libc::termios,
}

#[cfg(unix)]
impl RawMode {
    /// Switch stdin to raw mode. `Ok(None)` when stdin is not a terminal,
    /// so tests and pipes run without one.
    fn enable() -> io::Result<Option<Self>> {
        // SAFETY: isatty only inspects the descriptor.
        if unsafe { libc::isatty(libc::STDIN_FILENO) } == 0 {
            return Ok(None);
        }

        // SAFETY: termios is plain data filled in by tcgetattr.
        let mut termios: libc::termios = unsafe { std::mem::zeroed() };
        if unsafe { libc::tcgetattr(libc::STDIN_FILENO, &raw mut termios) } != 0 {
            return Err(io::Error::last_os_error());
        }
        let saved = termios;
        if let Ok(mut slot) = SAVED_TERMIOS.lock() {
            *slot = Some(saved);
        }

        // ISIG and IXON stay off: C-c, C-s and C-q are editor keys.
        termios.c_iflag &= !(libc::IGNBRK
            | libc::BRKINT
            | libc::PARMRK
            | libc::ISTRIP
            | libc::INLCR
            | libc::IGNCR
            | libc::ICRNL
            | libc::IXON);
        termios.c_oflag &= !libc::OPOST;
        termios.c_lflag &= !(libc::ECHO | libc::ECHONL | libc::ICANON | libc::ISIG | libc::IEXTEN);
        termios.c_cflag &= !(libc::CSIZE | libc::PARENB);
        termios.c_cflag |= libc::CS8;
        termios.c_cc[libc::VMIN] = 1;
        termios.c_cc[libc::VTIME] = 0;

        // SAFETY: a valid termios derived from the current one.
        let rc = unsafe { libc::tcsetattr(libc::STDIN_FILENO, libc::TCSAFLUSH, &raw const termios) };
        if rc != 0 {
            return Err(io::Error::last_os_error());
        }
        Ok(Some(Self { saved }))
    }

    fn disable(self) -> io::Result<()> {
        // SAFETY: restores the termios tcgetattr returned.
        let rc = unsafe { libc::tcsetattr(libc::STDIN_FILENO, libc::TCSAFLUSH, &raw const self.saved) };
        if let Ok(mut slot) = SAVED_TERMIOS.lock() {
            *slot = None;
        }
        if rc != 0 {
            return Err(io::Error::last_os_error());
        }
        Ok(())
    }
}

#[cfg(not(unix))]
struct RawMode;

#[cfg(not(unix))]
impl RawMode {
    fn enable() -> io::Result<Option<Self>> {
        Ok(None)
    }

    fn disable(self) -> io::Result<()> {
        Ok(())
    }
}

// ─── Panic hook ─────────────────────────────────────────────────────────────

static PANIC_HOOK: Once = Once::new();

fn install_panic_hook() {
    PANIC_HOOK.call_once(|| {
        let previous = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |info| {
            restore_after_panic();
            previous(info);
        }));
    });
}

#[cfg(unix)]
fn restore_after_panic() {
    // SAFETY: raw write of a static buffer to fd 1.
    unsafe {
        let _ = libc::write(
            libc::STDOUT_FILENO,
            ansi::LEAVE_SCREEN.as_ptr().cast::<libc::c_void>(),
            ansi::LEAVE_SCREEN.len(),
        );
    }
    if let Ok(slot) = SAVED_TERMIOS.lock() {
        if let Some(saved) = slot.as_ref() {
            // SAFETY: saved came from tcgetattr.
            unsafe {
                let _ = libc::tcsetattr(libc::STDIN_FILENO, libc::TCSANOW, saved);
            }
        }
    }
}

#[cfg(not(unix))]
fn restore_after_panic() {
    let mut out = io::stdout();
    let _ = out.write_all(ansi::LEAVE_SCREEN);
    let _ = out.flush();
}

// ─── Terminal ───────────────────────────────────────────────────────────────

/// The controlling terminal. Restored on drop if still entered.
pub struct Terminal {
    size: Size,
    entered: bool,
    raw: Option<RawMode>,
}

impl Terminal {
    /// Query the size without touching terminal modes.
    ///
    /// # Errors
    ///
    /// Never fails today; the signature keeps setup errors in one place for
    /// callers.
    pub fn new() -> io::Result<Self> {
        Ok(Self {
            size: query_size().unwrap_or(Size::FALLBACK),
            entered: false,
            raw: None,
        })
    }

    #[inline]
    #[must_use]
    pub const fn size(&self) -> Size {
        self.size
    }

    /// Re-read the size after SIGWINCH. Keeps the old one if the query fails.
    pub fn refresh_size(&mut self) -> Size {
        if let Some(size) = query_size() {
            self.size = size;
        }
        self.size
    }

    /// Raw mode plus [`ansi::ENTER_SCREEN`]. Idempotent.
    ///
    /// # Errors
    ///
    /// Fails if termios cannot be changed or stdout cannot be written.
    pub fn enter(&mut self) -> io::Result<()> {
        if self.entered {
            return Ok(());
        }
        install_panic_hook();
        self.raw = RawMode::enable()?;

        let mut out = io::stdout().lock();
        out.write_all(ansi::ENTER_SCREEN)?;
        out.flush()?;
        self.entered = true;
        Ok(())
    }

    /// [`ansi::LEAVE_SCREEN`] and the saved termios. Idempotent.
    ///
    /// # Errors
    ///
    /// Fails if stdout cannot be written or termios cannot be restored.
    pub fn leave(&mut self) -> io::Result<()> {
        if !self.entered {
            return Ok(());
        }
        self.entered = false;
        let written = {
            let mut out = io::stdout().lock();
            out.write_all(ansi::LEAVE_SCREEN).and_then(|()| out.flush())
        };
        let restored = self.raw.take().map_or(Ok(()), RawMode::disable);
        written.and(restored)
    }
}

impl Drop for Terminal {
    fn drop(&mut self) {
        let _ = self.leave();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fallback_is_80_by_24() {
        assert_eq!(Size::FALLBACK, Size { cols: 80, rows: 24 });
    }

    #[test]
    fn new_terminal_has_a_size() {
        let term = Terminal::new().unwrap();
        assert!(!term.entered);
        assert!(term.size().cols > 0 && term.size().rows > 0);
    }

    #[test]
    fn enter_and_leave_are_idempotent() {
        let mut term = Terminal::new().unwrap();
        term.enter().unwrap();
        term.enter().unwrap();
        assert!(term.entered);
        term.leave().unwrap();
        term.leave().unwrap();
        assert!(!term.entered);
        assert!(term.raw.is_none());
    }

    #[test]
    fn drop_leaves() {
        let mut term = Terminal::new().unwrap();
        term.enter().unwrap();
        drop(term);
    }

    #[test]
    fn refresh_size_updates_cache() {
        let mut term = Terminal::new().unwrap();
        let size = term.refresh_size();
        assert_eq!(size, term.size());
    }
}
