// SPDX-License-Identifier: MIT
#![allow(unsafe_code)]
//
// Key reader: blocking read on stdin with a timeout.
//
// The editor is single-threaded. Each loop iteration asks the reader for
// input with `poll()` bounded by the tick interval; when nothing arrives
// the caller gets `ReadOutcome::Timeout` and simply repaints. The timeout
// doubles as the escape-sequence timeout: a lone ESC still pending when
// the poll expires is flushed as the Escape key.

use std::io;
use std::time::Duration;

use crate::input::{Event, Parser};

/// Bytes read per `read()` call. A keypress is 1-6 bytes; a fast typist or
/// a paste fits comfortably.
const READ_BUF_SIZE: usize = 1024;

/// What one call to [`KeyReader::read`] produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReadOutcome {
    /// One or more decoded events.
    Events(Vec<Event>),
    /// Nothing arrived before the timeout.
    Timeout,
    /// Stdin closed.
    Eof,
}

/// Reads and decodes key events from stdin.
pub struct KeyReader {
    parser: Parser,
}

impl KeyReader {
    #[must_use]
    pub fn new() -> Self {
        Self {
            parser: Parser::new(),
        }
    }

    /// Wait up to `timeout` for input and decode it.
    ///
    /// Bytes that only form part of a sequence stay in the parser. If the
    /// wait times out with such bytes pending they are flushed as literal
    /// keys, which is how a lone ESC becomes the Escape key.
    ///
    /// # Errors
    ///
    /// Returns an error if `poll()` or `read()` fails for a reason other
    /// than an interrupted system call.
    pub fn read(&mut self, timeout: Duration) -> io::Result<ReadOutcome> {
        let mut buf = [0u8; READ_BUF_SIZE];
        match read_stdin(&mut buf, timeout)? {
            Some(0) => Ok(ReadOutcome::Eof),
            Some(n) => {
                let events = self.parser.advance(&buf[..n]);
                if events.is_empty() {
                    Ok(ReadOutcome::Timeout)
                } else {
                    Ok(ReadOutcome::Events(events))
                }
            }
            None if self.parser.has_pending() => Ok(ReadOutcome::Events(self.parser.flush())),
            None => Ok(ReadOutcome::Timeout),
        }
    }
}

impl Default for KeyReader {
    fn default() -> Self {
        Self::new()
    }
}

/// Poll stdin, then read what is available.
///
/// `Ok(None)` on timeout or EINTR (a SIGWINCH landing mid-poll), `Ok(Some(0))`
/// at end of file.
#[cfg(unix)]
fn read_stdin(buf: &mut [u8], timeout: Duration) -> io::Result<Option<usize>> {
    use std::os::unix::io::AsRawFd;

    let fd = io::stdin().as_raw_fd();
    let millis = i32::try_from(timeout.as_millis()).unwrap_or(i32::MAX);

    let ready = unsafe {
        let mut pfd = libc::pollfd {
            fd,
            events: libc::POLLIN,
            revents: 0,
        };
        libc::poll(&raw mut pfd, 1, millis)
    };

    if ready < 0 {
        let err = io::Error::last_os_error();
        return if err.kind() == io::ErrorKind::Interrupted {
            Ok(None)
        } else {
            Err(err)
        };
    }
    if ready == 0 {
        return Ok(None);
    }

    let n = unsafe { libc::read(fd, buf.as_mut_ptr().cast(), buf.len()) };
    if n < 0 {
        let err = io::Error::last_os_error();
        return if err.kind() == io::ErrorKind::Interrupted {
            Ok(None)
        } else {
            Err(err)
        };
    }

    #[allow(clippy::cast_sign_loss)] // n >= 0 checked above.
    Ok(Some(n as usize))
}

/// Non-unix fallback: a plain blocking read, so the timeout is not honored.
#[cfg(not(unix))]
fn read_stdin(buf: &mut [u8], _timeout: Duration) -> io::Result<Option<usize>> {
    use std::io::Read;
    io::stdin().lock().read(buf).map(Some)
}

// ─── Tests ───────────────────────────────────────────────────────────────────
