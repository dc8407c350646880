//! The per-line edit gap and the shared edit accumulator.
//!
//! Typing into a line does not rebuild it on every key. Instead the line
//! records a gap `[left, right)` of bytes that the pending edit replaces,
//! and the typed bytes collect in one [`EditAccumulator`]. Committing builds
//! `text[..left] + accumulated + text[right..]` once.
//!
//! Only one line is ever being edited, so there is one accumulator per
//! editor, not one per line.

use crate::error::{EditError, Result};

/// Default accumulator capacity in bytes.
pub const DEFAULT_CAPACITY: usize = 64;

// ---------------------------------------------------------------------------
// Gap
// ---------------------------------------------------------------------------

/// The byte span `[left, right)` of a line replaced by the pending edit.
///
/// Invariant: `left <= right`. A zero-width gap is a pure insertion point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Gap {
    left: usize,
    right: usize,
}

impl Gap {
    /// A zero-width gap at `col`.
    #[inline]
    #[must_use]
    pub const fn at(col: usize) -> Self {
        Self {
            left: col,
            right: col,
        }
    }

    /// A gap covering `[left, right)`.
    ///
    /// # Panics
    ///
    /// Panics in debug builds if `left > right`.
    #[inline]
    #[must_use]
    pub const fn span(left: usize, right: usize) -> Self {
        debug_assert!(left <= right, "gap requires left <= right");
        Self { left, right }
    }

    #[inline]
    #[must_use]
    pub const fn left(self) -> usize {
        self.left
    }

    #[inline]
    #[must_use]
    pub const fn right(self) -> usize {
        self.right
    }

    #[inline]
    #[must_use]
    pub const fn width(self) -> usize {
        self.right - self.left
    }

    #[inline]
    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.left == self.right
    }

    /// Swallow one more byte to the right, up to `limit`.
    /// Returns `false` when the gap already reaches `limit`.
    pub const fn widen_right(&mut self, limit: usize) -> bool {
        if self.right < limit {
            self.right += 1;
            true
        } else {
            false
        }
    }

    /// Swallow one more byte to the left. Returns `false` at column 0.
    pub const fn widen_left(&mut self) -> bool {
        if self.left > 0 {
            self.left -= 1;
            true
        } else {
            false
        }
    }
}

// ---------------------------------------------------------------------------
// EditAccumulator
// ---------------------------------------------------------------------------

/// Bounded buffer of bytes typed since the last commit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditAccumulator {
    bytes: Vec<u8>,
    capacity: usize,
}

impl EditAccumulator {
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self {
            bytes: Vec::with_capacity(capacity),
            capacity,
        }
    }

    /// Append one byte.
    ///
    /// # Errors
    ///
    /// [`EditError::AccumulatorFull`] when the accumulator is at capacity.
    pub fn push(&mut self, byte: u8) -> Result<()> {
        if self.is_full() {
            return Err(EditError::AccumulatorFull {
                capacity: self.capacity,
            });
        }
        self.bytes.push(byte);
        Ok(())
    }

    /// Append several bytes, all or nothing.
    ///
    /// # Errors
    ///
    /// [`EditError::AccumulatorFull`] when `bytes` does not fit.
    pub fn extend(&mut self, bytes: &[u8]) -> Result<()> {
        if bytes.len() > self.remaining() {
            return Err(EditError::AccumulatorFull {
                capacity: self.capacity,
            });
        }
        self.bytes.extend_from_slice(bytes);
        Ok(())
    }

    #[inline]
    #[must_use]
    pub fn is_full(&self) -> bool {
        self.bytes.len() >= self.capacity
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    #[inline]
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    #[inline]
    #[must_use]
    pub const fn capacity(&self) -> usize {
        self.capacity
    }

    #[inline]
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.capacity.saturating_sub(self.bytes.len())
    }

    pub fn clear(&mut self) {
        self.bytes.clear();
    }
}

impl Default for EditAccumulator {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

/// The text a line will hold once `gap` is replaced by `pending`.
#[must_use]
pub fn compose(text: &[u8], gap: Gap, pending: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(text.len() - gap.width() + pending.len());
    out.extend_from_slice(&text[..gap.left]);
    out.extend_from_slice(pending);
    out.extend_from_slice(&text[gap.right..]);
    out
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    // -- Gap ----------------------------------------------------------------

    #[test]
    fn gap_at_is_zero_width() {
        let gap = Gap::at(3);
        assert!(gap.is_empty());
        assert_eq!((gap.left(), gap.right()), (3, 3));
    }

    #[test]
    fn widen_right_stops_at_limit() {
        let mut gap = Gap::at(1);
        assert!(gap.widen_right(3));
        assert!(gap.widen_right(3));
        assert!(!gap.widen_right(3));
        assert_eq!(gap.width(), 2);
    }

    #[test]
    fn widen_left_stops_at_zero() {
        let mut gap = Gap::at(1);
        assert!(gap.widen_left());
        assert!(!gap.widen_left());
        assert_eq!(gap, Gap::span(0, 1));
    }

    // -- Accumulator --------------------------------------------------------

    #[test]
    fn push_until_full() {
        let mut acc = EditAccumulator::new(2);
        acc.push(b'a').unwrap();
        acc.push(b'b').unwrap();
        assert!(acc.is_full());
        assert!(matches!(
            acc.push(b'c'),
            Err(EditError::AccumulatorFull { capacity: 2 })
        ));
        assert_eq!(acc.as_bytes(), b"ab");
    }

    #[test]
    fn extend_is_all_or_nothing() {
        let mut acc = EditAccumulator::new(4);
        acc.push(b'x').unwrap();
        assert!(acc.extend(b"1234").is_err());
        assert_eq!(acc.as_bytes(), b"x");
        acc.extend(b"123").unwrap();
        assert_eq!(acc.remaining(), 0);
    }

    #[test]
    fn clear_empties() {
        let mut acc = EditAccumulator::default();
        assert_eq!(acc.capacity(), DEFAULT_CAPACITY);
        acc.extend(b"hello").unwrap();
        acc.clear();
        assert!(acc.is_empty());
        assert_eq!(acc.len(), 0);
    }

    // -- compose ------------------------------------------------------------

    #[test]
    fn compose_inserts_at_zero_width_gap() {
        assert_eq!(compose(b"ab\n", Gap::at(0), b"X"), b"Xab\n".to_vec());
    }

    #[test]
    fn compose_replaces_span() {
        assert_eq!(compose(b"hello\n", Gap::span(1, 4), b"EY"), b"hEYo\n".to_vec());
        assert_eq!(compose(b"hello\n", Gap::span(0, 5), b""), b"\n".to_vec());
    }
}
