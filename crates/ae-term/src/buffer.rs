// SPDX-License-Identifier: MIT
//
// FrameBuffer: the 2D cell grid the editor paints to.
//
// Every screen position is a cell holding one byte and a style. The editor
// paints a whole frame, then the diff renderer compares it against the
// previous one and only sends the rows that changed.
//
// Flat `Vec<Cell>` with row-major indexing: a row's cells are contiguous,
// so the renderer's left-to-right scan and its whole-row comparison are
// plain slice operations.

// ─── Cell ───────────────────────────────────────────────────────────────────

/// How a cell is drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Style {
    /// Terminal default colors.
    #[default]
    Normal,
    /// Inside the active region.
    Highlight,
    /// Inverse video, used by the status line.
    Inverse,
}

/// One character position on screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cell {
    /// Printable ASCII byte.
    pub byte: u8,
    pub style: Style,
}

impl Cell {
    /// A blank cell with default style.
    pub const EMPTY: Self = Self {
        byte: b' ',
        style: Style::Normal,
    };

    /// A cell holding `byte`. Non-printable bytes are shown as `?`.
    #[inline]
    #[must_use]
    pub const fn new(byte: u8, style: Style) -> Self {
        let byte = if byte.is_ascii_graphic() || byte == b' ' {
            byte
        } else {
            b'?'
        };
        Self { byte, style }
    }
}

impl Default for Cell {
    fn default() -> Self {
        Self::EMPTY
    }
}

// ─── FrameBuffer ────────────────────────────────────────────────────────────

/// A `width × height` grid of cells; `index = y * width + x`.
///
/// # Examples
///
/// ```
/// use ae_term::buffer::{Cell, FrameBuffer, Style};
///
/// let mut buf = FrameBuffer::new(80, 24);
/// buf.set(5, 3, Cell::new(b'X', Style::Normal));
/// assert_eq!(buf.get(5, 3).map(|c| c.byte), Some(b'X'));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameBuffer {
    width: u16,
    height: u16,
    cells: Vec<Cell>,
}

impl FrameBuffer {
    // ─── Construction ────────────────────────────────────────────────────

    /// Create a buffer filled with blank cells.
    #[must_use]
    pub fn new(width: u16, height: u16) -> Self {
        let size = usize::from(width) * usize::from(height);
        Self {
            width,
            height,
            cells: vec![Cell::EMPTY; size],
        }
    }

    // ─── Dimensions ──────────────────────────────────────────────────────

    #[inline]
    #[must_use]
    pub const fn width(&self) -> u16 {
        self.width
    }

    #[inline]
    #[must_use]
    pub const fn height(&self) -> u16 {
        self.height
    }

    #[inline]
    const fn index(&self, x: u16, y: u16) -> Option<usize> {
        if x < self.width && y < self.height {
            Some(y as usize * self.width as usize + x as usize)
        } else {
            None
        }
    }

    // ─── Access ──────────────────────────────────────────────────────────

    /// The cell at `(x, y)`, or `None` if out of bounds.
    #[inline]
    #[must_use]
    pub fn get(&self, x: u16, y: u16) -> Option<&Cell> {
        self.index(x, y).map(|i| &self.cells[i])
    }

    /// One row as a slice, or `None` if `y` is out of bounds.
    #[must_use]
    pub fn row(&self, y: u16) -> Option<&[Cell]> {
        if y >= self.height {
            return None;
        }
        let start = usize::from(y) * usize::from(self.width);
        Some(&self.cells[start..start + usize::from(self.width)])
    }

    /// Row text as bytes. Handy for assertions.
    #[must_use]
    pub fn row_text(&self, y: u16) -> String {
        self.row(y)
            .map(|cells| cells.iter().map(|c| char::from(c.byte)).collect())
            .unwrap_or_default()
    }

    // ─── Mutation ────────────────────────────────────────────────────────

    /// Reset every cell to blank.
    pub fn clear(&mut self) {
        self.cells.fill(Cell::EMPTY);
    }

    /// Change dimensions. Contents are discarded.
    pub fn resize(&mut self, width: u16, height: u16) {
        self.width = width;
        self.height = height;
        self.cells.clear();
        self.cells
            .resize(usize::from(width) * usize::from(height), Cell::EMPTY);
    }

    /// Copy another buffer of the same size without reallocating.
    ///
    /// # Panics
    ///
    /// Panics if the dimensions differ.
    pub fn copy_from(&mut self, other: &Self) {
        assert_eq!(
            (self.width, self.height),
            (other.width, other.height),
            "copy_from requires equal dimensions"
        );
        self.cells.copy_from_slice(&other.cells);
    }

    /// Write one cell. Returns `false` if `(x, y)` is off-screen.
    pub fn set(&mut self, x: u16, y: u16, cell: Cell) -> bool {
        match self.index(x, y) {
            Some(i) => {
                self.cells[i] = cell;
                true
            }
            None => false,
        }
    }

    /// Paint bytes left to right from `(x, y)`, clipped at the right edge.
    /// Returns the column after the last byte written.
    pub fn put_bytes(&mut self, x: u16, y: u16, bytes: &[u8], style: Style) -> u16 {
        let mut col = x;
        for &b in bytes {
            if !self.set(col, y, Cell::new(b, style)) {
                break;
            }
            col += 1;
        }
        col
    }

    /// Fill the rest of row `y` from column `x` with blanks in `style`.
    pub fn fill_row(&mut self, x: u16, y: u16, style: Style) {
        for col in x..self.width {
            self.set(col, y, Cell::new(b' ', style));
        }
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
