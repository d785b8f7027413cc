//! Square playing field that pieces are packed onto.
//!
//! The grid is a flat row-major vector where each cell holds the identifier
//! of the piece covering it, or `None` when empty. Placement and removal are
//! exact inverses so the search can backtrack in place without copying.

use std::fmt;

use crate::pieces::Piece;

/// Glyph printed for empty cells.
pub const EMPTY_GLYPH: char = '.';

/// A `size x size` grid of optional piece identifiers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    size: usize,
    cells: Vec<Option<char>>,
}

impl Grid {
    /// Creates an empty grid. A size of 0 is allowed and holds nothing.
    pub fn new(size: usize) -> Self {
        Self {
            size,
            cells: vec![None; size * size],
        }
    }

    /// Side length of the square.
    #[inline]
    pub fn size(&self) -> usize {
        self.size
    }

    /// Converts (x, y) to a flat cell index. Index order is row-major.
    #[inline(always)]
    fn idx(&self, x: usize, y: usize) -> usize {
        y * self.size + x
    }

    /// Returns the identifier at (x, y), or `None` if empty or out of bounds.
    pub fn cell(&self, x: usize, y: usize) -> Option<char> {
        if x >= self.size || y >= self.size {
            return None;
        }
        self.cells[self.idx(x, y)]
    }

    /// Returns true if `piece` anchored at (x, y) stays inside the grid and
    /// covers only empty cells.
    pub fn can_place(&self, piece: &Piece, x: usize, y: usize) -> bool {
        let fits = |start: usize, extent: usize| {
            start
                .checked_add(extent)
                .is_some_and(|end| end <= self.size)
        };
        if !fits(x, piece.width()) || !fits(y, piece.height()) {
            return false;
        }

        piece
            .cells()
            .iter()
            .all(|&(dx, dy)| self.cells[self.idx(x + dx, y + dy)].is_none())
    }

    /// Writes the piece identifier into the four cells it covers.
    ///
    /// Callers must check `can_place` first.
    pub fn place(&mut self, piece: &Piece, x: usize, y: usize) {
        debug_assert!(self.can_place(piece, x, y), "place without can_place");
        for &(dx, dy) in piece.cells() {
            let idx = self.idx(x + dx, y + dy);
            self.cells[idx] = Some(piece.id());
        }
    }

    /// Clears the four cells covered by a previous `place` with the same arguments.
    pub fn remove(&mut self, piece: &Piece, x: usize, y: usize) {
        for &(dx, dy) in piece.cells() {
            let idx = self.idx(x + dx, y + dy);
            debug_assert_eq!(self.cells[idx], Some(piece.id()), "remove of unplaced piece");
            self.cells[idx] = None;
        }
    }

    /// Formats the grid as one line per row, terminated by a newline.
    pub fn render(&self) -> String {
        let mut output = String::with_capacity(self.size * (self.size + 1));
        for row in self.cells.chunks(self.size.max(1)) {
            output.extend(row.iter().map(|cell| cell.unwrap_or(EMPTY_GLYPH)));
            output.push('\n');
        }
        output
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}
