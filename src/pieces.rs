//! Tetromino definitions and identifier assignment.
//!
//! Each piece is a set of four cells normalized so the minimum coordinates
//! are at the origin, together with the width and height of its bounding
//! box and the single character it is printed as.

use crate::error::{Error, PieceError};
use crate::geometry::{self, Coord, Offset};

/// Number of cells in every tetromino.
pub const CELLS_PER_PIECE: usize = 4;

/// Maximum number of pieces in one run (one identifier per letter `A`..=`Z`).
pub const MAX_PIECES: usize = 26;

/// A validated, normalized tetromino.
///
/// Fields are private so a constructed piece always upholds its invariants:
/// four distinct, connected cells with min x = min y = 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Piece {
    id: char,
    cells: [Offset; CELLS_PER_PIECE],
    width: usize,
    height: usize,
}

impl Piece {
    /// Validates and normalizes a shape.
    pub fn new(id: char, cells: [Coord; CELLS_PER_PIECE]) -> Result<Self, PieceError> {
        if geometry::has_duplicates(&cells) {
            return Err(PieceError::DuplicateCell);
        }
        if !geometry::is_connected(&cells) {
            return Err(PieceError::Disconnected);
        }

        let cells = geometry::normalize_to_origin(cells);
        let (width, height) = geometry::bounding_box(&cells);

        Ok(Self {
            id,
            cells,
            width,
            height,
        })
    }

    /// The character this piece is printed as.
    #[inline]
    pub fn id(&self) -> char {
        self.id
    }

    /// Cell offsets relative to the bounding-box origin.
    #[inline]
    pub fn cells(&self) -> &[Offset; CELLS_PER_PIECE] {
        &self.cells
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    /// Longest side of the bounding box, used to order pieces before searching.
    #[inline]
    pub fn footprint(&self) -> usize {
        self.width.max(self.height)
    }
}

/// The seven tetrominoes in the orientation they are read from input,
/// plus the vertical I which is a distinct shape without rotation.
pub const TETROMINOES: &[(&str, [Coord; CELLS_PER_PIECE])] = &[
    // ####
    ("I", [(0, 0), (1, 0), (2, 0), (3, 0)]),
    // #
    // #
    // #
    // #
    ("I_VERTICAL", [(0, 0), (0, 1), (0, 2), (0, 3)]),
    // ##
    // ##
    ("O", [(0, 0), (1, 0), (0, 1), (1, 1)]),
    // ###
    //  #
    ("T", [(0, 0), (1, 0), (2, 0), (1, 1)]),
    //  ##
    // ##
    ("S", [(1, 0), (2, 0), (0, 1), (1, 1)]),
    // ##
    //  ##
    ("Z", [(0, 0), (1, 0), (1, 1), (2, 1)]),
    //  #
    //  #
    // ##
    ("J", [(1, 0), (1, 1), (0, 2), (1, 2)]),
    // #
    // #
    // ##
    ("L", [(0, 0), (0, 1), (0, 2), (1, 2)]),
];

/// Looks up a catalog shape by name and builds it with the given identifier.
pub fn tetromino(name: &str, id: char) -> Option<Piece> {
    TETROMINOES
        .iter()
        .find(|(shape_name, _)| *shape_name == name)
        .and_then(|&(_, cells)| Piece::new(id, cells).ok())
}

/// Builds pieces from raw shapes, labelling them `A`, `B`, ... in input order.
pub fn label_shapes(shapes: &[[Coord; CELLS_PER_PIECE]]) -> Result<Vec<Piece>, Error> {
    if shapes.len() > MAX_PIECES {
        return Err(Error::TooManyPieces {
            count: shapes.len(),
        });
    }

    shapes
        .iter()
        .zip('A'..='Z')
        .enumerate()
        .map(|(index, (&cells, id))| {
            Piece::new(id, cells).map_err(|source| Error::Piece {
                index: index + 1,
                source,
            })
        })
        .collect()
}
