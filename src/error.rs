//! Error types for reading and validating tetromino input.
//!
//! The packing search itself cannot fail for valid pieces, so everything here
//! belongs to the input side of the pipeline.

use thiserror::Error;

use crate::pieces::MAX_PIECES;

/// Malformed layout in the tetromino text stream.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("line {line}: tetromino should have 4 columns")]
    RowWidth { line: usize },

    #[error("line {line}: tetromino should have 4 rows")]
    RowCount { line: usize },

    #[error("line {line}: tetrominoes should be separated by blank lines")]
    MissingSeparator { line: usize },
}

/// A shape that is not a valid tetromino.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PieceError {
    #[error("unrecognised character '{0}'")]
    UnrecognisedChar(char),

    #[error("tetromino should have 4 blocks, found {0}")]
    BlockCount(usize),

    #[error("tetromino has the same cell more than once")]
    DuplicateCell,

    #[error("tetromino blocks are not connected")]
    Disconnected,
}

/// Errors that can occur while loading pieces for a packing run.
#[derive(Debug, Error)]
pub enum Error {
    #[error("{0}")]
    Io(#[from] std::io::Error),

    #[error("invalid file format; {0}")]
    Parse(#[from] ParseError),

    #[error("tetromino {index}: {source}")]
    Piece {
        /// 1-based position of the tetromino in the input.
        index: usize,
        #[source]
        source: PieceError,
    },

    #[error("cannot process more than {limit} tetrominoes", limit = MAX_PIECES)]
    TooManyPieces { count: usize },
}
