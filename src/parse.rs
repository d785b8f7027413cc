//! Reading tetrominoes from text.
//!
//! Input format:
//! - each tetromino is 4 lines of exactly 4 characters
//! - `#` marks a block, `.` an empty cell
//! - tetrominoes are separated by one or more blank lines
//!
//! ```text
//! #...
//! #...
//! #...
//! #...
//!
//! ....
//! .##.
//! .##.
//! ....
//! ```

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use tracing::debug;

use crate::error::{Error, ParseError, PieceError};
use crate::geometry::Coord;
use crate::pieces::{label_shapes, Piece, CELLS_PER_PIECE};

/// Side length of the square each tetromino is drawn in.
const RAW_SIZE: usize = 4;

const BLOCK: char = '#';
const EMPTY: char = '.';

/// An unvalidated 4x4 drawing of a tetromino, indexed `[row][column]`.
pub type RawPiece = [[char; RAW_SIZE]; RAW_SIZE];

/// Splits a stream into 4x4 drawings without interpreting their characters.
pub fn parse_stream<R: BufRead>(reader: R) -> Result<Vec<RawPiece>, Error> {
    let mut pieces = Vec::new();
    let mut current: RawPiece = [[EMPTY; RAW_SIZE]; RAW_SIZE];
    let mut row_count = 0;
    let mut line_number = 0;

    for line in reader.lines() {
        let line = line?;
        line_number += 1;

        if row_count == RAW_SIZE {
            pieces.push(current);
            row_count = 0;

            if !line.is_empty() {
                return Err(ParseError::MissingSeparator { line: line_number }.into());
            }
            continue;
        }

        if line.is_empty() {
            if row_count == 0 {
                // several blank lines between tetrominoes are fine
                continue;
            }
            return Err(ParseError::RowCount { line: line_number }.into());
        }

        let row: Vec<char> = line.chars().collect();
        current[row_count] = row
            .try_into()
            .map_err(|_| ParseError::RowWidth { line: line_number })?;
        row_count += 1;
    }

    match row_count {
        0 => {}
        RAW_SIZE => pieces.push(current),
        _ => return Err(ParseError::RowCount { line: line_number + 1 }.into()),
    }

    debug!(count = pieces.len(), "parsed tetromino stream");
    Ok(pieces)
}

/// Extracts the block positions from a drawing.
pub fn raw_to_cells(raw: &RawPiece) -> Result<[Coord; CELLS_PER_PIECE], PieceError> {
    let mut cells = [(0, 0); CELLS_PER_PIECE];
    let mut block_count = 0;

    for (y, row) in raw.iter().enumerate() {
        for (x, &glyph) in row.iter().enumerate() {
            match glyph {
                EMPTY => {}
                BLOCK => {
                    if block_count < CELLS_PER_PIECE {
                        cells[block_count] = (x as i32, y as i32);
                    }
                    block_count += 1;
                }
                other => return Err(PieceError::UnrecognisedChar(other)),
            }
        }
    }

    if block_count != CELLS_PER_PIECE {
        return Err(PieceError::BlockCount(block_count));
    }
    Ok(cells)
}

/// Parses, validates and labels every tetromino in a stream.
pub fn read_pieces<R: BufRead>(reader: R) -> Result<Vec<Piece>, Error> {
    let shapes = parse_stream(reader)?
        .iter()
        .enumerate()
        .map(|(index, raw)| {
            raw_to_cells(raw).map_err(|source| Error::Piece {
                index: index + 1,
                source,
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    label_shapes(&shapes)
}

/// Reads pieces from a file.
pub fn load_pieces(path: impl AsRef<Path>) -> Result<Vec<Piece>, Error> {
    let file = File::open(path)?;
    read_pieces(BufReader::new(file))
}
