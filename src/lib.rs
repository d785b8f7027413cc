//! Tetromino Packing Library
//!
//! Finds the smallest square that holds a set of tetrominoes placed without
//! rotation, reflection or overlap.
//!
//! ```
//! use tetropack::pieces::tetromino;
//! use tetropack::solver::find_smallest_square;
//!
//! let pieces = [tetromino("O", 'A').unwrap(), tetromino("I", 'B').unwrap()];
//! let packing = find_smallest_square(&pieces);
//! assert_eq!(packing.grid.size(), 4);
//! ```

pub mod error;
pub mod geometry;
pub mod grid;
pub mod parse;
pub mod pieces;
pub mod solver;

pub use error::Error;
pub use grid::Grid;
pub use pieces::Piece;
pub use solver::{Packing, PieceOrder, Solver, SolverConfig};
