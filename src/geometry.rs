//! 2D coordinate utilities for tetromino shapes.
//!
//! Shapes arrive as raw (x, y) cell positions anywhere in the plane. Before
//! they can be placed they are translated so the minimum x and y are zero,
//! which makes the anchor of a placement the top-left corner of the shape's
//! bounding box.

use rustc_hash::FxHashSet;

/// A raw 2D cell position, x grows rightwards and y grows downwards.
pub type Coord = (i32, i32);

/// A cell offset relative to the bounding-box origin of a normalized shape.
pub type Offset = (usize, usize);

/// The four orthogonal neighbours of a cell.
const NEIGHBOURS: [Coord; 4] = [(1, 0), (-1, 0), (0, 1), (0, -1)];

/// Translates coordinates so the minimum x and y values are both zero.
pub fn normalize_to_origin<const N: usize>(cells: [Coord; N]) -> [Offset; N] {
    let min_x = cells.iter().map(|&(x, _)| x).fold(i32::MAX, i32::min);
    let min_y = cells.iter().map(|&(_, y)| y).fold(i32::MAX, i32::min);

    cells.map(|(x, y)| ((x - min_x) as usize, (y - min_y) as usize))
}

/// Returns `(width, height)` of the bounding box of normalized offsets.
pub fn bounding_box(cells: &[Offset]) -> (usize, usize) {
    let width = cells.iter().map(|&(x, _)| x + 1).max().unwrap_or(0);
    let height = cells.iter().map(|&(_, y)| y + 1).max().unwrap_or(0);
    (width, height)
}

/// Returns true if any position appears more than once.
pub fn has_duplicates(cells: &[Coord]) -> bool {
    let mut seen = FxHashSet::default();
    !cells.iter().all(|cell| seen.insert(*cell))
}

/// Returns true if the cells form a single orthogonally-connected polyomino.
///
/// Flood fills from the first cell; every cell must be reached.
pub fn is_connected(cells: &[Coord]) -> bool {
    let Some(&start) = cells.first() else {
        return false;
    };

    let remaining: FxHashSet<Coord> = cells.iter().copied().collect();
    let mut reached = FxHashSet::default();
    let mut frontier = vec![start];
    reached.insert(start);

    while let Some((x, y)) = frontier.pop() {
        for (dx, dy) in NEIGHBOURS {
            let next = (x + dx, y + dy);
            if remaining.contains(&next) && reached.insert(next) {
                frontier.push(next);
            }
        }
    }

    reached.len() == remaining.len()
}
