//! Backtracking packing search.
//!
//! Grid sizes are tried from the smallest square that could hold every cell
//! up to a pessimistic bound that always fits. For each size the pieces are
//! placed one at a time in row-major position order, undoing a placement
//! whenever the rest of the pieces cannot be packed after it.
//!
//! Pieces are searched longest-side-first, which is usually much faster but
//! can stall on some inputs. Each such attempt runs under a time budget; on
//! the first timeout the run falls back to input order with no budget.

use std::cmp::Reverse;
use std::time::{Duration, Instant};

use tracing::{debug, info, warn};

use crate::grid::Grid;
use crate::pieces::{Piece, CELLS_PER_PIECE};

/// Default wall-clock budget for one footprint-ordered attempt.
pub const DEFAULT_TIME_BUDGET: Duration = Duration::from_millis(500);

/// Default number of recursive calls between clock reads.
pub const DEFAULT_CHECK_INTERVAL: u32 = 1024;

/// Smallest integer `root` with `root * root >= n`.
fn ceil_sqrt(n: usize) -> usize {
    let mut root = (n as f64).sqrt() as usize;
    // float rounding can land one off in either direction
    while root * root < n {
        root += 1;
    }
    while root > 0 && (root - 1) * (root - 1) >= n {
        root -= 1;
    }
    root
}

/// Smallest square that could hold `count` pieces with no wasted cells.
pub fn minimum_size(count: usize) -> usize {
    ceil_sqrt(count * CELLS_PER_PIECE)
}

/// Square large enough for `count` pieces each given a full 4x4 area.
pub fn maximum_size(count: usize) -> usize {
    ceil_sqrt(count * CELLS_PER_PIECE * CELLS_PER_PIECE)
}

/// Returns a copy of `pieces` sorted by descending longest side.
///
/// The sort is stable, so pieces with equal footprint keep their input order.
pub fn order_by_footprint(pieces: &[Piece]) -> Vec<Piece> {
    let mut ordered = pieces.to_vec();
    ordered.sort_by_key(|piece| Reverse(piece.footprint()));
    ordered
}

/// Tries to place every piece on `grid`, in list order.
///
/// On success the grid is left holding the packing. On failure every
/// placement made by this call has been undone.
pub fn solve(grid: &mut Grid, pieces: &[Piece]) -> bool {
    Search::unbounded().run(grid, pieces) == Outcome::Packed
}

/// Tuning knobs for `Solver`.
#[derive(Debug, Clone, Copy)]
pub struct SolverConfig {
    /// Wall-clock budget for each footprint-ordered attempt.
    pub time_budget: Duration,
    /// Recursive calls between clock reads. 0 is treated as 1.
    pub check_interval: u32,
    /// Start with footprint ordering. When false, input order is used throughout.
    pub footprint_ordering: bool,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            time_budget: DEFAULT_TIME_BUDGET,
            check_interval: DEFAULT_CHECK_INTERVAL,
            footprint_ordering: true,
        }
    }
}

/// Which piece sequence produced a packing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PieceOrder {
    /// Longest side first.
    Footprint,
    /// The order the pieces were given in.
    Input,
}

/// The smallest packing found and how it was found.
#[derive(Debug, Clone)]
pub struct Packing {
    pub grid: Grid,
    pub order: PieceOrder,
}

/// Result of one search attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Outcome {
    Packed,
    /// Every position was tried; no packing exists at this size.
    Exhausted,
    TimedOut,
}

/// State for one recursive search attempt.
struct Search {
    deadline: Option<Instant>,
    check_interval: u32,
    calls: u32,
}

impl Search {
    fn unbounded() -> Self {
        Self {
            deadline: None,
            check_interval: 1,
            calls: 0,
        }
    }

    fn with_budget(budget: Duration, check_interval: u32) -> Self {
        Self {
            deadline: Some(Instant::now() + budget),
            check_interval: check_interval.max(1),
            calls: 0,
        }
    }

    /// Counts a call and returns true on every `check_interval`-th one.
    #[inline]
    fn should_sample(&mut self) -> bool {
        self.calls = self.calls.wrapping_add(1);
        self.calls % self.check_interval == 0
    }

    /// Reads the clock only on sampled calls.
    #[inline]
    fn out_of_time(&mut self) -> bool {
        let Some(deadline) = self.deadline else {
            return false;
        };
        self.should_sample() && Instant::now() >= deadline
    }

    fn run(&mut self, grid: &mut Grid, pieces: &[Piece]) -> Outcome {
        let Some((current, remaining)) = pieces.split_first() else {
            return Outcome::Packed;
        };

        if self.out_of_time() {
            return Outcome::TimedOut;
        }

        let (Some(max_x), Some(max_y)) = (
            grid.size().checked_sub(current.width()),
            grid.size().checked_sub(current.height()),
        ) else {
            return Outcome::Exhausted;
        };

        for y in 0..=max_y {
            for x in 0..=max_x {
                if !grid.can_place(current, x, y) {
                    continue;
                }

                grid.place(current, x, y);
                match self.run(grid, remaining) {
                    Outcome::Exhausted => grid.remove(current, x, y),
                    // a timed out grid is discarded by the caller, no need to unwind
                    done => return done,
                }
            }
        }

        Outcome::Exhausted
    }
}

/// Finds the smallest square packing for a set of pieces.
pub struct Solver {
    config: SolverConfig,
}

impl Solver {
    pub fn new(config: SolverConfig) -> Self {
        Self { config }
    }

    /// Tries every size from `minimum_size` to `maximum_size` and returns the
    /// first that packs.
    ///
    /// # Panics
    ///
    /// If no size up to `maximum_size` packs. The bound always fits valid
    /// tetrominoes, so this indicates a bug rather than bad input.
    pub fn find_smallest_square(&self, pieces: &[Piece]) -> Packing {
        if pieces.is_empty() {
            return Packing {
                grid: Grid::new(0),
                order: PieceOrder::Input,
            };
        }

        let min_size = minimum_size(pieces.len());
        let max_size = maximum_size(pieces.len());
        let by_footprint = order_by_footprint(pieces);
        let mut order = if self.config.footprint_ordering {
            PieceOrder::Footprint
        } else {
            PieceOrder::Input
        };

        debug!(
            pieces = pieces.len(),
            min_size, max_size, "searching for smallest square"
        );

        for size in min_size..=max_size {
            if order == PieceOrder::Footprint {
                let started = Instant::now();
                let mut grid = Grid::new(size);
                let mut search =
                    Search::with_budget(self.config.time_budget, self.config.check_interval);
                let outcome = search.run(&mut grid, &by_footprint);

                debug!(size, ?order, ?outcome, elapsed = ?started.elapsed(), "attempt finished");
                match outcome {
                    Outcome::Packed => {
                        info!(size, ?order, "packed");
                        return Packing { grid, order };
                    }
                    Outcome::Exhausted => continue,
                    Outcome::TimedOut => {
                        warn!(
                            size,
                            budget = ?self.config.time_budget,
                            "footprint ordering timed out, falling back to input order"
                        );
                        order = PieceOrder::Input;
                    }
                }
            }

            let started = Instant::now();
            let mut grid = Grid::new(size);
            let packed = solve(&mut grid, pieces);

            debug!(size, ?order, packed, elapsed = ?started.elapsed(), "attempt finished");
            if packed {
                info!(size, ?order, "packed");
                return Packing { grid, order };
            }
        }

        panic!("no packing of {} pieces up to size {max_size}", pieces.len());
    }
}

impl Default for Solver {
    fn default() -> Self {
        Self::new(SolverConfig::default())
    }
}

/// Runs `Solver::find_smallest_square` with the default configuration.
pub fn find_smallest_square(pieces: &[Piece]) -> Packing {
    Solver::default().find_smallest_square(pieces)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pieces::{tetromino, TETROMINOES};

    fn pieces(names: &[&str]) -> Vec<Piece> {
        names
            .iter()
            .zip('A'..='Z')
            .map(|(name, id)| tetromino(name, id).unwrap())
            .collect()
    }

    /// Asserts every piece appears exactly four times and nothing else is on the grid.
    fn assert_valid_packing(grid: &Grid, pieces: &[Piece]) {
        let mut occupied = 0;
        for piece in pieces {
            let count = (0..grid.size())
                .flat_map(|y| (0..grid.size()).map(move |x| (x, y)))
                .filter(|&(x, y)| grid.cell(x, y) == Some(piece.id()))
                .count();
            assert_eq!(count, CELLS_PER_PIECE, "piece {} not fully placed", piece.id());
            occupied += count;
        }
        let total = grid.render().chars().filter(|&c| c.is_ascii_uppercase()).count();
        assert_eq!(total, occupied);
    }

    #[test]
    fn test_ceil_sqrt() {
        let expected = [(0, 0), (1, 1), (2, 2), (4, 2), (5, 3), (8, 3), (9, 3), (10, 4), (16, 4)];
        for (n, root) in expected {
            assert_eq!(ceil_sqrt(n), root, "ceil_sqrt({n})");
        }
        for root in 1..200usize {
            assert_eq!(ceil_sqrt(root * root), root);
            assert_eq!(ceil_sqrt(root * root + 1), root + 1);
        }
    }

    #[test]
    fn test_size_bounds() {
        assert_eq!((minimum_size(0), maximum_size(0)), (0, 0));
        assert_eq!((minimum_size(1), maximum_size(1)), (2, 4));
        assert_eq!((minimum_size(2), maximum_size(2)), (3, 6));
        assert_eq!((minimum_size(4), maximum_size(4)), (4, 8));
        assert_eq!((minimum_size(26), maximum_size(26)), (11, 21));
    }

    #[test]
    fn test_order_by_footprint_is_stable() {
        let input = pieces(&["O", "I", "T", "O", "I_VERTICAL", "L"]);
        let ordered = order_by_footprint(&input);

        let ids: String = ordered.iter().map(Piece::id).collect();
        assert_eq!(ids, "BECFAD");
        // input sequence is untouched
        let unchanged: String = input.iter().map(Piece::id).collect();
        assert_eq!(unchanged, "ABCDEF");
    }

    #[test]
    fn test_solve_empty_succeeds_on_any_size() {
        for size in 0..4 {
            let mut grid = Grid::new(size);
            assert!(solve(&mut grid, &[]));
            assert_eq!(grid, Grid::new(size));
        }
    }

    #[test]
    fn test_solve_places_all_pieces() {
        let set = pieces(&["O", "I"]);
        let mut grid = Grid::new(4);

        assert!(solve(&mut grid, &set));
        assert_valid_packing(&grid, &set);
    }

    #[test]
    fn test_failed_solve_leaves_grid_empty() {
        let set = pieces(&["O", "O"]);
        let mut grid = Grid::new(3);

        assert!(!solve(&mut grid, &set));
        assert_eq!(grid, Grid::new(3));
    }

    #[test]
    fn test_piece_larger_than_grid() {
        let set = pieces(&["I"]);
        for size in 0..4 {
            assert!(!solve(&mut Grid::new(size), &set), "I fit in size {size}");
        }
    }

    #[test]
    fn test_single_o() {
        let packing = find_smallest_square(&pieces(&["O"]));
        assert_eq!(packing.grid.size(), 2);
        assert_eq!(packing.grid.render(), "AA\nAA\n");
    }

    #[test]
    fn test_single_i() {
        let packing = find_smallest_square(&pieces(&["I"]));
        assert_eq!(packing.grid.size(), 4);
    }

    #[test]
    fn test_two_o() {
        let set = pieces(&["O", "O"]);
        let packing = find_smallest_square(&set);

        assert_eq!(packing.grid.size(), 4);
        assert_eq!(packing.order, PieceOrder::Footprint);
        insta::assert_snapshot!(packing.grid.render(), @r"
        AABB
        AABB
        ....
        ....
        ");
    }

    #[test]
    fn test_footprint_order_places_longest_first() {
        let packing = find_smallest_square(&pieces(&["O", "I"]));

        assert_eq!(packing.order, PieceOrder::Footprint);
        insta::assert_snapshot!(packing.grid.render(), @r"
        BBBB
        AA..
        AA..
        ....
        ");
    }

    #[test]
    fn test_timeout_falls_back_to_input_order() {
        let solver = Solver::new(SolverConfig {
            time_budget: Duration::ZERO,
            check_interval: 1,
            footprint_ordering: true,
        });
        let packing = solver.find_smallest_square(&pieces(&["O", "I"]));

        assert_eq!(packing.order, PieceOrder::Input);
        insta::assert_snapshot!(packing.grid.render(), @r"
        AA..
        AA..
        BBBB
        ....
        ");
    }

    #[test]
    fn test_fallback_sticks_for_later_sizes() {
        // size 3 is infeasible and needs a third call, which times out;
        // size 4 would pack by footprint within two calls, so only a
        // remembered fallback keeps it in input order
        let solver = Solver::new(SolverConfig {
            time_budget: Duration::ZERO,
            check_interval: 3,
            footprint_ordering: true,
        });
        let packing = solver.find_smallest_square(&pieces(&["O", "T"]));

        assert_eq!(packing.order, PieceOrder::Input);
        insta::assert_snapshot!(packing.grid.render(), @r"
        AA..
        AA..
        BBB.
        .B..
        ");
    }

    #[test]
    fn test_footprint_packs_next_size_without_timeout() {
        let solver = Solver::new(SolverConfig {
            time_budget: Duration::from_secs(60),
            check_interval: 3,
            footprint_ordering: true,
        });
        let packing = solver.find_smallest_square(&pieces(&["O", "T"]));

        assert_eq!(packing.order, PieceOrder::Footprint);
        insta::assert_snapshot!(packing.grid.render(), @r"
        BBB.
        .BAA
        ..AA
        ....
        ");
    }

    #[test]
    fn test_clock_sampled_every_interval() {
        let mut search = Search::with_budget(Duration::ZERO, 4);
        let sampled: Vec<u32> = (1..=12).filter(|_| search.should_sample()).collect();
        assert_eq!(sampled, vec![4, 8, 12]);

        let mut every_call = Search::with_budget(Duration::ZERO, 1);
        assert!((0..5).all(|_| every_call.should_sample()));
    }

    #[test]
    fn test_expired_budget_unnoticed_between_samples() {
        let square = pieces(&["O"]);

        let mut sparse = Search::with_budget(Duration::ZERO, DEFAULT_CHECK_INTERVAL);
        assert_eq!(sparse.run(&mut Grid::new(2), &square), Outcome::Packed);

        let mut dense = Search::with_budget(Duration::ZERO, 1);
        assert_eq!(dense.run(&mut Grid::new(2), &square), Outcome::TimedOut);
    }

    #[test]
    fn test_zero_check_interval_is_clamped() {
        let solver = Solver::new(SolverConfig {
            time_budget: Duration::ZERO,
            check_interval: 0,
            footprint_ordering: true,
        });
        let packing = solver.find_smallest_square(&pieces(&["T"]));

        assert_eq!(packing.order, PieceOrder::Input);
        assert_eq!(packing.grid.size(), 3);
    }

    #[test]
    fn test_input_order_only() {
        let solver = Solver::new(SolverConfig {
            footprint_ordering: false,
            ..SolverConfig::default()
        });
        let packing = solver.find_smallest_square(&pieces(&["O", "I"]));

        assert_eq!(packing.order, PieceOrder::Input);
        assert_eq!(packing.grid.size(), 4);
    }

    #[test]
    fn test_empty_piece_set() {
        let packing = find_smallest_square(&[]);
        assert_eq!(packing.grid.size(), 0);
        assert_eq!(packing.grid.render(), "");
    }

    #[test]
    fn test_mixed_set_is_smallest() {
        let set = pieces(&["T", "O", "I", "L"]);
        let packing = find_smallest_square(&set);

        let size = packing.grid.size();
        assert!(size >= minimum_size(set.len()) && size <= maximum_size(set.len()));
        assert_valid_packing(&packing.grid, &set);
        // the packing must be optimal: one size down is infeasible
        assert!(!solve(&mut Grid::new(size - 1), &set));
    }

    #[test]
    fn test_perfect_fit() {
        let set = pieces(&["O", "O", "O", "O"]);
        let packing = find_smallest_square(&set);
        assert_eq!(packing.grid.size(), 4);
        assert!(!packing.grid.render().contains('.'));
    }

    #[test]
    fn test_result_within_bounds() {
        let names: Vec<&str> = TETROMINOES.iter().map(|(name, _)| *name).collect();
        for count in 1..=4 {
            let set: Vec<&str> = names.iter().cycle().skip(count).take(count).copied().collect();
            let set = pieces(&set);
            let packing = find_smallest_square(&set);
            let size = packing.grid.size();

            assert!(size >= minimum_size(count), "{count} pieces packed below minimum");
            assert!(size <= maximum_size(count), "{count} pieces packed above maximum");
            assert_valid_packing(&packing.grid, &set);
        }
    }

    #[test]
    fn test_existence_is_order_independent() {
        let names: Vec<&str> = TETROMINOES.iter().map(|(name, _)| *name).collect();

        for first in 0..names.len() {
            for second in first..names.len() {
                for third in second..names.len() {
                    let set = pieces(&[names[first], names[second], names[third]]);
                    let mut reversed = set.clone();
                    reversed.reverse();

                    for size in minimum_size(3)..=minimum_size(3) + 1 {
                        let forward = solve(&mut Grid::new(size), &set);
                        let backward = solve(&mut Grid::new(size), &reversed);
                        let footprint = solve(&mut Grid::new(size), &order_by_footprint(&set));
                        assert_eq!(forward, backward, "{set:?} at size {size}");
                        assert_eq!(forward, footprint, "{set:?} at size {size}");
                    }
                }
            }
        }
    }
}
