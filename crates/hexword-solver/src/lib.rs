//! Constraint propagation and backtracking search for hexagonal regex crosswords.
//!
//! A [`Puzzle`] pairs a [`HexGeometry`](hexword_core::HexGeometry) with one
//! [`Pattern`](hexword_pattern::Pattern) per line. Solving alternates two steps:
//!
//! 1. [`Puzzle::propagate`] narrows every line by its pattern until nothing
//!    changes, re-checking the crossing lines of every narrowed cell.
//! 2. When cells remain undetermined, [`BacktrackSolver`] picks one, tries each of
//!    its letters on a copy of the grid, and propagates again.
//!
//! Solutions are produced lazily by [`Solutions`] or all at once, in parallel,
//! by [`BacktrackSolver::solve_parallel`].
//!
//! # Examples
//!
//! ```
//! use hexword_solver::{PuzzlePatterns, solve};
//!
//! let patterns = PuzzlePatterns::new(
//!     &["A.", "B.A", "C."],
//!     &["AB", "XBC", ".*"],
//!     &[".*", "CB.", ".*"],
//! );
//! let solutions = solve(&patterns)?
//!     .map(|grid| grid.to_rows().unwrap())
//!     .collect::<Vec<_>>();
//! assert_eq!(solutions, vec![vec!["AX", "BBA", "CC"]]);
//! # Ok::<(), hexword_solver::PuzzleError>(())
//! ```

pub use self::{backtrack_solver::*, error::*, puzzle::*};

mod backtrack_solver;
mod error;
mod puzzle;

#[cfg(test)]
mod testing;
