//! Test harness for puzzles.
//!
//! [`PuzzleTester`] builds a small puzzle, lets a test narrow its grid step by
//! step, and checks the outcome of propagation and search.
//!
//! ```ignore
//! PuzzleTester::new("XY", &["X"], &["X"], &["X"])
//!     .propagate()
//!     .assert_outcome(Propagation::Solved)
//!     .assert_solutions(&[&["X"]]);
//! ```

use std::sync::Arc;

use hexword_core::{CandidateGrid, Position};

use crate::{BacktrackSolver, Propagation, Puzzle, PuzzlePatterns, SolverStats};

/// A fluent harness around a puzzle and a working grid.
///
/// All methods return `self`, so checks chain. Assertions panic with
/// `#[track_caller]` locations.
#[derive(Debug)]
pub struct PuzzleTester {
    puzzle: Arc<Puzzle>,
    grid: CandidateGrid,
    outcome: Option<Propagation>,
    stats: SolverStats,
}

impl PuzzleTester {
    /// Builds a puzzle over `alphabet` with a fresh grid.
    ///
    /// # Panics
    ///
    /// Panics if the alphabet or the patterns are invalid.
    #[track_caller]
    pub fn new(alphabet: &str, rows: &[&str], cols: &[&str], diags: &[&str]) -> Self {
        let patterns = PuzzlePatterns::new(rows, cols, diags);
        let puzzle = Puzzle::new(alphabet.parse().unwrap(), &patterns).unwrap();
        let grid = puzzle.new_grid();
        Self {
            puzzle: Arc::new(puzzle),
            grid,
            outcome: None,
            stats: SolverStats::new(),
        }
    }

    /// Fixes a cell of the working grid to `symbol`.
    ///
    /// # Panics
    ///
    /// Panics if `symbol` is not in the alphabet.
    #[track_caller]
    pub fn place(mut self, pos: Position, symbol: char) -> Self {
        let letter = self.puzzle.alphabet().letter(symbol).unwrap();
        self.grid.place(pos, letter);
        self
    }

    /// Propagates the working grid to its fix point.
    #[track_caller]
    pub fn propagate(mut self) -> Self {
        self.outcome = Some(self.puzzle.propagate(&mut self.grid, &mut self.stats));
        self
    }

    /// Asserts the outcome of the last [`propagate`](Self::propagate).
    ///
    /// # Panics
    ///
    /// Panics if the grid was not propagated or the outcome differs.
    #[track_caller]
    pub fn assert_outcome(self, expected: Propagation) -> Self {
        let Some(outcome) = self.outcome else {
            panic!("Expected propagation outcome {expected:?}, but the grid was never propagated");
        };
        assert_eq!(
            outcome, expected,
            "Unexpected propagation outcome, grid is:\n{}",
            self.grid
        );
        self
    }

    /// Asserts the candidates of a cell, given as symbols in alphabet order.
    ///
    /// # Panics
    ///
    /// Panics if the candidates differ.
    #[track_caller]
    pub fn assert_candidates(self, pos: Position, expected: &str) -> Self {
        let actual = self
            .grid
            .candidates_at(pos)
            .display(self.puzzle.alphabet())
            .to_string();
        assert_eq!(
            actual,
            format!("{{{expected}}}"),
            "Unexpected candidates at {pos}"
        );
        self
    }

    /// Searches the working grid and asserts the set of solutions.
    ///
    /// Each solution is given as its rows. Both the lazy and the parallel search
    /// must find exactly these solutions, each of which must pass
    /// [`Puzzle::is_solution`] and stay unchanged when propagated again.
    ///
    /// # Panics
    ///
    /// Panics if the solutions differ.
    #[track_caller]
    pub fn assert_solutions(mut self, expected: &[&[&str]]) -> Self {
        let solver = BacktrackSolver::new();

        let mut solutions = solver.solutions_from(&self.puzzle, self.grid.clone());
        let lazy = solutions.by_ref().collect::<Vec<_>>();
        let (parallel, parallel_stats) = solver.solve_parallel_from(&self.puzzle, self.grid.clone());
        assert_eq!(
            parallel_stats,
            *solutions.stats(),
            "Expected lazy and parallel search to agree on statistics"
        );

        for grid in &lazy {
            assert!(
                self.puzzle.is_solution(grid),
                "Expected a valid solution, got:\n{grid}"
            );
            let mut again = grid.clone();
            let outcome = self.puzzle.propagate(&mut again, &mut SolverStats::new());
            assert_eq!(outcome, Propagation::Solved);
            assert_eq!(again.cells(), grid.cells(), "Solution changed when propagated");
        }

        let mut expected = expected
            .iter()
            .map(|rows| rows.iter().map(|&row| row.to_owned()).collect::<Vec<_>>())
            .collect::<Vec<_>>();
        expected.sort();
        for (name, grids) in [("lazy", &lazy), ("parallel", &parallel)] {
            let mut actual = grids
                .iter()
                .map(|grid| grid.to_rows().unwrap())
                .collect::<Vec<_>>();
            actual.sort();
            assert_eq!(actual, expected, "Unexpected {name} solutions");
        }

        self.stats.merge(solutions.stats());
        self
    }

    /// Asserts that the search finds exactly the grids that pass
    /// [`Puzzle::is_solution`] among every assignment of the working grid's
    /// candidates.
    ///
    /// Only usable on small grids: every assignment is tried.
    ///
    /// # Panics
    ///
    /// Panics if the solution sets differ.
    #[track_caller]
    pub fn assert_exhaustive(self) -> Self {
        let expected = self.exhaustive_solutions();
        let mut actual = BacktrackSolver::new()
            .solutions_from(&self.puzzle, self.grid.clone())
            .map(|grid| grid.to_rows().unwrap())
            .collect::<Vec<_>>();
        actual.sort();
        assert_eq!(
            actual, expected,
            "Search disagrees with trying every assignment of:\n{}",
            self.grid
        );
        self
    }

    fn exhaustive_solutions(&self) -> Vec<Vec<String>> {
        let choices = self
            .grid
            .cells()
            .iter()
            .map(|cell| cell.iter().collect::<Vec<_>>())
            .collect::<Vec<_>>();
        let mut found = Vec::new();
        if choices.iter().any(Vec::is_empty) {
            return found;
        }

        let positions = self.puzzle.geometry().positions();
        let mut digits = vec![0; choices.len()];
        loop {
            let mut grid = self.grid.clone();
            for ((&pos, options), &digit) in positions.iter().zip(&choices).zip(&digits) {
                grid.place(pos, options[digit]);
            }
            if self.puzzle.is_solution(&grid) {
                found.push(grid.to_rows().unwrap());
            }

            let Some(i) = digits
                .iter()
                .zip(&choices)
                .rposition(|(&digit, options)| digit + 1 < options.len())
            else {
                break;
            };
            digits[i] += 1;
            digits[i + 1..].fill(0);
        }
        found.sort();
        found
    }

    /// Runs checks against the statistics collected so far.
    #[track_caller]
    pub fn assert_stats<F>(self, check: F) -> Self
    where
        F: FnOnce(&SolverStats),
    {
        check(&self.stats);
        self
    }
}
