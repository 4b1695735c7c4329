use std::{collections::HashSet, sync::Arc};

use hexword_core::{Alphabet, CandidateGrid, Letter, LetterSet, Position};
use rayon::prelude::*;

use crate::{Propagation, Puzzle, PuzzleError, PuzzlePatterns};

/// Counters collected while propagating and searching.
///
/// # Examples
///
/// ```
/// use hexword_solver::{PuzzlePatterns, solve};
///
/// let patterns = PuzzlePatterns::new(&["X|Y"], &[".*"], &[".*"]);
/// let mut solutions = solve(&patterns)?;
/// let found = solutions.by_ref().count();
///
/// let stats = solutions.stats();
/// assert_eq!(found, 2);
/// assert_eq!(stats.solutions(), 2);
/// assert_eq!(stats.branches(), 1);
/// # Ok::<(), hexword_solver::PuzzleError>(())
/// ```
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SolverStats {
    pub(crate) propagations: usize,
    pub(crate) line_evaluations: usize,
    pub(crate) narrowed_cells: usize,
    pub(crate) branches: usize,
    pub(crate) dead_ends: usize,
    pub(crate) solutions: usize,
}

impl SolverStats {
    /// Creates a new empty statistics object.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of propagation runs.
    #[must_use]
    pub fn propagations(&self) -> usize {
        self.propagations
    }

    /// Returns the number of times a line was matched against its pattern.
    #[must_use]
    pub fn line_evaluations(&self) -> usize {
        self.line_evaluations
    }

    /// Returns the number of cell narrowings written back to grids.
    #[must_use]
    pub fn narrowed_cells(&self) -> usize {
        self.narrowed_cells
    }

    /// Returns the number of cells the search branched on.
    #[must_use]
    pub fn branches(&self) -> usize {
        self.branches
    }

    /// Returns the number of search branches abandoned after a contradiction.
    #[must_use]
    pub fn dead_ends(&self) -> usize {
        self.dead_ends
    }

    /// Returns the number of distinct solutions found.
    #[must_use]
    pub fn solutions(&self) -> usize {
        self.solutions
    }

    /// Returns `true` if any search branch was needed.
    #[must_use]
    pub fn has_branched(&self) -> bool {
        self.branches > 0
    }

    /// Adds the counters of `other` to `self`.
    pub fn merge(&mut self, other: &Self) {
        self.propagations += other.propagations;
        self.line_evaluations += other.line_evaluations;
        self.narrowed_cells += other.narrowed_cells;
        self.branches += other.branches;
        self.dead_ends += other.dead_ends;
        self.solutions += other.solutions;
    }
}

/// How the search picks the cell to branch on once propagation stalls.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum BranchPolicy {
    /// The first undetermined cell in row-major order.
    FirstUndetermined,
    /// The undetermined cell with the fewest candidates, the first one on ties.
    #[default]
    FewestCandidates,
}

impl BranchPolicy {
    fn select(self, grid: &CandidateGrid) -> Option<(Position, LetterSet)> {
        let mut cells = grid.undetermined_cells();
        match self {
            Self::FirstUndetermined => cells.next(),
            Self::FewestCandidates => cells.min_by_key(|(_, candidates)| candidates.len()),
        }
    }
}

/// A depth-first search that enumerates every solution of a puzzle.
///
/// Each search node propagates its grid to a fix point. A contradictory grid
/// is dropped and a solved grid is reported. Otherwise the solver picks a cell
/// according to its [`BranchPolicy`] and explores one copy of the grid per
/// candidate of that cell, in ascending letter order.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
///
/// use hexword_solver::{BacktrackSolver, BranchPolicy, Puzzle, PuzzlePatterns};
///
/// let patterns = PuzzlePatterns::new(&["[XY]"], &[".*"], &[".*"]);
/// let puzzle = Arc::new(Puzzle::new("XYZ".parse().unwrap(), &patterns)?);
///
/// let solver = BacktrackSolver::new().with_branch_policy(BranchPolicy::FirstUndetermined);
/// let rows = solver
///     .solutions(&puzzle)
///     .map(|grid| grid.to_rows().unwrap())
///     .collect::<Vec<_>>();
/// assert_eq!(rows, vec![vec!["X"], vec!["Y"]]);
///
/// let (grids, stats) = solver.solve_parallel(&puzzle);
/// assert_eq!(grids.len(), 2);
/// assert_eq!(stats.solutions(), 2);
/// # Ok::<(), hexword_solver::PuzzleError>(())
/// ```
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct BacktrackSolver {
    branch_policy: BranchPolicy,
}

impl BacktrackSolver {
    /// Creates a solver with the default branch policy.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a copy of the solver using `branch_policy`.
    #[must_use]
    pub fn with_branch_policy(mut self, branch_policy: BranchPolicy) -> Self {
        self.branch_policy = branch_policy;
        self
    }

    /// Returns the branch policy.
    #[must_use]
    pub fn branch_policy(&self) -> BranchPolicy {
        self.branch_policy
    }

    /// Returns a lazy iterator over all solutions of `puzzle`.
    #[must_use]
    pub fn solutions(&self, puzzle: &Arc<Puzzle>) -> Solutions {
        self.solutions_from(puzzle, puzzle.new_grid())
    }

    /// Returns a lazy iterator over all solutions reachable from `grid`.
    ///
    /// `grid` may already be partially narrowed, for example by placed letters.
    #[must_use]
    pub fn solutions_from(&self, puzzle: &Arc<Puzzle>, grid: CandidateGrid) -> Solutions {
        Solutions {
            puzzle: Arc::clone(puzzle),
            branch_policy: self.branch_policy,
            stack: vec![grid],
            seen: HashSet::new(),
            stats: SolverStats::new(),
        }
    }

    /// Finds all solutions of `puzzle`, exploring branches in parallel.
    ///
    /// The result holds the same solutions in the same order as
    /// [`solutions`](Self::solutions).
    #[must_use]
    pub fn solve_parallel(&self, puzzle: &Puzzle) -> (Vec<CandidateGrid>, SolverStats) {
        self.solve_parallel_from(puzzle, puzzle.new_grid())
    }

    /// Finds all solutions reachable from `grid`, exploring branches in parallel.
    #[must_use]
    pub fn solve_parallel_from(
        &self,
        puzzle: &Puzzle,
        grid: CandidateGrid,
    ) -> (Vec<CandidateGrid>, SolverStats) {
        let (grids, mut stats) = self.search_parallel(puzzle, grid);
        let mut seen = HashSet::new();
        let solutions = grids
            .into_iter()
            .filter(|grid| seen.insert(grid.cells().to_vec()))
            .collect::<Vec<_>>();
        stats.solutions = solutions.len();
        log::debug!(
            "parallel search found {} solutions after {} branches",
            solutions.len(),
            stats.branches
        );
        (solutions, stats)
    }

    fn search_parallel(
        &self,
        puzzle: &Puzzle,
        mut grid: CandidateGrid,
    ) -> (Vec<CandidateGrid>, SolverStats) {
        let mut stats = SolverStats::new();
        match puzzle.propagate(&mut grid, &mut stats) {
            Propagation::Contradiction => {
                stats.dead_ends += 1;
                (Vec::new(), stats)
            }
            Propagation::Solved => (vec![grid], stats),
            Propagation::Undetermined => {
                let Some((pos, candidates)) = self.branch_policy.select(&grid) else {
                    return (Vec::new(), stats);
                };
                stats.branches += 1;
                let letters = candidates.iter().collect::<Vec<Letter>>();
                let (grids, branch_stats) = letters
                    .into_par_iter()
                    .map(|letter| {
                        let mut child = grid.clone();
                        child.place(pos, letter);
                        self.search_parallel(puzzle, child)
                    })
                    .reduce(
                        || (Vec::new(), SolverStats::new()),
                        |(mut grids, mut stats), (more, more_stats)| {
                            grids.extend(more);
                            stats.merge(&more_stats);
                            (grids, stats)
                        },
                    );
                stats.merge(&branch_stats);
                (grids, stats)
            }
        }
    }
}

/// Lazy iterator over the solutions of a puzzle.
///
/// Created by [`BacktrackSolver::solutions`]. Solutions are yielded in
/// depth-first order and each distinct grid is yielded once.
#[derive(Debug, Clone)]
pub struct Solutions {
    puzzle: Arc<Puzzle>,
    branch_policy: BranchPolicy,
    stack: Vec<CandidateGrid>,
    seen: HashSet<Vec<LetterSet>>,
    stats: SolverStats,
}

impl Solutions {
    /// Returns the statistics collected so far.
    #[must_use]
    pub fn stats(&self) -> &SolverStats {
        &self.stats
    }
}

impl Iterator for Solutions {
    type Item = CandidateGrid;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(mut grid) = self.stack.pop() {
            match self.puzzle.propagate(&mut grid, &mut self.stats) {
                Propagation::Contradiction => self.stats.dead_ends += 1,
                Propagation::Solved => {
                    if self.seen.insert(grid.cells().to_vec()) {
                        self.stats.solutions += 1;
                        log::debug!(
                            "solution #{} found after {} branches",
                            self.stats.solutions,
                            self.stats.branches
                        );
                        return Some(grid);
                    }
                }
                Propagation::Undetermined => {
                    let Some((pos, candidates)) = self.branch_policy.select(&grid) else {
                        continue;
                    };
                    self.stats.branches += 1;
                    log::debug!("branching on {pos} over {} candidates", candidates.len());
                    // Pushed in reverse so the smallest letter is explored first.
                    for letter in candidates.iter().rev() {
                        let mut child = grid.clone();
                        child.place(pos, letter);
                        self.stack.push(child);
                    }
                }
            }
        }
        None
    }
}

/// Solves a puzzle over the uppercase alphabet `A` to `Z`.
///
/// # Errors
///
/// Returns [`PuzzleError`] if the pattern counts differ, do not describe a
/// hexagon, or some pattern is malformed.
///
/// # Examples
///
/// ```
/// use hexword_core::Position;
/// use hexword_solver::{PuzzlePatterns, solve};
///
/// let patterns = PuzzlePatterns::new(&["Q"], &["[PQ]"], &[".*"]);
/// let solutions = solve(&patterns)?.collect::<Vec<_>>();
/// assert_eq!(solutions.len(), 1);
/// assert_eq!(solutions[0].cell_value(Position::new(0, 0)), Some('Q'));
/// # Ok::<(), hexword_solver::PuzzleError>(())
/// ```
pub fn solve(patterns: &PuzzlePatterns) -> Result<Solutions, PuzzleError> {
    let puzzle = Puzzle::new(Alphabet::uppercase(), patterns)?;
    Ok(BacktrackSolver::new().solutions(&Arc::new(puzzle)))
}
