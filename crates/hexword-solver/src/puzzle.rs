use std::{collections::VecDeque, sync::Arc};

use hexword_core::{Alphabet, AlphabetError, CandidateGrid, HexGeometry, LineId, LineKind};
use hexword_pattern::Pattern;

use crate::{PuzzleError, SolverStats};

/// The row, column and diagonal patterns of a puzzle.
///
/// Rows are listed top to bottom and columns left to right. Diagonals are the
/// lines of constant `x - y`, listed in increasing order of `x - y`; each one is
/// read from its bottom-right end.
#[derive(Debug, Default, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct PuzzlePatterns {
    /// Row patterns.
    pub rows: Vec<String>,
    /// Column patterns.
    pub cols: Vec<String>,
    /// Diagonal patterns.
    pub diags: Vec<String>,
}

impl PuzzlePatterns {
    /// Creates a pattern triple from string slices.
    #[must_use]
    pub fn new(rows: &[&str], cols: &[&str], diags: &[&str]) -> Self {
        let owned = |patterns: &[&str]| patterns.iter().map(|&s| s.to_owned()).collect();
        Self {
            rows: owned(rows),
            cols: owned(cols),
            diags: owned(diags),
        }
    }

    fn by_kind(&self, kind: LineKind) -> &[String] {
        match kind {
            LineKind::Row => &self.rows,
            LineKind::Column => &self.cols,
            LineKind::Diagonal => &self.diags,
        }
    }
}

/// A puzzle as stored in a puzzle file.
///
/// # Examples
///
/// ```
/// use hexword_solver::{Puzzle, PuzzleDef};
///
/// let def: PuzzleDef = serde_json::from_str(
///     r#"{ "alphabet": "XY", "rows": ["X"], "cols": ["X"], "diags": ["X"], "answer": ["X"] }"#,
/// )
/// .unwrap();
/// let puzzle = Puzzle::from_def(&def)?;
/// assert!(def.answer_grid(&puzzle)?.is_some());
/// # Ok::<(), hexword_solver::PuzzleError>(())
/// ```
#[derive(Debug, Default, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct PuzzleDef {
    /// Symbols of the alphabet, in order. Defaults to `A` to `Z`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alphabet: Option<String>,
    /// The line patterns.
    #[serde(flatten)]
    pub patterns: PuzzlePatterns,
    /// The expected solution, one string per row.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub answer: Option<Vec<String>>,
}

impl PuzzleDef {
    /// Resolves the puzzle's alphabet.
    ///
    /// # Errors
    ///
    /// Returns [`AlphabetError`] if the listed symbols do not form a valid alphabet.
    pub fn alphabet(&self) -> Result<Alphabet, AlphabetError> {
        match &self.alphabet {
            Some(symbols) => symbols.parse(),
            None => Ok(Alphabet::uppercase()),
        }
    }

    /// Builds the expected solution of `puzzle`, if the definition has one.
    ///
    /// # Errors
    ///
    /// Returns [`PuzzleError::Answer`] if the answer rows do not fit the puzzle.
    pub fn answer_grid(&self, puzzle: &Puzzle) -> Result<Option<CandidateGrid>, PuzzleError> {
        let Some(rows) = &self.answer else {
            return Ok(None);
        };
        let grid = CandidateGrid::from_rows(
            Arc::clone(puzzle.geometry()),
            Arc::clone(puzzle.alphabet()),
            rows,
        )?;
        Ok(Some(grid))
    }
}

/// Outcome of propagating constraints to a fix point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::IsVariant)]
pub enum Propagation {
    /// Some cell has no candidates left.
    Contradiction,
    /// Every cell holds exactly one letter.
    Solved,
    /// Some cells still hold several letters.
    Undetermined,
}

/// A validated puzzle: its geometry and one parsed pattern per line.
///
/// # Examples
///
/// ```
/// use hexword_core::Position;
/// use hexword_solver::{Propagation, Puzzle, PuzzlePatterns, SolverStats};
///
/// let patterns = PuzzlePatterns::new(&["X"], &["X"], &["X"]);
/// let puzzle = Puzzle::new("XY".parse().unwrap(), &patterns)?;
///
/// let mut grid = puzzle.new_grid();
/// let mut stats = SolverStats::new();
/// assert_eq!(puzzle.propagate(&mut grid, &mut stats), Propagation::Solved);
/// assert_eq!(grid.cell_value(Position::new(0, 0)), Some('X'));
/// # Ok::<(), hexword_solver::PuzzleError>(())
/// ```
#[derive(Debug, Clone)]
pub struct Puzzle {
    geometry: Arc<HexGeometry>,
    alphabet: Arc<Alphabet>,
    patterns: Vec<Pattern>,
}

impl Puzzle {
    /// Builds a puzzle from its line patterns.
    ///
    /// The number of patterns of each kind is the grid size.
    ///
    /// # Errors
    ///
    /// - [`PuzzleError::DimensionMismatch`] if the pattern counts differ.
    /// - [`PuzzleError::Geometry`] if the count is not a valid hexagon size.
    /// - [`PuzzleError::MalformedPattern`] for the first pattern that fails to parse.
    pub fn new(alphabet: Alphabet, patterns: &PuzzlePatterns) -> Result<Self, PuzzleError> {
        let (rows, cols, diags) = (
            patterns.rows.len(),
            patterns.cols.len(),
            patterns.diags.len(),
        );
        if rows != cols || rows != diags {
            return Err(PuzzleError::DimensionMismatch { rows, cols, diags });
        }
        let geometry = Arc::new(HexGeometry::new(rows)?);
        let alphabet = Arc::new(alphabet);

        let patterns = geometry
            .lines()
            .iter()
            .map(|line| {
                let source = &patterns.by_kind(line.kind())[line.index()];
                Pattern::parse(source, &alphabet).map_err(|source| PuzzleError::MalformedPattern {
                    kind: line.kind(),
                    index: line.index(),
                    source,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            geometry,
            alphabet,
            patterns,
        })
    }

    /// Builds a puzzle from a puzzle file definition.
    ///
    /// # Errors
    ///
    /// Returns [`PuzzleError::Alphabet`] for an invalid alphabet, and otherwise
    /// the errors of [`Puzzle::new`].
    pub fn from_def(def: &PuzzleDef) -> Result<Self, PuzzleError> {
        Self::new(def.alphabet()?, &def.patterns)
    }

    /// Returns the grid geometry.
    #[must_use]
    pub fn geometry(&self) -> &Arc<HexGeometry> {
        &self.geometry
    }

    /// Returns the alphabet.
    #[must_use]
    pub fn alphabet(&self) -> &Arc<Alphabet> {
        &self.alphabet
    }

    /// Returns the number of rows, columns and diagonals.
    #[must_use]
    pub fn size(&self) -> usize {
        self.geometry.size()
    }

    /// Returns the pattern of a line.
    ///
    /// # Panics
    ///
    /// Panics if the line id does not belong to this puzzle.
    #[must_use]
    pub fn pattern(&self, line: LineId) -> &Pattern {
        &self.patterns[line.index()]
    }

    /// Returns a grid where every cell may hold every letter.
    #[must_use]
    pub fn new_grid(&self) -> CandidateGrid {
        CandidateGrid::new(Arc::clone(&self.geometry), Arc::clone(&self.alphabet))
    }

    /// Returns `true` if `grid` is solved and every line spells a word its pattern matches.
    ///
    /// This checks a candidate solution directly against the patterns, without
    /// going through propagation.
    #[must_use]
    pub fn is_solution(&self, grid: &CandidateGrid) -> bool {
        grid.is_solved()
            && self.geometry.line_ids().all(|line| {
                let word = grid
                    .line_view(line)
                    .into_iter()
                    .filter_map(|cell| cell.as_single())
                    .collect::<Vec<_>>();
                self.pattern(line).matches_word(&word)
            })
    }

    /// Narrows `grid` until no line pattern removes any more candidates.
    ///
    /// Lines wait in a FIFO queue, initially all of them in line order. Each
    /// dequeued line is narrowed by its pattern until it stops changing; every
    /// other line through a narrowed cell is queued again unless it is already
    /// waiting. Propagation stops early once a cell runs out of candidates.
    ///
    /// Propagating a grid that is already at its fix point changes nothing.
    pub fn propagate(&self, grid: &mut CandidateGrid, stats: &mut SolverStats) -> Propagation {
        stats.propagations += 1;

        let mut queue = self.geometry.line_ids().collect::<VecDeque<_>>();
        let mut queued = vec![true; queue.len()];
        while let Some(line) = queue.pop_front() {
            queued[line.index()] = false;
            let line_def = self.geometry.line(line);
            let pattern = self.pattern(line);

            loop {
                stats.line_evaluations += 1;
                let view = grid.line_view(line);
                let narrowed = pattern.narrow(&view);
                if narrowed == view {
                    break;
                }

                for ((&pos, before), after) in line_def.cells().iter().zip(view).zip(narrowed) {
                    if after == before {
                        continue;
                    }
                    grid.set_candidates(pos, after);
                    stats.narrowed_cells += 1;
                    if after.is_empty() {
                        log::trace!(
                            "{} {}: no match for /{pattern}/",
                            line_def.kind(),
                            line_def.index()
                        );
                        return Propagation::Contradiction;
                    }
                    for other in self.geometry.cell_lines(pos) {
                        if other != line && !queued[other.index()] {
                            queued[other.index()] = true;
                            queue.push_back(other);
                        }
                    }
                }
                log::trace!(
                    "{} {}: narrowed by /{pattern}/",
                    line_def.kind(),
                    line_def.index()
                );
            }
        }

        if let Err(err) = grid.check_consistency() {
            log::trace!("contradiction: {err}");
            Propagation::Contradiction
        } else if grid.is_solved() {
            Propagation::Solved
        } else {
            Propagation::Undetermined
        }
    }
}
