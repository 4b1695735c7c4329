//! Per-cell candidate tracking for a hexagonal grid.

use std::{collections::BTreeMap, fmt, sync::Arc};

use crate::{Alphabet, HexGeometry, Letter, LetterSet, LineId, Position};

/// Error reported when a cell has no candidates left.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("no candidates left at {position}")]
pub struct ConsistencyError {
    /// The first contradictory cell, in row-major order.
    pub position: Position,
}

/// Errors returned when building a grid from row strings.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum GridParseError {
    /// The number of rows differs from the grid size.
    #[display("expected {expected} rows, got {actual}")]
    RowCount {
        /// Rows in the geometry.
        expected: usize,
        /// Rows supplied.
        actual: usize,
    },
    /// A row has the wrong number of symbols.
    #[display("row {row} should have {expected} symbols, got {actual}")]
    RowLength {
        /// Row index.
        row: usize,
        /// Cells in the row.
        expected: usize,
        /// Symbols supplied.
        actual: usize,
    },
    /// A symbol is not part of the alphabet.
    #[display("symbol {symbol:?} in row {row} is not in the alphabet")]
    UnknownSymbol {
        /// Row index.
        row: usize,
        /// The offending symbol.
        symbol: char,
    },
}

/// Candidate letters for every cell of a hexagonal grid.
///
/// Each cell owns a [`LetterSet`] of letters not yet ruled out. A cell is
/// *contradictory* when its set is empty and *determined* when it holds exactly one
/// letter; the grid is *valid* when no cell is contradictory and *solved* when every
/// cell is determined.
///
/// Candidates are stored in a flat vector indexed by the geometry's dense cell index,
/// while the geometry and alphabet are shared, so cloning a grid to explore a search
/// branch copies only the candidate sets.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
///
/// use hexword_core::{Alphabet, CandidateGrid, HexGeometry, Position};
///
/// let geometry = Arc::new(HexGeometry::new(3)?);
/// let alphabet = Arc::new("AB".parse::<Alphabet>().unwrap());
/// let mut grid = CandidateGrid::new(geometry, alphabet.clone());
///
/// assert!(grid.is_valid());
/// assert!(!grid.is_solved());
///
/// let pos = Position::new(1, 1);
/// grid.place(pos, alphabet.letter('B').unwrap());
/// assert_eq!(grid.cell_value(pos), Some('B'));
/// # Ok::<(), hexword_core::GeometryError>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateGrid {
    geometry: Arc<HexGeometry>,
    alphabet: Arc<Alphabet>,
    cells: Vec<LetterSet>,
}

impl CandidateGrid {
    /// Creates a grid where every cell may hold every letter of the alphabet.
    #[must_use]
    pub fn new(geometry: Arc<HexGeometry>, alphabet: Arc<Alphabet>) -> Self {
        let cells = vec![alphabet.full(); geometry.cell_count()];
        Self {
            geometry,
            alphabet,
            cells,
        }
    }

    /// Builds a fully determined grid from one string per row.
    ///
    /// Row `y` lists its cells from left to right (ascending `x`).
    ///
    /// # Errors
    ///
    /// Returns a [`GridParseError`] if the rows do not fit the geometry or use
    /// symbols outside the alphabet.
    pub fn from_rows<S>(
        geometry: Arc<HexGeometry>,
        alphabet: Arc<Alphabet>,
        rows: &[S],
    ) -> Result<Self, GridParseError>
    where
        S: AsRef<str>,
    {
        if rows.len() != geometry.size() {
            return Err(GridParseError::RowCount {
                expected: geometry.size(),
                actual: rows.len(),
            });
        }
        let mut grid = Self::new(geometry, alphabet);
        for (y, row) in rows.iter().enumerate() {
            let row = row.as_ref();
            let line = grid.geometry.line(LineId::new(y)).cells().to_vec();
            let actual = row.chars().count();
            if actual != line.len() {
                return Err(GridParseError::RowLength {
                    row: y,
                    expected: line.len(),
                    actual,
                });
            }
            for (pos, symbol) in line.into_iter().zip(row.chars()) {
                let letter = grid
                    .alphabet
                    .letter(symbol)
                    .ok_or(GridParseError::UnknownSymbol { row: y, symbol })?;
                grid.place(pos, letter);
            }
        }
        Ok(grid)
    }

    /// Returns the shared geometry.
    #[must_use]
    pub fn geometry(&self) -> &Arc<HexGeometry> {
        &self.geometry
    }

    /// Returns the shared alphabet.
    #[must_use]
    pub fn alphabet(&self) -> &Arc<Alphabet> {
        &self.alphabet
    }

    /// Returns the candidate sets of all cells, in row-major order.
    ///
    /// Two grids over the same geometry hold the same assignment exactly when these
    /// slices are equal.
    #[must_use]
    pub fn cells(&self) -> &[LetterSet] {
        &self.cells
    }

    #[track_caller]
    fn index(&self, pos: Position) -> usize {
        let Some(i) = self.geometry.cell_index_of(pos) else {
            panic!("position {pos} is outside the hexagon");
        };
        i
    }

    /// Returns the candidates of a cell.
    ///
    /// # Panics
    ///
    /// Panics if the position lies outside the hexagon.
    #[must_use]
    #[track_caller]
    pub fn candidates_at(&self, pos: Position) -> LetterSet {
        self.cells[self.index(pos)]
    }

    /// Replaces the candidates of a cell. Returns `true` if they changed.
    ///
    /// # Panics
    ///
    /// Panics if the position lies outside the hexagon.
    #[track_caller]
    pub fn set_candidates(&mut self, pos: Position, candidates: LetterSet) -> bool {
        let i = self.index(pos);
        let changed = self.cells[i] != candidates;
        self.cells[i] = candidates;
        changed
    }

    /// Fixes a cell to a single letter. Returns `true` if the cell changed.
    ///
    /// # Panics
    ///
    /// Panics if the position lies outside the hexagon.
    #[track_caller]
    pub fn place(&mut self, pos: Position, letter: Letter) -> bool {
        self.set_candidates(pos, LetterSet::from_elem(letter))
    }

    /// Returns the current candidates of a line's cells, in line order.
    ///
    /// # Panics
    ///
    /// Panics if the line id does not belong to the grid's geometry.
    #[must_use]
    pub fn line_view(&self, line: LineId) -> Vec<LetterSet> {
        self.geometry
            .line(line)
            .cells()
            .iter()
            .map(|&pos| self.candidates_at(pos))
            .collect()
    }

    /// Returns `true` if no cell is contradictory.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.cells.iter().all(|c| !c.is_empty())
    }

    /// Returns `true` if every cell holds exactly one candidate.
    #[must_use]
    pub fn is_solved(&self) -> bool {
        self.cells.iter().all(|c| c.len() == 1)
    }

    /// Checks that no cell is contradictory.
    ///
    /// # Errors
    ///
    /// Returns [`ConsistencyError`] naming the first empty cell.
    pub fn check_consistency(&self) -> Result<(), ConsistencyError> {
        match self.cells.iter().position(|c| c.is_empty()) {
            Some(i) => Err(ConsistencyError {
                position: self.geometry.positions()[i],
            }),
            None => Ok(()),
        }
    }

    /// Returns the letter of a determined cell, or `None` while it is undetermined
    /// or contradictory.
    ///
    /// # Panics
    ///
    /// Panics if the position lies outside the hexagon.
    #[must_use]
    #[track_caller]
    pub fn cell_value(&self, pos: Position) -> Option<char> {
        self.candidates_at(pos)
            .as_single()
            .map(|letter| self.alphabet.symbol(letter))
    }

    /// Returns the positions of cells with more than one candidate, in row-major order.
    pub fn undetermined_cells(&self) -> impl Iterator<Item = (Position, LetterSet)> + '_ {
        self.geometry
            .positions()
            .iter()
            .zip(&self.cells)
            .filter(|(_, c)| c.len() > 1)
            .map(|(&pos, &c)| (pos, c))
    }

    /// Returns a snapshot mapping each cell to its candidate symbols in letter order.
    #[must_use]
    pub fn as_letter_sets(&self) -> BTreeMap<Position, Vec<char>> {
        self.geometry
            .positions()
            .iter()
            .zip(&self.cells)
            .map(|(&pos, &c)| (pos, self.alphabet.symbols_of(c)))
            .collect()
    }

    /// Returns the rows as strings, or `None` unless the grid is solved.
    #[must_use]
    pub fn to_rows(&self) -> Option<Vec<String>> {
        (0..self.geometry.size())
            .map(|y| {
                self.geometry
                    .line(LineId::new(y))
                    .cells()
                    .iter()
                    .map(|&pos| self.cell_value(pos))
                    .collect::<Option<String>>()
            })
            .collect()
    }
}

/// Renders the hexagonal dump: undetermined cells show their candidate count,
/// determined cells `-X`, and contradictory cells `XX`.
impl fmt::Display for CandidateGrid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let size = self.geometry.size();
        let hang = self.geometry.hang();
        for y in 0..size {
            let indent = hang.abs_diff(y);
            let start = y.saturating_sub(hang);
            write!(f, "{:width$}", "", width = indent * 2)?;
            for x in start..size {
                let pos = Position::new(
                    u8::try_from(x).map_err(|_| fmt::Error)?,
                    u8::try_from(y).map_err(|_| fmt::Error)?,
                );
                match self.geometry.cell_index_of(pos).map(|i| self.cells[i]) {
                    Some(c) if c.len() > 1 => write!(f, "{:02}", c.len())?,
                    Some(c) => match c.as_single() {
                        Some(letter) => write!(f, "-{}", self.alphabet.symbol(letter))?,
                        None => write!(f, "XX")?,
                    },
                    None => write!(f, "  ")?,
                }
                write!(f, "  ")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid(size: usize, symbols: &str) -> CandidateGrid {
        CandidateGrid::new(
            Arc::new(HexGeometry::new(size).unwrap()),
            Arc::new(symbols.parse().unwrap()),
        )
    }

    #[test]
    fn test_new_grid_is_full() {
        let g = grid(5, "ABC");
        assert_eq!(g.cells().len(), 19);
        assert!(g.cells().iter().all(|&c| c == LetterSet::full(3)));
        assert!(g.is_valid());
        assert!(!g.is_solved());
        assert_eq!(g.undetermined_cells().count(), 19);
    }

    #[test]
    fn test_set_candidates_reports_change() {
        let mut g = grid(3, "ABC");
        let pos = Position::new(1, 1);
        let a = LetterSet::from_elem(Letter::new(0));
        assert!(g.set_candidates(pos, a));
        assert!(!g.set_candidates(pos, a));
        assert_eq!(g.cell_value(pos), Some('A'));
    }

    #[test]
    fn test_consistency() {
        let mut g = grid(3, "AB");
        assert_eq!(g.check_consistency(), Ok(()));
        g.set_candidates(Position::new(2, 2), LetterSet::EMPTY);
        assert!(!g.is_valid());
        assert_eq!(
            g.check_consistency(),
            Err(ConsistencyError {
                position: Position::new(2, 2)
            })
        );
        assert_eq!(g.cell_value(Position::new(2, 2)), None);
    }

    #[test]
    fn test_clone_is_independent() {
        let g = grid(3, "AB");
        let mut h = g.clone();
        h.place(Position::new(0, 0), Letter::new(1));
        assert_eq!(g.candidates_at(Position::new(0, 0)).len(), 2);
        assert_eq!(h.cell_value(Position::new(0, 0)), Some('B'));
    }

    #[test]
    fn test_from_rows_and_back() {
        let geometry = Arc::new(HexGeometry::new(3).unwrap());
        let alphabet = Arc::new("AB".parse::<Alphabet>().unwrap());
        let rows = ["AB", "BAB", "AA"];
        let g = CandidateGrid::from_rows(geometry.clone(), alphabet.clone(), &rows).unwrap();
        assert!(g.is_solved());
        assert_eq!(g.cell_value(Position::new(2, 1)), Some('B'));
        assert_eq!(g.cell_value(Position::new(1, 2)), Some('A'));
        assert_eq!(g.to_rows().unwrap(), rows);

        let diagonal = geometry.line(geometry.line_id(crate::LineKind::Diagonal, 1));
        let letters = diagonal
            .cells()
            .iter()
            .map(|&pos| g.cell_value(pos).unwrap())
            .collect::<String>();
        assert_eq!(letters, "AAA");
    }

    #[test]
    fn test_from_rows_errors() {
        let geometry = Arc::new(HexGeometry::new(3).unwrap());
        let alphabet = Arc::new("AB".parse::<Alphabet>().unwrap());
        let build = |rows: &[&str]| CandidateGrid::from_rows(geometry.clone(), alphabet.clone(), rows);

        assert_eq!(
            build(&["AB", "BAB"]),
            Err(GridParseError::RowCount {
                expected: 3,
                actual: 2
            })
        );
        assert_eq!(
            build(&["AB", "BA", "AA"]),
            Err(GridParseError::RowLength {
                row: 1,
                expected: 3,
                actual: 2
            })
        );
        assert_eq!(
            build(&["AB", "BAC", "AA"]),
            Err(GridParseError::UnknownSymbol {
                row: 1,
                symbol: 'C'
            })
        );
    }

    #[test]
    fn test_as_letter_sets() {
        let mut g = grid(1, "XY");
        let sets = g.as_letter_sets();
        assert_eq!(sets[&Position::new(0, 0)], vec!['X', 'Y']);
        g.place(Position::new(0, 0), Letter::new(0));
        assert_eq!(g.as_letter_sets()[&Position::new(0, 0)], vec!['X']);
    }

    #[test]
    fn test_display_dump() {
        let mut g = grid(3, "ABC");
        g.place(Position::new(1, 1), Letter::new(1));
        g.set_candidates(Position::new(2, 2), LetterSet::EMPTY);
        let expected = "  03  03      \n03  -B  03  \n  03  XX  \n";
        assert_eq!(g.to_string(), expected);
    }
}
