//! Hexagonal grid geometry: which cells exist and which lines pass through them.
//!
//! A puzzle of size `n` (odd) is a hexagon with `n` rows, `n` columns and `n`
//! diagonals. With `h = n / 2`, row `y` covers the columns
//! `max(0, y - h) .. min(n, y + h + 1)`, column `x` covers the rows
//! `max(0, x - h) .. min(n, x + h + 1)`, and each diagonal runs from the bottom or
//! right edge towards the top-left. Every cell lies on exactly one line of each kind.
//!
//! # Examples
//!
//! ```
//! use hexword_core::{HexGeometry, LineKind, Position};
//!
//! let geometry = HexGeometry::new(3)?;
//! assert_eq!(geometry.cell_count(), 7);
//! assert_eq!(geometry.lines().len(), 9);
//!
//! let row = geometry.line(geometry.line_id(LineKind::Row, 0));
//! assert_eq!(row.cells(), &[Position::new(0, 0), Position::new(1, 0)]);
//! # Ok::<(), hexword_core::GeometryError>(())
//! ```

use std::fmt;

use crate::Position;

/// Errors returned when a grid size has no consistent hexagonal geometry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum GeometryError {
    /// The size is zero.
    #[display("grid size must be at least 1")]
    Empty,
    /// The size is even; rows, columns and diagonals would not cover the same cells.
    #[display("grid size must be odd, got {size}")]
    EvenSize {
        /// The requested size.
        size: usize,
    },
    /// The size exceeds [`HexGeometry::MAX_SIZE`].
    #[display("grid size {size} exceeds the maximum of {}", HexGeometry::MAX_SIZE)]
    TooLarge {
        /// The requested size.
        size: usize,
    },
}

/// The direction of a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, derive_more::Display)]
pub enum LineKind {
    /// A line of constant `y`.
    #[display("row")]
    Row,
    /// A line of constant `x`.
    #[display("column")]
    Column,
    /// A line along which `x - y` is constant.
    #[display("diagonal")]
    Diagonal,
}

impl LineKind {
    /// All line kinds, in global line order.
    pub const ALL: [Self; 3] = [Self::Row, Self::Column, Self::Diagonal];
}

/// Global index of a line within a [`HexGeometry`].
///
/// Rows come first, then columns, then diagonals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct LineId(usize);

impl LineId {
    /// Creates a line id from its global index.
    #[must_use]
    pub const fn new(index: usize) -> Self {
        Self(index)
    }

    /// Returns the global index.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for LineId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}", self.0)
    }
}

/// An ordered sequence of cells constrained by one pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Line {
    kind: LineKind,
    index: usize,
    cells: Vec<Position>,
}

impl Line {
    /// Returns the direction of the line.
    #[must_use]
    pub fn kind(&self) -> LineKind {
        self.kind
    }

    /// Returns the index of the line among the lines of its kind.
    #[must_use]
    pub fn index(&self) -> usize {
        self.index
    }

    /// Returns the cells of the line, in pattern order.
    #[must_use]
    pub fn cells(&self) -> &[Position] {
        &self.cells
    }

    /// Returns the number of cells.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Returns `true` if the line has no cells.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

/// The lines and cells of a hexagonal grid of a given size.
///
/// Cells are addressed by a dense index, assigned in row-major order, so that
/// per-cell data can live in a flat vector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HexGeometry {
    size: usize,
    lines: Vec<Line>,
    /// `size * size` entries mapping `y * size + x` to a dense cell index.
    cell_index: Vec<Option<usize>>,
    positions: Vec<Position>,
    cell_lines: Vec<[LineId; 3]>,
}

impl HexGeometry {
    /// Largest supported size.
    pub const MAX_SIZE: usize = 255;

    /// Derives the geometry of a hexagon with `size` rows, columns and diagonals.
    ///
    /// # Errors
    ///
    /// Returns a [`GeometryError`] if `size` is zero, even, or larger than
    /// [`Self::MAX_SIZE`].
    pub fn new(size: usize) -> Result<Self, GeometryError> {
        if size == 0 {
            return Err(GeometryError::Empty);
        }
        if size > Self::MAX_SIZE {
            return Err(GeometryError::TooLarge { size });
        }
        if size % 2 == 0 {
            return Err(GeometryError::EvenSize { size });
        }

        let h = size / 2;
        let mut lines = Vec::with_capacity(size * 3);
        for y in 0..size {
            let cells = (y.saturating_sub(h)..size.min(y + h + 1))
                .map(|x| pos(x, y))
                .collect();
            lines.push(Line {
                kind: LineKind::Row,
                index: y,
                cells,
            });
        }
        for x in 0..size {
            let cells = (x.saturating_sub(h)..size.min(x + h + 1))
                .map(|y| pos(x, y))
                .collect();
            lines.push(Line {
                kind: LineKind::Column,
                index: x,
                cells,
            });
        }
        for i in 0..size {
            let (length, start_x, start_y) = if i < h {
                let length = size - h + i;
                (length, length - 1, size - 1)
            } else {
                let length = size + h - i;
                (length, size - 1, length - 1)
            };
            let cells = (0..length)
                .map(|j| pos(start_x - j, start_y - j))
                .collect();
            lines.push(Line {
                kind: LineKind::Diagonal,
                index: i,
                cells,
            });
        }

        let mut cell_index = vec![None; size * size];
        let mut positions = lines[..size]
            .iter()
            .flat_map(|line| line.cells.iter().copied())
            .collect::<Vec<_>>();
        positions.sort_unstable();
        for (i, p) in positions.iter().enumerate() {
            cell_index[usize::from(p.y()) * size + usize::from(p.x())] = Some(i);
        }

        let mut incident = vec![Vec::with_capacity(3); positions.len()];
        for (id, line) in lines.iter().enumerate() {
            for p in &line.cells {
                let i = cell_index[usize::from(p.y()) * size + usize::from(p.x())];
                // Columns and diagonals only ever visit cells that some row covers.
                debug_assert!(i.is_some(), "{} {} leaves the hexagon", line.kind, line.index);
                if let Some(i) = i {
                    incident[i].push(LineId(id));
                }
            }
        }
        let cell_lines = incident
            .into_iter()
            .map(|ids| {
                <[LineId; 3]>::try_from(ids).unwrap_or_else(|ids| {
                    unreachable!("cell lies on {} lines instead of 3", ids.len())
                })
            })
            .collect();

        Ok(Self {
            size,
            lines,
            cell_index,
            positions,
            cell_lines,
        })
    }

    /// Returns the number of rows (equivalently columns or diagonals).
    #[must_use]
    pub fn size(&self) -> usize {
        self.size
    }

    /// Returns the overhang `size / 2`: how far the hexagon's edges slant.
    #[must_use]
    pub fn hang(&self) -> usize {
        self.size / 2
    }

    /// Returns all lines in global order.
    #[must_use]
    pub fn lines(&self) -> &[Line] {
        &self.lines
    }

    /// Returns a line by id.
    ///
    /// # Panics
    ///
    /// Panics if the id does not belong to this geometry.
    #[must_use]
    pub fn line(&self, id: LineId) -> &Line {
        &self.lines[id.0]
    }

    /// Returns the id of the `index`-th line of the given kind.
    ///
    /// # Panics
    ///
    /// Panics if `index` is not below [`Self::size`].
    #[must_use]
    pub fn line_id(&self, kind: LineKind, index: usize) -> LineId {
        assert!(index < self.size, "{kind} index {index} out of range");
        let base = match kind {
            LineKind::Row => 0,
            LineKind::Column => self.size,
            LineKind::Diagonal => self.size * 2,
        };
        LineId(base + index)
    }

    /// Returns the ids of all lines.
    pub fn line_ids(&self) -> impl Iterator<Item = LineId> + use<> {
        (0..self.lines.len()).map(LineId)
    }

    /// Returns the number of cells in the hexagon.
    #[must_use]
    pub fn cell_count(&self) -> usize {
        self.positions.len()
    }

    /// Returns every cell position in row-major order.
    #[must_use]
    pub fn positions(&self) -> &[Position] {
        &self.positions
    }

    /// Returns `true` if the position is a cell of the hexagon.
    #[must_use]
    pub fn contains(&self, pos: Position) -> bool {
        self.cell_index_of(pos).is_some()
    }

    /// Returns the dense index of a cell, or `None` if it lies outside the hexagon.
    #[must_use]
    pub fn cell_index_of(&self, pos: Position) -> Option<usize> {
        let (x, y) = (usize::from(pos.x()), usize::from(pos.y()));
        if x >= self.size || y >= self.size {
            return None;
        }
        self.cell_index[y * self.size + x]
    }

    /// Returns the row, column and diagonal passing through a cell.
    ///
    /// # Panics
    ///
    /// Panics if the position lies outside the hexagon.
    #[must_use]
    pub fn cell_lines(&self, pos: Position) -> [LineId; 3] {
        let Some(i) = self.cell_index_of(pos) else {
            panic!("position {pos} is outside the hexagon");
        };
        self.cell_lines[i]
    }
}

fn pos(x: usize, y: usize) -> Position {
    // Sizes are capped at MAX_SIZE, so coordinates always fit.
    let x = u8::try_from(x).unwrap_or(u8::MAX);
    let y = u8::try_from(y).unwrap_or(u8::MAX);
    Position::new(x, y)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_inconsistent_sizes() {
        assert_eq!(HexGeometry::new(0), Err(GeometryError::Empty));
        assert_eq!(
            HexGeometry::new(4),
            Err(GeometryError::EvenSize { size: 4 })
        );
        assert_eq!(
            HexGeometry::new(257),
            Err(GeometryError::TooLarge { size: 257 })
        );
    }

    #[test]
    fn test_single_cell() {
        let geometry = HexGeometry::new(1).unwrap();
        assert_eq!(geometry.cell_count(), 1);
        for line in geometry.lines() {
            assert_eq!(line.cells(), &[Position::new(0, 0)]);
        }
        assert_eq!(
            geometry.cell_lines(Position::new(0, 0)),
            [LineId(0), LineId(1), LineId(2)]
        );
    }

    #[test]
    fn test_size_three_lines() {
        let geometry = HexGeometry::new(3).unwrap();
        let cells = |kind, index| geometry.line(geometry.line_id(kind, index)).cells().to_vec();
        let p = Position::new;

        assert_eq!(cells(LineKind::Row, 0), vec![p(0, 0), p(1, 0)]);
        assert_eq!(cells(LineKind::Row, 1), vec![p(0, 1), p(1, 1), p(2, 1)]);
        assert_eq!(cells(LineKind::Row, 2), vec![p(1, 2), p(2, 2)]);
        assert_eq!(cells(LineKind::Column, 0), vec![p(0, 0), p(0, 1)]);
        assert_eq!(cells(LineKind::Column, 2), vec![p(2, 1), p(2, 2)]);
        assert_eq!(cells(LineKind::Diagonal, 0), vec![p(1, 2), p(0, 1)]);
        assert_eq!(
            cells(LineKind::Diagonal, 1),
            vec![p(2, 2), p(1, 1), p(0, 0)]
        );
        assert_eq!(cells(LineKind::Diagonal, 2), vec![p(2, 1), p(1, 0)]);
    }

    #[test]
    fn test_every_cell_on_one_line_of_each_kind() {
        for size in [1, 3, 5, 7, 13] {
            let geometry = HexGeometry::new(size).unwrap();
            let h = size / 2;
            assert_eq!(geometry.cell_count(), size * size - h * (h + 1));
            for &pos in geometry.positions() {
                let kinds = geometry
                    .cell_lines(pos)
                    .map(|id| geometry.line(id).kind());
                assert_eq!(kinds, LineKind::ALL, "size {size} at {pos}");
            }
        }
    }

    #[test]
    fn test_line_lengths() {
        let geometry = HexGeometry::new(13).unwrap();
        for kind in LineKind::ALL {
            let lengths = (0..13)
                .map(|i| geometry.line(geometry.line_id(kind, i)).len())
                .collect::<Vec<_>>();
            assert_eq!(lengths, vec![7, 8, 9, 10, 11, 12, 13, 12, 11, 10, 9, 8, 7]);
        }
    }

    #[test]
    fn test_outside_positions() {
        let geometry = HexGeometry::new(5).unwrap();
        assert!(!geometry.contains(Position::new(3, 0)));
        assert!(!geometry.contains(Position::new(0, 3)));
        assert!(!geometry.contains(Position::new(5, 2)));
        assert!(geometry.contains(Position::new(2, 0)));
        assert!(geometry.contains(Position::new(4, 4)));
    }
}
