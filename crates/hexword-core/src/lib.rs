//! Core data structures for hexagonal regular-expression crosswords.
//!
//! A hexword puzzle is a hexagon of cells where every cell lies on one row, one
//! column and one diagonal, and every such line is constrained by a pattern. This
//! crate provides the data the solver works on; it knows nothing about patterns.
//!
//! # Overview
//!
//! - [`alphabet`]: the finite symbol set and the [`Letter`] index type
//! - [`letter_set`]: [`LetterSet`], the candidate set of a single cell
//! - [`position`]: [`Position`], the `(x, y)` coordinates of a cell
//! - [`geometry`]: [`HexGeometry`], deriving rows, columns and diagonals from a size
//! - [`candidate_grid`]: [`CandidateGrid`], candidate sets for every cell of a grid
//!
//! # Examples
//!
//! ```
//! use std::sync::Arc;
//!
//! use hexword_core::{Alphabet, CandidateGrid, HexGeometry, LineKind};
//!
//! let geometry = Arc::new(HexGeometry::new(5)?);
//! let grid = CandidateGrid::new(geometry.clone(), Arc::new(Alphabet::uppercase()));
//!
//! let middle_row = geometry.line_id(LineKind::Row, 2);
//! let view = grid.line_view(middle_row);
//! assert_eq!(view.len(), 5);
//! assert!(view.iter().all(|c| c.len() == 26));
//! # Ok::<(), hexword_core::GeometryError>(())
//! ```

pub mod alphabet;
pub mod candidate_grid;
pub mod geometry;
pub mod letter_set;
pub mod position;

pub use self::{
    alphabet::{Alphabet, AlphabetError, Letter},
    candidate_grid::{CandidateGrid, ConsistencyError, GridParseError},
    geometry::{GeometryError, HexGeometry, Line, LineId, LineKind},
    letter_set::LetterSet,
    position::Position,
};
