use hexword_core::{AlphabetError, GeometryError, GridParseError, LineKind};
use hexword_pattern::PatternError;

/// Errors detected while building a puzzle, before any solving starts.
///
/// Contradictions found during search are not errors; such branches are
/// simply abandoned.
#[derive(Debug, derive_more::Display, derive_more::Error, derive_more::From)]
pub enum PuzzleError {
    /// A line pattern does not follow the pattern grammar.
    #[display("malformed pattern for {kind} {index}: {source}")]
    MalformedPattern {
        /// Kind of the line the pattern belongs to.
        kind: LineKind,
        /// Index of the line within its kind.
        index: usize,
        /// The parse error.
        source: PatternError,
    },
    /// The numbers of row, column and diagonal patterns differ.
    #[display("pattern counts differ: {rows} rows, {cols} columns, {diags} diagonals")]
    DimensionMismatch {
        /// Number of row patterns.
        rows: usize,
        /// Number of column patterns.
        cols: usize,
        /// Number of diagonal patterns.
        diags: usize,
    },
    /// The pattern count does not describe a hexagon.
    #[display("invalid grid size: {_0}")]
    Geometry(#[from] GeometryError),
    /// The puzzle's alphabet is invalid.
    #[display("invalid alphabet: {_0}")]
    Alphabet(#[from] AlphabetError),
    /// The expected answer does not fit the puzzle.
    #[display("invalid answer: {_0}")]
    Answer(#[from] GridParseError),
}
