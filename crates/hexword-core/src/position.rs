//! Cell coordinates.

use std::fmt;

/// The coordinates `(x, y)` of a cell in a hexagonal grid.
///
/// `y` selects the row and `x` the column; the diagonal is implied by both.
/// Positions order row-major, by `y` first and then `x`.
///
/// # Examples
///
/// ```
/// use hexword_core::Position;
///
/// let a = Position::new(3, 0);
/// let b = Position::new(0, 1);
/// assert!(a < b);
/// assert_eq!(a.to_string(), "(3, 0)");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Position {
    x: u8,
    y: u8,
}

impl Position {
    /// Creates a position from its coordinates.
    #[must_use]
    pub const fn new(x: u8, y: u8) -> Self {
        Self { x, y }
    }

    /// Returns the column coordinate.
    #[must_use]
    pub const fn x(self) -> u8 {
        self.x
    }

    /// Returns the row coordinate.
    #[must_use]
    pub const fn y(self) -> u8 {
        self.y
    }
}

impl PartialOrd for Position {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Position {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        (self.y, self.x).cmp(&(other.y, other.x))
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}
