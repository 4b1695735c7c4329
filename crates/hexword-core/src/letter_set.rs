//! Candidate letter sets.
//!
//! [`LetterSet`] is the candidate set of a cell: the letters not yet ruled out.
//! It is a 64-bit bitset indexed by [`Letter::index`], so set algebra is a single
//! machine operation and copying a whole grid of candidates is a plain memory copy.
//!
//! # Examples
//!
//! ```
//! use hexword_core::{Letter, LetterSet};
//!
//! let a = LetterSet::from_iter([Letter::new(0), Letter::new(1)]);
//! let b = LetterSet::from_iter([Letter::new(1), Letter::new(2)]);
//!
//! assert_eq!((a & b).as_single(), Some(Letter::new(1)));
//! assert_eq!((a | b).len(), 3);
//! assert!(a.difference(a).is_empty());
//! ```

use std::{
    fmt,
    iter::FusedIterator,
    ops::{BitAnd, BitAndAssign, BitOr, BitOrAssign},
};

use crate::{Alphabet, Letter};

/// A set of letters, stored as a bitset.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct LetterSet {
    bits: u64,
}

impl LetterSet {
    /// The empty set. A cell with this candidate set is contradictory.
    pub const EMPTY: Self = Self { bits: 0 };

    /// Creates an empty set.
    #[must_use]
    pub const fn new() -> Self {
        Self::EMPTY
    }

    /// Returns the set of the first `len` letters.
    ///
    /// # Panics
    ///
    /// Panics if `len` exceeds [`Alphabet::MAX_LEN`].
    #[must_use]
    pub const fn full(len: usize) -> Self {
        assert!(len <= Alphabet::MAX_LEN);
        if len == Alphabet::MAX_LEN {
            Self { bits: u64::MAX }
        } else {
            Self {
                bits: (1 << len) - 1,
            }
        }
    }

    /// Returns the set containing a single letter.
    #[must_use]
    pub const fn from_elem(letter: Letter) -> Self {
        Self {
            bits: 1 << letter.index(),
        }
    }

    /// Returns the number of letters in the set.
    #[must_use]
    pub const fn len(self) -> usize {
        self.bits.count_ones() as usize
    }

    /// Returns `true` if the set has no letters.
    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.bits == 0
    }

    /// Returns the only letter of the set, or `None` if it does not hold exactly one.
    #[must_use]
    pub fn as_single(self) -> Option<Letter> {
        if self.len() == 1 {
            self.iter().next()
        } else {
            None
        }
    }

    /// Returns `true` if the set contains `letter`.
    #[must_use]
    pub const fn contains(self, letter: Letter) -> bool {
        self.bits & (1 << letter.index()) != 0
    }

    /// Adds a letter. Returns `true` if it was not already present.
    pub fn insert(&mut self, letter: Letter) -> bool {
        let added = !self.contains(letter);
        self.bits |= 1 << letter.index();
        added
    }

    /// Removes a letter. Returns `true` if it was present.
    pub fn remove(&mut self, letter: Letter) -> bool {
        let removed = self.contains(letter);
        self.bits &= !(1 << letter.index());
        removed
    }

    /// Returns the letters present in either set.
    #[must_use]
    pub const fn union(self, other: Self) -> Self {
        Self {
            bits: self.bits | other.bits,
        }
    }

    /// Returns the letters present in both sets.
    #[must_use]
    pub const fn intersection(self, other: Self) -> Self {
        Self {
            bits: self.bits & other.bits,
        }
    }

    /// Returns the letters of `self` that are not in `other`.
    #[must_use]
    pub const fn difference(self, other: Self) -> Self {
        Self {
            bits: self.bits & !other.bits,
        }
    }

    /// Returns `true` if every letter of `self` is also in `other`.
    #[must_use]
    pub const fn is_subset(self, other: Self) -> bool {
        self.bits & !other.bits == 0
    }

    /// Returns an iterator over the letters in ascending index order.
    #[must_use]
    pub const fn iter(self) -> Iter {
        Iter { bits: self.bits }
    }

    /// Returns a value that renders the set using the symbols of `alphabet`.
    #[must_use]
    pub fn display(self, alphabet: &Alphabet) -> impl fmt::Display + '_ {
        DisplayLetterSet {
            set: self,
            alphabet,
        }
    }
}

impl fmt::Debug for LetterSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set()
            .entries(self.iter().map(Letter::index))
            .finish()
    }
}

impl BitOr for LetterSet {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self::Output {
        self.union(rhs)
    }
}

impl BitOrAssign for LetterSet {
    fn bitor_assign(&mut self, rhs: Self) {
        *self = self.union(rhs);
    }
}

impl BitAnd for LetterSet {
    type Output = Self;

    fn bitand(self, rhs: Self) -> Self::Output {
        self.intersection(rhs)
    }
}

impl BitAndAssign for LetterSet {
    fn bitand_assign(&mut self, rhs: Self) {
        *self = self.intersection(rhs);
    }
}

impl FromIterator<Letter> for LetterSet {
    fn from_iter<T: IntoIterator<Item = Letter>>(iter: T) -> Self {
        let mut set = Self::new();
        set.extend(iter);
        set
    }
}

impl Extend<Letter> for LetterSet {
    fn extend<T: IntoIterator<Item = Letter>>(&mut self, iter: T) {
        for letter in iter {
            self.insert(letter);
        }
    }
}

impl IntoIterator for LetterSet {
    type Item = Letter;
    type IntoIter = Iter;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Iterator over the letters of a [`LetterSet`], in ascending order.
#[derive(Debug, Clone)]
pub struct Iter {
    bits: u64,
}

impl Iterator for Iter {
    type Item = Letter;

    fn next(&mut self) -> Option<Self::Item> {
        if self.bits == 0 {
            return None;
        }
        #[expect(clippy::cast_possible_truncation)]
        let index = self.bits.trailing_zeros() as u8;
        self.bits &= self.bits - 1;
        Some(Letter::new(index))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let len = self.bits.count_ones() as usize;
        (len, Some(len))
    }
}

impl DoubleEndedIterator for Iter {
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.bits == 0 {
            return None;
        }
        #[expect(clippy::cast_possible_truncation)]
        let index = (63 - self.bits.leading_zeros()) as u8;
        self.bits &= !(1_u64 << index);
        Some(Letter::new(index))
    }
}

impl ExactSizeIterator for Iter {}
impl FusedIterator for Iter {}

struct DisplayLetterSet<'a> {
    set: LetterSet,
    alphabet: &'a Alphabet,
}

impl fmt::Display for DisplayLetterSet<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        for letter in self.set {
            write!(f, "{}", self.alphabet.symbol(letter))?;
        }
        write!(f, "}}")
    }
}
