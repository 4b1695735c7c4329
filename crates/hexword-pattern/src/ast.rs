//! AST types for line patterns.
//!
//! A pattern is an [`Alternation`] of [`Sequence`]s of [`Repeat`]ed [`Atom`]s.
//! Every alternation is a capture group: the root is group 0 and each `(` opens
//! the next group number, counted left to right.

use std::fmt;

use hexword_core::{Alphabet, Letter, LetterSet};

/// `|`-separated alternatives; also a capture group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alternation {
    /// Capture group number, 0 for the whole pattern.
    pub group: usize,
    /// The alternatives, tried in order. Never empty.
    pub alternatives: Vec<Sequence>,
}

/// A concatenation of one or more items.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sequence {
    /// The items, matched left to right. Never empty.
    pub items: Vec<Repeat>,
}

/// An atom with its repetition modifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Repeat {
    /// The repeated atom.
    pub atom: Atom,
    /// How many times the atom may match.
    pub modifier: Modifier,
}

/// Repetition modifier of an atom.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Modifier {
    /// Exactly once (no modifier).
    Once,
    /// `?`: zero or one time.
    Optional,
    /// `*`: zero or more times.
    ZeroOrMore,
    /// `+`: one or more times.
    OneOrMore,
}

impl Modifier {
    /// Returns the modifier written after an atom, if any.
    #[must_use]
    pub fn symbol(self) -> Option<char> {
        match self {
            Self::Once => None,
            Self::Optional => Some('?'),
            Self::ZeroOrMore => Some('*'),
            Self::OneOrMore => Some('+'),
        }
    }

    /// Parses a modifier symbol.
    #[must_use]
    pub fn from_symbol(ch: char) -> Option<Self> {
        match ch {
            '?' => Some(Self::Optional),
            '*' => Some(Self::ZeroOrMore),
            '+' => Some(Self::OneOrMore),
            _ => None,
        }
    }
}

/// A single matchable element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Atom {
    /// One cell whose letter is in (or, negated, outside) a class.
    Class(CharClass),
    /// A parenthesized alternation.
    Group(Box<Alternation>),
    /// `\n`: the same letters as capture group `n`.
    Backreference(usize),
}

/// A set of letters matching one cell.
///
/// `.` is the negated empty class and a bare letter is a one-letter class.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CharClass {
    /// The listed letters.
    pub letters: LetterSet,
    /// If `true`, the class matches the letters *not* listed.
    pub negated: bool,
}

impl CharClass {
    /// The class matching any letter (`.`).
    pub const ANY: Self = Self {
        letters: LetterSet::EMPTY,
        negated: true,
    };

    /// Returns a class matching exactly one letter.
    #[must_use]
    pub fn literal(letter: Letter) -> Self {
        Self {
            letters: LetterSet::from_elem(letter),
            negated: false,
        }
    }

    /// Returns the letters this class accepts, given the full alphabet set.
    #[must_use]
    pub fn allowed(self, full: LetterSet) -> LetterSet {
        if self.negated {
            full.difference(self.letters)
        } else {
            self.letters
        }
    }
}

/// Renders an AST node in canonical pattern syntax.
pub(crate) struct Render<'a, T> {
    pub(crate) node: &'a T,
    pub(crate) alphabet: &'a Alphabet,
}

impl<'a, T> Render<'a, T> {
    pub(crate) fn new(node: &'a T, alphabet: &'a Alphabet) -> Self {
        Self { node, alphabet }
    }

    fn child<U>(&self, node: &'a U) -> Render<'a, U> {
        Render::new(node, self.alphabet)
    }
}

impl fmt::Display for Render<'_, Alternation> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, seq) in self.node.alternatives.iter().enumerate() {
            if i > 0 {
                write!(f, "|")?;
            }
            write!(f, "{}", self.child(seq))?;
        }
        Ok(())
    }
}

impl fmt::Display for Render<'_, Sequence> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.node
            .items
            .iter()
            .try_for_each(|item| write!(f, "{}", self.child(item)))
    }
}

impl fmt::Display for Render<'_, Repeat> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.node.atom {
            Atom::Class(class) => write!(f, "{}", self.child(class))?,
            Atom::Group(alt) => write!(f, "({})", self.child(alt.as_ref()))?,
            Atom::Backreference(n) => write!(f, "\\{n}")?,
        }
        if let Some(symbol) = self.node.modifier.symbol() {
            write!(f, "{symbol}")?;
        }
        Ok(())
    }
}

impl fmt::Display for Render<'_, CharClass> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let class = self.node;
        if class.negated && class.letters.is_empty() {
            return write!(f, ".");
        }
        if let (false, Some(letter)) = (class.negated, class.letters.as_single()) {
            return write!(f, "{}", self.alphabet.symbol(letter));
        }
        write!(f, "[")?;
        if class.negated {
            write!(f, "^")?;
        }
        for letter in class.letters {
            write!(f, "{}", self.alphabet.symbol(letter))?;
        }
        write!(f, "]")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_modifier_symbols() {
        for modifier in [Modifier::Optional, Modifier::ZeroOrMore, Modifier::OneOrMore] {
            let symbol = modifier.symbol().unwrap();
            assert_eq!(Modifier::from_symbol(symbol), Some(modifier));
        }
        assert_eq!(Modifier::Once.symbol(), None);
        assert_eq!(Modifier::from_symbol('.'), None);
    }

    #[test]
    fn test_class_allowed() {
        let full = LetterSet::full(4);
        assert_eq!(CharClass::ANY.allowed(full), full);

        let b = Letter::new(1);
        assert_eq!(CharClass::literal(b).allowed(full), LetterSet::from_elem(b));

        let not_b = CharClass {
            letters: LetterSet::from_elem(b),
            negated: true,
        };
        assert_eq!(not_b.allowed(full).len(), 3);
        assert!(!not_b.allowed(full).contains(b));
    }
}
