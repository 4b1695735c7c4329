//! Symbol alphabets and the [`Letter`] index type.

use std::{fmt, str::FromStr};

use crate::LetterSet;

/// Characters with a meaning in the pattern grammar; they can never be alphabet symbols.
pub const RESERVED_SYMBOLS: &[char] = &['[', ']', '(', ')', '|', '*', '+', '?', '.', '\\', '^'];

/// A letter, identified by its index within an [`Alphabet`].
///
/// Letters are only meaningful together with the alphabet that produced them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Letter(u8);

impl Letter {
    /// Creates a letter from its alphabet index.
    ///
    /// # Panics
    ///
    /// Panics if `index` is not below [`Alphabet::MAX_LEN`].
    #[must_use]
    pub const fn new(index: u8) -> Self {
        assert!((index as usize) < Alphabet::MAX_LEN);
        Self(index)
    }

    /// Returns the index of this letter within its alphabet.
    #[must_use]
    pub const fn index(self) -> u8 {
        self.0
    }
}

/// Errors returned when constructing an [`Alphabet`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum AlphabetError {
    /// The alphabet has no symbols.
    #[display("alphabet is empty")]
    Empty,
    /// The alphabet has more symbols than a [`LetterSet`] can hold.
    #[display("alphabet has {len} symbols, at most {} are supported", Alphabet::MAX_LEN)]
    TooLarge {
        /// Number of symbols given.
        len: usize,
    },
    /// A symbol appears more than once.
    #[display("symbol {_0:?} appears more than once")]
    Duplicate(#[error(not(source))] char),
    /// A symbol collides with pattern syntax, a digit, or whitespace.
    #[display("symbol {_0:?} is reserved")]
    Reserved(#[error(not(source))] char),
}

/// An ordered, finite set of symbols that cells may hold.
///
/// The position of a symbol in the alphabet is its [`Letter`] index, which is also
/// the bit used for it in a [`LetterSet`].
///
/// # Examples
///
/// ```
/// use hexword_core::Alphabet;
///
/// let alphabet: Alphabet = "XYZ".parse()?;
/// let y = alphabet.letter('Y').unwrap();
/// assert_eq!(y.index(), 1);
/// assert_eq!(alphabet.symbol(y), 'Y');
/// assert_eq!(alphabet.full().len(), 3);
/// # Ok::<(), hexword_core::AlphabetError>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Alphabet {
    symbols: Vec<char>,
}

impl Alphabet {
    /// Maximum number of symbols in an alphabet.
    pub const MAX_LEN: usize = 64;

    /// Creates an alphabet from symbols in letter order.
    ///
    /// # Errors
    ///
    /// Returns an [`AlphabetError`] if the list is empty, too long, contains a
    /// duplicate, or contains a reserved character.
    pub fn new<I>(symbols: I) -> Result<Self, AlphabetError>
    where
        I: IntoIterator<Item = char>,
    {
        let symbols = symbols.into_iter().collect::<Vec<_>>();
        if symbols.is_empty() {
            return Err(AlphabetError::Empty);
        }
        if symbols.len() > Self::MAX_LEN {
            return Err(AlphabetError::TooLarge { len: symbols.len() });
        }
        for (i, &ch) in symbols.iter().enumerate() {
            if is_reserved(ch) {
                return Err(AlphabetError::Reserved(ch));
            }
            if symbols[..i].contains(&ch) {
                return Err(AlphabetError::Duplicate(ch));
            }
        }
        Ok(Self { symbols })
    }

    /// The uppercase ASCII letters `A` to `Z`.
    #[must_use]
    pub fn uppercase() -> Self {
        Self {
            symbols: ('A'..='Z').collect(),
        }
    }

    /// Returns the number of symbols.
    #[must_use]
    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    /// Always `false`; alphabets cannot be empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    /// Returns the letter for a symbol, or `None` if the symbol is not in the alphabet.
    #[must_use]
    pub fn letter(&self, symbol: char) -> Option<Letter> {
        let index = self.symbols.iter().position(|&s| s == symbol)?;
        u8::try_from(index).ok().map(Letter::new)
    }

    /// Returns the symbol of a letter.
    ///
    /// # Panics
    ///
    /// Panics if the letter does not belong to this alphabet.
    #[must_use]
    pub fn symbol(&self, letter: Letter) -> char {
        self.symbols[usize::from(letter.index())]
    }

    /// Returns the set containing every letter of the alphabet.
    #[must_use]
    pub fn full(&self) -> LetterSet {
        LetterSet::full(self.symbols.len())
    }

    /// Returns the symbols of a set in letter order.
    #[must_use]
    pub fn symbols_of(&self, set: LetterSet) -> Vec<char> {
        set.iter().map(|letter| self.symbol(letter)).collect()
    }
}

impl Default for Alphabet {
    fn default() -> Self {
        Self::uppercase()
    }
}

impl FromStr for Alphabet {
    type Err = AlphabetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s.chars())
    }
}

impl fmt::Display for Alphabet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.symbols.iter().try_for_each(|ch| write!(f, "{ch}"))
    }
}

fn is_reserved(ch: char) -> bool {
    RESERVED_SYMBOLS.contains(&ch) || ch.is_ascii_digit() || ch.is_whitespace()
}
