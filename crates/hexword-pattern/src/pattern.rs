use std::{fmt, sync::Arc};

use hexword_core::Alphabet;

use crate::{
    ast::{Alternation, Render},
    parser::{self, PatternError},
};

/// A parsed line pattern over a fixed alphabet.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
///
/// use hexword_core::Alphabet;
/// use hexword_pattern::Pattern;
///
/// let alphabet = Arc::new(Alphabet::uppercase());
/// let pattern = Pattern::parse("(DI|NS)*[^AEIOU]A?", &alphabet)?;
/// assert_eq!(pattern.group_count(), 1);
/// assert_eq!(pattern.to_string(), "(DI|NS)*[^AEIOU]A?");
/// # Ok::<(), hexword_pattern::PatternError>(())
/// ```
#[derive(Debug, Clone)]
pub struct Pattern {
    source: String,
    root: Alternation,
    group_count: usize,
    alphabet: Arc<Alphabet>,
}

impl Pattern {
    /// Parses `source` over the letters of `alphabet`.
    ///
    /// # Errors
    ///
    /// Returns [`PatternError`] if `source` does not follow the pattern grammar,
    /// uses a symbol outside `alphabet`, or refers to a group it does not have.
    pub fn parse(source: &str, alphabet: &Arc<Alphabet>) -> Result<Self, PatternError> {
        let parsed = parser::parse(source, alphabet)?;
        Ok(Self {
            source: source.to_owned(),
            root: parsed.root,
            group_count: parsed.group_count,
            alphabet: Arc::clone(alphabet),
        })
    }

    /// Returns the string the pattern was parsed from.
    #[must_use]
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Returns the root alternation (capture group 0).
    #[must_use]
    pub fn root(&self) -> &Alternation {
        &self.root
    }

    /// Returns the number of parenthesized capture groups.
    #[must_use]
    pub fn group_count(&self) -> usize {
        self.group_count
    }

    /// Returns the alphabet the pattern is written over.
    #[must_use]
    pub fn alphabet(&self) -> &Arc<Alphabet> {
        &self.alphabet
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", Render::new(&self.root, &self.alphabet))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[track_caller]
    fn assert_canonical(source: &str, expected: &str) {
        let alphabet = Arc::new(Alphabet::uppercase());
        let pattern = Pattern::parse(source, &alphabet).unwrap();
        let rendered = pattern.to_string();
        assert_eq!(rendered, expected);

        let reparsed = Pattern::parse(&rendered, &alphabet).unwrap();
        assert_eq!(reparsed.root(), pattern.root());
        assert_eq!(reparsed.group_count(), pattern.group_count());
    }

    #[test]
    fn test_canonical_rendering() {
        assert_canonical(".*H.*H.*", ".*H.*H.*");
        assert_canonical("[A]", "A");
        assert_canonical("[BA]+", "[AB]+");
        assert_canonical("[^RCR]*", "[^CR]*");
        assert_canonical(r"(...?)\1*", r"(...?)\1*");
        assert_canonical("(RR|HHH)*.?", "(RR|HHH)*.?");
        assert_canonical("((A)|[^Z])", "((A)|[^Z])");
    }

    #[test]
    fn test_source_is_kept() {
        let alphabet = Arc::new(Alphabet::uppercase());
        let pattern = Pattern::parse("[BA]", &alphabet).unwrap();
        assert_eq!(pattern.source(), "[BA]");
        assert_eq!(pattern.to_string(), "[AB]");
        assert!(Arc::ptr_eq(pattern.alphabet(), &alphabet));
    }
}
