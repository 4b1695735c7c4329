//! Line patterns for hexagonal regular-expression crosswords.
//!
//! A [`Pattern`] is a small regular expression over a puzzle's [`Alphabet`]. It
//! supports letters, `.`, character classes (`[AB]`, `[^AB]`), groups with
//! alternation, the `?`, `*` and `+` modifiers, and backreferences `\1`..`\9`.
//!
//! Patterns are not matched against words but against a line of candidate sets:
//! [`Pattern::narrow`] returns, for each position, the letters that appear there
//! in at least one way of satisfying the pattern.
//!
//! [`Alphabet`]: hexword_core::Alphabet

pub mod ast;
mod matcher;
mod parser;
mod pattern;

pub use self::{
    parser::{PatternError, PatternErrorKind},
    pattern::Pattern,
};
