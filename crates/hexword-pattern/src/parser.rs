//! Recursive descent parser for line patterns.
//!
//! ```text
//! Alternation := Sequence ('|' Sequence)*
//! Sequence    := Repeat+
//! Repeat      := Atom ('*' | '+' | '?')?
//! Atom        := '[' '^'? Letter+ ']' | '(' Alternation ')' | '\' Digit | '.' | Letter
//! ```
//!
//! The parser is greedy and never backtracks; it must consume the whole input.

use std::{iter::Peekable, str::Chars};

use hexword_core::{Alphabet, LetterSet};

use crate::ast::{Alternation, Atom, CharClass, Modifier, Repeat, Sequence};

/// What went wrong while parsing a pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display)]
pub enum PatternErrorKind {
    /// A character that cannot appear here, including symbols outside the alphabet.
    #[display("unexpected character {_0:?}")]
    UnexpectedChar(char),
    /// The pattern ended where more input was required.
    #[display("unexpected end of pattern")]
    UnexpectedEnd,
    /// A `(` without its `)`.
    #[display("unclosed group")]
    UnclosedGroup,
    /// A `[` without its `]`.
    #[display("unclosed character class")]
    UnclosedClass,
    /// A character class listing no letters.
    #[display("empty character class")]
    EmptyClass,
    /// A `\` not followed by a group number `1`-`9`.
    #[display("invalid backreference")]
    InvalidBackreference,
    /// A backreference to a group the pattern does not have.
    #[display("reference to undefined group {_0}")]
    UndefinedGroup(usize),
}

/// Error returned when a pattern string does not follow the grammar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("{kind} at offset {offset}")]
pub struct PatternError {
    /// What went wrong.
    pub kind: PatternErrorKind,
    /// Character offset into the pattern where the problem was found.
    pub offset: usize,
}

/// A parsed pattern tree with its capture group count.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ParsedPattern {
    pub(crate) root: Alternation,
    pub(crate) group_count: usize,
}

/// Parses a pattern over the letters of `alphabet`.
pub(crate) fn parse(input: &str, alphabet: &Alphabet) -> Result<ParsedPattern, PatternError> {
    let mut parser = Parser {
        chars: input.chars().peekable(),
        offset: 0,
        alphabet,
        group_count: 0,
        backreferences: Vec::new(),
    };
    let root = parser.parse_alternation(0)?;
    if let Some(&c) = parser.chars.peek() {
        return Err(parser.error(PatternErrorKind::UnexpectedChar(c)));
    }
    if let Some(&(group, offset)) = parser
        .backreferences
        .iter()
        .find(|(group, _)| *group > parser.group_count)
    {
        return Err(PatternError {
            kind: PatternErrorKind::UndefinedGroup(group),
            offset,
        });
    }
    Ok(ParsedPattern {
        root,
        group_count: parser.group_count,
    })
}

struct Parser<'a> {
    chars: Peekable<Chars<'a>>,
    offset: usize,
    alphabet: &'a Alphabet,
    group_count: usize,
    /// `(group, offset)` of every backreference, validated once all groups are known.
    backreferences: Vec<(usize, usize)>,
}

impl Parser<'_> {
    fn error(&self, kind: PatternErrorKind) -> PatternError {
        PatternError {
            kind,
            offset: self.offset,
        }
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.chars.next()?;
        self.offset += 1;
        Some(c)
    }

    fn eat(&mut self, expected: char) -> bool {
        if self.chars.peek() == Some(&expected) {
            self.bump();
            true
        } else {
            false
        }
    }

    fn is_atom_start(&self, c: char) -> bool {
        matches!(c, '[' | '(' | '\\' | '.') || self.alphabet.letter(c).is_some()
    }

    fn parse_alternation(&mut self, group: usize) -> Result<Alternation, PatternError> {
        let mut alternatives = vec![self.parse_sequence()?];
        while self.eat('|') {
            alternatives.push(self.parse_sequence()?);
        }
        Ok(Alternation {
            group,
            alternatives,
        })
    }

    fn parse_sequence(&mut self) -> Result<Sequence, PatternError> {
        let mut items = Vec::new();
        while let Some(&c) = self.chars.peek() {
            if !self.is_atom_start(c) {
                break;
            }
            items.push(self.parse_repeat()?);
        }
        if items.is_empty() {
            let kind = match self.chars.peek() {
                Some(&c) => PatternErrorKind::UnexpectedChar(c),
                None => PatternErrorKind::UnexpectedEnd,
            };
            return Err(self.error(kind));
        }
        Ok(Sequence { items })
    }

    fn parse_repeat(&mut self) -> Result<Repeat, PatternError> {
        let atom = self.parse_atom()?;
        let modifier = match self.chars.peek().copied().and_then(Modifier::from_symbol) {
            Some(modifier) => {
                self.bump();
                modifier
            }
            None => Modifier::Once,
        };
        Ok(Repeat { atom, modifier })
    }

    fn parse_atom(&mut self) -> Result<Atom, PatternError> {
        let start = self.offset;
        let Some(c) = self.bump() else {
            return Err(self.error(PatternErrorKind::UnexpectedEnd));
        };
        match c {
            '[' => self.parse_class().map(Atom::Class),
            '(' => {
                self.group_count += 1;
                let alt = self.parse_alternation(self.group_count)?;
                match self.chars.peek() {
                    Some(')') => {
                        self.bump();
                        Ok(Atom::Group(Box::new(alt)))
                    }
                    Some(&c) => Err(self.error(PatternErrorKind::UnexpectedChar(c))),
                    None => Err(PatternError {
                        kind: PatternErrorKind::UnclosedGroup,
                        offset: start,
                    }),
                }
            }
            '\\' => match self.chars.peek().and_then(|c| c.to_digit(10)) {
                Some(n @ 1..=9) => {
                    self.bump();
                    let n = n as usize;
                    self.backreferences.push((n, start));
                    Ok(Atom::Backreference(n))
                }
                _ => Err(self.error(PatternErrorKind::InvalidBackreference)),
            },
            '.' => Ok(Atom::Class(CharClass::ANY)),
            c => match self.alphabet.letter(c) {
                Some(letter) => Ok(Atom::Class(CharClass::literal(letter))),
                None => Err(PatternError {
                    kind: PatternErrorKind::UnexpectedChar(c),
                    offset: start,
                }),
            },
        }
    }

    /// Parses the rest of a class after its `[`.
    fn parse_class(&mut self) -> Result<CharClass, PatternError> {
        let negated = self.eat('^');
        let mut letters = LetterSet::new();
        loop {
            match self.chars.peek().copied() {
                None => return Err(self.error(PatternErrorKind::UnclosedClass)),
                Some(']') => {
                    if letters.is_empty() {
                        return Err(self.error(PatternErrorKind::EmptyClass));
                    }
                    self.bump();
                    return Ok(CharClass { letters, negated });
                }
                Some(c) => match self.alphabet.letter(c) {
                    Some(letter) => {
                        letters.insert(letter);
                        self.bump();
                    }
                    None => return Err(self.error(PatternErrorKind::UnexpectedChar(c))),
                },
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use hexword_core::Letter;

    use super::*;

    fn parse_ok(s: &str) -> ParsedPattern {
        parse(s, &Alphabet::uppercase()).expect("parse should succeed")
    }

    fn parse_err(s: &str) -> PatternError {
        parse(s, &Alphabet::uppercase()).expect_err("parse should fail")
    }

    fn letter(c: char) -> Letter {
        Alphabet::uppercase().letter(c).unwrap()
    }

    fn single_items(p: ParsedPattern) -> Vec<Repeat> {
        assert_eq!(p.root.alternatives.len(), 1, "expected single alternative");
        p.root.alternatives.into_iter().next().unwrap().items
    }

    #[test]
    fn test_literals_and_any() {
        let items = single_items(parse_ok("A.B"));
        assert_eq!(items.len(), 3);
        assert_eq!(items[0].atom, Atom::Class(CharClass::literal(letter('A'))));
        assert_eq!(items[1].atom, Atom::Class(CharClass::ANY));
        assert_eq!(items[2].atom, Atom::Class(CharClass::literal(letter('B'))));
        assert!(items.iter().all(|item| item.modifier == Modifier::Once));
    }

    #[test]
    fn test_modifiers() {
        let items = single_items(parse_ok("A*B+C?D"));
        let modifiers = items.iter().map(|item| item.modifier).collect::<Vec<_>>();
        assert_eq!(
            modifiers,
            vec![
                Modifier::ZeroOrMore,
                Modifier::OneOrMore,
                Modifier::Optional,
                Modifier::Once
            ]
        );
    }

    #[test]
    fn test_classes() {
        let items = single_items(parse_ok("[AO][^CR]"));
        assert_eq!(
            items[0].atom,
            Atom::Class(CharClass {
                letters: [letter('A'), letter('O')].into_iter().collect(),
                negated: false,
            })
        );
        assert_eq!(
            items[1].atom,
            Atom::Class(CharClass {
                letters: [letter('C'), letter('R')].into_iter().collect(),
                negated: true,
            })
        );
    }

    #[test]
    fn test_groups_are_numbered_by_opening_paren() {
        let p = parse_ok("((A)|B)(C)");
        assert_eq!(p.group_count, 3);
        assert_eq!(p.root.group, 0);

        let items = single_items(p);
        let Atom::Group(outer) = &items[0].atom else {
            panic!("expected group");
        };
        assert_eq!(outer.group, 1);
        let Atom::Group(inner) = &outer.alternatives[0].items[0].atom else {
            panic!("expected nested group");
        };
        assert_eq!(inner.group, 2);
        let Atom::Group(last) = &items[1].atom else {
            panic!("expected group");
        };
        assert_eq!(last.group, 3);
    }

    #[test]
    fn test_alternation() {
        let p = parse_ok("DI|NS|TH");
        assert_eq!(p.root.alternatives.len(), 3);
        assert!(p.root.alternatives.iter().all(|seq| seq.items.len() == 2));
    }

    #[test]
    fn test_backreferences() {
        let items = single_items(parse_ok("(.)(.)\\2\\1"));
        assert_eq!(items[2].atom, Atom::Backreference(2));
        assert_eq!(items[3].atom, Atom::Backreference(1));
    }

    #[test]
    fn test_reference_puzzle_patterns_parse() {
        for pattern in [
            r".*H.*H.*",
            r"(DI|NS|TH|OM)*",
            r"[^C]*[^R]*III.*",
            r"(...?)\1*",
            r"([^X]|XCC)*",
            r"(RR|HHH)*.?",
            r"P+(..)\1.*",
            r".*(.)(.)(.)(.)\4\3\2\1.*",
            r".*(.)C\1X\1.*",
            r"[CEIMU]*OH[AEMOR]*",
        ] {
            parse_ok(pattern);
        }
    }

    #[test]
    fn test_errors() {
        use PatternErrorKind::*;

        let cases = [
            ("", UnexpectedEnd, 0),
            ("(AB", UnclosedGroup, 0),
            ("A(B|C", UnclosedGroup, 1),
            ("AB)", UnexpectedChar(')'), 2),
            ("[AB", UnclosedClass, 3),
            ("[]", EmptyClass, 1),
            ("[^]", EmptyClass, 2),
            ("[A-Z]", UnexpectedChar('-'), 2),
            ("\\A", InvalidBackreference, 1),
            ("(A)\\0", InvalidBackreference, 4),
            ("\\", InvalidBackreference, 1),
            ("(A)\\2", UndefinedGroup(2), 3),
            ("A**", UnexpectedChar('*'), 2),
            ("*A", UnexpectedChar('*'), 0),
            ("A||B", UnexpectedChar('|'), 2),
            ("A|", UnexpectedEnd, 2),
            ("()", UnexpectedChar(')'), 1),
            ("Ab", UnexpectedChar('b'), 1),
        ];
        for (input, kind, offset) in cases {
            assert_eq!(
                parse_err(input),
                PatternError { kind, offset },
                "input {input:?}"
            );
        }
    }

    #[test]
    fn test_custom_alphabet() {
        let alphabet: Alphabet = "XY".parse().unwrap();
        assert!(parse("X[^Y]*", &alphabet).is_ok());
        assert_eq!(
            parse("XZ", &alphabet),
            Err(PatternError {
                kind: PatternErrorKind::UnexpectedChar('Z'),
                offset: 1
            })
        );
    }
}
