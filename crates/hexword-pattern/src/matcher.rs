//! Set-based match engine.
//!
//! The matcher runs a pattern against a line of candidate sets rather than a
//! concrete word. Every way the pattern can fully match some choice of letters is
//! explored; each one reports the letters it consumed per position, and the
//! caller unions them.
//!
//! Exploration is continuation-passing: every combinator receives the current
//! match state and a continuation, and calls the continuation once for each
//! successor state. States are cloned per step, so sibling branches never see
//! each other's captures. A continuation returning [`ControlFlow::Break`] stops
//! the whole exploration.

use std::ops::ControlFlow;

use hexword_core::{Letter, LetterSet};

use crate::{
    Pattern,
    ast::{Alternation, Atom, CharClass, Modifier, Repeat},
};

#[derive(Debug, Clone)]
struct MatchState {
    /// Letters consumed so far; its length is the input position.
    consumed: Vec<LetterSet>,
    /// `[start, end)` span of the most recent capture of each group.
    groups: Vec<Option<(usize, usize)>>,
}

type Continuation<'k> = dyn FnMut(&MatchState) -> ControlFlow<()> + 'k;

struct Matcher<'a> {
    input: &'a [LetterSet],
    full: LetterSet,
}

impl Matcher<'_> {
    fn alternation(
        &self,
        alt: &Alternation,
        state: &MatchState,
        k: &mut Continuation<'_>,
    ) -> ControlFlow<()> {
        let start = state.consumed.len();
        for seq in &alt.alternatives {
            self.sequence(&seq.items, state, &mut |next| {
                let mut next = next.clone();
                next.groups[alt.group] = Some((start, next.consumed.len()));
                k(&next)
            })?;
        }
        ControlFlow::Continue(())
    }

    fn sequence(
        &self,
        items: &[Repeat],
        state: &MatchState,
        k: &mut Continuation<'_>,
    ) -> ControlFlow<()> {
        match items.split_first() {
            None => k(state),
            Some((first, rest)) => {
                self.repeat(first, state, &mut |next| self.sequence(rest, next, &mut *k))
            }
        }
    }

    fn repeat(
        &self,
        item: &Repeat,
        state: &MatchState,
        k: &mut Continuation<'_>,
    ) -> ControlFlow<()> {
        match item.modifier {
            Modifier::Once => self.atom(&item.atom, state, k),
            Modifier::Optional => {
                k(state)?;
                self.atom(&item.atom, state, k)
            }
            Modifier::ZeroOrMore => {
                k(state)?;
                self.repeat_advancing(&item.atom, state, k)
            }
            Modifier::OneOrMore => self.repeat_advancing(&item.atom, state, k),
        }
    }

    /// One or more repetitions of `atom`, each of which must consume input.
    fn repeat_advancing(
        &self,
        atom: &Atom,
        state: &MatchState,
        k: &mut Continuation<'_>,
    ) -> ControlFlow<()> {
        let position = state.consumed.len();
        self.atom(atom, state, &mut |next| {
            if next.consumed.len() <= position {
                return ControlFlow::Continue(());
            }
            k(next)?;
            self.repeat_advancing(atom, next, &mut *k)
        })
    }

    fn atom(
        &self,
        atom: &Atom,
        state: &MatchState,
        k: &mut Continuation<'_>,
    ) -> ControlFlow<()> {
        match atom {
            Atom::Class(class) => self.class(*class, state, k),
            Atom::Group(alt) => self.alternation(alt, state, k),
            Atom::Backreference(group) => self.backreference(*group, state, k),
        }
    }

    fn class(
        &self,
        class: CharClass,
        state: &MatchState,
        k: &mut Continuation<'_>,
    ) -> ControlFlow<()> {
        let Some(&cell) = self.input.get(state.consumed.len()) else {
            return ControlFlow::Continue(());
        };
        let hits = cell & class.allowed(self.full);
        if hits.is_empty() {
            return ControlFlow::Continue(());
        }
        let mut next = state.clone();
        next.consumed.push(hits);
        k(&next)
    }

    /// Matches the span captured by `group` again.
    ///
    /// Both the captured positions and the newly consumed ones are narrowed to
    /// their pairwise intersection.
    fn backreference(
        &self,
        group: usize,
        state: &MatchState,
        k: &mut Continuation<'_>,
    ) -> ControlFlow<()> {
        let Some((start, end)) = state.groups.get(group).copied().flatten() else {
            return ControlFlow::Continue(());
        };
        let position = state.consumed.len();
        let Some(cells) = self.input.get(position..position + (end - start)) else {
            return ControlFlow::Continue(());
        };
        let mut next = state.clone();
        for (offset, &cell) in cells.iter().enumerate() {
            let hits = state.consumed[start + offset] & cell;
            if hits.is_empty() {
                return ControlFlow::Continue(());
            }
            next.consumed[start + offset] = hits;
            next.consumed.push(hits);
        }
        k(&next)
    }
}

impl Pattern {
    /// Calls `on_match` with the consumed letters of every full match of `input`,
    /// until it returns [`ControlFlow::Break`].
    fn for_each_match(
        &self,
        input: &[LetterSet],
        on_match: &mut dyn FnMut(&[LetterSet]) -> ControlFlow<()>,
    ) -> ControlFlow<()> {
        let matcher = Matcher {
            input,
            full: self.alphabet().full(),
        };
        let state = MatchState {
            consumed: Vec::with_capacity(input.len()),
            groups: vec![None; self.group_count() + 1],
        };
        matcher.alternation(self.root(), &state, &mut |end| {
            if end.consumed.len() == input.len() {
                on_match(&end.consumed)
            } else {
                ControlFlow::Continue(())
            }
        })
    }

    /// Narrows a line of candidate sets to the letters some full match uses.
    ///
    /// Position `i` of the result is the union, over every way the pattern fully
    /// matches some choice of letters from `input`, of the letters consumed at
    /// `i`. Each result set is a subset of the input set at the same position. If
    /// the pattern cannot match at all, every result set is empty.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::sync::Arc;
    ///
    /// use hexword_core::{Alphabet, LetterSet};
    /// use hexword_pattern::Pattern;
    ///
    /// let alphabet = Arc::new(Alphabet::uppercase());
    /// let set = |s: &str| s.chars().filter_map(|c| alphabet.letter(c)).collect::<LetterSet>();
    ///
    /// let pattern = Pattern::parse(r"(.)\1", &alphabet)?;
    /// let narrowed = pattern.narrow(&[set("AB"), set("A")]);
    /// assert_eq!(narrowed, vec![set("A"), set("A")]);
    /// # Ok::<(), hexword_pattern::PatternError>(())
    /// ```
    #[must_use]
    pub fn narrow(&self, input: &[LetterSet]) -> Vec<LetterSet> {
        let mut result = vec![LetterSet::EMPTY; input.len()];
        let flow = self.for_each_match(input, &mut |consumed| {
            for (acc, &set) in result.iter_mut().zip(consumed) {
                *acc |= set;
            }
            ControlFlow::Continue(())
        });
        debug_assert!(flow.is_continue());
        result
    }

    /// Returns `true` if the pattern fully matches some choice of letters from `input`.
    ///
    /// Exploration stops at the first full match.
    #[must_use]
    pub fn is_match(&self, input: &[LetterSet]) -> bool {
        self.for_each_match(input, &mut |_| ControlFlow::Break(())).is_break()
    }

    /// Returns `true` if the pattern matches the word spelled by `letters`.
    #[must_use]
    pub fn matches_word(&self, letters: &[Letter]) -> bool {
        let input = letters
            .iter()
            .copied()
            .map(LetterSet::from_elem)
            .collect::<Vec<_>>();
        self.is_match(&input)
    }
}
