//! Projection of a session onto per-character highlight states.
//!
//! Purely derived from the passage, the input and the cursor; the engine
//! knows nothing about it.

use itertools::Itertools;
use std::ops::Range;

use crate::session::Session;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CharState {
    Correct,
    Incorrect,
    Current,
    Untyped,
}

/// Consecutive passage characters sharing a style.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Run {
    pub text: String,
    pub state: CharState,
    pub emphasized: bool,
}

pub fn char_states(expected: &[char], input: &[char], cursor: usize) -> Vec<CharState> {
    expected
        .iter()
        .enumerate()
        .map(|(idx, want)| match input.get(idx) {
            Some(typed) if typed == want => CharState::Correct,
            Some(_) => CharState::Incorrect,
            None if idx == cursor => CharState::Current,
            None => CharState::Untyped,
        })
        .collect()
}

/// Word containing the cursor, bounded by spaces of the passage. Empty once
/// the cursor is past the end.
pub fn current_word(expected: &[char], cursor: usize) -> Range<usize> {
    if cursor >= expected.len() {
        return expected.len()..expected.len();
    }
    let start = expected[..cursor]
        .iter()
        .rposition(|c| *c == ' ')
        .map_or(0, |idx| idx + 1);
    let end = expected[cursor..]
        .iter()
        .position(|c| *c == ' ')
        .map_or(expected.len(), |offset| cursor + offset);
    start..end
}

pub fn runs(session: &Session, emphasize_word: bool) -> Vec<Run> {
    let expected = session.expected();
    let states = char_states(expected, session.input(), session.cursor());
    let word = if emphasize_word {
        current_word(expected, session.cursor())
    } else {
        0..0
    };

    let grouped = expected
        .iter()
        .zip(states)
        .enumerate()
        .map(|(idx, (ch, state))| (*ch, state, word.contains(&idx)))
        .chunk_by(|(_, state, emphasized)| (*state, *emphasized));

    let runs: Vec<Run> = grouped
        .into_iter()
        .map(|((state, emphasized), group)| Run {
            text: group
                .map(|(ch, state, _)| match (ch, state) {
                    (' ', CharState::Incorrect) => '·',
                    (ch, _) => ch,
                })
                .collect(),
            state,
            emphasized,
        })
        .collect();
    runs
}
