//! Placeholder sequencing.
//!
//! Pure functions deciding which placeholder a session asks for next. The
//! result depends only on sequence order and on which keys are answered,
//! never on answer values or time.

use super::answer_store::AnswerStore;
use crate::placeholder::{Placeholder, PlaceholderSequence};

/// Outcome of a sequencer query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NextPlaceholder<'a> {
    /// The first unanswered placeholder in sequence order.
    Ask(&'a Placeholder),
    /// Every placeholder has an answer.
    Done,
}

impl<'a> NextPlaceholder<'a> {
    pub fn is_done(&self) -> bool {
        matches!(self, Self::Done)
    }
}

/// Returns the first placeholder of `sequence` without an answer, or `Done`.
///
/// An empty sequence is immediately `Done`.
pub fn next<'a>(sequence: &'a PlaceholderSequence, answered: &AnswerStore) -> NextPlaceholder<'a> {
    sequence
        .iter()
        .find(|placeholder| !answered.has(placeholder))
        .map_or(NextPlaceholder::Done, NextPlaceholder::Ask)
}

/// Number of placeholders in `sequence` still waiting for an answer.
pub fn remaining(sequence: &PlaceholderSequence, answered: &AnswerStore) -> usize {
    sequence
        .iter()
        .filter(|placeholder| !answered.has(placeholder))
        .count()
}
