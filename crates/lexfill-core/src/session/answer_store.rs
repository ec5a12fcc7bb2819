//! Answers collected for one session.

use crate::placeholder::Placeholder;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Mapping from placeholder to the answer supplied for it.
///
/// Iteration order is the order answers were supplied, which is not
/// necessarily template order. The store only grows; `put` on an existing
/// key overwrites the value in place. The session controller guarantees that
/// every key belongs to the session's placeholder sequence.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnswerStore {
    answers: IndexMap<Placeholder, String>,
}

impl AnswerStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or overwrites the answer for `placeholder`.
    pub fn put(&mut self, placeholder: Placeholder, answer: impl Into<String>) {
        self.answers.insert(placeholder, answer.into());
    }

    /// Membership test used by the sequencer.
    pub fn has(&self, placeholder: &Placeholder) -> bool {
        self.answers.contains_key(placeholder)
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.answers.get(name).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.answers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.answers.is_empty()
    }

    /// Returns an immutable copy suitable for the rendering collaborator.
    pub fn snapshot(&self) -> AnswerSnapshot {
        AnswerSnapshot(self.answers.clone())
    }
}

/// Frozen copy of an [`AnswerStore`].
///
/// Serializes as a JSON object keyed by placeholder name, in answer order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AnswerSnapshot(IndexMap<Placeholder, String>);

impl AnswerSnapshot {
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &Placeholder> {
        self.0.keys()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Placeholder, &str)> {
        self.0.iter().map(|(key, value)| (key, value.as_str()))
    }

    /// Pretty JSON rendering used as phrasing context.
    pub fn to_pretty_json(&self) -> String {
        serde_json::to_string_pretty(&self.0).unwrap_or_else(|_| "{}".to_string())
    }
}
