//! Transcript types.
//!
//! The transcript is the ordered record of prompts and answers exchanged in a
//! session. It exists for display only; the controller never reads it back
//! to make a decision.

use super::answer_store::AnswerStore;
use crate::placeholder::{Placeholder, PlaceholderSequence};
use serde::{Deserialize, Serialize};
use strum::Display;

/// Notice appended once every placeholder has an answer.
pub const COMPLETION_MESSAGE: &str = "✅ All placeholders filled!";

/// Represents the author of a transcript entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display)]
#[serde(rename_all = "lowercase")]
pub enum TranscriptRole {
    /// Question or notice produced on the assistant side.
    #[strum(serialize = "Assistant")]
    Assistant,
    /// Answer typed by the user.
    #[strum(serialize = "User")]
    User,
}

/// A single transcript line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranscriptEntry {
    /// Who produced the entry.
    pub role: TranscriptRole,
    /// Display text.
    pub text: String,
    /// The placeholder the entry asks about or answers, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<Placeholder>,
}

impl TranscriptEntry {
    pub fn prompt(placeholder: &Placeholder, text: impl Into<String>) -> Self {
        Self {
            role: TranscriptRole::Assistant,
            text: text.into(),
            placeholder: Some(placeholder.clone()),
        }
    }

    pub fn answer(placeholder: &Placeholder, text: impl Into<String>) -> Self {
        Self {
            role: TranscriptRole::User,
            text: text.into(),
            placeholder: Some(placeholder.clone()),
        }
    }

    pub fn completion() -> Self {
        Self {
            role: TranscriptRole::Assistant,
            text: COMPLETION_MESSAGE.to_string(),
            placeholder: None,
        }
    }

    /// True for assistant entries that ask for a placeholder.
    pub fn is_prompt(&self) -> bool {
        self.role == TranscriptRole::Assistant && self.placeholder.is_some()
    }
}

/// Renders entries as `Role: text` lines, oldest first.
pub fn render_plain(entries: &[TranscriptEntry]) -> String {
    entries
        .iter()
        .map(|entry| format!("{}: {}", entry.role, entry.text))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Append-only transcript of one session.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranscriptLog {
    entries: Vec<TranscriptEntry>,
}

impl TranscriptLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, entry: TranscriptEntry) {
        self.entries.push(entry);
    }

    pub fn all(&self) -> &[TranscriptEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Renders the log as `Role: text` lines, oldest first.
    pub fn render_plain(&self) -> String {
        render_plain(&self.entries)
    }

    /// Rebuilds the transcript a session would hold after answering
    /// `answers` in sequence order, using `phrase` for every prompt.
    ///
    /// Placeholders after the first unanswered one are ignored, matching a
    /// session that only ever accepts answers for its active placeholder.
    pub fn reconstruct<F>(sequence: &PlaceholderSequence, answers: &AnswerStore, mut phrase: F) -> Self
    where
        F: FnMut(&Placeholder) -> String,
    {
        let mut log = Self::new();
        for placeholder in sequence {
            log.append(TranscriptEntry::prompt(placeholder, phrase(placeholder)));
            match answers.get(placeholder.as_str()) {
                Some(answer) => log.append(TranscriptEntry::answer(placeholder, answer)),
                None => return log,
            }
        }
        log.append(TranscriptEntry::completion());
        log
    }
}
