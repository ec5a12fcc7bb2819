//! Question phrasing collaborator.

use crate::document::DocType;
use crate::error::Result;
use crate::placeholder::Placeholder;
use crate::session::{AnswerSnapshot, TranscriptEntry};
use async_trait::async_trait;

/// Everything a phraser may use to word the next question.
#[derive(Debug, Clone, Copy)]
pub struct PhraseRequest<'a> {
    /// The placeholder to ask about.
    pub placeholder: &'a Placeholder,
    /// Document type of the session.
    pub doc_type: &'a DocType,
    /// Conversation so far, oldest first.
    pub transcript: &'a [TranscriptEntry],
    /// Answers collected so far.
    pub answers: &'a AnswerSnapshot,
}

/// Turns a placeholder into a human-readable question.
///
/// The returned text is opaque to the session: it is appended to the
/// transcript verbatim.
#[async_trait]
pub trait Phraser: Send + Sync {
    /// # Errors
    ///
    /// Any error is surfaced to the caller as `FillError::PhraseFailed`.
    async fn phrase(&self, request: PhraseRequest<'_>) -> Result<String>;
}
