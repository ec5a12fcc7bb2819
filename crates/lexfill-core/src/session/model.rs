//! Session domain model.
//!
//! This module contains the Session entity: the state of one uploaded
//! template while its placeholders are collected. All mutation goes through
//! [`SessionController`](super::SessionController).

use super::answer_store::{AnswerSnapshot, AnswerStore};
use super::state::SessionState;
use super::transcript::{TranscriptEntry, TranscriptLog};
use crate::document::{DocType, RenderedDocument, SessionId};
use crate::placeholder::{Placeholder, PlaceholderSequence};

/// Represents one fill session.
///
/// A session contains:
/// - The identifier issued at upload (absent before upload)
/// - The fixed, ordered placeholder sequence of the template
/// - The answers collected so far and the transcript of the exchange
/// - The active placeholder awaiting an answer, if any
/// - The lifecycle state and the last rendered document
///
/// Sessions live only as long as their owner keeps them; dropping one is
/// the whole abandonment story.
#[derive(Debug, Clone, Default)]
pub struct Session {
    pub(super) id: Option<SessionId>,
    pub(super) doc_type: DocType,
    /// Timestamp when the session was started (RFC 3339)
    pub(super) created_at: Option<String>,
    pub(super) placeholders: PlaceholderSequence,
    pub(super) answers: AnswerStore,
    pub(super) transcript: TranscriptLog,
    pub(super) active: Option<Placeholder>,
    pub(super) state: SessionState,
    pub(super) rendered: Option<RenderedDocument>,
}

impl Session {
    pub fn id(&self) -> Option<&SessionId> {
        self.id.as_ref()
    }

    pub fn doc_type(&self) -> &DocType {
        &self.doc_type
    }

    pub fn created_at(&self) -> Option<&str> {
        self.created_at.as_deref()
    }

    pub fn placeholders(&self) -> &PlaceholderSequence {
        &self.placeholders
    }

    pub fn answers(&self) -> &AnswerStore {
        &self.answers
    }

    pub fn snapshot(&self) -> AnswerSnapshot {
        self.answers.snapshot()
    }

    pub fn transcript(&self) -> &[TranscriptEntry] {
        self.transcript.all()
    }

    pub fn transcript_log(&self) -> &TranscriptLog {
        &self.transcript
    }

    pub fn active_placeholder(&self) -> Option<&Placeholder> {
        self.active.as_ref()
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    /// The most recently rendered document, once the session is `Rendered`.
    pub fn document(&self) -> Option<&RenderedDocument> {
        self.rendered.as_ref()
    }

    /// Placeholders still waiting for an answer.
    pub fn remaining(&self) -> usize {
        super::sequencer::remaining(&self.placeholders, &self.answers)
    }
}
