use super::answer_store::AnswerSnapshot;
use super::model::Session;
use super::sequencer::{self, NextPlaceholder};
use super::state::SessionState;
use super::transcript::{TranscriptEntry, TranscriptLog};
use crate::document::{DocType, DocumentAnalyzer, DocumentRenderer, RenderedDocument, SessionId};
use crate::error::{FillError, Result};
use crate::phrasing::{PhraseRequest, Phraser};
use crate::placeholder::{Placeholder, PlaceholderSequence};
use std::sync::Arc;

/// Drives one session through upload, answer collection, and rendering.
///
/// `SessionController` is responsible for:
/// - Turning an analyzed upload into a session (`upload` / `begin`)
/// - Accepting answers for the active placeholder only
/// - Asking the sequencer what to request next and phrasing the prompt
/// - Unlocking and delegating rendering once every answer is in
///
/// Every action is all-or-nothing. Fallible work (collaborator calls,
/// validation) happens before the session is touched, so a rejected action
/// leaves the answers, transcript, active placeholder, and state exactly
/// as they were.
pub struct SessionController {
    analyzer: Arc<dyn DocumentAnalyzer>,
    phraser: Arc<dyn Phraser>,
    renderer: Arc<dyn DocumentRenderer>,
    session: Session,
}

impl SessionController {
    /// Creates a controller holding an empty, `Uninitialized` session.
    ///
    /// # Arguments
    ///
    /// * `analyzer` - Extracts placeholders from uploaded templates
    /// * `phraser` - Words the question for each placeholder
    /// * `renderer` - Produces the filled document
    pub fn new(
        analyzer: Arc<dyn DocumentAnalyzer>,
        phraser: Arc<dyn Phraser>,
        renderer: Arc<dyn DocumentRenderer>,
    ) -> Self {
        Self {
            analyzer,
            phraser,
            renderer,
            session: Session::default(),
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Releases the session, e.g. to inspect it after the controller is done.
    pub fn into_session(self) -> Session {
        self.session
    }

    pub fn state(&self) -> SessionState {
        self.session.state
    }

    pub fn active_placeholder(&self) -> Option<&Placeholder> {
        self.session.active.as_ref()
    }

    pub fn transcript(&self) -> &[TranscriptEntry] {
        self.session.transcript.all()
    }

    pub fn snapshot(&self) -> AnswerSnapshot {
        self.session.answers.snapshot()
    }

    pub fn document(&self) -> Option<&RenderedDocument> {
        self.session.rendered.as_ref()
    }

    /// Analyzes an uploaded template and starts collecting its placeholders.
    ///
    /// # Errors
    ///
    /// - `InvalidStateTransition` if a document was already uploaded
    /// - `UploadFailed` if the analyzer rejects the document
    /// - `PhraseFailed` if the first question cannot be phrased
    pub async fn upload(&mut self, bytes: &[u8], file_name: &str, doc_type: DocType) -> Result<SessionState> {
        self.ensure_state("upload a document", SessionState::Uninitialized)?;

        let analyzed = self
            .analyzer
            .analyze(bytes, file_name, &doc_type)
            .await
            .map_err(|err| {
                tracing::error!(file_name, error = %err, "Document analysis failed");
                match err {
                    FillError::UploadFailed(_) => err,
                    other => FillError::upload_failed(other.to_string()),
                }
            })?;

        tracing::info!(
            session_id = %analyzed.session_id,
            placeholders = analyzed.placeholders.len(),
            "Document analyzed"
        );

        self.begin(analyzed.session_id, analyzed.placeholders, doc_type).await
    }

    /// Starts a session from an already analyzed placeholder sequence.
    ///
    /// A non-empty sequence moves the session to `Collecting` with the first
    /// placeholder active and its prompt in the transcript. An empty sequence
    /// moves straight to `Complete`.
    ///
    /// # Errors
    ///
    /// - `InvalidStateTransition` unless the session is `Uninitialized`
    /// - `PhraseFailed` if the first question cannot be phrased
    pub async fn begin(
        &mut self,
        session_id: SessionId,
        placeholders: PlaceholderSequence,
        doc_type: DocType,
    ) -> Result<SessionState> {
        self.ensure_state("begin a session", SessionState::Uninitialized)?;

        let answers = self.session.answers.snapshot();
        let mut transcript = TranscriptLog::new();
        let (active, state) = match sequencer::next(&placeholders, &self.session.answers) {
            NextPlaceholder::Ask(first) => {
                let prompt = self.phrase(first, &doc_type, &transcript, &answers).await?;
                transcript.append(TranscriptEntry::prompt(first, prompt));
                (Some(first.clone()), SessionState::Collecting)
            }
            NextPlaceholder::Done => {
                transcript.append(TranscriptEntry::completion());
                (None, SessionState::Complete)
            }
        };

        tracing::info!(
            session_id = %session_id,
            doc_type = %doc_type,
            state = %state,
            "Session started"
        );

        self.session = Session {
            id: Some(session_id),
            doc_type,
            created_at: Some(chrono::Utc::now().to_rfc3339()),
            placeholders,
            transcript,
            active,
            state,
            ..Session::default()
        };

        Ok(state)
    }

    /// Records `answer` for `placeholder` and advances to the next question.
    ///
    /// The answer is stored trimmed. When it was the last missing answer the
    /// session becomes `Complete` and the active placeholder is cleared.
    ///
    /// # Errors
    ///
    /// - `InvalidStateTransition` unless the session is `Collecting`
    /// - `OutOfOrderAnswer` if `placeholder` is not the active placeholder
    /// - `EmptyAnswer` if `answer` is blank
    /// - `PhraseFailed` if the next question cannot be phrased
    pub async fn submit_answer(&mut self, placeholder: &str, answer: &str) -> Result<SessionState> {
        self.ensure_state("submit an answer", SessionState::Collecting)?;

        let active = self
            .session
            .active
            .clone()
            .ok_or_else(|| FillError::invalid_transition("submit an answer", "no placeholder is active"))?;

        if active.as_str() != placeholder {
            tracing::warn!(
                expected = %active,
                received = placeholder,
                "Rejected out of order answer"
            );
            return Err(FillError::OutOfOrderAnswer {
                expected: active.to_string(),
                received: placeholder.to_string(),
            });
        }

        let answer = answer.trim();
        if answer.is_empty() {
            tracing::warn!(placeholder = %active, "Rejected empty answer");
            return Err(FillError::EmptyAnswer {
                placeholder: active.to_string(),
            });
        }

        let mut answers = self.session.answers.clone();
        answers.put(active.clone(), answer);
        let mut transcript = self.session.transcript.clone();
        transcript.append(TranscriptEntry::answer(&active, answer));

        let next = match sequencer::next(&self.session.placeholders, &answers) {
            NextPlaceholder::Ask(next) => Some(next.clone()),
            NextPlaceholder::Done => None,
        };
        tracing::debug!(
            answered = %active,
            next = ?next.as_ref().map(Placeholder::as_str),
            "Sequencer advanced"
        );

        let state = match &next {
            Some(next) => {
                let prompt = self
                    .phrase(next, &self.session.doc_type, &transcript, &answers.snapshot())
                    .await?;
                transcript.append(TranscriptEntry::prompt(next, prompt));
                SessionState::Collecting
            }
            None => {
                transcript.append(TranscriptEntry::completion());
                SessionState::Complete
            }
        };

        self.session.answers = answers;
        self.session.transcript = transcript;
        self.session.active = next;
        if state != self.session.state {
            tracing::info!(
                session_id = ?self.session.id.as_ref().map(SessionId::as_str),
                state = %state,
                "All placeholders answered"
            );
        }
        self.session.state = state;

        Ok(state)
    }

    /// Answers whichever placeholder is currently active.
    ///
    /// # Errors
    ///
    /// Same as [`submit_answer`](Self::submit_answer).
    pub async fn answer_active(&mut self, answer: &str) -> Result<SessionState> {
        let active = self
            .session
            .active
            .clone()
            .ok_or_else(|| FillError::invalid_transition("submit an answer", self.session.state))?;
        self.submit_answer(active.as_str(), answer).await
    }

    /// Renders the filled document.
    ///
    /// The first success moves `Complete` to `Rendered`; later calls render
    /// again without changing the state.
    ///
    /// # Errors
    ///
    /// - `InvalidStateTransition` unless the session is `Complete` or `Rendered`;
    ///   the renderer is not called in that case
    /// - `RenderFailed` if the renderer fails; the state is unchanged
    pub async fn render(&mut self) -> Result<&RenderedDocument> {
        if !self.session.state.can_render() {
            tracing::warn!(state = %self.session.state, "Rejected render request");
            return Err(FillError::invalid_transition("render", self.session.state));
        }

        let session_id = self
            .session
            .id
            .clone()
            .ok_or_else(|| FillError::invalid_transition("render", "no document was uploaded"))?;
        let snapshot = self.session.answers.snapshot();

        let document = self
            .renderer
            .render(&session_id, &snapshot)
            .await
            .map_err(|err| {
                tracing::error!(session_id = %session_id, error = %err, "Rendering failed");
                match err {
                    FillError::RenderFailed(_) => err,
                    other => FillError::render_failed(other.to_string()),
                }
            })?;

        tracing::info!(
            session_id = %session_id,
            bytes = document.bytes.len(),
            "Document rendered"
        );

        self.session.state = SessionState::Rendered;
        let document: &RenderedDocument = self.session.rendered.insert(document);
        Ok(document)
    }

    fn ensure_state(&self, action: &'static str, expected: SessionState) -> Result<()> {
        if self.session.state == expected {
            Ok(())
        } else {
            tracing::warn!(action, state = %self.session.state, "Rejected action");
            Err(FillError::invalid_transition(action, self.session.state))
        }
    }

    async fn phrase(
        &self,
        placeholder: &Placeholder,
        doc_type: &DocType,
        transcript: &TranscriptLog,
        answers: &AnswerSnapshot,
    ) -> Result<String> {
        let request = PhraseRequest {
            placeholder,
            doc_type,
            transcript: transcript.all(),
            answers,
        };
        self.phraser.phrase(request).await.map_err(|err| {
            tracing::error!(placeholder = %placeholder, error = %err, "Phrasing failed");
            match err {
                FillError::PhraseFailed(_) => err,
                other => FillError::phrase_failed(other.to_string()),
            }
        })
    }
}
