#[cfg(test)]
mod tests {
    use crate::document::{AnalyzedDocument, DocType, DocumentAnalyzer, DocumentRenderer, RenderedDocument, SessionId};
    use crate::error::{FillError, Result};
    use crate::phrasing::{PhraseRequest, Phraser};
    use crate::placeholder::{Placeholder, PlaceholderSequence};
    use crate::session::{AnswerSnapshot, SessionController, SessionState, TranscriptEntry, TranscriptLog, TranscriptRole};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};

    // Mock DocumentAnalyzer for testing
    struct MockAnalyzer {
        placeholders: Vec<&'static str>,
        fail: bool,
        calls: AtomicUsize,
    }

    impl MockAnalyzer {
        fn with(placeholders: Vec<&'static str>) -> Self {
            Self {
                placeholders,
                fail: false,
                calls: AtomicUsize::new(0),
            }
        }

        fn failing() -> Self {
            Self {
                placeholders: Vec::new(),
                fail: true,
                calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait::async_trait]
    impl DocumentAnalyzer for MockAnalyzer {
        async fn analyze(&self, _bytes: &[u8], _file_name: &str, _doc_type: &DocType) -> Result<AnalyzedDocument> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(FillError::io("disk full"));
            }
            Ok(AnalyzedDocument {
                session_id: SessionId::new("file-1"),
                placeholders: PlaceholderSequence::new(self.placeholders.clone()),
            })
        }
    }

    // Mock Phraser for testing: deterministic questions, optional failure
    struct MockPhraser {
        fail_on: Mutex<Option<String>>,
        calls: AtomicUsize,
    }

    impl MockPhraser {
        fn new() -> Self {
            Self {
                fail_on: Mutex::new(None),
                calls: AtomicUsize::new(0),
            }
        }

        fn set_fail_on(&self, placeholder: Option<&str>) {
            *self.fail_on.lock().unwrap() = placeholder.map(str::to_string);
        }
    }

    fn question(placeholder: &Placeholder) -> String {
        format!("What is {}?", placeholder)
    }

    #[async_trait::async_trait]
    impl Phraser for MockPhraser {
        async fn phrase(&self, request: PhraseRequest<'_>) -> Result<String> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail_on.lock().unwrap().as_deref() == Some(request.placeholder.as_str()) {
                return Err(FillError::phrase_failed("model unavailable"));
            }
            Ok(question(request.placeholder))
        }
    }

    // Mock DocumentRenderer for testing
    struct MockRenderer {
        fail: Mutex<bool>,
        calls: AtomicUsize,
    }

    impl MockRenderer {
        fn new() -> Self {
            Self {
                fail: Mutex::new(false),
                calls: AtomicUsize::new(0),
            }
        }

        fn set_fail(&self, fail: bool) {
            *self.fail.lock().unwrap() = fail;
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait::async_trait]
    impl DocumentRenderer for MockRenderer {
        async fn render(&self, session_id: &SessionId, answers: &AnswerSnapshot) -> Result<RenderedDocument> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if *self.fail.lock().unwrap() {
                return Err(FillError::io("template missing"));
            }
            let body = answers
                .iter()
                .map(|(key, value)| format!("{}={}", key, value))
                .collect::<Vec<_>>()
                .join(";");
            Ok(RenderedDocument {
                file_name: format!("{}_filled.txt", session_id),
                bytes: body.into_bytes(),
            })
        }
    }

    struct Fixture {
        analyzer: Arc<MockAnalyzer>,
        phraser: Arc<MockPhraser>,
        renderer: Arc<MockRenderer>,
    }

    impl Fixture {
        fn new(placeholders: Vec<&'static str>) -> Self {
            Self::with_analyzer(MockAnalyzer::with(placeholders))
        }

        fn with_analyzer(analyzer: MockAnalyzer) -> Self {
            Self {
                analyzer: Arc::new(analyzer),
                phraser: Arc::new(MockPhraser::new()),
                renderer: Arc::new(MockRenderer::new()),
            }
        }

        fn controller(&self) -> SessionController {
            SessionController::new(self.analyzer.clone(), self.phraser.clone(), self.renderer.clone())
        }
    }

    async fn started(fixture: &Fixture) -> SessionController {
        let mut controller = fixture.controller();
        controller
            .upload(b"template", "template.txt", DocType::new("safe"))
            .await
            .unwrap();
        controller
    }

    fn active_name(controller: &SessionController) -> Option<String> {
        controller.active_placeholder().map(|p| p.to_string())
    }

    #[tokio::test]
    async fn test_two_placeholder_scenario() {
        let fixture = Fixture::new(vec!["A", "B"]);
        let mut controller = started(&fixture).await;

        assert_eq!(controller.state(), SessionState::Collecting);
        assert_eq!(active_name(&controller), Some("A".to_string()));

        let state = controller.submit_answer("A", "x").await.unwrap();
        assert_eq!(state, SessionState::Collecting);
        assert_eq!(active_name(&controller), Some("B".to_string()));

        let state = controller.submit_answer("B", "y").await.unwrap();
        assert_eq!(state, SessionState::Complete);
        assert_eq!(controller.active_placeholder(), None);

        let snapshot = controller.snapshot();
        assert_eq!(snapshot.len(), 2);
        assert_eq!(snapshot.get("A"), Some("x"));
        assert_eq!(snapshot.get("B"), Some("y"));
    }

    #[tokio::test]
    async fn test_answers_in_sequencer_order_reach_complete() {
        let sequences: Vec<Vec<&'static str>> = vec![
            vec!["Only"],
            vec!["Company", "Investor", "Amount"],
            vec!["Z", "Y", "X", "W", "V"],
        ];

        for names in sequences {
            let fixture = Fixture::new(names.clone());
            let mut controller = started(&fixture).await;

            for step in 0..names.len() {
                let active = controller.active_placeholder().cloned().unwrap();
                assert_eq!(active.as_str(), names[step]);
                controller.submit_answer(active.as_str(), &format!("value {}", step)).await.unwrap();
            }

            assert_eq!(controller.state(), SessionState::Complete);
            let snapshot = controller.snapshot();
            let mut keys: Vec<&str> = snapshot.keys().map(Placeholder::as_str).collect();
            let mut expected = names.clone();
            keys.sort();
            expected.sort();
            assert_eq!(keys, expected);
        }
    }

    #[tokio::test]
    async fn test_out_of_order_answer_is_rejected_without_mutation() {
        let fixture = Fixture::new(vec!["A"]);
        let mut controller = started(&fixture).await;
        let transcript_before = controller.transcript().to_vec();

        let err = controller.submit_answer("B", "x").await.unwrap_err();

        assert_eq!(
            err,
            FillError::OutOfOrderAnswer {
                expected: "A".to_string(),
                received: "B".to_string(),
            }
        );
        assert_eq!(active_name(&controller), Some("A".to_string()));
        assert!(controller.snapshot().is_empty());
        assert_eq!(controller.transcript(), transcript_before.as_slice());
    }

    #[tokio::test]
    async fn test_answering_a_later_placeholder_is_out_of_order() {
        let fixture = Fixture::new(vec!["A", "B", "C"]);
        let mut controller = started(&fixture).await;
        controller.submit_answer("A", "x").await.unwrap();

        for name in ["A", "C", "unknown"] {
            let err = controller.submit_answer(name, "value").await.unwrap_err();
            assert!(err.is_out_of_order(), "{} should be out of order", name);
        }
        assert_eq!(controller.snapshot().len(), 1);
        assert_eq!(active_name(&controller), Some("B".to_string()));
    }

    #[tokio::test]
    async fn test_render_while_collecting_is_invalid() {
        let fixture = Fixture::new(vec!["A"]);
        let mut controller = started(&fixture).await;

        let err = controller.render().await.unwrap_err();

        assert!(err.is_invalid_transition());
        assert_eq!(fixture.renderer.calls(), 0);
        assert_eq!(controller.state(), SessionState::Collecting);
    }

    #[tokio::test]
    async fn test_render_before_upload_is_invalid() {
        let fixture = Fixture::new(vec!["A"]);
        let mut controller = fixture.controller();

        assert!(controller.render().await.unwrap_err().is_invalid_transition());
        assert_eq!(fixture.renderer.calls(), 0);
    }

    #[tokio::test]
    async fn test_empty_sequence_completes_immediately() {
        let fixture = Fixture::new(vec![]);
        let controller = started(&fixture).await;

        assert_eq!(controller.state(), SessionState::Complete);
        assert_eq!(controller.active_placeholder(), None);
        assert_eq!(controller.transcript().iter().filter(|e| e.is_prompt()).count(), 0);
        assert_eq!(fixture.phraser.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_empty_sequence_can_render_right_away() {
        let fixture = Fixture::new(vec![]);
        let mut controller = started(&fixture).await;

        let document = controller.render().await.unwrap();
        assert!(document.bytes.is_empty());
        assert_eq!(controller.state(), SessionState::Rendered);
    }

    #[tokio::test]
    async fn test_blank_answer_is_rejected() {
        let fixture = Fixture::new(vec!["A", "B"]);
        let mut controller = started(&fixture).await;
        let transcript_len = controller.transcript().len();

        for blank in ["", "   ", "\n\t"] {
            let err = controller.submit_answer("A", blank).await.unwrap_err();
            assert_eq!(
                err,
                FillError::EmptyAnswer {
                    placeholder: "A".to_string()
                }
            );
        }

        assert_eq!(active_name(&controller), Some("A".to_string()));
        assert_eq!(controller.transcript().len(), transcript_len);
        assert!(controller.snapshot().is_empty());
    }

    #[tokio::test]
    async fn test_answers_are_stored_trimmed() {
        let fixture = Fixture::new(vec!["A"]);
        let mut controller = started(&fixture).await;

        controller.submit_answer("A", "  Acme Corp \n").await.unwrap();

        assert_eq!(controller.snapshot().get("A"), Some("Acme Corp"));
        let answer = &controller.transcript()[1];
        assert_eq!(answer.role, TranscriptRole::User);
        assert_eq!(answer.text, "Acme Corp");
    }

    #[tokio::test]
    async fn test_phrase_failure_leaves_session_untouched() {
        let fixture = Fixture::new(vec!["A", "B"]);
        let mut controller = started(&fixture).await;
        let transcript_before = controller.transcript().to_vec();

        fixture.phraser.set_fail_on(Some("B"));
        let err = controller.submit_answer("A", "x").await.unwrap_err();
        assert!(matches!(err, FillError::PhraseFailed(_)));
        assert_eq!(active_name(&controller), Some("A".to_string()));
        assert!(controller.snapshot().is_empty());
        assert_eq!(controller.transcript(), transcript_before.as_slice());

        fixture.phraser.set_fail_on(None);
        controller.submit_answer("A", "x").await.unwrap();
        assert_eq!(active_name(&controller), Some("B".to_string()));
    }

    #[tokio::test]
    async fn test_first_prompt_failure_keeps_session_uninitialized() {
        let fixture = Fixture::new(vec!["A"]);
        fixture.phraser.set_fail_on(Some("A"));
        let mut controller = fixture.controller();

        let err = controller
            .upload(b"template", "template.txt", DocType::default())
            .await
            .unwrap_err();

        assert!(matches!(err, FillError::PhraseFailed(_)));
        assert_eq!(controller.state(), SessionState::Uninitialized);
        assert!(controller.session().id().is_none());
        assert!(controller.transcript().is_empty());
    }

    #[tokio::test]
    async fn test_upload_failure_creates_no_session() {
        let fixture = Fixture::with_analyzer(MockAnalyzer::failing());
        let mut controller = fixture.controller();

        let err = controller
            .upload(b"broken", "broken.txt", DocType::default())
            .await
            .unwrap_err();

        assert!(matches!(err, FillError::UploadFailed(_)));
        assert_eq!(controller.state(), SessionState::Uninitialized);
        assert!(controller.session().id().is_none());
    }

    #[tokio::test]
    async fn test_second_upload_is_invalid() {
        let fixture = Fixture::new(vec!["A"]);
        let mut controller = started(&fixture).await;

        let err = controller
            .upload(b"other", "other.txt", DocType::default())
            .await
            .unwrap_err();

        assert!(err.is_invalid_transition());
        assert_eq!(fixture.analyzer.calls.load(Ordering::SeqCst), 1);
        assert_eq!(controller.session().id(), Some(&SessionId::new("file-1")));
    }

    #[tokio::test]
    async fn test_answer_while_complete_is_invalid() {
        let fixture = Fixture::new(vec!["A"]);
        let mut controller = started(&fixture).await;
        controller.submit_answer("A", "x").await.unwrap();
        let transcript_len = controller.transcript().len();

        let err = controller.submit_answer("A", "again").await.unwrap_err();

        assert!(err.is_invalid_transition());
        assert_eq!(controller.snapshot().get("A"), Some("x"));
        assert_eq!(controller.transcript().len(), transcript_len);
    }

    #[tokio::test]
    async fn test_answer_before_upload_is_invalid() {
        let fixture = Fixture::new(vec!["A"]);
        let mut controller = fixture.controller();

        assert!(controller.submit_answer("A", "x").await.unwrap_err().is_invalid_transition());
        assert!(controller.answer_active("x").await.unwrap_err().is_invalid_transition());
    }

    #[tokio::test]
    async fn test_render_failure_keeps_complete_and_can_retry() {
        let fixture = Fixture::new(vec!["A"]);
        let mut controller = started(&fixture).await;
        controller.submit_answer("A", "x").await.unwrap();

        fixture.renderer.set_fail(true);
        let err = controller.render().await.unwrap_err();
        assert!(matches!(err, FillError::RenderFailed(_)));
        assert_eq!(controller.state(), SessionState::Complete);
        assert!(controller.document().is_none());

        fixture.renderer.set_fail(false);
        let document = controller.render().await.unwrap();
        assert_eq!(document.bytes, b"A=x".to_vec());
        assert_eq!(controller.state(), SessionState::Rendered);
        assert_eq!(fixture.renderer.calls(), 2);
    }

    #[tokio::test]
    async fn test_rerender_keeps_rendered_state() {
        let fixture = Fixture::new(vec!["A"]);
        let mut controller = started(&fixture).await;
        controller.submit_answer("A", "x").await.unwrap();

        controller.render().await.unwrap();
        controller.render().await.unwrap();

        assert_eq!(controller.state(), SessionState::Rendered);
        assert_eq!(fixture.renderer.calls(), 2);
        assert_eq!(
            controller.document().map(|d| d.file_name.as_str()),
            Some("file-1_filled.txt")
        );
    }

    #[tokio::test]
    async fn test_answer_active_follows_sequence() {
        let fixture = Fixture::new(vec!["A", "B"]);
        let mut controller = started(&fixture).await;

        controller.answer_active("x").await.unwrap();
        controller.answer_active("y").await.unwrap();

        assert_eq!(controller.state(), SessionState::Complete);
        assert!(controller.answer_active("z").await.unwrap_err().is_invalid_transition());
    }

    #[tokio::test]
    async fn test_transcript_shape() {
        let fixture = Fixture::new(vec!["A", "B"]);
        let mut controller = started(&fixture).await;
        controller.submit_answer("A", "x").await.unwrap();
        controller.submit_answer("B", "y").await.unwrap();

        let entries: Vec<(TranscriptRole, &str)> = controller
            .transcript()
            .iter()
            .map(|e| (e.role, e.text.as_str()))
            .collect();
        assert_eq!(
            entries,
            vec![
                (TranscriptRole::Assistant, "What is A?"),
                (TranscriptRole::User, "x"),
                (TranscriptRole::Assistant, "What is B?"),
                (TranscriptRole::User, "y"),
                (TranscriptRole::Assistant, crate::session::COMPLETION_MESSAGE),
            ]
        );
        assert_eq!(controller.transcript().last(), Some(&TranscriptEntry::completion()));
    }

    #[tokio::test]
    async fn test_replay_reproduces_transcript() {
        enum Action {
            Answer(&'static str, &'static str),
            Render,
        }
        let actions = [
            Action::Answer("Company", "Acme"),
            Action::Answer("Investor", "Jane Doe"),
            Action::Answer("Amount", "$50,000"),
            Action::Render,
        ];

        let mut transcripts = Vec::new();
        for _ in 0..2 {
            let fixture = Fixture::new(vec!["Company", "Investor", "Amount"]);
            let mut controller = started(&fixture).await;
            for action in &actions {
                match action {
                    Action::Answer(name, value) => {
                        controller.submit_answer(name, value).await.unwrap();
                    }
                    Action::Render => {
                        controller.render().await.unwrap();
                    }
                }
            }
            transcripts.push(controller.into_session());
        }

        let first = &transcripts[0];
        assert_eq!(first.transcript(), transcripts[1].transcript());

        let rebuilt = TranscriptLog::reconstruct(first.placeholders(), first.answers(), question);
        assert_eq!(first.transcript_log(), &rebuilt);
    }

    #[tokio::test]
    async fn test_begin_from_analyzed_sequence() {
        let fixture = Fixture::new(vec![]);
        let mut controller = fixture.controller();

        let state = controller
            .begin(
                SessionId::new("out-of-band"),
                PlaceholderSequence::new(["A", "A", "B"]),
                DocType::new("nda"),
            )
            .await
            .unwrap();

        assert_eq!(state, SessionState::Collecting);
        assert_eq!(controller.session().placeholders().len(), 2);
        assert_eq!(controller.session().doc_type().as_str(), "nda");
        assert!(controller.session().created_at().is_some());
        assert_eq!(controller.session().remaining(), 2);
        assert_eq!(fixture.analyzer.calls.load(Ordering::SeqCst), 0);
    }
}
