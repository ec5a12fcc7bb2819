//! Deterministic offline phraser.

use async_trait::async_trait;
use lexfill_core::error::Result;
use lexfill_core::phrasing::{PhraseRequest, Phraser};
use lexfill_core::placeholder::Placeholder;

/// Asks "What is the <label>?" for every placeholder.
///
/// Used when no API key is configured, and wherever repeatable questions
/// are needed.
#[derive(Debug, Clone, Default)]
pub struct TemplatePhraser;

impl TemplatePhraser {
    pub fn new() -> Self {
        Self
    }

    /// The question asked for `placeholder`.
    pub fn question(placeholder: &Placeholder) -> String {
        let label = placeholder.label();
        if label.is_empty() {
            "What value should fill the blank?".to_string()
        } else {
            format!("What is the {}?", label)
        }
    }
}

#[async_trait]
impl Phraser for TemplatePhraser {
    async fn phrase(&self, request: PhraseRequest<'_>) -> Result<String> {
        Ok(Self::question(request.placeholder))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lexfill_core::document::DocType;
    use lexfill_core::session::AnswerSnapshot;

    #[test]
    fn test_question_uses_label() {
        assert_eq!(
            TemplatePhraser::question(&Placeholder::new("Investor_Name")),
            "What is the Investor Name?"
        );
        assert_eq!(
            TemplatePhraser::question(&Placeholder::new("_____")),
            "What value should fill the blank?"
        );
    }

    #[tokio::test]
    async fn test_phrase_ignores_context() {
        let placeholder = Placeholder::new("Date");
        let doc_type = DocType::new("nda");
        let answers = AnswerSnapshot::default();
        let request = PhraseRequest {
            placeholder: &placeholder,
            doc_type: &doc_type,
            transcript: &[],
            answers: &answers,
        };

        assert_eq!(TemplatePhraser::new().phrase(request).await.unwrap(), "What is the Date?");
    }
}
