//! Prompt text sent to the chat model.

use crate::error::PhraserError;
use lexfill_core::phrasing::PhraseRequest;
use lexfill_core::session::render_plain;
use minijinja::{AutoEscape, Environment};

const QUESTION_PROMPT: &str = "\
{{ legal_context }}

Conversation so far:
{{ history }}

Next placeholder to fill: {{ placeholder }}
Already filled placeholders:
{{ answers }}

Ask the user a clear, natural question to fill this placeholder.";

/// Builds the single user message asking the model for the next question.
pub fn build_question_prompt(legal_context: &str, request: &PhraseRequest<'_>) -> Result<String, PhraserError> {
    let mut env = Environment::new();
    env.set_auto_escape_callback(|_| AutoEscape::None);

    let prompt = env.render_str(
        QUESTION_PROMPT,
        minijinja::context! {
            legal_context => legal_context.trim_end(),
            history => render_plain(request.transcript),
            placeholder => request.placeholder.as_str(),
            answers => request.answers.to_pretty_json(),
        },
    )?;
    Ok(prompt)
}

#[cfg(test)]
mod tests {
    use super::*;
    use lexfill_core::document::DocType;
    use lexfill_core::placeholder::Placeholder;
    use lexfill_core::session::{AnswerStore, TranscriptEntry};

    #[test]
    fn test_prompt_sections() {
        let company = Placeholder::new("Company_Name");
        let investor = Placeholder::new("Investor_Name");
        let mut store = AnswerStore::new();
        store.put(company.clone(), "Acme & Co");
        let answers = store.snapshot();
        let transcript = vec![
            TranscriptEntry::prompt(&company, "What is the company name?"),
            TranscriptEntry::answer(&company, "Acme & Co"),
        ];
        let doc_type = DocType::new("safe");
        let request = PhraseRequest {
            placeholder: &investor,
            doc_type: &doc_type,
            transcript: &transcript,
            answers: &answers,
        };

        let prompt = build_question_prompt("Legal context.\n", &request).unwrap();

        assert!(prompt.starts_with("Legal context.\n\nConversation so far:\n"));
        assert!(prompt.contains("Assistant: What is the company name?\nUser: Acme & Co"));
        assert!(prompt.contains("Next placeholder to fill: Investor_Name\n"));
        assert!(prompt.contains("\"Company_Name\": \"Acme & Co\""));
        assert!(prompt.ends_with("Ask the user a clear, natural question to fill this placeholder."));
    }
}
