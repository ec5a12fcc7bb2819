//! Fill use case implementation.
//!
//! `FillService` is the entry point for presentation layers: it loads
//! templates from disk, starts sessions, drives answers-file batch fills,
//! and writes filled documents.

use crate::session_factory::SessionFactory;
use anyhow::{Context, Result, anyhow, bail};
use lexfill_core::config::LexfillConfig;
use lexfill_core::document::{DocType, RenderedDocument};
use lexfill_core::placeholder::PlaceholderSequence;
use lexfill_core::session::{Session, SessionController, SessionState};
use lexfill_infrastructure::template_analyzer::extract_placeholders;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Answers keyed by placeholder name, as read from an answers file.
pub type Answers = HashMap<String, String>;

/// Result of a batch fill.
#[derive(Debug, Clone)]
pub struct BatchOutcome {
    /// The finished session (state `Rendered`).
    pub session: Session,
    /// The rendered document.
    pub document: RenderedDocument,
}

/// Use case for filling templates.
///
/// # Responsibilities
///
/// - Reading template files and starting sessions with the configured doc type
/// - Listing placeholders without starting a session
/// - Feeding an answers file to a session in sequencer order
/// - Writing rendered documents to disk
pub struct FillService {
    config: LexfillConfig,
    factory: SessionFactory,
}

impl FillService {
    /// Creates a service whose collaborators are built from `config`.
    pub fn new(config: LexfillConfig) -> Self {
        let factory = SessionFactory::from_config(&config);
        Self { config, factory }
    }

    /// Creates a service around an existing factory.
    pub fn with_factory(config: LexfillConfig, factory: SessionFactory) -> Self {
        Self { config, factory }
    }

    pub fn config(&self) -> &LexfillConfig {
        &self.config
    }

    /// Short description of the active phraser, for display.
    pub fn phraser_name(&self) -> &str {
        self.factory.phraser_name()
    }

    /// Resolves the doc type for a session: the explicit label, or the
    /// configured default.
    pub fn doc_type(&self, label: Option<&str>) -> DocType {
        DocType::new(label.unwrap_or(&self.config.default_doc_type))
    }

    /// Reads `template` and starts a session for it.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or the upload is rejected.
    pub async fn start(&self, template: &Path, doc_type: Option<&str>) -> Result<SessionController> {
        let bytes = read_template(template).await?;
        let file_name = file_name_of(template);
        let doc_type = self.doc_type(doc_type);

        let mut controller = self.factory.create_controller();
        controller
            .upload(&bytes, &file_name, doc_type)
            .await
            .with_context(|| format!("Failed to start a session for {}", template.display()))?;
        Ok(controller)
    }

    /// Lists the placeholders of `template` in the order they would be asked.
    pub async fn placeholders(&self, template: &Path) -> Result<PlaceholderSequence> {
        let bytes = read_template(template).await?;
        let text = std::str::from_utf8(&bytes)
            .with_context(|| format!("{} is not UTF-8 text", template.display()))?;
        Ok(extract_placeholders(text))
    }

    /// Fills `template` from `answers` without interaction.
    ///
    /// Answers are submitted in sequencer order; keys the template does not
    /// use are ignored with a warning.
    ///
    /// # Errors
    ///
    /// Returns an error naming the first placeholder without an answer, or
    /// any error raised by the session.
    pub async fn fill_batch(&self, template: &Path, answers: &Answers, doc_type: Option<&str>) -> Result<BatchOutcome> {
        let mut controller = self.start(template, doc_type).await?;

        let known = controller.session().placeholders().clone();
        for key in answers.keys().filter(|key| !known.contains(key)) {
            tracing::warn!(placeholder = %key, "Answer does not match any placeholder");
        }

        while controller.state() == SessionState::Collecting {
            let active = controller
                .active_placeholder()
                .cloned()
                .ok_or_else(|| anyhow!("Session is collecting without an active placeholder"))?;
            let answer = answers
                .get(active.as_str())
                .ok_or_else(|| anyhow!("No answer for placeholder '{}'", active))?;
            controller
                .submit_answer(active.as_str(), answer)
                .await
                .with_context(|| format!("Answer for '{}' was rejected", active))?;
        }

        let document = controller.render().await.context("Failed to render document")?.clone();
        Ok(BatchOutcome {
            session: controller.into_session(),
            document,
        })
    }

    /// Writes `document` to `output`, or to its suggested file name in the
    /// current directory.
    pub async fn write_document(&self, document: &RenderedDocument, output: Option<&Path>) -> Result<PathBuf> {
        let path = output
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from(&document.file_name));
        tokio::fs::write(&path, &document.bytes)
            .await
            .with_context(|| format!("Failed to write {}", path.display()))?;
        tracing::info!(path = %path.display(), "Filled document saved");
        Ok(path)
    }
}

/// Reads an answers file: a JSON object mapping placeholder names to values.
///
/// String values are used as-is; numbers and booleans are converted to text.
pub async fn load_answers(path: &Path) -> Result<Answers> {
    let content = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read answers file {}", path.display()))?;
    parse_answers(&content).with_context(|| format!("Invalid answers file {}", path.display()))
}

/// Parses the JSON body of an answers file.
pub fn parse_answers(content: &str) -> Result<Answers> {
    let value: serde_json::Value = serde_json::from_str(content)?;
    let serde_json::Value::Object(map) = value else {
        bail!("expected a JSON object of placeholder names to answers");
    };

    map.into_iter()
        .map(|(key, value)| {
            let text = match value {
                serde_json::Value::String(text) => text,
                serde_json::Value::Number(number) => number.to_string(),
                serde_json::Value::Bool(flag) => flag.to_string(),
                other => bail!("answer for '{}' must be text, got {}", key, other),
            };
            Ok((key, text))
        })
        .collect()
}

async fn read_template(path: &Path) -> Result<Vec<u8>> {
    tokio::fs::read(path)
        .await
        .with_context(|| format!("Failed to read template {}", path.display()))
}

fn file_name_of(path: &Path) -> String {
    path.file_name()
        .and_then(|name| name.to_str())
        .unwrap_or("template.txt")
        .to_string()
}
