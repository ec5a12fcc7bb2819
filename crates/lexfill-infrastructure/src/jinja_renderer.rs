//! Renders stored templates with minijinja.

use crate::template_analyzer::ANSWERS_VAR;
use crate::upload_store::UploadStore;
use async_trait::async_trait;
use lexfill_core::document::{DocumentRenderer, RenderedDocument, SessionId};
use lexfill_core::error::{FillError, Result};
use lexfill_core::session::AnswerSnapshot;
use minijinja::{AutoEscape, Environment, UndefinedBehavior};
use std::collections::HashMap;

/// `DocumentRenderer` backed by the [`UploadStore`].
///
/// Rendering is strict: a placeholder without an answer fails the render
/// instead of producing an empty string. Output is never HTML-escaped and
/// keeps the template's trailing newline. Each render also writes
/// `<id>_filled.<ext>` to the store.
#[derive(Debug, Clone)]
pub struct JinjaRenderer {
    store: UploadStore,
}

impl JinjaRenderer {
    pub fn new(store: UploadStore) -> Self {
        Self { store }
    }

    fn environment() -> Environment<'static> {
        let mut env = Environment::new();
        env.set_undefined_behavior(UndefinedBehavior::Strict);
        env.set_auto_escape_callback(|_| AutoEscape::None);
        env.set_keep_trailing_newline(true);
        env
    }
}

/// Renders `source` with `answers` bound as the answers map.
pub fn render_source(source: &str, answers: &AnswerSnapshot) -> Result<String> {
    let env = JinjaRenderer::environment();
    let ctx = HashMap::from([(ANSWERS_VAR, answers)]);
    env.render_str(source, ctx)
        .map_err(|e| FillError::render_failed(format!("Template error: {}", e)))
}

#[async_trait]
impl DocumentRenderer for JinjaRenderer {
    async fn render(&self, session_id: &SessionId, answers: &AnswerSnapshot) -> Result<RenderedDocument> {
        let template = self
            .store
            .load_template(session_id)
            .await?
            .ok_or_else(|| FillError::render_failed(format!("template not found: {}", session_id)))?;

        let rendered = render_source(&template.source, answers)?;
        let path = self
            .store
            .write_filled(session_id, &template.extension, rendered.as_bytes())
            .await?;

        tracing::info!(
            session_id = %session_id,
            path = %path.display(),
            "Filled document written"
        );

        Ok(RenderedDocument {
            file_name: format!("filled.{}", template.extension),
            bytes: rendered.into_bytes(),
        })
    }
}
