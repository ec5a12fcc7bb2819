use lexfill_core::config::{LexfillConfig, PhraserKind};
use lexfill_core::document::{DocumentAnalyzer, DocumentRenderer};
use lexfill_core::phrasing::Phraser;
use lexfill_core::session::SessionController;
use lexfill_infrastructure::{JinjaRenderer, LexfillPaths, PromptRegistry, TemplateAnalyzer, UploadStore};
use lexfill_interaction::{OpenAiPhraser, TemplatePhraser};
use std::sync::Arc;

/// Factory for creating SessionController instances from configuration.
///
/// Collaborators are built once and shared by every session the factory
/// creates.
#[derive(Clone)]
pub struct SessionFactory {
    analyzer: Arc<dyn DocumentAnalyzer>,
    phraser: Arc<dyn Phraser>,
    renderer: Arc<dyn DocumentRenderer>,
    phraser_name: String,
    store: UploadStore,
}

impl SessionFactory {
    /// Builds the collaborators described by `config`.
    ///
    /// When the `openai` phraser is selected without an API key (or cannot be
    /// built) the template phraser is used instead and a warning is logged.
    pub fn from_config(config: &LexfillConfig) -> Self {
        let store = UploadStore::new(
            config
                .upload_dir
                .clone()
                .unwrap_or_else(LexfillPaths::upload_dir),
        );
        let prompts_dir = config
            .prompts_dir
            .clone()
            .or_else(|| LexfillPaths::prompts_dir().ok());
        let prompts = PromptRegistry::new(prompts_dir);

        let (phraser, phraser_name): (Arc<dyn Phraser>, String) = match config.phraser.kind {
            PhraserKind::OpenAi => match OpenAiPhraser::from_config(&config.phraser, prompts) {
                Ok(phraser) => {
                    let name = format!("openai ({})", phraser.model());
                    (Arc::new(phraser), name)
                }
                Err(err) => {
                    tracing::warn!(error = %err, "OpenAI phraser unavailable, falling back to template questions");
                    (Arc::new(TemplatePhraser::new()), PhraserKind::Template.to_string())
                }
            },
            PhraserKind::Template => (Arc::new(TemplatePhraser::new()), PhraserKind::Template.to_string()),
        };

        Self {
            analyzer: Arc::new(TemplateAnalyzer::new(store.clone())),
            phraser,
            renderer: Arc::new(JinjaRenderer::new(store.clone())),
            phraser_name,
            store,
        }
    }

    /// Replaces the phraser, e.g. to force deterministic questions.
    pub fn with_phraser(mut self, phraser: Arc<dyn Phraser>, name: impl Into<String>) -> Self {
        self.phraser = phraser;
        self.phraser_name = name.into();
        self
    }

    /// Creates a controller holding a fresh, uninitialized session.
    pub fn create_controller(&self) -> SessionController {
        SessionController::new(self.analyzer.clone(), self.phraser.clone(), self.renderer.clone())
    }

    pub fn phraser_name(&self) -> &str {
        &self.phraser_name
    }

    pub fn store(&self) -> &UploadStore {
        &self.store
    }
}
