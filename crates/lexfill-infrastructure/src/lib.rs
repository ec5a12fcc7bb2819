pub mod config_service;
pub mod jinja_renderer;
pub mod paths;
pub mod prompt_registry;
pub mod template_analyzer;
pub mod upload_store;

pub use config_service::ConfigService;
pub use jinja_renderer::JinjaRenderer;
pub use paths::LexfillPaths;
pub use prompt_registry::PromptRegistry;
pub use template_analyzer::TemplateAnalyzer;
pub use upload_store::UploadStore;
