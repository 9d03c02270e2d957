//! Collaborator ports for template storage and partial loading

use crate::engines::TemplateEngine;
use crate::templates::{Template, TemplateError, TemplateState};
use async_trait::async_trait;

/// Resolves a named template on demand during a render.
///
/// The renderer calls this once per distinct uncached partial name that
/// is actually invoked; names come from the render's template list.
/// Retry policy, if any, belongs to the implementation, not the
/// renderer.
#[async_trait]
pub trait PartialLoader: Send + Sync {
    async fn load(&self, name: &str) -> Result<Template, TemplateError>;
}

/// Storage port for template drafts and published copies
#[async_trait]
pub trait TemplateRepository: Send + Sync {
    /// List all stored templates (draft variants)
    async fn list(&self) -> Result<Vec<Template>, TemplateError>;

    /// Load one template by name, engine, and persisted state
    async fn load(
        &self,
        name: &str,
        engine: &TemplateEngine,
        state: TemplateState,
    ) -> Result<Template, TemplateError>;

    /// Store a template under the given state, replacing any previous copy
    async fn save(&self, template: &Template, state: TemplateState) -> Result<(), TemplateError>;
}
