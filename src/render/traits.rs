//! Renderer port

use async_trait::async_trait;

use crate::engines::TemplateEngine;
use crate::render::{
    CompiledTemplateCache, RenderError, RenderParams, RenderedTemplate, ReoutputParams,
};

/// Renders templates for one template engine.
///
/// Both operations resolve partials to unbounded depth through the
/// params' loader, writing compiled templates into `cache` as a
/// byproduct. A loader failure rejects the whole call; partially-built
/// output is discarded.
#[async_trait]
pub trait Renderer: Send + Sync {
    /// The engine this renderer supports
    fn engine(&self) -> &'static TemplateEngine;

    /// Render subject and body against concrete data
    async fn render_template(
        &self,
        params: RenderParams<'_>,
        cache: &mut CompiledTemplateCache,
    ) -> Result<RenderedTemplate, RenderError>;

    /// Render subject and body into a different target dialect,
    /// expanding partials but preserving variable references and
    /// structural constructs symbolically.
    async fn render_as_template(
        &self,
        params: ReoutputParams<'_>,
        cache: &mut CompiledTemplateCache,
    ) -> Result<RenderedTemplate, RenderError>;
}
