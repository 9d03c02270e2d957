//! Template service composition root

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value as JsonValue;
use tokio::sync::Mutex;
use tracing::debug;

use crate::engines::{EngineSelector, TemplateEngine};
use crate::publish::{PublishRequest, Publisher};
use crate::render::{CompiledTemplateCache, RenderParams, RenderedTemplate, Renderer};
use crate::service::{SendReadyEmail, ServiceError};
use crate::templates::{
    PartialLoader, Template, TemplateError, TemplateRepository, TemplateState,
};

/// Resolves partials from the repository's published state.
///
/// Renders always see published partial content, even when the top-level
/// template being rendered is a draft.
struct RepositoryLoader {
    repository: Arc<dyn TemplateRepository>,
    engine: &'static TemplateEngine,
}

#[async_trait]
impl PartialLoader for RepositoryLoader {
    async fn load(&self, name: &str) -> Result<Template, TemplateError> {
        self.repository
            .load(name, self.engine, TemplateState::Published)
            .await
    }
}

/// Coordinates the repository, the per-engine renderers, and the
/// publisher behind one API.
///
/// A single compiled-template cache is shared across renders behind an
/// async lock, so partials compile once per service lifetime; publishing
/// resets it because the published content it was built from has
/// changed.
pub struct TemplateService {
    repository: Arc<dyn TemplateRepository>,
    renderers: HashMap<String, Arc<dyn Renderer>>,
    publisher: Arc<dyn Publisher>,
    default_from_email: String,
    cache: Mutex<CompiledTemplateCache>,
}

impl TemplateService {
    pub fn new(
        repository: Arc<dyn TemplateRepository>,
        renderers: Vec<Arc<dyn Renderer>>,
        publisher: Arc<dyn Publisher>,
        default_from_email: impl Into<String>,
    ) -> Self {
        let renderers = renderers
            .into_iter()
            .map(|renderer| (renderer.engine().name().to_string(), renderer))
            .collect();
        Self {
            repository,
            renderers,
            publisher,
            default_from_email: default_from_email.into(),
            cache: Mutex::new(CompiledTemplateCache::new()),
        }
    }

    /// List all stored templates (draft variants)
    pub async fn list(&self) -> Result<Vec<Template>, ServiceError> {
        Ok(self.repository.list().await?)
    }

    /// Load one template by name, engine, and state
    pub async fn load<'a>(
        &self,
        name: &str,
        engine: impl Into<EngineSelector<'a>>,
        state: TemplateState,
    ) -> Result<Template, ServiceError> {
        let engine = TemplateEngine::wrap(engine)?;
        Ok(self.repository.load(name, engine, state).await?)
    }

    /// Store a draft copy of the template
    pub async fn save_draft(&self, template: &Template) -> Result<(), ServiceError> {
        debug!(template = %template.name, "saving draft");
        Ok(self
            .repository
            .save(template, TemplateState::Draft)
            .await?)
    }

    /// Render the template in the given state against concrete data
    pub async fn render<'a>(
        &self,
        name: &str,
        engine: impl Into<EngineSelector<'a>>,
        state: TemplateState,
        data: JsonValue,
    ) -> Result<RenderedTemplate, ServiceError> {
        let engine = TemplateEngine::wrap(engine)?;
        let (_, rendered) = self.render_in_state(name, engine, state, data).await?;
        Ok(rendered)
    }

    /// Render the draft copy and return its body
    pub async fn preview<'a>(
        &self,
        name: &str,
        engine: impl Into<EngineSelector<'a>>,
        data: JsonValue,
    ) -> Result<String, ServiceError> {
        let engine = TemplateEngine::wrap(engine)?;
        let (_, rendered) = self
            .render_in_state(name, engine, TemplateState::Draft, data)
            .await?;
        Ok(rendered.body)
    }

    /// Render the published copy and compose the sender line.
    ///
    /// Falls back to the service-wide default address when the template
    /// does not carry one.
    pub async fn send_ready<'a>(
        &self,
        name: &str,
        engine: impl Into<EngineSelector<'a>>,
        data: JsonValue,
    ) -> Result<SendReadyEmail, ServiceError> {
        let engine = TemplateEngine::wrap(engine)?;
        let (template, rendered) = self
            .render_in_state(name, engine, TemplateState::Published, data)
            .await?;

        let from_email = if template.from_email.is_empty() {
            self.default_from_email.clone()
        } else {
            template.from_email.clone()
        };
        let from = if template.from_name.is_empty() {
            from_email
        } else {
            format!("{} <{from_email}>", template.from_name)
        };

        Ok(SendReadyEmail {
            from,
            subject: rendered.subject,
            body: rendered.body,
        })
    }

    /// Publish the draft copy: persist it as published, then push it to
    /// the external host.
    ///
    /// The published copy is saved before the host sees it, so partials
    /// the host-side render resolves are already current.
    pub async fn publish<'a>(
        &self,
        name: &str,
        engine: impl Into<EngineSelector<'a>>,
        variable_names: &[String],
    ) -> Result<(), ServiceError> {
        let engine = TemplateEngine::wrap(engine)?;
        let template = self
            .repository
            .load(name, engine, TemplateState::Draft)
            .await?;

        self.repository
            .save(&template, TemplateState::Published)
            .await?;
        // Published content changed; cached partial compilations are stale.
        *self.cache.lock().await = CompiledTemplateCache::new();

        let template_list = self.template_names_for_engine(engine).await?;
        let loader = RepositoryLoader {
            repository: Arc::clone(&self.repository),
            engine,
        };

        debug!(template = %template.name, "publishing template");
        self.publisher
            .publish(PublishRequest {
                template: &template,
                template_list: &template_list,
                loader: &loader,
                variable_names,
            })
            .await?;
        Ok(())
    }

    async fn render_in_state(
        &self,
        name: &str,
        engine: &'static TemplateEngine,
        state: TemplateState,
        data: JsonValue,
    ) -> Result<(Template, RenderedTemplate), ServiceError> {
        let renderer = self.renderer_for(engine.name())?;
        let template = self.repository.load(name, engine, state).await?;
        let template_list = self.template_names_for_engine(engine).await?;
        let loader = RepositoryLoader {
            repository: Arc::clone(&self.repository),
            engine,
        };

        let mut cache = self.cache.lock().await;
        let rendered = renderer
            .render_template(
                RenderParams {
                    template: &template,
                    template_list: &template_list,
                    loader: &loader,
                    data,
                },
                &mut cache,
            )
            .await?;
        Ok((template, rendered))
    }

    fn renderer_for(&self, engine_name: &str) -> Result<Arc<dyn Renderer>, ServiceError> {
        self.renderers
            .get(engine_name)
            .cloned()
            .ok_or_else(|| ServiceError::NoRenderer(engine_name.to_string()))
    }

    async fn template_names_for_engine(
        &self,
        engine: &'static TemplateEngine,
    ) -> Result<Vec<String>, ServiceError> {
        let templates = self.repository.list().await?;
        Ok(templates
            .into_iter()
            .filter(|template| template.engine_name == engine.name())
            .map(|template| template.name)
            .collect())
    }
}
