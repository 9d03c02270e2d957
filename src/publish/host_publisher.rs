//! Publisher backed by an external template host

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, info};

use crate::publish::{
    HostError, HostedTemplate, PublishError, PublishRequest, Publisher, TemplateHost,
};
use crate::render::{CompiledTemplateCache, Renderer, ReoutputFormatters, ReoutputParams};

/// Publishes templates to a [`TemplateHost`].
///
/// The template is re-output through the renderer for its engine, with
/// every partial expanded inline, so the hosted copy is self-contained.
/// Hosted names carry the configured prefix and suffix, which keeps
/// environments apart on a shared host account.
pub struct HostedTemplatePublisher {
    host: Arc<dyn TemplateHost>,
    renderers: HashMap<String, Arc<dyn Renderer>>,
    name_prefix: String,
    name_suffix: String,
}

impl HostedTemplatePublisher {
    pub fn new(host: Arc<dyn TemplateHost>, renderers: Vec<Arc<dyn Renderer>>) -> Self {
        Self::with_naming(host, renderers, "", "")
    }

    pub fn with_naming(
        host: Arc<dyn TemplateHost>,
        renderers: Vec<Arc<dyn Renderer>>,
        name_prefix: impl Into<String>,
        name_suffix: impl Into<String>,
    ) -> Self {
        let renderers = renderers
            .into_iter()
            .map(|renderer| (renderer.engine().name().to_string(), renderer))
            .collect();
        Self {
            host,
            renderers,
            name_prefix: name_prefix.into(),
            name_suffix: name_suffix.into(),
        }
    }

    fn hosted_name(&self, template_name: &str) -> String {
        format!("{}{}{}", self.name_prefix, template_name, self.name_suffix)
    }
}

#[async_trait]
impl Publisher for HostedTemplatePublisher {
    async fn publish(&self, request: PublishRequest<'_>) -> Result<(), PublishError> {
        let template = request.template;
        let renderer = self
            .renderers
            .get(&template.engine_name)
            .ok_or_else(|| PublishError::NoRenderer(template.engine_name.clone()))?;

        let mut cache = CompiledTemplateCache::new();
        let rendered = renderer
            .render_as_template(
                ReoutputParams {
                    template,
                    template_list: request.template_list,
                    loader: request.loader,
                    variable_names: request.variable_names,
                    formatters: ReoutputFormatters::handlebars(),
                },
                &mut cache,
            )
            .await?;

        let hosted = HostedTemplate {
            name: self.hosted_name(&template.name),
            subject: rendered.subject,
            body: rendered.body,
            from_name: template.from_name.clone(),
            from_email: template.from_email.clone(),
        };

        debug!(template = %template.name, hosted = %hosted.name, "publishing template");
        match self.host.create(&hosted).await {
            Ok(()) => Ok(()),
            Err(HostError::AlreadyExists(_)) => {
                info!(hosted = %hosted.name, "template exists on host, updating");
                self.host.update(&hosted).await.map_err(PublishError::from)
            }
            Err(err) => Err(err.into()),
        }
    }
}
