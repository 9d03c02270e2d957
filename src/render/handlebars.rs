//! Handlebars-family renderer implementation

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::{Captures, Regex};

use crate::engines::TemplateEngine;
use crate::engines::registry::HANDLEBARS;
use crate::hbs::{
    CompiledTemplate, HbsError, HelperOverrides, RenderSession, Scope, TemplateValue,
    symbolic_data,
};
use crate::render::{
    CompiledTemplateCache, RenderError, RenderParams, RenderedTemplate, Renderer, ReoutputParams,
};
use crate::templates::{PartialLoader, Template};

static PLACEHOLDER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"__RENDER__\d+__").expect("placeholder pattern is valid"));

/// Renderer for templates declaring the "handlebars" engine
#[derive(Debug, Default)]
pub struct HandlebarsRenderer;

impl HandlebarsRenderer {
    pub fn new() -> Self {
        Self
    }

    fn check_engine(&self, template: &Template) -> Result<(), RenderError> {
        if template.engine_name != self.engine().name() {
            return Err(RenderError::EngineMismatch {
                supported: self.engine().name(),
                declared: template.engine_name.clone(),
                template: template.name.clone(),
            });
        }
        Ok(())
    }

    async fn render_internal(
        &self,
        template: &Template,
        template_list: &[String],
        loader: &dyn PartialLoader,
        data: TemplateValue,
        cache: &mut CompiledTemplateCache,
    ) -> Result<RenderedTemplate, RenderError> {
        tracing::debug!(
            template = %template.name,
            partials = ?template_list,
            "rendering template"
        );

        // Registered names defer to placeholder tokens at invocation;
        // anything else invoked as a partial is an error.
        cache.runtime.register_partials(template_list.iter().cloned());

        // The top-level template is recompiled on every call; partials
        // are compiled at most once per cache lifetime.
        let compiled_body = compile_into_cache(cache, &template.name, &template.content)?;

        // One session for body and subject keeps placeholder tokens
        // unique across the whole render.
        let mut session = RenderSession::new();
        let body = self
            .resolve_to_completion(&compiled_body, &data, loader, cache, &mut session)
            .await?;

        let compiled_subject = CompiledTemplate::compile(&template.subject)?;
        let subject = self
            .resolve_to_completion(&compiled_subject, &data, loader, cache, &mut session)
            .await?;

        Ok(RenderedTemplate { subject, body })
    }

    /// Run the iterative resolution loop: evaluate, load and compile the
    /// partials invoked by the latest pass, evaluate them with their
    /// recorded contexts, substitute placeholder tokens, and repeat
    /// until a pass records no further invocations.
    async fn resolve_to_completion(
        &self,
        compiled: &CompiledTemplate,
        data: &TemplateValue,
        loader: &dyn PartialLoader,
        cache: &mut CompiledTemplateCache,
        session: &mut RenderSession,
    ) -> Result<String, RenderError> {
        let mut rendering = String::new();
        cache
            .runtime
            .evaluate(compiled.nodes(), &Scope::root(data), session, &mut rendering)?;

        loop {
            let pending = session.take_pending();
            if pending.is_empty() {
                return Ok(rendering);
            }

            // All uncached partials of this pass load concurrently and
            // the pass waits for every one of them, so latency is bound
            // by the depth of the partial graph, not its breadth.
            let mut missing: Vec<&str> = pending
                .iter()
                .map(|call| call.name.as_str())
                .filter(|name| !cache.compiled.contains_key(*name))
                .collect();
            missing.sort_unstable();
            missing.dedup();

            let loaded = futures::future::try_join_all(missing.into_iter().map(|name| {
                async move {
                    tracing::debug!(partial = name, "loading partial");
                    let template =
                        loader
                            .load(name)
                            .await
                            .map_err(|source| RenderError::Loader {
                                name: name.to_string(),
                                source,
                            })?;
                    Ok::<_, RenderError>((name.to_string(), template))
                }
            }))
            .await?;

            for (name, partial) in loaded {
                tracing::debug!(partial = %name, "compiling partial");
                compile_into_cache(cache, &name, &partial.content)?;
            }

            let mut renderings_by_placeholder: HashMap<String, String> =
                HashMap::with_capacity(pending.len());
            for call in pending {
                let compiled_partial = cache
                    .compiled
                    .get(&call.name)
                    .cloned()
                    .ok_or_else(|| HbsError::UnknownPartial(call.name.clone()))?;
                let mut text = String::new();
                cache.runtime.evaluate(
                    compiled_partial.nodes(),
                    &Scope::root(&call.context),
                    session,
                    &mut text,
                )?;
                renderings_by_placeholder.insert(call.placeholder, text);
            }

            // Tokens are globally unique, so substitution is keyed, not
            // positional. Matches with no recorded rendering are left
            // alone: they are literal text, not tokens we emitted.
            rendering = PLACEHOLDER_RE
                .replace_all(&rendering, |caps: &Captures<'_>| {
                    renderings_by_placeholder
                        .get(&caps[0])
                        .cloned()
                        .unwrap_or_else(|| caps[0].to_string())
                })
                .into_owned();
        }
    }
}

#[async_trait]
impl Renderer for HandlebarsRenderer {
    fn engine(&self) -> &'static TemplateEngine {
        &HANDLEBARS
    }

    async fn render_template(
        &self,
        params: RenderParams<'_>,
        cache: &mut CompiledTemplateCache,
    ) -> Result<RenderedTemplate, RenderError> {
        self.check_engine(params.template)?;
        self.render_internal(
            params.template,
            params.template_list,
            params.loader,
            TemplateValue::Json(params.data),
            cache,
        )
        .await
    }

    async fn render_as_template(
        &self,
        params: ReoutputParams<'_>,
        cache: &mut CompiledTemplateCache,
    ) -> Result<RenderedTemplate, RenderError> {
        self.check_engine(params.template)?;

        let variable_formatter = Arc::clone(&params.formatters.variable);
        let data = symbolic_data(
            params.variable_names.iter().map(String::as_str),
            |name| variable_formatter(name),
        );
        let overrides = HelperOverrides {
            each: Some(Arc::clone(&params.formatters.each)),
            cond: Some(Arc::clone(&params.formatters.cond)),
        };

        // The runtime lives in the cache and is reused by later calls,
        // so the previous helper table is restored on success and
        // failure alike.
        let previous = cache.runtime.install_overrides(overrides);
        let result = self
            .render_internal(
                params.template,
                params.template_list,
                params.loader,
                data,
                cache,
            )
            .await;
        cache.runtime.install_overrides(previous);
        result
    }
}

fn compile_into_cache(
    cache: &mut CompiledTemplateCache,
    name: &str,
    source: &str,
) -> Result<Arc<CompiledTemplate>, HbsError> {
    let compiled = Arc::new(CompiledTemplate::compile(source)?);
    cache
        .compiled
        .insert(name.to_string(), Arc::clone(&compiled));
    Ok(compiled)
}
