/// End-to-end tests for the render and publish pipeline: repository,
/// renderer with async partial resolution, publisher, and service
/// wired together through the public API.
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use serde_json::json;

use letterpress::{
    CompiledTemplateCache, HandlebarsRenderer, HostError, HostedTemplate,
    HostedTemplatePublisher, InMemoryTemplateRepository, PartialLoader, RenderError, RenderParams,
    Renderer, Template, TemplateEngine, TemplateError, TemplateHost, TemplateRepository,
    TemplateService, TemplateState,
};

struct CountingLoader {
    templates: HashMap<String, Template>,
    loads: AtomicUsize,
}

impl CountingLoader {
    fn new(templates: impl IntoIterator<Item = Template>) -> Self {
        Self {
            templates: templates
                .into_iter()
                .map(|template| (template.name.clone(), template))
                .collect(),
            loads: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl PartialLoader for CountingLoader {
    async fn load(&self, name: &str) -> Result<Template, TemplateError> {
        self.loads.fetch_add(1, Ordering::SeqCst);
        self.templates
            .get(name)
            .cloned()
            .ok_or_else(|| TemplateError::not_found(name))
    }
}

#[derive(Default)]
struct CapturingHost {
    templates: Mutex<Vec<HostedTemplate>>,
}

#[async_trait]
impl TemplateHost for CapturingHost {
    async fn create(&self, template: &HostedTemplate) -> Result<(), HostError> {
        self.templates.lock().unwrap().push(template.clone());
        Ok(())
    }

    async fn update(&self, template: &HostedTemplate) -> Result<(), HostError> {
        self.templates.lock().unwrap().push(template.clone());
        Ok(())
    }
}

fn hbs(name: &str, content: &str) -> Template {
    Template::new(name, content, "handlebars")
}

#[tokio::test]
async fn test_render_with_nested_partials_and_loops() {
    let loader = CountingLoader::new([
        hbs("item-row", "<li>{{name}}: {{price}}</li>"),
        hbs("order-list", "<ul>{{#each items}}{{> item-row this}}{{/each}}</ul>"),
    ]);
    let template = hbs("receipt", "Thanks {{customer}}! {{> order-list}}")
        .with_subject("Your order, {{customer}}");

    let mut cache = CompiledTemplateCache::new();
    let rendered = HandlebarsRenderer
        .render_template(
            RenderParams {
                template: &template,
                template_list: &["order-list".to_string(), "item-row".to_string()],
                loader: &loader,
                data: json!({
                    "customer": "Ada",
                    "items": [
                        {"name": "Widget", "price": 3},
                        {"name": "Gadget", "price": 5},
                    ],
                }),
            },
            &mut cache,
        )
        .await
        .unwrap();

    assert_eq!(rendered.subject, "Your order, Ada");
    assert_eq!(
        rendered.body,
        "Thanks Ada! <ul><li>Widget: 3</li><li>Gadget: 5</li></ul>"
    );
    // Two distinct partials, each loaded once despite repeated invocation.
    assert_eq!(loader.loads.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_cache_reuse_skips_partial_loads() {
    let loader = CountingLoader::new([hbs("footer", "-- The Team")]);
    let template = hbs("note", "{{message}} {{> footer}}");
    let template_list = ["footer".to_string()];

    let mut cache = CompiledTemplateCache::new();
    for message in ["first", "second"] {
        let rendered = HandlebarsRenderer
            .render_template(
                RenderParams {
                    template: &template,
                    template_list: &template_list,
                    loader: &loader,
                    data: json!({ "message": message }),
                },
                &mut cache,
            )
            .await
            .unwrap();
        assert_eq!(rendered.body, format!("{message} -- The Team"));
    }

    assert_eq!(loader.loads.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_engine_mismatch_is_rejected_before_loading() {
    let loader = CountingLoader::new([]);
    let template = Template::new("note", "Hello", "mustache");

    let mut cache = CompiledTemplateCache::new();
    let err = HandlebarsRenderer
        .render_template(
            RenderParams {
                template: &template,
                template_list: &[],
                loader: &loader,
                data: json!({}),
            },
            &mut cache,
        )
        .await
        .unwrap_err();

    assert!(matches!(err, RenderError::EngineMismatch { .. }));
    assert_eq!(loader.loads.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_publish_ships_self_contained_template() {
    let repository = Arc::new(InMemoryTemplateRepository::new());
    let host = Arc::new(CapturingHost::default());
    let publisher = Arc::new(HostedTemplatePublisher::new(
        host.clone(),
        vec![Arc::new(HandlebarsRenderer)],
    ));
    let service = TemplateService::new(
        repository.clone(),
        vec![Arc::new(HandlebarsRenderer)],
        publisher,
        "noreply@example.com",
    );

    service
        .save_draft(&hbs("signature", "Cheers, {{sender}}"))
        .await
        .unwrap();
    service.publish("signature", "handlebars", &[]).await.unwrap();

    service
        .save_draft(
            &hbs(
                "welcome",
                "{{#if premium}}Welcome aboard, {{user}}!{{else}}Hi {{user}}.{{/if}} {{> signature}}",
            )
            .with_subject("Hello {{user}}"),
        )
        .await
        .unwrap();
    service
        .publish(
            "welcome",
            "handlebars",
            &["user".to_string(), "premium".to_string(), "sender".to_string()],
        )
        .await
        .unwrap();

    let hosted = host.templates.lock().unwrap();
    let welcome = hosted
        .iter()
        .find(|template| template.name == "welcome")
        .expect("welcome template pushed to host");

    // Partials are inlined; variables and structure survive symbolically.
    assert_eq!(
        welcome.body,
        "{{#if premium}}Welcome aboard, {{user}}!{{else}}Hi {{user}}.{{/if}} Cheers, {{sender}}"
    );
    assert_eq!(welcome.subject, "Hello {{user}}");
    assert!(!welcome.body.contains("__RENDER__"));
}

#[tokio::test]
async fn test_service_round_trip_draft_to_send_ready() {
    let repository = Arc::new(InMemoryTemplateRepository::new());
    let host = Arc::new(CapturingHost::default());
    let publisher = Arc::new(HostedTemplatePublisher::new(
        host.clone(),
        vec![Arc::new(HandlebarsRenderer)],
    ));
    let service = TemplateService::new(
        repository.clone(),
        vec![Arc::new(HandlebarsRenderer)],
        publisher,
        "noreply@example.com",
    );

    let mut draft = hbs("invoice", "Amount due: {{amount}}").with_subject("Invoice {{number}}");
    draft.from_name = "Billing".to_string();
    draft.from_email = "billing@example.com".to_string();
    service.save_draft(&draft).await.unwrap();

    let preview = service
        .preview("invoice", "handlebars", json!({"amount": "40 USD"}))
        .await
        .unwrap();
    assert_eq!(preview, "Amount due: 40 USD");

    service
        .publish("invoice", "handlebars", &["amount".to_string(), "number".to_string()])
        .await
        .unwrap();

    let email = service
        .send_ready(
            "invoice",
            "handlebars",
            json!({"amount": "40 USD", "number": "INV-7"}),
        )
        .await
        .unwrap();
    assert_eq!(email.from, "Billing <billing@example.com>");
    assert_eq!(email.subject, "Invoice INV-7");
    assert_eq!(email.body, "Amount due: 40 USD");

    let listed = service.list().await.unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].name, "invoice");

    let loaded = service
        .load("invoice", "handlebars", TemplateState::Published)
        .await
        .unwrap();
    assert_eq!(loaded.content, draft.content);
}

#[tokio::test]
async fn test_repository_engine_filter_applies_to_loads() {
    let repository = InMemoryTemplateRepository::new();
    repository
        .save(
            &Template::new("note", "{{x}}", "mustache"),
            TemplateState::Published,
        )
        .await
        .unwrap();

    let engine = TemplateEngine::wrap("handlebars").unwrap();
    let result = repository
        .load("note", engine, TemplateState::Published)
        .await;
    assert!(matches!(result, Err(TemplateError::NotFound(_))));
}
