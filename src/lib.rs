//! letterpress - email template rendering with asynchronous partial resolution
//!
//! The crate is organized around one core component, the [`render`]
//! module's `HandlebarsRenderer`, which compiles Handlebars-family
//! templates, resolves partial references through an injected
//! asynchronous loader, and supports two output modes:
//!
//! - `render_template`: fully-rendered output against concrete data
//! - `render_as_template`: "re-output" mode, which inlines partials and
//!   evaluates structural constructs while preserving variable
//!   references as syntax in a different target template dialect
//!
//! Everything else is arranged as collaborator ports around that core:
//! [`engines`] holds the static template-engine registry, [`templates`]
//! the template value object and repository/loader traits, [`hbs`] the
//! in-crate Handlebars-family runtime, [`publish`] the template-hosting
//! publisher, and [`service`] the coordinating application service.
#![deny(unsafe_code)]

pub mod engines;
pub mod hbs;
pub mod publish;
pub mod render;
pub mod service;
pub mod templates;

pub use engines::{EngineError, EngineSelector, TemplateEngine};
pub use publish::{
    HostError, HostedTemplate, HostedTemplatePublisher, PublishError, PublishRequest, Publisher,
    TemplateHost,
};
pub use render::{
    CompiledTemplateCache, HandlebarsRenderer, RenderError, RenderParams, RenderedTemplate,
    Renderer, ReoutputFormatters, ReoutputParams,
};
pub use service::{SendReadyEmail, ServiceError, TemplateService};
pub use templates::{
    InMemoryTemplateRepository, PartialLoader, Template, TemplateError, TemplateRepository,
    TemplateState,
};
