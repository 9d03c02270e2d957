//! Error type for the template service

use thiserror::Error;

use crate::engines::EngineError;
use crate::publish::PublishError;
use crate::render::RenderError;
use crate::templates::TemplateError;

/// Errors surfaced by [`TemplateService`](crate::service::TemplateService)
/// operations
#[derive(Error, Debug)]
pub enum ServiceError {
    /// No renderer is configured for the requested engine
    #[error("no configured renderer for template engine: {0}")]
    NoRenderer(String),

    #[error(transparent)]
    Engine(#[from] EngineError),

    #[error(transparent)]
    Template(#[from] TemplateError),

    #[error(transparent)]
    Render(#[from] RenderError),

    #[error(transparent)]
    Publish(#[from] PublishError),
}
