//! Error types for template publishing

use thiserror::Error;

use crate::render::RenderError;

/// Errors signaled by the external template host
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum HostError {
    /// A template with this name already exists on the host
    #[error("template already exists on host: {0}")]
    AlreadyExists(String),

    /// Any other host failure
    #[error("template host request failed: {0}")]
    Request(String),
}

/// Errors that can occur while publishing a template
#[derive(Error, Debug)]
pub enum PublishError {
    /// No renderer is configured for the template's engine
    #[error("no configured renderer for template engine: {0}")]
    NoRenderer(String),

    /// Re-output rendering failed
    #[error(transparent)]
    Render(#[from] RenderError),

    /// The host rejected the template beyond the recoverable
    /// already-exists case
    #[error(transparent)]
    Host(#[from] HostError),
}
