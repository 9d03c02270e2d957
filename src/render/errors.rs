//! Error types for the rendering core

use thiserror::Error;

use crate::hbs::HbsError;
use crate::templates::TemplateError;

/// Errors that can occur during a render call
#[derive(Error, Debug)]
pub enum RenderError {
    /// The template declares an engine this renderer does not support.
    /// Surfaced before any loader call is issued.
    #[error(
        "renderer for engine '{supported}' cannot render template '{template}' \
         declaring engine '{declared}'"
    )]
    EngineMismatch {
        supported: &'static str,
        declared: String,
        template: String,
    },

    /// Compilation or evaluation failed in the engine runtime
    #[error("template engine error: {0}")]
    Engine(#[from] HbsError),

    /// The injected partial loader failed; propagated as-is, with no
    /// partial output returned and no automatic retry.
    #[error("failed to load partial '{name}'")]
    Loader {
        name: String,
        #[source]
        source: TemplateError,
    },
}
