//! Error types for engine registry lookups

use thiserror::Error;

/// Errors that can occur when resolving a template engine
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    /// No engine is registered under the given name
    #[error("unrecognized template engine name: \"{0}\"")]
    UnrecognizedEngine(String),

    /// No engine claims the given file extension
    #[error("file extension not associated with a template engine: \"{0}\"")]
    UnknownExtension(String),
}
