//! Error types for template storage and loading

use thiserror::Error;

/// Errors that can occur when loading or storing templates
#[derive(Error, Debug)]
pub enum TemplateError {
    /// No template exists under the requested name and state
    #[error("template not found: {0}")]
    NotFound(String),

    /// The backing store failed
    #[error("template storage error: {0}")]
    Storage(String),
}

impl TemplateError {
    /// Create a new not-found error for a template name
    pub fn not_found<S: Into<String>>(name: S) -> Self {
        Self::NotFound(name.into())
    }

    /// Create a new storage error
    pub fn storage<S: Into<String>>(message: S) -> Self {
        Self::Storage(message.into())
    }
}
