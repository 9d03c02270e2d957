//! Error types for template compilation and evaluation

use thiserror::Error;

/// Errors raised by the Handlebars-family runtime
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum HbsError {
    /// Malformed template source
    #[error("syntax error at byte {offset}: {message}")]
    Syntax { offset: usize, message: String },

    /// A block helper other than `each` or `if` was opened
    #[error("unknown block helper '{name}' at byte {offset}")]
    UnknownHelper { name: String, offset: usize },

    /// A partial was invoked that is not registered for this render
    #[error("partial '{0}' is not registered for this render")]
    UnknownPartial(String),
}

impl HbsError {
    pub(crate) fn syntax(offset: usize, message: impl Into<String>) -> Self {
        Self::Syntax {
            offset,
            message: message.into(),
        }
    }
}
