//! Template engine identity and the process-wide engine registry
//!
//! A [`TemplateEngine`] names a template dialect (e.g. "handlebars") and
//! claims a file extension. The registry is static: populated at process
//! start, never mutated afterwards, with exactly one instance per
//! registered name.

pub mod errors;
pub mod registry;
pub mod types;

pub use errors::*;
pub use registry::*;
pub use types::*;
