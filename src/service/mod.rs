//! Application service coordinating storage, rendering, and publishing
//!
//! `TemplateService` is the composition root callers talk to: drafts go
//! through the repository, renders resolve partials from the published
//! state, and publishing saves the published copy before pushing it to
//! the external host.

pub mod errors;
pub mod template_service;
pub mod types;

pub use errors::*;
pub use template_service::*;
pub use types::*;
