//! The core renderer: asynchronous partial resolution in two modes
//!
//! [`HandlebarsRenderer`] compiles a template, defers every partial
//! invocation behind a unique placeholder token, then iteratively loads,
//! compiles, and evaluates partials until no invocation is pending,
//! substituting each token with its partial's output. `render_template`
//! evaluates against concrete data; `render_as_template` inlines
//! partials while re-emitting variables and structural constructs in a
//! different target dialect.

pub mod cache;
pub mod errors;
pub mod handlebars;
pub mod traits;
pub mod types;

pub use cache::*;
pub use errors::*;
pub use handlebars::*;
pub use traits::*;
pub use types::*;
