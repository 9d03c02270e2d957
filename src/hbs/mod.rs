//! Handlebars-family template engine runtime
//!
//! A deliberately small engine covering the constructs the renderer
//! exercises: mustache expressions (escaped and raw), comments, partial
//! invocation, and the `each`/`if` block helpers with `{{else}}`
//! branches.
//!
//! Two properties distinguish this runtime from an off-the-shelf engine
//! and are the reason it lives in-crate:
//!
//! - Partial invocation does not expand inline. The evaluator emits a
//!   unique placeholder token and records the invocation (name plus
//!   context) in the [`RenderSession`], so the renderer can fetch and
//!   compile partials asynchronously between evaluation passes.
//! - Values are a tagged variant ([`TemplateValue`]): concrete JSON data
//!   or a symbolic variable marker. The `each`/`if` helpers consult a
//!   per-runtime override table and divert marker values to caller
//!   formatters, which is what powers re-output mode.

pub mod ast;
pub mod errors;
pub mod parser;
pub mod runtime;
pub mod value;

pub use ast::*;
pub use errors::*;
pub use runtime::*;
pub use value::*;
