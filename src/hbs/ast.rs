//! Parsed template representation

use crate::hbs::{HbsError, parser};

/// A resolved reference to a value in the render data
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Path {
    /// `this` or `.` - the current context value
    This,
    /// A loop-local data variable: `@index`, `@first`, `@last`, `@key`
    Local(String),
    /// A dotted lookup relative to the current context, e.g. `user.name`
    Segments(Vec<String>),
}

/// Structural block helpers understood by the evaluator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockHelper {
    Each,
    If,
}

impl BlockHelper {
    pub fn name(&self) -> &'static str {
        match self {
            BlockHelper::Each => "each",
            BlockHelper::If => "if",
        }
    }
}

/// A single node of a parsed template
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    /// Literal text, emitted verbatim
    Text(String),
    /// `{{path}}` (HTML-escaped) or `{{{path}}}` (raw)
    Expression { path: Path, raw: bool },
    /// `{{> name}}` or `{{> name contextPath}}`
    Partial { name: String, context: Option<Path> },
    /// `{{#each path}}...{{else}}...{{/each}}` or the `if` equivalent
    Block {
        helper: BlockHelper,
        path: Path,
        body: Vec<Node>,
        inverse: Vec<Node>,
    },
}

/// A compiled (parsed) template, ready for repeated evaluation.
///
/// Compiled templates are cached by name in the renderer's
/// compiled-template cache and must only be evaluated against the
/// runtime instance held by that same cache.
#[derive(Debug, Clone, PartialEq)]
pub struct CompiledTemplate {
    nodes: Vec<Node>,
}

impl CompiledTemplate {
    /// Parse template source into an evaluatable form
    pub fn compile(source: &str) -> Result<Self, HbsError> {
        Ok(Self {
            nodes: parser::parse(source)?,
        })
    }

    pub(crate) fn nodes(&self) -> &[Node] {
        &self.nodes
    }
}
