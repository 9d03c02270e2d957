//! Parameter and result types for the renderer ports

use std::fmt;
use std::sync::Arc;

use serde_json::Value as JsonValue;

use crate::hbs::BlockFormatter;
use crate::templates::{PartialLoader, Template};

/// The rendered subject line and body of one template
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedTemplate {
    pub subject: String,
    pub body: String,
}

/// Parameters for a concrete-data render.
///
/// `template_list` enumerates the names that may be invoked as partials;
/// all must share the template's engine. The loader is called once per
/// distinct uncached partial name that is actually invoked.
pub struct RenderParams<'a> {
    pub template: &'a Template,
    pub template_list: &'a [String],
    pub loader: &'a dyn PartialLoader,
    pub data: JsonValue,
}

impl fmt::Debug for RenderParams<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RenderParams")
            .field("template", &self.template.name)
            .field("template_list", &self.template_list)
            .finish_non_exhaustive()
    }
}

/// Formatter for a plain variable reference in the target dialect
pub type VariableFormatter = Arc<dyn Fn(&str) -> String + Send + Sync>;

/// The target-dialect formatters driving a re-output render
#[derive(Clone)]
pub struct ReoutputFormatters {
    /// Formats `{{v}}`-style references
    pub variable: VariableFormatter,
    /// Formats iteration blocks from (variable, block, else-block)
    pub each: BlockFormatter,
    /// Formats conditional blocks from (variable, block, else-block)
    pub cond: BlockFormatter,
}

impl ReoutputFormatters {
    /// Formatters that re-output into Handlebars syntax itself
    pub fn handlebars() -> Self {
        Self {
            variable: Arc::new(|name| format!("{{{{{name}}}}}")),
            each: Arc::new(|name, block, else_block| {
                format!("{{{{#each {name}}}}}{block}{{{{else}}}}{else_block}{{{{/each}}}}")
            }),
            cond: Arc::new(|name, block, else_block| {
                format!("{{{{#if {name}}}}}{block}{{{{else}}}}{else_block}{{{{/if}}}}")
            }),
        }
    }
}

impl fmt::Debug for ReoutputFormatters {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReoutputFormatters").finish_non_exhaustive()
    }
}

/// Parameters for a re-output render.
///
/// Each name in `variable_names` is bound to a symbolic marker; variable
/// references, iteration, and conditionals over those markers are
/// re-emitted through the formatters instead of being evaluated.
pub struct ReoutputParams<'a> {
    pub template: &'a Template,
    pub template_list: &'a [String],
    pub loader: &'a dyn PartialLoader,
    pub variable_names: &'a [String],
    pub formatters: ReoutputFormatters,
}

impl fmt::Debug for ReoutputParams<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReoutputParams")
            .field("template", &self.template.name)
            .field("template_list", &self.template_list)
            .field("variable_names", &self.variable_names)
            .finish_non_exhaustive()
    }
}
