//! Core engine identity type

/// A template dialect identified by name and file extension.
///
/// Instances are registry-owned statics; application code holds
/// `&'static TemplateEngine` references and compares them by name.
#[derive(Debug, PartialEq, Eq)]
pub struct TemplateEngine {
    name: &'static str,
    file_extension: &'static str,
}

impl TemplateEngine {
    pub(crate) const fn new(name: &'static str, file_extension: &'static str) -> Self {
        Self {
            name,
            file_extension,
        }
    }

    /// The engine name, e.g. "handlebars"
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// The file extension claimed by this engine, e.g. ".hbs".
    ///
    /// Extensions are unique across registered engines.
    pub fn file_extension(&self) -> &'static str {
        self.file_extension
    }
}
