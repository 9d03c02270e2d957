//! Static process-wide registry of known template engines

use crate::engines::{EngineError, TemplateEngine};

/// The Handlebars-family engine
pub static HANDLEBARS: TemplateEngine = TemplateEngine::new("handlebars", ".hbs");

/// All registered engines. Populated at init, never mutated.
static REGISTRY: &[&TemplateEngine] = &[&HANDLEBARS];

/// Either a resolved engine reference or a name still to be resolved.
///
/// Lets callers pass a `&'static TemplateEngine` or a plain name string
/// to APIs that accept an engine, in the spirit of
/// `TemplateEngine::wrap`.
#[derive(Debug, Clone, Copy)]
pub enum EngineSelector<'a> {
    Engine(&'static TemplateEngine),
    Name(&'a str),
}

impl From<&'static TemplateEngine> for EngineSelector<'static> {
    fn from(engine: &'static TemplateEngine) -> Self {
        EngineSelector::Engine(engine)
    }
}

impl<'a> From<&'a str> for EngineSelector<'a> {
    fn from(name: &'a str) -> Self {
        EngineSelector::Name(name)
    }
}

impl TemplateEngine {
    /// Resolve `value` to a registered engine.
    ///
    /// An engine reference is returned as-is; a name string is looked up
    /// in the registry.
    pub fn wrap<'a>(
        value: impl Into<EngineSelector<'a>>,
    ) -> Result<&'static TemplateEngine, EngineError> {
        match value.into() {
            EngineSelector::Engine(engine) => Ok(engine),
            EngineSelector::Name(name) => Self::by_name(name),
        }
    }

    /// Look up an engine by its registered name
    pub fn by_name(name: &str) -> Result<&'static TemplateEngine, EngineError> {
        REGISTRY
            .iter()
            .copied()
            .find(|engine| engine.name() == name)
            .ok_or_else(|| EngineError::UnrecognizedEngine(name.to_string()))
    }

    /// Look up an engine by file extension, case-insensitively
    pub fn by_file_extension(extension: &str) -> Result<&'static TemplateEngine, EngineError> {
        let extension = extension.to_ascii_lowercase();
        REGISTRY
            .iter()
            .copied()
            .find(|engine| engine.file_extension() == extension)
            .ok_or(EngineError::UnknownExtension(extension))
    }
}
