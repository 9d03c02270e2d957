//! Core template value types

use serde::{Deserialize, Serialize};

/// A named template with its content and sending metadata.
///
/// Identity is `name` within a given template list. Instances are
/// immutable by convention: the `with_*` methods return a new value
/// rather than mutating in place. `content` and `subject` are
/// independently compiled by the renderer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Template {
    pub name: String,
    pub content: String,
    pub engine_name: String,
    #[serde(default)]
    pub subject: String,
    #[serde(default)]
    pub from_name: String,
    #[serde(default)]
    pub from_email: String,
}

impl Template {
    /// Create a template with empty subject and sender metadata
    pub fn new(
        name: impl Into<String>,
        content: impl Into<String>,
        engine_name: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            content: content.into(),
            engine_name: engine_name.into(),
            subject: String::new(),
            from_name: String::new(),
            from_email: String::new(),
        }
    }

    /// Return a copy with a different name
    pub fn with_name(&self, name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..self.clone()
        }
    }

    /// Return a copy with different content
    pub fn with_content(&self, content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            ..self.clone()
        }
    }

    /// Return a copy with a different subject line
    pub fn with_subject(&self, subject: impl Into<String>) -> Self {
        Self {
            subject: subject.into(),
            ..self.clone()
        }
    }
}

/// Persisted variant of a template.
///
/// Drafts are the editable copies; the published variant is the one used
/// for live rendering and partial resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TemplateState {
    Draft,
    Published,
}

impl TemplateState {
    pub fn as_str(&self) -> &'static str {
        match self {
            TemplateState::Draft => "draft",
            TemplateState::Published => "published",
        }
    }
}

impl std::fmt::Display for TemplateState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_with_methods_leave_original_untouched() {
        let template = Template::new("welcome", "Hello {{name}}", "handlebars");
        let renamed = template.with_name("welcome-v2");

        assert_eq!(template.name, "welcome");
        assert_eq!(renamed.name, "welcome-v2");
        assert_eq!(renamed.content, template.content);
    }

    #[test]
    fn test_serde_uses_camel_case() {
        let template = Template::new("welcome", "Hi", "handlebars");
        let json = serde_json::to_value(&template).unwrap();

        assert_eq!(json["engineName"], "handlebars");
        assert_eq!(json["fromEmail"], "");
    }

    #[test]
    fn test_state_round_trip() {
        let json = serde_json::to_string(&TemplateState::Published).unwrap();
        assert_eq!(json, "\"published\"");
        assert_eq!(TemplateState::Draft.as_str(), "draft");
    }
}
