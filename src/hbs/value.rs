//! Tagged value model for template evaluation
//!
//! Render data flows through the evaluator as a [`TemplateValue`]:
//! either concrete JSON data (normal rendering) or a symbolic variable
//! marker (re-output mode). Helpers pattern-match on the tag rather than
//! probing values for magic properties.

use std::collections::BTreeMap;

use serde_json::Value as JsonValue;

/// A marker standing in for a variable during re-output rendering.
///
/// Carries the variable's name for the structural helpers and its
/// pre-formatted representation in the target dialect, produced by the
/// caller's variable formatter at data-construction time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SymbolicVariable {
    pub name: String,
    pub formatted: String,
}

/// A value in the render data
#[derive(Debug, Clone, PartialEq)]
pub enum TemplateValue {
    /// Concrete data for normal rendering
    Json(JsonValue),
    /// A re-output marker bound to a variable name
    Variable(SymbolicVariable),
    /// A map of named values, used as the root of re-output renders
    Map(BTreeMap<String, TemplateValue>),
}

impl TemplateValue {
    /// Truthiness for `{{#if}}`: null, false, zero, empty strings and
    /// empty collections are falsy; markers are always truthy.
    pub fn truthy(&self) -> bool {
        match self {
            TemplateValue::Variable(_) => true,
            TemplateValue::Map(entries) => !entries.is_empty(),
            TemplateValue::Json(value) => match value {
                JsonValue::Null => false,
                JsonValue::Bool(b) => *b,
                JsonValue::Number(n) => n.as_f64().map(|f| f != 0.0).unwrap_or(true),
                JsonValue::String(s) => !s.is_empty(),
                JsonValue::Array(items) => !items.is_empty(),
                JsonValue::Object(entries) => !entries.is_empty(),
            },
        }
    }

    /// Stringification for mustache output. Markers render as their
    /// pre-formatted representation; arrays are comma-joined; objects
    /// and null render as empty.
    pub fn to_output_string(&self) -> String {
        match self {
            TemplateValue::Variable(variable) => variable.formatted.clone(),
            TemplateValue::Map(_) => String::new(),
            TemplateValue::Json(value) => json_to_output(value),
        }
    }
}

fn json_to_output(value: &JsonValue) -> String {
    match value {
        JsonValue::Null => String::new(),
        JsonValue::Bool(b) => b.to_string(),
        JsonValue::Number(n) => n.to_string(),
        JsonValue::String(s) => s.clone(),
        JsonValue::Array(items) => items
            .iter()
            .map(json_to_output)
            .collect::<Vec<_>>()
            .join(","),
        JsonValue::Object(_) => String::new(),
    }
}

/// Escape `& < > " '` for safe HTML interpolation
pub fn html_escape(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#x27;"),
            other => escaped.push(other),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_truthiness() {
        assert!(!TemplateValue::Json(json!(null)).truthy());
        assert!(!TemplateValue::Json(json!(false)).truthy());
        assert!(!TemplateValue::Json(json!(0)).truthy());
        assert!(!TemplateValue::Json(json!("")).truthy());
        assert!(!TemplateValue::Json(json!([])).truthy());
        assert!(!TemplateValue::Json(json!({})).truthy());

        assert!(TemplateValue::Json(json!(true)).truthy());
        assert!(TemplateValue::Json(json!(1)).truthy());
        assert!(TemplateValue::Json(json!("x")).truthy());
        assert!(TemplateValue::Json(json!([0])).truthy());
        assert!(
            TemplateValue::Variable(SymbolicVariable {
                name: "v".to_string(),
                formatted: "{{v}}".to_string(),
            })
            .truthy()
        );
    }

    #[test]
    fn test_output_string() {
        assert_eq!(TemplateValue::Json(json!("hi")).to_output_string(), "hi");
        assert_eq!(TemplateValue::Json(json!(3)).to_output_string(), "3");
        assert_eq!(TemplateValue::Json(json!(null)).to_output_string(), "");
        assert_eq!(
            TemplateValue::Json(json!([1, "a", 2])).to_output_string(),
            "1,a,2"
        );
    }

    #[test]
    fn test_marker_renders_preformatted() {
        let marker = TemplateValue::Variable(SymbolicVariable {
            name: "user".to_string(),
            formatted: "{{user}}".to_string(),
        });
        assert_eq!(marker.to_output_string(), "{{user}}");
    }

    #[test]
    fn test_html_escape() {
        assert_eq!(
            html_escape("<b>\"a\" & 'b'</b>"),
            "&lt;b&gt;&quot;a&quot; &amp; &#x27;b&#x27;&lt;/b&gt;"
        );
    }
}
