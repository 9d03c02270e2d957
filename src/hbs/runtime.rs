//! Template evaluator with deferred partials and overridable helpers

use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

use serde_json::Value as JsonValue;

use crate::hbs::ast::{BlockHelper, Node, Path};
use crate::hbs::errors::HbsError;
use crate::hbs::value::{SymbolicVariable, TemplateValue, html_escape};

/// Formatter for a structural block in the target dialect: takes the
/// variable name, the block text, and the else-block text.
pub type BlockFormatter = Arc<dyn Fn(&str, &str, &str) -> String + Send + Sync>;

/// Per-runtime helper overrides.
///
/// When installed, `each` and `if` divert symbolic marker values to the
/// given formatters instead of evaluating; concrete values keep the
/// built-in behavior. Installation is scoped to one re-output call and
/// the previous table is restored afterwards, because the runtime
/// instance is cached and reused across calls.
#[derive(Default, Clone)]
pub struct HelperOverrides {
    pub each: Option<BlockFormatter>,
    pub cond: Option<BlockFormatter>,
}

impl fmt::Debug for HelperOverrides {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HelperOverrides")
            .field("each", &self.each.is_some())
            .field("cond", &self.cond.is_some())
            .finish()
    }
}

/// Produce the unique placeholder token for one deferred partial call
pub(crate) fn placeholder_token(id: u64) -> String {
    format!("__RENDER__{id}__")
}

/// A recorded partial invocation awaiting resolution
#[derive(Debug, Clone)]
pub struct PendingPartialCall {
    /// Name of the invoked partial
    pub name: String,
    /// The context value at the invocation site
    pub context: TemplateValue,
    /// The token emitted in place of the partial's output
    pub placeholder: String,
}

/// Per-render mutable state: the placeholder counter and the list of
/// partial invocations recorded by the most recent evaluation pass.
///
/// Placeholders are unique across the whole render (body and subject),
/// never reused, so substitution is unambiguous even with recursive or
/// overlapping partial structures.
#[derive(Debug, Default)]
pub struct RenderSession {
    next_placeholder: u64,
    pending: Vec<PendingPartialCall>,
}

impl RenderSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a partial invocation and return its placeholder token
    pub fn defer(&mut self, name: &str, context: TemplateValue) -> String {
        let placeholder = placeholder_token(self.next_placeholder);
        self.next_placeholder += 1;
        self.pending.push(PendingPartialCall {
            name: name.to_string(),
            context,
            placeholder: placeholder.clone(),
        });
        placeholder
    }

    /// Take the calls recorded since the last pass
    pub fn take_pending(&mut self) -> Vec<PendingPartialCall> {
        std::mem::take(&mut self.pending)
    }
}

/// Scope for one evaluation frame: the current context value, the render
/// root, and loop-local data variables when inside `{{#each}}`.
#[derive(Debug, Clone, Copy)]
pub struct Scope<'a> {
    cursor: &'a TemplateValue,
    root: &'a TemplateValue,
    locals: Option<Locals<'a>>,
}

#[derive(Debug, Clone, Copy)]
struct Locals<'a> {
    index: usize,
    first: bool,
    last: bool,
    key: Option<&'a str>,
}

impl<'a> Scope<'a> {
    /// Scope for the top of a render
    pub fn root(value: &'a TemplateValue) -> Self {
        Self {
            cursor: value,
            root: value,
            locals: None,
        }
    }

    fn nested<'b>(&self, cursor: &'b TemplateValue, locals: Locals<'b>) -> Scope<'b>
    where
        'a: 'b,
    {
        Scope {
            cursor,
            root: self.root,
            locals: Some(locals),
        }
    }
}

/// The engine runtime instance.
///
/// Holds the set of partial names registered for the current render and
/// the helper override table. One runtime lives inside each
/// compiled-template cache; compiled templates must only be evaluated
/// against the runtime held by the cache that compiled them.
#[derive(Debug, Default)]
pub struct HbsRuntime {
    partials: HashSet<String>,
    overrides: HelperOverrides,
}

impl HbsRuntime {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the names that may be invoked as partials for the next
    /// render, replacing any previous registration.
    pub fn register_partials<I, S>(&mut self, names: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.partials = names.into_iter().map(Into::into).collect();
    }

    /// Install helper overrides, returning the previous table so the
    /// caller can restore it when its render completes.
    pub fn install_overrides(&mut self, overrides: HelperOverrides) -> HelperOverrides {
        std::mem::replace(&mut self.overrides, overrides)
    }

    /// Evaluate nodes against a scope, appending to `out`.
    ///
    /// Partial invocations are not expanded; each emits a placeholder
    /// token and records a [`PendingPartialCall`] in the session.
    pub fn evaluate(
        &self,
        nodes: &[Node],
        scope: &Scope<'_>,
        session: &mut RenderSession,
        out: &mut String,
    ) -> Result<(), HbsError> {
        for node in nodes {
            match node {
                Node::Text(text) => out.push_str(text),
                Node::Expression { path, raw } => {
                    if let Some(value) = self.resolve(scope, path) {
                        let text = value.to_output_string();
                        if *raw {
                            out.push_str(&text);
                        } else {
                            out.push_str(&html_escape(&text));
                        }
                    }
                }
                Node::Partial { name, context } => {
                    if !self.partials.contains(name) {
                        return Err(HbsError::UnknownPartial(name.clone()));
                    }
                    let context_value = match context {
                        Some(path) => self
                            .resolve(scope, path)
                            .unwrap_or(TemplateValue::Json(JsonValue::Null)),
                        None => scope.cursor.clone(),
                    };
                    out.push_str(&session.defer(name, context_value));
                }
                Node::Block {
                    helper: BlockHelper::Each,
                    path,
                    body,
                    inverse,
                } => self.eval_each(path, body, inverse, scope, session, out)?,
                Node::Block {
                    helper: BlockHelper::If,
                    path,
                    body,
                    inverse,
                } => self.eval_if(path, body, inverse, scope, session, out)?,
            }
        }
        Ok(())
    }

    fn eval_to_string(
        &self,
        nodes: &[Node],
        scope: &Scope<'_>,
        session: &mut RenderSession,
    ) -> Result<String, HbsError> {
        let mut out = String::new();
        self.evaluate(nodes, scope, session, &mut out)?;
        Ok(out)
    }

    fn eval_each(
        &self,
        path: &Path,
        body: &[Node],
        inverse: &[Node],
        scope: &Scope<'_>,
        session: &mut RenderSession,
        out: &mut String,
    ) -> Result<(), HbsError> {
        let value = self.resolve(scope, path);

        if let (Some(TemplateValue::Variable(variable)), Some(format)) =
            (&value, &self.overrides.each)
        {
            let block = self.eval_to_string(body, scope, session)?;
            let else_block = self.eval_to_string(inverse, scope, session)?;
            out.push_str(&format(&variable.name, &block, &else_block));
            return Ok(());
        }

        match value {
            Some(TemplateValue::Json(JsonValue::Array(items))) if !items.is_empty() => {
                let len = items.len();
                for (index, item) in items.into_iter().enumerate() {
                    let item_value = TemplateValue::Json(item);
                    let nested = scope.nested(
                        &item_value,
                        Locals {
                            index,
                            first: index == 0,
                            last: index + 1 == len,
                            key: None,
                        },
                    );
                    self.evaluate(body, &nested, session, out)?;
                }
                Ok(())
            }
            Some(TemplateValue::Json(JsonValue::Object(entries))) if !entries.is_empty() => {
                let len = entries.len();
                for (index, (key, item)) in entries.into_iter().enumerate() {
                    let item_value = TemplateValue::Json(item);
                    let nested = scope.nested(
                        &item_value,
                        Locals {
                            index,
                            first: index == 0,
                            last: index + 1 == len,
                            key: Some(&key),
                        },
                    );
                    self.evaluate(body, &nested, session, out)?;
                }
                Ok(())
            }
            Some(TemplateValue::Map(entries)) if !entries.is_empty() => {
                let len = entries.len();
                for (index, (key, item_value)) in entries.into_iter().enumerate() {
                    let nested = scope.nested(
                        &item_value,
                        Locals {
                            index,
                            first: index == 0,
                            last: index + 1 == len,
                            key: Some(&key),
                        },
                    );
                    self.evaluate(body, &nested, session, out)?;
                }
                Ok(())
            }
            _ => self.evaluate(inverse, scope, session, out),
        }
    }

    fn eval_if(
        &self,
        path: &Path,
        body: &[Node],
        inverse: &[Node],
        scope: &Scope<'_>,
        session: &mut RenderSession,
        out: &mut String,
    ) -> Result<(), HbsError> {
        let value = self.resolve(scope, path);

        if let (Some(TemplateValue::Variable(variable)), Some(format)) =
            (&value, &self.overrides.cond)
        {
            let block = self.eval_to_string(body, scope, session)?;
            let else_block = self.eval_to_string(inverse, scope, session)?;
            out.push_str(&format(&variable.name, &block, &else_block));
            return Ok(());
        }

        let truthy = value.as_ref().map(TemplateValue::truthy).unwrap_or(false);
        if truthy {
            self.evaluate(body, scope, session, out)
        } else {
            self.evaluate(inverse, scope, session, out)
        }
    }

    /// Resolve a path against the current context, falling back to the
    /// render root for names not present in the cursor.
    fn resolve(&self, scope: &Scope<'_>, path: &Path) -> Option<TemplateValue> {
        match path {
            Path::This => Some(scope.cursor.clone()),
            Path::Local(name) => scope.locals.as_ref().and_then(|locals| match name.as_str() {
                "index" => Some(TemplateValue::Json(JsonValue::from(locals.index))),
                "first" => Some(TemplateValue::Json(JsonValue::Bool(locals.first))),
                "last" => Some(TemplateValue::Json(JsonValue::Bool(locals.last))),
                "key" => locals
                    .key
                    .map(|key| TemplateValue::Json(JsonValue::String(key.to_string()))),
                _ => None,
            }),
            Path::Segments(segments) => lookup(scope.cursor, segments).or_else(|| {
                if std::ptr::eq(scope.cursor, scope.root) {
                    None
                } else {
                    lookup(scope.root, segments)
                }
            }),
        }
    }
}

fn lookup(value: &TemplateValue, segments: &[String]) -> Option<TemplateValue> {
    match segments.split_first() {
        None => Some(value.clone()),
        Some((head, rest)) => match value {
            TemplateValue::Map(entries) => entries.get(head).and_then(|v| lookup(v, rest)),
            TemplateValue::Json(json) => lookup_json(json, segments).map(TemplateValue::Json),
            TemplateValue::Variable(_) => None,
        },
    }
}

fn lookup_json(value: &JsonValue, segments: &[String]) -> Option<JsonValue> {
    match segments.split_first() {
        None => Some(value.clone()),
        Some((head, rest)) => value
            .as_object()
            .and_then(|entries| entries.get(head))
            .and_then(|v| lookup_json(v, rest)),
    }
}

/// Build the symbolic root data map for a re-output render
pub fn symbolic_data<'a, I, F>(variable_names: I, variable_formatter: F) -> TemplateValue
where
    I: IntoIterator<Item = &'a str>,
    F: Fn(&str) -> String,
{
    let entries = variable_names
        .into_iter()
        .map(|name| {
            (
                name.to_string(),
                TemplateValue::Variable(SymbolicVariable {
                    name: name.to_string(),
                    formatted: variable_formatter(name),
                }),
            )
        })
        .collect();
    TemplateValue::Map(entries)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hbs::ast::CompiledTemplate;
    use serde_json::json;

    fn render(source: &str, data: TemplateValue) -> String {
        let runtime = HbsRuntime::new();
        render_with(&runtime, source, data).0
    }

    fn render_with(
        runtime: &HbsRuntime,
        source: &str,
        data: TemplateValue,
    ) -> (String, Vec<PendingPartialCall>) {
        let template = CompiledTemplate::compile(source).unwrap();
        let mut session = RenderSession::new();
        let mut out = String::new();
        runtime
            .evaluate(template.nodes(), &Scope::root(&data), &mut session, &mut out)
            .unwrap();
        (out, session.take_pending())
    }

    #[test]
    fn test_expression_rendering() {
        let out = render("Hello {{name}}", TemplateValue::Json(json!({"name": "World"})));
        assert_eq!(out, "Hello World");
    }

    #[test]
    fn test_escaped_and_raw_expressions() {
        let data = TemplateValue::Json(json!({"html": "<b>hi</b>"}));
        assert_eq!(render("{{html}}", data.clone()), "&lt;b&gt;hi&lt;/b&gt;");
        assert_eq!(render("{{{html}}}", data), "<b>hi</b>");
    }

    #[test]
    fn test_missing_value_renders_empty() {
        let out = render("[{{missing}}]", TemplateValue::Json(json!({})));
        assert_eq!(out, "[]");
    }

    #[test]
    fn test_each_over_array_with_locals() {
        let out = render(
            "{{#each items}}{{@index}}:{{this}} {{/each}}",
            TemplateValue::Json(json!({"items": ["a", "b"]})),
        );
        assert_eq!(out, "0:a 1:b ");
    }

    #[test]
    fn test_each_else_branch_on_empty() {
        let out = render(
            "{{#each items}}x{{else}}empty{{/each}}",
            TemplateValue::Json(json!({"items": []})),
        );
        assert_eq!(out, "empty");
    }

    #[test]
    fn test_each_falls_back_to_root_for_outer_names() {
        let out = render(
            "{{#each items}}{{greeting}} {{this}};{{/each}}",
            TemplateValue::Json(json!({"items": ["a"], "greeting": "hi"})),
        );
        assert_eq!(out, "hi a;");
    }

    #[test]
    fn test_if_branches() {
        let data = TemplateValue::Json(json!({"premium": true, "name": "Ada"}));
        assert_eq!(render("{{#if premium}}yes{{else}}no{{/if}}", data), "yes");
        let data = TemplateValue::Json(json!({"premium": false}));
        assert_eq!(render("{{#if premium}}yes{{else}}no{{/if}}", data), "no");
    }

    #[test]
    fn test_partial_defers_with_placeholder() {
        let mut runtime = HbsRuntime::new();
        runtime.register_partials(["footer"]);
        let (out, pending) = render_with(
            &runtime,
            "body {{> footer}}",
            TemplateValue::Json(json!({"x": 1})),
        );

        assert_eq!(pending.len(), 1);
        assert_eq!(pending[0].name, "footer");
        assert_eq!(out, format!("body {}", pending[0].placeholder));
        assert_eq!(pending[0].context, TemplateValue::Json(json!({"x": 1})));
    }

    #[test]
    fn test_partial_with_context_path() {
        let mut runtime = HbsRuntime::new();
        runtime.register_partials(["card"]);
        let (_, pending) = render_with(
            &runtime,
            "{{> card user}}",
            TemplateValue::Json(json!({"user": {"name": "Ada"}})),
        );
        assert_eq!(pending[0].context, TemplateValue::Json(json!({"name": "Ada"})));
    }

    #[test]
    fn test_unregistered_partial_is_error() {
        let runtime = HbsRuntime::new();
        let template = CompiledTemplate::compile("{{> ghost}}").unwrap();
        let data = TemplateValue::Json(json!({}));
        let mut session = RenderSession::new();
        let mut out = String::new();
        let err = runtime
            .evaluate(template.nodes(), &Scope::root(&data), &mut session, &mut out)
            .unwrap_err();
        assert_eq!(err, HbsError::UnknownPartial("ghost".to_string()));
    }

    #[test]
    fn test_placeholders_are_unique_within_session() {
        let mut runtime = HbsRuntime::new();
        runtime.register_partials(["p"]);
        let (_, pending) = render_with(
            &runtime,
            "{{> p}}{{> p}}{{> p}}",
            TemplateValue::Json(json!({})),
        );
        let mut placeholders: Vec<_> = pending.iter().map(|c| c.placeholder.clone()).collect();
        placeholders.sort();
        placeholders.dedup();
        assert_eq!(placeholders.len(), 3);
    }

    #[test]
    fn test_marker_expression_uses_formatted_representation() {
        let data = symbolic_data(["user"], |name| format!("{{{{{name}}}}}"));
        let out = render("Hi {{user}}", data);
        assert_eq!(out, "Hi {{user}}");
    }

    #[test]
    fn test_each_override_fires_for_marker_only() {
        let mut runtime = HbsRuntime::new();
        runtime.install_overrides(HelperOverrides {
            each: Some(Arc::new(|name, block, else_block| {
                format!("LOOP({name}){{{block}}}ELSE{{{else_block}}}ENDLOOP")
            })),
            cond: None,
        });

        // Marker: formatter output with block text captured literally
        let data = symbolic_data(["items"], |name| format!("{{{{{name}}}}}"));
        let (out, _) = render_with(&runtime, "{{#each items}}<li>{{/each}}", data);
        assert_eq!(out, "LOOP(items){<li>}ELSE{}ENDLOOP");

        // Concrete value: built-in iteration even while override installed
        let data = TemplateValue::Json(json!({"items": [1, 2]}));
        let (out, _) = render_with(&runtime, "{{#each items}}{{this}}.{{/each}}", data);
        assert_eq!(out, "1.2.");
    }

    #[test]
    fn test_install_overrides_returns_previous_table() {
        let mut runtime = HbsRuntime::new();
        let formatter: BlockFormatter = Arc::new(|_, _, _| String::new());
        let previous = runtime.install_overrides(HelperOverrides {
            each: Some(formatter),
            cond: None,
        });
        assert!(previous.each.is_none());

        let restored = runtime.install_overrides(previous);
        assert!(restored.each.is_some());
    }
}
