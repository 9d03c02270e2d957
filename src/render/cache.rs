//! Caller-owned cache of compiled templates

use std::collections::HashMap;
use std::sync::Arc;

use crate::hbs::{CompiledTemplate, HbsRuntime};

/// Cache of compiled templates plus the engine runtime instance that
/// compiled them.
///
/// Compiled templates are scoped to the runtime that compiled them, so
/// the runtime is carried in a reserved slot of the cache and reused
/// whenever the cache is reused. Callers initialize the cache empty and
/// treat it opaquely; entries are added as a documented side effect of
/// rendering and never evicted.
///
/// Passing the same cache to successive render calls skips re-loading
/// and re-compiling partials. Calls sharing a cache must run one at a
/// time; the `&mut` borrow taken by each render call enforces this.
#[derive(Debug, Default)]
pub struct CompiledTemplateCache {
    pub(crate) runtime: HbsRuntime,
    pub(crate) compiled: HashMap<String, Arc<CompiledTemplate>>,
}

impl CompiledTemplateCache {
    /// Create an empty cache with a fresh runtime instance
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a compiled template is cached under `name`
    pub fn contains(&self, name: &str) -> bool {
        self.compiled.contains_key(name)
    }

    /// Number of cached compiled templates
    pub fn len(&self) -> usize {
        self.compiled.len()
    }

    pub fn is_empty(&self) -> bool {
        self.compiled.is_empty()
    }
}
