//! In-memory template repository
//!
//! Backs tests and embedded deployments where templates ship with the
//! process. Draft and published copies are stored under separate keys,
//! mirroring the two-state layout of file- or object-store backends.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::engines::TemplateEngine;
use crate::templates::{Template, TemplateError, TemplateRepository, TemplateState};

/// Template repository held entirely in process memory
#[derive(Default)]
pub struct InMemoryTemplateRepository {
    entries: RwLock<HashMap<(String, TemplateState), Template>>,
}

impl InMemoryTemplateRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the repository with templates stored in both states.
    ///
    /// Convenient for fixtures where drafts and published copies start
    /// out identical.
    pub async fn seed(&self, templates: impl IntoIterator<Item = Template>) {
        let mut entries = self.entries.write().await;
        for template in templates {
            entries.insert((template.name.clone(), TemplateState::Draft), template.clone());
            entries.insert((template.name.clone(), TemplateState::Published), template);
        }
    }
}

#[async_trait]
impl TemplateRepository for InMemoryTemplateRepository {
    async fn list(&self) -> Result<Vec<Template>, TemplateError> {
        let entries = self.entries.read().await;
        let mut templates: Vec<Template> = entries
            .iter()
            .filter(|((_, state), _)| *state == TemplateState::Draft)
            .map(|(_, template)| template.clone())
            .collect();
        templates.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(templates)
    }

    async fn load(
        &self,
        name: &str,
        engine: &TemplateEngine,
        state: TemplateState,
    ) -> Result<Template, TemplateError> {
        let entries = self.entries.read().await;
        entries
            .get(&(name.to_string(), state))
            .filter(|template| template.engine_name == engine.name())
            .cloned()
            .ok_or_else(|| TemplateError::not_found(name))
    }

    async fn save(&self, template: &Template, state: TemplateState) -> Result<(), TemplateError> {
        let mut entries = self.entries.write().await;
        entries.insert((template.name.clone(), state), template.clone());
        Ok(())
    }
}
