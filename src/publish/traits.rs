//! Publishing ports

use async_trait::async_trait;

use crate::publish::{HostError, HostedTemplate, PublishError, PublishRequest};

/// External template-hosting service.
///
/// `create` must fail with [`HostError::AlreadyExists`] when the name is
/// taken, which is what enables the publisher's create-or-update
/// fallback.
#[async_trait]
pub trait TemplateHost: Send + Sync {
    async fn create(&self, template: &HostedTemplate) -> Result<(), HostError>;
    async fn update(&self, template: &HostedTemplate) -> Result<(), HostError>;
}

/// Publishes a template, with its partials expanded, to an external
/// hosting service
#[async_trait]
pub trait Publisher: Send + Sync {
    async fn publish(&self, request: PublishRequest<'_>) -> Result<(), PublishError>;
}
