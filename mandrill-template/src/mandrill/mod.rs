//! Remote template access
//!
//! [`RemoteTemplates`] is the seam between the sync commands and Mandrill.
//! [`MandrillClient`] talks to the real API; [`InMemoryTemplates`] keeps
//! everything in process.

use async_trait::async_trait;

use crate::error::Result;

pub mod client;
pub mod memory;
pub mod types;

pub use client::MandrillClient;
pub use memory::InMemoryTemplates;
pub use types::{MergeVar, RemoteTemplate, RenderedTemplate, TemplateContent, TemplatePayload};

/// Template operations offered by the remote service.
///
/// Every `slug` argument is a physical slug, environment prefix included.
#[async_trait]
pub trait RemoteTemplates: Send + Sync {
    /// List templates, optionally restricted to a label
    async fn list(&self, label: Option<&str>) -> Result<Vec<RemoteTemplate>>;

    /// Fetch a single template
    async fn info(&self, slug: &str) -> Result<RemoteTemplate>;

    /// Create a new template
    async fn add(&self, payload: &TemplatePayload) -> Result<RemoteTemplate>;

    /// Update the draft of an existing template
    async fn update(&self, payload: &TemplatePayload) -> Result<RemoteTemplate>;

    /// Delete a template, returning the deleted record
    async fn delete(&self, slug: &str) -> Result<RemoteTemplate>;

    /// Promote the current draft to the published version
    async fn publish(&self, slug: &str) -> Result<RemoteTemplate>;

    /// Render a template with editable-region content and merge variables
    async fn render(
        &self,
        slug: &str,
        template_content: &[TemplateContent],
        merge_vars: &[MergeVar],
    ) -> Result<RenderedTemplate>;

    /// Whether a template exists remotely
    async fn exists(&self, slug: &str) -> Result<bool> {
        match self.info(slug).await {
            Ok(_) => Ok(true),
            Err(e) if e.is_unknown_template() => Ok(false),
            Err(e) => Err(e),
        }
    }
}
