//! Template synchronization commands
//!
//! [`TemplateSync`] ties the remote service, the local store and the report
//! generator together. Callers pass logical slugs; the environment prefix is
//! applied here before any remote call and never reaches the local files.

use tracing::{info, warn};

use crate::env::{add_slug_env_prefix, has_env_prefix, strip_slug_env_prefix, AppEnv};
use crate::error::{Result, TemplateError};
use crate::mandrill::{MergeVar, RemoteTemplate, RemoteTemplates, TemplateContent};
use crate::report::{PreviewRenderer, ReportGenerator, ReportSummary};
use crate::templates::{localize_merge_vars, LocalTemplate, TemplateRenderer, TemplateStore};

/// Result of uploading one template
#[derive(Debug, Clone)]
pub struct UploadOutcome {
    /// Physical slug on the remote side
    pub slug: String,
    /// True when the template did not exist remotely and was added
    pub created: bool,
    /// Remote record returned by add/update
    pub result: RemoteTemplate,
    /// Remote record returned by publish, when requested
    pub published: Option<RemoteTemplate>,
}

/// Result of `upload_all`
#[derive(Debug, Clone, Default)]
pub struct UploadAllOutcome {
    pub uploaded: Vec<UploadOutcome>,
    /// Local directories that are incomplete or fail to load
    pub skipped: Vec<String>,
}

/// Result of deleting a template
#[derive(Debug, Clone, Default)]
pub struct DeleteOutcome {
    /// Deleted remote record; `None` when the template was not found remotely
    pub remote: Option<RemoteTemplate>,
    /// Error message reported by the remote side for unknown templates
    pub remote_message: Option<String>,
    /// Whether the local directory was removed
    pub local_deleted: bool,
}

/// Remote template paired with its draft/published diff flag
#[derive(Debug, Clone)]
pub struct RemoteListing {
    pub template: RemoteTemplate,
    pub has_diff: bool,
}

/// Result of `list`
#[derive(Debug, Clone, Default)]
pub struct ListOutcome {
    pub remote: Vec<RemoteListing>,
    pub local: Vec<LocalTemplate>,
}

/// How `render` produces HTML
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderMode {
    /// Ask Mandrill to render the template
    Remote,
    /// Render the HTML body locally with Handlebars
    Local,
}

pub struct TemplateSync<R: RemoteTemplates, P: PreviewRenderer> {
    remote: R,
    store: TemplateStore,
    env: AppEnv,
    report: ReportGenerator<P>,
    renderer: TemplateRenderer,
}

impl<R: RemoteTemplates, P: PreviewRenderer> TemplateSync<R, P> {
    pub fn new(remote: R, store: TemplateStore, env: AppEnv, report: ReportGenerator<P>) -> Self {
        Self {
            remote,
            store,
            env,
            report,
            renderer: TemplateRenderer::new(),
        }
    }

    pub fn remote(&self) -> &R {
        &self.remote
    }

    pub fn store(&self) -> &TemplateStore {
        &self.store
    }

    pub fn env(&self) -> AppEnv {
        self.env
    }

    fn physical(&self, slug: &str) -> String {
        add_slug_env_prefix(self.env, slug)
    }

    /// Copy a remote template into the local store under its logical slug
    pub async fn export(&self, slug: &str) -> Result<LocalTemplate> {
        let remote = self.remote.info(&self.physical(slug)).await?;
        let local = LocalTemplate::from_remote(&remote, slug);
        self.store.save(&local).await?;
        info!("Exported {} ({})", slug, remote.slug);
        Ok(local)
    }

    /// Export every remote template belonging to the current environment
    pub async fn export_all(&self) -> Result<Vec<String>> {
        let mut exported = Vec::new();

        for remote in self.remote.list(None).await? {
            let Some(logical) = strip_slug_env_prefix(self.env, &remote.slug) else {
                continue;
            };

            let local = LocalTemplate::from_remote(&remote, &logical);
            self.store.save(&local).await?;
            exported.push(logical);
        }

        info!("Exported {} templates", exported.len());
        Ok(exported)
    }

    /// Upload a local template as a draft, adding it when it does not exist
    pub async fn upload(&self, slug: &str, publish: bool) -> Result<UploadOutcome> {
        let template = self.store.load(slug).await?;
        self.push(slug, &template, publish).await
    }

    async fn push(
        &self,
        slug: &str,
        template: &LocalTemplate,
        publish: bool,
    ) -> Result<UploadOutcome> {
        let physical = self.physical(slug);
        let payload = template.to_payload(&physical, false);

        let created = !self.remote.exists(&physical).await?;
        let result = if created {
            self.remote.add(&payload).await?
        } else {
            self.remote.update(&payload).await?
        };
        info!(
            "{} draft of {}",
            if created { "Added" } else { "Updated" },
            physical
        );

        let published = if publish {
            Some(self.remote.publish(&physical).await?)
        } else {
            None
        };

        Ok(UploadOutcome {
            slug: physical,
            created,
            result,
            published,
        })
    }

    /// Upload every local template, skipping directories that cannot be
    /// loaded
    pub async fn upload_all(&self, publish: bool) -> Result<UploadAllOutcome> {
        let mut outcome = UploadAllOutcome::default();

        for slug in self.store.list_slugs().await? {
            let template = match self.store.load(&slug).await {
                Ok(template) => template,
                Err(e) => {
                    warn!("Skipping local template {}: {}", slug, e);
                    outcome.skipped.push(slug);
                    continue;
                }
            };

            outcome.uploaded.push(self.push(&slug, &template, publish).await?);
        }

        Ok(outcome)
    }

    /// Delete a remote template and optionally its local copy.
    ///
    /// A template unknown to the remote side is reported, not treated as a
    /// failure.
    pub async fn delete(&self, slug: &str, delete_local: bool) -> Result<DeleteOutcome> {
        let mut outcome = DeleteOutcome::default();

        match self.remote.delete(&self.physical(slug)).await {
            Ok(deleted) => outcome.remote = Some(deleted),
            Err(TemplateError::UnknownTemplate(message)) => {
                warn!("{}", message);
                outcome.remote_message = Some(message);
            }
            Err(e) => return Err(e),
        }

        if delete_local {
            if self.store.is_available(slug).await {
                self.store.delete(slug).await?;
                outcome.local_deleted = true;
            } else {
                warn!("Local template data not found {}", slug);
            }
        }

        Ok(outcome)
    }

    /// Create an empty local template
    pub async fn generate(&self, slug: &str) -> Result<LocalTemplate> {
        if has_env_prefix(slug) {
            return Err(TemplateError::InvalidSlug(slug.to_string()));
        }
        if self.store.contains(slug).await? {
            return Err(TemplateError::AlreadyExists(slug.to_string()));
        }

        let template = LocalTemplate::skeleton(slug);
        self.store.save(&template).await?;
        Ok(template)
    }

    /// Publish the current remote draft
    pub async fn publish(&self, slug: &str) -> Result<RemoteTemplate> {
        let physical = self.physical(slug);
        let result = self.remote.publish(&physical).await?;
        info!("Published {}", physical);
        Ok(result)
    }

    /// Render the local template body with sample merge vars
    pub async fn render(
        &self,
        slug: &str,
        merge_vars: &[MergeVar],
        mode: RenderMode,
    ) -> Result<String> {
        let template = self.store.load(slug).await?;

        match mode {
            RenderMode::Local => {
                let vars = localize_merge_vars(merge_vars);
                self.renderer.render_string(&template.code, &vars)
            }
            RenderMode::Remote => {
                let content = [TemplateContent {
                    name: slug.to_string(),
                    content: template.code,
                }];
                let rendered = self
                    .remote
                    .render(&self.physical(slug), &content, merge_vars)
                    .await?;
                Ok(rendered.html)
            }
        }
    }

    /// Remote templates with their diff flag, and local templates
    pub async fn list(&self, label: Option<&str>) -> Result<ListOutcome> {
        let remote = self
            .remote
            .list(label)
            .await?
            .into_iter()
            .map(|template| RemoteListing {
                has_diff: template.has_diff(),
                template,
            })
            .collect();

        let local = self.store.collect(label).await?;

        Ok(ListOutcome { remote, local })
    }

    /// Generate preview images and the HTML index for local templates
    pub async fn report(&self) -> Result<ReportSummary> {
        self.report.generate(&self.store).await
    }
}
