//! In-process template store implementing [`RemoteTemplates`]
//!
//! Mirrors the Mandrill semantics the sync commands rely on: unknown slugs
//! fail with `UnknownTemplate`, drafts and published fields are kept apart,
//! and publishing copies the draft over the published version.

use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::Mutex;
use tracing::debug;

use super::types::{MergeVar, RemoteTemplate, RenderedTemplate, TemplateContent, TemplatePayload};
use super::RemoteTemplates;
use crate::error::{Result, TemplateError};

/// Remote templates held in memory, keyed by slug
#[derive(Debug, Default)]
pub struct InMemoryTemplates {
    templates: Mutex<BTreeMap<String, RemoteTemplate>>,
}

impl InMemoryTemplates {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a template as-is, replacing any template with the same slug
    pub async fn insert(&self, template: RemoteTemplate) {
        self.templates
            .lock()
            .await
            .insert(template.slug.clone(), template);
    }

    pub async fn get(&self, slug: &str) -> Option<RemoteTemplate> {
        self.templates.lock().await.get(slug).cloned()
    }

    pub async fn slugs(&self) -> Vec<String> {
        self.templates.lock().await.keys().cloned().collect()
    }

    fn now() -> String {
        Utc::now().format("%Y-%m-%d %H:%M:%S%.3f").to_string()
    }

    fn slugify(name: &str) -> String {
        name.trim()
            .to_lowercase()
            .chars()
            .map(|c| if c.is_alphanumeric() || c == '_' { c } else { '-' })
            .collect()
    }

    fn apply_draft(template: &mut RemoteTemplate, payload: &TemplatePayload) {
        template.from_email = payload.from_email.clone();
        template.from_name = payload.from_name.clone();
        template.subject = payload.subject.clone();
        template.code = payload.code.clone();
        template.text = payload.text.clone();
        template.labels = payload.labels.clone();
        let now = Self::now();
        template.updated_at = Some(now.clone());
        template.draft_updated_at = Some(now);
    }

    fn apply_publish(template: &mut RemoteTemplate) {
        template.publish_name = template.name.clone();
        template.publish_code = template.code.clone();
        template.publish_subject = template.subject.clone();
        template.publish_from_email = template.from_email.clone();
        template.publish_from_name = template.from_name.clone();
        template.publish_text = template.text.clone();
        template.published_at = Some(Self::now());
    }

    fn unknown(slug: &str) -> TemplateError {
        TemplateError::UnknownTemplate(format!("No such template \"{}\"", slug))
    }
}

#[async_trait]
impl RemoteTemplates for InMemoryTemplates {
    async fn list(&self, label: Option<&str>) -> Result<Vec<RemoteTemplate>> {
        let templates = self.templates.lock().await;
        Ok(templates
            .values()
            .filter(|t| label.map_or(true, |l| t.labels.iter().any(|x| x == l)))
            .cloned()
            .collect())
    }

    async fn info(&self, slug: &str) -> Result<RemoteTemplate> {
        self.get(slug).await.ok_or_else(|| Self::unknown(slug))
    }

    async fn add(&self, payload: &TemplatePayload) -> Result<RemoteTemplate> {
        let slug = Self::slugify(&payload.name);
        let mut templates = self.templates.lock().await;

        if templates.contains_key(&slug) {
            return Err(TemplateError::Api {
                name: "Invalid_Template".to_string(),
                message: format!("A template with name \"{}\" already exists", payload.name),
            });
        }

        let mut template = RemoteTemplate {
            slug: slug.clone(),
            name: Some(payload.name.clone()),
            created_at: Some(Self::now()),
            ..Default::default()
        };
        Self::apply_draft(&mut template, payload);
        if payload.publish {
            Self::apply_publish(&mut template);
        }

        debug!("In-memory add of {}", slug);
        templates.insert(slug, template.clone());
        Ok(template)
    }

    async fn update(&self, payload: &TemplatePayload) -> Result<RemoteTemplate> {
        let slug = Self::slugify(&payload.name);
        let mut templates = self.templates.lock().await;
        let template = templates
            .get_mut(&slug)
            .ok_or_else(|| Self::unknown(&payload.name))?;

        Self::apply_draft(template, payload);
        if payload.publish {
            Self::apply_publish(template);
        }

        debug!("In-memory update of {}", slug);
        Ok(template.clone())
    }

    async fn delete(&self, slug: &str) -> Result<RemoteTemplate> {
        self.templates
            .lock()
            .await
            .remove(slug)
            .ok_or_else(|| Self::unknown(slug))
    }

    async fn publish(&self, slug: &str) -> Result<RemoteTemplate> {
        let mut templates = self.templates.lock().await;
        let template = templates.get_mut(slug).ok_or_else(|| Self::unknown(slug))?;
        Self::apply_publish(template);
        Ok(template.clone())
    }

    /// Replaces `*|NAME|*` merge tags in the stored draft code. Editable
    /// region content is not applied.
    async fn render(
        &self,
        slug: &str,
        _template_content: &[TemplateContent],
        merge_vars: &[MergeVar],
    ) -> Result<RenderedTemplate> {
        let template = self.info(slug).await?;
        let mut html = template.code.unwrap_or_default();

        for var in merge_vars {
            let value = match &var.content {
                serde_json::Value::String(s) => s.clone(),
                serde_json::Value::Null => String::new(),
                other => other.to_string(),
            };
            html = html.replace(&format!("*|{}|*", var.name.to_uppercase()), &value);
        }

        Ok(RenderedTemplate { html })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payload(name: &str, code: &str) -> TemplatePayload {
        TemplatePayload {
            name: name.to_string(),
            from_email: Some("noreply@example.com".to_string()),
            from_name: Some("Example".to_string()),
            subject: Some("Hello".to_string()),
            code: Some(code.to_string()),
            text: Some("plain".to_string()),
            publish: false,
            labels: vec!["onboarding".to_string()],
        }
    }

    #[tokio::test]
    async fn test_add_then_info() {
        let remote = InMemoryTemplates::new();
        remote.add(&payload("welcome", "<p>hi</p>")).await.unwrap();

        let template = remote.info("welcome").await.unwrap();
        assert_eq!(template.code.as_deref(), Some("<p>hi</p>"));
        assert!(template.published_at.is_none());
        assert!(template.has_diff());
    }

    #[tokio::test]
    async fn test_add_duplicate_fails() {
        let remote = InMemoryTemplates::new();
        remote.add(&payload("welcome", "a")).await.unwrap();
        assert!(remote.add(&payload("welcome", "b")).await.is_err());
    }

    #[tokio::test]
    async fn test_update_unknown_template() {
        let remote = InMemoryTemplates::new();
        let err = remote.update(&payload("missing", "a")).await.unwrap_err();
        assert!(err.is_unknown_template());
        assert!(!remote.exists("missing").await.unwrap());
    }

    #[tokio::test]
    async fn test_publish_clears_diff() {
        let remote = InMemoryTemplates::new();
        remote.add(&payload("welcome", "<p>hi</p>")).await.unwrap();

        let published = remote.publish("welcome").await.unwrap();
        assert!(!published.has_diff());
        assert_eq!(published.publish_code.as_deref(), Some("<p>hi</p>"));

        remote.update(&payload("welcome", "<p>hello</p>")).await.unwrap();
        assert!(remote.info("welcome").await.unwrap().has_diff());
    }

    #[tokio::test]
    async fn test_list_by_label() {
        let remote = InMemoryTemplates::new();
        remote.add(&payload("welcome", "a")).await.unwrap();
        let mut other = payload("invoice", "b");
        other.labels = vec!["billing".to_string()];
        remote.add(&other).await.unwrap();

        assert_eq!(remote.list(None).await.unwrap().len(), 2);
        let billing = remote.list(Some("billing")).await.unwrap();
        assert_eq!(billing.len(), 1);
        assert_eq!(billing[0].slug, "invoice");
    }

    #[tokio::test]
    async fn test_render_merge_tags() {
        let remote = InMemoryTemplates::new();
        remote
            .add(&payload("welcome", "<p>Hi *|FNAME|*</p>"))
            .await
            .unwrap();

        let rendered = remote
            .render("welcome", &[], &[MergeVar::new("fname", "Ada")])
            .await
            .unwrap();
        assert_eq!(rendered.html, "<p>Hi Ada</p>");
    }
}
