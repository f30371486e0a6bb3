//! Wire types for the Mandrill templates API

use serde::{Deserialize, Serialize};

/// A template as stored by Mandrill, draft and published fields side by side
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RemoteTemplate {
    pub slug: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub labels: Vec<String>,
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub subject: Option<String>,
    #[serde(default)]
    pub from_email: Option<String>,
    #[serde(default)]
    pub from_name: Option<String>,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub publish_name: Option<String>,
    #[serde(default)]
    pub publish_code: Option<String>,
    #[serde(default)]
    pub publish_subject: Option<String>,
    #[serde(default)]
    pub publish_from_email: Option<String>,
    #[serde(default)]
    pub publish_from_name: Option<String>,
    #[serde(default)]
    pub publish_text: Option<String>,
    #[serde(default)]
    pub published_at: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
    #[serde(default)]
    pub draft_updated_at: Option<String>,
}

impl RemoteTemplate {
    /// True when the draft differs from the published version, or the
    /// template has never been published.
    pub fn has_diff(&self) -> bool {
        let tracked = [
            (&self.name, &self.publish_name),
            (&self.code, &self.publish_code),
            (&self.text, &self.publish_text),
            (&self.subject, &self.publish_subject),
        ];

        tracked.iter().any(|(draft, published)| draft != published) || self.published_at.is_none()
    }
}

/// Parameters of `templates/add` and `templates/update`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemplatePayload {
    /// Template name; Mandrill derives the slug from it
    pub name: String,
    pub from_email: Option<String>,
    pub from_name: Option<String>,
    pub subject: Option<String>,
    pub code: Option<String>,
    pub text: Option<String>,
    pub publish: bool,
    pub labels: Vec<String>,
}

/// Merge variable passed to `templates/render`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MergeVar {
    pub name: String,
    #[serde(default)]
    pub content: serde_json::Value,
}

impl MergeVar {
    pub fn new(name: impl Into<String>, content: impl Into<serde_json::Value>) -> Self {
        Self {
            name: name.into(),
            content: content.into(),
        }
    }
}

/// Editable region content passed to `templates/render`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemplateContent {
    pub name: String,
    pub content: String,
}

/// Result of `templates/render`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderedTemplate {
    pub html: String,
}

/// Error body returned with non-2xx responses
#[derive(Debug, Clone, Deserialize)]
pub struct ApiErrorBody {
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub code: i64,
    pub name: String,
    #[serde(default)]
    pub message: String,
}
