//! Local template types and data structures

use serde::{Deserialize, Serialize};

use crate::mandrill::{RemoteTemplate, TemplatePayload};

/// Contents of `metadata.yml`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemplateMetadata {
    /// Display name
    pub name: Option<String>,
    /// Logical slug, always equal to the template directory name
    pub slug: String,
    #[serde(default)]
    pub labels: Vec<String>,
    pub subject: Option<String>,
    pub from_email: Option<String>,
    pub from_name: Option<String>,
}

/// A template as kept on disk: metadata plus HTML and text bodies
#[derive(Debug, Clone, PartialEq)]
pub struct LocalTemplate {
    pub metadata: TemplateMetadata,
    /// Body of `code.html`
    pub code: String,
    /// Body of `text.txt`
    pub text: String,
}

impl LocalTemplate {
    /// Map a remote draft onto the local representation, stored under the
    /// logical slug.
    pub fn from_remote(remote: &RemoteTemplate, logical_slug: &str) -> Self {
        Self {
            metadata: TemplateMetadata {
                name: remote.name.clone(),
                slug: logical_slug.to_string(),
                labels: remote.labels.clone(),
                subject: remote.subject.clone(),
                from_email: remote.from_email.clone(),
                from_name: remote.from_name.clone(),
            },
            code: remote.code.clone().unwrap_or_default(),
            text: remote.text.clone().unwrap_or_default(),
        }
    }

    /// Empty template for `generate`
    pub fn skeleton(slug: &str) -> Self {
        Self {
            metadata: TemplateMetadata {
                name: Some(slug.to_string()),
                slug: slug.to_string(),
                labels: Vec::new(),
                subject: Some(String::new()),
                from_email: Some(String::new()),
                from_name: Some(String::new()),
            },
            code: String::new(),
            text: String::new(),
        }
    }

    /// Build the add/update parameters. Mandrill identifies templates by
    /// name, so the physical slug is sent as the name.
    pub fn to_payload(&self, physical_slug: &str, publish: bool) -> TemplatePayload {
        TemplatePayload {
            name: physical_slug.to_string(),
            from_email: self.metadata.from_email.clone(),
            from_name: self.metadata.from_name.clone(),
            subject: self.metadata.subject.clone(),
            code: Some(self.code.clone()),
            text: Some(self.text.clone()),
            publish,
            labels: self.metadata.labels.clone(),
        }
    }

    pub fn slug(&self) -> &str {
        &self.metadata.slug
    }

    pub fn has_label(&self, label: &str) -> bool {
        self.metadata.labels.iter().any(|l| l == label)
    }

    /// "Name <email>" sender line used in reports
    pub fn from_line(&self) -> String {
        let name = self.metadata.from_name.as_deref().unwrap_or_default();
        match self.metadata.from_email.as_deref().filter(|e| !e.is_empty()) {
            Some(email) if !name.is_empty() => format!("{} <{}>", name, email),
            Some(email) => email.to_string(),
            None => name.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn remote() -> RemoteTemplate {
        RemoteTemplate {
            slug: "qa-welcome".to_string(),
            name: Some("Welcome".to_string()),
            labels: vec!["onboarding".to_string()],
            code: Some("<p>Hi *|FNAME|*</p>".to_string()),
            subject: Some("Welcome aboard".to_string()),
            from_email: Some("hello@example.com".to_string()),
            from_name: Some("Example".to_string()),
            text: Some("Hi *|FNAME|*".to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_from_remote_uses_logical_slug() {
        let local = LocalTemplate::from_remote(&remote(), "welcome");
        assert_eq!(local.slug(), "welcome");
        assert_eq!(local.metadata.name.as_deref(), Some("Welcome"));
        assert_eq!(local.code, "<p>Hi *|FNAME|*</p>");
        assert!(local.has_label("onboarding"));
    }

    #[test]
    fn test_payload_round_trip_fields() {
        let source = remote();
        let payload = LocalTemplate::from_remote(&source, "welcome").to_payload("qa-welcome", false);

        assert_eq!(payload.name, "qa-welcome");
        assert_eq!(payload.subject, source.subject);
        assert_eq!(payload.from_email, source.from_email);
        assert_eq!(payload.from_name, source.from_name);
        assert_eq!(payload.labels, source.labels);
        assert_eq!(payload.code, source.code);
        assert_eq!(payload.text, source.text);
        assert!(!payload.publish);
    }

    #[test]
    fn test_skeleton() {
        let template = LocalTemplate::skeleton("invoice");
        assert_eq!(template.metadata.name.as_deref(), Some("invoice"));
        assert!(template.metadata.labels.is_empty());
        assert!(template.code.is_empty());
    }

    #[test]
    fn test_from_line() {
        let local = LocalTemplate::from_remote(&remote(), "welcome");
        assert_eq!(local.from_line(), "Example <hello@example.com>");
        assert_eq!(LocalTemplate::skeleton("x").from_line(), "");
    }

    #[test]
    fn test_metadata_yaml_layout() {
        let local = LocalTemplate::from_remote(&remote(), "welcome");
        let yaml = serde_yaml::to_string(&local.metadata).unwrap();
        let keys: Vec<&str> = yaml
            .lines()
            .filter(|l| !l.starts_with(' ') && !l.starts_with('-'))
            .filter_map(|l| l.split(':').next())
            .collect();
        assert_eq!(
            keys,
            vec!["name", "slug", "labels", "subject", "from_email", "from_name"]
        );
    }
}
