//! Preview report for local templates
//!
//! Writes one PNG per available template plus a `report.html` index that
//! shows slug, name, sender, subject and the preview side by side.

use std::path::{Path, PathBuf};

use askama::Template;
use tokio::fs;
use tracing::{info, warn};

use crate::error::{Result, TemplateError};
use crate::templates::{LocalTemplate, TemplateStore};

pub mod preview;

pub use preview::{PreviewRenderer, WkhtmltoimageRenderer};

pub const INDEX_FILE: &str = "report.html";

#[derive(Template)]
#[template(
    ext = "html",
    source = r#"<html>
<head><style>
  body {font-family: Arial, Helvetica, sans-serif;}
  table {border-spacing: 0; border-collapse: collapse; }
  th, td { padding: 10px; vertical-align: top; border: 1px solid #D0D7E1; }
  th { background-color: #D0D7E1; }
</style></head>
<body><table>
<tr>
  <th>ID/Slug</th>
  <th>Name</th>
  <th>From</th>
  <th>Subject</th>
  <th>Template</th>
</tr>
{% for row in rows %}
<tr>
  <td>{{ row.slug }}</td>
  <td>{{ row.name }}</td>
  <td>{{ row.from }}</td>
  <td>{{ row.subject }}</td>
  <td><img src="{{ row.slug }}.png"></td>
</tr>
{% endfor %}
</table></body></html>
"#
)]
struct ReportIndex {
    rows: Vec<ReportRow>,
}

struct ReportRow {
    slug: String,
    name: String,
    from: String,
    subject: String,
}

impl From<&LocalTemplate> for ReportRow {
    fn from(template: &LocalTemplate) -> Self {
        Self {
            slug: template.slug().to_string(),
            name: template.metadata.name.clone().unwrap_or_default(),
            from: template.from_line(),
            subject: template.metadata.subject.clone().unwrap_or_default(),
        }
    }
}

/// What a report run produced
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReportSummary {
    /// Slugs with a generated preview image
    pub previewed: Vec<String>,
    /// Template directories missing one of the required files
    pub missing: Vec<String>,
    pub index_path: PathBuf,
}

/// Builds the preview report
pub struct ReportGenerator<P: PreviewRenderer> {
    renderer: P,
    output_dir: PathBuf,
}

impl<P: PreviewRenderer> ReportGenerator<P> {
    pub fn new(renderer: P, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            renderer,
            output_dir: output_dir.into(),
        }
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    pub async fn generate(&self, store: &TemplateStore) -> Result<ReportSummary> {
        fs::create_dir_all(&self.output_dir).await?;

        let mut summary = ReportSummary::default();

        for slug in store.list_slugs().await? {
            let template = match store.load(&slug).await {
                Ok(template) => template,
                Err(e) => {
                    warn!("Template data not found for '{}': {}", slug, e);
                    summary.missing.push(slug);
                    continue;
                }
            };

            let image = self.output_dir.join(format!("{}.png", slug));
            self.renderer.render_png(&template.code, &image).await?;
            info!("Preview for template '{}' generated", slug);
            summary.previewed.push(slug);
        }

        let templates = store.collect(None).await?;
        let index = ReportIndex {
            rows: templates.iter().map(ReportRow::from).collect(),
        }
        .render()
        .map_err(|e| TemplateError::Report(e.to_string()))?;

        summary.index_path = self.output_dir.join(INDEX_FILE);
        fs::write(&summary.index_path, index).await?;
        info!("Report written to {}", summary.index_path.display());

        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use tempfile::TempDir;

    /// Writes the HTML itself instead of an image
    struct EchoRenderer;

    #[async_trait]
    impl PreviewRenderer for EchoRenderer {
        async fn render_png(&self, html: &str, output: &Path) -> Result<()> {
            fs::write(output, html).await?;
            Ok(())
        }
    }

    fn template(slug: &str, name: &str) -> LocalTemplate {
        let mut template = LocalTemplate::skeleton(slug);
        template.metadata.name = Some(name.to_string());
        template.metadata.from_name = Some("Shop".to_string());
        template.metadata.from_email = Some("shop@example.com".to_string());
        template.metadata.subject = Some("Your order".to_string());
        template.code = format!("<p>{}</p>", slug);
        template
    }

    #[tokio::test]
    async fn test_generate_report() {
        let temp_dir = TempDir::new().unwrap();
        let store = TemplateStore::new(temp_dir.path().join("templates"));
        store.save(&template("welcome", "Welcome")).await.unwrap();
        store.save(&template("receipt", "Fish & Chips")).await.unwrap();
        std::fs::create_dir_all(store.template_dir("broken")).unwrap();

        let generator = ReportGenerator::new(EchoRenderer, temp_dir.path().join("report"));
        let summary = generator.generate(&store).await.unwrap();

        assert_eq!(summary.previewed, vec!["receipt", "welcome"]);
        assert_eq!(summary.missing, vec!["broken"]);

        let preview = std::fs::read_to_string(generator.output_dir().join("welcome.png")).unwrap();
        assert_eq!(preview, "<p>welcome</p>");

        let index = std::fs::read_to_string(&summary.index_path).unwrap();
        assert!(index.contains("<img src=\"welcome.png\">"));
        assert!(index.contains("Fish &amp; Chips"));
        assert!(index.contains("Shop &lt;shop@example.com&gt;"));
        assert!(!index.contains("broken"));
    }

    #[tokio::test]
    async fn test_mismatched_metadata_is_reported_missing() {
        let temp_dir = TempDir::new().unwrap();
        let store = TemplateStore::new(temp_dir.path().join("templates"));
        store.save(&template("welcome", "Welcome")).await.unwrap();
        store.save(&template("invoice", "Invoice")).await.unwrap();
        std::fs::rename(store.template_dir("invoice"), store.template_dir("copied")).unwrap();

        let generator = ReportGenerator::new(EchoRenderer, temp_dir.path().join("report"));
        let summary = generator.generate(&store).await.unwrap();

        assert_eq!(summary.previewed, vec!["welcome"]);
        assert_eq!(summary.missing, vec!["copied"]);
        assert!(!generator.output_dir().join("copied.png").exists());
    }

    #[tokio::test]
    async fn test_empty_store_writes_index() {
        let temp_dir = TempDir::new().unwrap();
        let store = TemplateStore::new(temp_dir.path().join("templates"));
        let generator = ReportGenerator::new(EchoRenderer, temp_dir.path().join("report"));

        let summary = generator.generate(&store).await.unwrap();
        assert!(summary.previewed.is_empty());
        assert!(summary.index_path.exists());
    }
}
