//! On-disk template store
//!
//! One directory per template under the templates root:
//!
//! ```text
//! <root>/<slug>/metadata.yml
//! <root>/<slug>/code.html
//! <root>/<slug>/text.txt
//! ```

use std::path::{Path, PathBuf};

use tokio::fs;
use tracing::{debug, info, warn};

use crate::error::{Result, TemplateError};
use crate::templates::types::{LocalTemplate, TemplateMetadata};

pub const METADATA_FILE: &str = "metadata.yml";
pub const CODE_FILE: &str = "code.html";
pub const TEXT_FILE: &str = "text.txt";

const TEMPLATE_FILES: [&str; 3] = [METADATA_FILE, CODE_FILE, TEXT_FILE];

/// Reads and writes template directories under a root path
#[derive(Debug, Clone)]
pub struct TemplateStore {
    root: PathBuf,
}

impl TemplateStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path of a template directory. The slug is not checked; file
    /// operations validate it first.
    pub fn template_dir(&self, slug: &str) -> PathBuf {
        self.root.join(slug)
    }

    /// Template directory for a slug that names exactly one directory
    /// under the root
    fn checked_dir(&self, slug: &str) -> Result<PathBuf> {
        let unsafe_slug = slug.is_empty()
            || slug == "."
            || slug == ".."
            || slug.contains(|c: char| c == '/' || c == '\\');
        if unsafe_slug {
            return Err(TemplateError::UnsafeSlug(slug.to_string()));
        }
        Ok(self.template_dir(slug))
    }

    /// Whether a directory (complete or not) exists for the slug
    pub async fn contains(&self, slug: &str) -> Result<bool> {
        let dir = self.checked_dir(slug)?;
        Ok(fs::try_exists(dir).await?)
    }

    /// A template is available when all three files exist
    pub async fn is_available(&self, slug: &str) -> bool {
        let Ok(dir) = self.checked_dir(slug) else {
            return false;
        };

        for file in TEMPLATE_FILES {
            match fs::metadata(dir.join(file)).await {
                Ok(meta) if meta.is_file() => {}
                _ => return false,
            }
        }
        true
    }

    /// Load a template, failing if any file is missing
    pub async fn load(&self, slug: &str) -> Result<LocalTemplate> {
        let dir = self.checked_dir(slug)?;
        if !self.is_available(slug).await {
            return Err(TemplateError::TemplateNotFound(slug.to_string()));
        }

        let metadata_yaml = fs::read_to_string(dir.join(METADATA_FILE)).await?;
        let metadata: TemplateMetadata = serde_yaml::from_str(&metadata_yaml)?;

        if metadata.slug != slug {
            return Err(TemplateError::SlugMismatch {
                expected: slug.to_string(),
                found: metadata.slug,
            });
        }

        let code = fs::read_to_string(dir.join(CODE_FILE)).await?;
        let text = fs::read_to_string(dir.join(TEXT_FILE)).await?;

        Ok(LocalTemplate {
            metadata,
            code,
            text,
        })
    }

    /// Write all three files, replacing existing content
    pub async fn save(&self, template: &LocalTemplate) -> Result<PathBuf> {
        let dir = self.checked_dir(template.slug())?;
        fs::create_dir_all(&dir).await?;

        let metadata_yaml = serde_yaml::to_string(&template.metadata)?;
        fs::write(dir.join(METADATA_FILE), metadata_yaml).await?;
        fs::write(dir.join(CODE_FILE), &template.code).await?;
        fs::write(dir.join(TEXT_FILE), &template.text).await?;

        info!("Saved template {} to {}", template.slug(), dir.display());
        Ok(dir)
    }

    /// Directory names under the root, sorted
    pub async fn list_slugs(&self) -> Result<Vec<String>> {
        if !fs::try_exists(&self.root).await? {
            debug!("Templates directory {} does not exist", self.root.display());
            return Ok(Vec::new());
        }

        let mut slugs = Vec::new();
        let mut entries = fs::read_dir(&self.root).await?;
        while let Some(entry) = entries.next_entry().await? {
            if entry.file_type().await?.is_dir() {
                slugs.push(entry.file_name().to_string_lossy().to_string());
            }
        }

        slugs.sort();
        Ok(slugs)
    }

    /// Load every readable template, optionally restricted to a label
    pub async fn collect(&self, label: Option<&str>) -> Result<Vec<LocalTemplate>> {
        let mut templates = Vec::new();

        for slug in self.list_slugs().await? {
            match self.load(&slug).await {
                Ok(template) => {
                    if label.map_or(true, |l| template.has_label(l)) {
                        templates.push(template);
                    }
                }
                Err(e) => warn!("Skipping local template {}: {}", slug, e),
            }
        }

        Ok(templates)
    }

    /// Remove a template directory
    pub async fn delete(&self, slug: &str) -> Result<()> {
        let dir = self.checked_dir(slug)?;
        if !self.is_available(slug).await {
            return Err(TemplateError::TemplateNotFound(slug.to_string()));
        }

        fs::remove_dir_all(dir).await?;
        info!("Deleted local template {}", slug);
        Ok(())
    }
}
