//! Error types for mandrill-template

use thiserror::Error;

/// Result type alias for template operations
pub type Result<T> = std::result::Result<T, TemplateError>;

#[derive(Error, Debug)]
pub enum TemplateError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Error payload returned by the Mandrill API
    #[error("Mandrill API error ({name}): {message}")]
    Api { name: String, message: String },

    #[error("No such template \"{0}\"")]
    UnknownTemplate(String),

    #[error("Invalid API key: {0}")]
    InvalidKey(String),

    #[error("Template data not found {0}. Please generate first.")]
    TemplateNotFound(String),

    #[error("metadata.yml slug \"{found}\" does not match directory \"{expected}\"")]
    SlugMismatch { expected: String, found: String },

    #[error("Template already exists: {0}")]
    AlreadyExists(String),

    #[error("Invalid template name {0}. You cannot create environment templates directly. Use --env instead.")]
    InvalidSlug(String),

    #[error("Invalid template slug {0:?}: must be a single directory name")]
    UnsafeSlug(String),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Template rendering failed: {0}")]
    Render(String),

    #[error("Preview rendering failed: {0}")]
    Preview(String),

    #[error("Report error: {0}")]
    Report(String),
}

impl TemplateError {
    /// True when the remote side reported that the template does not exist
    pub fn is_unknown_template(&self) -> bool {
        matches!(self, TemplateError::UnknownTemplate(_))
    }
}
