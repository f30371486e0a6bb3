//! mandrill-template: keep Mandrill email templates in version control
//!
//! Templates live on disk as one directory per slug
//! (`metadata.yml`, `code.html`, `text.txt`) and are synchronized with the
//! Mandrill templates API.
//!
//! # Features
//!
//! - **Export**: pull remote drafts into local directories
//! - **Upload**: push local templates as drafts, optionally publishing them
//! - **Environments**: `dev-`/`qa-` slug prefixes keep non-production
//!   templates apart in a single Mandrill account
//! - **List**: remote and local templates, flagging unpublished draft changes
//! - **Render**: preview a template with sample merge vars, remotely or locally
//! - **Report**: PNG previews and an HTML index of all local templates
//!
//! # Example
//!
//! ```no_run
//! use mandrill_template::env::AppEnv;
//! use mandrill_template::mandrill::MandrillClient;
//! use mandrill_template::report::{ReportGenerator, WkhtmltoimageRenderer};
//! use mandrill_template::sync::TemplateSync;
//! use mandrill_template::templates::TemplateStore;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = MandrillClient::new(
//!         "api-key".to_string(),
//!         "https://mandrillapp.com/api/1.0".to_string(),
//!     )?;
//!     let report = ReportGenerator::new(WkhtmltoimageRenderer::default(), "report");
//!     let sync = TemplateSync::new(client, TemplateStore::new("templates"), AppEnv::Qa, report);
//!
//!     sync.export("welcome").await?;
//!     sync.upload("welcome", false).await?;
//!
//!     Ok(())
//! }
//! ```
//!
//! # Modules
//!
//! - [`config`]: Configuration management
//! - [`error`]: Error types and handling
//! - [`env`]: Environment slug prefixes
//! - [`mandrill`]: Remote template API
//! - [`templates`]: Local template store and rendering
//! - [`report`]: Preview report
//! - [`sync`]: Commands reconciling remote and local templates

pub mod config;
pub mod env;
pub mod error;
pub mod mandrill;
pub mod output;
pub mod report;
pub mod sync;
pub mod templates;

// Re-export commonly used types
pub use config::Config;
pub use env::AppEnv;
pub use error::{Result, TemplateError};
pub use sync::TemplateSync;
