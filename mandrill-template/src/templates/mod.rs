//! Local email templates
//!
//! On-disk storage of templates, one directory per slug, and local
//! rendering with merge variables.

pub mod renderer;
pub mod store;
pub mod types;

pub use renderer::{load_merge_vars, localize_merge_vars, TemplateRenderer};
pub use store::TemplateStore;
pub use types::{LocalTemplate, TemplateMetadata};
