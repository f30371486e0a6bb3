//! Configuration for mandrill-template
//!
//! Settings come from an optional TOML file, overridden by environment
//! variables prefixed with `MANDRILL_TEMPLATE_` (nested keys separated by
//! `__`, e.g. `MANDRILL_TEMPLATE_STORAGE__TEMPLATES_DIR`). The API key can
//! also be given through the conventional `MANDRILL_APIKEY` variable.
//!
//! ```toml
//! [mandrill]
//! api_key = "xxxxxxxxxxxxxxxxxxxxxx"
//!
//! [storage]
//! templates_dir = "templates"
//!
//! [report]
//! output_dir = "report"
//! wkhtmltoimage = "/usr/local/bin/wkhtmltoimage"
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{Result, TemplateError};

/// Default config file looked up in the working directory
pub const DEFAULT_CONFIG_FILE: &str = "mandrill_template.toml";

/// Legacy environment variable holding the API key
pub const APIKEY_ENV: &str = "MANDRILL_APIKEY";

const ENV_PREFIX: &str = "MANDRILL_TEMPLATE";

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub mandrill: MandrillConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub report: ReportConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct MandrillConfig {
    pub api_key: Option<String>,
    #[serde(default = "default_api_url")]
    pub api_url: String,
    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StorageConfig {
    #[serde(default = "default_templates_dir")]
    pub templates_dir: PathBuf,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ReportConfig {
    #[serde(default = "default_report_dir")]
    pub output_dir: PathBuf,
    /// Executable used to turn template HTML into PNG previews
    #[serde(default = "default_wkhtmltoimage")]
    pub wkhtmltoimage: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
}

fn default_api_url() -> String {
    "https://mandrillapp.com/api/1.0".to_string()
}

fn default_timeout() -> u64 {
    30
}

fn default_templates_dir() -> PathBuf {
    PathBuf::from("templates")
}

fn default_report_dir() -> PathBuf {
    PathBuf::from("report")
}

fn default_wkhtmltoimage() -> String {
    "wkhtmltoimage".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for MandrillConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            api_url: default_api_url(),
            timeout_secs: default_timeout(),
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            templates_dir: default_templates_dir(),
        }
    }
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            output_dir: default_report_dir(),
            wkhtmltoimage: default_wkhtmltoimage(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

impl Config {
    /// Load configuration from an optional TOML file plus the environment
    pub fn from_file(path: &Path) -> Result<Self> {
        let settings = config::Config::builder()
            .add_source(config::File::from(path).required(false))
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()
            .map_err(|e| TemplateError::Config(format!("Failed to load config: {}", e)))?;

        let mut config: Config = settings
            .try_deserialize()
            .map_err(|e| TemplateError::Config(format!("Failed to parse config: {}", e)))?;

        if config.mandrill.api_key.is_none() {
            config.mandrill.api_key = std::env::var(APIKEY_ENV).ok().filter(|k| !k.is_empty());
        }

        Ok(config)
    }

    /// Check the settings needed to talk to the Mandrill API
    pub fn validate(&self) -> Result<()> {
        if self.mandrill.api_key.as_deref().map_or(true, str::is_empty) {
            return Err(TemplateError::Config(format!(
                "No Mandrill API key configured. Set {} or mandrill.api_key",
                APIKEY_ENV
            )));
        }

        url::Url::parse(&self.mandrill.api_url).map_err(|e| {
            TemplateError::Config(format!(
                "Invalid API URL '{}': {}",
                self.mandrill.api_url, e
            ))
        })?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.mandrill.api_url, "https://mandrillapp.com/api/1.0");
        assert_eq!(config.mandrill.timeout_secs, 30);
        assert_eq!(config.storage.templates_dir, PathBuf::from("templates"));
        assert_eq!(config.report.output_dir, PathBuf::from("report"));
        assert_eq!(config.report.wkhtmltoimage, "wkhtmltoimage");
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_validate_requires_key() {
        let config = Config::default();
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.mandrill.api_key = Some("abc".to_string());
        assert!(config.validate().is_ok());

        config.mandrill.api_url = "not a url".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_parse_config_file() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            r#"
[mandrill]
api_key = "secret"

[storage]
templates_dir = "mail/templates"
"#
        )
        .unwrap();

        let config = Config::from_file(file.path()).unwrap();
        assert_eq!(config.mandrill.api_key.as_deref(), Some("secret"));
        assert_eq!(config.mandrill.api_url, "https://mandrillapp.com/api/1.0");
        assert_eq!(config.storage.templates_dir, PathBuf::from("mail/templates"));
        assert_eq!(config.report.output_dir, PathBuf::from("report"));
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::from_file(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(config.storage.templates_dir, PathBuf::from("templates"));
    }
}
