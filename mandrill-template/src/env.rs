//! Environment namespacing for remote template slugs
//!
//! Non-production templates live next to production ones in the same
//! Mandrill account and are told apart by a slug prefix. Local files always
//! carry the logical slug; the prefix is only applied on the way to the API.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::TemplateError;

/// Deployment environment selected with `--env`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AppEnv {
    Dev,
    Qa,
    #[default]
    Prod,
}

impl AppEnv {
    pub const ALL: [AppEnv; 3] = [AppEnv::Dev, AppEnv::Qa, AppEnv::Prod];

    /// Slug prefix for this environment
    pub fn prefix(&self) -> &'static str {
        match self {
            AppEnv::Dev => "dev-",
            AppEnv::Qa => "qa-",
            AppEnv::Prod => "",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AppEnv::Dev => "dev",
            AppEnv::Qa => "qa",
            AppEnv::Prod => "prod",
        }
    }
}

impl fmt::Display for AppEnv {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AppEnv {
    type Err = TemplateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "dev" => Ok(AppEnv::Dev),
            "qa" => Ok(AppEnv::Qa),
            "prod" => Ok(AppEnv::Prod),
            other => Err(TemplateError::Config(format!(
                "Unknown environment '{}', expected one of dev, qa, prod",
                other
            ))),
        }
    }
}

/// Turn a logical slug into the physical slug used on the remote side
pub fn add_slug_env_prefix(env: AppEnv, slug: &str) -> String {
    format!("{}{}", env.prefix(), slug)
}

/// True if the slug starts with any non-empty environment prefix
pub fn has_env_prefix(slug: &str) -> bool {
    AppEnv::ALL
        .iter()
        .map(AppEnv::prefix)
        .filter(|p| !p.is_empty())
        .any(|p| slug.starts_with(p))
}

/// Recover the logical slug of a remote template belonging to `env`.
///
/// Returns `None` when the template belongs to another environment. A
/// production template is one without any environment prefix.
pub fn strip_slug_env_prefix(env: AppEnv, slug: &str) -> Option<String> {
    match env {
        AppEnv::Prod => {
            if has_env_prefix(slug) {
                None
            } else {
                Some(slug.to_string())
            }
        }
        _ => slug
            .strip_prefix(env.prefix())
            .filter(|rest| !rest.is_empty())
            .map(str::to_string),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_prefix() {
        assert_eq!(add_slug_env_prefix(AppEnv::Qa, "foo"), "qa-foo");
        assert_eq!(add_slug_env_prefix(AppEnv::Dev, "foo"), "dev-foo");
        assert_eq!(add_slug_env_prefix(AppEnv::Prod, "foo"), "foo");
    }

    #[test]
    fn test_default_is_prod() {
        assert_eq!(AppEnv::default(), AppEnv::Prod);
    }

    #[test]
    fn test_parse_env() {
        assert_eq!("qa".parse::<AppEnv>().unwrap(), AppEnv::Qa);
        assert_eq!("prod".parse::<AppEnv>().unwrap(), AppEnv::Prod);
        assert!("staging".parse::<AppEnv>().is_err());
    }

    #[test]
    fn test_has_env_prefix() {
        assert!(has_env_prefix("dev-welcome"));
        assert!(has_env_prefix("qa-welcome"));
        assert!(!has_env_prefix("welcome"));
        assert!(!has_env_prefix("developer-news"));
    }

    #[test]
    fn test_strip_prefix() {
        assert_eq!(
            strip_slug_env_prefix(AppEnv::Qa, "qa-welcome"),
            Some("welcome".to_string())
        );
        assert_eq!(strip_slug_env_prefix(AppEnv::Qa, "welcome"), None);
        assert_eq!(strip_slug_env_prefix(AppEnv::Qa, "qa-"), None);
        assert_eq!(
            strip_slug_env_prefix(AppEnv::Prod, "welcome"),
            Some("welcome".to_string())
        );
        assert_eq!(strip_slug_env_prefix(AppEnv::Prod, "dev-welcome"), None);
    }
}
