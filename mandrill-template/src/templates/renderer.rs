//! Local template rendering with Handlebars
//!
//! Merge vars become the render context: `{{name}}` is HTML-escaped,
//! `{{{name}}}` is inserted raw, unknown names render as empty strings and
//! block helpers (`{{#if}}`, `{{#each}}`, ...) behave as in Handlebars.

use std::collections::HashMap;
use std::path::Path;

use handlebars::Handlebars;
use serde_json::Value;

use crate::error::{Result, TemplateError};
use crate::mandrill::MergeVar;

/// Renders template bodies against merge vars
pub struct TemplateRenderer {
    handlebars: Handlebars<'static>,
}

impl TemplateRenderer {
    pub fn new() -> Self {
        Self {
            handlebars: Handlebars::new(),
        }
    }

    /// Render a template string with the given variables
    pub fn render_string(
        &self,
        template_str: &str,
        vars: &HashMap<String, Value>,
    ) -> Result<String> {
        self.handlebars
            .render_template(template_str, vars)
            .map_err(|e| TemplateError::Render(e.to_string()))
    }
}

impl Default for TemplateRenderer {
    fn default() -> Self {
        Self::new()
    }
}

/// Flatten Mandrill-style `[{name, content}]` merge vars into a render
/// context. Later entries win over earlier ones with the same name.
pub fn localize_merge_vars(merge_vars: &[MergeVar]) -> HashMap<String, Value> {
    merge_vars
        .iter()
        .map(|var| (var.name.clone(), var.content.clone()))
        .collect()
}

/// Read merge vars from a JSON file holding an array of `{name, content}`
pub async fn load_merge_vars(path: &Path) -> Result<Vec<MergeVar>> {
    let content = tokio::fs::read_to_string(path).await?;
    Ok(serde_json::from_str(&content)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn vars(pairs: &[(&str, Value)]) -> HashMap<String, Value> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    fn render(template: &str, context: &HashMap<String, Value>) -> String {
        TemplateRenderer::new().render_string(template, context).unwrap()
    }

    #[test]
    fn test_render_basic_variables() {
        let rendered = render(
            "Hello {{name}} from {{company}}!",
            &vars(&[("name", json!("John Doe")), ("company", json!("Acme Inc"))]),
        );

        assert_eq!(rendered, "Hello John Doe from Acme Inc!");
    }

    #[test]
    fn test_render_escapes_double_stash() {
        let rendered = render("<p>{{body}}</p>", &vars(&[("body", json!("a < b & c"))]));
        assert_eq!(rendered, "<p>a &lt; b &amp; c</p>");
    }

    #[test]
    fn test_render_triple_stash_is_raw() {
        let rendered = render("<p>{{{body}}}</p>", &vars(&[("body", json!("<b>x</b>"))]));
        assert_eq!(rendered, "<p><b>x</b></p>");
    }

    #[test]
    fn test_unknown_variable_renders_empty() {
        assert_eq!(render("Hi {{missing}}!", &HashMap::new()), "Hi !");
    }

    #[test]
    fn test_if_else_block() {
        let template = "{{#if vip}}GOLD{{else}}BASIC{{/if}}";

        assert_eq!(render(template, &vars(&[("vip", json!(""))])), "BASIC");
        assert_eq!(render(template, &vars(&[("vip", json!("yes"))])), "GOLD");
        assert_eq!(render(template, &HashMap::new()), "BASIC");
    }

    #[test]
    fn test_each_over_structured_merge_var() {
        let rendered = render(
            "{{#each items}}<li>{{this}}</li>{{/each}}",
            &vars(&[("items", json!(["tea", "scones"]))]),
        );
        assert_eq!(rendered, "<li>tea</li><li>scones</li>");
    }

    #[test]
    fn test_malformed_template_is_an_error() {
        let result =
            TemplateRenderer::new().render_string("{{{a}} {{b}}", &vars(&[("b", json!("X"))]));
        assert!(matches!(result, Err(TemplateError::Render(_))));

        let result = TemplateRenderer::new().render_string("{{#if a}}open", &HashMap::new());
        assert!(matches!(result, Err(TemplateError::Render(_))));
    }

    #[test]
    fn test_localize_merge_vars() {
        let merge_vars = vec![
            MergeVar::new("fname", "Ada"),
            MergeVar::new("count", 3),
            MergeVar::new("fname", "Grace"),
        ];

        let map = localize_merge_vars(&merge_vars);
        assert_eq!(map.get("fname"), Some(&json!("Grace")));
        assert_eq!(render("{{count}}", &map), "3");
    }

    #[tokio::test]
    async fn test_load_merge_vars() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("params.json");
        std::fs::write(&path, r#"[{"name": "fname", "content": "Ada"}]"#).unwrap();

        let merge_vars = load_merge_vars(&path).await.unwrap();
        assert_eq!(merge_vars, vec![MergeVar::new("fname", "Ada")]);
    }
}
