//! Mandrill HTTP client
//!
//! Every call is a JSON `POST` to `{api_url}/templates/{call}.json` with the
//! API key in the body.

use std::time::Duration;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, warn};

use super::types::{
    ApiErrorBody, MergeVar, RemoteTemplate, RenderedTemplate, TemplateContent, TemplatePayload,
};
use super::RemoteTemplates;
use crate::config::MandrillConfig;
use crate::error::{Result, TemplateError};

const USER_AGENT: &str = concat!("mandrill-template/", env!("CARGO_PKG_VERSION"));

/// Client for the Mandrill templates API
#[derive(Debug, Clone)]
pub struct MandrillClient {
    api_key: String,
    base_url: String,
    client: reqwest::Client,
}

/// Request body: the API key plus call parameters
#[derive(Debug, Serialize)]
struct KeyedRequest<'a, T: Serialize> {
    key: &'a str,
    #[serde(flatten)]
    params: T,
}

#[derive(Debug, Serialize)]
struct NameParams<'a> {
    name: &'a str,
}

#[derive(Debug, Serialize)]
struct ListParams<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    label: Option<&'a str>,
}

#[derive(Debug, Serialize)]
struct RenderParams<'a> {
    template_name: &'a str,
    template_content: &'a [TemplateContent],
    merge_vars: &'a [MergeVar],
}

impl MandrillClient {
    pub fn new(api_key: String, base_url: String) -> Result<Self> {
        Self::with_timeout(api_key, base_url, Duration::from_secs(30))
    }

    pub fn with_timeout(api_key: String, base_url: String, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()?;

        Ok(Self {
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    /// Build a client from validated configuration
    pub fn from_config(config: &MandrillConfig) -> Result<Self> {
        let api_key = config
            .api_key
            .clone()
            .ok_or_else(|| TemplateError::Config("No Mandrill API key configured".to_string()))?;

        Self::with_timeout(
            api_key,
            config.api_url.clone(),
            Duration::from_secs(config.timeout_secs),
        )
    }

    async fn call<P, R>(&self, method: &str, params: P) -> Result<R>
    where
        P: Serialize + Send,
        R: DeserializeOwned,
    {
        let url = format!("{}/templates/{}.json", self.base_url, method);
        debug!(url = %url, "calling Mandrill");

        let request = KeyedRequest {
            key: &self.api_key,
            params,
        };

        let response = self.client.post(&url).json(&request).send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            warn!("Mandrill {} failed with status {}: {}", method, status, error_text);
            return Err(Self::map_error(status, &error_text));
        }

        Ok(response.json().await?)
    }

    fn map_error(status: reqwest::StatusCode, body: &str) -> TemplateError {
        match serde_json::from_str::<ApiErrorBody>(body) {
            Ok(err) => match err.name.as_str() {
                "Unknown_Template" => TemplateError::UnknownTemplate(err.message),
                "Invalid_Key" => TemplateError::InvalidKey(err.message),
                _ => TemplateError::Api {
                    name: err.name,
                    message: err.message,
                },
            },
            Err(_) => TemplateError::Api {
                name: status.to_string(),
                message: body.to_string(),
            },
        }
    }
}

#[async_trait]
impl RemoteTemplates for MandrillClient {
    async fn list(&self, label: Option<&str>) -> Result<Vec<RemoteTemplate>> {
        self.call("list", ListParams { label }).await
    }

    async fn info(&self, slug: &str) -> Result<RemoteTemplate> {
        self.call("info", NameParams { name: slug }).await
    }

    async fn add(&self, payload: &TemplatePayload) -> Result<RemoteTemplate> {
        self.call("add", payload).await
    }

    async fn update(&self, payload: &TemplatePayload) -> Result<RemoteTemplate> {
        self.call("update", payload).await
    }

    async fn delete(&self, slug: &str) -> Result<RemoteTemplate> {
        self.call("delete", NameParams { name: slug }).await
    }

    async fn publish(&self, slug: &str) -> Result<RemoteTemplate> {
        self.call("publish", NameParams { name: slug }).await
    }

    async fn render(
        &self,
        slug: &str,
        template_content: &[TemplateContent],
        merge_vars: &[MergeVar],
    ) -> Result<RenderedTemplate> {
        self.call(
            "render",
            RenderParams {
                template_name: slug,
                template_content,
                merge_vars,
            },
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trailing_slash_trimmed() {
        let client =
            MandrillClient::new("key".to_string(), "http://localhost:1234/api/1.0/".to_string())
                .unwrap();
        assert_eq!(client.base_url, "http://localhost:1234/api/1.0");
    }

    #[test]
    fn test_map_unknown_template() {
        let body = r#"{"status":"error","code":5,"name":"Unknown_Template","message":"No such template \"foo\""}"#;
        let err = MandrillClient::map_error(reqwest::StatusCode::INTERNAL_SERVER_ERROR, body);
        assert!(err.is_unknown_template());
    }

    #[test]
    fn test_map_invalid_key() {
        let body = r#"{"status":"error","code":-1,"name":"Invalid_Key","message":"Invalid API key"}"#;
        let err = MandrillClient::map_error(reqwest::StatusCode::INTERNAL_SERVER_ERROR, body);
        assert!(matches!(err, TemplateError::InvalidKey(_)));
    }

    #[test]
    fn test_map_unparseable_body() {
        let err = MandrillClient::map_error(reqwest::StatusCode::BAD_GATEWAY, "upstream down");
        match err {
            TemplateError::Api { name, message } => {
                assert!(name.contains("502"));
                assert_eq!(message, "upstream down");
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }
}
