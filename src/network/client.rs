//! HTTP client for making requests to upstream sources

use super::user_agent::{accept_html, accept_json, UserAgentPool};
use crate::config::OutgoingSettings;
use reqwest::{Client, Response};
use std::time::Duration;
use tracing::debug;

/// Used when the configured request timeout is not a valid duration
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// HTTP client wrapper with ingestion-specific configuration
#[derive(Clone)]
pub struct HttpClient {
    client: Client,
    default_timeout: Duration,
    user_agents: UserAgentPool,
}

impl HttpClient {
    /// Create a new HTTP client with default settings
    pub fn new() -> reqwest::Result<Self> {
        Self::with_settings(&OutgoingSettings::default())
    }

    /// Create a new HTTP client with custom settings
    pub fn with_settings(settings: &OutgoingSettings) -> reqwest::Result<Self> {
        let timeout =
            Duration::try_from_secs_f64(settings.request_timeout).unwrap_or(DEFAULT_TIMEOUT);
        let mut builder = Client::builder()
            .timeout(timeout)
            .gzip(true)
            .brotli(true);

        if !settings.verify_ssl {
            builder = builder.danger_accept_invalid_certs(true);
        }

        let user_agents = UserAgentPool::new(settings.user_agents.clone());
        if user_agents.is_empty() {
            debug!("No user agents configured, using the built-in one");
        }

        Ok(Self {
            client: builder.build()?,
            default_timeout: timeout,
            user_agents,
        })
    }

    /// GET expecting a JSON body
    pub async fn get_json(
        &self,
        url: &str,
        params: &[(&str, String)],
        timeout: Option<Duration>,
    ) -> reqwest::Result<HttpResponse> {
        self.get(url, params, accept_json(), timeout).await
    }

    /// GET expecting an HTML body
    pub async fn get_html(
        &self,
        url: &str,
        params: &[(&str, String)],
        timeout: Option<Duration>,
    ) -> reqwest::Result<HttpResponse> {
        self.get(url, params, accept_html(), timeout).await
    }

    async fn get(
        &self,
        url: &str,
        params: &[(&str, String)],
        accept: &str,
        timeout: Option<Duration>,
    ) -> reqwest::Result<HttpResponse> {
        let mut req_builder = self
            .client
            .get(url)
            .timeout(timeout.unwrap_or(self.default_timeout))
            .header("User-Agent", self.user_agents.pick())
            .header("Accept", accept)
            .header("Accept-Language", "en-US,en;q=0.9");

        if !params.is_empty() {
            req_builder = req_builder.query(params);
        }

        let response = req_builder.send().await?;
        HttpResponse::read(response).await
    }
}

/// Response from an upstream request
#[derive(Debug)]
pub struct HttpResponse {
    /// HTTP status code
    pub status: u16,
    /// Response body as text
    pub text: String,
    /// Response URL (after redirects)
    pub url: String,
}

impl HttpResponse {
    async fn read(response: Response) -> reqwest::Result<Self> {
        let status = response.status().as_u16();
        let url = response.url().to_string();
        let text = response.text().await?;
        Ok(Self { status, text, url })
    }

    /// Parse response as JSON
    pub fn json<T: serde::de::DeserializeOwned>(&self) -> serde_json::Result<T> {
        serde_json::from_str(&self.text)
    }

    /// Check if response is successful (2xx)
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{header_exists, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_client_creation() {
        let client = HttpClient::new();
        assert!(client.is_ok());
    }

    #[tokio::test]
    async fn test_get_json_sends_params_and_user_agent() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/search"))
            .and(query_param("q", "acme"))
            .and(header_exists("user-agent"))
            .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"ok":true}"#))
            .mount(&server)
            .await;

        let client = HttpClient::new().unwrap();
        let response = client
            .get_json(
                &format!("{}/search", server.uri()),
                &[("q", "acme".to_string())],
                None,
            )
            .await
            .unwrap();

        assert!(response.is_success());
        let body: serde_json::Value = response.json().unwrap();
        assert_eq!(body["ok"], true);
    }
}
