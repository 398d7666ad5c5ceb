// HTTP/JSON implementation of the backend gateway

use crate::config::GatewayConfig;
use crate::error::{GatewayError, Result};
use crate::traits::BackendGateway;
use async_trait::async_trait;
use lexis_types::{ChatReply, HealthStatus, ModelStatus};
use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;

const HEALTH_PATH: &str = "/api/health";
const MODEL_STATUS_PATH: &str = "/api/models/status";
const CHAT_PATH: &str = "/api/chat";
const CLEAR_PATH: &str = "/api/conversation/clear";

/// Gateway speaking to the backend over HTTP (reqwest, rustls)
///
/// Timeouts are per call: health and model-status requests use the short
/// health timeout, chat and clear use the request timeout.
#[derive(Debug, Clone)]
pub struct HttpGateway {
    http_client: reqwest::Client,
    base_url: String,
    health_timeout: Duration,
    request_timeout: Duration,
}

#[derive(Serialize)]
struct ChatBody<'a> {
    message: &'a str,
}

impl HttpGateway {
    /// Gateway for `base_url` with default timeouts
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        Self::builder().base_url(base_url).build()
    }

    pub fn from_config(config: &GatewayConfig) -> Result<Self> {
        Self::builder()
            .base_url(config.base_url.clone())
            .health_timeout(config.health_timeout())
            .request_timeout(config.request_timeout())
            .build()
    }

    pub fn builder() -> HttpGatewayBuilder {
        HttpGatewayBuilder::default()
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str, timeout: Duration) -> Result<T> {
        let url = self.url(path);
        tracing::debug!("GET {}", url);

        let response = self.http_client.get(&url).timeout(timeout).send().await?;
        let response = Self::check_status(response).await?;
        Ok(response.json().await?)
    }

    async fn post(&self, path: &str, body: Option<&ChatBody<'_>>) -> Result<reqwest::Response> {
        let url = self.url(path);
        tracing::debug!("POST {}", url);

        let mut request = self.http_client.post(&url).timeout(self.request_timeout);
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await?;
        Self::check_status(response).await
    }

    async fn check_status(response: reqwest::Response) -> Result<reqwest::Response> {
        if response.status().is_success() {
            return Ok(response);
        }

        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        tracing::debug!("Backend responded {}: {}", status, body);

        Err(GatewayError::Status {
            status: status.as_u16(),
            body,
        })
    }
}

#[async_trait]
impl BackendGateway for HttpGateway {
    async fn get_health(&self) -> Result<HealthStatus> {
        self.get_json(HEALTH_PATH, self.health_timeout).await
    }

    async fn get_model_status(&self) -> Result<ModelStatus> {
        self.get_json(MODEL_STATUS_PATH, self.health_timeout).await
    }

    async fn send_message(&self, text: &str) -> Result<ChatReply> {
        let response = self.post(CHAT_PATH, Some(&ChatBody { message: text })).await?;
        Ok(response.json().await?)
    }

    async fn clear_conversation(&self) -> Result<()> {
        self.post(CLEAR_PATH, None).await?;
        Ok(())
    }
}

/// Builder for HttpGateway
#[derive(Default)]
pub struct HttpGatewayBuilder {
    base_url: Option<String>,
    health_timeout: Option<Duration>,
    request_timeout: Option<Duration>,
}

impl HttpGatewayBuilder {
    /// Backend origin, e.g. "http://localhost:5000"
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    pub fn health_timeout(mut self, timeout: Duration) -> Self {
        self.health_timeout = Some(timeout);
        self
    }

    pub fn request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = Some(timeout);
        self
    }

    pub fn build(self) -> Result<HttpGateway> {
        let defaults = GatewayConfig::default();

        let base_url = self
            .base_url
            .ok_or_else(|| GatewayError::Config("Base URL is required".to_string()))?;
        let base_url = base_url.trim().trim_end_matches('/').to_string();
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            return Err(GatewayError::Config(format!(
                "Base URL must be http(s): {:?}",
                base_url
            )));
        }

        let health_timeout = self.health_timeout.unwrap_or(defaults.health_timeout());
        let request_timeout = self.request_timeout.unwrap_or(defaults.request_timeout());
        if health_timeout.is_zero() || request_timeout.is_zero() {
            return Err(GatewayError::Config("Timeouts must be non-zero".to_string()));
        }

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let http_client = reqwest::Client::builder()
            .default_headers(headers)
            .build()
            .map_err(|e| GatewayError::Config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(HttpGateway {
            http_client,
            base_url,
            health_timeout,
            request_timeout,
        })
    }
}
