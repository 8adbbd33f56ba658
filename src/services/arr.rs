// src/services/arr.rs

//! Arr HTTP API client.
//!
//! The pipeline only needs two capabilities from the server: fetch one page
//! of a listing endpoint and submit a command. They sit behind [`ArrApi`] so
//! the selection logic can run against canned pages in tests.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use reqwest::header::{ACCEPT, HeaderMap, HeaderName, HeaderValue};
use serde::Deserialize;
use serde_json::Value;

use crate::error::{AppError, Result};
use crate::models::Command;

const FETCH_CONTEXT: &str = "API request";
const COMMAND_CONTEXT: &str = "Command";

/// HTTP client settings.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// User-Agent header for HTTP requests
    pub user_agent: String,
    /// Per-call deadline in seconds
    pub timeout_secs: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            user_agent: concat!("foundarr/", env!("CARGO_PKG_VERSION")).to_string(),
            timeout_secs: 30,
        }
    }
}

/// Server acknowledgement of a queued command.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct CommandStatus {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub status: Option<String>,
}

/// Capabilities the selection pipeline needs from an Arr server.
#[async_trait]
pub trait ArrApi: Send + Sync {
    /// GET `{api_base}/{path}` with query parameters, decoded as JSON.
    async fn get_json(&self, path: &str, query: &[(String, String)]) -> Result<Value>;

    /// POST a command to `{api_base}/command`.
    async fn post_command(&self, command: &Command) -> Result<CommandStatus>;
}

/// reqwest-backed [`ArrApi`] implementation.
#[derive(Debug, Clone)]
pub struct ArrClient {
    client: Client,
    api_base: String,
}

impl ArrClient {
    /// Create a client authenticated with `api_key`.
    pub fn new(api_base: impl Into<String>, api_key: &str, config: &ClientConfig) -> Result<Self> {
        let mut headers = HeaderMap::new();
        let key = HeaderValue::from_str(api_key)
            .map_err(|_| AppError::config("API key contains characters not allowed in a header"))?;
        headers.insert(HeaderName::from_static("x-api-key"), key);
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let client = Client::builder()
            .user_agent(&config.user_agent)
            .timeout(Duration::from_secs(config.timeout_secs))
            .default_headers(headers)
            .build()?;

        Ok(Self {
            client,
            api_base: api_base.into(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.api_base, path)
    }

    async fn decode<T: serde::de::DeserializeOwned>(
        context: &'static str,
        response: reqwest::Response,
    ) -> Result<T> {
        let status = response.status();
        if !status.is_success() {
            return Err(AppError::status(
                context,
                status.as_u16(),
                response.url().as_str(),
            ));
        }
        response
            .json()
            .await
            .map_err(|e| AppError::request(context, e))
    }
}

#[async_trait]
impl ArrApi for ArrClient {
    async fn get_json(&self, path: &str, query: &[(String, String)]) -> Result<Value> {
        let response = self
            .client
            .get(self.url(path))
            .query(query)
            .send()
            .await
            .map_err(|e| AppError::request(FETCH_CONTEXT, e))?;
        Self::decode(FETCH_CONTEXT, response).await
    }

    async fn post_command(&self, command: &Command) -> Result<CommandStatus> {
        let response = self
            .client
            .post(self.url("command"))
            .json(command)
            .send()
            .await
            .map_err(|e| AppError::request(COMMAND_CONTEXT, e))?;
        Self::decode(COMMAND_CONTEXT, response).await
    }
}
