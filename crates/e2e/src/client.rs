//! HTTP client for the studio API

use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use reqwest::{Method, StatusCode};
use serde_json::Value;
use tracing::debug;

use crate::config::HarnessConfig;
use crate::error::{E2eError, E2eResult};
use crate::response::Envelope;

/// A single request against the API, relative to the base URL
#[derive(Debug, Clone)]
pub struct ApiCall {
    pub method: Method,
    pub path: String,
    pub query: Vec<(String, String)>,
    pub body: Option<Value>,
}

impl ApiCall {
    fn new(method: Method, path: impl Into<String>, body: Option<Value>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            body,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path, None)
    }

    pub fn post(path: impl Into<String>, body: Value) -> Self {
        Self::new(Method::POST, path, Some(body))
    }

    pub fn put(path: impl Into<String>, body: Value) -> Self {
        Self::new(Method::PUT, path, Some(body))
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::DELETE, path, None)
    }

    /// Add a query parameter; absent values are left out
    pub fn query(mut self, key: &str, value: Option<&str>) -> Self {
        if let Some(value) = value {
            self.query.push((key.to_string(), value.to_string()));
        }
        self
    }
}

/// Client for the API under test
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    /// Create a client with the configured timeout and JSON headers
    pub fn new(config: &HarnessConfig) -> E2eResult<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let http = reqwest::Client::builder()
            .timeout(config.timeout())
            .default_headers(headers)
            .build()?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// Issue the call and classify the outcome.
    ///
    /// Anything other than a 200 with a JSON body is an error: transport
    /// failures map to [`E2eError::Transport`], other statuses to
    /// [`E2eError::Status`] with the raw body.
    pub async fn send(&self, call: &ApiCall) -> E2eResult<Envelope> {
        let url = self.url(&call.path);
        debug!(method = %call.method, %url, "sending request");

        let mut request = self.http.request(call.method.clone(), &url);
        if !call.query.is_empty() {
            request = request.query(&call.query);
        }
        if let Some(body) = &call.body {
            request = request.json(body);
        }

        let response = request
            .send()
            .await
            .map_err(|e| E2eError::Transport(e.to_string()))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| E2eError::Transport(e.to_string()))?;

        if status != StatusCode::OK {
            return Err(E2eError::Status {
                status: status.as_u16(),
                body: text,
            });
        }

        let body: Value = serde_json::from_str(&text).map_err(|_| E2eError::Shape {
            expected: "JSON body".to_string(),
            body: text.clone(),
        })?;
        Ok(Envelope::new(body))
    }
}
