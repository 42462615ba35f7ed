//! Blocking HTTP transport for the MagicSearch API.
//!
//! One request per call: no retries, no caching, no backoff. Non-2xx
//! responses collapse into [`MagicSearchError::RequestFailed`], carrying the
//! server's `detail`/`message`/`error` text when the body has one.

use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::{Method, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use url::Url;

use crate::error::{MagicSearchError, Result};

/// Thin wrapper around a `reqwest` blocking client bound to one API base URL.
pub struct ApiTransport {
    base_url: Url,
    client: Client,
}

impl ApiTransport {
    /// Create a transport for `base_url` with the given request timeout.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        // `Url::join` drops the last path segment unless it ends in '/'.
        let mut normalized = base_url.trim().to_string();
        if !normalized.ends_with('/') {
            normalized.push('/');
        }
        let base_url = Url::parse(&normalized)?;
        let client = Client::builder()
            .timeout(timeout)
            .redirect(reqwest::redirect::Policy::limited(10))
            .build()?;
        Ok(Self { base_url, client })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Resolve an endpoint path against the base URL.
    pub fn url(&self, path: &str) -> Result<Url> {
        Ok(self.base_url.join(path.trim_start_matches('/'))?)
    }

    /// Perform one request and return the status with the parsed body.
    ///
    /// Never fails on HTTP status; an empty body parses as `Value::Null`.
    pub fn exchange<B: Serialize + ?Sized>(
        &self,
        method: Method,
        path: &str,
        token: Option<&str>,
        query: &[(&str, String)],
        body: Option<&B>,
    ) -> Result<(StatusCode, Value)> {
        let url = self.url(path)?;
        tracing::debug!(%method, path, authenticated = token.is_some(), "api request");

        let mut req = self.client.request(method, url);
        if !query.is_empty() {
            req = req.query(query);
        }
        if let Some(token) = token {
            req = req.bearer_auth(token);
        }
        if let Some(body) = body {
            req = req.json(body);
        }

        let resp = req.send()?;
        let status = resp.status();
        let text = resp.text()?;
        let value = if text.trim().is_empty() {
            Value::Null
        } else {
            // A non-JSON error page is kept as a plain string detail.
            serde_json::from_str(&text).unwrap_or(Value::String(text))
        };
        tracing::debug!(status = status.as_u16(), path, "api response");
        Ok((status, value))
    }

    /// Perform one request and decode a 2xx body into `T`.
    pub fn send<B, T>(
        &self,
        method: Method,
        path: &str,
        token: Option<&str>,
        query: &[(&str, String)],
        body: Option<&B>,
    ) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let (status, value) = self.exchange(method, path, token, query, body)?;
        if !status.is_success() {
            return Err(MagicSearchError::RequestFailed {
                status: Some(status.as_u16()),
                detail: error_detail(&value),
            });
        }
        Ok(serde_json::from_value(value)?)
    }

    pub fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        token: Option<&str>,
        query: &[(&str, String)],
    ) -> Result<T> {
        self.send::<Value, T>(Method::GET, path, token, query, None)
    }

    pub fn post<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        token: Option<&str>,
        body: &B,
    ) -> Result<T> {
        self.send(Method::POST, path, token, &[], Some(body))
    }

    pub fn delete<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        token: Option<&str>,
        body: &B,
    ) -> Result<T> {
        self.send(Method::DELETE, path, token, &[], Some(body))
    }
}

/// Pull a human-readable detail out of an error body.
pub fn error_detail(body: &Value) -> Option<String> {
    match body {
        Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
        Value::Object(map) => ["detail", "message", "error"]
            .iter()
            .filter_map(|key| map.get(*key))
            .find(|v| !v.is_null())
            .map(|v| match v {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            }),
        _ => None,
    }
}
