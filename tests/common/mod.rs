//! Shared fixtures for the MagicSearch client integration tests.
//!
//! Provides `TestServer`, a wiremock server driven from a private Tokio
//! runtime so the blocking client can be called directly from the test
//! thread, plus helpers for building signed-looking tokens and clients.

#![allow(dead_code)]

use std::time::{SystemTime, UNIX_EPOCH};

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use magicsearch_client::{MagicSearchClient, StorageScope};
use serde_json::{json, Value};
use wiremock::{Mock, MockServer, Request};

/// A mock API server plus the runtime it lives on.
///
/// Field order matters: the server must be dropped (and its expectations
/// verified) before the runtime shuts down.
pub struct TestServer {
    server: MockServer,
    runtime: tokio::runtime::Runtime,
}

impl TestServer {
    pub fn start() -> Self {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(1)
            .enable_all()
            .build()
            .unwrap();
        let server = runtime.block_on(MockServer::start());
        Self { server, runtime }
    }

    pub fn uri(&self) -> String {
        self.server.uri()
    }

    pub fn mount(&self, mock: Mock) {
        self.runtime.block_on(mock.mount(&self.server));
    }

    /// Every request the server saw, in arrival order.
    pub fn requests(&self) -> Vec<Request> {
        self.runtime
            .block_on(self.server.received_requests())
            .unwrap_or_default()
    }

    /// Requests whose path is exactly `path`.
    pub fn requests_to(&self, path: &str) -> Vec<Request> {
        self.requests()
            .into_iter()
            .filter(|r| r.url.path() == path)
            .collect()
    }

    /// An anonymous client against this server, with in-memory token storage.
    pub fn client(&self) -> MagicSearchClient {
        MagicSearchClient::builder()
            .base_url(self.uri())
            .ephemeral(true)
            .build()
            .unwrap()
    }

    /// A client already holding a valid token for `username` / `user_id`.
    pub fn logged_in_client(&self, username: &str, user_id: i64) -> MagicSearchClient {
        let client = self.client();
        client
            .sessions()
            .store_token(StorageScope::Tab, &valid_token(username, user_id))
            .unwrap();
        client
    }
}

/// Build a `header.payload.signature` token around `claims`.
pub fn make_token(claims: &Value) -> String {
    let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"HS256","typ":"JWT"}"#);
    let payload = URL_SAFE_NO_PAD.encode(serde_json::to_vec(claims).unwrap());
    format!("{header}.{payload}.c2lnbmF0dXJl")
}

pub fn now_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_secs()
}

/// A token for `username` that expires an hour from now.
pub fn valid_token(username: &str, user_id: i64) -> String {
    make_token(&json!({
        "username": username,
        "user_id": user_id,
        "exp": now_secs() + 3600,
    }))
}

/// A token for `username` that expired an hour ago.
pub fn expired_token(username: &str) -> String {
    make_token(&json!({
        "username": username,
        "user_id": 1,
        "exp": now_secs() - 3600,
    }))
}

/// Parse a recorded request body as JSON.
pub fn body_of(request: &Request) -> Value {
    serde_json::from_slice(&request.body).unwrap()
}

/// The `Authorization` header of a recorded request, if any.
pub fn bearer_of(request: &Request) -> Option<String> {
    request
        .headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
}
