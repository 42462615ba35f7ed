//! Session resolution from a stored bearer credential.
//!
//! The token is a three-part signed structure (`header.payload.signature`).
//! Only the payload is decoded, and the signature is **not** verified: the
//! result is a display-level identity claim, not an authentication check.
//! The server re-validates the token on every authenticated request.
//!
//! Sessions are never cached. Every call to [`SessionManager::resolve`]
//! re-reads storage and re-decodes the token.

use std::time::{SystemTime, UNIX_EPOCH};

use base64::engine::general_purpose::{STANDARD_NO_PAD, URL_SAFE_NO_PAD};
use base64::Engine;
use serde_json::{Map, Value};

use crate::error::{AuthAbsence, Result};
use crate::storage::{CredentialStore, StorageScope};

// ---------------------------------------------------------------------------
// Session
// ---------------------------------------------------------------------------

/// Identity claim decoded from the stored credential.
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    /// Numeric user id (`user_id` claim, or a numeric `sub`).
    pub subject_id: Option<i64>,
    /// Display name (`username` claim, or a string `sub`).
    pub username: String,
    /// Expiry in seconds since the epoch, when the token carries one.
    pub expiry: Option<f64>,
}

/// Outcome of resolving the stored credential.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionState {
    Valid(Session),
    /// No token in either scope.
    Missing,
    /// The token decoded but its `exp` is in the past. Storage has been cleared.
    Expired,
    /// A token is stored but could not be decoded.
    Malformed,
}

impl SessionState {
    /// Flatten to "session or nothing".
    pub fn into_session(self) -> Option<Session> {
        match self {
            SessionState::Valid(session) => Some(session),
            _ => None,
        }
    }

    /// The reason there is no session, if there is none.
    pub fn absence(&self) -> Option<AuthAbsence> {
        match self {
            SessionState::Valid(_) => None,
            SessionState::Missing => Some(AuthAbsence::Missing),
            SessionState::Expired => Some(AuthAbsence::Expired),
            SessionState::Malformed => Some(AuthAbsence::Malformed),
        }
    }
}

// ---------------------------------------------------------------------------
// Decoding
// ---------------------------------------------------------------------------

#[derive(Debug)]
enum DecodeError {
    Segments(usize),
    Base64(base64::DecodeError),
    Json(serde_json::Error),
    NotAnObject,
}

/// Decode the payload segment of a `header.payload.signature` token.
fn decode_claims(token: &str) -> std::result::Result<Map<String, Value>, DecodeError> {
    let parts: Vec<&str> = token.split('.').collect();
    if parts.len() != 3 {
        return Err(DecodeError::Segments(parts.len()));
    }
    // Tokens are normally URL-safe unpadded, but accept the standard
    // alphabet and stray padding too.
    let payload = parts[1].trim_end_matches('=');
    let bytes = URL_SAFE_NO_PAD
        .decode(payload)
        .or_else(|_| STANDARD_NO_PAD.decode(payload))
        .map_err(DecodeError::Base64)?;
    match serde_json::from_slice(&bytes).map_err(DecodeError::Json)? {
        Value::Object(map) => Ok(map),
        _ => Err(DecodeError::NotAnObject),
    }
}

fn session_from_claims(claims: &Map<String, Value>) -> Session {
    let sub = claims.get("sub");
    let subject_id = claims
        .get("user_id")
        .and_then(as_int)
        .or_else(|| sub.and_then(as_int));
    let username = claims
        .get("username")
        .and_then(Value::as_str)
        .or_else(|| sub.and_then(Value::as_str))
        .unwrap_or_default()
        .to_string();
    let expiry = claims.get("exp").and_then(Value::as_f64);
    Session {
        subject_id,
        username,
        expiry,
    }
}

fn as_int(v: &Value) -> Option<i64> {
    v.as_i64().or_else(|| v.as_str().and_then(|s| s.parse().ok()))
}

fn epoch_seconds(now: SystemTime) -> f64 {
    now.duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs_f64())
        .unwrap_or(0.0)
}

// ---------------------------------------------------------------------------
// SessionManager
// ---------------------------------------------------------------------------

/// Resolves the current identity from the [`CredentialStore`].
pub struct SessionManager {
    store: CredentialStore,
}

impl SessionManager {
    pub fn new(store: CredentialStore) -> Self {
        Self { store }
    }

    /// Resolve the stored credential against the current time.
    pub fn resolve(&self) -> SessionState {
        self.resolve_at(SystemTime::now())
    }

    /// Resolve the stored credential as of `now`.
    ///
    /// An expired token clears both storage scopes as a side effect. A
    /// malformed token is left in place; callers that want to discard it can
    /// call [`clear_session`](Self::clear_session).
    pub fn resolve_at(&self, now: SystemTime) -> SessionState {
        let Some(token) = self.store.read() else {
            return SessionState::Missing;
        };

        let claims = match decode_claims(&token) {
            Ok(claims) => claims,
            Err(e) => {
                tracing::warn!(error = ?e, "stored credential could not be decoded");
                return SessionState::Malformed;
            }
        };

        let session = session_from_claims(&claims);
        if let Some(exp) = session.expiry {
            // exp == 0 means "no expiry"
            if exp > 0.0 && exp < epoch_seconds(now) {
                tracing::debug!(exp, "stored credential expired; clearing");
                if let Err(e) = self.store.clear() {
                    tracing::warn!(error = %e, "failed to clear expired credential");
                }
                return SessionState::Expired;
            }
        }

        SessionState::Valid(session)
    }

    /// The current session, if any. Every kind of absence collapses to `None`.
    pub fn session(&self) -> Option<Session> {
        self.resolve().into_session()
    }

    /// The raw bearer token, but only while it resolves to a valid session.
    pub fn token(&self) -> Option<String> {
        match self.resolve() {
            SessionState::Valid(_) => self.store.read(),
            _ => None,
        }
    }

    /// Store a freshly issued token in `scope`.
    pub fn store_token(&self, scope: StorageScope, token: &str) -> Result<()> {
        self.store.write(scope, token)
    }

    /// Remove the token from both scopes. Safe to call repeatedly.
    pub fn clear_session(&self) -> Result<()> {
        self.store.clear()
    }
}
