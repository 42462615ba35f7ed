use std::fmt;

#[derive(Debug, thiserror::Error)]
pub enum MagicSearchError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),

    #[error("Not authorized: {0}")]
    NotAuthorized(AuthAbsence),

    #[error("Request failed ({}): {}", status_label(.status), .detail.as_deref().unwrap_or("no detail"))]
    RequestFailed {
        status: Option<u16>,
        detail: Option<String>,
    },

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

/// Why the authorization gate refused a call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthAbsence {
    Missing,
    Expired,
    Malformed,
}

impl fmt::Display for AuthAbsence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuthAbsence::Missing => f.write_str("no session"),
            AuthAbsence::Expired => f.write_str("session expired"),
            AuthAbsence::Malformed => f.write_str("stored credential is unreadable"),
        }
    }
}

/// The two failure classes visible at the UI boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    AuthorizationAbsent,
    RequestFailed,
}

impl MagicSearchError {
    /// Flatten any error into one of the two UI-level failure classes.
    ///
    /// Transport, decode and IO errors are all reported as request failures.
    pub fn kind(&self) -> FailureKind {
        match self {
            MagicSearchError::NotAuthorized(_) => FailureKind::AuthorizationAbsent,
            _ => FailureKind::RequestFailed,
        }
    }

    /// Server-provided detail text, when the failure carried one.
    pub fn detail(&self) -> Option<&str> {
        match self {
            MagicSearchError::RequestFailed { detail, .. } => detail.as_deref(),
            _ => None,
        }
    }

    /// True when the server detail mentions `needle`.
    pub fn detail_contains(&self, needle: &str) -> bool {
        self.detail().is_some_and(|d| d.contains(needle))
    }
}

fn status_label(status: &Option<u16>) -> String {
    match status {
        Some(code) => format!("HTTP {code}"),
        None => "no status".to_string(),
    }
}

pub type Result<T> = std::result::Result<T, MagicSearchError>;
