//! Login, registration and logout.
//!
//! Login sends the lowercase hex SHA-256 of the password, never the password
//! itself. Registration sends the plain password over TLS; the server hashes
//! it on its side. Both run client-side checks first so obviously invalid
//! input never reaches the network.

use reqwest::Method;
use sha2::{Digest, Sha256};

use crate::config::endpoints;
use crate::error::{MagicSearchError, Result};
use crate::models::{LoginRequest, LoginResponse, RegisterRequest, RegisterResponse, User};
use crate::storage::StorageScope;
use crate::transport::error_detail;
use crate::MagicSearchClient;

pub const MIN_PASSWORD_LEN: usize = 8;
pub const USERNAME_LEN: std::ops::RangeInclusive<usize> = 3..=20;

/// Server error code for a rejected or taken username.
pub const USERNAME_ISSUE: &str = "USERNAME ISSUE";
/// Server error code for an email already in use.
pub const EMAIL_ISSUE: &str = "EMAIL ISSUE";

/// Hex-encoded SHA-256 digest of `password`.
pub fn hash_password(password: &str) -> String {
    hex::encode(Sha256::digest(password.as_bytes()))
}

// ---------------------------------------------------------------------------
// Registration
// ---------------------------------------------------------------------------

/// Registration form contents.
#[derive(Debug, Clone, Default)]
pub struct Registration {
    pub username: String,
    pub email: String,
    pub password: String,
    pub accepted_terms: bool,
}

impl Registration {
    /// Check the form before sending it. Returns the message to show on failure.
    pub fn validate(&self) -> std::result::Result<(), String> {
        if !self.accepted_terms {
            return Err("You must agree to the terms and conditions.".into());
        }
        validate_username(&self.username)?;
        if !self.email.contains('@') {
            return Err("Please enter a valid email address.".into());
        }
        validate_password(&self.password)
    }
}

pub fn validate_password(password: &str) -> std::result::Result<(), String> {
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(format!(
            "Password must be at least {MIN_PASSWORD_LEN} characters long."
        ));
    }
    let upper = password.chars().any(|c| c.is_ascii_uppercase());
    let lower = password.chars().any(|c| c.is_ascii_lowercase());
    let digit = password.chars().any(|c| c.is_ascii_digit());
    if !(upper && lower && digit) {
        return Err("Password must contain uppercase, lowercase letters, and numbers.".into());
    }
    Ok(())
}

/// Usernames are 3-20 characters of letters, digits, `-`, `_` or `.`,
/// starting with a letter.
pub fn validate_username(username: &str) -> std::result::Result<(), String> {
    let username = username.trim();
    if username.is_empty() {
        return Err("The username cannot be empty".into());
    }
    if !USERNAME_LEN.contains(&username.chars().count()) {
        return Err("The username must have between 3 and 20 characters".into());
    }
    if let Some(bad) = username
        .chars()
        .find(|c| !(c.is_alphanumeric() || matches!(c, '-' | '_' | '.')))
    {
        return Err(format!(
            "Unauthorized character: '{bad}' (only letters, numbers and '-', '_', '.')"
        ));
    }
    if !username.chars().next().is_some_and(char::is_alphabetic) {
        return Err("The username has to begin with a letter".into());
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// AccountQuery
// ---------------------------------------------------------------------------

pub struct AccountQuery<'a> {
    client: &'a MagicSearchClient,
}

impl<'a> AccountQuery<'a> {
    pub fn new(client: &'a MagicSearchClient) -> Self {
        Self { client }
    }

    /// Log in and store the issued token.
    ///
    /// With `remember` the token goes to the persistent scope, otherwise to
    /// the process-scoped one. Login succeeds only when the response carries
    /// a `user`; the HTTP status alone is not trusted.
    pub fn login(&self, username: &str, password: &str, remember: bool) -> Result<User> {
        let body = LoginRequest {
            username: username.trim().to_string(),
            password_hash: hash_password(password),
        };
        let (status, value) = self.client.transport().exchange(
            Method::POST,
            endpoints::LOGIN,
            None,
            &[],
            Some(&body),
        )?;

        let resp: LoginResponse = serde_json::from_value(value.clone()).unwrap_or_default();
        match (resp.user, resp.access_token) {
            (Some(user), Some(token)) if status.is_success() => {
                let scope = if remember {
                    StorageScope::Persistent
                } else {
                    StorageScope::Tab
                };
                self.client.sessions().store_token(scope, &token)?;
                tracing::info!(username = %user.username, ?scope, "logged in");
                Ok(user)
            }
            _ => Err(MagicSearchError::RequestFailed {
                status: Some(status.as_u16()),
                detail: resp.message.or_else(|| error_detail(&value)),
            }),
        }
    }

    /// Create an account.
    ///
    /// Client-side validation failures come back as `InvalidArgument`.
    /// Server rejections carry the server's `error` code (`USERNAME ISSUE`,
    /// `EMAIL ISSUE`) as detail when present, else its message.
    pub fn register(&self, form: &Registration) -> Result<()> {
        form.validate().map_err(MagicSearchError::InvalidArgument)?;

        let body = RegisterRequest {
            username: form.username.trim().to_string(),
            email: form.email.trim().to_string(),
            password: form.password.clone(),
        };
        let (status, value) = self.client.transport().exchange(
            Method::POST,
            endpoints::REGISTER,
            None,
            &[],
            Some(&body),
        )?;
        if status.is_success() {
            tracing::info!(username = %body.username, "registered");
            return Ok(());
        }

        let resp: RegisterResponse = serde_json::from_value(value.clone()).unwrap_or_default();
        Err(MagicSearchError::RequestFailed {
            status: Some(status.as_u16()),
            detail: resp
                .error
                .or(resp.message)
                .or_else(|| error_detail(&value)),
        })
    }

    /// Forget the stored token in both scopes.
    pub fn logout(&self) -> Result<()> {
        self.client.sessions().clear_session()
    }
}
