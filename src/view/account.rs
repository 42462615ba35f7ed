//! Login, registration and logout pages.

use crate::error::MagicSearchError;
use crate::queries::account::{Registration, EMAIL_ISSUE, USERNAME_ISSUE};
use crate::MagicSearchClient;

use super::Notice;

pub struct AccountController<'a> {
    client: &'a MagicSearchClient,
}

impl<'a> AccountController<'a> {
    pub fn new(client: &'a MagicSearchClient) -> Self {
        Self { client }
    }

    pub fn login(&self, username: &str, password: &str, remember: bool) -> Notice {
        match self.client.account().login(username, password, remember) {
            Ok(user) => Notice::Info(format!("Login successful! Welcome {}", user.username)),
            Err(e @ MagicSearchError::RequestFailed { .. }) => Notice::Error(format!(
                "Login failed: {}",
                e.detail().unwrap_or("unknown error")
            )),
            Err(e) => {
                tracing::warn!(error = %e, "login request failed");
                Notice::Error("Connection error.".into())
            }
        }
    }

    pub fn register(&self, form: &Registration) -> Notice {
        match self.client.account().register(form) {
            Ok(()) => Notice::Info("Registration successful!".into()),
            Err(MagicSearchError::InvalidArgument(msg)) => Notice::Warning(msg),
            Err(e @ MagicSearchError::RequestFailed { .. }) => match e.detail() {
                Some(USERNAME_ISSUE) => {
                    Notice::Error("This username is invalid or already taken.".into())
                }
                Some(EMAIL_ISSUE) => Notice::Error("This email is already used.".into()),
                Some(other) => Notice::Error(format!("Error: {other}")),
                None => Notice::Error("Error: registration failed".into()),
            },
            Err(e) => {
                tracing::warn!(error = %e, "registration request failed");
                Notice::Error("Connection error.".into())
            }
        }
    }

    pub fn logout(&self) -> Notice {
        match self.client.account().logout() {
            Ok(()) => Notice::Info("Logged out.".into()),
            Err(e) => Notice::Error(format!("Failed to clear the stored session: {e}")),
        }
    }
}
