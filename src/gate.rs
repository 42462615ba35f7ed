//! The single authorization gate every user-scoped call passes through.
//!
//! Query methods that mutate server state, or read per-user data, take an
//! [`Authorized`] argument. The only way to obtain one is
//! [`AuthGate::authorize`], which checks the session *before* any request is
//! built.

use crate::error::{MagicSearchError, Result};
use crate::session::{Session, SessionManager, SessionState};

/// Proof that a valid session existed when the gate was passed.
#[derive(Debug, Clone)]
pub struct Authorized {
    session: Session,
    token: String,
}

impl Authorized {
    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn token(&self) -> &str {
        &self.token
    }

    pub fn user_id(&self) -> Option<i64> {
        self.session.subject_id
    }
}

/// Borrowing gate over a [`SessionManager`].
pub struct AuthGate<'a> {
    sessions: &'a SessionManager,
}

impl<'a> AuthGate<'a> {
    pub fn new(sessions: &'a SessionManager) -> Self {
        Self { sessions }
    }

    /// Resolve the session and hand out a capability, or refuse uniformly.
    pub fn authorize(&self) -> Result<Authorized> {
        match self.sessions.resolve() {
            SessionState::Valid(session) => {
                // Storage could have been cleared between resolve and read.
                let token = self.sessions.token().ok_or(MagicSearchError::NotAuthorized(
                    crate::error::AuthAbsence::Missing,
                ))?;
                Ok(Authorized { session, token })
            }
            other => {
                let reason = other
                    .absence()
                    .unwrap_or(crate::error::AuthAbsence::Missing);
                tracing::debug!(%reason, "authorization gate refused");
                Err(MagicSearchError::NotAuthorized(reason))
            }
        }
    }

    /// Like [`authorize`](Self::authorize) but without the error.
    pub fn try_authorize(&self) -> Option<Authorized> {
        self.authorize().ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{AuthAbsence, FailureKind};
    use crate::storage::{CredentialStore, StorageScope};
    use base64::engine::general_purpose::URL_SAFE_NO_PAD;
    use base64::Engine;

    fn token(payload: &str) -> String {
        format!("h.{}.s", URL_SAFE_NO_PAD.encode(payload))
    }

    #[test]
    fn gate_refuses_without_session() {
        let manager = SessionManager::new(CredentialStore::in_memory());
        let err = AuthGate::new(&manager).authorize().unwrap_err();
        assert_eq!(err.kind(), FailureKind::AuthorizationAbsent);
        assert!(matches!(
            err,
            MagicSearchError::NotAuthorized(AuthAbsence::Missing)
        ));
    }

    #[test]
    fn gate_reports_malformed_credentials() {
        let manager = SessionManager::new(CredentialStore::in_memory());
        manager.store_token(StorageScope::Tab, "garbage").unwrap();
        let err = AuthGate::new(&manager).authorize().unwrap_err();
        assert!(matches!(
            err,
            MagicSearchError::NotAuthorized(AuthAbsence::Malformed)
        ));
    }

    #[test]
    fn gate_hands_out_token_and_identity() {
        let manager = SessionManager::new(CredentialStore::in_memory());
        let tok = token(r#"{"user_id":5,"username":"teferi"}"#);
        manager.store_token(StorageScope::Persistent, &tok).unwrap();

        let auth = AuthGate::new(&manager).authorize().unwrap();
        assert_eq!(auth.token(), tok);
        assert_eq!(auth.user_id(), Some(5));
        assert_eq!(auth.session().username, "teferi");
    }
}
