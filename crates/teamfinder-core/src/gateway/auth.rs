//! Authentication side of the gateway.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// The authenticated subject. Its `id` is also the id of the owned profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub id: String,
    #[serde(default)]
    pub email: Option<String>,
}

impl Identity {
    pub fn new(id: impl Into<String>, email: Option<String>) -> Self {
        Self {
            id: id.into(),
            email,
        }
    }
}

/// A signed-in session as issued by the auth service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthSession {
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
    #[serde(default)]
    pub expires_at: Option<DateTime<Utc>>,
    pub user: Identity,
}

impl AuthSession {
    /// True once `expires_at` has passed. Sessions without expiry never expire.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.is_some_and(|expires_at| expires_at <= now)
    }

    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Utc::now())
    }
}

/// Authentication operations of the remote gateway.
#[async_trait]
pub trait AuthGateway: Send + Sync {
    /// Creates a new identity.
    ///
    /// # Returns
    ///
    /// - `Ok(Identity)`: The created identity
    /// - `Err(TeamfinderError::Gateway)`: Rejected (e.g. already registered), message verbatim
    async fn sign_up(&self, email: &str, password: &str) -> Result<Identity>;

    /// Signs in with email and password and keeps the session for later calls.
    async fn sign_in(&self, email: &str, password: &str) -> Result<AuthSession>;

    /// Ends the current session. Signing out without a session is not an error.
    async fn sign_out(&self) -> Result<()>;

    /// Returns the identity of the current session, if any.
    async fn current_user(&self) -> Result<Option<Identity>>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn session(expires_at: Option<DateTime<Utc>>) -> AuthSession {
        AuthSession {
            access_token: "token".to_string(),
            refresh_token: None,
            expires_at,
            user: Identity::new("u1", Some("ada@example.com".to_string())),
        }
    }

    #[test]
    fn test_expiry() {
        let now = Utc::now();
        assert!(!session(None).is_expired_at(now));
        assert!(!session(Some(now + Duration::seconds(60))).is_expired_at(now));
        assert!(session(Some(now - Duration::seconds(1))).is_expired_at(now));
    }
}
