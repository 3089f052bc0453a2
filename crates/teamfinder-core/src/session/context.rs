//! Session context: the identity the current session acts for.

use crate::error::{Result, TeamfinderError};
use crate::gateway::{AuthGateway, Identity};

/// The signed-in identity of one session.
///
/// Initialised on mount by asking the auth gateway for the current user and
/// cleared on sign-out.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionContext {
    identity: Option<Identity>,
}

impl SessionContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queries the gateway for the current identity and stores the answer.
    pub async fn init<A>(&mut self, auth: &A) -> Result<Option<&Identity>>
    where
        A: AuthGateway + ?Sized,
    {
        self.identity = auth.current_user().await?;
        if let Some(identity) = &self.identity {
            tracing::debug!(user_id = %identity.id, "Session restored");
        }
        Ok(self.identity.as_ref())
    }

    /// Signs out on the gateway and clears the stored identity.
    ///
    /// The identity is cleared even when the gateway call fails.
    pub async fn teardown<A>(&mut self, auth: &A) -> Result<()>
    where
        A: AuthGateway + ?Sized,
    {
        let result = auth.sign_out().await;
        self.clear();
        result
    }

    pub fn set(&mut self, identity: Identity) {
        self.identity = Some(identity);
    }

    pub fn clear(&mut self) {
        self.identity = None;
    }

    pub fn identity(&self) -> Option<&Identity> {
        self.identity.as_ref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.identity.is_some()
    }

    /// The current identity, or `NotAuthenticated`.
    pub fn require(&self) -> Result<&Identity> {
        self.identity.as_ref().ok_or(TeamfinderError::NotAuthenticated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::AuthSession;
    use async_trait::async_trait;

    struct FixedAuth {
        user: Option<Identity>,
        fail_sign_out: bool,
    }

    #[async_trait]
    impl AuthGateway for FixedAuth {
        async fn sign_up(&self, _email: &str, _password: &str) -> Result<Identity> {
            Err(TeamfinderError::gateway("unsupported"))
        }

        async fn sign_in(&self, _email: &str, _password: &str) -> Result<AuthSession> {
            Err(TeamfinderError::gateway("unsupported"))
        }

        async fn sign_out(&self) -> Result<()> {
            if self.fail_sign_out {
                Err(TeamfinderError::gateway("network down"))
            } else {
                Ok(())
            }
        }

        async fn current_user(&self) -> Result<Option<Identity>> {
            Ok(self.user.clone())
        }
    }

    #[tokio::test]
    async fn test_init_stores_current_user() {
        let auth = FixedAuth {
            user: Some(Identity::new("u1", None)),
            fail_sign_out: false,
        };
        let mut context = SessionContext::new();

        let identity = context.init(&auth).await.unwrap();
        assert_eq!(identity.map(|i| i.id.as_str()), Some("u1"));
        assert!(context.is_authenticated());
        assert_eq!(context.require().unwrap().id, "u1");
    }

    #[tokio::test]
    async fn test_teardown_clears_even_on_failure() {
        let auth = FixedAuth {
            user: None,
            fail_sign_out: true,
        };
        let mut context = SessionContext::new();
        context.set(Identity::new("u1", None));

        assert!(context.teardown(&auth).await.is_err());
        assert!(!context.is_authenticated());
        assert_eq!(context.require(), Err(TeamfinderError::NotAuthenticated));
    }
}
