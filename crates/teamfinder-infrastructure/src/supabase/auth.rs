//! Authentication endpoints.

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use reqwest::StatusCode;
use serde::Deserialize;
use serde_json::{Value, json};
use teamfinder_core::error::Result;
use teamfinder_core::gateway::{AuthGateway, AuthSession, Identity};

use super::{SupabaseGateway, check};

/// Body of a successful password or refresh-token grant.
#[derive(Debug, Deserialize)]
pub(super) struct TokenResponse {
    access_token: String,
    #[serde(default)]
    refresh_token: Option<String>,
    #[serde(default)]
    expires_in: Option<i64>,
    #[serde(default)]
    expires_at: Option<i64>,
    user: Identity,
}

impl TokenResponse {
    pub(super) fn into_session(self, now: DateTime<Utc>) -> AuthSession {
        let expires_at = match (self.expires_at, self.expires_in) {
            (Some(at), _) => DateTime::<Utc>::from_timestamp(at, 0),
            (None, Some(seconds)) => Some(now + Duration::seconds(seconds)),
            (None, None) => None,
        };
        AuthSession {
            access_token: self.access_token,
            refresh_token: self.refresh_token,
            expires_at,
            user: self.user,
        }
    }
}

/// Sign-up answers with a full session when email confirmation is off and
/// with the bare user object otherwise.
pub(super) fn parse_sign_up(body: Value, now: DateTime<Utc>) -> Result<(Identity, Option<AuthSession>)> {
    if body.get("access_token").is_some() {
        let token: TokenResponse = serde_json::from_value(body)?;
        let session = token.into_session(now);
        return Ok((session.user.clone(), Some(session)));
    }
    let user = match body.get("user") {
        Some(user) => user.clone(),
        None => body,
    };
    let identity: Identity = serde_json::from_value(user)?;
    Ok((identity, None))
}

impl SupabaseGateway {
    async fn request_token(&self, grant_type: &str, body: Value) -> Result<AuthSession> {
        let response = self
            .client
            .post(self.auth_url("token"))
            .query(&[("grant_type", grant_type)])
            .header("apikey", &self.anon_key)
            .json(&body)
            .send()
            .await?;
        let token: TokenResponse = check(response).await?.json().await?;
        Ok(token.into_session(Utc::now()))
    }

    /// Replaces an expired session using its refresh token.
    ///
    /// A failed refresh drops the session so later calls run as anonymous.
    async fn refresh_if_expired(&self) -> Result<()> {
        let refresh_token = {
            let session = self.session.read().await;
            match session.as_ref() {
                Some(session) if session.is_expired() => session.refresh_token.clone(),
                _ => return Ok(()),
            }
        };

        let Some(refresh_token) = refresh_token else {
            tracing::info!("Session expired without refresh token");
            *self.session.write().await = None;
            return Ok(());
        };

        match self
            .request_token("refresh_token", json!({ "refresh_token": refresh_token }))
            .await
        {
            Ok(session) => {
                tracing::debug!(user_id = %session.user.id, "Session refreshed");
                *self.session.write().await = Some(session);
                Ok(())
            }
            Err(e) => {
                tracing::warn!(error = %e, "Session refresh failed");
                *self.session.write().await = None;
                Err(e)
            }
        }
    }
}

#[async_trait]
impl AuthGateway for SupabaseGateway {
    async fn sign_up(&self, email: &str, password: &str) -> Result<Identity> {
        let response = self
            .client
            .post(self.auth_url("signup"))
            .header("apikey", &self.anon_key)
            .json(&json!({ "email": email, "password": password }))
            .send()
            .await?;
        let body: Value = check(response).await?.json().await?;
        let (identity, session) = parse_sign_up(body, Utc::now())?;

        if session.is_some() {
            *self.session.write().await = session;
        }
        tracing::info!(user_id = %identity.id, "Signed up");
        Ok(identity)
    }

    async fn sign_in(&self, email: &str, password: &str) -> Result<AuthSession> {
        let session = self
            .request_token("password", json!({ "email": email, "password": password }))
            .await?;
        *self.session.write().await = Some(session.clone());
        tracing::info!(user_id = %session.user.id, "Signed in");
        Ok(session)
    }

    async fn sign_out(&self) -> Result<()> {
        let Some(session) = self.session.write().await.take() else {
            return Ok(());
        };
        let response = self
            .client
            .post(self.auth_url("logout"))
            .header("apikey", &self.anon_key)
            .bearer_auth(&session.access_token)
            .send()
            .await?;
        check(response).await?;
        tracing::info!(user_id = %session.user.id, "Signed out");
        Ok(())
    }

    async fn current_user(&self) -> Result<Option<Identity>> {
        if self.session.read().await.is_none() {
            return Ok(None);
        }
        self.refresh_if_expired().await?;

        let token = match self.session.read().await.as_ref() {
            Some(session) => session.access_token.clone(),
            None => return Ok(None),
        };

        let response = self
            .client
            .get(self.auth_url("user"))
            .header("apikey", &self.anon_key)
            .bearer_auth(token)
            .send()
            .await?;

        if matches!(
            response.status(),
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN
        ) {
            tracing::info!("Stored session rejected, clearing it");
            *self.session.write().await = None;
            return Ok(None);
        }

        let identity: Identity = check(response).await?.json().await?;
        Ok(Some(identity))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user() -> Value {
        json!({"id": "u1", "email": "ada@example.com", "aud": "authenticated", "role": "authenticated"})
    }

    #[test]
    fn test_sign_up_with_session() {
        let now = Utc::now();
        let body = json!({
            "access_token": "jwt",
            "token_type": "bearer",
            "expires_in": 3600,
            "refresh_token": "refresh",
            "user": user()
        });

        let (identity, session) = parse_sign_up(body, now).unwrap();
        assert_eq!(identity.id, "u1");
        let session = session.unwrap();
        assert_eq!(session.access_token, "jwt");
        assert_eq!(session.refresh_token.as_deref(), Some("refresh"));
        assert_eq!(session.expires_at, Some(now + Duration::seconds(3600)));
    }

    #[test]
    fn test_sign_up_pending_confirmation() {
        let (identity, session) = parse_sign_up(user(), Utc::now()).unwrap();
        assert_eq!(identity.email.as_deref(), Some("ada@example.com"));
        assert!(session.is_none());

        let (identity, session) = parse_sign_up(json!({"user": user()}), Utc::now()).unwrap();
        assert_eq!(identity.id, "u1");
        assert!(session.is_none());
    }

    #[test]
    fn test_token_prefers_absolute_expiry() {
        let token: TokenResponse = serde_json::from_value(json!({
            "access_token": "jwt",
            "expires_in": 3600,
            "expires_at": 1_700_000_000,
            "user": user()
        }))
        .unwrap();
        let session = token.into_session(Utc::now());
        assert_eq!(
            session.expires_at,
            DateTime::<Utc>::from_timestamp(1_700_000_000, 0)
        );
    }
}
