//! Gateway backed by a hosted Supabase project.
//!
//! - Auth: `{url}/auth/v1/...` (sign-up, password and refresh-token grants, logout, user)
//! - Tables: `{url}/rest/v1/{table}` with PostgREST query parameters
//!
//! Every request carries the project's anon key in `apikey`; `Authorization`
//! carries the session's access token when signed in, the anon key otherwise.

mod auth;
mod error;
mod rest;

use std::time::Duration;

use reqwest::{Client, RequestBuilder, Response};
use teamfinder_core::config::SupabaseConfig;
use teamfinder_core::error::Result;
use teamfinder_core::gateway::{AuthSession, Table};
use tokio::sync::RwLock;

pub use error::error_message;

/// Gateway implementation talking to Supabase over HTTPS.
pub struct SupabaseGateway {
    client: Client,
    base_url: String,
    anon_key: String,
    session: RwLock<Option<AuthSession>>,
}

impl SupabaseGateway {
    /// Creates a gateway from validated connection settings.
    pub fn new(config: &SupabaseConfig) -> Result<Self> {
        config.validate()?;
        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;
        Ok(Self {
            client,
            base_url: config.url.trim_end_matches('/').to_string(),
            anon_key: config.anon_key.clone(),
            session: RwLock::new(None),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn auth_url(&self, path: &str) -> String {
        format!("{}/auth/v1/{}", self.base_url, path)
    }

    fn rest_url(&self, table: Table) -> String {
        format!("{}/rest/v1/{}", self.base_url, table.name())
    }

    /// Access token of the current session, or the anon key.
    async fn bearer(&self) -> String {
        self.session
            .read()
            .await
            .as_ref()
            .map(|session| session.access_token.clone())
            .unwrap_or_else(|| self.anon_key.clone())
    }

    /// Adds `apikey` and `Authorization` headers.
    async fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        let token = self.bearer().await;
        request
            .header("apikey", &self.anon_key)
            .bearer_auth(token)
    }
}

/// Passes successful responses through; turns failures into gateway errors
/// carrying the backend's message.
async fn check(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    let message = error_message(&body, status.canonical_reason());
    tracing::debug!(status = status.as_u16(), %message, "Gateway request failed");
    Err(teamfinder_core::TeamfinderError::gateway_status(
        status.as_u16(),
        message,
    ))
}
