//! Auth (GoTrue) operations.
//!
//! All endpoints live under `/auth/v1`. Tokens are explicit per-call state:
//! operations acting on behalf of a user take the access token as an
//! argument and apply it as that request's bearer credential, overriding
//! the service-key default. The client holds no ambient session.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use tracing::debug;
use uuid::Uuid;

use crate::client::SupabaseClient;
use crate::error::{Result, check_status, decode_json};

/// Auth operations scoped to a [`SupabaseClient`].
#[derive(Clone, Debug)]
pub struct AuthClient {
    inner: SupabaseClient,
}

/// An authenticated session issued by the backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    /// JWT used to authenticate subsequent requests.
    pub access_token: String,
    /// Token type, always `bearer`.
    pub token_type: String,
    /// Seconds until `access_token` expires.
    pub expires_in: u64,
    /// Unix timestamp at which `access_token` expires.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<i64>,
    /// Token used to obtain the next session.
    pub refresh_token: String,
    /// The user the session belongs to.
    pub user: User,
}

/// A user record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aud: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    /// Free-form metadata supplied at sign-up.
    #[serde(default)]
    pub user_metadata: Value,
    /// Metadata managed by the backend (provider, roles).
    #[serde(default)]
    pub app_metadata: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_sign_in_at: Option<DateTime<Utc>>,
}

/// Response to [`AuthClient::sign_up`].
///
/// The backend issues a full session when the project auto-confirms new
/// users, and a bare user record while email confirmation is pending.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AuthResponse {
    /// Sign-up completed and a session was issued.
    Session(Session),
    /// The user was created but must confirm their email first.
    User(User),
}

impl AuthResponse {
    /// The session, when one was issued.
    pub fn session(&self) -> Option<&Session> {
        match self {
            AuthResponse::Session(session) => Some(session),
            AuthResponse::User(_) => None,
        }
    }

    /// The user record, wherever the response carries it.
    pub fn user(&self) -> &User {
        match self {
            AuthResponse::Session(session) => &session.user,
            AuthResponse::User(user) => user,
        }
    }
}

impl AuthClient {
    pub(crate) fn new(inner: SupabaseClient) -> Self {
        Self { inner }
    }

    fn endpoint(&self, path: &str) -> String {
        self.inner.endpoint(&format!("/auth/v1{path}"))
    }

    /// Register a new user, with optional free-form metadata.
    pub async fn sign_up(
        &self,
        email: &str,
        password: &str,
        user_metadata: Option<Value>,
    ) -> Result<AuthResponse> {
        let url = self.endpoint("/signup");
        debug!(%email, "auth: sign up");

        let mut body = json!({ "email": email, "password": password });
        if let Some(data) = user_metadata {
            body["data"] = data;
        }

        let response = self.inner.http().post(&url).json(&body).send().await?;
        decode_json(response).await
    }

    /// Sign in with email and password.
    pub async fn sign_in(&self, email: &str, password: &str) -> Result<Session> {
        let url = self.endpoint("/token?grant_type=password");
        debug!(%email, "auth: password sign in");

        let body = json!({ "email": email, "password": password });
        let response = self.inner.http().post(&url).json(&body).send().await?;
        decode_json(response).await
    }

    /// Revoke the session behind `access_token`.
    ///
    /// The token is applied to this request; the backend decides which
    /// session it revokes. Returns nothing on success (the endpoint
    /// responds 204).
    pub async fn sign_out(&self, access_token: &str) -> Result<()> {
        let url = self.endpoint("/logout");
        debug!("auth: sign out");

        let response = self
            .inner
            .http()
            .post(&url)
            .bearer_auth(access_token)
            .send()
            .await?;
        check_status(response).await?;
        Ok(())
    }

    /// Fetch the user owning `access_token`.
    pub async fn get_user(&self, access_token: &str) -> Result<User> {
        let url = self.endpoint("/user");
        debug!("auth: get user");

        let response = self
            .inner
            .http()
            .get(&url)
            .bearer_auth(access_token)
            .send()
            .await?;
        decode_json(response).await
    }

    /// Exchange a refresh token for a fresh session.
    pub async fn refresh_token(&self, refresh_token: &str) -> Result<Session> {
        let url = self.endpoint("/token?grant_type=refresh_token");
        debug!("auth: refresh session");

        let body = json!({ "refresh_token": refresh_token });
        let response = self.inner.http().post(&url).json(&body).send().await?;
        decode_json(response).await
    }
}
