//! The shared Supabase client handle.
//!
//! One [`SupabaseClient`] per process is the intended shape: [`SupabaseClient::global`]
//! builds it from the environment on first access and hands out the same
//! reference forever after. Explicit construction via [`SupabaseClient::new`]
//! remains available for tests and multi-project setups.

use std::time::Duration;

use bytes::Bytes;
use once_cell::sync::OnceCell;
use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};
use serde_json::Value;

use crate::auth::{AuthClient, AuthResponse, Session, User};
use crate::config::SupabaseConfig;
use crate::error::{Error, Result};
use crate::postgrest::QueryBuilder;
use crate::storage::{
    BucketOptions, CreatedBucket, DeletedObject, FileOptions, StorageClient, UploadResponse,
};

/// Request timeout applied to every call.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

static GLOBAL: OnceCell<SupabaseClient> = OnceCell::new();

/// Client for the Supabase backend.
///
/// Cheap to clone; every clone shares the same connection pool and
/// credentials. Credentials are immutable once the client is built.
#[derive(Clone, Debug)]
pub struct SupabaseClient {
    http: reqwest::Client,
    config: SupabaseConfig,
}

impl SupabaseClient {
    /// Create a new client from the given configuration.
    ///
    /// The API key is attached to every request as both the `apikey`
    /// header and the default bearer credential; operations that act on
    /// behalf of a user override the latter per call.
    pub fn new(config: SupabaseConfig) -> Result<Self> {
        let config = config.validated()?;

        let mut headers = HeaderMap::new();
        headers.insert(
            "apikey",
            HeaderValue::from_str(&config.key)
                .map_err(|e| Error::Config(format!("API key is not a valid header value: {e}")))?,
        );
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {}", config.key))
                .map_err(|e| Error::Config(format!("API key is not a valid header value: {e}")))?,
        );

        let http = reqwest::Client::builder()
            .user_agent(format!("supabase-client/{}", env!("CARGO_PKG_VERSION")))
            .default_headers(headers)
            .timeout(REQUEST_TIMEOUT)
            .build()?;

        tracing::debug!(url = %config.url, "supabase client initialized");
        Ok(Self { http, config })
    }

    /// Create a client from `SUPABASE_URL` / `SUPABASE_KEY`.
    pub fn from_env() -> Result<Self> {
        Self::new(SupabaseConfig::from_env()?)
    }

    /// The process-wide shared client, built from the environment on first
    /// access.
    ///
    /// First construction is atomic: concurrent first callers block until a
    /// single client is stored, and exactly one instance is ever retained.
    /// A failed attempt stores nothing, so the next access re-reads the
    /// environment.
    pub fn global() -> Result<&'static SupabaseClient> {
        GLOBAL.get_or_try_init(Self::from_env)
    }

    /// Initialize the process-wide client with an explicit configuration.
    ///
    /// The first successful initialization wins; later calls return the
    /// already-stored handle regardless of the configuration they carry.
    pub fn init_global(config: SupabaseConfig) -> Result<&'static SupabaseClient> {
        GLOBAL.get_or_try_init(|| Self::new(config))
    }

    /// Client configuration.
    pub fn config(&self) -> &SupabaseConfig {
        &self.config
    }

    pub(crate) fn http(&self) -> &reqwest::Client {
        &self.http
    }

    /// Absolute URL for a path under the project URL.
    pub(crate) fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.config.url, path)
    }

    // =========================================================================
    // Service clients
    // =========================================================================

    /// Auth (GoTrue) operations.
    pub fn auth(&self) -> AuthClient {
        AuthClient::new(self.clone())
    }

    /// Object storage operations.
    pub fn storage(&self) -> StorageClient {
        StorageClient::new(self.clone())
    }

    /// Query builder for `table`.
    pub fn table(&self, table: impl Into<String>) -> QueryBuilder {
        QueryBuilder::new(self.clone(), table)
    }

    // =========================================================================
    // Convenience forwarding: each call delegates to the service client
    // unchanged and returns whatever the backend returned.
    // =========================================================================

    /// Register a new user.
    pub async fn sign_up(
        &self,
        email: &str,
        password: &str,
        user_metadata: Option<Value>,
    ) -> Result<AuthResponse> {
        self.auth().sign_up(email, password, user_metadata).await
    }

    /// Sign in with email and password.
    pub async fn sign_in(&self, email: &str, password: &str) -> Result<Session> {
        self.auth().sign_in(email, password).await
    }

    /// Revoke the session behind `access_token`.
    pub async fn sign_out(&self, access_token: &str) -> Result<()> {
        self.auth().sign_out(access_token).await
    }

    /// Fetch the user owning `access_token`.
    pub async fn get_user(&self, access_token: &str) -> Result<User> {
        self.auth().get_user(access_token).await
    }

    /// Exchange a refresh token for a fresh session.
    pub async fn refresh_token(&self, refresh_token: &str) -> Result<Session> {
        self.auth().refresh_token(refresh_token).await
    }

    /// Create a private storage bucket named `bucket`.
    pub async fn create_bucket(&self, bucket: &str) -> Result<CreatedBucket> {
        self.storage()
            .create_bucket(bucket, BucketOptions::default())
            .await
    }

    /// Upload `content` to `path` inside `bucket`.
    ///
    /// The content type travels in the upload options, not as a separate
    /// request parameter.
    pub async fn upload_file(
        &self,
        bucket: &str,
        path: &str,
        content: impl Into<Bytes>,
        content_type: &str,
    ) -> Result<UploadResponse> {
        self.storage()
            .from(bucket)
            .upload(path, content, FileOptions::new().content_type(content_type))
            .await
    }

    /// Public URL for `path` inside `bucket`. Pure formatting, no request.
    pub fn get_file_url(&self, bucket: &str, path: &str) -> String {
        self.storage().from(bucket).get_public_url(path)
    }

    /// Delete the object at `path` inside `bucket`.
    pub async fn delete_file(&self, bucket: &str, path: &str) -> Result<Vec<DeletedObject>> {
        self.storage().from(bucket).remove([path]).await
    }
}
