//! Object storage operations.
//!
//! Buckets and objects live under `/storage/v1`. Public object URLs are
//! computed locally from the project URL; no request is made for them.

use bytes::Bytes;
use chrono::{DateTime, Utc};
use reqwest::header::{CACHE_CONTROL, CONTENT_TYPE};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::debug;

use crate::client::SupabaseClient;
use crate::error::{Result, check_status, decode_json};

/// Storage operations scoped to a [`SupabaseClient`].
#[derive(Clone, Debug)]
pub struct StorageClient {
    inner: SupabaseClient,
}

/// A storage bucket.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bucket {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner: Option<String>,
    #[serde(default)]
    pub public: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Options for bucket creation.
#[derive(Debug, Clone, Default)]
pub struct BucketOptions {
    /// Whether objects are readable without a token. Defaults to private.
    pub public: bool,
}

impl BucketOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark the bucket as publicly readable.
    pub fn public(mut self, public: bool) -> Self {
        self.public = public;
        self
    }
}

/// Response to bucket creation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatedBucket {
    pub name: String,
}

/// Per-upload options.
///
/// The content type travels here rather than as a separate request
/// parameter, matching the storage API's upload conventions.
#[derive(Debug, Clone, Default)]
pub struct FileOptions {
    pub content_type: Option<String>,
    pub cache_control: Option<String>,
    pub upsert: bool,
}

impl FileOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the MIME type sent with the object.
    pub fn content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }

    /// Cache the object for `seconds` at the CDN and in browsers.
    pub fn cache_control(mut self, seconds: u32) -> Self {
        self.cache_control = Some(format!("max-age={seconds}"));
        self
    }

    /// Overwrite an existing object at the same path.
    pub fn upsert(mut self, upsert: bool) -> Self {
        self.upsert = upsert;
        self
    }
}

/// Response to an object upload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadResponse {
    /// `bucket/path` key of the stored object.
    #[serde(rename = "Key")]
    pub key: String,
    #[serde(rename = "Id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
}

/// An object removed by [`BucketHandle::remove`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeletedObject {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bucket_id: Option<String>,
}

impl StorageClient {
    pub(crate) fn new(inner: SupabaseClient) -> Self {
        Self { inner }
    }

    fn endpoint(&self, path: &str) -> String {
        self.inner.endpoint(&format!("/storage/v1{path}"))
    }

    /// Create a bucket named `name`.
    pub async fn create_bucket(
        &self,
        name: &str,
        options: BucketOptions,
    ) -> Result<CreatedBucket> {
        let url = self.endpoint("/bucket");
        debug!(%name, public = options.public, "storage: create bucket");

        let body = json!({ "id": name, "name": name, "public": options.public });
        let response = self.inner.http().post(&url).json(&body).send().await?;
        decode_json(response).await
    }

    /// List all buckets in the project.
    pub async fn list_buckets(&self) -> Result<Vec<Bucket>> {
        let url = self.endpoint("/bucket");
        debug!("storage: list buckets");

        let response = self.inner.http().get(&url).send().await?;
        decode_json(response).await
    }

    /// Object operations within `bucket`.
    pub fn from(&self, bucket: impl Into<String>) -> BucketHandle {
        BucketHandle {
            inner: self.inner.clone(),
            bucket: bucket.into(),
        }
    }
}

/// Object operations scoped to one bucket.
#[derive(Clone, Debug)]
pub struct BucketHandle {
    inner: SupabaseClient,
    bucket: String,
}

impl BucketHandle {
    /// Bucket name this handle operates on.
    pub fn bucket(&self) -> &str {
        &self.bucket
    }

    fn object_url(&self, path: &str) -> String {
        self.inner.endpoint(&format!(
            "/storage/v1/object/{}/{}",
            self.bucket,
            path.trim_start_matches('/')
        ))
    }

    /// Upload `content` to `path`.
    pub async fn upload(
        &self,
        path: &str,
        content: impl Into<Bytes>,
        options: FileOptions,
    ) -> Result<UploadResponse> {
        let url = self.object_url(path);
        debug!(bucket = %self.bucket, %path, "storage: upload object");

        let mut request = self.inner.http().post(&url).body(content.into());
        if let Some(content_type) = &options.content_type {
            request = request.header(CONTENT_TYPE, content_type.as_str());
        }
        if let Some(cache_control) = &options.cache_control {
            request = request.header(CACHE_CONTROL, cache_control.as_str());
        }
        if options.upsert {
            request = request.header("x-upsert", "true");
        }

        let response = request.send().await?;
        decode_json(response).await
    }

    /// Download the raw bytes of the object at `path`.
    pub async fn download(&self, path: &str) -> Result<Bytes> {
        let url = self.object_url(path);
        debug!(bucket = %self.bucket, %path, "storage: download object");

        let response = self.inner.http().get(&url).send().await?;
        let response = check_status(response).await?;
        Ok(response.bytes().await?)
    }

    /// Public URL for the object at `path`.
    ///
    /// Pure formatting over the configured project URL; the URL only
    /// resolves if the bucket is public.
    pub fn get_public_url(&self, path: &str) -> String {
        format!(
            "{}/storage/v1/object/public/{}/{}",
            self.inner.config().url,
            self.bucket,
            path.trim_start_matches('/')
        )
    }

    /// Remove the objects at `paths`.
    pub async fn remove<I, S>(&self, paths: I) -> Result<Vec<DeletedObject>>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let url = self.endpoint_for_bucket();
        let prefixes: Vec<String> = paths.into_iter().map(Into::into).collect();
        debug!(bucket = %self.bucket, count = prefixes.len(), "storage: remove objects");

        let response = self
            .inner
            .http()
            .delete(&url)
            .json(&json!({ "prefixes": prefixes }))
            .send()
            .await?;
        decode_json(response).await
    }

    fn endpoint_for_bucket(&self) -> String {
        self.inner
            .endpoint(&format!("/storage/v1/object/{}", self.bucket))
    }
}
