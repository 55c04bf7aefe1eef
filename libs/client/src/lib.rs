//! # Supabase Client
//!
//! A typed Rust client for the Supabase backend, covering auth (GoTrue),
//! object storage, and table access (PostgREST).
//!
//! ## Features
//!
//! - **Shared handle**: one process-wide client, lazily built from the
//!   environment with atomic one-time initialization
//! - **Typed responses**: per-operation serde models instead of loose JSON
//! - **Explicit tokens**: user tokens are per-call state, never ambient
//!   session state hidden inside the client
//! - **Thin by design**: every operation is a direct call against the
//!   backend's REST surface; failures propagate to the caller undecorated
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use supabase_client::SupabaseClient;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Reads SUPABASE_URL / SUPABASE_KEY on first access, then reuses
//!     // the same handle for the rest of the process.
//!     let client = SupabaseClient::global()?;
//!
//!     let session = client.sign_in("dev@example.com", "correct horse").await?;
//!     let user = client.get_user(&session.access_token).await?;
//!     println!("signed in as {:?}", user.email);
//!
//!     Ok(())
//! }
//! ```

pub mod auth;
pub mod client;
pub mod config;
pub mod error;
pub mod postgrest;
pub mod storage;

// Re-export commonly used types
pub use auth::{AuthClient, AuthResponse, Session, User};
pub use client::SupabaseClient;
pub use config::SupabaseConfig;
pub use error::{Error, Result};
pub use postgrest::QueryBuilder;
pub use storage::{
    Bucket, BucketHandle, BucketOptions, CreatedBucket, DeletedObject, FileOptions, StorageClient,
    UploadResponse,
};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::auth::{AuthClient, AuthResponse, Session, User};
    pub use crate::client::SupabaseClient;
    pub use crate::config::SupabaseConfig;
    pub use crate::error::{Error, Result};
    pub use crate::postgrest::QueryBuilder;
    pub use crate::storage::*;
}
