//! Client configuration.

use crate::error::{Error, Result};

/// Environment variable holding the project URL.
pub const SUPABASE_URL_ENV: &str = "SUPABASE_URL";

/// Environment variable holding the API key.
pub const SUPABASE_KEY_ENV: &str = "SUPABASE_KEY";

/// Configuration for [`SupabaseClient`](crate::SupabaseClient).
///
/// Both values are required and immutable for the lifetime of a client;
/// there is no credential rotation.
#[derive(Clone, Debug)]
pub struct SupabaseConfig {
    /// Project URL (e.g. `https://abcdefgh.supabase.co`)
    pub url: String,
    /// API key (anon or service-role)
    pub key: String,
}

impl SupabaseConfig {
    /// Create new config from a project URL and API key.
    ///
    /// Normalizes the URL by stripping trailing slashes, since the client
    /// appends the service paths (`/auth/v1`, `/storage/v1`, `/rest/v1`)
    /// itself.
    pub fn new(url: impl Into<String>, key: impl Into<String>) -> Self {
        let mut url = url.into();
        while url.ends_with('/') {
            url.pop();
        }
        Self {
            url,
            key: key.into(),
        }
    }

    /// Read configuration from [`SUPABASE_URL_ENV`] and [`SUPABASE_KEY_ENV`].
    ///
    /// Fails with [`Error::MissingCredentials`] if either variable is unset
    /// or empty.
    pub fn from_env() -> Result<Self> {
        let url = std::env::var(SUPABASE_URL_ENV).unwrap_or_default();
        let key = std::env::var(SUPABASE_KEY_ENV).unwrap_or_default();
        Self::new(url, key).validated()
    }

    /// Reject configs with an absent or empty credential.
    pub(crate) fn validated(self) -> Result<Self> {
        if self.url.is_empty() {
            return Err(Error::MissingCredentials(SUPABASE_URL_ENV.to_string()));
        }
        if self.key.is_empty() {
            return Err(Error::MissingCredentials(SUPABASE_KEY_ENV.to_string()));
        }
        Ok(self)
    }
}
