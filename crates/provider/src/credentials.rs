//! API key resolution for provider calls.
//!
//! Every request may carry its own key in the `X-OpenAI-API-Key` header;
//! when it does not, the key configured on the server (if any) is used.
//! Resolution is per-request and has no side effects, so the same resolver
//! serves concurrent requests with different keys.

use std::fmt;

/// A provider API key.
///
/// Wrapped so the key never shows up in debug output or logs.
#[derive(Clone, PartialEq, Eq)]
pub struct ApiKey(String);

impl ApiKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ApiKey(***)")
    }
}

/// Resolves the API key to use for a provider call.
#[derive(Debug, Clone, Default)]
pub struct CredentialResolver {
    fallback: Option<String>,
}

impl CredentialResolver {
    /// `fallback` is the server-configured key; empty strings count as absent.
    pub fn new(fallback: Option<String>) -> Self {
        Self {
            fallback: fallback.filter(|k| !k.is_empty()),
        }
    }

    /// Pick the key for one request: the request's own key wins, otherwise
    /// the configured fallback. Blank request keys fall through to the
    /// fallback. Returns `None` when neither source has a key.
    pub fn resolve(&self, request_key: Option<&str>) -> Option<ApiKey> {
        request_key
            .map(str::trim)
            .filter(|k| !k.is_empty())
            .map(ApiKey::new)
            .or_else(|| self.fallback.as_deref().map(ApiKey::new))
    }
}

/// Per-call options threaded to the provider client.
#[derive(Debug, Clone)]
pub struct CallOptions {
    /// Key already resolved for this request
    pub api_key: ApiKey,
    /// Deadline for the whole call; the request is aborted when it expires
    pub timeout: std::time::Duration,
}

impl CallOptions {
    pub fn new(api_key: ApiKey, timeout: std::time::Duration) -> Self {
        Self { api_key, timeout }
    }
}
