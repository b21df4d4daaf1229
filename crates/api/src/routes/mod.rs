pub mod analysis;
pub mod audio;
pub mod chat;
pub mod health;
pub mod realtime;
pub mod recipes;
pub mod speech;
pub mod transcription;
pub mod vision;

use axum::http::HeaderMap;
use provider::{ApiKey, CredentialResolver};

use crate::consts::API_KEY_HEADER;

/// Resolves the API key for one request: a non-blank `X-OpenAI-API-Key`
/// header wins over the server-configured key.
pub(crate) fn resolve_api_key(
    resolver: &CredentialResolver,
    headers: &HeaderMap,
) -> Option<ApiKey> {
    let request_key = headers
        .get(API_KEY_HEADER)
        .and_then(|value| value.to_str().ok());
    resolver.resolve(request_key)
}
