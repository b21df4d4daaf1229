//! Port definitions for the assistant chat service.

use async_trait::async_trait;
use provider::{ApiKey, ChatMessage, ProviderError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ChatServiceError {
    #[error("chat request timed out")]
    Timeout,
    #[error("the provider rejected the API key")]
    InvalidKey,
    /// The reply carried no assistant message to return.
    #[error("Réponse OpenAI invalide")]
    EmptyReply,
    #[error("provider call failed: {0}")]
    Provider(String),
}

impl From<ProviderError> for ChatServiceError {
    fn from(err: ProviderError) -> Self {
        if err.is_timeout() {
            Self::Timeout
        } else if err.is_auth() {
            Self::InvalidKey
        } else {
            Self::Provider(err.to_string())
        }
    }
}

#[async_trait]
pub trait ChatService: Send + Sync {
    /// Answer a client-held conversation.
    ///
    /// The diabetes-assistant system prompt is prepended server-side;
    /// the client never supplies it.
    async fn respond(
        &self,
        messages: Vec<ChatMessage>,
        api_key: ApiKey,
    ) -> Result<String, ChatServiceError>;
}
