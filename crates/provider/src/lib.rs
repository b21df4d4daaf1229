//! Provider integration layer
//!
//! This crate provides the client abstraction for OpenAI-compatible AI
//! providers used by the assistant API:
//! - Chat completions (text and multimodal image input)
//! - Audio transcription (Whisper-style multipart upload)
//! - Speech synthesis (text to audio bytes)
//!
//! Credentials are resolved per request (header key or configured
//! fallback) and every call carries its own deadline, so a slow provider
//! call is aborted instead of holding the connection.

pub mod credentials;
pub mod mock;
pub mod models;
pub mod openai;

pub use credentials::{ApiKey, CallOptions, CredentialResolver};
pub use models::{
    detect_audio_content_type, ChatCompletionChoice, ChatCompletionParams, ChatCompletionResponse,
    ChatMessage, ChatResponseMessage, ContentPart, ImageUrl, MessageContent, MessageRole,
    ProviderError, ResponseFormat, SpeechParams, SpeechResponse, TokenUsage, TranscriptionParams,
    TranscriptionResponse,
};
pub use openai::OpenAiClient;

use async_trait::async_trait;

/// Client for an OpenAI-compatible provider.
///
/// Implementations must be thread-safe; one client instance serves all
/// concurrent requests, with the key and deadline supplied per call.
#[async_trait]
pub trait ProviderClient: Send + Sync {
    /// Run a chat completion and return the complete response.
    async fn chat_completion(
        &self,
        params: ChatCompletionParams,
        options: &CallOptions,
    ) -> Result<ChatCompletionResponse, ProviderError>;

    /// Transcribe audio to text.
    async fn transcribe(
        &self,
        params: TranscriptionParams,
        options: &CallOptions,
    ) -> Result<TranscriptionResponse, ProviderError>;

    /// Synthesize speech from text.
    async fn synthesize(
        &self,
        params: SpeechParams,
        options: &CallOptions,
    ) -> Result<SpeechResponse, ProviderError>;
}
