//! Port definitions for speech synthesis and transcription.

use async_trait::async_trait;
use provider::{ApiKey, ProviderError, TranscriptionResponse};
use thiserror::Error;

/// Text to turn into spoken audio.
#[derive(Debug, Clone)]
pub struct SpeechRequest {
    pub text: String,
    /// Voice name; `None` picks the configured default.
    pub voice: Option<String>,
}

/// Synthesized audio ready to stream back to the client.
#[derive(Debug, Clone)]
pub struct SpeechAudio {
    pub audio_data: Vec<u8>,
    pub content_type: String,
}

/// An uploaded audio clip to transcribe.
#[derive(Debug, Clone)]
pub struct TranscribeRequest {
    pub audio_bytes: Vec<u8>,
    /// Original filename; its extension drives the upload content type.
    pub filename: String,
}

#[derive(Debug, Error)]
pub enum AudioServiceError {
    #[error("audio request timed out")]
    Timeout,
    #[error("the provider rejected the API key")]
    InvalidKey,
    #[error("provider call failed: {0}")]
    Provider(String),
    #[error("failed to create the temp directory: {0}")]
    TempDir(std::io::Error),
    #[error("failed to stage the temp audio file: {0}")]
    TempFile(std::io::Error),
}

impl From<ProviderError> for AudioServiceError {
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
pub trait AudioService: Send + Sync {
    /// Turn text into spoken audio.
    async fn synthesize(
        &self,
        request: SpeechRequest,
        api_key: ApiKey,
    ) -> Result<SpeechAudio, AudioServiceError>;

    /// Transcribe an audio clip with word-level metadata (verbose JSON).
    async fn transcribe(
        &self,
        request: TranscribeRequest,
        api_key: ApiKey,
    ) -> Result<TranscriptionResponse, AudioServiceError>;

    /// Transcribe an audio clip through an on-disk staging file and
    /// return the plain text.
    async fn transcribe_file(
        &self,
        request: TranscribeRequest,
        api_key: ApiKey,
    ) -> Result<String, AudioServiceError>;
}
