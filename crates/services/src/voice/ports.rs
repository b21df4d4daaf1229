//! Port definitions for the realtime voice service.

use async_trait::async_trait;
use provider::{ApiKey, ProviderError};
use thiserror::Error;

/// One realtime call from the client.
#[derive(Debug, Clone)]
pub struct VoiceRequest {
    pub session_id: String,
    /// Base64-encoded audio clip; absent or empty means initialize only.
    pub audio: Option<String>,
    /// System prompt override applied when (re)initializing.
    pub prompt: Option<String>,
    /// Container hint sent by some clients; informational only.
    pub format: Option<String>,
}

/// What a voice call produced.
#[derive(Debug, Clone)]
pub enum VoiceOutcome {
    /// Session created or reset; no audio was processed.
    SessionInitialized,
    /// One completed speak-and-listen exchange.
    Turn(VoiceTurn),
}

#[derive(Debug, Clone)]
pub struct VoiceTurn {
    /// Assistant reply text.
    pub text: String,
    /// Base64-encoded audio of the spoken reply.
    pub audio: String,
    /// What the user was heard saying.
    pub transcription: String,
}

#[derive(Debug, Error)]
pub enum VoiceSessionError {
    /// A voice turn was attempted without any resolvable API key.
    #[error("Aucune clé API OpenAI disponible")]
    MissingKey,
    /// The base64 audio payload did not decode.
    #[error("Données audio invalides")]
    InvalidAudio,
    /// The transcription stage heard nothing.
    #[error("Échec de la transcription audio")]
    EmptyTranscription,
    /// The chat stage returned no assistant message.
    #[error("Réponse de l'assistant vide")]
    EmptyReply,
    /// A provider stage failed; the message names the cause.
    #[error("{0}")]
    Stage(String),
}

impl From<ProviderError> for VoiceSessionError {
    fn from(err: ProviderError) -> Self {
        Self::Stage(err.to_string())
    }
}

#[async_trait]
pub trait VoiceSessionService: Send + Sync {
    /// Run one realtime call: either (re)initialize the session or, when
    /// audio is present and the session is known, process a full voice
    /// turn (transcribe, answer, speak). Initialization needs no API key;
    /// a voice turn does.
    async fn handle(
        &self,
        request: VoiceRequest,
        api_key: Option<ApiKey>,
    ) -> Result<VoiceOutcome, VoiceSessionError>;
}
