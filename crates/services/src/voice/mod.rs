//! Realtime voice conversation over a server-held transcript.
//!
//! A turn runs transcription, chat and speech in sequence while holding
//! the session lock, so turns for one session serialize. The transcript
//! gains the user/assistant pair only after all three provider calls
//! succeeded; a failed turn leaves the session exactly as it was.
//!
//! Audio arriving for an unknown session id does not fail: the session
//! may simply have been evicted, so the call degrades to initialization
//! and the client is expected to resend its clip.

pub mod ports;
pub mod store;


use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use config::{CompletionProfile, SpeechProfile, TranscriptionProfile};
use provider::{
    ApiKey, CallOptions, ChatCompletionParams, ChatMessage, MessageRole, ProviderClient,
    SpeechParams, TranscriptionParams,
};
use tokio::sync::Mutex;

use ports::{VoiceOutcome, VoiceRequest, VoiceSessionError, VoiceSessionService, VoiceTurn};
use store::{SessionStore, TranscriptMessage, VoiceSession};

const DEFAULT_SYSTEM_PROMPT: &str = "Tu es un assistant spécialisé pour les personnes diabétiques, \
    réponds de manière concise, claire et en français.";

pub struct VoiceSessionServiceImpl {
    provider: Arc<dyn ProviderClient>,
    store: Arc<SessionStore>,
    chat_profile: CompletionProfile,
    speech_profile: SpeechProfile,
    transcription_profile: TranscriptionProfile,
}

impl VoiceSessionServiceImpl {
    pub fn new(
        provider: Arc<dyn ProviderClient>,
        store: Arc<SessionStore>,
        chat_profile: CompletionProfile,
        speech_profile: SpeechProfile,
        transcription_profile: TranscriptionProfile,
    ) -> Self {
        Self {
            provider,
            store,
            chat_profile,
            speech_profile,
            transcription_profile,
        }
    }

    async fn initialize(&self, session_id: String, prompt: Option<String>) -> VoiceOutcome {
        let system_prompt = prompt
            .filter(|p| !p.is_empty())
            .unwrap_or_else(|| DEFAULT_SYSTEM_PROMPT.to_string());

        if let Some(session) = self.store.get(&session_id).await {
            session.lock().await.reset(system_prompt);
            tracing::info!(session_id = %session_id, "voice session reset");
        } else {
            self.store
                .insert(VoiceSession::new(session_id.clone(), system_prompt))
                .await;
            tracing::info!(session_id = %session_id, "voice session initialized");
        }
        VoiceOutcome::SessionInitialized
    }

    async fn process_turn(
        &self,
        session: Arc<Mutex<VoiceSession>>,
        audio_b64: &str,
        api_key: Option<ApiKey>,
    ) -> Result<VoiceOutcome, VoiceSessionError> {
        let api_key = api_key.ok_or(VoiceSessionError::MissingKey)?;
        let audio_bytes = BASE64
            .decode(audio_b64)
            .map_err(|_| VoiceSessionError::InvalidAudio)?;

        // Lock held for the whole turn
        let mut session = session.lock().await;
        tracing::debug!(
            session_id = %session.id,
            audio_bytes = audio_bytes.len(),
            "processing voice turn"
        );

        let transcription = self
            .provider
            .transcribe(
                TranscriptionParams {
                    model: self.transcription_profile.model.clone(),
                    file_bytes: audio_bytes,
                    filename: "audio.mp3".to_string(),
                    language: self.transcription_profile.language.clone(),
                    response_format: None,
                },
                &CallOptions::new(
                    api_key.clone(),
                    Duration::from_secs(self.transcription_profile.timeout_secs),
                ),
            )
            .await?;
        let user_text = transcription.text;
        if user_text.is_empty() {
            return Err(VoiceSessionError::EmptyTranscription);
        }

        let mut messages: Vec<ChatMessage> = session
            .messages
            .iter()
            .map(|m| ChatMessage::text(m.role, m.content.clone()))
            .collect();
        messages.push(ChatMessage::text(MessageRole::User, user_text.clone()));

        let chat_response = self
            .provider
            .chat_completion(
                ChatCompletionParams {
                    model: self.chat_profile.model.clone(),
                    messages,
                    max_tokens: self.chat_profile.max_tokens,
                    temperature: self.chat_profile.temperature,
                    response_format: None,
                    stream: false,
                },
                &CallOptions::new(
                    api_key.clone(),
                    Duration::from_secs(self.chat_profile.timeout_secs),
                ),
            )
            .await?;
        let assistant_text = chat_response
            .content()
            .map(str::to_string)
            .ok_or(VoiceSessionError::EmptyReply)?;

        let speech = self
            .provider
            .synthesize(
                SpeechParams {
                    model: self.speech_profile.model.clone(),
                    input: assistant_text.clone(),
                    voice: self.speech_profile.voice.clone(),
                },
                &CallOptions::new(
                    api_key,
                    Duration::from_secs(self.speech_profile.timeout_secs),
                ),
            )
            .await?;

        // All three stages succeeded; only now does the transcript change
        session.messages.push(TranscriptMessage {
            role: MessageRole::User,
            content: user_text.clone(),
        });
        session.messages.push(TranscriptMessage {
            role: MessageRole::Assistant,
            content: assistant_text.clone(),
        });

        tracing::info!(
            session_id = %session.id,
            transcript_len = session.messages.len(),
            "voice turn completed"
        );

        Ok(VoiceOutcome::Turn(VoiceTurn {
            text: assistant_text,
            audio: BASE64.encode(&speech.audio_data),
            transcription: user_text,
        }))
    }
}

#[async_trait]
impl VoiceSessionService for VoiceSessionServiceImpl {
    async fn handle(
        &self,
        request: VoiceRequest,
        api_key: Option<ApiKey>,
    ) -> Result<VoiceOutcome, VoiceSessionError> {
        tracing::debug!(
            session_id = %request.session_id,
            has_audio = request.audio.is_some(),
            format = ?request.format,
            "handling realtime voice call"
        );

        match request.audio {
            Some(audio) if !audio.is_empty() => {
                match self.store.get(&request.session_id).await {
                    Some(session) => self.process_turn(session, &audio, api_key).await,
                    // Unknown or evicted session id: fall back to initialization
                    None => Ok(self.initialize(request.session_id, request.prompt).await),
                }
            }
            _ => Ok(self.initialize(request.session_id, request.prompt).await),
        }
    }
}
