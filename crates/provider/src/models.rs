use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: MessageRole,
    pub content: MessageContent,
}

impl ChatMessage {
    /// Plain text message
    pub fn text(role: MessageRole, content: impl Into<String>) -> Self {
        Self {
            role,
            content: MessageContent::Text(content.into()),
        }
    }

    /// User message carrying a text prompt and an image URL (or data URI)
    pub fn user_with_image(text: impl Into<String>, image_url: impl Into<String>) -> Self {
        Self {
            role: MessageRole::User,
            content: MessageContent::Parts(vec![
                ContentPart::Text { text: text.into() },
                ContentPart::ImageUrl {
                    image_url: ImageUrl {
                        url: image_url.into(),
                    },
                },
            ]),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    System,
    User,
    Assistant,
}

/// Message content: plain text or multimodal parts
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MessageContent {
    Text(String),
    Parts(Vec<ContentPart>),
}

/// One part of a multimodal message
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ContentPart {
    #[serde(rename = "text")]
    Text { text: String },
    #[serde(rename = "image_url")]
    ImageUrl { image_url: ImageUrl },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageUrl {
    pub url: String,
}

/// Response format specification
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ResponseFormat {
    #[serde(rename = "text")]
    Text,
    #[serde(rename = "json_object")]
    JsonObject,
}

/// Parameters for a chat completion request
#[derive(Debug, Clone, Serialize)]
pub struct ChatCompletionParams {
    /// Model to use for the completion
    pub model: String,

    /// Conversation messages, oldest first
    pub messages: Vec<ChatMessage>,

    /// Maximum number of tokens to generate
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,

    /// Sampling temperature (0.0 to 2.0)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,

    /// Forces the output shape (e.g. a JSON object)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_format: Option<ResponseFormat>,

    /// Always false; this client does not consume streamed completions
    pub stream: bool,
}

/// Complete (non-streaming) chat completion response (matches OpenAI format)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatCompletionResponse {
    /// Unique identifier for the completion
    pub id: String,

    /// Object type - always "chat.completion"
    pub object: String,

    /// Unix timestamp of when the completion was created
    pub created: i64,

    /// Model used for the completion
    pub model: String,

    /// List of completion choices
    pub choices: Vec<ChatCompletionChoice>,

    /// Usage statistics
    #[serde(skip_serializing_if = "Option::is_none")]
    pub usage: Option<TokenUsage>,
}

impl ChatCompletionResponse {
    /// Text content of the first choice, if any
    pub fn content(&self) -> Option<&str> {
        self.choices.first().and_then(|c| c.message.content.as_deref())
    }
}

/// Choice in a chat completion response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatCompletionChoice {
    /// Choice index
    pub index: i64,

    /// Complete message from the assistant
    pub message: ChatResponseMessage,

    /// Reason why generation finished
    #[serde(skip_serializing_if = "Option::is_none")]
    pub finish_reason: Option<String>,
}

/// Message in a complete chat completion response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatResponseMessage {
    /// Role of the message sender
    pub role: MessageRole,

    /// Text content of the message
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenUsage {
    pub prompt_tokens: i32,
    pub completion_tokens: i32,
    pub total_tokens: i32,
}

impl TokenUsage {
    pub fn new(prompt_tokens: i32, completion_tokens: i32) -> Self {
        Self {
            prompt_tokens,
            completion_tokens,
            total_tokens: prompt_tokens + completion_tokens,
        }
    }
}

/// Parameters for an audio transcription request
#[derive(Debug, Clone)]
pub struct TranscriptionParams {
    /// Model to use for transcription (e.g. "whisper-1")
    pub model: String,
    /// Raw audio data bytes
    pub file_bytes: Vec<u8>,
    /// Filename presented to the provider; drives container detection
    pub filename: String,
    /// Optional language hint (ISO-639-1)
    pub language: Option<String>,
    /// Response format: json, text, verbose_json
    pub response_format: Option<String>,
}

/// Response from an audio transcription request
///
/// Verbose responses carry timing segments and other provider extras;
/// those are kept in `extra` so the object round-trips unchanged.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranscriptionResponse {
    /// Transcribed text
    pub text: String,

    /// Detected or requested language
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,

    /// Audio duration in seconds
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration: Option<f64>,

    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl TranscriptionResponse {
    /// Response holding only text, as produced by the plain-text format
    pub fn from_text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            language: None,
            duration: None,
            extra: serde_json::Map::new(),
        }
    }
}

/// Parameters for a speech synthesis request
#[derive(Debug, Clone, Serialize)]
pub struct SpeechParams {
    /// Model to use for synthesis (e.g. "tts-1")
    pub model: String,
    /// Text to convert to speech
    pub input: String,
    /// Voice to use (e.g. "alloy", "shimmer")
    pub voice: String,
}

/// Response from a speech synthesis request
#[derive(Debug, Clone)]
pub struct SpeechResponse {
    /// Generated audio data
    pub audio_data: Vec<u8>,
    /// Content type of the audio (e.g. "audio/mpeg")
    pub content_type: String,
}

/// Errors surfaced by provider calls
#[derive(Debug, Error)]
pub enum ProviderError {
    /// The call exceeded its deadline; the transport call was aborted
    #[error("Provider call timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u64 },

    /// The provider answered with a non-2xx status
    #[error("Provider returned HTTP {status_code}: {message}")]
    Http { status_code: u16, message: String },

    /// The call failed below HTTP (DNS, connect, TLS, ...)
    #[error("Transport error: {0}")]
    Transport(String),

    /// The provider body could not be interpreted
    #[error("Invalid provider response: {0}")]
    InvalidResponse(String),

    /// The request could not be assembled
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

impl ProviderError {
    pub fn is_timeout(&self) -> bool {
        matches!(self, ProviderError::Timeout { .. })
    }

    /// True when the provider rejected the credential
    pub fn is_auth(&self) -> bool {
        matches!(
            self,
            ProviderError::Http {
                status_code: 401 | 403,
                ..
            }
        )
    }
}

/// Map an audio filename to the content type sent with the multipart part
pub fn detect_audio_content_type(filename: &str) -> &'static str {
    let extension = filename.rsplit('.').next().unwrap_or("");
    match extension.to_ascii_lowercase().as_str() {
        "mp3" => "audio/mpeg",
        "wav" => "audio/wav",
        "webm" => "audio/webm",
        "m4a" | "mp4" => "audio/mp4",
        "ogg" | "oga" => "audio/ogg",
        "flac" => "audio/flac",
        _ => "audio/mpeg",
    }
}
