//! Mock implementation of ProviderClient for testing
//!
//! Generates scripted responses without talking to a real provider. Tests
//! register expectations keyed on the prompt text, script failures per
//! operation, and inspect the requests the mock has seen.

use crate::credentials::CallOptions;
use crate::models::{
    ChatCompletionChoice, ChatCompletionParams, ChatCompletionResponse, ChatResponseMessage,
    MessageContent, MessageRole, ProviderError, SpeechParams, SpeechResponse, TokenUsage,
    TranscriptionParams, TranscriptionResponse,
};
use crate::ProviderClient;
use async_trait::async_trait;
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};
use tokio::sync::Mutex;

/// Request matcher for conditional responses
#[derive(Clone)]
pub enum RequestMatcher {
    /// Match any request
    Any,
    /// Match requests whose combined message text contains the needle
    PromptContains(String),
}

impl RequestMatcher {
    pub fn matches(&self, params: &ChatCompletionParams) -> bool {
        match self {
            Self::Any => true,
            Self::PromptContains(needle) => {
                extract_text_from_messages(&params.messages).contains(needle)
            }
        }
    }
}

/// All text carried by the messages, including multimodal text parts
fn extract_text_from_messages(messages: &[crate::ChatMessage]) -> String {
    messages
        .iter()
        .map(|msg| match &msg.content {
            MessageContent::Text(text) => text.clone(),
            MessageContent::Parts(parts) => parts
                .iter()
                .filter_map(|part| match part {
                    crate::ContentPart::Text { text } => Some(text.as_str()),
                    crate::ContentPart::ImageUrl { .. } => None,
                })
                .collect::<Vec<_>>()
                .join(" "),
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Template for generating chat responses
#[derive(Clone)]
pub struct ResponseTemplate {
    content: String,
}

impl ResponseTemplate {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
        }
    }

    fn generate_response(&self, id: String, created: i64, model: String) -> ChatCompletionResponse {
        let output_tokens = self.content.split_whitespace().count() as i32;
        ChatCompletionResponse {
            id,
            object: "chat.completion".to_string(),
            created,
            model,
            choices: vec![ChatCompletionChoice {
                index: 0,
                message: ChatResponseMessage {
                    role: MessageRole::Assistant,
                    content: Some(self.content.clone()),
                },
                finish_reason: Some("stop".to_string()),
            }],
            usage: Some(TokenUsage::new(6, output_tokens)),
        }
    }
}

/// Scripted failure for one operation
#[derive(Clone)]
pub enum MockFailure {
    Timeout { timeout_secs: u64 },
    Http { status_code: u16, message: String },
}

impl MockFailure {
    fn to_error(&self) -> ProviderError {
        match self {
            Self::Timeout { timeout_secs } => ProviderError::Timeout {
                timeout_secs: *timeout_secs,
            },
            Self::Http {
                status_code,
                message,
            } => ProviderError::Http {
                status_code: *status_code,
                message: message.clone(),
            },
        }
    }
}

struct MockExpectation {
    matcher: RequestMatcher,
    response: ResponseTemplate,
}

struct MockConfig {
    expectations: Vec<MockExpectation>,
    default_response: ResponseTemplate,
    transcription_text: String,
    chat_failure: Option<MockFailure>,
    transcription_failure: Option<MockFailure>,
    speech_failure: Option<MockFailure>,
    chat_requests: Vec<ChatCompletionParams>,
    transcription_requests: Vec<TranscriptionParams>,
    speech_requests: Vec<SpeechParams>,
    last_api_key: Option<String>,
}

/// Builder for configuring a single expectation
pub struct MockExpectationBuilder {
    config: Arc<Mutex<MockConfig>>,
    matcher: RequestMatcher,
}

impl MockExpectationBuilder {
    pub async fn respond_with(self, response: ResponseTemplate) {
        let mut config = self.config.lock().await;
        config.expectations.push(MockExpectation {
            matcher: self.matcher,
            response,
        });
    }
}

/// Mock provider that implements ProviderClient for testing
pub struct MockProvider {
    config: Arc<Mutex<MockConfig>>,
}

impl MockProvider {
    pub fn new() -> Self {
        Self {
            config: Arc::new(Mutex::new(MockConfig {
                expectations: Vec::new(),
                default_response: ResponseTemplate::new("Réponse simulée."),
                transcription_text: "Bonjour".to_string(),
                chat_failure: None,
                transcription_failure: None,
                speech_failure: None,
                chat_requests: Vec::new(),
                transcription_requests: Vec::new(),
                speech_requests: Vec::new(),
                last_api_key: None,
            })),
        }
    }

    /// Add a conditional response for a specific matcher
    pub fn when(&self, matcher: RequestMatcher) -> MockExpectationBuilder {
        MockExpectationBuilder {
            config: self.config.clone(),
            matcher,
        }
    }

    /// Set the response for requests that don't match any expectation
    pub async fn set_default_response(&self, response: ResponseTemplate) {
        let mut config = self.config.lock().await;
        config.default_response = response;
    }

    /// Set the text returned by transcription calls
    pub async fn set_transcription_text(&self, text: impl Into<String>) {
        let mut config = self.config.lock().await;
        config.transcription_text = text.into();
    }

    /// Make every chat completion fail until cleared
    pub async fn fail_chat(&self, failure: MockFailure) {
        let mut config = self.config.lock().await;
        config.chat_failure = Some(failure);
    }

    /// Make every transcription fail until cleared
    pub async fn fail_transcription(&self, failure: MockFailure) {
        let mut config = self.config.lock().await;
        config.transcription_failure = Some(failure);
    }

    /// Make every speech synthesis fail until cleared
    pub async fn fail_speech(&self, failure: MockFailure) {
        let mut config = self.config.lock().await;
        config.speech_failure = Some(failure);
    }

    /// Chat requests seen so far, oldest first
    pub async fn chat_requests(&self) -> Vec<ChatCompletionParams> {
        self.config.lock().await.chat_requests.clone()
    }

    /// Transcription requests seen so far, oldest first
    pub async fn transcription_requests(&self) -> Vec<TranscriptionParams> {
        self.config.lock().await.transcription_requests.clone()
    }

    /// Speech requests seen so far, oldest first
    pub async fn speech_requests(&self) -> Vec<SpeechParams> {
        self.config.lock().await.speech_requests.clone()
    }

    /// API key presented by the most recent call
    pub async fn last_api_key(&self) -> Option<String> {
        self.config.lock().await.last_api_key.clone()
    }

    fn generate_chat_id() -> String {
        use std::collections::hash_map::DefaultHasher;
        use std::hash::{Hash, Hasher};
        let mut hasher = DefaultHasher::new();
        SystemTime::now().hash(&mut hasher);
        format!("chatcmpl-{:x}", hasher.finish())
    }

    fn current_timestamp() -> i64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_secs() as i64
    }
}

impl Default for MockProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ProviderClient for MockProvider {
    async fn chat_completion(
        &self,
        params: ChatCompletionParams,
        options: &CallOptions,
    ) -> Result<ChatCompletionResponse, ProviderError> {
        let response_template = {
            let mut config = self.config.lock().await;
            config.last_api_key = Some(options.api_key.as_str().to_string());
            config.chat_requests.push(params.clone());

            if let Some(failure) = &config.chat_failure {
                return Err(failure.to_error());
            }

            config
                .expectations
                .iter()
                .find(|exp| exp.matcher.matches(&params))
                .map(|exp| exp.response.clone())
                .unwrap_or_else(|| config.default_response.clone())
        };

        Ok(response_template.generate_response(
            Self::generate_chat_id(),
            Self::current_timestamp(),
            params.model,
        ))
    }

    async fn transcribe(
        &self,
        params: TranscriptionParams,
        options: &CallOptions,
    ) -> Result<TranscriptionResponse, ProviderError> {
        let mut config = self.config.lock().await;
        config.last_api_key = Some(options.api_key.as_str().to_string());
        config.transcription_requests.push(params.clone());

        if let Some(failure) = &config.transcription_failure {
            return Err(failure.to_error());
        }

        Ok(TranscriptionResponse {
            text: config.transcription_text.clone(),
            language: params.language,
            duration: Some(1.0),
            extra: serde_json::Map::new(),
        })
    }

    async fn synthesize(
        &self,
        params: SpeechParams,
        options: &CallOptions,
    ) -> Result<SpeechResponse, ProviderError> {
        let mut config = self.config.lock().await;
        config.last_api_key = Some(options.api_key.as_str().to_string());
        config.speech_requests.push(params.clone());

        if let Some(failure) = &config.speech_failure {
            return Err(failure.to_error());
        }

        Ok(SpeechResponse {
            audio_data: format!("mock-audio:{}", params.input).into_bytes(),
            content_type: "audio/mpeg".to_string(),
        })
    }
}
