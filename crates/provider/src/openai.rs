//! OpenAI-compatible provider client
//!
//! Talks to any provider that implements OpenAI's API format: chat
//! completions, audio transcription and speech synthesis. The API key and
//! the deadline are per call, not per client, because each incoming request
//! may carry its own key and each operation has its own timeout.

use crate::credentials::CallOptions;
use crate::models::{
    detect_audio_content_type, ChatCompletionParams, ChatCompletionResponse, ProviderError,
    SpeechParams, SpeechResponse, TranscriptionParams, TranscriptionResponse,
};
use crate::ProviderClient;
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use reqwest::Client;
use std::time::Duration;
use tracing::debug;

pub struct OpenAiClient {
    client: Client,
    base_url: String,
}

impl OpenAiClient {
    /// `base_url` points at the API root, e.g. `https://api.openai.com/v1`.
    /// Connection setup and idle pooling get their own budgets; the total
    /// deadline of each call comes from its [`CallOptions`].
    pub fn new(
        base_url: impl Into<String>,
        connect_timeout: Duration,
        pool_idle_timeout: Duration,
    ) -> Self {
        let client = Client::builder()
            .connect_timeout(connect_timeout)
            .pool_idle_timeout(pool_idle_timeout)
            .build()
            .expect("Failed to create HTTP client");

        Self {
            client,
            base_url: base_url.into(),
        }
    }

    fn build_headers(&self, options: &CallOptions) -> Result<HeaderMap, ProviderError> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let auth_value = format!("Bearer {}", options.api_key.as_str());
        let header_value = HeaderValue::from_str(&auth_value)
            .map_err(|e| ProviderError::InvalidRequest(format!("Invalid API key format: {e}")))?;
        headers.insert("Authorization", header_value);

        Ok(headers)
    }

    fn map_send_error(error: reqwest::Error, timeout: Duration) -> ProviderError {
        if error.is_timeout() {
            ProviderError::Timeout {
                timeout_secs: timeout.as_secs(),
            }
        } else {
            ProviderError::Transport(error.to_string())
        }
    }

    async fn error_from_response(response: reqwest::Response) -> ProviderError {
        let status_code = response.status().as_u16();
        let error_text = response
            .text()
            .await
            .unwrap_or_else(|e| format!("Failed to read error response body: {e}"));
        ProviderError::Http {
            status_code,
            message: extract_error_message(&error_text),
        }
    }
}

#[async_trait]
impl ProviderClient for OpenAiClient {
    async fn chat_completion(
        &self,
        params: ChatCompletionParams,
        options: &CallOptions,
    ) -> Result<ChatCompletionResponse, ProviderError> {
        let url = format!("{}/chat/completions", self.base_url);
        let headers = self.build_headers(options)?;

        debug!(model = %params.model, url = %url, "sending chat completion request");

        let response = self
            .client
            .post(&url)
            .headers(headers)
            .timeout(options.timeout)
            .json(&params)
            .send()
            .await
            .map_err(|e| Self::map_send_error(e, options.timeout))?;

        if !response.status().is_success() {
            return Err(Self::error_from_response(response).await);
        }

        let raw_bytes = response
            .bytes()
            .await
            .map_err(|e| ProviderError::Transport(e.to_string()))?;

        serde_json::from_slice(&raw_bytes)
            .map_err(|e| ProviderError::InvalidResponse(format!("Failed to parse response: {e}")))
    }

    async fn transcribe(
        &self,
        params: TranscriptionParams,
        options: &CallOptions,
    ) -> Result<TranscriptionResponse, ProviderError> {
        let url = format!("{}/audio/transcriptions", self.base_url);

        let content_type = detect_audio_content_type(&params.filename);
        let file_part = reqwest::multipart::Part::bytes(params.file_bytes)
            .file_name(params.filename.clone())
            .mime_str(content_type)
            .map_err(|e| ProviderError::InvalidRequest(e.to_string()))?;

        let mut form = reqwest::multipart::Form::new()
            .part("file", file_part)
            .text("model", params.model.clone());

        if let Some(language) = params.language {
            form = form.text("language", language);
        }

        let wants_text = params.response_format.as_deref() == Some("text");
        if let Some(response_format) = params.response_format {
            form = form.text("response_format", response_format);
        }

        let mut headers = self.build_headers(options)?;
        // reqwest sets the multipart boundary itself
        headers.remove(CONTENT_TYPE);

        debug!(model = %params.model, filename = %params.filename, "sending transcription request");

        let response = self
            .client
            .post(&url)
            .headers(headers)
            .multipart(form)
            .timeout(options.timeout)
            .send()
            .await
            .map_err(|e| Self::map_send_error(e, options.timeout))?;

        if !response.status().is_success() {
            return Err(Self::error_from_response(response).await);
        }

        if wants_text {
            let text = response
                .text()
                .await
                .map_err(|e| ProviderError::Transport(e.to_string()))?;
            return Ok(TranscriptionResponse::from_text(text));
        }

        response
            .json()
            .await
            .map_err(|e| ProviderError::InvalidResponse(format!("Failed to parse response: {e}")))
    }

    async fn synthesize(
        &self,
        params: SpeechParams,
        options: &CallOptions,
    ) -> Result<SpeechResponse, ProviderError> {
        let url = format!("{}/audio/speech", self.base_url);
        let headers = self.build_headers(options)?;

        debug!(model = %params.model, voice = %params.voice, "sending speech synthesis request");

        let response = self
            .client
            .post(&url)
            .headers(headers)
            .timeout(options.timeout)
            .json(&params)
            .send()
            .await
            .map_err(|e| Self::map_send_error(e, options.timeout))?;

        if !response.status().is_success() {
            return Err(Self::error_from_response(response).await);
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("audio/mpeg")
            .to_string();

        let audio_data = response
            .bytes()
            .await
            .map_err(|e| ProviderError::Transport(e.to_string()))?
            .to_vec();

        Ok(SpeechResponse {
            audio_data,
            content_type,
        })
    }
}

/// Pull the human-readable message out of a provider error body.
///
/// OpenAI-format errors look like `{"error": {"message": "...", ...}}`;
/// anything else is returned verbatim.
fn extract_error_message(error_text: &str) -> String {
    if let Ok(value) = serde_json::from_str::<serde_json::Value>(error_text) {
        if let Some(message) = value
            .get("error")
            .and_then(|e| e.get("message"))
            .and_then(|m| m.as_str())
        {
            return message.to_string();
        }
    }
    error_text.to_string()
}
