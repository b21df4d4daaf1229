//! Speech synthesis and audio transcription.
//!
//! Two transcription paths exist: the direct one forwards the uploaded
//! bytes and asks for verbose JSON, while the file-based one stages the
//! clip under the configured tmp directory before sending it and returns
//! plain text. The staging file is removed afterwards even when the
//! provider call failed; only the removal itself failing is tolerated.

pub mod ports;


use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use config::{SpeechProfile, TranscriptionProfile};
use provider::{
    ApiKey, CallOptions, ProviderClient, SpeechParams, TranscriptionParams, TranscriptionResponse,
};

use ports::{AudioService, AudioServiceError, SpeechAudio, SpeechRequest, TranscribeRequest};

pub struct AudioServiceImpl {
    provider: Arc<dyn ProviderClient>,
    speech_profile: SpeechProfile,
    transcription_profile: TranscriptionProfile,
    file_profile: TranscriptionProfile,
    tmp_dir: PathBuf,
}

impl AudioServiceImpl {
    pub fn new(
        provider: Arc<dyn ProviderClient>,
        speech_profile: SpeechProfile,
        transcription_profile: TranscriptionProfile,
        file_profile: TranscriptionProfile,
        tmp_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            provider,
            speech_profile,
            transcription_profile,
            file_profile,
            tmp_dir: tmp_dir.into(),
        }
    }
}

#[async_trait]
impl AudioService for AudioServiceImpl {
    async fn synthesize(
        &self,
        request: SpeechRequest,
        api_key: ApiKey,
    ) -> Result<SpeechAudio, AudioServiceError> {
        let voice = request
            .voice
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| self.speech_profile.voice.clone());
        tracing::debug!(voice = %voice, chars = request.text.len(), "synthesizing speech");

        let params = SpeechParams {
            model: self.speech_profile.model.clone(),
            input: request.text,
            voice,
        };
        let options = CallOptions::new(
            api_key,
            Duration::from_secs(self.speech_profile.timeout_secs),
        );

        let response = self.provider.synthesize(params, &options).await?;
        tracing::info!(bytes = response.audio_data.len(), "speech synthesized");
        Ok(SpeechAudio {
            audio_data: response.audio_data,
            content_type: response.content_type,
        })
    }

    async fn transcribe(
        &self,
        request: TranscribeRequest,
        api_key: ApiKey,
    ) -> Result<TranscriptionResponse, AudioServiceError> {
        tracing::debug!(
            filename = %request.filename,
            bytes = request.audio_bytes.len(),
            "transcribing audio clip"
        );

        let params = TranscriptionParams {
            model: self.transcription_profile.model.clone(),
            file_bytes: request.audio_bytes,
            filename: request.filename,
            language: self.transcription_profile.language.clone(),
            response_format: Some("verbose_json".to_string()),
        };
        let options = CallOptions::new(
            api_key,
            Duration::from_secs(self.transcription_profile.timeout_secs),
        );

        let response = self.provider.transcribe(params, &options).await?;
        tracing::info!(chars = response.text.len(), "audio clip transcribed");
        Ok(response)
    }

    async fn transcribe_file(
        &self,
        request: TranscribeRequest,
        api_key: ApiKey,
    ) -> Result<String, AudioServiceError> {
        tokio::fs::create_dir_all(&self.tmp_dir)
            .await
            .map_err(AudioServiceError::TempDir)?;

        let staged_name = format!("audio_{}.mp3", chrono::Utc::now().timestamp_millis());
        let staged_path = self.tmp_dir.join(&staged_name);
        tokio::fs::write(&staged_path, &request.audio_bytes)
            .await
            .map_err(AudioServiceError::TempFile)?;
        tracing::debug!(path = %staged_path.display(), "staged audio file for transcription");

        let file_bytes = tokio::fs::read(&staged_path)
            .await
            .map_err(AudioServiceError::TempFile)?;

        let params = TranscriptionParams {
            model: self.file_profile.model.clone(),
            file_bytes,
            filename: staged_name,
            language: self.file_profile.language.clone(),
            response_format: Some("text".to_string()),
        };
        let options = CallOptions::new(
            api_key,
            Duration::from_secs(self.file_profile.timeout_secs),
        );
        let result = self.provider.transcribe(params, &options).await;

        if let Err(err) = tokio::fs::remove_file(&staged_path).await {
            tracing::warn!(
                path = %staged_path.display(),
                error = %err,
                "failed to remove staged audio file"
            );
        }

        let response = result?;
        tracing::info!(chars = response.text.len(), "audio file transcribed");
        Ok(response.text)
    }
}
