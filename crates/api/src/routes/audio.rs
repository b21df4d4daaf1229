//! File-staged transcription route

use crate::{
    consts::{MSG_INVALID_API_KEY, MSG_NO_API_KEY, MSG_TIMEOUT},
    models::{ApiError, AudioTranscriptResponse},
    routes::resolve_api_key,
};
use axum::{
    extract::{Multipart, State},
    http::{HeaderMap, StatusCode},
    response::Json as ResponseJson,
};
use provider::CredentialResolver;
use services::audio::ports::{AudioService, AudioServiceError, TranscribeRequest};
use std::sync::Arc;
use tracing::debug;

/// State for the file-staged transcription route
#[derive(Clone)]
pub struct AudioRouteState {
    pub audio_service: Arc<dyn AudioService>,
    pub credentials: CredentialResolver,
}

/// Transcribe an uploaded audio file to plain text
///
/// Accepts a multipart form with a `file` field. The upload is staged on
/// disk before being sent to the provider, and the staging file is removed
/// afterwards whether or not the call succeeded.
#[utoipa::path(
    post,
    path = "/api/openai/audio",
    tag = "OpenAI",
    responses(
        (status = 200, description = "Plain-text transcript", body = AudioTranscriptResponse),
        (status = 400, description = "Audio file missing", body = ApiError),
        (status = 401, description = "Missing or rejected API key", body = ApiError),
        (status = 500, description = "Provider or file system failure", body = ApiError),
        (status = 504, description = "Provider timeout", body = ApiError)
    )
)]
pub async fn transcribe_file(
    State(state): State<AudioRouteState>,
    headers: HeaderMap,
    mut multipart: Multipart,
) -> Result<ResponseJson<AudioTranscriptResponse>, (StatusCode, ResponseJson<ApiError>)> {
    let mut audio_bytes: Option<Vec<u8>> = None;
    let mut filename: Option<String> = None;

    while let Some(field) = multipart.next_field().await.map_err(|_| {
        (
            StatusCode::BAD_REQUEST,
            ResponseJson(ApiError::new(
                "Impossible de lire les données du formulaire".to_string(),
            )),
        )
    })? {
        if field.name() == Some("file") {
            filename = field.file_name().map(|name| name.to_string());
            audio_bytes = Some(
                field
                    .bytes()
                    .await
                    .map_err(|_| {
                        (
                            StatusCode::BAD_REQUEST,
                            ResponseJson(ApiError::new(
                                "Impossible de lire les données du formulaire".to_string(),
                            )),
                        )
                    })?
                    .to_vec(),
            );
        }
    }

    let Some(audio_bytes) = audio_bytes else {
        return Err((
            StatusCode::BAD_REQUEST,
            ResponseJson(ApiError::new("Fichier audio requis".to_string())),
        ));
    };

    let api_key = resolve_api_key(&state.credentials, &headers).ok_or((
        StatusCode::UNAUTHORIZED,
        ResponseJson(ApiError::new(MSG_NO_API_KEY.to_string())),
    ))?;

    debug!(bytes = audio_bytes.len(), "file transcription request");

    let request = TranscribeRequest {
        audio_bytes,
        filename: filename.unwrap_or_else(|| "audio.mp3".to_string()),
    };
    match state.audio_service.transcribe_file(request, api_key).await {
        Ok(text) => Ok(ResponseJson(AudioTranscriptResponse { text })),
        Err(AudioServiceError::Timeout) => Err((
            StatusCode::GATEWAY_TIMEOUT,
            ResponseJson(ApiError::new(MSG_TIMEOUT.to_string())),
        )),
        Err(AudioServiceError::InvalidKey) => Err((
            StatusCode::UNAUTHORIZED,
            ResponseJson(ApiError::new(MSG_INVALID_API_KEY.to_string())),
        )),
        Err(AudioServiceError::TempDir(err)) => {
            tracing::error!(error = %err, "temp directory creation failed");
            Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                ResponseJson(ApiError::new(
                    "Impossible de créer le dossier temporaire".to_string(),
                )),
            ))
        }
        Err(AudioServiceError::TempFile(err)) => {
            tracing::error!(error = %err, "temp audio staging failed");
            Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                ResponseJson(ApiError::new(
                    "Impossible de traiter le fichier audio".to_string(),
                )),
            ))
        }
        Err(AudioServiceError::Provider(message)) => {
            tracing::error!(error = %message, "file transcription failed");
            Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                ResponseJson(ApiError::new("Erreur de transcription audio".to_string())),
            ))
        }
    }
}
