//! Speech-to-text route (verbose transcription)

use crate::{
    consts::{MSG_INVALID_API_KEY, MSG_NO_API_KEY, MSG_TIMEOUT},
    models::ApiError,
    routes::resolve_api_key,
};
use axum::{
    extract::{Multipart, State},
    http::{HeaderMap, StatusCode},
    response::Json as ResponseJson,
};
use provider::{CredentialResolver, TranscriptionResponse};
use services::audio::ports::{AudioService, AudioServiceError, TranscribeRequest};
use std::sync::Arc;
use tracing::debug;

/// State for the transcription route
#[derive(Clone)]
pub struct TranscriptionRouteState {
    pub audio_service: Arc<dyn AudioService>,
    pub credentials: CredentialResolver,
}

/// Transcribe an uploaded audio clip
///
/// Accepts a multipart form with an `audio` file and returns the provider's
/// verbose transcription (text, language, duration, segments).
#[utoipa::path(
    post,
    path = "/api/openai/transcription",
    tag = "OpenAI",
    responses(
        (status = 200, description = "Verbose transcription payload"),
        (status = 400, description = "Audio file missing", body = ApiError),
        (status = 401, description = "Missing or rejected API key", body = ApiError),
        (status = 500, description = "Provider failure", body = ApiError),
        (status = 504, description = "Provider timeout", body = ApiError)
    )
)]
pub async fn transcribe(
    State(state): State<TranscriptionRouteState>,
    headers: HeaderMap,
    mut multipart: Multipart,
) -> Result<ResponseJson<TranscriptionResponse>, (StatusCode, ResponseJson<ApiError>)> {
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
        if field.name() == Some("audio") {
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

    debug!(bytes = audio_bytes.len(), filename = ?filename, "transcription request");

    let request = TranscribeRequest {
        audio_bytes,
        filename: filename.unwrap_or_else(|| "audio.webm".to_string()),
    };
    match state.audio_service.transcribe(request, api_key).await {
        Ok(transcription) => Ok(ResponseJson(transcription)),
        Err(AudioServiceError::Timeout) => Err((
            StatusCode::GATEWAY_TIMEOUT,
            ResponseJson(ApiError::new(MSG_TIMEOUT.to_string())),
        )),
        Err(AudioServiceError::InvalidKey) => Err((
            StatusCode::UNAUTHORIZED,
            ResponseJson(ApiError::new(MSG_INVALID_API_KEY.to_string())),
        )),
        Err(err) => {
            tracing::error!(error = %err, "transcription failed");
            Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                ResponseJson(ApiError::new(
                    "Une erreur est survenue lors de la transcription audio".to_string(),
                )),
            ))
        }
    }
}
