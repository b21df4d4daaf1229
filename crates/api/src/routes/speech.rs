//! Text-to-speech route

use crate::{
    consts::{MSG_INVALID_API_KEY, MSG_NO_API_KEY, MSG_TIMEOUT},
    models::{ApiError, SpeechRequest},
    routes::resolve_api_key,
};
use axum::{
    body::Body,
    extract::{Json, State},
    http::{header, HeaderMap, StatusCode},
    response::{Json as ResponseJson, Response},
};
use provider::CredentialResolver;
use services::audio::ports::{
    AudioService, AudioServiceError, SpeechRequest as ServiceSpeechRequest,
};
use std::sync::Arc;
use tracing::debug;

/// State for the speech synthesis route
#[derive(Clone)]
pub struct SpeechRouteState {
    pub audio_service: Arc<dyn AudioService>,
    pub credentials: CredentialResolver,
}

/// Synthesize speech from text
///
/// Returns the generated audio as a binary body with the provider's
/// content type (MP3 by default).
#[utoipa::path(
    post,
    path = "/api/openai/speech",
    tag = "OpenAI",
    request_body = SpeechRequest,
    responses(
        (status = 200, description = "Binary audio", content_type = "audio/mpeg"),
        (status = 400, description = "Text missing", body = ApiError),
        (status = 401, description = "Missing or rejected API key", body = ApiError),
        (status = 500, description = "Provider failure", body = ApiError),
        (status = 504, description = "Provider timeout", body = ApiError)
    )
)]
pub async fn create_speech(
    State(state): State<SpeechRouteState>,
    headers: HeaderMap,
    Json(request): Json<SpeechRequest>,
) -> Result<Response, (StatusCode, ResponseJson<ApiError>)> {
    let text = request.text.filter(|t| !t.trim().is_empty()).ok_or((
        StatusCode::BAD_REQUEST,
        ResponseJson(ApiError::new("Le texte est requis".to_string())),
    ))?;

    let api_key = resolve_api_key(&state.credentials, &headers).ok_or((
        StatusCode::UNAUTHORIZED,
        ResponseJson(ApiError::new(MSG_NO_API_KEY.to_string())),
    ))?;

    debug!(chars = text.len(), voice = ?request.voice, "speech synthesis request");

    let speech_request = ServiceSpeechRequest {
        text,
        voice: request.voice,
    };
    match state.audio_service.synthesize(speech_request, api_key).await {
        Ok(speech) => Ok(Response::builder()
            .status(StatusCode::OK)
            .header(header::CONTENT_TYPE, speech.content_type)
            .body(Body::from(speech.audio_data))
            .unwrap()),
        Err(AudioServiceError::Timeout) => Err((
            StatusCode::GATEWAY_TIMEOUT,
            ResponseJson(ApiError::new(MSG_TIMEOUT.to_string())),
        )),
        Err(AudioServiceError::InvalidKey) => Err((
            StatusCode::UNAUTHORIZED,
            ResponseJson(ApiError::new(MSG_INVALID_API_KEY.to_string())),
        )),
        Err(err) => {
            tracing::error!(error = %err, "speech synthesis failed");
            Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                ResponseJson(ApiError::new(
                    "Une erreur est survenue lors de la génération audio".to_string(),
                )),
            ))
        }
    }
}
