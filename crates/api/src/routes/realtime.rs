//! Voice session routes: HTTP turn exchange plus an SSE event channel

use crate::{
    consts::MSG_NO_API_KEY,
    models::{ApiError, RealtimeInitResponse, RealtimeRequest, RealtimeTurnResponse},
    routes::resolve_api_key,
};
use axum::{
    extract::{Json, Query, State},
    http::{HeaderMap, StatusCode},
    response::{
        sse::{Event, Sse},
        IntoResponse, Json as ResponseJson, Response,
    },
};
use chrono::Utc;
use futures::StreamExt;
use provider::CredentialResolver;
use serde::Deserialize;
use serde_json::json;
use services::voice::ports::{VoiceOutcome, VoiceRequest, VoiceSessionError, VoiceSessionService};
use std::convert::Infallible;
use std::sync::Arc;
use std::time::Duration;
use tokio_stream::wrappers::IntervalStream;
use tracing::debug;

/// State for the realtime voice routes
#[derive(Clone)]
pub struct RealtimeRouteState {
    pub voice_service: Arc<dyn VoiceSessionService>,
    pub credentials: CredentialResolver,
    /// Cadence of the SSE keep-alive pings
    pub ping_interval: Duration,
}

/// Run one realtime voice exchange
///
/// Without audio the call (re)initializes the session; with audio it runs a
/// full voice turn (transcribe, answer, synthesize) and returns the
/// assistant's text, its audio as base64 and the user transcription.
#[utoipa::path(
    post,
    path = "/api/openai/realtime",
    tag = "Realtime",
    request_body = RealtimeRequest,
    responses(
        (status = 200, description = "Initialization ack or completed voice turn", body = RealtimeTurnResponse),
        (status = 400, description = "Session id missing", body = ApiError),
        (status = 401, description = "Voice turn without any usable API key", body = ApiError),
        (status = 500, description = "A stage of the voice turn failed", body = ApiError)
    )
)]
pub async fn realtime_call(
    State(state): State<RealtimeRouteState>,
    headers: HeaderMap,
    Json(request): Json<RealtimeRequest>,
) -> Response {
    let Some(session_id) = request.session_id.filter(|id| !id.is_empty()) else {
        return (
            StatusCode::BAD_REQUEST,
            ResponseJson(ApiError::new("Identifiant de session manquant".to_string())),
        )
            .into_response();
    };

    let api_key = resolve_api_key(&state.credentials, &headers);
    let voice_request = VoiceRequest {
        session_id,
        audio: request.audio,
        prompt: request.prompt,
        format: request.format,
    };
    match state.voice_service.handle(voice_request, api_key).await {
        Ok(VoiceOutcome::SessionInitialized) => {
            ResponseJson(RealtimeInitResponse::new()).into_response()
        }
        Ok(VoiceOutcome::Turn(turn)) => ResponseJson(RealtimeTurnResponse {
            status: "success".to_string(),
            text: turn.text,
            audio: turn.audio,
            transcription: turn.transcription,
        })
        .into_response(),
        Err(VoiceSessionError::MissingKey) => (
            StatusCode::UNAUTHORIZED,
            ResponseJson(ApiError::new(MSG_NO_API_KEY.to_string())),
        )
            .into_response(),
        Err(err) => {
            tracing::error!(error = %err, "voice turn failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                ResponseJson(ApiError::new(format!(
                    "Erreur lors du traitement de l'audio: {err}"
                ))),
            )
                .into_response()
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct RealtimeEventsQuery {
    pub session_id: Option<String>,
}

/// Subscribe to session events
///
/// Opens an SSE stream that acknowledges the connection, then emits
/// periodic pings so proxies keep the connection alive. Voice exchanges
/// themselves go through the POST endpoint.
#[utoipa::path(
    get,
    path = "/api/openai/realtime",
    tag = "Realtime",
    params(
        ("session_id" = Option<String>, Query, description = "Session to subscribe to")
    ),
    responses(
        (status = 200, description = "SSE stream of connection ack and pings"),
        (status = 400, description = "Session id missing", body = ApiError)
    )
)]
pub async fn realtime_events(
    State(state): State<RealtimeRouteState>,
    Query(query): Query<RealtimeEventsQuery>,
) -> Response {
    let Some(session_id) = query.session_id.filter(|id| !id.is_empty()) else {
        return (
            StatusCode::BAD_REQUEST,
            ResponseJson(ApiError::new("Identifiant de session manquant".to_string())),
        )
            .into_response();
    };

    debug!(session_id = %session_id, "realtime event stream opened");

    let connected = json!({
        "type": "connection",
        "session_id": session_id,
        "status": "connected",
    });
    let hello = futures::stream::once(async move {
        Ok::<_, Infallible>(Event::default().data(connected.to_string()))
    });

    let period = state.ping_interval;
    let pings = IntervalStream::new(tokio::time::interval_at(
        tokio::time::Instant::now() + period,
        period,
    ))
    .map(|_| {
        let ping = json!({
            "type": "ping",
            "timestamp": Utc::now().timestamp_millis(),
        });
        Ok::<_, Infallible>(Event::default().data(ping.to_string()))
    });

    Sse::new(hello.chain(pings)).into_response()
}
