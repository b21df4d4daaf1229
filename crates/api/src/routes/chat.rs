//! Diabetes assistant chat route

use crate::{
    consts::{MSG_INVALID_API_KEY, MSG_NO_API_KEY, MSG_TIMEOUT},
    models::{ApiError, ChatRequest, ChatResponse},
    routes::resolve_api_key,
};
use axum::{
    extract::{Json, State},
    http::{HeaderMap, StatusCode},
    response::Json as ResponseJson,
};
use provider::{ChatMessage, CredentialResolver};
use services::chat::ports::{ChatService, ChatServiceError};
use std::sync::Arc;
use tracing::debug;

/// State for the assistant chat route
#[derive(Clone)]
pub struct ChatRouteState {
    pub chat_service: Arc<dyn ChatService>,
    pub credentials: CredentialResolver,
}

/// Chat with the diabetes assistant
///
/// Takes the client-held conversation and returns the assistant's next
/// reply. The diabetes persona is applied server-side.
#[utoipa::path(
    post,
    path = "/api/openai/chat",
    tag = "OpenAI",
    request_body = ChatRequest,
    responses(
        (status = 200, description = "Assistant reply", body = ChatResponse),
        (status = 400, description = "Messages missing or not an array", body = ApiError),
        (status = 401, description = "Missing or rejected API key", body = ApiError),
        (status = 500, description = "Provider failure", body = ApiError),
        (status = 504, description = "Provider timeout", body = ApiError)
    )
)]
pub async fn chat(
    State(state): State<ChatRouteState>,
    headers: HeaderMap,
    Json(request): Json<ChatRequest>,
) -> Result<ResponseJson<ChatResponse>, (StatusCode, ResponseJson<ApiError>)> {
    let messages = request
        .messages
        .filter(|m| m.is_array())
        .and_then(|m| serde_json::from_value::<Vec<ChatMessage>>(m).ok())
        .ok_or((
            StatusCode::BAD_REQUEST,
            ResponseJson(ApiError::new("Messages invalides".to_string())),
        ))?;

    let api_key = resolve_api_key(&state.credentials, &headers).ok_or((
        StatusCode::UNAUTHORIZED,
        ResponseJson(ApiError::new(MSG_NO_API_KEY.to_string())),
    ))?;

    debug!(messages = messages.len(), "assistant chat request");

    match state.chat_service.respond(messages, api_key).await {
        Ok(message) => Ok(ResponseJson(ChatResponse {
            message,
            status: "success".to_string(),
        })),
        Err(err @ ChatServiceError::Timeout) => Err((
            StatusCode::GATEWAY_TIMEOUT,
            ResponseJson(ApiError::with_details(
                MSG_TIMEOUT.to_string(),
                err.to_string(),
            )),
        )),
        Err(ChatServiceError::InvalidKey) => Err((
            StatusCode::UNAUTHORIZED,
            ResponseJson(ApiError::new(MSG_INVALID_API_KEY.to_string())),
        )),
        Err(err) => {
            tracing::error!(error = %err, "assistant chat failed");
            Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                ResponseJson(
                    ApiError::with_details(
                        "Erreur de communication avec l'assistant".to_string(),
                        err.to_string(),
                    )
                    .status_error(),
                ),
            ))
        }
    }
}
