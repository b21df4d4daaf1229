//! Free-form image analysis route

use crate::{
    consts::{MSG_INVALID_API_KEY, MSG_NO_API_KEY, MSG_TIMEOUT},
    models::{ApiError, VisionRequest},
    routes::resolve_api_key,
};
use axum::{
    extract::{Json, State},
    http::{HeaderMap, StatusCode},
    response::Json as ResponseJson,
};
use provider::CredentialResolver;
use serde_json::Value;
use services::vision::ports::{VisionError, VisionService};
use std::sync::Arc;
use tracing::debug;

/// State for the vision route
#[derive(Clone)]
pub struct VisionRouteState {
    pub vision_service: Arc<dyn VisionService>,
    pub credentials: CredentialResolver,
}

/// Identify a food item from an image
///
/// Takes a data URI (or plain URL) and returns the model's identification
/// of the food with estimated weight and carbs, tagged `status: success`.
#[utoipa::path(
    post,
    path = "/api/openai/vision",
    tag = "OpenAI",
    request_body = VisionRequest,
    responses(
        (status = 200, description = "Identification payload tagged with status: success"),
        (status = 400, description = "Image data missing", body = ApiError),
        (status = 401, description = "Missing or rejected API key", body = ApiError),
        (status = 500, description = "Provider failure or unparseable reply", body = ApiError),
        (status = 504, description = "Provider timeout", body = ApiError)
    )
)]
pub async fn analyze_image(
    State(state): State<VisionRouteState>,
    headers: HeaderMap,
    Json(request): Json<VisionRequest>,
) -> Result<ResponseJson<Value>, (StatusCode, ResponseJson<ApiError>)> {
    let image_data = request.image_data.filter(|data| !data.is_empty()).ok_or((
        StatusCode::BAD_REQUEST,
        ResponseJson(ApiError::new("Données d'image requises".to_string())),
    ))?;

    let api_key = resolve_api_key(&state.credentials, &headers).ok_or((
        StatusCode::UNAUTHORIZED,
        ResponseJson(ApiError::new(MSG_NO_API_KEY.to_string()).status_error()),
    ))?;

    debug!(bytes = image_data.len(), "vision analysis request");

    match state.vision_service.analyze_image(image_data, api_key).await {
        Ok(mut fields) => {
            fields.insert("status".to_string(), Value::String("success".to_string()));
            Ok(ResponseJson(Value::Object(fields)))
        }
        Err(VisionError::Parse { raw_content }) => Err((
            StatusCode::INTERNAL_SERVER_ERROR,
            ResponseJson(
                ApiError::with_raw_content(
                    "Impossible de parser la réponse".to_string(),
                    raw_content,
                )
                .status_error(),
            ),
        )),
        Err(err @ VisionError::Timeout) => Err((
            StatusCode::GATEWAY_TIMEOUT,
            ResponseJson(
                ApiError::with_details(MSG_TIMEOUT.to_string(), err.to_string()).status_error(),
            ),
        )),
        Err(VisionError::InvalidKey) => Err((
            StatusCode::UNAUTHORIZED,
            ResponseJson(ApiError::new(MSG_INVALID_API_KEY.to_string()).status_error()),
        )),
        Err(VisionError::Provider(message)) => {
            tracing::error!(error = %message, "vision analysis failed");
            Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                ResponseJson(
                    ApiError::with_details(
                        "Erreur de traitement de l'image".to_string(),
                        message,
                    )
                    .status_error(),
                ),
            ))
        }
    }
}
