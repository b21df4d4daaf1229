//! Food photo analysis route

use crate::{
    consts::{MSG_INVALID_API_KEY, MSG_NO_API_KEY, MSG_PROVIDER_FAILURE, MSG_TIMEOUT},
    models::{AnalysisFailure, AnalysisRejection},
    routes::resolve_api_key,
};
use axum::{
    extract::{Multipart, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Json as ResponseJson, Response},
};
use provider::CredentialResolver;
use serde_json::{Map, Value};
use services::analysis::ports::{AnalysisError, AnalyzeFoodRequest, FoodAnalysisService};
use std::sync::Arc;
use tracing::debug;

/// State for the food analysis route
#[derive(Clone)]
pub struct AnalysisRouteState {
    pub analysis_service: Arc<dyn FoodAnalysisService>,
    pub credentials: CredentialResolver,
}

/// Analyze a food photo
///
/// Accepts a multipart form with an `image` file and returns estimated
/// nutritional content. The response always carries a `success` flag; on
/// provider failures the body keeps the result-card shape with zeroed
/// values so clients can render it directly.
#[utoipa::path(
    post,
    path = "/api/analyze-food",
    tag = "Analysis",
    responses(
        (status = 200, description = "Analysis result with success flag and nutritional fields"),
        (status = 400, description = "Invalid form data", body = AnalysisRejection),
        (status = 401, description = "Missing or rejected API key"),
        (status = 500, description = "Provider failure", body = AnalysisFailure),
        (status = 504, description = "Provider timeout", body = AnalysisFailure)
    )
)]
pub async fn analyze_food(
    State(state): State<AnalysisRouteState>,
    headers: HeaderMap,
    mut multipart: Multipart,
) -> Result<Response, (StatusCode, ResponseJson<AnalysisRejection>)> {
    let mut image_bytes: Option<Vec<u8>> = None;
    let mut content_type: Option<String> = None;

    while let Some(field) = multipart.next_field().await.map_err(|_| {
        (
            StatusCode::BAD_REQUEST,
            ResponseJson(AnalysisRejection::new(
                "Impossible de lire les données du formulaire".to_string(),
            )),
        )
    })? {
        if field.name() == Some("image") {
            content_type = field.content_type().map(|ct| ct.to_string());
            image_bytes = Some(
                field
                    .bytes()
                    .await
                    .map_err(|_| {
                        (
                            StatusCode::BAD_REQUEST,
                            ResponseJson(AnalysisRejection::new(
                                "Impossible de lire les données du formulaire".to_string(),
                            )),
                        )
                    })?
                    .to_vec(),
            );
        }
    }

    let Some(image_bytes) = image_bytes else {
        return Err((
            StatusCode::BAD_REQUEST,
            ResponseJson(AnalysisRejection::new("Aucune image fournie".to_string())),
        ));
    };
    let content_type = content_type.filter(|ct| ct.starts_with("image/")).ok_or((
        StatusCode::BAD_REQUEST,
        ResponseJson(AnalysisRejection::new(
            "Le fichier fourni n'est pas une image".to_string(),
        )),
    ))?;

    debug!(
        bytes = image_bytes.len(),
        content_type = %content_type,
        "food image received"
    );

    let Some(api_key) = resolve_api_key(&state.credentials, &headers) else {
        return Err((
            StatusCode::UNAUTHORIZED,
            ResponseJson(AnalysisRejection::new(MSG_NO_API_KEY.to_string())),
        ));
    };

    let request = AnalyzeFoodRequest {
        image_bytes,
        content_type,
    };
    match state.analysis_service.analyze(request, api_key).await {
        Ok(analysis) => {
            let mut body = Map::new();
            body.insert("success".to_string(), Value::Bool(true));
            body.extend(analysis.0);
            Ok(ResponseJson(Value::Object(body)).into_response())
        }
        Err(AnalysisError::Timeout) => Ok((
            StatusCode::GATEWAY_TIMEOUT,
            ResponseJson(AnalysisFailure::new(
                MSG_TIMEOUT.to_string(),
                "Erreur: timeout".to_string(),
                "Une erreur s'est produite. Veuillez réessayer plus tard.".to_string(),
            )),
        )
            .into_response()),
        Err(AnalysisError::InvalidKey) => Ok((
            StatusCode::UNAUTHORIZED,
            ResponseJson(AnalysisFailure::new(
                MSG_INVALID_API_KEY.to_string(),
                "Erreur d'authentification".to_string(),
                "Veuillez vérifier votre clé API dans les paramètres.".to_string(),
            )),
        )
            .into_response()),
        Err(AnalysisError::Provider(message)) => {
            tracing::error!(error = %message, "food analysis failed");
            Ok((
                StatusCode::INTERNAL_SERVER_ERROR,
                ResponseJson(AnalysisFailure::new(
                    MSG_PROVIDER_FAILURE.to_string(),
                    "Erreur de service".to_string(),
                    "Service temporairement indisponible. Veuillez réessayer plus tard.".to_string(),
                )),
            )
                .into_response())
        }
    }
}
