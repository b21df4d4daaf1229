//! Recipe card generation route

use crate::{
    consts::{MSG_INVALID_API_KEY, MSG_NO_API_KEY, MSG_PROVIDER_FAILURE, MSG_TIMEOUT},
    models::{ApiError, RecipeRequest, RecipeResponse},
    routes::resolve_api_key,
};
use axum::{
    extract::{Json, State},
    http::{HeaderMap, StatusCode},
    response::Json as ResponseJson,
};
use provider::CredentialResolver;
use services::recipes::ports::{RecipeError, RecipeService};
use std::sync::Arc;
use tracing::debug;

/// State for the recipe generation route
#[derive(Clone)]
pub struct RecipeRouteState {
    pub recipe_service: Arc<dyn RecipeService>,
    pub credentials: CredentialResolver,
}

/// Generate a recipe card from a dish name
///
/// Returns the model's estimate of category, carbs and portion for the
/// named dish, plus a stock illustration picked from the dish name.
#[utoipa::path(
    post,
    path = "/api/generate-recipe",
    tag = "Recipes",
    request_body = RecipeRequest,
    responses(
        (status = 200, description = "Generated recipe card", body = RecipeResponse),
        (status = 400, description = "Recipe name missing", body = ApiError),
        (status = 401, description = "Missing or rejected API key", body = ApiError),
        (status = 500, description = "Provider failure or unparseable reply", body = ApiError),
        (status = 504, description = "Provider timeout", body = ApiError)
    )
)]
pub async fn generate_recipe(
    State(state): State<RecipeRouteState>,
    headers: HeaderMap,
    Json(request): Json<RecipeRequest>,
) -> Result<ResponseJson<RecipeResponse>, (StatusCode, ResponseJson<ApiError>)> {
    let name = request
        .name
        .map(|n| n.trim().to_string())
        .filter(|n| !n.is_empty())
        .ok_or((
            StatusCode::BAD_REQUEST,
            ResponseJson(ApiError::new("Le nom de la recette est requis".to_string())),
        ))?;

    let api_key = resolve_api_key(&state.credentials, &headers).ok_or((
        StatusCode::UNAUTHORIZED,
        ResponseJson(ApiError::new(MSG_NO_API_KEY.to_string())),
    ))?;

    debug!(recipe = %name, "recipe generation request");

    match state.recipe_service.generate(&name, api_key).await {
        Ok(recipe) => Ok(ResponseJson(RecipeResponse {
            name: recipe.name,
            category: recipe.category,
            carbs: recipe.carbs,
            description: recipe.description,
            portion: recipe.portion,
            image_url: recipe.image_url,
        })),
        Err(RecipeError::Unparseable { raw_content }) => Err((
            StatusCode::INTERNAL_SERVER_ERROR,
            ResponseJson(ApiError::with_raw_content(
                "Impossible de générer la recette".to_string(),
                raw_content,
            )),
        )),
        Err(RecipeError::Timeout) => Err((
            StatusCode::GATEWAY_TIMEOUT,
            ResponseJson(ApiError::new(MSG_TIMEOUT.to_string())),
        )),
        Err(RecipeError::InvalidKey) => Err((
            StatusCode::UNAUTHORIZED,
            ResponseJson(ApiError::new(MSG_INVALID_API_KEY.to_string())),
        )),
        Err(RecipeError::Provider(message)) => {
            tracing::error!(error = %message, "recipe generation failed");
            Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                ResponseJson(ApiError::new(MSG_PROVIDER_FAILURE.to_string())),
            ))
        }
    }
}
