pub mod consts;
pub mod models;
pub mod openapi;
pub mod routes;

use crate::{
    openapi::ApiDoc,
    routes::{
        analysis::{analyze_food, AnalysisRouteState},
        audio::{transcribe_file, AudioRouteState},
        chat::{chat, ChatRouteState},
        health::health_check,
        realtime::{realtime_call, realtime_events, RealtimeRouteState},
        recipes::{generate_recipe, RecipeRouteState},
        speech::{create_speech, SpeechRouteState},
        transcription::{transcribe, TranscriptionRouteState},
        vision::{analyze_image, VisionRouteState},
    },
};
use axum::{
    http::{header, HeaderName, Method},
    response::Html,
    routing::{get, post},
    Router,
};
use provider::CredentialResolver;
use services::{
    analysis::ports::FoodAnalysisService, audio::ports::AudioService, chat::ports::ChatService,
    recipes::ports::RecipeService, vision::ports::VisionService,
    voice::ports::VoiceSessionService,
};
use std::{sync::Arc, time::Duration};
use tower_http::cors::{AllowOrigin, CorsLayer};
use utoipa::OpenApi;

/// The service objects behind the HTTP surface
#[derive(Clone)]
pub struct AppServices {
    pub analysis_service: Arc<dyn FoodAnalysisService>,
    pub chat_service: Arc<dyn ChatService>,
    pub recipe_service: Arc<dyn RecipeService>,
    pub vision_service: Arc<dyn VisionService>,
    pub audio_service: Arc<dyn AudioService>,
    pub voice_service: Arc<dyn VoiceSessionService>,
}

/// Build the complete application router
///
/// `credentials` resolves the per-request API key (header over configured
/// fallback) and `ping_interval` sets the cadence of SSE keep-alive pings
/// on the realtime event stream.
pub fn build_app(
    services: AppServices,
    credentials: CredentialResolver,
    ping_interval: Duration,
) -> Router {
    let analysis_routes = build_analysis_routes(services.analysis_service, credentials.clone());
    let recipe_routes = build_recipe_routes(services.recipe_service, credentials.clone());
    let chat_routes = build_chat_routes(services.chat_service, credentials.clone());
    let vision_routes = build_vision_routes(services.vision_service, credentials.clone());
    let speech_routes = build_speech_routes(services.audio_service.clone(), credentials.clone());
    let transcription_routes =
        build_transcription_routes(services.audio_service.clone(), credentials.clone());
    let audio_routes = build_audio_routes(services.audio_service, credentials.clone());
    let realtime_routes = build_realtime_routes(services.voice_service, credentials, ping_interval);

    // Build OpenAPI and documentation routes
    let openapi_routes = build_openapi_routes();

    Router::new()
        .route("/health", get(health_check))
        .nest(
            "/api",
            Router::new()
                .merge(analysis_routes)
                .merge(recipe_routes)
                .nest(
                    "/openai",
                    Router::new()
                        .merge(chat_routes)
                        .merge(vision_routes)
                        .merge(speech_routes)
                        .merge(transcription_routes)
                        .merge(audio_routes)
                        .merge(realtime_routes),
                ),
        )
        .merge(openapi_routes)
        .layer(cors_layer())
}

/// Uniform CORS policy for every endpoint, preflights included: echo the
/// caller's origin and allow the custom API key header.
pub fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(AllowOrigin::mirror_request())
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([
            header::CONTENT_TYPE,
            header::AUTHORIZATION,
            HeaderName::from_static("x-openai-api-key"),
            HeaderName::from_static("x-requested-with"),
        ])
        .max_age(Duration::from_secs(86400))
}

/// Build the food analysis route
pub fn build_analysis_routes(
    analysis_service: Arc<dyn FoodAnalysisService>,
    credentials: CredentialResolver,
) -> Router {
    let state = AnalysisRouteState {
        analysis_service,
        credentials,
    };

    Router::new()
        .route("/analyze-food", post(analyze_food))
        .with_state(state)
}

/// Build the recipe generation route
pub fn build_recipe_routes(
    recipe_service: Arc<dyn RecipeService>,
    credentials: CredentialResolver,
) -> Router {
    let state = RecipeRouteState {
        recipe_service,
        credentials,
    };

    Router::new()
        .route("/generate-recipe", post(generate_recipe))
        .with_state(state)
}

/// Build the assistant chat route
pub fn build_chat_routes(
    chat_service: Arc<dyn ChatService>,
    credentials: CredentialResolver,
) -> Router {
    let state = ChatRouteState {
        chat_service,
        credentials,
    };

    Router::new().route("/chat", post(chat)).with_state(state)
}

/// Build the vision route
pub fn build_vision_routes(
    vision_service: Arc<dyn VisionService>,
    credentials: CredentialResolver,
) -> Router {
    let state = VisionRouteState {
        vision_service,
        credentials,
    };

    Router::new()
        .route("/vision", post(analyze_image))
        .with_state(state)
}

/// Build the speech synthesis route
pub fn build_speech_routes(
    audio_service: Arc<dyn AudioService>,
    credentials: CredentialResolver,
) -> Router {
    let state = SpeechRouteState {
        audio_service,
        credentials,
    };

    Router::new()
        .route("/speech", post(create_speech))
        .with_state(state)
}

/// Build the verbose transcription route
pub fn build_transcription_routes(
    audio_service: Arc<dyn AudioService>,
    credentials: CredentialResolver,
) -> Router {
    let state = TranscriptionRouteState {
        audio_service,
        credentials,
    };

    Router::new()
        .route("/transcription", post(transcribe))
        .with_state(state)
}

/// Build the file-staged transcription route
pub fn build_audio_routes(
    audio_service: Arc<dyn AudioService>,
    credentials: CredentialResolver,
) -> Router {
    let state = AudioRouteState {
        audio_service,
        credentials,
    };

    Router::new()
        .route("/audio", post(transcribe_file))
        .with_state(state)
}

/// Build the realtime voice routes (POST exchange + GET event stream)
pub fn build_realtime_routes(
    voice_service: Arc<dyn VoiceSessionService>,
    credentials: CredentialResolver,
    ping_interval: Duration,
) -> Router {
    let state = RealtimeRouteState {
        voice_service,
        credentials,
        ping_interval,
    };

    Router::new()
        .route("/realtime", post(realtime_call).get(realtime_events))
        .with_state(state)
}

/// Build OpenAPI documentation routes
pub fn build_openapi_routes() -> Router {
    Router::new().route("/docs", get(swagger_ui_handler)).route(
        "/api-docs/openapi.json",
        get(|| async { axum::Json(ApiDoc::openapi()) }),
    )
}

/// Serve Swagger UI HTML page
async fn swagger_ui_handler() -> Html<String> {
    Html(r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <title>Diabetes Companion API Documentation</title>
    <link rel="stylesheet" type="text/css" href="https://unpkg.com/swagger-ui-dist@5.10.5/swagger-ui.css" />
    <style>
        html {
            box-sizing: border-box;
            overflow: -moz-scrollbars-vertical;
            overflow-y: scroll;
        }
        *, *:before, *:after {
            box-sizing: inherit;
        }
        body {
            margin:0;
            background: #fafafa;
        }
    </style>
</head>
<body>
    <div id="swagger-ui"></div>
    <script src="https://unpkg.com/swagger-ui-dist@5.10.5/swagger-ui-bundle.js"></script>
    <script src="https://unpkg.com/swagger-ui-dist@5.10.5/swagger-ui-standalone-preset.js"></script>
    <script>
    window.onload = function() {
        // Dynamically determine the server URL based on current location
        const protocol = window.location.protocol;
        const host = window.location.host;
        const baseUrl = `${protocol}//${host}`;

        // Fetch the OpenAPI spec and modify it to include the dynamic server
        fetch('/api-docs/openapi.json')
            .then(response => response.json())
            .then(spec => {
                // Add the current server to the spec
                spec.servers = [{
                    url: baseUrl,
                    description: 'Current Server'
                }];

                SwaggerUIBundle({
                    spec: spec,
                    dom_id: '#swagger-ui',
                    deepLinking: true,
                    presets: [
                        SwaggerUIBundle.presets.apis,
                        SwaggerUIStandalonePreset
                    ],
                    plugins: [
                        SwaggerUIBundle.plugins.DownloadUrl
                    ],
                    layout: "StandaloneLayout",
                    docExpansion: 'list',
                    requestInterceptor: function(req) {
                        console.log('Swagger UI Request:', req);
                        return req;
                    }
                });
            })
            .catch(error => {
                console.error('Failed to load OpenAPI spec:', error);
                // Fallback to URL-based loading if fetch fails
                SwaggerUIBundle({
                    url: '/api-docs/openapi.json',
                    dom_id: '#swagger-ui',
                    deepLinking: true,
                    presets: [
                        SwaggerUIBundle.presets.apis,
                        SwaggerUIStandalonePreset
                    ],
                    plugins: [
                        SwaggerUIBundle.plugins.DownloadUrl
                    ],
                    layout: "StandaloneLayout",
                    docExpansion: 'list',
                    requestInterceptor: function(req) {
                        console.log('Swagger UI Request:', req);
                        return req;
                    }
                });
            });
    };
    </script>
</body>
</html>"#.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::openapi::ApiDoc;

    #[test]
    fn test_openapi_spec_generation() {
        // Test that we can generate the OpenAPI spec without errors
        let spec = ApiDoc::openapi();

        // Basic validation
        assert_eq!(spec.info.title, "Diabetes Companion API");
        assert_eq!(spec.info.version, "1.0.0");

        // Ensure we have components defined
        assert!(spec.components.is_some());
        let components = spec.components.as_ref().unwrap();

        // Check that some of our schemas are present
        assert!(components.schemas.contains_key("ApiError"));
        assert!(components.schemas.contains_key("AnalysisFailure"));
        assert!(components.schemas.contains_key("ChatRequest"));
        assert!(components.schemas.contains_key("RecipeResponse"));
        assert!(components.schemas.contains_key("RealtimeTurnResponse"));
        assert!(components.schemas.contains_key("HealthResponse"));

        // Verify servers are not hardcoded (will be set dynamically on client)
        assert!(spec.servers.is_none() || spec.servers.as_ref().unwrap().is_empty());
    }

    #[test]
    fn test_swagger_ui_html_contains_required_elements() {
        // Test that the Swagger UI HTML contains the necessary elements
        use axum::response::Html;

        // Get the HTML response
        let html = tokio_test::block_on(swagger_ui_handler());
        let Html(html_content) = html;

        // Verify essential Swagger UI elements are present
        assert!(
            html_content.contains("swagger-ui"),
            "HTML should contain swagger-ui div"
        );
        assert!(
            html_content.contains("swagger-ui-bundle.js"),
            "HTML should include Swagger UI bundle"
        );
        assert!(
            html_content.contains("swagger-ui-standalone-preset.js"),
            "HTML should include standalone preset"
        );
        assert!(
            html_content.contains("/api-docs/openapi.json"),
            "HTML should reference our OpenAPI spec URL"
        );
        assert!(
            html_content.contains("Diabetes Companion API Documentation"),
            "HTML should have the correct title"
        );
        assert!(
            html_content.contains("SwaggerUIBundle"),
            "HTML should initialize SwaggerUIBundle"
        );
    }
}
