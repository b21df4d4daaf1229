use crate::models::*;
use utoipa::OpenApi;

/// OpenAPI documentation configuration
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Diabetes Companion API",
        description = "Server-side AI orchestration for the diabetes companion app: food photo analysis, recipe generation, assistant chat, speech synthesis, transcription and realtime voice sessions.\n\nClients may supply their own OpenAI key in the `X-OpenAI-API-Key` header; otherwise the server-configured key is used.",
        version = "1.0.0",
        license(
            name = "MIT",
        )
    ),
    paths(
        // Health
        crate::routes::health::health_check,
        // Food analysis and recipes
        crate::routes::analysis::analyze_food,
        crate::routes::recipes::generate_recipe,
        // OpenAI proxy endpoints
        crate::routes::chat::chat,
        crate::routes::vision::analyze_image,
        crate::routes::speech::create_speech,
        crate::routes::transcription::transcribe,
        crate::routes::audio::transcribe_file,
        // Realtime voice sessions
        crate::routes::realtime::realtime_call,
        crate::routes::realtime::realtime_events,
    ),
    components(
        schemas(
            // Shared error shapes
            ApiError, AnalysisRejection, AnalysisFailure,
            // Request/response models
            ChatRequest, ChatResponse,
            RecipeRequest, RecipeResponse,
            VisionRequest, SpeechRequest,
            AudioTranscriptResponse,
            RealtimeRequest, RealtimeInitResponse, RealtimeTurnResponse,
            crate::routes::health::HealthResponse,
        ),
    )
    // No servers - let client determine the URL dynamically
)]
pub struct ApiDoc;
