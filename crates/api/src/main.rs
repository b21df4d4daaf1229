use api::{build_app, AppServices};
use config::{ApiConfig, LoggingConfig};
use provider::{CredentialResolver, OpenAiClient};
use services::{
    AudioServiceImpl, ChatServiceImpl, FoodAnalysisServiceImpl, RecipeServiceImpl, SessionStore,
    VisionServiceImpl, VoiceSessionServiceImpl,
};
use std::{sync::Arc, time::Duration};

#[tokio::main]
async fn main() {
    // Load configuration first to get logging settings
    let config = ApiConfig::load().unwrap_or_else(|e| {
        eprintln!("Failed to load configuration: {}", e);
        eprintln!("Application cannot start without a valid configuration.");
        std::process::exit(1);
    });

    // Initialize tracing with configuration from config.yaml
    init_tracing(&config.logging);

    let bind_address = format!("{}:{}", config.server.host, config.server.port);

    // One HTTP client shared by every provider call
    let provider = Arc::new(OpenAiClient::new(
        config.provider.base_url.clone(),
        Duration::from_secs(config.provider.connect_timeout_secs),
        Duration::from_secs(config.provider.pool_idle_timeout_secs),
    ));

    let credentials = CredentialResolver::new(config.provider.api_key.clone());
    if config.provider.api_key.is_some() {
        tracing::info!("Server-side OpenAI API key configured");
    } else {
        tracing::warn!(
            "No server-side OpenAI API key; clients must send their own X-OpenAI-API-Key"
        );
    }

    let session_store = Arc::new(SessionStore::new(&config.sessions));

    let models = &config.models;
    let services = AppServices {
        analysis_service: Arc::new(FoodAnalysisServiceImpl::new(
            provider.clone(),
            models.analysis.clone(),
        )),
        chat_service: Arc::new(ChatServiceImpl::new(provider.clone(), models.chat.clone())),
        recipe_service: Arc::new(RecipeServiceImpl::new(
            provider.clone(),
            models.recipe.clone(),
        )),
        vision_service: Arc::new(VisionServiceImpl::new(
            provider.clone(),
            models.vision.clone(),
        )),
        audio_service: Arc::new(AudioServiceImpl::new(
            provider.clone(),
            models.speech.clone(),
            models.transcription.clone(),
            models.file_transcription.clone(),
            config.audio.tmp_dir.clone(),
        )),
        voice_service: Arc::new(VoiceSessionServiceImpl::new(
            provider,
            session_store,
            models.realtime_chat.clone(),
            models.realtime_speech.clone(),
            models.transcription.clone(),
        )),
    };

    let app = build_app(
        services,
        credentials,
        Duration::from_secs(config.sessions.ping_interval_secs),
    );

    let listener = tokio::net::TcpListener::bind(&bind_address).await.unwrap();

    tracing::info!(address = %bind_address, "Server started successfully");
    tracing::info!("API Endpoints:");
    tracing::info!("  - POST /api/analyze-food (Food photo analysis)");
    tracing::info!("  - POST /api/generate-recipe (Recipe cards)");
    tracing::info!("  - POST /api/openai/chat (Assistant chat)");
    tracing::info!("  - POST /api/openai/vision (Image identification)");
    tracing::info!("  - POST /api/openai/speech (Text-to-speech)");
    tracing::info!("  - POST /api/openai/transcription (Verbose transcription)");
    tracing::info!("  - POST /api/openai/audio (File-staged transcription)");
    tracing::info!("  - POST/GET /api/openai/realtime (Voice sessions)");
    tracing::info!("  - GET /health (Health check)");
    tracing::info!("  - GET /docs (API documentation)");

    axum::serve(listener, app).await.unwrap();
}

fn init_tracing(logging_config: &LoggingConfig) {
    // Build the filter string from the logging configuration
    let mut filter = logging_config.level.clone();

    for (module, level) in &logging_config.modules {
        filter.push_str(&format!(",{}={}", module, level));
    }

    // Initialize tracing based on the format specified in config
    match logging_config.format.as_str() {
        "json" => {
            tracing_subscriber::fmt()
                .json()
                .with_env_filter(filter)
                .init();
        }
        "compact" => {
            tracing_subscriber::fmt()
                .compact()
                .with_env_filter(filter)
                .init();
        }
        _ => {
            tracing_subscriber::fmt()
                .pretty()
                .with_env_filter(filter)
                .init();
        }
    }
}
