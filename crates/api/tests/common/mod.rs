//! Shared harness for the end-to-end tests.
//!
//! Builds the full application router over the scripted mock provider so
//! tests drive real HTTP traffic (JSON, multipart, headers) without a
//! live OpenAI key.

#![allow(dead_code)]

use api::{build_app, AppServices};
use axum_test::TestServer;
use config::{ModelsConfig, SessionStoreConfig};
use provider::mock::MockProvider;
use provider::CredentialResolver;
use services::{
    AudioServiceImpl, ChatServiceImpl, FoodAnalysisServiceImpl, RecipeServiceImpl, SessionStore,
    VisionServiceImpl, VoiceSessionServiceImpl,
};
use std::sync::Arc;
use std::time::Duration;

/// Fallback API key configured on the test server.
pub const SERVER_API_KEY: &str = "sk-server-fallback";

/// Build a test server with `SERVER_API_KEY` as the configured fallback.
pub async fn setup_test_server() -> (TestServer, Arc<MockProvider>) {
    build_test_server(Some(SERVER_API_KEY.to_string()))
}

/// Build a test server with no fallback key: requests must bring their own.
pub async fn setup_keyless_server() -> (TestServer, Arc<MockProvider>) {
    build_test_server(None)
}

fn build_test_server(fallback_key: Option<String>) -> (TestServer, Arc<MockProvider>) {
    let mock = Arc::new(MockProvider::new());
    let models = ModelsConfig::default();
    let store = Arc::new(SessionStore::new(&SessionStoreConfig::default()));
    let tmp_dir = std::env::temp_dir().join("diabetes-api-e2e");

    let services = AppServices {
        analysis_service: Arc::new(FoodAnalysisServiceImpl::new(mock.clone(), models.analysis)),
        chat_service: Arc::new(ChatServiceImpl::new(mock.clone(), models.chat)),
        recipe_service: Arc::new(RecipeServiceImpl::new(mock.clone(), models.recipe)),
        vision_service: Arc::new(VisionServiceImpl::new(mock.clone(), models.vision)),
        audio_service: Arc::new(AudioServiceImpl::new(
            mock.clone(),
            models.speech,
            models.transcription.clone(),
            models.file_transcription,
            tmp_dir,
        )),
        voice_service: Arc::new(VoiceSessionServiceImpl::new(
            mock.clone(),
            store,
            models.realtime_chat,
            models.realtime_speech,
            models.transcription,
        )),
    };

    let app = build_app(
        services,
        CredentialResolver::new(fallback_key),
        Duration::from_secs(30),
    );
    let server = TestServer::new(app).expect("failed to build the test server");
    (server, mock)
}
