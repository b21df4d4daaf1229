//! E2E tests for the audio endpoints: /api/openai/speech,
//! /api/openai/transcription and /api/openai/audio

mod common;

use common::*;
use provider::mock::MockFailure;
use serde_json::json;

/// Small fake audio clip; the mock provider never decodes it
fn sample_clip() -> Vec<u8> {
    vec![0x1A, 0x45, 0xDF, 0xA3, 0x00, 0x01, 0x02, 0x03, 0x04, 0x05]
}

fn audio_form(field: &str, file_name: &str, mime: &str) -> axum_test::multipart::MultipartForm {
    axum_test::multipart::MultipartForm::new().add_part(
        field,
        axum_test::multipart::Part::bytes(sample_clip())
            .file_name(file_name)
            .mime_type(mime),
    )
}

// ============================================================================
// SPEECH SYNTHESIS (/api/openai/speech)
// ============================================================================

#[tokio::test]
async fn test_speech_returns_binary_audio() {
    let (server, _mock) = setup_test_server().await;

    let response = server
        .post("/api/openai/speech")
        .json(&json!({"text": "Bonjour"}))
        .await;

    assert_eq!(
        response.status_code(),
        200,
        "speech synthesis should succeed: {}",
        response.text()
    );
    assert_eq!(
        response
            .headers()
            .get("content-type")
            .unwrap()
            .to_str()
            .unwrap(),
        "audio/mpeg"
    );
    assert_eq!(response.as_bytes().as_ref(), b"mock-audio:Bonjour");
}

#[tokio::test]
async fn test_speech_uses_configured_default_voice() {
    let (server, mock) = setup_test_server().await;

    let response = server
        .post("/api/openai/speech")
        .json(&json!({"text": "Bonjour"}))
        .await;

    assert_eq!(response.status_code(), 200);
    let requests = mock.speech_requests().await;
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].voice, "alloy");
    assert_eq!(requests[0].model, "tts-1");
}

#[tokio::test]
async fn test_speech_voice_override() {
    let (server, mock) = setup_test_server().await;

    let response = server
        .post("/api/openai/speech")
        .json(&json!({"text": "Bonjour", "voice": "nova"}))
        .await;

    assert_eq!(response.status_code(), 200);
    assert_eq!(mock.speech_requests().await[0].voice, "nova");
}

#[tokio::test]
async fn test_speech_requires_text() {
    let (server, mock) = setup_test_server().await;

    let response = server.post("/api/openai/speech").json(&json!({})).await;

    assert_eq!(response.status_code(), 400);
    let body: serde_json::Value = response.json();
    assert_eq!(body["error"], "Le texte est requis");
    assert!(mock.speech_requests().await.is_empty());
}

#[tokio::test]
async fn test_speech_rejects_blank_text() {
    let (server, _mock) = setup_test_server().await;

    let response = server
        .post("/api/openai/speech")
        .json(&json!({"text": "   "}))
        .await;

    assert_eq!(response.status_code(), 400);
    let body: serde_json::Value = response.json();
    assert_eq!(body["error"], "Le texte est requis");
}

#[tokio::test]
async fn test_speech_without_any_api_key() {
    let (server, _mock) = setup_keyless_server().await;

    let response = server
        .post("/api/openai/speech")
        .json(&json!({"text": "Bonjour"}))
        .await;

    assert_eq!(response.status_code(), 401);
    let body: serde_json::Value = response.json();
    assert_eq!(
        body["error"],
        "Aucune clé API OpenAI disponible. Veuillez configurer une clé API dans les paramètres."
    );
}

#[tokio::test]
async fn test_speech_timeout() {
    let (server, mock) = setup_test_server().await;
    mock.fail_speech(MockFailure::Timeout { timeout_secs: 30 })
        .await;

    let response = server
        .post("/api/openai/speech")
        .json(&json!({"text": "Bonjour"}))
        .await;

    assert_eq!(response.status_code(), 504);
    let body: serde_json::Value = response.json();
    assert_eq!(
        body["error"],
        "La requête a pris trop de temps. Veuillez réessayer."
    );
}

#[tokio::test]
async fn test_speech_provider_failure() {
    let (server, mock) = setup_test_server().await;
    mock.fail_speech(MockFailure::Http {
        status_code: 500,
        message: "synthesis failed".to_string(),
    })
    .await;

    let response = server
        .post("/api/openai/speech")
        .json(&json!({"text": "Bonjour"}))
        .await;

    assert_eq!(response.status_code(), 500);
    let body: serde_json::Value = response.json();
    assert_eq!(
        body["error"],
        "Une erreur est survenue lors de la génération audio"
    );
}

// ============================================================================
// VERBOSE TRANSCRIPTION (/api/openai/transcription)
// ============================================================================

#[tokio::test]
async fn test_transcription_returns_verbose_payload() {
    let (server, mock) = setup_test_server().await;
    mock.set_transcription_text("Quels aliments me conseilles-tu ce soir ?")
        .await;

    let response = server
        .post("/api/openai/transcription")
        .multipart(audio_form("audio", "clip.webm", "audio/webm"))
        .await;

    assert_eq!(
        response.status_code(),
        200,
        "transcription should succeed: {}",
        response.text()
    );
    let body: serde_json::Value = response.json();
    assert_eq!(body["text"], "Quels aliments me conseilles-tu ce soir ?");
    assert_eq!(body["language"], "fr");
    assert_eq!(body["duration"], json!(1.0));

    // Verbose JSON with the configured language, original filename kept
    let requests = mock.transcription_requests().await;
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].model, "whisper-1");
    assert_eq!(requests[0].filename, "clip.webm");
    assert_eq!(requests[0].language.as_deref(), Some("fr"));
    assert_eq!(requests[0].response_format.as_deref(), Some("verbose_json"));
}

#[tokio::test]
async fn test_transcription_defaults_missing_filename() {
    let (server, mock) = setup_test_server().await;

    let response = server
        .post("/api/openai/transcription")
        .multipart(
            axum_test::multipart::MultipartForm::new().add_part(
                "audio",
                axum_test::multipart::Part::bytes(sample_clip()).mime_type("audio/webm"),
            ),
        )
        .await;

    assert_eq!(response.status_code(), 200);
    assert_eq!(mock.transcription_requests().await[0].filename, "audio.webm");
}

#[tokio::test]
async fn test_transcription_requires_audio_field() {
    let (server, mock) = setup_test_server().await;

    let response = server
        .post("/api/openai/transcription")
        .multipart(axum_test::multipart::MultipartForm::new().add_text("note", "rien"))
        .await;

    assert_eq!(response.status_code(), 400);
    let body: serde_json::Value = response.json();
    assert_eq!(body["error"], "Fichier audio requis");
    assert!(mock.transcription_requests().await.is_empty());
}

#[tokio::test]
async fn test_transcription_without_any_api_key() {
    let (server, _mock) = setup_keyless_server().await;

    let response = server
        .post("/api/openai/transcription")
        .multipart(audio_form("audio", "clip.webm", "audio/webm"))
        .await;

    assert_eq!(response.status_code(), 401);
    let body: serde_json::Value = response.json();
    assert_eq!(
        body["error"],
        "Aucune clé API OpenAI disponible. Veuillez configurer une clé API dans les paramètres."
    );
}

#[tokio::test]
async fn test_transcription_timeout() {
    let (server, mock) = setup_test_server().await;
    mock.fail_transcription(MockFailure::Timeout { timeout_secs: 30 })
        .await;

    let response = server
        .post("/api/openai/transcription")
        .multipart(audio_form("audio", "clip.webm", "audio/webm"))
        .await;

    assert_eq!(response.status_code(), 504);
    let body: serde_json::Value = response.json();
    assert_eq!(
        body["error"],
        "La requête a pris trop de temps. Veuillez réessayer."
    );
}

#[tokio::test]
async fn test_transcription_rejected_key() {
    let (server, mock) = setup_test_server().await;
    mock.fail_transcription(MockFailure::Http {
        status_code: 401,
        message: "invalid api key".to_string(),
    })
    .await;

    let response = server
        .post("/api/openai/transcription")
        .multipart(audio_form("audio", "clip.webm", "audio/webm"))
        .await;

    assert_eq!(response.status_code(), 401);
    let body: serde_json::Value = response.json();
    assert_eq!(
        body["error"],
        "Clé API OpenAI invalide ou expirée. Veuillez vérifier votre clé API dans les paramètres."
    );
}

// ============================================================================
// FILE-STAGED TRANSCRIPTION (/api/openai/audio)
// ============================================================================

#[tokio::test]
async fn test_audio_returns_plain_transcript() {
    let (server, mock) = setup_test_server().await;
    mock.set_transcription_text("Note vocale sur mes repas.").await;

    let response = server
        .post("/api/openai/audio")
        .multipart(audio_form("file", "memo.mp3", "audio/mpeg"))
        .await;

    assert_eq!(
        response.status_code(),
        200,
        "file transcription should succeed: {}",
        response.text()
    );
    let body: serde_json::Value = response.json();
    assert_eq!(body, json!({"text": "Note vocale sur mes repas."}));

    // The clip goes through an on-disk staging file before upload
    let requests = mock.transcription_requests().await;
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].model, "whisper-large-v3");
    assert!(requests[0].filename.starts_with("audio_"));
    assert!(requests[0].filename.ends_with(".mp3"));
    assert_eq!(requests[0].response_format.as_deref(), Some("text"));
}

#[tokio::test]
async fn test_audio_requires_file_field() {
    let (server, _mock) = setup_test_server().await;

    let response = server
        .post("/api/openai/audio")
        .multipart(axum_test::multipart::MultipartForm::new().add_text("note", "rien"))
        .await;

    assert_eq!(response.status_code(), 400);
    let body: serde_json::Value = response.json();
    assert_eq!(body["error"], "Fichier audio requis");
}

#[tokio::test]
async fn test_audio_provider_failure() {
    let (server, mock) = setup_test_server().await;
    mock.fail_transcription(MockFailure::Http {
        status_code: 500,
        message: "transcription failed".to_string(),
    })
    .await;

    let response = server
        .post("/api/openai/audio")
        .multipart(audio_form("file", "memo.mp3", "audio/mpeg"))
        .await;

    assert_eq!(response.status_code(), 500);
    let body: serde_json::Value = response.json();
    assert_eq!(body["error"], "Erreur de transcription audio");
}

#[tokio::test]
async fn test_audio_timeout() {
    let (server, mock) = setup_test_server().await;
    mock.fail_transcription(MockFailure::Timeout { timeout_secs: 30 })
        .await;

    let response = server
        .post("/api/openai/audio")
        .multipart(audio_form("file", "memo.mp3", "audio/mpeg"))
        .await;

    assert_eq!(response.status_code(), 504);
    let body: serde_json::Value = response.json();
    assert_eq!(
        body["error"],
        "La requête a pris trop de temps. Veuillez réessayer."
    );
}
