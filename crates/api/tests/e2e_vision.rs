//! E2E tests for data-URI food recognition (/api/openai/vision)

mod common;

use common::*;
use provider::mock::{MockFailure, ResponseTemplate};
use provider::{ContentPart, MessageContent};
use serde_json::json;

const DATA_URI: &str = "data:image/png;base64,iVBORw0KGgoAAAANSUhEUg==";

#[tokio::test]
async fn test_vision_success_tags_status() {
    let (server, mock) = setup_test_server().await;
    mock.set_default_response(ResponseTemplate::new(
        r#"{"name": "Pomme", "weight": "150g", "carbs": 21, "confidence": 0.9}"#,
    ))
    .await;

    let response = server
        .post("/api/openai/vision")
        .json(&json!({"imageData": DATA_URI}))
        .await;

    assert_eq!(
        response.status_code(),
        200,
        "vision analysis should succeed: {}",
        response.text()
    );
    let body: serde_json::Value = response.json();
    assert_eq!(body["status"], "success");
    assert_eq!(body["name"], "Pomme");
    assert_eq!(body["carbs"], json!(21));
    assert_eq!(body["confidence"], json!(0.9));

    // The payload is forwarded verbatim as the image URL
    let requests = mock.chat_requests().await;
    let MessageContent::Parts(parts) = &requests[0].messages[0].content else {
        panic!("expected a multi-part user message");
    };
    let ContentPart::ImageUrl { image_url } = &parts[1] else {
        panic!("expected an image part");
    };
    assert_eq!(image_url.url, DATA_URI);
}

#[tokio::test]
async fn test_vision_requires_image_data() {
    let (server, mock) = setup_test_server().await;

    let response = server.post("/api/openai/vision").json(&json!({})).await;

    assert_eq!(response.status_code(), 400);
    let body: serde_json::Value = response.json();
    assert_eq!(body["error"], "Données d'image requises");
    assert!(mock.chat_requests().await.is_empty());
}

#[tokio::test]
async fn test_vision_rejects_empty_image_data() {
    let (server, _mock) = setup_test_server().await;

    let response = server
        .post("/api/openai/vision")
        .json(&json!({"imageData": ""}))
        .await;

    assert_eq!(response.status_code(), 400);
    let body: serde_json::Value = response.json();
    assert_eq!(body["error"], "Données d'image requises");
}

#[tokio::test]
async fn test_vision_without_any_api_key() {
    let (server, _mock) = setup_keyless_server().await;

    let response = server
        .post("/api/openai/vision")
        .json(&json!({"imageData": DATA_URI}))
        .await;

    assert_eq!(response.status_code(), 401);
    let body: serde_json::Value = response.json();
    assert_eq!(
        body["error"],
        "Aucune clé API OpenAI disponible. Veuillez configurer une clé API dans les paramètres."
    );
    assert_eq!(body["status"], "error");
}

#[tokio::test]
async fn test_vision_unusable_reply_carries_raw_content() {
    let (server, mock) = setup_test_server().await;
    mock.set_default_response(ResponseTemplate::new(
        "Je ne vois pas d'aliment sur cette image.",
    ))
    .await;

    let response = server
        .post("/api/openai/vision")
        .json(&json!({"imageData": DATA_URI}))
        .await;

    assert_eq!(response.status_code(), 500);
    let body: serde_json::Value = response.json();
    assert_eq!(body["error"], "Impossible de parser la réponse");
    assert_eq!(body["rawContent"], "Je ne vois pas d'aliment sur cette image.");
    assert_eq!(body["status"], "error");
}

#[tokio::test]
async fn test_vision_timeout() {
    let (server, mock) = setup_test_server().await;
    mock.fail_chat(MockFailure::Timeout { timeout_secs: 30 })
        .await;

    let response = server
        .post("/api/openai/vision")
        .json(&json!({"imageData": DATA_URI}))
        .await;

    assert_eq!(response.status_code(), 504);
    let body: serde_json::Value = response.json();
    assert_eq!(
        body["error"],
        "La requête a pris trop de temps. Veuillez réessayer."
    );
    assert_eq!(body["status"], "error");
}

#[tokio::test]
async fn test_vision_provider_failure() {
    let (server, mock) = setup_test_server().await;
    mock.fail_chat(MockFailure::Http {
        status_code: 500,
        message: "internal error".to_string(),
    })
    .await;

    let response = server
        .post("/api/openai/vision")
        .json(&json!({"imageData": DATA_URI}))
        .await;

    assert_eq!(response.status_code(), 500);
    let body: serde_json::Value = response.json();
    assert_eq!(body["error"], "Erreur de traitement de l'image");
    assert_eq!(body["status"], "error");
}
