//! E2E tests for recipe card generation (/api/generate-recipe)

mod common;

use common::*;
use provider::mock::{MockFailure, ResponseTemplate};
use serde_json::json;

#[tokio::test]
async fn test_generate_recipe_success() {
    let (server, mock) = setup_test_server().await;
    mock.set_default_response(ResponseTemplate::new(
        r#"{"category": "Desserts", "carbs": 18,
            "description": "Un tiramisu allégé en sucre, à consommer en petite portion.",
            "portion": "1 part (100g)", "imageQuery": "tiramisu café mascarpone"}"#,
    ))
    .await;

    let response = server
        .post("/api/generate-recipe")
        .json(&json!({"name": "Tiramisu"}))
        .await;

    assert_eq!(
        response.status_code(),
        200,
        "recipe generation should succeed: {}",
        response.text()
    );
    let body: serde_json::Value = response.json();
    assert_eq!(body["name"], "Tiramisu");
    assert_eq!(body["category"], "Desserts");
    assert_eq!(body["carbs"], json!(18));
    assert_eq!(body["portion"], "1 part (100g)");
    assert!(body["description"].as_str().unwrap().contains("tiramisu"));
    assert!(body["imageUrl"]
        .as_str()
        .unwrap()
        .starts_with("https://images.unsplash.com/"));
}

#[tokio::test]
async fn test_generate_recipe_clamps_unknown_category() {
    let (server, mock) = setup_test_server().await;
    mock.set_default_response(ResponseTemplate::new(
        r#"{"category": "Cuisine fusion", "carbs": 12}"#,
    ))
    .await;

    let response = server
        .post("/api/generate-recipe")
        .json(&json!({"name": "Bol mystère"}))
        .await;

    assert_eq!(response.status_code(), 200);
    let body: serde_json::Value = response.json();
    assert_eq!(body["category"], "Plats principaux");
}

#[tokio::test]
async fn test_generate_recipe_requires_name() {
    let (server, mock) = setup_test_server().await;

    let response = server.post("/api/generate-recipe").json(&json!({})).await;

    assert_eq!(response.status_code(), 400);
    let body: serde_json::Value = response.json();
    assert_eq!(body["error"], "Le nom de la recette est requis");
    assert!(mock.chat_requests().await.is_empty());
}

#[tokio::test]
async fn test_generate_recipe_rejects_blank_name() {
    let (server, _mock) = setup_test_server().await;

    let response = server
        .post("/api/generate-recipe")
        .json(&json!({"name": "   "}))
        .await;

    assert_eq!(response.status_code(), 400);
    let body: serde_json::Value = response.json();
    assert_eq!(body["error"], "Le nom de la recette est requis");
}

#[tokio::test]
async fn test_generate_recipe_unparseable_reply_carries_raw_content() {
    let (server, mock) = setup_test_server().await;
    mock.set_default_response(ResponseTemplate::new(
        "Je ne peux pas générer cette recette.",
    ))
    .await;

    let response = server
        .post("/api/generate-recipe")
        .json(&json!({"name": "Tiramisu"}))
        .await;

    assert_eq!(response.status_code(), 500);
    let body: serde_json::Value = response.json();
    assert_eq!(body["error"], "Impossible de générer la recette");
    assert_eq!(body["rawContent"], "Je ne peux pas générer cette recette.");
}

#[tokio::test]
async fn test_generate_recipe_without_any_api_key() {
    let (server, _mock) = setup_keyless_server().await;

    let response = server
        .post("/api/generate-recipe")
        .json(&json!({"name": "Tiramisu"}))
        .await;

    assert_eq!(response.status_code(), 401);
    let body: serde_json::Value = response.json();
    assert_eq!(
        body["error"],
        "Aucune clé API OpenAI disponible. Veuillez configurer une clé API dans les paramètres."
    );
}

#[tokio::test]
async fn test_generate_recipe_timeout() {
    let (server, mock) = setup_test_server().await;
    mock.fail_chat(MockFailure::Timeout { timeout_secs: 30 })
        .await;

    let response = server
        .post("/api/generate-recipe")
        .json(&json!({"name": "Tiramisu"}))
        .await;

    assert_eq!(response.status_code(), 504);
    let body: serde_json::Value = response.json();
    assert_eq!(
        body["error"],
        "La requête a pris trop de temps. Veuillez réessayer."
    );
}

#[tokio::test]
async fn test_generate_recipe_provider_failure() {
    let (server, mock) = setup_test_server().await;
    mock.fail_chat(MockFailure::Http {
        status_code: 500,
        message: "internal error".to_string(),
    })
    .await;

    let response = server
        .post("/api/generate-recipe")
        .json(&json!({"name": "Tiramisu"}))
        .await;

    assert_eq!(response.status_code(), 500);
    let body: serde_json::Value = response.json();
    assert_eq!(body["error"], "Erreur lors de la communication avec l'API OpenAI");
}
