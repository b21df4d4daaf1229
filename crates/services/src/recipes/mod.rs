//! Recipe card generation from a dish name.
//!
//! The model is asked for a strict JSON card (category, carbs per 100g,
//! description, portion, image query). The category is clamped to the six
//! known values; carbs, description and portion pass through untyped so a
//! sloppy reply still yields a usable card. The illustration is picked
//! locally from the Unsplash catalog in [`images`].

pub mod images;
pub mod ports;

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use config::CompletionProfile;
use provider::{ApiKey, CallOptions, ChatCompletionParams, ChatMessage, MessageRole, ProviderClient};
use serde_json::Value;

use crate::json_extract::extract_json_object;
use ports::{Recipe, RecipeError, RecipeService};

const SYSTEM_PROMPT: &str = "Tu es un expert en nutrition spécialisé dans le diabète.";

/// The six categories a recipe may land in; the first doubles as the
/// fallback for anything the model invents.
const CATEGORIES: &[&str] = &[
    "Plats principaux",
    "Desserts",
    "Petit-déjeuner",
    "Collations",
    "Soupes et salades",
    "Accompagnements",
];

pub struct RecipeServiceImpl {
    provider: Arc<dyn ProviderClient>,
    profile: CompletionProfile,
}

impl RecipeServiceImpl {
    pub fn new(provider: Arc<dyn ProviderClient>, profile: CompletionProfile) -> Self {
        Self { provider, profile }
    }
}

#[async_trait]
impl RecipeService for RecipeServiceImpl {
    async fn generate(&self, name: &str, api_key: ApiKey) -> Result<Recipe, RecipeError> {
        tracing::debug!(recipe = %name, "generating recipe card");

        let params = ChatCompletionParams {
            model: self.profile.model.clone(),
            messages: vec![
                ChatMessage::text(MessageRole::System, SYSTEM_PROMPT),
                ChatMessage::text(MessageRole::User, build_prompt(name)),
            ],
            max_tokens: self.profile.max_tokens,
            temperature: self.profile.temperature,
            response_format: None,
            stream: false,
        };
        let options = CallOptions::new(api_key, Duration::from_secs(self.profile.timeout_secs));

        let response = self.provider.chat_completion(params, &options).await?;
        let content = response.content().unwrap_or_default();

        let Some(Value::Object(mut fields)) = extract_json_object(content) else {
            return Err(RecipeError::Unparseable {
                raw_content: content.to_string(),
            });
        };

        let category = clamp_category(fields.get("category").and_then(Value::as_str));
        let image_query = fields
            .get("imageQuery")
            .and_then(Value::as_str)
            .map(str::to_string);
        let image_url = images::find_recipe_image(name, category, image_query.as_deref());

        tracing::info!(recipe = %name, category, "recipe card generated");

        Ok(Recipe {
            name: name.to_string(),
            category: category.to_string(),
            carbs: fields.remove("carbs"),
            description: fields.remove("description"),
            portion: fields.remove("portion"),
            image_url,
        })
    }
}

fn build_prompt(name: &str) -> String {
    format!(
        "Analyse le nom de cette recette: \"{name}\" et génère des informations détaillées pour une personne diabétique.\n\
         Détermine à quelle catégorie elle appartient parmi ces options strictement: \"Plats principaux\", \"Desserts\", \"Petit-déjeuner\", \"Collations\", \"Soupes et salades\", \"Accompagnements\".\n\
         Estime sa teneur en glucides pour 100g, sa portion standard et écris une description détaillée.\n\
         Réponds uniquement au format JSON suivant:\n\
         {{\n  \"category\": \"une des catégories mentionnées ci-dessus\",\n  \"carbs\": nombre (teneur en glucides pour 100g),\n  \"description\": \"description détaillée de la recette avec conseils pour diabétiques\",\n  \"portion\": \"description de la portion standard (ex: 200g, 1 part, etc.)\",\n  \"imageQuery\": \"termes de recherche pour trouver une image pertinente de ce plat (ingrédients principaux, type de plat)\"\n}}"
    )
}

fn clamp_category(candidate: Option<&str>) -> &'static str {
    candidate
        .and_then(|value| CATEGORIES.iter().find(|known| **known == value))
        .copied()
        .unwrap_or(CATEGORIES[0])
}

#[cfg(test)]
mod tests {
    use super::*;
    use provider::mock::{MockProvider, ResponseTemplate};
    use provider::MessageContent;
    use serde_json::json;

    fn test_profile() -> CompletionProfile {
        CompletionProfile {
            model: "gpt-4o".to_string(),
            max_tokens: Some(500),
            temperature: None,
            timeout_secs: 30,
        }
    }

    #[tokio::test]
    async fn test_generate_builds_recipe_card() {
        let mock = Arc::new(MockProvider::new());
        mock.set_default_response(ResponseTemplate::new(
            r#"{"category": "Desserts", "carbs": 18,
                "description": "Un tiramisu allégé en sucre, à consommer en petite portion.",
                "portion": "1 part (100g)", "imageQuery": "tiramisu café mascarpone"}"#,
        ))
        .await;
        let service = RecipeServiceImpl::new(mock.clone(), test_profile());

        let recipe = service
            .generate("Tiramisu", ApiKey::new("sk-test"))
            .await
            .unwrap();
        assert_eq!(recipe.name, "Tiramisu");
        assert_eq!(recipe.category, "Desserts");
        assert_eq!(recipe.carbs, Some(json!(18)));
        assert_eq!(recipe.portion, Some(json!("1 part (100g)")));
        assert!(recipe.image_url.contains("photo-1571877227200-a0d98ea2dda9"));

        let requests = mock.chat_requests().await;
        let params = &requests[0];
        assert_eq!(params.model, "gpt-4o");
        assert_eq!(params.max_tokens, Some(500));
        assert!(params.temperature.is_none());
        assert!(params.response_format.is_none());
        let MessageContent::Text(prompt) = &params.messages[1].content else {
            panic!("expected a text user message");
        };
        assert!(prompt.contains("Analyse le nom de cette recette: \"Tiramisu\""));
        assert!(prompt.contains("\"imageQuery\""));
    }

    #[tokio::test]
    async fn test_generate_clamps_unknown_category() {
        let mock = Arc::new(MockProvider::new());
        mock.set_default_response(ResponseTemplate::new(
            r#"{"category": "Cuisine fusion", "carbs": 12}"#,
        ))
        .await;
        let service = RecipeServiceImpl::new(mock, test_profile());

        let recipe = service
            .generate("Bol mystère", ApiKey::new("sk-test"))
            .await
            .unwrap();
        assert_eq!(recipe.category, "Plats principaux");
    }

    #[tokio::test]
    async fn test_generate_unparseable_reply_keeps_raw_content() {
        let mock = Arc::new(MockProvider::new());
        mock.set_default_response(ResponseTemplate::new(
            "Je ne peux pas générer cette recette.",
        ))
        .await;
        let service = RecipeServiceImpl::new(mock, test_profile());

        let err = service
            .generate("Tiramisu", ApiKey::new("sk-test"))
            .await
            .unwrap_err();
        match err {
            RecipeError::Unparseable { raw_content } => {
                assert_eq!(raw_content, "Je ne peux pas générer cette recette.");
            }
            other => panic!("expected Unparseable, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_generate_passes_untyped_fields_through() {
        let mock = Arc::new(MockProvider::new());
        mock.set_default_response(ResponseTemplate::new(
            r#"{"category": "Desserts", "carbs": "environ 20g", "portion": null}"#,
        ))
        .await;
        let service = RecipeServiceImpl::new(mock, test_profile());

        let recipe = service
            .generate("Douceur", ApiKey::new("sk-test"))
            .await
            .unwrap();
        assert_eq!(recipe.carbs, Some(json!("environ 20g")));
        assert_eq!(recipe.portion, Some(Value::Null));
        assert!(recipe.description.is_none());
    }
}
