//! Single-food image recognition.
//!
//! Unlike the photo analysis endpoint this one takes an already-encoded
//! image (data URI or URL), sends one combined text+image user message
//! and returns whatever JSON object the model produced, or a parse error
//! carrying the raw reply.

pub mod ports;

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use config::CompletionProfile;
use provider::{ApiKey, CallOptions, ChatCompletionParams, ChatMessage, ProviderClient};
use serde_json::{Map, Value};

use crate::json_extract::extract_json_object;
use ports::{VisionError, VisionService};

const PROMPT: &str = "Analyse cette image d'aliment pour un patient diabétique.\n\
    Identifie l'aliment, estime son poids en grammes si possible, et calcule sa teneur en glucides.\n\
    Réponds uniquement au format JSON suivant:\n\
    {\n  \"name\": \"nom de l'aliment\",\n  \"estimatedWeight\": nombre en grammes (optionnel),\n  \"carbs\": nombre de grammes de glucides,\n  \"details\": \"informations supplémentaires (optionnel)\"\n}";

pub struct VisionServiceImpl {
    provider: Arc<dyn ProviderClient>,
    profile: CompletionProfile,
}

impl VisionServiceImpl {
    pub fn new(provider: Arc<dyn ProviderClient>, profile: CompletionProfile) -> Self {
        Self { provider, profile }
    }
}

#[async_trait]
impl VisionService for VisionServiceImpl {
    async fn analyze_image(
        &self,
        image_data: String,
        api_key: ApiKey,
    ) -> Result<Map<String, Value>, VisionError> {
        tracing::debug!(payload_len = image_data.len(), "recognizing food image");

        let params = ChatCompletionParams {
            model: self.profile.model.clone(),
            messages: vec![ChatMessage::user_with_image(PROMPT, image_data)],
            max_tokens: self.profile.max_tokens,
            temperature: self.profile.temperature,
            response_format: None,
            stream: false,
        };
        let options = CallOptions::new(api_key, Duration::from_secs(self.profile.timeout_secs));

        let response = self.provider.chat_completion(params, &options).await?;
        let content = response.content().unwrap_or_default();

        match extract_json_object(content) {
            Some(Value::Object(fields)) => {
                tracing::info!(model = %self.profile.model, "food image recognized");
                Ok(fields)
            }
            _ => Err(VisionError::Parse {
                raw_content: content.to_string(),
            }),
        }
    }
}
