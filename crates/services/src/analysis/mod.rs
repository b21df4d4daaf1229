//! Food photo carbohydrate analysis.
//!
//! The photo is sent to the model as a base64 data URI together with a
//! nutritionist prompt that demands a five-key JSON reply. The reply is
//! then coerced field by field: anything missing or mistyped is replaced
//! with a fixed French default, and a reply with no usable JSON at all
//! degrades to an all-default payload. Callers therefore always get a
//! schema-complete result when the provider call itself succeeded.

pub mod ports;

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use config::CompletionProfile;
use provider::{
    ApiKey, CallOptions, ChatCompletionParams, ChatMessage, MessageRole, ProviderClient,
    ResponseFormat,
};
use serde_json::{json, Map, Value};

use ports::{AnalysisError, AnalyzeFoodRequest, FoodAnalysis, FoodAnalysisService};

const SYSTEM_PROMPT: &str = "Tu es un nutritionniste spécialisé dans le diabète. \
    Analyse les photos de nourriture et estime leur contenu en glucides. \
    Réponds UNIQUEMENT au format JSON avec les clés: foodItems, totalCarbs, carbsPerPortion, portionSize, tips.";

const USER_PROMPT: &str = "Analyse cette photo de nourriture. Identifie les aliments présents, \
    estime la quantité de glucides (en grammes) dans ce plat, et fournis des conseils pour un \
    diabétique qui voudrait consommer ce plat. Donne ta réponse au format JSON avec les clés \
    suivantes: foodItems (tableau des aliments identifiés), totalCarbs (estimation des glucides \
    totaux en grammes), carbsPerPortion (glucides par portion), portionSize (description de la \
    taille de portion), tips (conseils pour diabétiques).";

const DEFAULT_FOOD_ITEMS: &str = "Aliment non identifié";
const DEFAULT_PORTION: &str = "Portion standard";
const DEFAULT_TIPS: &str = "Consultez un professionnel de santé pour des conseils adaptés.";
const UNPARSEABLE_TIPS: &str =
    "Impossible d'analyser précisément. Consultez un professionnel de santé pour des conseils adaptés.";

pub struct FoodAnalysisServiceImpl {
    provider: Arc<dyn ProviderClient>,
    profile: CompletionProfile,
}

impl FoodAnalysisServiceImpl {
    pub fn new(provider: Arc<dyn ProviderClient>, profile: CompletionProfile) -> Self {
        Self { provider, profile }
    }
}

#[async_trait]
impl FoodAnalysisService for FoodAnalysisServiceImpl {
    async fn analyze(
        &self,
        request: AnalyzeFoodRequest,
        api_key: ApiKey,
    ) -> Result<FoodAnalysis, AnalysisError> {
        tracing::debug!(
            content_type = %request.content_type,
            image_bytes = request.image_bytes.len(),
            "analyzing food photo"
        );

        let image_url = format!(
            "data:{};base64,{}",
            request.content_type,
            BASE64.encode(&request.image_bytes)
        );

        let params = ChatCompletionParams {
            model: self.profile.model.clone(),
            messages: vec![
                ChatMessage::text(MessageRole::System, SYSTEM_PROMPT),
                ChatMessage::user_with_image(USER_PROMPT, image_url),
            ],
            max_tokens: self.profile.max_tokens,
            temperature: self.profile.temperature,
            response_format: Some(ResponseFormat::JsonObject),
            stream: false,
        };
        let options = CallOptions::new(api_key, Duration::from_secs(self.profile.timeout_secs));

        let response = self.provider.chat_completion(params, &options).await?;
        let analysis = coerce_analysis(response.content().unwrap_or_default());

        tracing::info!(model = %self.profile.model, "food analysis completed");
        Ok(analysis)
    }
}

/// Patch a model reply into a schema-complete analysis.
///
/// `foodItems` must be an array of strings, the two carb counts numbers,
/// `portionSize` and `tips` non-empty strings; each offending field is
/// replaced by its fixed default while every other field passes through.
/// Text with no usable JSON degrades to the all-default payload.
pub fn coerce_analysis(content: &str) -> FoodAnalysis {
    let Some(Value::Object(mut fields)) = crate::json_extract::extract_json_object(content) else {
        return FoodAnalysis(degraded_fields());
    };

    let items_valid = fields
        .get("foodItems")
        .and_then(Value::as_array)
        .is_some_and(|items| items.iter().all(Value::is_string));
    if !items_valid {
        fields.insert("foodItems".to_string(), json!([DEFAULT_FOOD_ITEMS]));
    }
    if !fields.get("totalCarbs").is_some_and(Value::is_number) {
        fields.insert("totalCarbs".to_string(), json!(0));
    }
    if !fields.get("carbsPerPortion").is_some_and(Value::is_number) {
        fields.insert("carbsPerPortion".to_string(), json!(0));
    }
    if !is_non_empty_string(fields.get("portionSize")) {
        fields.insert("portionSize".to_string(), json!(DEFAULT_PORTION));
    }
    if !is_non_empty_string(fields.get("tips")) {
        fields.insert("tips".to_string(), json!(DEFAULT_TIPS));
    }

    FoodAnalysis(fields)
}

fn is_non_empty_string(value: Option<&Value>) -> bool {
    value.and_then(Value::as_str).is_some_and(|s| !s.is_empty())
}

fn degraded_fields() -> Map<String, Value> {
    let mut fields = Map::new();
    fields.insert("foodItems".to_string(), json!([DEFAULT_FOOD_ITEMS]));
    fields.insert("totalCarbs".to_string(), json!(0));
    fields.insert("carbsPerPortion".to_string(), json!(0));
    fields.insert("portionSize".to_string(), json!(DEFAULT_PORTION));
    fields.insert("tips".to_string(), json!(UNPARSEABLE_TIPS));
    fields
}
