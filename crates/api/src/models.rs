use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;

/// Generic error payload shared by most endpoints.
///
/// Only `error` is always present; `details`, `status` and `rawContent`
/// are filled in per endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ApiError {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    /// Raw model output when a response could not be parsed into JSON
    #[serde(rename = "rawContent", skip_serializing_if = "Option::is_none")]
    pub raw_content: Option<String>,
}

impl ApiError {
    pub fn new(error: String) -> Self {
        Self {
            error,
            details: None,
            status: None,
            raw_content: None,
        }
    }

    pub fn with_details(error: String, details: String) -> Self {
        Self {
            error,
            details: Some(details),
            status: None,
            raw_content: None,
        }
    }

    pub fn with_raw_content(error: String, raw_content: String) -> Self {
        Self {
            error,
            details: None,
            status: None,
            raw_content: Some(raw_content),
        }
    }

    /// Tags the payload with `"status": "error"` for clients that switch on it.
    pub fn status_error(mut self) -> Self {
        self.status = Some("error".to_string());
        self
    }
}

/// Rejection body for food analysis requests that never reach the model
/// (bad form data, missing key).
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct AnalysisRejection {
    pub success: bool,
    pub error: String,
}

impl AnalysisRejection {
    pub fn new(error: String) -> Self {
        Self {
            success: false,
            error,
        }
    }
}

/// Failure body for food analysis requests that reached the provider but
/// failed. Mirrors the success shape so clients can render it as a result
/// card, with zeroed carbs and an explanatory marker in `foodItems`.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisFailure {
    pub success: bool,
    pub error: String,
    pub food_items: Vec<String>,
    pub total_carbs: i64,
    pub carbs_per_portion: i64,
    pub portion_size: String,
    pub tips: String,
}

impl AnalysisFailure {
    pub fn new(error: String, marker: String, tips: String) -> Self {
        Self {
            success: false,
            error,
            food_items: vec![marker],
            total_carbs: 0,
            carbs_per_portion: 0,
            portion_size: "Inconnue".to_string(),
            tips,
        }
    }
}

/// Chat request body. `messages` is kept loose so malformed payloads get a
/// French 400 instead of axum's default deserialization error.
#[derive(Debug, Deserialize, ToSchema)]
pub struct ChatRequest {
    #[schema(value_type = Vec<Object>)]
    pub messages: Option<Value>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ChatResponse {
    pub message: String,
    pub status: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct RecipeRequest {
    pub name: Option<String>,
}

/// Recipe card. `carbs`, `description` and `portion` pass through whatever
/// the model produced, including explicit nulls.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct RecipeResponse {
    pub name: String,
    pub category: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<Object>)]
    pub carbs: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<Object>)]
    pub description: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<Object>)]
    pub portion: Option<Value>,
    #[serde(rename = "imageUrl")]
    pub image_url: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct VisionRequest {
    /// Data URI or plain URL of the image to analyze
    #[serde(rename = "imageData")]
    pub image_data: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct SpeechRequest {
    pub text: Option<String>,
    pub voice: Option<String>,
}

/// Transcript of an uploaded audio file.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct AudioTranscriptResponse {
    pub text: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct RealtimeRequest {
    pub session_id: Option<String>,
    /// Base64-encoded audio for a voice turn; absent on initialization
    pub audio: Option<String>,
    /// Optional system prompt override applied on initialization
    pub prompt: Option<String>,
    pub format: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct RealtimeInitResponse {
    pub status: String,
    pub message: String,
}

impl RealtimeInitResponse {
    pub fn new() -> Self {
        Self {
            status: "session_initialized".to_string(),
            message: "Session initialisée avec succès".to_string(),
        }
    }
}

impl Default for RealtimeInitResponse {
    fn default() -> Self {
        Self::new()
    }
}

/// One completed voice turn: assistant text, synthesized audio (base64)
/// and the transcription of what the user said.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct RealtimeTurnResponse {
    pub status: String,
    pub text: String,
    pub audio: String,
    pub transcription: String,
}
