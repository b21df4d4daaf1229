//! Port definitions for food photo analysis.

use async_trait::async_trait;
use provider::{ApiKey, ProviderError};
use serde_json::{Map, Value};
use thiserror::Error;

/// One uploaded food photo.
#[derive(Debug, Clone)]
pub struct AnalyzeFoodRequest {
    /// Raw image bytes as received from the client.
    pub image_bytes: Vec<u8>,
    /// Client-reported content type, e.g. `image/jpeg`.
    pub content_type: String,
}

/// Schema-complete carbohydrate analysis.
///
/// The five canonical keys (`foodItems`, `totalCarbs`, `carbsPerPortion`,
/// `portionSize`, `tips`) are always present and correctly typed; any
/// extra fields the model produced are carried through untouched.
#[derive(Debug, Clone)]
pub struct FoodAnalysis(pub Map<String, Value>);

#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("analysis request timed out")]
    Timeout,
    #[error("the provider rejected the API key")]
    InvalidKey,
    #[error("provider call failed: {0}")]
    Provider(String),
}

impl From<ProviderError> for AnalysisError {
    fn from(err: ProviderError) -> Self {
        if err.is_timeout() {
            Self::Timeout
        } else if err.is_auth() {
            Self::InvalidKey
        } else {
            Self::Provider(err.to_string())
        }
    }
}

#[async_trait]
pub trait FoodAnalysisService: Send + Sync {
    /// Estimate the carbohydrate content of a meal photo.
    ///
    /// The result is always schema-complete: unusable model output
    /// degrades to fixed defaults instead of failing the call.
    async fn analyze(
        &self,
        request: AnalyzeFoodRequest,
        api_key: ApiKey,
    ) -> Result<FoodAnalysis, AnalysisError>;
}
