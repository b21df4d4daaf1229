//! Port definitions for single-food image recognition.

use async_trait::async_trait;
use provider::{ApiKey, ProviderError};
use serde_json::{Map, Value};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum VisionError {
    #[error("vision request timed out")]
    Timeout,
    #[error("the provider rejected the API key")]
    InvalidKey,
    /// The reply held no JSON object describing the food item.
    #[error("no usable JSON in the vision reply")]
    Parse { raw_content: String },
    #[error("provider call failed: {0}")]
    Provider(String),
}

impl From<ProviderError> for VisionError {
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
pub trait VisionService: Send + Sync {
    /// Identify the food item on an image and estimate its carbs.
    ///
    /// `image_data` is forwarded verbatim as the image URL, so both data
    /// URIs and plain HTTP URLs work. The parsed model JSON is returned
    /// as-is; there is no schema coercion on this endpoint.
    async fn analyze_image(
        &self,
        image_data: String,
        api_key: ApiKey,
    ) -> Result<Map<String, Value>, VisionError>;
}
