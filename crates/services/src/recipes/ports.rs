//! Port definitions for recipe generation.

use async_trait::async_trait;
use provider::{ApiKey, ProviderError};
use serde_json::Value;
use thiserror::Error;

/// Generated recipe card.
///
/// `carbs`, `description` and `portion` come straight from the model and
/// are passed through untyped; `None` means the model omitted the field.
#[derive(Debug, Clone)]
pub struct Recipe {
    pub name: String,
    pub category: String,
    pub carbs: Option<Value>,
    pub description: Option<Value>,
    pub portion: Option<Value>,
    pub image_url: String,
}

#[derive(Debug, Error)]
pub enum RecipeError {
    #[error("recipe request timed out")]
    Timeout,
    #[error("the provider rejected the API key")]
    InvalidKey,
    /// The reply held no JSON object to build a recipe from.
    #[error("no usable recipe JSON in the reply")]
    Unparseable { raw_content: String },
    #[error("provider call failed: {0}")]
    Provider(String),
}

impl From<ProviderError> for RecipeError {
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
pub trait RecipeService: Send + Sync {
    /// Build a diabetes-oriented recipe card from a dish name.
    async fn generate(&self, name: &str, api_key: ApiKey) -> Result<Recipe, RecipeError>;
}
