//! Business services for the diabetes companion assistant.
//!
//! Each service lives in its own module with a `ports` submodule holding
//! the request/response types, the error enum and the service trait. The
//! HTTP layer depends on the traits only; implementations talk to the
//! model provider through [`provider::ProviderClient`] with per-call
//! credentials and deadlines.

pub mod analysis;
pub mod audio;
pub mod chat;
pub mod json_extract;
pub mod recipes;
pub mod vision;
pub mod voice;

pub use analysis::FoodAnalysisServiceImpl;
pub use audio::AudioServiceImpl;
pub use chat::ChatServiceImpl;
pub use recipes::RecipeServiceImpl;
pub use vision::VisionServiceImpl;
pub use voice::store::SessionStore;
pub use voice::VoiceSessionServiceImpl;
