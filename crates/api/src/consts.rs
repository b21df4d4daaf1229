/// Header clients may use to supply their own OpenAI API key
pub const API_KEY_HEADER: &str = "x-openai-api-key";

/// Returned when neither the request nor the server configuration carries a key
pub const MSG_NO_API_KEY: &str =
    "Aucune clé API OpenAI disponible. Veuillez configurer une clé API dans les paramètres.";

/// Returned when the provider rejects the key (401/403)
pub const MSG_INVALID_API_KEY: &str =
    "Clé API OpenAI invalide ou expirée. Veuillez vérifier votre clé API dans les paramètres.";

/// Returned when a provider call exceeds its deadline
pub const MSG_TIMEOUT: &str = "La requête a pris trop de temps. Veuillez réessayer.";

/// Generic provider failure message
pub const MSG_PROVIDER_FAILURE: &str = "Erreur lors de la communication avec l'API OpenAI";
