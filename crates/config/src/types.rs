use serde::Deserialize;
use std::{collections::HashMap, env};

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    pub server: ServerConfig,
    pub provider: ProviderConfig,
    pub models: ModelsConfig,
    pub sessions: SessionStoreConfig,
    pub audio: AudioConfig,
    pub logging: LoggingConfig,
}

impl ApiConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, String> {
        Ok(Self {
            server: ServerConfig::from_env()?,
            provider: ProviderConfig::from_env()?,
            models: ModelsConfig::from_env()?,
            sessions: SessionStoreConfig::from_env()?,
            audio: AudioConfig::from_env()?,
            logging: LoggingConfig::from_env()?,
        })
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            provider: ProviderConfig::default(),
            models: ModelsConfig::default(),
            sessions: SessionStoreConfig::default(),
            audio: AudioConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    /// Load from environment variables
    pub fn from_env() -> Result<Self, String> {
        Ok(Self {
            host: env::var("SERVER_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: env::var("SERVER_PORT")
                .unwrap_or_else(|_| "3000".to_string())
                .parse()
                .map_err(|_| "SERVER_PORT must be a valid port number")?,
        })
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
        }
    }
}

/// Upstream AI provider connection settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ProviderConfig {
    pub base_url: String,
    /// Fallback API key used when a request carries no `X-OpenAI-API-Key`
    /// header. Requests fail with 401 when both are absent.
    pub api_key: Option<String>,
    pub connect_timeout_secs: u64,
    pub pool_idle_timeout_secs: u64,
}

impl ProviderConfig {
    /// Load from environment variables
    pub fn from_env() -> Result<Self, String> {
        Ok(Self {
            base_url: env::var("OPENAI_BASE_URL")
                .unwrap_or_else(|_| "https://api.openai.com/v1".to_string()),
            api_key: env::var("OPENAI_API_KEY").ok().filter(|k| !k.is_empty()),
            connect_timeout_secs: env::var("PROVIDER_CONNECT_TIMEOUT_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(30),
            pool_idle_timeout_secs: env::var("PROVIDER_POOL_IDLE_TIMEOUT_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(90),
        })
    }
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.openai.com/v1".to_string(),
            api_key: env::var("OPENAI_API_KEY").ok().filter(|k| !k.is_empty()),
            connect_timeout_secs: 30,
            pool_idle_timeout_secs: 90,
        }
    }
}

/// Per-operation model profiles. Each endpoint keeps its own model,
/// token budget, temperature and timeout so none of them is hardcoded.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ModelsConfig {
    /// Food photo analysis (`/api/analyze-food`)
    pub analysis: CompletionProfile,
    /// Recipe generation (`/api/generate-recipe`)
    pub recipe: CompletionProfile,
    /// Assistant chat (`/api/openai/chat`)
    pub chat: CompletionProfile,
    /// Data-URI vision analysis (`/api/openai/vision`)
    pub vision: CompletionProfile,
    /// Chat stage of a voice turn (`/api/openai/realtime`)
    pub realtime_chat: CompletionProfile,
    /// Text-to-speech (`/api/openai/speech`)
    pub speech: SpeechProfile,
    /// Text-to-speech stage of a voice turn
    pub realtime_speech: SpeechProfile,
    /// Verbose transcription (`/api/openai/transcription`) and the
    /// transcription stage of a voice turn
    pub transcription: TranscriptionProfile,
    /// Temp-file transcription (`/api/openai/audio`)
    pub file_transcription: TranscriptionProfile,
}

impl ModelsConfig {
    /// Load from environment variables. Model profiles are file-configured;
    /// the environment path keeps the defaults.
    pub fn from_env() -> Result<Self, String> {
        Ok(Self::default())
    }
}

impl Default for ModelsConfig {
    fn default() -> Self {
        Self {
            analysis: CompletionProfile {
                model: "gpt-3.5-turbo".to_string(),
                max_tokens: Some(500),
                temperature: Some(0.5),
                timeout_secs: 30,
            },
            recipe: CompletionProfile {
                model: "gpt-4o".to_string(),
                max_tokens: Some(500),
                temperature: None,
                timeout_secs: 30,
            },
            chat: CompletionProfile {
                model: "gpt-3.5-turbo".to_string(),
                max_tokens: Some(800),
                temperature: Some(0.7),
                timeout_secs: 25,
            },
            vision: CompletionProfile {
                model: "gpt-3.5-turbo".to_string(),
                max_tokens: Some(300),
                temperature: None,
                timeout_secs: 30,
            },
            realtime_chat: CompletionProfile {
                model: "gpt-4o".to_string(),
                max_tokens: Some(500),
                temperature: Some(0.7),
                timeout_secs: 30,
            },
            speech: SpeechProfile {
                model: "tts-1".to_string(),
                voice: "alloy".to_string(),
                timeout_secs: 30,
            },
            realtime_speech: SpeechProfile {
                model: "tts-1".to_string(),
                voice: "shimmer".to_string(),
                timeout_secs: 30,
            },
            transcription: TranscriptionProfile {
                model: "whisper-1".to_string(),
                language: Some("fr".to_string()),
                timeout_secs: 30,
            },
            file_transcription: TranscriptionProfile {
                model: "whisper-large-v3".to_string(),
                language: Some("fr".to_string()),
                timeout_secs: 30,
            },
        }
    }
}

/// Chat-completion call profile
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CompletionProfile {
    pub model: String,
    pub max_tokens: Option<u32>,
    pub temperature: Option<f32>,
    pub timeout_secs: u64,
}

impl Default for CompletionProfile {
    fn default() -> Self {
        Self {
            model: "gpt-3.5-turbo".to_string(),
            max_tokens: None,
            temperature: None,
            timeout_secs: 30,
        }
    }
}

/// Speech-synthesis call profile
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SpeechProfile {
    pub model: String,
    pub voice: String,
    pub timeout_secs: u64,
}

impl Default for SpeechProfile {
    fn default() -> Self {
        Self {
            model: "tts-1".to_string(),
            voice: "alloy".to_string(),
            timeout_secs: 30,
        }
    }
}

/// Transcription call profile
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TranscriptionProfile {
    pub model: String,
    pub language: Option<String>,
    pub timeout_secs: u64,
}

impl Default for TranscriptionProfile {
    fn default() -> Self {
        Self {
            model: "whisper-1".to_string(),
            language: Some("fr".to_string()),
            timeout_secs: 30,
        }
    }
}

/// Voice session store limits
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SessionStoreConfig {
    pub max_sessions: u64,
    /// Hard lifetime of a session from creation
    pub ttl_secs: u64,
    /// Eviction after this long without any access
    pub idle_secs: u64,
    /// Keepalive ping cadence on the realtime event stream
    pub ping_interval_secs: u64,
}

impl SessionStoreConfig {
    /// Load from environment variables
    pub fn from_env() -> Result<Self, String> {
        Ok(Self {
            max_sessions: env::var("SESSION_MAX_COUNT")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(10_000),
            ttl_secs: env::var("SESSION_TTL_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(3600),
            idle_secs: env::var("SESSION_IDLE_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(1800),
            ping_interval_secs: env::var("SESSION_PING_INTERVAL_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(30),
        })
    }
}

impl Default for SessionStoreConfig {
    fn default() -> Self {
        Self {
            max_sessions: 10_000,
            ttl_secs: 3600,
            idle_secs: 1800,
            ping_interval_secs: 30,
        }
    }
}

/// Audio upload handling
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AudioConfig {
    /// Directory for temporary audio files, created on demand
    pub tmp_dir: String,
}

impl AudioConfig {
    /// Load from environment variables
    pub fn from_env() -> Result<Self, String> {
        Ok(Self {
            tmp_dir: env::var("AUDIO_TMP_DIR").unwrap_or_else(|_| "tmp".to_string()),
        })
    }
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            tmp_dir: "tmp".to_string(),
        }
    }
}

/// Logging Configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub format: String,
    pub modules: HashMap<String, String>,
}

impl LoggingConfig {
    /// Load from environment variables
    pub fn from_env() -> Result<Self, String> {
        let mut modules = HashMap::new();

        // Load module-specific log levels
        if let Ok(level) = env::var("LOG_MODULE_API") {
            modules.insert("api".to_string(), level);
        }
        if let Ok(level) = env::var("LOG_MODULE_SERVICES") {
            modules.insert("services".to_string(), level);
        }
        if let Ok(level) = env::var("LOG_MODULE_PROVIDER") {
            modules.insert("provider".to_string(), level);
        }

        Ok(Self {
            level: env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
            format: env::var("LOG_FORMAT").unwrap_or_else(|_| "pretty".to_string()),
            modules,
        })
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        let mut modules = HashMap::new();
        modules.insert("api".to_string(), "debug".to_string());
        modules.insert("services".to_string(), "debug".to_string());

        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
            modules,
        }
    }
}
