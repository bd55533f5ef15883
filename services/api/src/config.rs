use imaginethat_core::{FailurePolicy, media::voice_from_name, pipeline::DEFAULT_MAX_IDEAS};
use std::net::SocketAddr;
use std::time::Duration;
use tracing::Level;

/// A custom error type for configuration loading failures.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingVar(String),
    #[error("Invalid value for environment variable {0}: {1}")]
    InvalidValue(String, String),
}

/// Defines the supported backends for the idea pipeline.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Backend {
    OpenAI,
    /// Deterministic in-process backends; no API key needed.
    Mock,
}

/// Holds all configuration loaded from the environment at startup.
#[derive(Clone, Debug)]
pub struct Config {
    pub bind_address: SocketAddr,
    pub backend: Backend,
    pub openai_api_key: Option<String>,
    pub openai_api_base: String,
    pub chat_model: String,
    pub image_model: String,
    pub speech_model: String,
    pub speech_voice: String,
    pub max_ideas: usize,
    pub min_request_interval: Duration,
    pub failure_policy: FailurePolicy,
    pub log_level: Level,
}

impl Config {
    /// Loads configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Only load from .env in non-test mode to avoid contamination
        if !cfg!(test) {
            dotenvy::dotenv().ok();
        }

        let bind_address_str =
            std::env::var("BIND_ADDRESS").unwrap_or_else(|_| "0.0.0.0:3000".to_string());
        let bind_address = bind_address_str
            .parse::<SocketAddr>()
            .map_err(|e| ConfigError::InvalidValue("BIND_ADDRESS".to_string(), e.to_string()))?;

        let backend_str = std::env::var("BACKEND").unwrap_or_else(|_| "openai".to_string());
        let backend = match backend_str.to_lowercase().as_str() {
            "mock" => Backend::Mock,
            _ => Backend::OpenAI,
        };

        let openai_api_key = std::env::var("OPENAI_API_KEY").ok();
        let openai_api_base = std::env::var("OPENAI_API_BASE")
            .unwrap_or_else(|_| "https://api.openai.com/v1".to_string());

        let chat_model = std::env::var("CHAT_MODEL").unwrap_or_else(|_| "gpt-5-nano".to_string());
        let image_model =
            std::env::var("IMAGE_MODEL").unwrap_or_else(|_| "gpt-image-1-mini".to_string());
        let speech_model =
            std::env::var("SPEECH_MODEL").unwrap_or_else(|_| "gpt-4o-mini-tts".to_string());

        let speech_voice = std::env::var("SPEECH_VOICE").unwrap_or_else(|_| "alloy".to_string());
        if voice_from_name(&speech_voice).is_none() {
            return Err(ConfigError::InvalidValue(
                "SPEECH_VOICE".to_string(),
                format!("'{}' is not a supported voice", speech_voice),
            ));
        }

        let max_ideas = match std::env::var("MAX_IDEAS") {
            Ok(value) => match value.parse::<usize>() {
                Ok(n) if n > 0 => n,
                _ => {
                    return Err(ConfigError::InvalidValue(
                        "MAX_IDEAS".to_string(),
                        format!("'{}' is not a positive integer", value),
                    ));
                }
            },
            Err(_) => DEFAULT_MAX_IDEAS,
        };

        let interval_str =
            std::env::var("MIN_REQUEST_INTERVAL_SECS").unwrap_or_else(|_| "2".to_string());
        let min_request_interval = interval_str
            .parse::<u64>()
            .map(Duration::from_secs)
            .map_err(|e| {
                ConfigError::InvalidValue("MIN_REQUEST_INTERVAL_SECS".to_string(), e.to_string())
            })?;

        let policy_str =
            std::env::var("FAILURE_POLICY").unwrap_or_else(|_| "fail-fast".to_string());
        let failure_policy = match policy_str.to_lowercase().as_str() {
            "fail-fast" => FailurePolicy::FailFast,
            "fail-soft" => FailurePolicy::FailSoft,
            _ => {
                return Err(ConfigError::InvalidValue(
                    "FAILURE_POLICY".to_string(),
                    format!("'{}' is not 'fail-fast' or 'fail-soft'", policy_str),
                ));
            }
        };

        let log_level_str = std::env::var("RUST_LOG").unwrap_or_else(|_| "INFO".to_string());
        let log_level = log_level_str.parse::<Level>().map_err(|_| {
            ConfigError::InvalidValue(
                "RUST_LOG".to_string(),
                format!("'{}' is not a valid log level", log_level_str),
            )
        })?;

        if backend == Backend::OpenAI && openai_api_key.is_none() {
            return Err(ConfigError::MissingVar(
                "OPENAI_API_KEY must be set for the 'openai' backend".to_string(),
            ));
        }

        Ok(Self {
            bind_address,
            backend,
            openai_api_key,
            openai_api_base,
            chat_model,
            image_model,
            speech_model,
            speech_voice,
            max_ideas,
            min_request_interval,
            failure_policy,
            log_level,
        })
    }
}
