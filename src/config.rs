//! Configuration management for Parley gateway
//!
//! Credentials and model identifiers are read from the environment once at
//! startup and shared read-only across requests.

use crate::{Error, Result};

/// Parley gateway configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Port to listen on
    pub port: u16,

    /// Groq configuration (transcription + chat completions)
    pub groq: GroqConfig,

    /// Cartesia configuration (speech synthesis)
    pub cartesia: CartesiaConfig,
}

/// Groq API configuration
#[derive(Debug, Clone)]
pub struct GroqConfig {
    /// API key (from `GROQ_API_KEY`)
    pub api_key: String,

    /// Base URL (from `GROQ_BASE_URL`, defaults to the public API)
    pub base_url: String,

    /// Whisper model for transcription
    pub stt_model: String,

    /// LLM model for chat completions
    pub chat_model: String,
}

/// Cartesia API configuration
#[derive(Debug, Clone)]
pub struct CartesiaConfig {
    /// API key (from `CARTESIA_API_KEY`)
    pub api_key: String,

    /// Base URL (from `CARTESIA_BASE_URL`, defaults to the public API)
    pub base_url: String,

    /// `Cartesia-Version` header value
    pub api_version: String,

    /// TTS model identifier
    pub model: String,

    /// TTS voice identifier
    pub voice_id: String,
}

impl Config {
    /// Load configuration from environment variables
    ///
    /// # Errors
    ///
    /// Returns error if a required API key is missing
    pub fn from_env(port: u16) -> Result<Self> {
        let groq_key = std::env::var("GROQ_API_KEY")
            .map_err(|_| Error::Config("GROQ_API_KEY not set".to_string()))?;
        let cartesia_key = std::env::var("CARTESIA_API_KEY")
            .map_err(|_| Error::Config("CARTESIA_API_KEY not set".to_string()))?;

        Ok(Self {
            port,
            groq: GroqConfig {
                api_key: groq_key,
                base_url: env_or("GROQ_BASE_URL", "https://api.groq.com"),
                stt_model: env_or("PARLEY_STT_MODEL", "whisper-large-v3"),
                chat_model: env_or("PARLEY_CHAT_MODEL", "llama3-8b-8192"),
            },
            cartesia: CartesiaConfig {
                api_key: cartesia_key,
                base_url: env_or("CARTESIA_BASE_URL", "https://api.cartesia.ai"),
                api_version: env_or("CARTESIA_VERSION", "2024-06-30"),
                model: env_or("PARLEY_TTS_MODEL", "sonic-multilingual"),
                voice_id: env_or("PARLEY_TTS_VOICE", "82fee20d-09de-4852-b2fb-5944addc0e62"),
            },
        })
    }
}

fn env_or(var: &str, default: &str) -> String {
    std::env::var(var).unwrap_or_else(|_| default.to_string())
}
