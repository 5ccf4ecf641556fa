//! Text-to-speech (TTS) processing

use serde::Serialize;

use crate::config::CartesiaConfig;
use crate::{Error, Result};

/// Output sample rate of the synthesized audio
pub const SAMPLE_RATE: u32 = 24_000;

/// Raw PCM output, no container framing
const CONTAINER: &str = "raw";

/// 32-bit float little-endian samples
const ENCODING: &str = "pcm_f32le";

#[derive(Serialize)]
struct SpeechRequest<'a> {
    model_id: &'a str,
    transcript: &'a str,
    voice: Voice<'a>,
    output_format: OutputFormat,
}

#[derive(Serialize)]
struct Voice<'a> {
    mode: &'static str,
    id: &'a str,
}

#[derive(Serialize)]
struct OutputFormat {
    container: &'static str,
    encoding: &'static str,
    sample_rate: u32,
}

/// Synthesizes speech from text via the Cartesia bytes endpoint
pub struct TextToSpeech {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    api_version: String,
    model: String,
    voice_id: String,
}

impl TextToSpeech {
    /// Create a new TTS instance
    ///
    /// # Errors
    ///
    /// Returns error if the API key is empty
    pub fn new(config: &CartesiaConfig) -> Result<Self> {
        if config.api_key.is_empty() {
            return Err(Error::Config(
                "Cartesia API key required for TTS".to_string(),
            ));
        }

        Ok(Self {
            client: reqwest::Client::new(),
            base_url: config.base_url.clone(),
            api_key: config.api_key.clone(),
            api_version: config.api_version.clone(),
            model: config.model.clone(),
            voice_id: config.voice_id.clone(),
        })
    }

    /// The configured model identifier
    #[must_use]
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Synthesize text to speech
    ///
    /// Returns the upstream response with its status already verified, so the
    /// caller can forward the body as a live stream without buffering it.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails or the API responds non-success;
    /// the upstream error body is logged, not returned
    pub async fn synthesize(&self, text: &str) -> Result<reqwest::Response> {
        let request = SpeechRequest {
            model_id: &self.model,
            transcript: text,
            voice: Voice {
                mode: "id",
                id: &self.voice_id,
            },
            output_format: OutputFormat {
                container: CONTAINER,
                encoding: ENCODING,
                sample_rate: SAMPLE_RATE,
            },
        };

        let response = self
            .client
            .post(format!("{}/tts/bytes", self.base_url))
            .header("X-API-Key", &self.api_key)
            .header("Cartesia-Version", &self.api_version)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "TTS request failed");
                e
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::error!(status = %status, body = %body, "Cartesia API error");
            return Err(Error::Tts(format!("Cartesia API error {status}: {body}")));
        }

        tracing::debug!("synthesis stream opened");
        Ok(response)
    }
}
