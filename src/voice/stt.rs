//! Speech-to-text (STT) processing

use crate::config::GroqConfig;
use crate::{Error, Result};

/// Response from the Whisper transcription API
#[derive(serde::Deserialize)]
struct WhisperResponse {
    text: String,
}

/// Transcribes speech to text via Groq's Whisper endpoint
pub struct SpeechToText {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    model: String,
}

impl SpeechToText {
    /// Create a new STT instance
    ///
    /// # Errors
    ///
    /// Returns error if the API key is empty
    pub fn new(config: &GroqConfig) -> Result<Self> {
        if config.api_key.is_empty() {
            return Err(Error::Config(
                "Groq API key required for transcription".to_string(),
            ));
        }

        Ok(Self {
            client: reqwest::Client::new(),
            base_url: config.base_url.clone(),
            api_key: config.api_key.clone(),
            model: config.stt_model.clone(),
        })
    }

    /// The configured model identifier
    #[must_use]
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Transcribe audio to text
    ///
    /// # Arguments
    ///
    /// * `audio` - audio bytes as uploaded by the caller
    /// * `file_name` - original upload file name, forwarded to the API
    /// * `mime_type` - upload content type, if the caller supplied one
    ///
    /// # Errors
    ///
    /// Returns error if transcription fails
    pub async fn transcribe(
        &self,
        audio: &[u8],
        file_name: &str,
        mime_type: Option<&str>,
    ) -> Result<String> {
        tracing::debug!(audio_bytes = audio.len(), "starting transcription");

        let mut part = reqwest::multipart::Part::bytes(audio.to_vec())
            .file_name(file_name.to_string());
        if let Some(mime) = mime_type {
            part = part
                .mime_str(mime)
                .map_err(|e| Error::Stt(e.to_string()))?;
        }

        let form = reqwest::multipart::Form::new()
            .part("file", part)
            .text("model", self.model.clone())
            .text("response_format", "json");

        let response = self
            .client
            .post(format!(
                "{}/openai/v1/audio/transcriptions",
                self.base_url
            ))
            .header("Authorization", format!("Bearer {}", self.api_key))
            .multipart(form)
            .send()
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "Whisper request failed");
                e
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::error!(status = %status, body = %body, "Whisper API error");
            return Err(Error::Stt(format!("Whisper API error {status}: {body}")));
        }

        let result: WhisperResponse = response.json().await.map_err(|e| {
            tracing::error!(error = %e, "failed to parse transcription response");
            e
        })?;

        tracing::info!(chars = result.text.len(), "transcription complete");
        Ok(result.text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GroqConfig;

    fn test_config(base_url: String) -> GroqConfig {
        GroqConfig {
            api_key: "test-groq-key".to_string(),
            base_url,
            stt_model: "whisper-large-v3".to_string(),
            chat_model: "llama3-8b-8192".to_string(),
        }
    }

    #[test]
    fn rejects_empty_api_key() {
        let mut config = test_config("http://localhost".to_string());
        config.api_key = String::new();
        assert!(SpeechToText::new(&config).is_err());
    }

    #[tokio::test]
    async fn transcribe_returns_text() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/openai/v1/audio/transcriptions")
            .match_header("Authorization", "Bearer test-groq-key")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"text": "Hello from a voice note"}"#)
            .create_async()
            .await;

        let stt = SpeechToText::new(&test_config(server.url())).unwrap();
        let audio = vec![0u8; 100];
        let result = stt
            .transcribe(&audio, "audio.wav", Some("audio/wav"))
            .await;

        mock.assert_async().await;
        assert_eq!(result.unwrap(), "Hello from a voice note");
    }

    #[tokio::test]
    async fn transcribe_errors_on_api_failure() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/openai/v1/audio/transcriptions")
            .with_status(401)
            .with_body(r#"{"error": "Invalid API key"}"#)
            .create_async()
            .await;

        let stt = SpeechToText::new(&test_config(server.url())).unwrap();
        let result = stt.transcribe(&[0u8; 50], "audio.wav", None).await;

        mock.assert_async().await;
        let err = result.unwrap_err().to_string();
        assert!(err.contains("401"), "error should mention status: {err}");
    }

    #[tokio::test]
    async fn transcribe_errors_on_malformed_response() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/openai/v1/audio/transcriptions")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body("not json at all")
            .create_async()
            .await;

        let stt = SpeechToText::new(&test_config(server.url())).unwrap();
        let result = stt.transcribe(&[0u8; 50], "audio.webm", None).await;

        mock.assert_async().await;
        assert!(result.is_err());
    }
}
