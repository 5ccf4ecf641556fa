//! Shared helpers for integration tests

use std::sync::Arc;

use parley_gateway::api::{ApiServer, ApiState};
use parley_gateway::config::{CartesiaConfig, Config, GroqConfig};

pub const BOUNDARY: &str = "parley-test-boundary";

/// Content-Type header value for bodies built with `FormBody`
#[allow(dead_code)]
pub fn multipart_content_type() -> String {
    format!("multipart/form-data; boundary={BOUNDARY}")
}

/// Hand-rolled multipart/form-data body builder
#[derive(Default)]
pub struct FormBody(Vec<u8>);

#[allow(dead_code)]
impl FormBody {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(mut self, name: &str, value: &str) -> Self {
        self.0.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
            )
            .as_bytes(),
        );
        self
    }

    pub fn file(mut self, name: &str, filename: &str, content_type: &str, bytes: &[u8]) -> Self {
        self.0.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"; filename=\"{filename}\"\r\nContent-Type: {content_type}\r\n\r\n"
            )
            .as_bytes(),
        );
        self.0.extend_from_slice(bytes);
        self.0.extend_from_slice(b"\r\n");
        self
    }

    pub fn finish(mut self) -> Vec<u8> {
        self.0
            .extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
        self.0
    }
}

/// Build shared state pointed at the given upstream base URLs
pub fn test_state(groq_url: &str, cartesia_url: &str) -> Arc<ApiState> {
    let config = Config {
        port: 0,
        groq: GroqConfig {
            api_key: "test-groq-key".to_string(),
            base_url: groq_url.to_string(),
            stt_model: "whisper-large-v3".to_string(),
            chat_model: "llama3-8b-8192".to_string(),
        },
        cartesia: CartesiaConfig {
            api_key: "test-cartesia-key".to_string(),
            base_url: cartesia_url.to_string(),
            api_version: "2024-06-30".to_string(),
            model: "sonic-multilingual".to_string(),
            voice_id: "82fee20d-09de-4852-b2fb-5944addc0e62".to_string(),
        },
    };

    Arc::new(ApiState::from_config(&config).expect("test state should build"))
}

/// Build the full router pointed at the given upstream base URLs
pub fn test_router(groq_url: &str, cartesia_url: &str) -> axum::Router {
    ApiServer::router(test_state(groq_url, cartesia_url))
}
