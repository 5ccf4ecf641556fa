//! HTTP API server for Parley gateway

pub mod health;
pub mod turn;

use std::sync::Arc;

use axum::{extract::DefaultBodyLimit, Router};
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::chat::ChatClient;
use crate::voice::{SpeechToText, TextToSpeech};
use crate::{Config, Result};

/// Multipart audio uploads can be several MB; raise the default extractor cap.
const AUDIO_UPLOAD_LIMIT_BYTES: usize = 64 * 1024 * 1024;

/// Shared state for API handlers
///
/// Immutable after startup; one long-lived client handle per upstream,
/// shared read-only across concurrently handled requests.
pub struct ApiState {
    pub stt: SpeechToText,
    pub chat: ChatClient,
    pub tts: TextToSpeech,
}

impl ApiState {
    /// Build the shared state from configuration
    ///
    /// # Errors
    ///
    /// Returns error if any upstream client rejects its configuration
    pub fn from_config(config: &Config) -> Result<Self> {
        Ok(Self {
            stt: SpeechToText::new(&config.groq)?,
            chat: ChatClient::new(&config.groq)?,
            tts: TextToSpeech::new(&config.cartesia)?,
        })
    }
}

/// API server
pub struct ApiServer {
    state: Arc<ApiState>,
    port: u16,
}

impl ApiServer {
    /// Create a new API server from configuration
    ///
    /// # Errors
    ///
    /// Returns error if upstream client construction fails
    pub fn new(config: &Config) -> Result<Self> {
        Ok(Self {
            state: Arc::new(ApiState::from_config(config)?),
            port: config.port,
        })
    }

    /// Build the router with all routes
    #[must_use]
    pub fn router(state: Arc<ApiState>) -> Router {
        let cors = CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);

        Router::new()
            .merge(turn::router(state.clone()))
            .merge(health::router())
            .merge(health::ready_router(state))
            .layer(DefaultBodyLimit::max(AUDIO_UPLOAD_LIMIT_BYTES))
            .layer(cors)
            .layer(TraceLayer::new_for_http())
    }

    /// Run the API server
    ///
    /// # Errors
    ///
    /// Returns error if the server fails to bind or run
    pub async fn run(self) -> Result<()> {
        let addr = format!("0.0.0.0:{}", self.port);
        let listener = TcpListener::bind(&addr)
            .await
            .map_err(|e| crate::Error::Config(format!("failed to bind API server: {e}")))?;

        tracing::info!(port = self.port, "API server listening");

        axum::serve(listener, Self::router(self.state))
            .await
            .map_err(|e| crate::Error::Config(format!("API server error: {e}")))?;

        Ok(())
    }
}
