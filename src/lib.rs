//! Parley Gateway - single-turn voice assistant HTTP service
//!
//! This library provides the core functionality for the Parley gateway:
//! - Request validation for one conversational turn
//! - Speech-to-text via Groq Whisper
//! - Reply generation via Groq chat completions
//! - Speech synthesis via Cartesia, streamed back to the caller
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────┐
//! │                 POST /api/turn                       │
//! │   multipart form: input (text|audio) + history       │
//! └────────────────────┬────────────────────────────────┘
//!                      │
//! ┌────────────────────▼────────────────────────────────┐
//! │                Parley Gateway                        │
//! │  Validate → Transcribe → Reply → Synthesize          │
//! └────────────────────┬────────────────────────────────┘
//!                      │
//! ┌────────────────────▼────────────────────────────────┐
//! │       Groq (Whisper, LLM)  │  Cartesia (TTS)        │
//! └─────────────────────────────────────────────────────┘
//! ```

pub mod api;
pub mod chat;
pub mod config;
pub mod error;
pub mod prompt;
pub mod voice;

pub use chat::{ChatClient, ChatMessage, Role};
pub use config::Config;
pub use error::{Error, Result};
pub use prompt::CallerContext;
pub use voice::{SpeechToText, TextToSpeech};
