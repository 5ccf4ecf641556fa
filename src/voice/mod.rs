//! Voice processing module
//!
//! Speech-to-text (Groq Whisper) and text-to-speech (Cartesia) clients.

pub mod stt;
pub mod tts;

pub use stt::SpeechToText;
pub use tts::{TextToSpeech, SAMPLE_RATE};
