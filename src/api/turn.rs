//! Voice turn endpoint
//!
//! One POST handles one conversational turn: validate the multipart form,
//! resolve the utterance to text, generate a reply, synthesize it, and
//! stream the audio back with transcript metadata in the headers.

use std::sync::Arc;
use std::time::Instant;

use axum::{
    body::{Body, Bytes},
    extract::multipart::MultipartRejection,
    extract::{Multipart, State},
    http::{header, HeaderMap, HeaderName, StatusCode},
    response::{IntoResponse, Response},
    routing::post,
    Router,
};
use serde::Deserialize;

use super::ApiState;
use crate::chat::{ChatMessage, Role};
use crate::prompt::{self, CallerContext};

/// Build turn router
pub fn router(state: Arc<ApiState>) -> Router {
    Router::new()
        .route("/api/turn", post(turn))
        .with_state(state)
}

/// The user's utterance, as typed text or an uploaded audio file
enum TurnInput {
    Text(String),
    Audio(AudioUpload),
}

struct AudioUpload {
    bytes: Bytes,
    file_name: String,
    content_type: Option<String>,
}

/// Validated form payload for one turn
struct TurnRequest {
    input: TurnInput,
    history: Vec<ChatMessage>,
}

/// History entries accept only the two conversational roles
#[derive(Deserialize)]
struct HistoryEntry {
    role: HistoryRole,
    content: String,
}

#[derive(Deserialize, Clone, Copy)]
#[serde(rename_all = "lowercase")]
enum HistoryRole {
    User,
    Assistant,
}

impl From<HistoryEntry> for ChatMessage {
    fn from(entry: HistoryEntry) -> Self {
        let role = match entry.role {
            HistoryRole::User => Role::User,
            HistoryRole::Assistant => Role::Assistant,
        };
        Self {
            role,
            content: entry.content,
        }
    }
}

impl TurnRequest {
    /// Parse and validate the multipart form
    ///
    /// Rejects before any upstream call: `input` must be a non-empty text
    /// field or a file field, and every `message` field must be a JSON
    /// object with a `user`/`assistant` role and string content.
    async fn parse(mut multipart: Multipart) -> Result<Self, TurnError> {
        let mut input = None;
        let mut history = Vec::new();

        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(|_| TurnError::InvalidRequest)?
        {
            let name = field.name().map(ToString::to_string);
            match name.as_deref() {
                Some("input") => {
                    let file_name = field.file_name().map(ToString::to_string);
                    if let Some(file_name) = file_name {
                        let content_type = field.content_type().map(ToString::to_string);
                        let bytes = field
                            .bytes()
                            .await
                            .map_err(|_| TurnError::InvalidRequest)?;
                        input = Some(TurnInput::Audio(AudioUpload {
                            bytes,
                            file_name,
                            content_type,
                        }));
                    } else {
                        let text = field
                            .text()
                            .await
                            .map_err(|_| TurnError::InvalidRequest)?;
                        if text.is_empty() {
                            return Err(TurnError::InvalidRequest);
                        }
                        input = Some(TurnInput::Text(text));
                    }
                }
                Some("message") => {
                    let raw = field
                        .text()
                        .await
                        .map_err(|_| TurnError::InvalidRequest)?;
                    let entry: HistoryEntry =
                        serde_json::from_str(&raw).map_err(|_| TurnError::InvalidRequest)?;
                    history.push(entry.into());
                }
                _ => {}
            }
        }

        let input = input.ok_or(TurnError::InvalidRequest)?;
        Ok(Self { input, history })
    }
}

/// Handle one voice turn
async fn turn(
    State(state): State<Arc<ApiState>>,
    headers: HeaderMap,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Response, TurnError> {
    let started = Instant::now();

    let multipart = multipart.map_err(|_| TurnError::InvalidRequest)?;
    let request = TurnRequest::parse(multipart).await?;
    let transcript = resolve_transcript(&state, request.input).await?;

    let context = CallerContext::from_headers(&headers);
    let messages = prompt::build_messages(&request.history, &transcript, &context);

    let stage = Instant::now();
    let reply = state.chat.complete(&messages).await.map_err(|e| {
        tracing::error!(error = %e, "reply generation failed");
        TurnError::ReplyFailed
    })?;
    tracing::debug!(elapsed = ?stage.elapsed(), "completion stage finished");

    let stage = Instant::now();
    let voice = state.tts.synthesize(&reply).await.map_err(|e| {
        tracing::error!(error = %e, "voice synthesis failed");
        TurnError::SynthesisFailed
    })?;
    tracing::debug!(elapsed = ?stage.elapsed(), "synthesis stage finished");

    tracing::info!(
        transcript_chars = transcript.len(),
        reply_chars = reply.len(),
        elapsed = ?started.elapsed(),
        "turn complete, streaming audio"
    );

    Ok((
        StatusCode::OK,
        [
            (
                header::CONTENT_TYPE,
                "application/octet-stream".to_string(),
            ),
            (
                HeaderName::from_static("x-transcript"),
                urlencoding::encode(&transcript).into_owned(),
            ),
            (
                HeaderName::from_static("x-response"),
                urlencoding::encode(&reply).into_owned(),
            ),
        ],
        Body::from_stream(voice.bytes_stream()),
    )
        .into_response())
}

/// Resolve the validated input to a plain-text utterance
///
/// Text passes through untouched. Audio goes to the transcription service;
/// every failure mode there, including a whitespace-only result, collapses
/// into the single "invalid audio" rejection.
async fn resolve_transcript(
    state: &ApiState,
    input: TurnInput,
) -> Result<String, TurnError> {
    match input {
        TurnInput::Text(text) => Ok(text),
        TurnInput::Audio(upload) => {
            let stage = Instant::now();
            let text = state
                .stt
                .transcribe(
                    &upload.bytes,
                    &upload.file_name,
                    upload.content_type.as_deref(),
                )
                .await
                .map_err(|e| {
                    tracing::warn!(error = %e, "transcription failed");
                    TurnError::InvalidAudio
                })?;

            let text = text.trim();
            if text.is_empty() {
                tracing::warn!("transcription produced no speech");
                return Err(TurnError::InvalidAudio);
            }

            tracing::debug!(elapsed = ?stage.elapsed(), "transcription stage finished");
            Ok(text.to_string())
        }
    }
}

/// Turn endpoint errors
///
/// Bodies are short generic plain text; diagnostic detail stays in the logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnError {
    InvalidRequest,
    InvalidAudio,
    ReplyFailed,
    SynthesisFailed,
}

impl IntoResponse for TurnError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            Self::InvalidRequest => (StatusCode::BAD_REQUEST, "Invalid request"),
            Self::InvalidAudio => (StatusCode::BAD_REQUEST, "Invalid audio"),
            Self::ReplyFailed => (StatusCode::INTERNAL_SERVER_ERROR, "Reply generation failed"),
            Self::SynthesisFailed => {
                (StatusCode::INTERNAL_SERVER_ERROR, "Voice synthesis failed")
            }
        };

        (status, body).into_response()
    }
}
