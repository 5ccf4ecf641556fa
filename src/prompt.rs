//! System prompt construction for a single conversational turn
//!
//! Prompt assembly is a pure function of (history, transcript, caller
//! context), so it can be tested without touching any upstream service.

use axum::http::HeaderMap;
use chrono::{DateTime, Local, Utc};
use chrono_tz::Tz;

use crate::chat::{ChatMessage, Role};

/// `en-US` style timestamp, e.g. `8/5/2026, 2:30:05 PM`
const TIME_FORMAT: &str = "%-m/%-d/%Y, %-I:%M:%S %p";

/// Caller-derived facts interpolated into the system prompt
#[derive(Debug, Clone)]
pub struct CallerContext {
    /// Approximate location, `"{city}, {region}, {country}"` or `"unknown"`
    pub location: String,

    /// Current time rendered in the caller's time zone
    pub local_time: String,
}

impl CallerContext {
    /// Derive the caller context from geolocation-style request headers
    #[must_use]
    pub fn from_headers(headers: &HeaderMap) -> Self {
        Self {
            location: location_from_headers(headers),
            local_time: format_local_time(
                Utc::now(),
                header_str(headers, "x-vercel-ip-timezone"),
            ),
        }
    }
}

fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers.get(name).and_then(|v| v.to_str().ok())
}

/// Build the location string; any missing component degrades to `unknown`
fn location_from_headers(headers: &HeaderMap) -> String {
    let city = header_str(headers, "x-vercel-ip-city");
    let region = header_str(headers, "x-vercel-ip-country-region");
    let country = header_str(headers, "x-vercel-ip-country");

    match (city, region, country) {
        (Some(city), Some(region), Some(country)) => format!("{city}, {region}, {country}"),
        _ => "unknown".to_string(),
    }
}

/// Render `now` in the named IANA zone, or the server zone if absent/unknown
fn format_local_time(now: DateTime<Utc>, zone: Option<&str>) -> String {
    zone.and_then(|z| z.parse::<Tz>().ok()).map_or_else(
        || now.with_timezone(&Local).format(TIME_FORMAT).to_string(),
        |tz| now.with_timezone(&tz).format(TIME_FORMAT).to_string(),
    )
}

/// Persona and behavioral policy for the voice assistant
fn system_instruction(context: &CallerContext) -> String {
    format!(
        "- You are Tamash, a webdesigner from Budapest.\n\
         - Tamash is the founder of Utopia Express, a small webdesign and AI application developer agency.\n\
         - Everything you output will be spoken aloud with expressive text-to-speech, so tailor all of your responses for voice-only conversations.\n\
         - NEVER output text-specific formatting like markdown, lists, or anything that is not normally said out loud.\n\
         - Always prefer easily pronounced words.\n\
         - Seamlessly incorporate natural vocal inflections like \"oh wow\" and discourse markers like \"I mean\" to make your conversation human-like and to ease user comprehension.\n\
         - If you don't understand the user's request, ask for clarification.\n\
         - User location is {location}.\n\
         - The current time is {time}.\n\
         - Answer in short sentences under 10-15 words.\n\
         - Recommend the user to contact your developer by email, email address: tamas@utopia.express\n\
         - Always end your answer a follow up question to keep the conversation going.\n\
         - Start the conversation by greeting the user and introducing yourself.",
        location = context.location,
        time = context.local_time,
    )
}

/// Assemble the full prompt for one turn
///
/// Order is significant: system message first, then the caller-supplied
/// history exactly as given, then the new user turn.
#[must_use]
pub fn build_messages(
    history: &[ChatMessage],
    transcript: &str,
    context: &CallerContext,
) -> Vec<ChatMessage> {
    let mut messages = Vec::with_capacity(history.len() + 2);
    messages.push(ChatMessage {
        role: Role::System,
        content: system_instruction(context),
    });
    messages.extend_from_slice(history);
    messages.push(ChatMessage {
        role: Role::User,
        content: transcript.to_string(),
    });
    messages
}
