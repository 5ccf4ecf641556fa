//! Chat completion client for reply generation

use serde::{Deserialize, Serialize};

use crate::config::GroqConfig;
use crate::{Error, Result};

/// Role of a chat message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

/// A single role-tagged message in a conversation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

#[derive(Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
}

#[derive(Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}

/// Generates reply text from an ordered message list
///
/// Holds a long-lived HTTP client and read-only configuration; safe to share
/// across concurrently handled requests.
pub struct ChatClient {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    model: String,
}

impl ChatClient {
    /// Create a new chat client
    ///
    /// # Errors
    ///
    /// Returns error if the API key is empty
    pub fn new(config: &GroqConfig) -> Result<Self> {
        if config.api_key.is_empty() {
            return Err(Error::Config(
                "Groq API key required for chat completions".to_string(),
            ));
        }

        Ok(Self {
            client: reqwest::Client::new(),
            base_url: config.base_url.clone(),
            api_key: config.api_key.clone(),
            model: config.chat_model.clone(),
        })
    }

    /// The configured model identifier
    #[must_use]
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Request a completion and return the first choice's text
    ///
    /// Message order is forwarded exactly as given; the caller is responsible
    /// for putting the system message first.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails or the response carries no content
    pub async fn complete(&self, messages: &[ChatMessage]) -> Result<String> {
        let request = ChatCompletionRequest {
            model: &self.model,
            messages,
        };

        let response = self
            .client
            .post(format!("{}/openai/v1/chat/completions", self.base_url))
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "chat completion request failed");
                e
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::error!(status = %status, body = %body, "chat completion API error");
            return Err(Error::Chat(format!("chat API error {status}: {body}")));
        }

        let result: ChatCompletionResponse = response.json().await.map_err(|e| {
            tracing::error!(error = %e, "failed to parse chat completion response");
            e
        })?;

        let reply = result
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or_else(|| Error::Chat("completion carried no content".to_string()))?;

        tracing::debug!(chars = reply.len(), "completion received");
        Ok(reply)
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
        assert!(ChatClient::new(&config).is_err());
    }

    #[test]
    fn message_roles_serialize_lowercase() {
        let message = ChatMessage {
            role: Role::Assistant,
            content: "hi".to_string(),
        };
        let json = serde_json::to_string(&message).unwrap();
        assert_eq!(json, r#"{"role":"assistant","content":"hi"}"#);
    }

    #[tokio::test]
    async fn complete_returns_first_choice() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/openai/v1/chat/completions")
            .match_header("Authorization", "Bearer test-groq-key")
            .match_body(mockito::Matcher::PartialJsonString(
                r#"{"model":"llama3-8b-8192"}"#.to_string(),
            ))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"{"choices":[{"message":{"role":"assistant","content":"Hello there!"}}]}"#,
            )
            .create_async()
            .await;

        let client = ChatClient::new(&test_config(server.url())).unwrap();
        let messages = vec![ChatMessage {
            role: Role::User,
            content: "Hello".to_string(),
        }];

        let reply = client.complete(&messages).await.unwrap();

        mock.assert_async().await;
        assert_eq!(reply, "Hello there!");
    }

    #[tokio::test]
    async fn complete_errors_on_api_failure() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/openai/v1/chat/completions")
            .with_status(500)
            .with_body("upstream exploded")
            .create_async()
            .await;

        let client = ChatClient::new(&test_config(server.url())).unwrap();
        let result = client.complete(&[]).await;

        mock.assert_async().await;
        let err = result.unwrap_err().to_string();
        assert!(err.contains("500"), "error should mention status: {err}");
    }

    #[tokio::test]
    async fn complete_errors_on_missing_content() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/openai/v1/chat/completions")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"choices":[]}"#)
            .create_async()
            .await;

        let client = ChatClient::new(&test_config(server.url())).unwrap();
        let result = client.complete(&[]).await;

        mock.assert_async().await;
        assert!(result.is_err());
    }
}
