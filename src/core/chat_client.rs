// src/core/chat_client.rs
//! HTTP client for the chat-completion endpoint

use anyhow::{Context, Result};
use async_trait::async_trait;
use thiserror::Error;
use tracing::{debug, error, info};

use crate::types::chat::{ApiErrorResponse, ChatCompletionResponse, ChatRequest};

const CHAT_COMPLETIONS_ENDPOINT: &str = "/chat/completions";

pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

#[derive(Debug, Error)]
pub enum ChatError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("malformed completion body: {0}")]
    Body(#[source] serde_json::Error),

    #[error("model returned empty content")]
    EmptyCompletion,
}

/// A single chat round trip authenticated with the caller's key.
#[async_trait]
pub trait ChatClient: Send + Sync {
    async fn complete(&self, credential: &str, request: &ChatRequest) -> Result<String, ChatError>;
}

#[derive(Clone)]
pub struct OpenAiClient {
    client: reqwest::Client,
    base_url: String,
}

impl OpenAiClient {
    /// No request timeout is configured; the transport defaults apply.
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[async_trait]
impl ChatClient for OpenAiClient {
    async fn complete(&self, credential: &str, request: &ChatRequest) -> Result<String, ChatError> {
        let url = format!("{}{}", self.base_url, CHAT_COMPLETIONS_ENDPOINT);
        info!("Calling chat completion: {} (model {})", url, request.model);

        let response = self
            .client
            .post(&url)
            .bearer_auth(credential)
            .json(request)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        debug!("Chat completion status {}, {} bytes", status, body.len());

        if !status.is_success() {
            let message = api_error_message(&body);
            error!("Chat completion error {}: {}", status, message);
            return Err(ChatError::Api {
                status: status.as_u16(),
                message,
            });
        }

        parse_completion(&body)
    }
}

/// Extracts the first choice's text from a successful response body.
pub fn parse_completion(body: &str) -> Result<String, ChatError> {
    let completion: ChatCompletionResponse =
        serde_json::from_str(body).map_err(ChatError::Body)?;
    completion.into_text().ok_or(ChatError::EmptyCompletion)
}

fn api_error_message(body: &str) -> String {
    serde_json::from_str::<ApiErrorResponse>(body)
        .map(|e| e.error.message)
        .unwrap_or_else(|_| {
            if body.is_empty() {
                "Unknown error".to_string()
            } else {
                body.to_string()
            }
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_completion_text() {
        let body = r#"{"choices":[{"message":{"role":"assistant","content":"Hello"}}]}"#;
        assert_eq!(parse_completion(body).unwrap(), "Hello");
    }

    #[test]
    fn test_parse_completion_rejects_garbage() {
        assert!(matches!(parse_completion("<html>"), Err(ChatError::Body(_))));
    }

    #[test]
    fn test_parse_completion_null_content() {
        let body = r#"{"choices":[{"message":{"role":"assistant","content":null}}]}"#;
        assert!(matches!(parse_completion(body), Err(ChatError::EmptyCompletion)));
    }

    #[test]
    fn test_api_error_message_prefers_structured_body() {
        let body = r#"{"error":{"message":"Incorrect API key provided","type":"invalid_request_error"}}"#;
        assert_eq!(api_error_message(body), "Incorrect API key provided");
        assert_eq!(api_error_message("Bad Gateway"), "Bad Gateway");
        assert_eq!(api_error_message(""), "Unknown error");
    }

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let client = OpenAiClient::new("http://localhost:8080/v1/").unwrap();
        assert_eq!(client.base_url(), "http://localhost:8080/v1");
    }
}
