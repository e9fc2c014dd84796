// src/types/chat.rs
//! Wire format of the chat-completion endpoint

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
}

// ===== Service Response Types =====

#[derive(Debug, Deserialize)]
pub struct ChatCompletionResponse {
    pub choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
pub struct ChatChoice {
    pub message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
pub struct ChoiceMessage {
    pub content: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ApiErrorResponse {
    pub error: ApiErrorBody,
}

#[derive(Debug, Deserialize)]
pub struct ApiErrorBody {
    pub message: String,
}

impl ChatCompletionResponse {
    /// Text of the first choice, if the model returned any.
    pub fn into_text(self) -> Option<String> {
        self.choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_omits_missing_temperature() {
        let request = ChatRequest {
            model: "gpt-4-turbo".to_string(),
            messages: vec![ChatMessage::system("sys"), ChatMessage::user("hi")],
            temperature: None,
        };
        let json = serde_json::to_value(&request).unwrap();
        assert!(json.get("temperature").is_none());
        assert_eq!(json["messages"][0]["role"], "system");
        assert_eq!(json["messages"][1]["role"], "user");
    }

    #[test]
    fn test_first_choice_text() {
        let raw = r#"{"id":"x","choices":[{"index":0,"message":{"role":"assistant","content":"Dear team"}}]}"#;
        let response: ChatCompletionResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(response.into_text().as_deref(), Some("Dear team"));
    }

    #[test]
    fn test_no_choices_yields_none() {
        let response: ChatCompletionResponse = serde_json::from_str(r#"{"choices":[]}"#).unwrap();
        assert!(response.into_text().is_none());
    }
}
