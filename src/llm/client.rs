// LLM API HTTP client.
// Speaks the OpenAI/OpenRouter-compatible chat-completions protocol.

use reqwest::{
    Client, StatusCode,
    header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue},
};
use serde::{Deserialize, Serialize};

use crate::error::{AnalyzerError, Result};

/// Default base URL (OpenRouter; any OpenAI-compatible endpoint works).
const DEFAULT_BASE_URL: &str = "https://openrouter.ai/api/v1";

/// Default model when LLM_MODEL is unset.
const DEFAULT_MODEL: &str = "openai/gpt-4o-mini";

/// One message in a chat-completions conversation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".to_string(),
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}

/// Chat-completions request body.
#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
}

/// Chat-completions response body (the fields we consume).
#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ChatResponseMessage {
    content: String,
}

/// Client for an OpenAI-compatible chat-completions endpoint.
pub struct LlmClient {
    client: Client,
    base_url: String,
    model: String,
}

impl LlmClient {
    /// Create a client for the given endpoint and key.
    pub fn new(api_key: &str, base_url: impl Into<String>, model: impl Into<String>) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {}", api_key))
                .map_err(|e| AnalyzerError::Other(e.to_string()))?,
        );
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let client = Client::builder()
            .default_headers(headers)
            .build()
            .map_err(AnalyzerError::Api)?;

        Ok(Self {
            client,
            base_url: base_url.into(),
            model: model.into(),
        })
    }

    /// Create a client from environment variables.
    ///
    /// Key: LLM_API_KEY, then OPENROUTER_API_KEY, then OPENAI_API_KEY.
    /// Endpoint: LLM_BASE_URL (default OpenRouter). Model: LLM_MODEL.
    pub fn from_env() -> Result<Self> {
        let api_key = ["LLM_API_KEY", "OPENROUTER_API_KEY", "OPENAI_API_KEY"]
            .iter()
            .find_map(|var| std::env::var(var).ok().filter(|v| !v.is_empty()))
            .ok_or(AnalyzerError::MissingLlmKey)?;

        let base_url =
            std::env::var("LLM_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());
        let model = std::env::var("LLM_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string());

        Self::new(&api_key, base_url, model)
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Run one chat completion and return the assistant's text.
    pub async fn complete(&self, messages: &[ChatMessage]) -> Result<String> {
        let url = format!("{}/chat/completions", self.base_url.trim_end_matches('/'));
        let body = ChatRequest {
            model: &self.model,
            messages,
        };

        let response = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(AnalyzerError::Api)?;

        match response.status() {
            StatusCode::OK => {}
            StatusCode::UNAUTHORIZED => return Err(AnalyzerError::Unauthorized),
            StatusCode::TOO_MANY_REQUESTS => {
                return Err(AnalyzerError::Llm("rate limited by provider".to_string()));
            }
            status => {
                return Err(AnalyzerError::Llm(format!(
                    "HTTP {}: {}",
                    status,
                    response.text().await.unwrap_or_default()
                )));
            }
        }

        let parsed: ChatResponse = response.json().await?;
        let content = parsed
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .ok_or_else(|| AnalyzerError::Llm("response contained no choices".to_string()))?;

        Ok(content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chat_response_parses_first_choice() {
        let json = r#"{
            "id": "gen-1",
            "choices": [
                {"index": 0, "message": {"role": "assistant", "content": "analysis text"}}
            ],
            "usage": {"prompt_tokens": 10, "completion_tokens": 5}
        }"#;

        let parsed: ChatResponse = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.choices[0].message.content, "analysis text");
    }

    #[test]
    fn test_chat_request_serializes_messages() {
        let messages = vec![
            ChatMessage::system("You review codebases."),
            ChatMessage::user("Analyze this."),
        ];
        let body = ChatRequest {
            model: "test-model",
            messages: &messages,
        };

        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["model"], "test-model");
        assert_eq!(json["messages"][0]["role"], "system");
        assert_eq!(json["messages"][1]["content"], "Analyze this.");
    }
}
