//! OpenRouter chat-completions client.
//!
//! Sends one `POST {api_base}/chat/completions` per diagnosis with the prompt as
//! the system message and the image as a data URI in the user message.

use super::{ProviderError, VisionProvider};
use crate::config::OpenRouterConfig;
use crate::models::ImageUpload;
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use secrecy::{ExposeSecret, Secret};
use serde::{Deserialize, Serialize};

pub struct OpenRouterProvider {
    url: String,
    model: String,
    api_key: Secret<String>,
    client: Client,
}

impl OpenRouterProvider {
    pub fn new(config: &OpenRouterConfig) -> Result<Self, ProviderError> {
        let mut builder = Client::builder();
        if let Some(timeout) = config.timeout() {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| ProviderError::NotConfigured(format!("HTTP client: {}", e)))?;

        Ok(Self {
            url: config.chat_completions_url(),
            model: config.model.clone(),
            api_key: config.api_key.clone(),
            client,
        })
    }
}

#[async_trait]
impl VisionProvider for OpenRouterProvider {
    async fn complete(
        &self,
        system_prompt: &str,
        image: &ImageUpload,
    ) -> Result<String, ProviderError> {
        let request = build_request(&self.model, system_prompt, image);

        tracing::debug!(
            model = %self.model,
            image_bytes = image.len(),
            mime_type = %image.mime_type,
            "Sending request to OpenRouter"
        );

        let mut builder = self.client.post(&self.url).json(&request);
        let api_key = self.api_key.expose_secret();
        if !api_key.is_empty() {
            builder = builder.bearer_auth(api_key);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| ProviderError::NetworkError(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| ProviderError::NetworkError(e.to_string()))?;

        // Only a plain 200 carries a completion; any other status is an upstream failure.
        if status != StatusCode::OK {
            return Err(ProviderError::ApiError {
                status: status.as_u16(),
                body,
            });
        }

        extract_content(&body)
    }

    fn model(&self) -> &str {
        &self.model
    }
}

/// Pulls `choices[0].message.content` out of a chat completion body.
fn extract_content(body: &str) -> Result<String, ProviderError> {
    let envelope: ChatCompletionResponse = serde_json::from_str(body)
        .map_err(|e| ProviderError::MalformedResponse(e.to_string()))?;

    let choice = envelope.choices.into_iter().next().ok_or_else(|| {
        ProviderError::MalformedResponse("response contained no choices".to_string())
    })?;

    choice.message.content.ok_or_else(|| {
        ProviderError::MalformedResponse("first choice has no message content".to_string())
    })
}

fn build_request<'a>(
    model: &'a str,
    system_prompt: &'a str,
    image: &ImageUpload,
) -> ChatCompletionRequest<'a> {
    ChatCompletionRequest {
        model,
        messages: vec![
            ChatMessage {
                role: "system",
                content: MessageContent::Text(system_prompt),
            },
            ChatMessage {
                role: "user",
                content: MessageContent::Parts(vec![ContentPart::ImageUrl {
                    image_url: image.data_uri(),
                }]),
            },
        ],
    }
}

// ============================================================================
// OpenRouter API Request/Response Types
// ============================================================================

#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: MessageContent<'a>,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
enum MessageContent<'a> {
    Text(&'a str),
    Parts(Vec<ContentPart>),
}

#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum ContentPart {
    ImageUrl { image_url: String },
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: AssistantMessage,
}

#[derive(Debug, Deserialize)]
struct AssistantMessage {
    #[serde(default)]
    content: Option<String>,
}
