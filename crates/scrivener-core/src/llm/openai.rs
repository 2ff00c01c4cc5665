//! OpenAI generator using the Chat Completions API.
//!
//! Sends images as base64 data URLs in the user message content array and
//! the system prompt as a leading `system` message.

use super::fetch::{fetch_all, FetchedImage, ImageFetcher};
use super::provider::{GenerationOptions, GenerationRequest, Generator, ResponseFormat};
use crate::error::GenerateError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Instant;

const PROVIDER: &str = "openai";

/// OpenAI generator using the Chat Completions API.
pub struct OpenAiGenerator {
    api_key: String,
    model: String,
    client: reqwest::Client,
    endpoint: String,
    fetcher: Arc<dyn ImageFetcher>,
}

impl OpenAiGenerator {
    pub fn new(api_key: &str, model: &str, fetcher: Arc<dyn ImageFetcher>) -> Self {
        let model = if model.is_empty() { "gpt-4o" } else { model };
        Self {
            api_key: api_key.to_string(),
            model: model.to_string(),
            client: reqwest::Client::new(),
            endpoint: "https://api.openai.com/v1/chat/completions".to_string(),
            fetcher,
        }
    }

    /// Point at a custom Chat Completions endpoint (proxies, compatible APIs).
    pub fn with_endpoint(mut self, endpoint: &str) -> Self {
        if !endpoint.is_empty() {
            self.endpoint = endpoint.to_string();
        }
        self
    }
}

// --- Request types ---

#[derive(Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_format: Option<ChatResponseFormat>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
}

#[derive(Serialize)]
struct ChatMessage {
    role: &'static str,
    content: MessageContent,
}

#[derive(Serialize)]
#[serde(untagged)]
enum MessageContent {
    Text(String),
    Parts(Vec<ChatContent>),
}

#[derive(Serialize)]
#[serde(tag = "type")]
enum ChatContent {
    #[serde(rename = "text")]
    Text { text: String },
    #[serde(rename = "image_url")]
    ImageUrl { image_url: ImageUrl },
}

#[derive(Serialize)]
struct ImageUrl {
    url: String,
}

#[derive(Serialize)]
struct ChatResponseFormat {
    #[serde(rename = "type")]
    format_type: &'static str,
}

// --- Response types ---

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

/// Assemble the wire request: system message first, then one user message
/// holding the text part followed by every image part in order.
fn build_request(
    model: &str,
    request: &GenerationRequest,
    images: &[FetchedImage],
    options: &GenerationOptions,
) -> ChatRequest {
    let mut parts = Vec::with_capacity(images.len() + 1);
    if !request.text.is_empty() {
        parts.push(ChatContent::Text {
            text: request.text.clone(),
        });
    }
    for image in images {
        parts.push(ChatContent::ImageUrl {
            image_url: ImageUrl {
                url: image.data_url(),
            },
        });
    }

    let mut messages = Vec::with_capacity(2);
    if !request.system_prompt.is_empty() {
        messages.push(ChatMessage {
            role: "system",
            content: MessageContent::Text(request.system_prompt.clone()),
        });
    }
    messages.push(ChatMessage {
        role: "user",
        content: MessageContent::Parts(parts),
    });

    ChatRequest {
        model: model.to_string(),
        messages,
        response_format: match options.response_format {
            ResponseFormat::Json => Some(ChatResponseFormat {
                format_type: "json_object",
            }),
            ResponseFormat::Text => None,
        },
        max_tokens: (options.max_tokens > 0).then_some(options.max_tokens),
    }
}

/// Pull the top choice's text out of a response.
fn extract_text(resp: ChatResponse) -> Result<String, GenerateError> {
    let choice = resp
        .choices
        .into_iter()
        .next()
        .ok_or_else(|| GenerateError::EmptyResponse {
            provider: PROVIDER.to_string(),
        })?;

    choice
        .message
        .content
        .ok_or_else(|| GenerateError::EmptyContent {
            provider: PROVIDER.to_string(),
        })
}

#[async_trait]
impl Generator for OpenAiGenerator {
    fn name(&self) -> &str {
        PROVIDER
    }

    async fn is_available(&self) -> bool {
        !self.api_key.is_empty()
    }

    async fn generate(
        &self,
        request: &GenerationRequest,
        options: &GenerationOptions,
    ) -> Result<String, GenerateError> {
        if !self.is_available().await {
            return Err(GenerateError::NotInitialized {
                provider: PROVIDER.to_string(),
            });
        }

        let start = Instant::now();
        let model = options.model_or(&self.model);
        let images = fetch_all(self.fetcher.as_ref(), &request.image_urls).await?;
        let body = build_request(model, request, &images, options);

        tracing::debug!(
            "OpenAI request: model={model}, images={}, format={:?}",
            images.len(),
            options.response_format
        );

        let resp = self
            .client
            .post(&self.endpoint)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| GenerateError::ProviderCallFailed {
                provider: PROVIDER.to_string(),
                message: e.to_string(),
                status_code: None,
            })?;

        let status = resp.status();
        if !status.is_success() {
            let text = resp.text().await.unwrap_or_default();
            return Err(GenerateError::ProviderCallFailed {
                provider: PROVIDER.to_string(),
                message: format!("HTTP {status}: {text}"),
                status_code: Some(status.as_u16()),
            });
        }

        let chat_resp: ChatResponse =
            resp.json().await.map_err(|e| GenerateError::ProviderCallFailed {
                provider: PROVIDER.to_string(),
                message: format!("Failed to parse response: {e}"),
                status_code: None,
            })?;

        let text = extract_text(chat_resp)?;
        tracing::debug!(
            "OpenAI responded in {}ms ({} chars)",
            start.elapsed().as_millis(),
            text.len()
        );
        Ok(text)
    }
}
