//! Gemini generator using the `generateContent` REST API.
//!
//! Works against either the Generative Language API (API key) or Vertex AI
//! (project + location + bearer token). Images travel as `inlineData` parts
//! and the system prompt as a dedicated `systemInstruction`.

use super::fetch::{fetch_all, FetchedImage, ImageFetcher};
use super::provider::{GenerationOptions, GenerationRequest, Generator, ResponseFormat};
use crate::error::GenerateError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Instant;

const PROVIDER: &str = "gemini";

/// Where requests go and how they authenticate.
#[derive(Debug, Clone)]
pub enum GeminiEndpoint {
    /// Generative Language API
    ApiKey { base_url: String, api_key: String },
    /// Vertex AI publisher model
    Vertex {
        base_url: String,
        project: String,
        location: String,
        access_token: String,
    },
}

impl GeminiEndpoint {
    pub fn api_key(api_key: &str) -> Self {
        Self::ApiKey {
            base_url: "https://generativelanguage.googleapis.com".to_string(),
            api_key: api_key.to_string(),
        }
    }

    pub fn vertex(project: &str, location: &str, access_token: &str) -> Self {
        Self::Vertex {
            base_url: format!("https://{location}-aiplatform.googleapis.com"),
            project: project.to_string(),
            location: location.to_string(),
            access_token: access_token.to_string(),
        }
    }

    /// Replace the scheme and host, keeping credentials.
    pub fn with_base_url(mut self, url: &str) -> Self {
        let url = url.trim_end_matches('/').to_string();
        match &mut self {
            Self::ApiKey { base_url, .. } | Self::Vertex { base_url, .. } => *base_url = url,
        }
        self
    }

    fn has_credentials(&self) -> bool {
        match self {
            Self::ApiKey { api_key, .. } => !api_key.is_empty(),
            Self::Vertex {
                project,
                access_token,
                ..
            } => !project.is_empty() && !access_token.is_empty(),
        }
    }

    fn url(&self, model: &str) -> String {
        match self {
            Self::ApiKey { base_url, .. } => {
                format!("{base_url}/v1beta/models/{model}:generateContent")
            }
            Self::Vertex {
                base_url,
                project,
                location,
                ..
            } => format!(
                "{base_url}/v1/projects/{project}/locations/{location}/publishers/google/models/{model}:generateContent"
            ),
        }
    }

    fn authorize(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match self {
            Self::ApiKey { api_key, .. } => builder.header("x-goog-api-key", api_key),
            Self::Vertex { access_token, .. } => builder.bearer_auth(access_token),
        }
    }
}

/// Gemini generator.
pub struct GeminiGenerator {
    endpoint: GeminiEndpoint,
    model: String,
    client: reqwest::Client,
    fetcher: Arc<dyn ImageFetcher>,
}

impl GeminiGenerator {
    pub fn new(endpoint: GeminiEndpoint, model: &str, fetcher: Arc<dyn ImageFetcher>) -> Self {
        let model = if model.is_empty() {
            "gemini-2.5-flash"
        } else {
            model
        };
        Self {
            endpoint,
            model: model.to_string(),
            client: reqwest::Client::new(),
            fetcher,
        }
    }
}

// --- Request types ---

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest {
    contents: Vec<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    system_instruction: Option<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    generation_config: Option<GenerationConfig>,
}

#[derive(Serialize)]
struct Content {
    role: &'static str,
    parts: Vec<Part>,
}

#[derive(Serialize)]
#[serde(untagged)]
enum Part {
    Text {
        text: String,
    },
    InlineData {
        #[serde(rename = "inlineData")]
        inline_data: InlineData,
    },
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct InlineData {
    mime_type: String,
    data: String,
}

#[derive(Serialize, Default)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    response_mime_type: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_output_tokens: Option<u32>,
}

// --- Response types ---

#[derive(Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

fn build_request(
    request: &GenerationRequest,
    images: &[FetchedImage],
    options: &GenerationOptions,
) -> GenerateContentRequest {
    let mut parts = Vec::with_capacity(images.len() + 1);
    if !request.text.is_empty() {
        parts.push(Part::Text {
            text: request.text.clone(),
        });
    }
    for image in images {
        parts.push(Part::InlineData {
            inline_data: InlineData {
                mime_type: image.mime_type.clone(),
                data: image.base64(),
            },
        });
    }

    let system_instruction = (!request.system_prompt.is_empty()).then(|| Content {
        role: "user",
        parts: vec![Part::Text {
            text: request.system_prompt.clone(),
        }],
    });

    let config = GenerationConfig {
        response_mime_type: match options.response_format {
            ResponseFormat::Json => Some("application/json"),
            ResponseFormat::Text => None,
        },
        max_output_tokens: (options.max_tokens > 0).then_some(options.max_tokens),
    };
    let generation_config =
        (config.response_mime_type.is_some() || config.max_output_tokens.is_some())
            .then_some(config);

    GenerateContentRequest {
        contents: vec![Content {
            role: "user",
            parts,
        }],
        system_instruction,
        generation_config,
    }
}

/// Concatenate the text parts of the top candidate, skipping non-text parts.
fn extract_text(resp: GenerateContentResponse) -> Result<String, GenerateError> {
    let candidate = resp
        .candidates
        .into_iter()
        .next()
        .ok_or_else(|| GenerateError::EmptyResponse {
            provider: PROVIDER.to_string(),
        })?;

    let parts = candidate
        .content
        .map(|c| c.parts)
        .filter(|parts| !parts.is_empty())
        .ok_or_else(|| GenerateError::EmptyContent {
            provider: PROVIDER.to_string(),
        })?;

    Ok(parts.into_iter().filter_map(|p| p.text).collect())
}

#[async_trait]
impl Generator for GeminiGenerator {
    fn name(&self) -> &str {
        PROVIDER
    }

    async fn is_available(&self) -> bool {
        self.endpoint.has_credentials()
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
        let body = build_request(request, &images, options);

        tracing::debug!(
            "Gemini request: model={model}, images={}, format={:?}",
            images.len(),
            options.response_format
        );

        let resp = self
            .endpoint
            .authorize(self.client.post(self.endpoint.url(model)))
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

        let content_resp: GenerateContentResponse =
            resp.json()
                .await
                .map_err(|e| GenerateError::ProviderCallFailed {
                    provider: PROVIDER.to_string(),
                    message: format!("Failed to parse response: {e}"),
                    status_code: None,
                })?;

        let text = extract_text(content_resp)?;
        tracing::debug!(
            "Gemini responded in {}ms ({} chars)",
            start.elapsed().as_millis(),
            text.len()
        );
        Ok(text)
    }
}
