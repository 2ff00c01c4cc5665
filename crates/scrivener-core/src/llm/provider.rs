//! Generator trait and request/option types.
//!
//! Defines the single capability every provider adapter implements, plus
//! the factory that creates the right adapter from config.

use super::fetch::{HttpImageFetcher, ImageFetcher};
use super::gemini::{GeminiEndpoint, GeminiGenerator};
use super::openai::OpenAiGenerator;
use crate::config::{resolve_env_var, GeminiMode, LlmConfig};
use crate::error::{ConfigError, GenerateError};
use async_trait::async_trait;
use std::sync::Arc;

/// Desired shape of the generated text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ResponseFormat {
    /// Ask the provider for a JSON object (structured-output mode)
    Json,
    /// Free-form text
    #[default]
    Text,
}

/// A provider-neutral generation request.
///
/// At least one of `text` or `image_urls` should be non-empty; a request with
/// neither is still sent as-is and the outcome is up to the provider.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GenerationRequest {
    /// System-level instruction. Empty means none.
    pub system_prompt: String,
    /// User text. Empty means none.
    pub text: String,
    /// Image references, resolved to inline bytes by the adapter
    pub image_urls: Vec<String>,
}

impl GenerationRequest {
    /// A text-only request.
    pub fn text(system_prompt: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            system_prompt: system_prompt.into(),
            text: text.into(),
            image_urls: Vec::new(),
        }
    }

    /// A prompt plus a single image.
    pub fn with_image(
        system_prompt: impl Into<String>,
        text: impl Into<String>,
        image_url: impl Into<String>,
    ) -> Self {
        Self {
            system_prompt: system_prompt.into(),
            text: text.into(),
            image_urls: vec![image_url.into()],
        }
    }
}

/// Per-call generation options.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GenerationOptions {
    /// Output token cap. 0 leaves the provider default in place.
    pub max_tokens: u32,
    /// Model name for this call only. `None` or empty uses the adapter default.
    pub model: Option<String>,
    /// Desired response format
    pub response_format: ResponseFormat,
}

impl GenerationOptions {
    /// JSON-mode options with the given token cap.
    pub fn json(max_tokens: u32) -> Self {
        Self {
            max_tokens,
            model: None,
            response_format: ResponseFormat::Json,
        }
    }

    /// Text-mode options with the given token cap.
    pub fn text(max_tokens: u32) -> Self {
        Self {
            max_tokens,
            model: None,
            response_format: ResponseFormat::Text,
        }
    }

    /// Resolve the model for a call against an adapter default.
    pub(crate) fn model_or<'a>(&'a self, default: &'a str) -> &'a str {
        match self.model.as_deref() {
            Some(m) if !m.is_empty() => m,
            _ => default,
        }
    }
}

/// Trait that every generation provider implements.
///
/// Uses `async_trait` because native async fn in trait is not object-safe
/// (services hold an `Arc<dyn Generator>`). Implementations hold only
/// immutable state and must be safe to call concurrently.
#[async_trait]
pub trait Generator: Send + Sync {
    /// Provider name for logging (e.g., "openai", "gemini").
    fn name(&self) -> &str;

    /// Whether the adapter has the credentials it needs.
    async fn is_available(&self) -> bool;

    /// Generate text for `request`, returning the concatenated text of the
    /// top candidate.
    async fn generate(
        &self,
        request: &GenerationRequest,
        options: &GenerationOptions,
    ) -> Result<String, GenerateError>;
}

/// Factory that creates the appropriate generator from config.
pub struct GeneratorFactory;

impl GeneratorFactory {
    /// Create a generator based on provider name, config, and optional model override.
    ///
    /// # Arguments
    /// * `provider` - Provider identifier ("openai", "gemini")
    /// * `config` - The full LLM config section
    /// * `model_override` - Optional model name that overrides the config default
    pub fn create(
        provider: &str,
        config: &LlmConfig,
        model_override: Option<&str>,
    ) -> Result<Arc<dyn Generator>, ConfigError> {
        let fetcher: Arc<dyn ImageFetcher> = Arc::new(HttpImageFetcher::new());

        match provider {
            "openai" => {
                let cfg = config.openai.clone().unwrap_or_default();
                let api_key = resolve_env_var(&cfg.api_key).ok_or_else(|| {
                    ConfigError::ValidationError(
                        "OpenAI API key not set. Set OPENAI_API_KEY env var.".to_string(),
                    )
                })?;
                let model = model_override
                    .map(String::from)
                    .unwrap_or(cfg.model.clone());
                Ok(Arc::new(
                    OpenAiGenerator::new(&api_key, &model, fetcher).with_endpoint(&cfg.endpoint),
                ))
            }
            "gemini" => {
                let cfg = config.gemini.clone().unwrap_or_default();
                let endpoint = match cfg.mode {
                    GeminiMode::ApiKey => {
                        let api_key = resolve_env_var(&cfg.api_key).ok_or_else(|| {
                            ConfigError::ValidationError(
                                "Gemini API key not set. Set GEMINI_API_KEY env var."
                                    .to_string(),
                            )
                        })?;
                        GeminiEndpoint::api_key(&api_key)
                    }
                    GeminiMode::Vertex => {
                        let token = resolve_env_var(&cfg.access_token).ok_or_else(|| {
                            ConfigError::ValidationError(
                                "Vertex access token not set. Set GOOGLE_ACCESS_TOKEN env var."
                                    .to_string(),
                            )
                        })?;
                        GeminiEndpoint::vertex(&cfg.project, &cfg.location, &token)
                    }
                };
                let endpoint = if cfg.endpoint.is_empty() {
                    endpoint
                } else {
                    endpoint.with_base_url(&cfg.endpoint)
                };
                let model = model_override
                    .map(String::from)
                    .unwrap_or(cfg.model.clone());
                Ok(Arc::new(GeminiGenerator::new(endpoint, &model, fetcher)))
            }
            other => Err(ConfigError::ValidationError(format!(
                "Unknown LLM provider: {other}"
            ))),
        }
    }
}
