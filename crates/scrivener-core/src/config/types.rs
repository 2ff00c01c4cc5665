//! Sub-configuration structs with their defaults.

use serde::{Deserialize, Serialize};

/// Default OCR topic in production deployments.
pub const OCR_TOPIC_PROD: &str = "identify-ocr";

/// Default OCR topic everywhere else.
pub const OCR_TOPIC_DEV: &str = "identify-ocr-dev";

/// LLM provider settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    /// Provider used when none is given on the command line ("openai" or "gemini")
    pub provider: String,

    /// OpenAI configuration
    pub openai: Option<OpenAiConfig>,

    /// Gemini configuration
    pub gemini: Option<GeminiConfig>,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            provider: "gemini".to_string(),
            openai: None,
            gemini: None,
        }
    }
}

/// OpenAI configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OpenAiConfig {
    /// API key (supports ${ENV_VAR} syntax)
    pub api_key: String,

    /// Model name
    pub model: String,

    /// Chat Completions endpoint
    pub endpoint: String,
}

impl Default for OpenAiConfig {
    fn default() -> Self {
        Self {
            api_key: "${OPENAI_API_KEY}".to_string(),
            model: "gpt-4o".to_string(),
            endpoint: "https://api.openai.com/v1/chat/completions".to_string(),
        }
    }
}

/// How the Gemini adapter authenticates and which API surface it calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GeminiMode {
    /// Generative Language API with an API key
    #[default]
    ApiKey,
    /// Vertex AI with project, location and a bearer access token
    Vertex,
}

/// Gemini configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeminiConfig {
    /// API surface
    pub mode: GeminiMode,

    /// API key for `api_key` mode (supports ${ENV_VAR} syntax)
    pub api_key: String,

    /// Google Cloud project for `vertex` mode
    pub project: String,

    /// Google Cloud location for `vertex` mode
    pub location: String,

    /// OAuth access token for `vertex` mode (supports ${ENV_VAR} syntax)
    pub access_token: String,

    /// Model name
    pub model: String,

    /// Base URL override. Empty selects the public endpoint for `mode`.
    pub endpoint: String,
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            mode: GeminiMode::ApiKey,
            api_key: "${GEMINI_API_KEY}".to_string(),
            project: String::new(),
            location: "us-central1".to_string(),
            access_token: "${GOOGLE_ACCESS_TOKEN}".to_string(),
            model: "gemini-2.5-flash".to_string(),
            endpoint: String::new(),
        }
    }
}

/// OCR service settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OcrConfig {
    /// Output token cap for OCR calls
    pub max_tokens: u32,

    /// Publish to the production topic instead of the development one
    pub is_prod: bool,

    /// Production topic name
    pub prod_topic: String,

    /// Development topic name
    pub dev_topic: String,
}

impl Default for OcrConfig {
    fn default() -> Self {
        Self {
            max_tokens: 1024,
            is_prod: false,
            prod_topic: OCR_TOPIC_PROD.to_string(),
            dev_topic: OCR_TOPIC_DEV.to_string(),
        }
    }
}

impl OcrConfig {
    /// Topic selected by the deployment environment flag.
    pub fn topic(&self) -> &str {
        if self.is_prod {
            &self.prod_topic
        } else {
            &self.dev_topic
        }
    }
}

/// Article service settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ArticleConfig {
    /// Output token cap for article calls
    pub max_tokens: u32,
}

impl Default for ArticleConfig {
    fn default() -> Self {
        Self { max_tokens: 2048 }
    }
}

/// Which message queue receives OCR events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QueueKind {
    /// Log events instead of publishing them
    #[default]
    Log,
    /// Google Cloud Pub/Sub REST API
    Pubsub,
}

/// Message queue settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct QueueConfig {
    /// Queue implementation
    pub kind: QueueKind,

    /// Google Cloud project owning the topics (pubsub only)
    pub project: String,

    /// OAuth access token (supports ${ENV_VAR} syntax)
    pub access_token: String,

    /// Pub/Sub API base URL
    pub endpoint: String,
}

impl Default for QueueConfig {
    fn default() -> Self {
        Self {
            kind: QueueKind::Log,
            project: String::new(),
            access_token: "${GOOGLE_ACCESS_TOKEN}".to_string(),
            endpoint: "https://pubsub.googleapis.com".to_string(),
        }
    }
}

/// Logging settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level: error, warn, info, debug, trace
    pub level: String,

    /// Log format: "pretty" or "json"
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}
