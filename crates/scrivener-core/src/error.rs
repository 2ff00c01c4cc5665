//! Error types for the Scrivener generation gateway.
//!
//! Errors are organized by layer: configuration, provider generation,
//! domain services and the message queue side channel. Each layer error can
//! be classified into an [`ErrorKind`] so callers can decide whether a
//! failure is worth retrying under their own policy.

use thiserror::Error;

/// Top-level error type for Scrivener operations.
#[derive(Error, Debug)]
pub enum ScrivenerError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Provider generation errors
    #[error("Generation error: {0}")]
    Generate(#[from] GenerateError),

    /// OCR / article service errors
    #[error("Service error: {0}")]
    Service(#[from] ServiceError),

    /// General I/O errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Broad failure classes shared by every layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Setup is wrong; retrying without fixing it is pointless.
    Configuration,
    /// The provider or a fetched resource failed; may be transient.
    Upstream,
    /// The model answered but the answer was empty or unparseable.
    MalformedResponse,
    /// A secondary side effect (queue publish) failed.
    SideEffect,
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to read the config file from disk
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    /// Failed to parse TOML configuration
    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),

    /// Configuration values are invalid
    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

/// Errors raised by a [`Generator`](crate::llm::Generator) call.
///
/// All variants are terminal for the call that produced them.
#[derive(Error, Debug)]
pub enum GenerateError {
    /// The adapter has no usable credentials
    #[error("{provider} client is not initialized")]
    NotInitialized { provider: String },

    /// An image reference could not be resolved to bytes
    #[error("Failed to download image {uri}: {message}")]
    ImageFetchFailed { uri: String, message: String },

    /// The provider call itself failed
    #[error("{provider} request failed: {message}")]
    ProviderCallFailed {
        provider: String,
        message: String,
        status_code: Option<u16>,
    },

    /// The provider returned no candidates / choices
    #[error("Empty response from {provider}")]
    EmptyResponse { provider: String },

    /// The top candidate carried no content parts
    #[error("Empty content in {provider} response")]
    EmptyContent { provider: String },
}

impl GenerateError {
    /// Classify this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            GenerateError::NotInitialized { .. } => ErrorKind::Configuration,
            GenerateError::ImageFetchFailed { .. } | GenerateError::ProviderCallFailed { .. } => {
                ErrorKind::Upstream
            }
            GenerateError::EmptyResponse { .. } | GenerateError::EmptyContent { .. } => {
                ErrorKind::MalformedResponse
            }
        }
    }
}

/// Errors raised by the OCR and article services.
#[derive(Error, Debug)]
pub enum ServiceError {
    /// The underlying generator failed
    #[error(transparent)]
    Generate(#[from] GenerateError),

    /// The generator succeeded but produced no text
    #[error("Empty response content from AI client")]
    EmptyResult,

    /// The model output was not the expected JSON shape
    #[error("Malformed JSON in model response: {0}")]
    MalformedJson(#[from] serde_json::Error),

    /// The model output could not be patched
    #[error("Failed to patch model response: {0}")]
    Patch(#[from] JsonPatchError),
}

impl ServiceError {
    /// Classify this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            ServiceError::Generate(e) => e.kind(),
            ServiceError::EmptyResult | ServiceError::MalformedJson(_) | ServiceError::Patch(_) => {
                ErrorKind::MalformedResponse
            }
        }
    }
}

/// Errors raised by [`json_patch::set`](crate::json_patch::set).
#[derive(Error, Debug, PartialEq, Eq)]
pub enum JsonPatchError {
    /// The document is not a JSON object at the top level
    #[error("Top-level JSON value is not an object")]
    NotAnObject,

    /// The document is not valid JSON
    #[error("Invalid JSON at byte {offset}: {message}")]
    Syntax { offset: usize, message: String },

    /// Something other than whitespace follows the top-level object
    #[error("Trailing characters after JSON object at byte {offset}")]
    TrailingCharacters { offset: usize },
}

/// Errors raised by a [`MessageQueue`](crate::queue::MessageQueue).
#[derive(Error, Debug)]
pub enum QueueError {
    /// The event could not be encoded
    #[error("Failed to serialize event: {0}")]
    Serialize(#[from] serde_json::Error),

    /// The broker rejected or never received the event
    #[error("Publish failed: {message}")]
    Publish {
        message: String,
        status_code: Option<u16>,
    },
}

impl QueueError {
    /// Classify this error. Queue failures are always side effects.
    pub fn kind(&self) -> ErrorKind {
        ErrorKind::SideEffect
    }
}

/// Convenience type alias for Scrivener results.
pub type Result<T> = std::result::Result<T, ScrivenerError>;

/// Convenience type alias for service-level results.
pub type ServiceResult<T> = std::result::Result<T, ServiceError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_error_kinds() {
        let err = GenerateError::NotInitialized {
            provider: "openai".to_string(),
        };
        assert_eq!(err.kind(), ErrorKind::Configuration);

        let err = GenerateError::ProviderCallFailed {
            provider: "gemini".to_string(),
            message: "HTTP 503".to_string(),
            status_code: Some(503),
        };
        assert_eq!(err.kind(), ErrorKind::Upstream);

        let err = GenerateError::EmptyResponse {
            provider: "gemini".to_string(),
        };
        assert_eq!(err.kind(), ErrorKind::MalformedResponse);
    }

    #[test]
    fn test_service_error_inherits_generate_kind() {
        let err = ServiceError::from(GenerateError::ImageFetchFailed {
            uri: "https://x/img.jpg".to_string(),
            message: "HTTP 404".to_string(),
        });
        assert_eq!(err.kind(), ErrorKind::Upstream);
        assert_eq!(ServiceError::EmptyResult.kind(), ErrorKind::MalformedResponse);
    }

    #[test]
    fn test_image_fetch_error_names_uri() {
        let err = GenerateError::ImageFetchFailed {
            uri: "https://x/img.jpg".to_string(),
            message: "connection refused".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("https://x/img.jpg"));
        assert!(msg.contains("connection refused"));
    }
}
