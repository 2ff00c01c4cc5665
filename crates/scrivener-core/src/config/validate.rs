//! Configuration validation.

use crate::error::ConfigError;

use super::{Config, GeminiMode, QueueKind};

impl Config {
    /// Validate that configuration values are usable.
    pub(crate) fn validate(&self) -> Result<(), ConfigError> {
        if !matches!(self.llm.provider.as_str(), "openai" | "gemini") {
            return Err(ConfigError::ValidationError(format!(
                "llm.provider must be \"openai\" or \"gemini\", got \"{}\"",
                self.llm.provider
            )));
        }
        if let Some(gemini) = &self.llm.gemini {
            if gemini.mode == GeminiMode::Vertex
                && (gemini.project.is_empty() || gemini.location.is_empty())
            {
                return Err(ConfigError::ValidationError(
                    "llm.gemini.project and llm.gemini.location are required in vertex mode"
                        .into(),
                ));
            }
        }
        if self.ocr.prod_topic.is_empty() || self.ocr.dev_topic.is_empty() {
            return Err(ConfigError::ValidationError(
                "ocr.prod_topic and ocr.dev_topic must be non-empty".into(),
            ));
        }
        if self.queue.kind == QueueKind::Pubsub && self.queue.project.is_empty() {
            return Err(ConfigError::ValidationError(
                "queue.project is required when queue.kind = \"pubsub\"".into(),
            ));
        }
        Ok(())
    }
}
