//! Command implementations and the shared wiring they build on.

pub mod article;
pub mod config;
pub mod generate;
pub mod ocr;

use clap::ValueEnum;
use scrivener_core::{queue, Config, Generator, GeneratorFactory, MessageQueue};
use std::sync::Arc;

/// Supported LLM providers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum LlmProvider {
    /// OpenAI Chat Completions API
    Openai,
    /// Google Gemini (API key or Vertex AI)
    Gemini,
}

impl std::fmt::Display for LlmProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LlmProvider::Openai => write!(f, "openai"),
            LlmProvider::Gemini => write!(f, "gemini"),
        }
    }
}

/// Loaded config plus the global provider/model overrides.
pub struct Context {
    pub config: Config,
    provider: Option<LlmProvider>,
    model: Option<String>,
}

impl Context {
    pub fn new(config: Config, provider: Option<LlmProvider>, model: Option<String>) -> Self {
        Self {
            config,
            provider,
            model,
        }
    }

    /// Provider name after applying `--provider`.
    pub fn provider_name(&self) -> String {
        match self.provider {
            Some(p) => p.to_string(),
            None => self.config.llm.provider.clone(),
        }
    }

    /// Build the generator selected by config and flags.
    pub fn generator(&self) -> anyhow::Result<Arc<dyn Generator>> {
        let provider = self.provider_name();
        let generator =
            GeneratorFactory::create(&provider, &self.config.llm, self.model.as_deref())?;
        tracing::debug!(provider = %provider, "Generator ready");
        Ok(generator)
    }

    /// Build the message queue selected by `[queue]`.
    pub fn queue(&self) -> anyhow::Result<Arc<dyn MessageQueue>> {
        Ok(queue::from_config(&self.config.queue)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_flag_overrides_config() {
        let ctx = Context::new(Config::default(), Some(LlmProvider::Openai), None);
        assert_eq!(ctx.provider_name(), "openai");
    }

    #[test]
    fn test_config_provider_is_default() {
        let ctx = Context::new(Config::default(), None, None);
        assert_eq!(ctx.provider_name(), "gemini");
    }

    #[test]
    fn test_default_queue_builds() {
        let ctx = Context::new(Config::default(), None, None);
        assert!(ctx.queue().is_ok());
    }
}
