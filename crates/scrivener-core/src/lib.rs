//! Scrivener Core - Provider-agnostic LLM generation gateway.
//!
//! Scrivener turns a system prompt, user text and optional image URIs into
//! generated text through one [`Generator`] capability, backed by either the
//! OpenAI Chat Completions API or Google Gemini. Two services sit on top of it:
//!
//! - [`OcrService`] reads names and identity records from professional
//!   license images and publishes each record to a message queue.
//! - [`ArticleService`] extracts tags from job postings and polishes them.
//!
//! # Architecture
//!
//! ```text
//! Service → Prompt catalog → Generator (OpenAI | Gemini) → JSON patch → Queue
//! ```
//!
//! # Usage
//!
//! ```rust,ignore
//! use scrivener_core::{ArticleService, Config, GeneratorFactory, PlatformType};
//!
//! #[tokio::main]
//! async fn main() -> scrivener_core::Result<()> {
//!     let config = Config::load()?;
//!     let generator = GeneratorFactory::create(&config.llm.provider, &config.llm, None)?;
//!     let articles = ArticleService::new(generator, config.article.clone());
//!
//!     let tags = articles.extract_tags("誠徵全職主治醫師...", PlatformType::Doctor).await?;
//!     println!("{tags}");
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod json_patch;
pub mod llm;
pub mod prompts;
pub mod queue;
pub mod services;
pub mod types;

pub use config::Config;
pub use error::{
    ConfigError, ErrorKind, GenerateError, JsonPatchError, QueueError, Result, ScrivenerError,
    ServiceError, ServiceResult,
};
pub use llm::{
    GenerationOptions, GenerationRequest, Generator, GeneratorFactory, ResponseFormat,
};
pub use queue::MessageQueue;
pub use services::{ArticleService, OcrService};
pub use types::{OcrEvent, OcrRawInfo, PlatformType};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}
