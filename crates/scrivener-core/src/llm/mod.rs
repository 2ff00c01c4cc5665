//! Provider-agnostic text/vision generation.
//!
//! Provides one `Generator` capability over multiple LLM backends (OpenAI
//! Chat Completions, Gemini generateContent) plus the image fetcher both
//! adapters use to inline image references.

pub(crate) mod fetch;
pub(crate) mod gemini;
pub(crate) mod openai;
pub(crate) mod provider;

pub use fetch::{FetchedImage, HttpImageFetcher, ImageFetcher};
pub use gemini::{GeminiEndpoint, GeminiGenerator};
pub use openai::OpenAiGenerator;
pub use provider::{
    GenerationOptions, GenerationRequest, Generator, GeneratorFactory, ResponseFormat,
};
