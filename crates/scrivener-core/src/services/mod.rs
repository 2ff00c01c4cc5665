//! Domain services built on a [`Generator`](crate::llm::Generator).
//!
//! - [`OcrService`] reads names and identity records from license images and
//!   publishes the records as events.
//! - [`ArticleService`] extracts tags from and polishes job postings.

mod article;
mod ocr;

pub use article::ArticleService;
pub use ocr::OcrService;
