//! Message queue seam for OCR events.
//!
//! The OCR service only needs "send this event to that topic". Delivery and
//! acknowledgement semantics belong to the implementation; from the
//! service's side every send is at-most-once.

mod logger;
mod pubsub;

pub use logger::LogQueue;
pub use pubsub::PubSubQueue;

use crate::config::{resolve_env_var, QueueConfig, QueueKind};
use crate::error::{ConfigError, QueueError};
use crate::types::OcrEvent;
use async_trait::async_trait;
use std::sync::Arc;

/// A destination for published events.
#[async_trait]
pub trait MessageQueue: Send + Sync {
    /// Publish `event` on `topic`.
    async fn send(&self, topic: &str, event: &OcrEvent) -> Result<(), QueueError>;
}

/// Build the queue selected by `config`.
pub fn from_config(config: &QueueConfig) -> Result<Arc<dyn MessageQueue>, ConfigError> {
    match config.kind {
        QueueKind::Log => Ok(Arc::new(LogQueue)),
        QueueKind::Pubsub => {
            let token = resolve_env_var(&config.access_token).ok_or_else(|| {
                ConfigError::ValidationError(
                    "Pub/Sub access token not set. Set GOOGLE_ACCESS_TOKEN env var.".to_string(),
                )
            })?;
            Ok(Arc::new(
                PubSubQueue::new(&config.project, &token).with_endpoint(&config.endpoint),
            ))
        }
    }
}
