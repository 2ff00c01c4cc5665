//! Queue that only logs events, for local runs without a broker.

use super::MessageQueue;
use crate::error::QueueError;
use crate::types::OcrEvent;
use async_trait::async_trait;

/// Writes each event to the log at INFO level and reports success.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogQueue;

#[async_trait]
impl MessageQueue for LogQueue {
    async fn send(&self, topic: &str, event: &OcrEvent) -> Result<(), QueueError> {
        let json = serde_json::to_string(event)?;
        tracing::info!(topic, "OCR event: {json}");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::PlatformType;

    #[tokio::test]
    async fn test_log_queue_accepts_events() {
        let event = OcrEvent::identify("u1", serde_json::json!({}), PlatformType::Doctor);
        assert!(LogQueue.send("identify-ocr-dev", &event).await.is_ok());
    }
}
