//! OCR extraction from professional license images.
//!
//! Each call is one request to the generator in JSON mode. A raw-info scan
//! additionally stamps the source URI into the model output and publishes
//! the record. Publishing is best-effort: once the model output has been
//! parsed the scan has succeeded, and a queue failure is only logged.

use crate::config::OcrConfig;
use crate::error::{ServiceError, ServiceResult};
use crate::json_patch;
use crate::llm::{GenerationOptions, GenerationRequest, Generator};
use crate::prompts;
use crate::queue::MessageQueue;
use crate::types::{OcrEvent, OcrRawInfo, PlatformType};
use serde::Deserialize;
use std::sync::Arc;

/// Key the service always overwrites with the scanned image URI.
const IDENTIFY_URL_KEY: &str = "identify_url";

/// OCR service over a shared generator and message queue.
#[derive(Clone)]
pub struct OcrService {
    generator: Arc<dyn Generator>,
    queue: Arc<dyn MessageQueue>,
    config: OcrConfig,
}

#[derive(Deserialize)]
struct NameResult {
    #[serde(default)]
    name: Option<String>,
}

impl OcrService {
    pub fn new(
        generator: Arc<dyn Generator>,
        queue: Arc<dyn MessageQueue>,
        config: OcrConfig,
    ) -> Self {
        Self {
            generator,
            queue,
            config,
        }
    }

    /// Read the license holder's name from `image_uri`.
    ///
    /// Fails with [`ServiceError::MalformedJson`] when the model does not
    /// answer with a JSON object. A missing or null `name` reads as an empty
    /// string. Publishes nothing.
    pub async fn scan_name(&self, image_uri: &str) -> ServiceResult<String> {
        let request = GenerationRequest::with_image(
            prompts::OCR_SYSTEM_PROMPT,
            prompts::NAME_PROMPT,
            image_uri,
        );
        let options = GenerationOptions::json(self.config.max_tokens);

        let resp = self.generator.generate(&request, &options).await?;
        let result: NameResult = serde_json::from_str(&resp)?;
        Ok(result.name.unwrap_or_default())
    }

    /// Read the full identity record for `platform` from `image_uri`.
    ///
    /// The returned record's `identify_url` is always `image_uri`. After
    /// parsing, an [`OcrEvent`] is sent to the topic chosen by
    /// [`OcrConfig::topic`]; a send failure is logged and does not affect
    /// the result.
    pub async fn scan_raw_info(
        &self,
        user_id: &str,
        image_uri: &str,
        platform: PlatformType,
    ) -> ServiceResult<OcrRawInfo> {
        let request = GenerationRequest::with_image(
            prompts::ocr_system_prompt(platform),
            prompts::extraction_prompt(platform),
            image_uri,
        );
        let options = GenerationOptions::json(self.config.max_tokens);

        let resp = self.generator.generate(&request, &options).await?;
        if resp.is_empty() {
            return Err(ServiceError::EmptyResult);
        }

        let patched = json_patch::set(&resp, IDENTIFY_URL_KEY, image_uri)?;
        let payload: serde_json::Value = serde_json::from_str(&patched)?;
        let info = OcrRawInfo::deserialize(&payload)?;

        self.publish(user_id, payload, platform).await;
        Ok(info)
    }

    async fn publish(&self, user_id: &str, payload: serde_json::Value, platform: PlatformType) {
        let topic = self.config.topic();
        let event = OcrEvent::identify(user_id, payload, platform);
        if let Err(e) = self.queue.send(topic, &event).await {
            tracing::error!(
                topic,
                user_id,
                source = platform.as_str(),
                "Failed to send OCR result: {e}"
            );
        }
    }
}
