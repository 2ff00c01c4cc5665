//! Google Cloud Pub/Sub publisher using the REST API.

use super::MessageQueue;
use crate::error::QueueError;
use crate::types::OcrEvent;
use async_trait::async_trait;
use base64::Engine;
use serde::Serialize;
use std::collections::HashMap;

/// Publishes events as single-message `topics.publish` calls.
pub struct PubSubQueue {
    project: String,
    access_token: String,
    endpoint: String,
    client: reqwest::Client,
}

impl PubSubQueue {
    pub fn new(project: &str, access_token: &str) -> Self {
        Self {
            project: project.to_string(),
            access_token: access_token.to_string(),
            endpoint: "https://pubsub.googleapis.com".to_string(),
            client: reqwest::Client::new(),
        }
    }

    /// Override the API base URL (emulators, tests).
    pub fn with_endpoint(mut self, endpoint: &str) -> Self {
        if !endpoint.is_empty() {
            self.endpoint = endpoint.trim_end_matches('/').to_string();
        }
        self
    }

    fn publish_url(&self, topic: &str) -> String {
        format!(
            "{}/v1/projects/{}/topics/{topic}:publish",
            self.endpoint, self.project
        )
    }
}

#[derive(Serialize)]
struct PublishRequest {
    messages: Vec<PubsubMessage>,
}

#[derive(Serialize)]
struct PubsubMessage {
    data: String,
    attributes: HashMap<&'static str, String>,
}

#[async_trait]
impl MessageQueue for PubSubQueue {
    async fn send(&self, topic: &str, event: &OcrEvent) -> Result<(), QueueError> {
        let data = serde_json::to_vec(event)?;
        let body = PublishRequest {
            messages: vec![PubsubMessage {
                data: base64::engine::general_purpose::STANDARD.encode(data),
                attributes: HashMap::from([
                    ("type", event.message_type.clone()),
                    ("source", event.source.clone()),
                ]),
            }],
        };

        let resp = self
            .client
            .post(self.publish_url(topic))
            .bearer_auth(&self.access_token)
            .json(&body)
            .send()
            .await
            .map_err(|e| QueueError::Publish {
                message: format!("Pub/Sub request failed: {e}"),
                status_code: None,
            })?;

        let status = resp.status();
        if !status.is_success() {
            let text = resp.text().await.unwrap_or_default();
            return Err(QueueError::Publish {
                message: format!("Pub/Sub HTTP {status}: {text}"),
                status_code: Some(status.as_u16()),
            });
        }

        tracing::debug!(topic, user_id = %event.user_id, "Published OCR event");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::PlatformType;
    use serde_json::json;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, Request, ResponseTemplate};

    fn event() -> OcrEvent {
        OcrEvent::identify(
            "u1",
            json!({ "name": "A", "identify_url": "https://x/img.jpg" }),
            PlatformType::Doctor,
        )
    }

    #[tokio::test]
    async fn test_publish_wire_shape() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/projects/p1/topics/identify-ocr-dev:publish"))
            .and(header("Authorization", "Bearer tok"))
            .and(body_partial_json(json!({
                "messages": [{ "attributes": { "type": "identify_ocr", "source": "apen" } }]
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "messageIds": ["1"] })))
            .expect(1)
            .mount(&server)
            .await;

        let queue = PubSubQueue::new("p1", "tok").with_endpoint(&server.uri());
        queue.send("identify-ocr-dev", &event()).await.unwrap();

        let requests: Vec<Request> = server.received_requests().await.unwrap();
        let body: serde_json::Value = serde_json::from_slice(&requests[0].body).unwrap();
        let data = body["messages"][0]["data"].as_str().unwrap();
        let decoded = base64::engine::general_purpose::STANDARD
            .decode(data)
            .unwrap();
        let sent: OcrEvent = serde_json::from_slice(&decoded).unwrap();
        assert_eq!(sent.user_id, "u1");
        assert_eq!(sent.payload["identify_url"], "https://x/img.jpg");
    }

    #[tokio::test]
    async fn test_publish_error_keeps_status() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(403).set_body_string("permission denied"))
            .mount(&server)
            .await;

        let queue = PubSubQueue::new("p1", "tok").with_endpoint(&server.uri());
        let err = queue.send("identify-ocr", &event()).await.unwrap_err();
        match err {
            QueueError::Publish {
                status_code,
                message,
            } => {
                assert_eq!(status_code, Some(403));
                assert!(message.contains("permission denied"));
            }
            other => panic!("Expected Publish error, got {other:?}"),
        }
    }
}
