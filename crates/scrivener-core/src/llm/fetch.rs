//! Image reference resolution.
//!
//! Both providers are sent inline image bytes, so every image reference in a
//! request is downloaded and its MIME type sniffed before the provider call.

use crate::error::GenerateError;
use async_trait::async_trait;
use base64::Engine;

/// MIME type used when the bytes match no known signature.
const FALLBACK_MIME: &str = "application/octet-stream";

/// Raw image bytes with their sniffed MIME type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchedImage {
    /// Raw bytes as downloaded
    pub bytes: Vec<u8>,
    /// MIME type (e.g., "image/jpeg", "image/png")
    pub mime_type: String,
}

impl FetchedImage {
    /// Wrap bytes, detecting the MIME type from their magic number.
    pub fn from_bytes(bytes: Vec<u8>) -> Self {
        let mime_type = match infer::get(&bytes) {
            Some(kind) => kind.mime_type().to_string(),
            None => {
                tracing::warn!("Unrecognized image signature, sending as {FALLBACK_MIME}");
                FALLBACK_MIME.to_string()
            }
        };
        Self { bytes, mime_type }
    }

    /// Base64-encoded bytes.
    pub fn base64(&self) -> String {
        base64::engine::general_purpose::STANDARD.encode(&self.bytes)
    }

    /// Return a data URL suitable for OpenAI-style APIs.
    pub fn data_url(&self) -> String {
        format!("data:{};base64,{}", self.mime_type, self.base64())
    }
}

/// Resolves an image reference to bytes.
#[async_trait]
pub trait ImageFetcher: Send + Sync {
    /// Download `uri`, failing with [`GenerateError::ImageFetchFailed`].
    async fn fetch(&self, uri: &str) -> Result<FetchedImage, GenerateError>;
}

/// Plain HTTP GET fetcher.
#[derive(Debug, Clone, Default)]
pub struct HttpImageFetcher {
    client: reqwest::Client,
}

impl HttpImageFetcher {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
        }
    }

    /// Share an existing client (and its connection pool).
    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ImageFetcher for HttpImageFetcher {
    async fn fetch(&self, uri: &str) -> Result<FetchedImage, GenerateError> {
        let failed = |message: String| GenerateError::ImageFetchFailed {
            uri: uri.to_string(),
            message,
        };

        let resp = self
            .client
            .get(uri)
            .send()
            .await
            .map_err(|e| failed(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(failed(format!("HTTP {status}")));
        }

        let bytes = resp.bytes().await.map_err(|e| failed(e.to_string()))?;
        tracing::debug!("Fetched {} bytes from {uri}", bytes.len());
        Ok(FetchedImage::from_bytes(bytes.to_vec()))
    }
}

/// Fetch every reference in order, stopping at the first failure.
pub(crate) async fn fetch_all(
    fetcher: &dyn ImageFetcher,
    uris: &[String],
) -> Result<Vec<FetchedImage>, GenerateError> {
    let mut images = Vec::with_capacity(uris.len());
    for uri in uris {
        images.push(fetcher.fetch(uri).await?);
    }
    Ok(images)
}

#[cfg(test)]
pub(crate) mod testing {
    //! Fetcher doubles shared by the adapter tests.

    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;

    /// Smallest valid PNG header, enough for MIME sniffing.
    pub const PNG_BYTES: &[u8] = &[0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, 0, 0, 0, 0];

    /// Returns the same PNG bytes for every URI and counts calls.
    #[derive(Default)]
    pub struct StaticFetcher {
        pub calls: Arc<AtomicU32>,
        pub fail: bool,
    }

    impl StaticFetcher {
        pub fn failing() -> Self {
            Self {
                calls: Arc::new(AtomicU32::new(0)),
                fail: true,
            }
        }

        pub fn call_count_handle(&self) -> Arc<AtomicU32> {
            self.calls.clone()
        }
    }

    #[async_trait]
    impl ImageFetcher for StaticFetcher {
        async fn fetch(&self, uri: &str) -> Result<FetchedImage, GenerateError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(GenerateError::ImageFetchFailed {
                    uri: uri.to_string(),
                    message: "HTTP 404 Not Found".to_string(),
                });
            }
            Ok(FetchedImage::from_bytes(PNG_BYTES.to_vec()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn test_sniffs_png() {
        let image = FetchedImage::from_bytes(testing::PNG_BYTES.to_vec());
        assert_eq!(image.mime_type, "image/png");
    }

    #[test]
    fn test_sniffs_jpeg() {
        let image = FetchedImage::from_bytes(vec![0xFF, 0xD8, 0xFF, 0xE0, 0, 0, 0, 0]);
        assert_eq!(image.mime_type, "image/jpeg");
    }

    #[test]
    fn test_unknown_bytes_fall_back() {
        let image = FetchedImage::from_bytes(vec![1, 2, 3]);
        assert_eq!(image.mime_type, FALLBACK_MIME);
    }

    #[test]
    fn test_data_url() {
        let image = FetchedImage::from_bytes(testing::PNG_BYTES.to_vec());
        assert!(image.data_url().starts_with("data:image/png;base64,iVBORw0KGgo"));
    }

    #[tokio::test]
    async fn test_http_fetch_success() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/img.png"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(testing::PNG_BYTES.to_vec()))
            .expect(1)
            .mount(&server)
            .await;

        let fetcher = HttpImageFetcher::new();
        let image = fetcher
            .fetch(&format!("{}/img.png", server.uri()))
            .await
            .unwrap();
        assert_eq!(image.mime_type, "image/png");
        assert_eq!(image.bytes, testing::PNG_BYTES);
    }

    #[tokio::test]
    async fn test_http_fetch_not_found_carries_uri() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/missing.jpg"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let uri = format!("{}/missing.jpg", server.uri());
        let err = HttpImageFetcher::new().fetch(&uri).await.unwrap_err();
        match err {
            GenerateError::ImageFetchFailed { uri: failed, message } => {
                assert_eq!(failed, uri);
                assert!(message.contains("404"), "Got: {message}");
            }
            other => panic!("Expected ImageFetchFailed, got {other:?}"),
        }
    }
}
