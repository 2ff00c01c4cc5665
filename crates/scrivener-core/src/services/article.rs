//! Job-posting article processing.

use crate::config::ArticleConfig;
use crate::error::{ServiceError, ServiceResult};
use crate::llm::{GenerationOptions, GenerationRequest, Generator};
use crate::prompts;
use crate::types::PlatformType;
use std::sync::Arc;

/// Tag extraction and polishing over one shared generator.
#[derive(Clone)]
pub struct ArticleService {
    generator: Arc<dyn Generator>,
    config: ArticleConfig,
}

impl ArticleService {
    pub fn new(generator: Arc<dyn Generator>, config: ArticleConfig) -> Self {
        Self { generator, config }
    }

    /// Extract tags from `content` as a JSON object string.
    ///
    /// The model output is returned unmodified; callers validate the schema.
    pub async fn extract_tags(
        &self,
        content: &str,
        platform: PlatformType,
    ) -> ServiceResult<String> {
        let request =
            GenerationRequest::text(prompts::extract_tags_system_prompt(platform), content);
        self.run(&request, GenerationOptions::json(self.config.max_tokens))
            .await
    }

    /// Rewrite `content` as polished prose for `platform` readers.
    pub async fn polish(&self, content: &str, platform: PlatformType) -> ServiceResult<String> {
        let request = GenerationRequest::text(prompts::polish_system_prompt(platform), content);
        self.run(&request, GenerationOptions::text(self.config.max_tokens))
            .await
    }

    async fn run(
        &self,
        request: &GenerationRequest,
        options: GenerationOptions,
    ) -> ServiceResult<String> {
        let resp = self.generator.generate(request, &options).await?;
        if resp.is_empty() {
            return Err(ServiceError::EmptyResult);
        }
        Ok(resp)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::GenerateError;
    use crate::llm::ResponseFormat;
    use crate::services::testing::MockGenerator;

    fn service(generator: MockGenerator) -> ArticleService {
        ArticleService::new(Arc::new(generator), ArticleConfig::default())
    }

    #[tokio::test]
    async fn test_extract_tags_returns_model_json_unmodified() {
        let generator = MockGenerator::replying(r#"{"工作類別":["全職"]}"#);
        let calls = generator.calls_handle();

        let tags = service(generator)
            .extract_tags("誠徵全職主治醫師...", PlatformType::Doctor)
            .await
            .unwrap();
        assert_eq!(tags, r#"{"工作類別":["全職"]}"#);

        let calls = calls.lock().unwrap();
        let (request, options) = &calls[0];
        assert_eq!(request.text, "誠徵全職主治醫師...");
        assert!(request.image_urls.is_empty());
        assert_eq!(
            request.system_prompt,
            prompts::extract_tags_system_prompt(PlatformType::Doctor)
        );
        assert_eq!(options.response_format, ResponseFormat::Json);
        assert_eq!(options.max_tokens, 2048);
    }

    #[tokio::test]
    async fn test_extract_tags_is_idempotent() {
        let service = service(MockGenerator::replying(r#"{"科別":["內科"]}"#));
        let first = service
            .extract_tags("徵內科醫師", PlatformType::Doctor)
            .await
            .unwrap();
        let second = service
            .extract_tags("徵內科醫師", PlatformType::Doctor)
            .await
            .unwrap();
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_polish_uses_text_mode() {
        let generator = MockGenerator::replying("潤飾後的文章");
        let calls = generator.calls_handle();

        let text = service(generator)
            .polish("徵護理師", PlatformType::Nurse)
            .await
            .unwrap();
        assert_eq!(text, "潤飾後的文章");

        let calls = calls.lock().unwrap();
        let (request, options) = &calls[0];
        assert_eq!(
            request.system_prompt,
            prompts::polish_system_prompt(PlatformType::Nurse)
        );
        assert_eq!(options.response_format, ResponseFormat::Text);
    }

    #[tokio::test]
    async fn test_empty_result_is_an_error() {
        let err = service(MockGenerator::replying(""))
            .polish("徵藥師", PlatformType::Pharmacist)
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::EmptyResult));

        let err = service(MockGenerator::replying(""))
            .extract_tags("徵藥師", PlatformType::Pharmacist)
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::EmptyResult));
    }

    #[tokio::test]
    async fn test_generator_error_propagates() {
        let err = service(MockGenerator::failing(Some(401), "unauthorized"))
            .extract_tags("徵醫師", PlatformType::Doctor)
            .await
            .unwrap_err();
        match err {
            ServiceError::Generate(GenerateError::ProviderCallFailed { message, .. }) => {
                assert!(message.contains("unauthorized"));
            }
            other => panic!("Expected provider failure, got {other:?}"),
        }
    }
}
