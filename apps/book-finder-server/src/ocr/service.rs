//! OCR Service
//!
//! Wraps the configured provider and turns its annotations into an `OcrPage`.

use std::sync::Arc;

use super::{
    provider::{GoogleVisionProvider, OcrProviderTrait, TesseractProvider, VisionCredentials},
    types::{OcrError, OcrPage, OcrProvider},
};

/// OCR service configuration
#[derive(Debug, Clone)]
pub struct OcrServiceConfig {
    /// Provider to use
    pub provider: OcrProvider,
    /// Vision API base URL
    pub vision_endpoint: String,
    /// Vision API key
    pub vision_api_key: Option<String>,
    /// Vision OAuth access token (used when no API key is set)
    pub vision_access_token: Option<String>,
    /// Path to the tesseract executable
    pub tesseract_path: String,
    /// Language hint; providers fall back to their own default when unset
    pub language: Option<String>,
}

impl Default for OcrServiceConfig {
    fn default() -> Self {
        Self {
            provider: OcrProvider::GoogleVision,
            vision_endpoint: GoogleVisionProvider::DEFAULT_ENDPOINT.to_string(),
            vision_api_key: None,
            vision_access_token: None,
            tesseract_path: "tesseract".to_string(),
            language: None,
        }
    }
}

/// OCR service for photographed pages
#[derive(Clone)]
pub struct OcrService {
    provider: Arc<dyn OcrProviderTrait>,
    language: Option<String>,
}

impl OcrService {
    /// Create a service around an already constructed provider
    pub fn new(provider: Arc<dyn OcrProviderTrait>, language: Option<String>) -> Self {
        Self { provider, language }
    }

    /// Create the provider selected by `config`
    pub fn from_config(config: &OcrServiceConfig) -> Self {
        let provider: Arc<dyn OcrProviderTrait> = match config.provider {
            OcrProvider::GoogleVision => {
                let credentials = config
                    .vision_api_key
                    .clone()
                    .map(VisionCredentials::ApiKey)
                    .or_else(|| {
                        config
                            .vision_access_token
                            .clone()
                            .map(VisionCredentials::AccessToken)
                    });
                if credentials.is_none() {
                    tracing::warn!("No Google Vision credentials configured, uploads will fail");
                }
                Arc::new(GoogleVisionProvider::new(&config.vision_endpoint, credentials))
            }
            OcrProvider::Tesseract => Arc::new(TesseractProvider::new(
                &config.tesseract_path,
                config.language.as_deref().unwrap_or("eng"),
            )),
        };

        Self::new(provider, config.language.clone())
    }

    /// Get the provider type
    pub fn provider_type(&self) -> OcrProvider {
        self.provider.provider_type()
    }

    /// Check if the provider is available
    pub async fn is_available(&self) -> bool {
        self.provider.is_available().await
    }

    /// Detect text in an encoded image
    ///
    /// `Ok(None)` means the provider found no text. Provider faults are returned
    /// as errors.
    pub async fn detect(&self, image_data: &[u8]) -> Result<Option<OcrPage>, OcrError> {
        let annotations = self
            .provider
            .recognize(image_data, self.language.as_deref())
            .await?;

        tracing::debug!(
            "OCR provider {} returned {} annotations",
            self.provider_type().as_str(),
            annotations.len()
        );

        Ok(OcrPage::from_annotations(annotations))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ocr::provider::MockProvider;
    use crate::ocr::types::TextAnnotation;

    #[tokio::test]
    async fn test_ocr_service_creation() {
        let service = OcrService::from_config(&OcrServiceConfig::default());
        assert_eq!(service.provider_type(), OcrProvider::GoogleVision);
        // No credentials configured
        assert!(!service.is_available().await);

        let config = OcrServiceConfig {
            provider: OcrProvider::Tesseract,
            ..OcrServiceConfig::default()
        };
        let service = OcrService::from_config(&config);
        assert_eq!(service.provider_type(), OcrProvider::Tesseract);
    }

    #[tokio::test]
    async fn test_detect_no_text() {
        let service = OcrService::new(
            Arc::new(MockProvider {
                annotations: Vec::new(),
                available: true,
            }),
            None,
        );

        assert_eq!(service.detect(b"img").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_detect_page() {
        let service = OcrService::new(
            Arc::new(MockProvider {
                annotations: vec![
                    TextAnnotation::block("Moby"),
                    TextAnnotation::word("Moby", Vec::new()),
                ],
                available: true,
            }),
            None,
        );

        let page = service.detect(b"img").await.unwrap().unwrap();
        assert_eq!(page.full_text, "Moby");
        assert_eq!(page.tokens.len(), 1);
    }

    #[tokio::test]
    async fn test_detect_propagates_provider_failure() {
        let service = OcrService::new(
            Arc::new(MockProvider {
                annotations: Vec::new(),
                available: false,
            }),
            None,
        );

        let result = service.detect(b"img").await;
        assert!(matches!(result, Err(OcrError::ProviderNotAvailable(_))));
    }
}
