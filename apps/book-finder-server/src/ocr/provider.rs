//! OCR Providers
//!
//! Defines the provider trait and implementations for the text detection backends.
//! Every provider returns the same annotation list: the full-text block first,
//! then one annotation per located word.

use std::collections::BTreeMap;
use std::process::Stdio;

use async_trait::async_trait;
use serde::Deserialize;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;

use super::types::{OcrError, OcrProvider, TextAnnotation, Vertex};

/// OCR provider trait
#[async_trait]
pub trait OcrProviderTrait: Send + Sync {
    /// Get the provider type
    fn provider_type(&self) -> OcrProvider;

    /// Check if the provider is available
    async fn is_available(&self) -> bool;

    /// Detect text and word geometry in an encoded image
    async fn recognize(
        &self,
        image_data: &[u8],
        language: Option<&str>,
    ) -> Result<Vec<TextAnnotation>, OcrError>;
}

/// Validate a language code before it is handed to a provider
fn validate_language(lang: &str) -> Result<(), OcrError> {
    // e.g. "en", "eng", "eng+deu", "chi_sim", "zh-Hant"
    if lang.is_empty() || lang.len() > 20 {
        return Err(OcrError::ProcessingError(
            "Invalid language code length".to_string(),
        ));
    }
    for c in lang.chars() {
        if !c.is_ascii_alphanumeric() && c != '+' && c != '_' && c != '-' {
            return Err(OcrError::ProcessingError(format!(
                "Invalid character in language code: {}",
                c
            )));
        }
    }
    Ok(())
}

// ============================================================================
// Google Cloud Vision
// ============================================================================

/// Credentials for the Vision REST API
#[derive(Debug, Clone)]
pub enum VisionCredentials {
    /// API key, sent as the `key` query parameter
    ApiKey(String),
    /// OAuth access token, sent as a bearer token
    AccessToken(String),
}

/// Google Cloud Vision `TEXT_DETECTION` provider
pub struct GoogleVisionProvider {
    /// API base URL
    endpoint: String,
    credentials: Option<VisionCredentials>,
    client: reqwest::Client,
}

#[derive(Debug, Deserialize)]
struct AnnotateResponse {
    #[serde(default)]
    responses: Vec<AnnotateImageResponse>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AnnotateImageResponse {
    #[serde(default)]
    text_annotations: Vec<TextAnnotation>,
    #[serde(default)]
    error: Option<VisionStatus>,
}

#[derive(Debug, Deserialize)]
struct VisionStatus {
    #[serde(default)]
    code: i32,
    #[serde(default)]
    message: String,
}

impl GoogleVisionProvider {
    pub const DEFAULT_ENDPOINT: &'static str = "https://vision.googleapis.com";

    pub fn new(endpoint: &str, credentials: Option<VisionCredentials>) -> Self {
        Self {
            endpoint: endpoint.trim_end_matches('/').to_string(),
            credentials,
            client: reqwest::Client::new(),
        }
    }

    fn annotate_url(&self) -> String {
        format!("{}/v1/images:annotate", self.endpoint)
    }

    fn request_body(image_data: &[u8], language: Option<&str>) -> serde_json::Value {
        use base64::Engine;

        let content = base64::engine::general_purpose::STANDARD.encode(image_data);
        let mut request = serde_json::json!({
            "image": { "content": content },
            "features": [{ "type": "TEXT_DETECTION" }]
        });
        if let Some(lang) = language {
            request["imageContext"] = serde_json::json!({ "languageHints": [lang] });
        }

        serde_json::json!({ "requests": [request] })
    }

    fn parse_response(body: AnnotateResponse) -> Result<Vec<TextAnnotation>, OcrError> {
        let Some(image_response) = body.responses.into_iter().next() else {
            return Err(OcrError::InvalidResponse(
                "Vision returned no image response".to_string(),
            ));
        };

        if let Some(status) = image_response.error {
            return Err(OcrError::ApiError(format!(
                "Vision error {}: {}",
                status.code, status.message
            )));
        }

        Ok(image_response.text_annotations)
    }
}

#[async_trait]
impl OcrProviderTrait for GoogleVisionProvider {
    fn provider_type(&self) -> OcrProvider {
        OcrProvider::GoogleVision
    }

    async fn is_available(&self) -> bool {
        self.credentials.is_some()
    }

    async fn recognize(
        &self,
        image_data: &[u8],
        language: Option<&str>,
    ) -> Result<Vec<TextAnnotation>, OcrError> {
        let Some(credentials) = &self.credentials else {
            return Err(OcrError::ProviderNotAvailable(
                "No Google Vision credentials configured".to_string(),
            ));
        };
        if let Some(lang) = language {
            validate_language(lang)?;
        }

        let request = self
            .client
            .post(self.annotate_url())
            .json(&Self::request_body(image_data, language));
        let request = match credentials {
            VisionCredentials::ApiKey(key) => request.query(&[("key", key)]),
            VisionCredentials::AccessToken(token) => request.bearer_auth(token),
        };

        let response = request
            .send()
            .await
            .map_err(|e| OcrError::ApiError(format!("Failed to call Vision: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(OcrError::ApiError(format!(
                "Vision returned {}: {}",
                status, body
            )));
        }

        let body: AnnotateResponse = response
            .json()
            .await
            .map_err(|e| OcrError::InvalidResponse(format!("Failed to parse response: {}", e)))?;

        Self::parse_response(body)
    }
}

// ============================================================================
// Tesseract
// ============================================================================

/// Tesseract OCR provider (CLI, TSV output)
pub struct TesseractProvider {
    /// Path to the tesseract executable
    binary: String,
    /// Default language
    default_language: String,
}

/// One row of `tesseract ... tsv` output
#[derive(Debug, Deserialize)]
struct TsvRow {
    level: u32,
    block_num: u32,
    par_num: u32,
    line_num: u32,
    left: i32,
    top: i32,
    width: i32,
    height: i32,
    #[serde(default)]
    text: String,
}

/// TSV level of word rows
const TSV_WORD_LEVEL: u32 = 5;

impl TesseractProvider {
    pub fn new(binary: &str, default_language: &str) -> Self {
        Self {
            binary: binary.to_string(),
            default_language: default_language.to_string(),
        }
    }

    /// Convert TSV output into a full-text block followed by word annotations
    fn parse_tsv(tsv: &[u8]) -> Result<Vec<TextAnnotation>, OcrError> {
        let mut reader = csv::ReaderBuilder::new()
            .delimiter(b'\t')
            .quoting(false)
            .flexible(true)
            .from_reader(tsv);

        let mut lines: BTreeMap<(u32, u32, u32), Vec<String>> = BTreeMap::new();
        let mut words = Vec::new();

        for row in reader.deserialize::<TsvRow>() {
            let row = row.map_err(|e| {
                OcrError::InvalidResponse(format!("Malformed tesseract TSV: {}", e))
            })?;
            let text = row.text.trim();
            if row.level != TSV_WORD_LEVEL || text.is_empty() {
                continue;
            }

            lines
                .entry((row.block_num, row.par_num, row.line_num))
                .or_default()
                .push(text.to_string());

            let (x1, y1) = (row.left, row.top);
            let (x2, y2) = (row.left + row.width, row.top + row.height);
            words.push(TextAnnotation::word(
                text,
                vec![
                    Vertex { x: x1, y: y1 },
                    Vertex { x: x2, y: y1 },
                    Vertex { x: x2, y: y2 },
                    Vertex { x: x1, y: y2 },
                ],
            ));
        }

        if words.is_empty() {
            return Ok(Vec::new());
        }

        let full_text = lines
            .values()
            .map(|line| line.join(" "))
            .collect::<Vec<_>>()
            .join("\n");

        let mut annotations = Vec::with_capacity(words.len() + 1);
        annotations.push(TextAnnotation::block(full_text));
        annotations.extend(words);
        Ok(annotations)
    }
}

#[async_trait]
impl OcrProviderTrait for TesseractProvider {
    fn provider_type(&self) -> OcrProvider {
        OcrProvider::Tesseract
    }

    async fn is_available(&self) -> bool {
        let result = Command::new(&self.binary)
            .arg("--version")
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .await;

        matches!(result, Ok(status) if status.success())
    }

    async fn recognize(
        &self,
        image_data: &[u8],
        language: Option<&str>,
    ) -> Result<Vec<TextAnnotation>, OcrError> {
        let lang = language.unwrap_or(&self.default_language);
        validate_language(lang)?;

        let mut child = Command::new(&self.binary)
            .arg("stdin")
            .arg("stdout")
            .arg("-l")
            .arg(lang)
            .arg("tsv")
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| {
                OcrError::ProviderNotAvailable(format!("Failed to run tesseract: {}", e))
            })?;

        if let Some(mut stdin) = child.stdin.take() {
            stdin.write_all(image_data).await.map_err(|e| {
                OcrError::ProcessingError(format!("Failed to send image to tesseract: {}", e))
            })?;
        }

        let output = child
            .wait_with_output()
            .await
            .map_err(|e| OcrError::ProcessingError(format!("Tesseract did not finish: {}", e)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(OcrError::ProcessingError(format!(
                "Tesseract failed: {}",
                stderr.trim()
            )));
        }

        Self::parse_tsv(&output.stdout)
    }
}

/// Mock provider for testing
#[cfg(test)]
pub struct MockProvider {
    pub annotations: Vec<TextAnnotation>,
    pub available: bool,
}

#[cfg(test)]
#[async_trait]
impl OcrProviderTrait for MockProvider {
    fn provider_type(&self) -> OcrProvider {
        OcrProvider::GoogleVision
    }

    async fn is_available(&self) -> bool {
        self.available
    }

    async fn recognize(
        &self,
        _image_data: &[u8],
        _language: Option<&str>,
    ) -> Result<Vec<TextAnnotation>, OcrError> {
        if !self.available {
            return Err(OcrError::ProviderNotAvailable("mock is offline".to_string()));
        }
        Ok(self.annotations.clone())
    }
}
