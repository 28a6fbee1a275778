//! OCR Types
//!
//! Boundary types for text detection on a photographed page. The shape follows
//! the Vision API `textAnnotations` list: element 0 is the full-text block,
//! elements 1..N are the individual words in reading order.

use serde::{Deserialize, Serialize};

use crate::matching::{Point, WordToken};

/// OCR provider type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OcrProvider {
    /// Google Cloud Vision text detection (remote)
    #[serde(rename = "google")]
    GoogleVision,
    /// Tesseract CLI (local)
    Tesseract,
}

impl Default for OcrProvider {
    fn default() -> Self {
        Self::GoogleVision
    }
}

impl OcrProvider {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::GoogleVision => "google",
            Self::Tesseract => "tesseract",
        }
    }
}

impl std::str::FromStr for OcrProvider {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "google" | "vision" | "google-vision" => Ok(Self::GoogleVision),
            "tesseract" => Ok(Self::Tesseract),
            other => Err(format!("unknown OCR provider '{}'", other)),
        }
    }
}

/// Polygon vertex in image pixels. The Vision API omits zero coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Vertex {
    #[serde(default)]
    pub x: i32,
    #[serde(default)]
    pub y: i32,
}

/// Bounding polygon of an annotation
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct BoundingPoly {
    #[serde(default)]
    pub vertices: Vec<Vertex>,
}

/// One text annotation returned by a provider
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextAnnotation {
    /// Recognized text (full block for element 0, a word otherwise)
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bounding_poly: Option<BoundingPoly>,
}

impl TextAnnotation {
    pub fn word(description: impl Into<String>, vertices: Vec<Vertex>) -> Self {
        Self {
            description: description.into(),
            bounding_poly: Some(BoundingPoly { vertices }),
        }
    }

    pub fn block(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            bounding_poly: None,
        }
    }

    fn into_token(self) -> WordToken {
        let polygon = self
            .bounding_poly
            .map(|poly| {
                poly.vertices
                    .into_iter()
                    .map(|v| Point::new(v.x, v.y))
                    .collect()
            })
            .unwrap_or_default();
        WordToken::new(self.description, polygon)
    }
}

/// Text detected on one page
#[derive(Debug, Clone, PartialEq)]
pub struct OcrPage {
    /// Full transcription
    pub full_text: String,
    /// Individually located words in reading order
    pub tokens: Vec<WordToken>,
}

impl OcrPage {
    /// Split a provider's annotation list into full text and word tokens
    ///
    /// Returns `None` when nothing was detected.
    pub fn from_annotations(annotations: Vec<TextAnnotation>) -> Option<Self> {
        let mut annotations = annotations.into_iter();
        let full_text = annotations.next()?.description;
        let tokens = annotations.map(TextAnnotation::into_token).collect();

        Some(Self { full_text, tokens })
    }
}

/// OCR error types
#[derive(Debug, thiserror::Error)]
pub enum OcrError {
    #[error("OCR provider not available: {0}")]
    ProviderNotAvailable(String),

    #[error("OCR processing failed: {0}")]
    ProcessingError(String),

    #[error("API error: {0}")]
    ApiError(String),

    #[error("Invalid OCR response: {0}")]
    InvalidResponse(String),
}

impl OcrError {
    pub fn status_code(&self) -> axum::http::StatusCode {
        use axum::http::StatusCode;
        match self {
            Self::ProviderNotAvailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            Self::ApiError(_) | Self::InvalidResponse(_) => StatusCode::BAD_GATEWAY,
            Self::ProcessingError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}
