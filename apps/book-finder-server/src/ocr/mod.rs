//! OCR Module
//!
//! Text detection with word-level geometry for photographed pages.
//!
//! Supports two backends:
//! - Google Cloud Vision (remote, `TEXT_DETECTION`)
//! - Tesseract (local CLI, TSV output)
//!
//! ## Usage
//!
//! ```rust,ignore
//! use book_finder_server::ocr::{OcrService, OcrServiceConfig};
//!
//! let service = OcrService::from_config(&OcrServiceConfig::default());
//!
//! match service.detect(&jpeg_bytes).await? {
//!     Some(page) => println!("{} words", page.tokens.len()),
//!     None => println!("No text detected."),
//! }
//! ```

mod provider;
mod service;
mod types;

pub use provider::{GoogleVisionProvider, OcrProviderTrait, TesseractProvider, VisionCredentials};
pub use service::{OcrService, OcrServiceConfig};
pub use types::{BoundingPoly, OcrError, OcrPage, OcrProvider, TextAnnotation, Vertex};

#[cfg(test)]
pub use provider::MockProvider;
