//! Book Finder Server Library
//!
//! Locates known titles in a photographed shelf or page. The server binary in
//! main.rs wires these modules into an HTTP service; benchmarks and tests use
//! them directly.
//!
//! # Modules
//!
//! - `matching`: fuzzy similarity, coarse candidate search, geometric localization
//! - `ocr`: text detection providers (Google Vision, Tesseract)
//! - `render`: EXIF-aware decoding, marker drawing, image encoding
//! - `dictionary`: CSV phrase list
//! - `finder`: the per-upload pipeline
//! - `routes`: HTTP endpoints

pub mod config;
pub mod dictionary;
pub mod error;
pub mod finder;
pub mod matching;
pub mod ocr;
pub mod render;
pub mod routes;
pub mod state;
