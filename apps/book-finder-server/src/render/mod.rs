//! Image handling for uploads
//!
//! - `codec`: decode uploads upright, encode results for OCR and transport
//! - `marker`: burn match rectangles into the page image

mod codec;
mod marker;

pub use codec::{decode_upright, encode, encode_base64, ImagingError, OutputFormat};
pub use marker::{render, MarkerStyle};
