//! Matching types

use serde::{Deserialize, Serialize};

/// Case-fold text for comparison.
///
/// Phrase identity is case-folded text equality: two dictionary entries that
/// fold to the same string are the same phrase.
pub fn fold(text: &str) -> String {
    text.to_lowercase()
}

/// Pixel coordinate of a polygon vertex
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// One OCR-recognized word in reading order
#[derive(Debug, Clone, PartialEq)]
pub struct WordToken {
    /// Recognized text, as returned by the OCR service
    pub text: String,
    /// Bounding polygon, normally 4 vertices. Treated as axis-aligned.
    pub polygon: Vec<Point>,
}

impl WordToken {
    pub fn new(text: impl Into<String>, polygon: Vec<Point>) -> Self {
        Self {
            text: text.into(),
            polygon,
        }
    }

    /// Token with an axis-aligned box polygon (clockwise from top-left)
    pub fn with_box(text: impl Into<String>, x1: i32, y1: i32, x2: i32, y2: i32) -> Self {
        Self::new(
            text,
            vec![
                Point::new(x1, y1),
                Point::new(x2, y1),
                Point::new(x2, y2),
                Point::new(x1, y2),
            ],
        )
    }
}

/// Whole-text approximate match of a dictionary phrase
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoarseMatch {
    /// Phrase as it appears in the dictionary
    pub phrase: String,
    /// Partial similarity (0-100)
    pub score: u8,
}

/// A window of recognized words accepted for a phrase
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VisualMatch {
    /// Joined, case-folded text of the window
    pub ocr_text: String,
    /// Case-folded phrase the window matched
    pub matched_phrase: String,
    /// Full-string similarity between window and phrase (0-100)
    pub score: u8,
}

/// Pixel rectangle, may extend past the image canvas
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rectangle {
    pub x1: i32,
    pub y1: i32,
    pub x2: i32,
    pub y2: i32,
}

impl Rectangle {
    pub fn width(&self) -> u32 {
        (self.x2 - self.x1).max(0) as u32
    }

    pub fn height(&self) -> u32 {
        (self.y2 - self.y1).max(0) as u32
    }
}
