//! Phrase matching
//!
//! Two passes over the OCR output of one photographed page:
//!
//! - `coarse`: partial-similarity scan of the full transcription against the
//!   phrase dictionary. Cheap and permissive, ungrounded in geometry.
//! - `localize`: sliding windows of consecutive recognized words, scored with
//!   full-string similarity. Every accepted window yields a rectangle, and only
//!   phrases confirmed this way are reported.
//!
//! The two passes deliberately use different metrics and different threshold
//! comparators (`>` for coarse, `>=` for localization).

pub mod coarse;
pub mod localize;
pub mod similarity;
mod types;

pub use coarse::{find_candidates, DEFAULT_COARSE_THRESHOLD};
pub use localize::{
    localize, rectangle_for_window, Localization, DEFAULT_MATCH_THRESHOLD, DEFAULT_PADDING,
};
pub use types::{fold, CoarseMatch, Point, Rectangle, VisualMatch, WordToken};
