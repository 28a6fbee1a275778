//! Book finder pipeline
//!
//! One upload in, one report out:
//!
//! 1. decode the upload upright (EXIF orientation) on the blocking pool
//! 2. run text detection on the normalized image
//! 3. coarse-match the dictionary against the full transcription
//! 4. localize candidates in the word stream, keep only confirmed phrases
//! 5. burn markers into this request's copy of the image and encode it
//!
//! Nothing here outlives the request except the (optionally cached) phrase list.

use axum::body::Bytes;
use serde::Serialize;

use crate::config::MatchingConfig;
use crate::dictionary::PhraseDictionary;
use crate::error::Result;
use crate::matching::{
    find_candidates, localize, CoarseMatch, Rectangle, VisualMatch, DEFAULT_COARSE_THRESHOLD,
    DEFAULT_MATCH_THRESHOLD, DEFAULT_PADDING,
};
use crate::ocr::{OcrPage, OcrService};
use crate::render::{decode_upright, encode, encode_base64, render, MarkerStyle, OutputFormat};

/// Message returned when the OCR service finds no text at all
pub const NO_TEXT_MESSAGE: &str = "No text detected.";

/// Matching and rendering parameters
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FinderSettings {
    pub coarse_threshold: u8,
    pub match_threshold: u8,
    pub padding: i32,
    pub style: MarkerStyle,
    pub output_format: OutputFormat,
}

impl Default for FinderSettings {
    fn default() -> Self {
        Self {
            coarse_threshold: DEFAULT_COARSE_THRESHOLD,
            match_threshold: DEFAULT_MATCH_THRESHOLD,
            padding: DEFAULT_PADDING,
            style: MarkerStyle::default(),
            output_format: OutputFormat::Jpeg,
        }
    }
}

impl From<&MatchingConfig> for FinderSettings {
    fn from(config: &MatchingConfig) -> Self {
        Self {
            coarse_threshold: config.coarse_threshold,
            match_threshold: config.match_threshold,
            padding: config.padding,
            style: MarkerStyle::default(),
            output_format: config.output_format,
        }
    }
}

/// Geometrically grounded matches for one page
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Analysis {
    /// Coarse matches restricted to confirmed phrases
    pub matches: Vec<CoarseMatch>,
    /// Every accepted window
    pub visual_matches: Vec<VisualMatch>,
    /// Marker rectangles in acceptance order
    pub highlights: Vec<Rectangle>,
}

/// Run both matching passes over a page
pub fn analyze(page: &OcrPage, phrases: &[String], settings: &FinderSettings) -> Analysis {
    let candidates = find_candidates(&page.full_text, phrases, settings.coarse_threshold);
    let localization = localize(
        &page.tokens,
        &candidates,
        settings.match_threshold,
        settings.padding,
    );
    let matches = localization.confirmed_candidates(&candidates);

    tracing::info!(
        "{} phrases, {} coarse candidates, {} confirmed, {} windows",
        phrases.len(),
        candidates.len(),
        matches.len(),
        localization.visual_matches.len()
    );

    Analysis {
        matches,
        visual_matches: localization.visual_matches,
        highlights: localization.highlights,
    }
}

/// JSON body of a processed upload
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum FinderResponse {
    /// The OCR service returned no annotations
    NoText {
        message: &'static str,
        matches: Vec<CoarseMatch>,
    },
    /// Text was detected; `matches` may still be empty
    Found {
        matches: Vec<CoarseMatch>,
        /// Base64 encoded marked-up image
        highlighted_image: String,
        visual_match_table: Vec<VisualMatch>,
    },
}

impl FinderResponse {
    pub fn no_text() -> Self {
        Self::NoText {
            message: NO_TEXT_MESSAGE,
            matches: Vec::new(),
        }
    }
}

/// Locates dictionary phrases on uploaded photos
#[derive(Clone)]
pub struct BookFinder {
    ocr: OcrService,
    dictionary: PhraseDictionary,
    settings: FinderSettings,
}

impl BookFinder {
    pub fn new(ocr: OcrService, dictionary: PhraseDictionary, settings: FinderSettings) -> Self {
        Self {
            ocr,
            dictionary,
            settings,
        }
    }

    pub fn ocr(&self) -> &OcrService {
        &self.ocr
    }

    pub fn dictionary(&self) -> &PhraseDictionary {
        &self.dictionary
    }

    pub fn settings(&self) -> &FinderSettings {
        &self.settings
    }

    /// Process one uploaded image
    ///
    /// Decode failures are client errors. OCR faults propagate unchanged.
    pub async fn process(&self, upload: Bytes) -> Result<FinderResponse> {
        let (image, ocr_input) = tokio::task::spawn_blocking(move || {
            let image = decode_upright(&upload)?;
            let ocr_input = encode(&image, OutputFormat::Jpeg)?;
            Ok::<_, crate::render::ImagingError>((image, ocr_input))
        })
        .await??;

        tracing::debug!(
            "Decoded {}x{} image, {} bytes sent to OCR",
            image.width(),
            image.height(),
            ocr_input.len()
        );

        let Some(page) = self.ocr.detect(&ocr_input).await? else {
            tracing::info!("{}", NO_TEXT_MESSAGE);
            return Ok(FinderResponse::no_text());
        };

        let phrases = self.dictionary.phrases().await;
        let Analysis {
            matches,
            visual_matches,
            highlights,
        } = analyze(&page, &phrases, &self.settings);

        let style = self.settings.style;
        let format = self.settings.output_format;
        let highlighted_image = tokio::task::spawn_blocking(move || {
            let mut image = image;
            render(&mut image, &highlights, &style);
            encode_base64(&image, format)
        })
        .await??;

        Ok(FinderResponse::Found {
            matches,
            highlighted_image,
            visual_match_table: visual_matches,
        })
    }
}
