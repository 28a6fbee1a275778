//! Geometric localization of candidate phrases in the word stream
//!
//! For a phrase of `k` whitespace-separated tokens, every run of exactly `k`
//! consecutive recognized words is joined with single spaces and compared
//! end-to-end against the phrase. Accepted windows are turned into padded
//! rectangles over the union of their word polygons.

use std::collections::HashSet;

use super::similarity::{ratio, score};
use super::types::{fold, CoarseMatch, Rectangle, VisualMatch, WordToken};

/// A window is accepted when its score is at least this (inclusive)
pub const DEFAULT_MATCH_THRESHOLD: u8 = 85;

/// Pixels added on every side of a window's bounding rectangle
pub const DEFAULT_PADDING: i32 = 20;

/// Outcome of localizing candidate phrases
#[derive(Debug, Clone, Default)]
pub struct Localization {
    /// One entry per accepted window, in acceptance order
    pub visual_matches: Vec<VisualMatch>,
    /// Case-folded phrases confirmed by at least one window
    pub confirmed: HashSet<String>,
    /// One rectangle per accepted window, in acceptance order
    pub highlights: Vec<Rectangle>,
}

impl Localization {
    /// Whether `phrase` was confirmed by at least one window
    pub fn is_confirmed(&self, phrase: &str) -> bool {
        self.confirmed.contains(&fold(phrase))
    }

    /// Restrict coarse candidates to phrases that were geometrically located
    pub fn confirmed_candidates(&self, candidates: &[CoarseMatch]) -> Vec<CoarseMatch> {
        candidates
            .iter()
            .filter(|candidate| self.is_confirmed(&candidate.phrase))
            .cloned()
            .collect()
    }
}

/// Slide phrase-sized windows over `tokens` for every candidate phrase
///
/// Candidates are processed in order. A window is accepted when its unrounded
/// similarity is at least `match_threshold`; the reported score is rounded.
///
/// Dictionary entries that fold to the same text are scanned only once, so a
/// title listed twice with different casing yields one table row and one
/// marker per window rather than one per entry. Every such entry still passes
/// [`Localization::confirmed_candidates`]. A phrase with no qualifying window
/// is simply absent from `confirmed`.
pub fn localize(
    tokens: &[WordToken],
    candidates: &[CoarseMatch],
    match_threshold: u8,
    pad: i32,
) -> Localization {
    let folded_tokens: Vec<String> = tokens.iter().map(|token| fold(&token.text)).collect();
    let mut scanned = HashSet::new();
    let mut localization = Localization::default();

    for candidate in candidates {
        let phrase = fold(&candidate.phrase);
        if !scanned.insert(phrase.clone()) {
            continue;
        }

        let k = phrase.split_whitespace().count();
        if k == 0 || k > tokens.len() {
            tracing::trace!("No window of {} tokens for '{}'", k, phrase);
            continue;
        }

        for start in 0..=(tokens.len() - k) {
            let window_text = folded_tokens[start..start + k].join(" ");
            let similarity = ratio(&window_text, &phrase);
            if similarity < f64::from(match_threshold) {
                continue;
            }
            let window_score = score(similarity);

            tracing::debug!(
                "Window {}..{} '{}' matched '{}' ({})",
                start,
                start + k,
                window_text,
                phrase,
                window_score
            );

            match rectangle_for_window(&tokens[start..start + k], pad) {
                Some(rect) => localization.highlights.push(rect),
                None => tracing::warn!("Accepted window for '{}' has no geometry", phrase),
            }

            localization.confirmed.insert(phrase.clone());
            localization.visual_matches.push(VisualMatch {
                ocr_text: window_text,
                matched_phrase: phrase.clone(),
                score: window_score,
            });
        }
    }

    localization
}

/// Padded bounding rectangle over every vertex of every token in `window`
///
/// No clamping to the image is done. Returns `None` when no token carries a
/// vertex.
pub fn rectangle_for_window(window: &[WordToken], pad: i32) -> Option<Rectangle> {
    let mut vertices = window.iter().flat_map(|token| token.polygon.iter());
    let first = vertices.next()?;

    let (min_x, min_y, max_x, max_y) = vertices.fold(
        (first.x, first.y, first.x, first.y),
        |(min_x, min_y, max_x, max_y), p| {
            (min_x.min(p.x), min_y.min(p.y), max_x.max(p.x), max_y.max(p.y))
        },
    );

    Some(Rectangle {
        x1: min_x - pad,
        y1: min_y - pad,
        x2: max_x + pad,
        y2: max_y + pad,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matching::Point;

    fn candidate(phrase: &str, score: u8) -> CoarseMatch {
        CoarseMatch {
            phrase: phrase.to_string(),
            score,
        }
    }

    fn moby_dick_tokens() -> Vec<WordToken> {
        vec![
            WordToken::with_box("Moby", 100, 40, 180, 80),
            WordToken::with_box("Dick", 190, 42, 260, 85),
        ]
    }

    #[test]
    fn test_moby_dick_end_to_end() {
        let tokens = moby_dick_tokens();
        let candidates = vec![candidate("Moby Dick", 100)];

        let result = localize(&tokens, &candidates, DEFAULT_MATCH_THRESHOLD, DEFAULT_PADDING);

        assert_eq!(
            result.visual_matches,
            vec![VisualMatch {
                ocr_text: "moby dick".to_string(),
                matched_phrase: "moby dick".to_string(),
                score: 100,
            }]
        );
        assert_eq!(
            result.highlights,
            vec![Rectangle {
                x1: 80,
                y1: 20,
                x2: 280,
                y2: 105
            }]
        );
        assert_eq!(result.confirmed_candidates(&candidates), candidates);
    }

    #[test]
    fn test_threshold_is_inclusive() {
        // 17 of 20 characters shared -> exactly 85
        let tokens = vec![WordToken::with_box("abcdefghijklmnopqxyz", 0, 0, 10, 10)];
        let candidates = vec![candidate("abcdefghijklmnopqrst", 90)];

        let result = localize(&tokens, &candidates, 85, DEFAULT_PADDING);
        assert_eq!(result.visual_matches.len(), 1);
        assert_eq!(result.visual_matches[0].score, 85);

        let result = localize(&tokens, &candidates, 86, DEFAULT_PADDING);
        assert!(result.visual_matches.is_empty());
        assert!(result.confirmed.is_empty());
    }

    #[test]
    fn test_threshold_uses_unrounded_similarity() {
        // 11 of 13 characters shared: 84.6, which would round up to 85
        let tokens = vec![WordToken::with_box("abcdefghijkxy", 0, 0, 10, 10)];
        let candidates = vec![candidate("abcdefghijklm", 90)];

        let result = localize(&tokens, &candidates, 85, DEFAULT_PADDING);
        assert!(result.visual_matches.is_empty());
        assert!(result.highlights.is_empty());

        let result = localize(&tokens, &candidates, 84, DEFAULT_PADDING);
        assert_eq!(result.visual_matches.len(), 1);
        assert_eq!(result.visual_matches[0].score, 85);
    }

    #[test]
    fn test_unconfirmed_candidates_are_dropped() {
        let tokens = moby_dick_tokens();
        let candidates = vec![candidate("War and Peace", 95), candidate("Moby Dick", 100)];

        let result = localize(&tokens, &candidates, DEFAULT_MATCH_THRESHOLD, DEFAULT_PADDING);

        assert!(!result.is_confirmed("War and Peace"));
        assert_eq!(
            result.confirmed_candidates(&candidates),
            vec![candidate("Moby Dick", 100)]
        );
    }

    #[test]
    fn test_window_longer_than_stream() {
        let tokens = moby_dick_tokens();
        let candidates = vec![candidate("Moby Dick Whale", 90)];

        let result = localize(&tokens, &candidates, 0, DEFAULT_PADDING);

        assert!(result.visual_matches.is_empty());
        assert!(result.highlights.is_empty());
        assert!(result.confirmed_candidates(&candidates).is_empty());
    }

    #[test]
    fn test_window_size_matches_phrase_tokens() {
        // "Moby Dick" must not be matched by the single merged token "mobydick"
        // nor by a three word window
        let tokens = vec![
            WordToken::with_box("mobydick", 0, 0, 50, 10),
            WordToken::with_box("the", 60, 0, 80, 10),
            WordToken::with_box("whale", 90, 0, 120, 10),
        ];
        let candidates = vec![candidate("Moby Dick", 90)];

        let result = localize(&tokens, &candidates, DEFAULT_MATCH_THRESHOLD, DEFAULT_PADDING);
        let windows: Vec<&str> = result
            .visual_matches
            .iter()
            .map(|m| m.ocr_text.as_str())
            .collect();
        assert!(windows.is_empty(), "unexpected windows: {:?}", windows);
    }

    #[test]
    fn test_multiple_occurrences() {
        let tokens = vec![
            WordToken::with_box("Moby", 0, 0, 40, 20),
            WordToken::with_box("Dick", 50, 0, 90, 20),
            WordToken::with_box("and", 0, 100, 30, 120),
            WordToken::with_box("MOBY", 0, 200, 40, 220),
            WordToken::with_box("DICK", 50, 200, 90, 220),
        ];
        let candidates = vec![candidate("Moby Dick", 100)];

        let result = localize(&tokens, &candidates, DEFAULT_MATCH_THRESHOLD, DEFAULT_PADDING);

        assert_eq!(result.visual_matches.len(), 2);
        assert_eq!(result.highlights.len(), 2);
        assert_eq!(result.highlights[0].y1, -20);
        assert_eq!(result.highlights[1].y1, 180);
        assert_eq!(result.confirmed_candidates(&candidates).len(), 1);
    }

    #[test]
    fn test_case_folded_duplicates_are_merged() {
        let tokens = moby_dick_tokens();
        let candidates = vec![candidate("Moby Dick", 100), candidate("MOBY DICK", 100)];

        let result = localize(&tokens, &candidates, DEFAULT_MATCH_THRESHOLD, DEFAULT_PADDING);

        // Scanned once, both dictionary spellings survive the filter
        assert_eq!(result.visual_matches.len(), 1);
        assert_eq!(result.confirmed.len(), 1);
        assert_eq!(result.confirmed_candidates(&candidates).len(), 2);
    }

    #[test]
    fn test_tolerates_misread_characters() {
        let tokens = vec![
            WordToken::with_box("Pride", 0, 0, 10, 10),
            WordToken::with_box("and", 0, 0, 10, 10),
            WordToken::with_box("Prejudlce", 0, 0, 10, 10),
        ];
        let candidates = vec![candidate("Pride and Prejudice", 90)];

        let result = localize(&tokens, &candidates, DEFAULT_MATCH_THRESHOLD, DEFAULT_PADDING);
        assert_eq!(result.visual_matches.len(), 1);
        assert_eq!(result.visual_matches[0].ocr_text, "pride and prejudlce");
    }

    #[test]
    fn test_rectangle_for_window() {
        let window = vec![
            WordToken::new(
                "tilted",
                vec![
                    Point::new(12, 30),
                    Point::new(64, 25),
                    Point::new(66, 50),
                    Point::new(14, 55),
                ],
            ),
            WordToken::with_box("word", 70, 28, 120, 52),
        ];

        assert_eq!(
            rectangle_for_window(&window, 20),
            Some(Rectangle {
                x1: -8,
                y1: 5,
                x2: 140,
                y2: 75
            })
        );
    }

    #[test]
    fn test_rectangle_without_geometry() {
        let window = vec![WordToken::new("ghost", Vec::new())];
        assert_eq!(rectangle_for_window(&window, 20), None);
        assert_eq!(rectangle_for_window(&[], 20), None);
    }
}
