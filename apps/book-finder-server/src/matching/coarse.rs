//! Coarse matching of dictionary phrases against the full transcription

use super::similarity::{partial_ratio, score};
use super::types::{fold, CoarseMatch};

/// A phrase is a candidate when its partial score is strictly above this
pub const DEFAULT_COARSE_THRESHOLD: u8 = 80;

/// Find dictionary phrases that plausibly appear somewhere in `full_text`
///
/// Scores are partial similarities between the case-folded phrase and the
/// case-folded text. A phrase is kept iff its unrounded similarity is strictly
/// greater than `threshold`; the reported score is rounded. Output follows
/// dictionary order.
pub fn find_candidates<S: AsRef<str>>(
    full_text: &str,
    phrases: &[S],
    threshold: u8,
) -> Vec<CoarseMatch> {
    if full_text.is_empty() || phrases.is_empty() {
        return Vec::new();
    }

    let text = fold(full_text);

    phrases
        .iter()
        .filter_map(|phrase| {
            let phrase = phrase.as_ref();
            let similarity = partial_ratio(&fold(phrase), &text);
            (similarity > f64::from(threshold)).then(|| CoarseMatch {
                phrase: phrase.to_string(),
                score: score(similarity),
            })
        })
        .collect()
}
