//! String similarity on a 0-100 scale
//!
//! Both metrics work on Unicode scalar values and are based on the Indel
//! distance (insertions and deletions only), expressed through the longest
//! common subsequence.

use std::collections::HashSet;

/// Full-string similarity: `100 * 2 * LCS / (len(a) + len(b))`
pub fn ratio(a: &str, b: &str) -> f64 {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    ratio_chars(&a, &b)
}

/// Best `ratio` of the shorter string against any alignment inside the longer one
///
/// Alignments are every window of the needle's length, plus the shorter windows
/// cut off by either end of the haystack. Windows whose boundary character does
/// not occur in the needle are skipped.
pub fn partial_ratio(a: &str, b: &str) -> f64 {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();

    if a.is_empty() && b.is_empty() {
        return 100.0;
    }
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }

    match a.len().cmp(&b.len()) {
        std::cmp::Ordering::Less => best_alignment(&a, &b),
        std::cmp::Ordering::Greater => best_alignment(&b, &a),
        std::cmp::Ordering::Equal => best_alignment(&a, &b).max(best_alignment(&b, &a)),
    }
}

/// Round a similarity to the integer score reported to clients
///
/// Thresholds are applied to the unrounded similarity, not to this.
pub fn score(similarity: f64) -> u8 {
    similarity.round().clamp(0.0, 100.0) as u8
}

fn ratio_chars(a: &[char], b: &[char]) -> f64 {
    IndelRows::new(b.len()).ratio(a, b)
}

/// Dynamic-programming rows for LCS, reused across every window compared
/// against the same needle
struct IndelRows {
    prev: Vec<usize>,
    curr: Vec<usize>,
}

impl IndelRows {
    fn new(width: usize) -> Self {
        Self {
            prev: vec![0; width + 1],
            curr: vec![0; width + 1],
        }
    }

    fn ratio(&mut self, a: &[char], b: &[char]) -> f64 {
        let total = a.len() + b.len();
        if total == 0 {
            return 100.0;
        }
        100.0 * (2 * self.lcs_len(a, b)) as f64 / total as f64
    }

    /// Length of the longest common subsequence; `b` must fit the rows
    fn lcs_len(&mut self, a: &[char], b: &[char]) -> usize {
        if a.is_empty() || b.is_empty() {
            return 0;
        }
        if self.prev.len() < b.len() + 1 {
            *self = Self::new(b.len());
        }

        self.prev[..=b.len()].fill(0);
        self.curr[0] = 0;

        for &ca in a {
            for (j, &cb) in b.iter().enumerate() {
                self.curr[j + 1] = if ca == cb {
                    self.prev[j] + 1
                } else {
                    self.prev[j + 1].max(self.curr[j])
                };
            }
            std::mem::swap(&mut self.prev, &mut self.curr);
        }

        self.prev[b.len()]
    }
}

fn best_alignment(needle: &[char], haystack: &[char]) -> f64 {
    let m = needle.len();
    let n = haystack.len();
    let needle_chars: HashSet<char> = needle.iter().copied().collect();
    let mut rows = IndelRows::new(m);
    let mut best = 0.0f64;

    // Cut off by the start of the haystack
    for end in 1..m {
        if needle_chars.contains(&haystack[end - 1]) {
            best = best.max(rows.ratio(&haystack[..end], needle));
            if best >= 100.0 {
                return best;
            }
        }
    }

    for start in 0..=(n - m) {
        if needle_chars.contains(&haystack[start + m - 1]) {
            best = best.max(rows.ratio(&haystack[start..start + m], needle));
            if best >= 100.0 {
                return best;
            }
        }
    }

    // Cut off by the end of the haystack
    for start in (n - m + 1)..n {
        if needle_chars.contains(&haystack[start]) {
            best = best.max(rows.ratio(&haystack[start..], needle));
            if best >= 100.0 {
                return best;
            }
        }
    }

    best
}
