//! Token-sort-ratio similarity scoring.
//!
//! A name is normalized (see [`crate::normalize`]), split into tokens, the
//! tokens sorted and rejoined with single spaces. Two such canonical forms
//! are compared with a normalized edit-distance ratio in `0..=100`:
//!
//! - [`EditMetric::Levenshtein`]: `round(100 * (1 - lev(a, b) / max(|a|, |b|)))`
//! - [`EditMetric::Indel`]: `round(100 * (|a| + |b| - indel(a, b)) / (|a| + |b|))`,
//!   where substitutions cost two (one delete + one insert).
//!
//! Lengths are in chars. Rounding is half-up. Two empty canonical forms
//! score 100; exactly one empty form scores 0.
//!
//! Cost is O(|a| * |b|) per comparison.

use serde::Deserialize;

use crate::normalize::{normalize_name, NormalizeOptions};

/// Scores a pair of names in `0..=100`.
///
/// `prepare` is split out so a candidate pool can canonicalize its names
/// once and compare the prepared forms many times.
pub trait Scorer {
    /// Reduce a raw name to the form `compare` operates on.
    fn prepare(&self, raw: &str) -> String;

    /// Score two prepared names.
    fn compare(&self, a: &str, b: &str) -> u8;

    fn score(&self, a: &str, b: &str) -> u8 {
        self.compare(&self.prepare(a), &self.prepare(b))
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EditMetric {
    /// Unit-cost insert, delete and substitute.
    #[default]
    Levenshtein,
    /// Insert and delete only.
    Indel,
}

impl std::fmt::Display for EditMetric {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Levenshtein => write!(f, "levenshtein"),
            Self::Indel => write!(f, "indel"),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TokenSortRatio {
    pub metric: EditMetric,
    pub normalize: NormalizeOptions,
}

impl TokenSortRatio {
    pub fn new(metric: EditMetric, normalize: NormalizeOptions) -> Self {
        Self { metric, normalize }
    }
}

impl Scorer for TokenSortRatio {
    fn prepare(&self, raw: &str) -> String {
        sort_tokens(&normalize_name(raw, &self.normalize))
    }

    fn compare(&self, a: &str, b: &str) -> u8 {
        ratio(a, b, self.metric)
    }
}

/// Sort whitespace-delimited tokens and rejoin with single spaces.
pub fn sort_tokens(s: &str) -> String {
    let mut tokens: Vec<&str> = s.split_whitespace().collect();
    tokens.sort_unstable();
    tokens.join(" ")
}

/// Normalized edit-distance ratio between two strings, in `0..=100`.
pub fn ratio(a: &str, b: &str, metric: EditMetric) -> u8 {
    if a == b {
        return 100;
    }
    if a.is_empty() || b.is_empty() {
        return 0;
    }

    let (distance, denominator) = match metric {
        EditMetric::Levenshtein => (
            strsim::levenshtein(a, b),
            a.chars().count().max(b.chars().count()),
        ),
        EditMetric::Indel => {
            let a: Vec<char> = a.chars().collect();
            let b: Vec<char> = b.chars().collect();
            (indel_distance(&a, &b), a.len() + b.len())
        }
    };

    percent(denominator.saturating_sub(distance), denominator)
}

/// `round(100 * num / den)`, half-up, clamped to 100.
fn percent(num: usize, den: usize) -> u8 {
    let scaled = (num * 200 + den) / (2 * den);
    scaled.min(100) as u8
}

/// Insert/delete-only edit distance: `|a| + |b| - 2 * lcs(a, b)`.
pub fn indel_distance(a: &[char], b: &[char]) -> usize {
    let mut prev = vec![0usize; b.len() + 1];
    let mut curr = vec![0usize; b.len() + 1];

    for ca in a {
        for (j, cb) in b.iter().enumerate() {
            curr[j + 1] = if ca == cb {
                prev[j] + 1
            } else {
                prev[j + 1].max(curr[j])
            };
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    a.len() + b.len() - 2 * prev[b.len()]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalize::LegalSuffixes;

    fn chars(s: &str) -> Vec<char> {
        s.chars().collect()
    }

    fn keep_suffixes(metric: EditMetric) -> TokenSortRatio {
        TokenSortRatio::new(
            metric,
            NormalizeOptions {
                strip_punctuation: true,
                legal_suffixes: LegalSuffixes::Keep,
            },
        )
    }

    #[test]
    fn levenshtein_ratio_counts_chars_not_bytes() {
        // one substitution over four chars, whatever the UTF-8 width
        assert_eq!(ratio("café", "cafe", EditMetric::Levenshtein), 75);
        assert_eq!(ratio("straße", "strasse", EditMetric::Levenshtein), 71);
    }

    #[test]
    fn indel_known_values() {
        // lcs("kitten", "sitting") = "ittn"
        assert_eq!(indel_distance(&chars("kitten"), &chars("sitting")), 5);
        // substitution costs two
        assert_eq!(indel_distance(&chars("a"), &chars("b")), 2);
        assert_eq!(indel_distance(&chars(""), &chars("ab")), 2);
    }

    #[test]
    fn ratio_rounding() {
        // 4/7 = 57.1
        assert_eq!(ratio("kitten", "sitting", EditMetric::Levenshtein), 57);
        // 8/13 = 61.5
        assert_eq!(ratio("kitten", "sitting", EditMetric::Indel), 62);
        // 1 - 1/2 = 50 exactly
        assert_eq!(ratio("ab", "ac", EditMetric::Levenshtein), 50);
    }

    #[test]
    fn ratio_disjoint_is_zero() {
        assert_eq!(ratio("abcd", "wxyz", EditMetric::Levenshtein), 0);
        assert_eq!(ratio("abcd", "wxyz", EditMetric::Indel), 0);
    }

    #[test]
    fn both_empty_scores_100() {
        let s = TokenSortRatio::default();
        assert_eq!(s.score("", ""), 100);
        // Punctuation-only names normalize to empty as well
        assert_eq!(s.score("!!!", "  "), 100);
    }

    #[test]
    fn one_empty_scores_0() {
        let s = TokenSortRatio::default();
        assert_eq!(s.score("", "Acme"), 0);
        assert_eq!(s.score("Acme", "   "), 0);
    }

    #[test]
    fn token_order_and_case_do_not_matter() {
        let s = TokenSortRatio::default();
        assert_eq!(s.score("Widgets Acme Global", "acme GLOBAL widgets"), 100);
        assert_eq!(s.score("Acme Global", "ACME GLOBAL"), 100);
    }

    #[test]
    fn legal_suffix_variants_score_100_by_default() {
        let s = TokenSortRatio::default();
        assert_eq!(s.score("Acme Corp", "ACME Corporation"), 100);
    }

    #[test]
    fn legal_suffix_variants_without_canonicalization() {
        // "acme corp" vs "acme corporation": lev 7 over 16 chars
        assert_eq!(keep_suffixes(EditMetric::Levenshtein).score("Acme Corp", "ACME Corporation"), 56);
        // lcs 9 → (25 - 7) / 25
        assert_eq!(keep_suffixes(EditMetric::Indel).score("Acme Corp", "ACME Corporation"), 72);
    }

    #[test]
    fn unrelated_names_score_low() {
        let s = TokenSortRatio::default();
        assert!(s.score("Zylex Industries", "Totally Unrelated LLC") < 75);
    }

    #[test]
    fn prepare_sorts_tokens() {
        let s = TokenSortRatio::default();
        assert_eq!(s.prepare("  Zeta  alpha, Beta "), "alpha beta zeta");
    }
}
