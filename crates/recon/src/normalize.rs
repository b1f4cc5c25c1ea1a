//! Name normalization ahead of scoring.
//!
//! Folds Unicode (NFKC) and case, optionally replaces punctuation with
//! spaces, collapses whitespace and applies a legal-suffix policy to whole
//! tokens. Output tokens are single-space separated with no leading or
//! trailing whitespace.

use serde::Deserialize;
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// Legal-form aliases and the spelling they canonicalize to.
const LEGAL_SUFFIXES: &[(&str, &str)] = &[
    ("corporation", "corp"),
    ("corp", "corp"),
    ("incorporated", "inc"),
    ("inc", "inc"),
    ("limited", "ltd"),
    ("ltd", "ltd"),
    ("company", "co"),
    ("co", "co"),
    ("llc", "llc"),
    ("llp", "llp"),
    ("lp", "lp"),
    ("plc", "plc"),
    ("gmbh", "gmbh"),
    ("ag", "ag"),
    ("sa", "sa"),
    ("bv", "bv"),
    ("nv", "nv"),
    ("pty", "pty"),
];

/// What to do with legal-form tokens such as "Inc" or "Corporation".
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LegalSuffixes {
    /// Leave them as written.
    Keep,
    /// Rewrite every alias to one spelling ("corporation" → "corp").
    #[default]
    Canonical,
    /// Drop them, unless that would leave the name empty.
    Strip,
}

impl std::fmt::Display for LegalSuffixes {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Keep => write!(f, "keep"),
            Self::Canonical => write!(f, "canonical"),
            Self::Strip => write!(f, "strip"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct NormalizeOptions {
    pub strip_punctuation: bool,
    pub legal_suffixes: LegalSuffixes,
}

impl Default for NormalizeOptions {
    fn default() -> Self {
        Self {
            strip_punctuation: true,
            legal_suffixes: LegalSuffixes::Canonical,
        }
    }
}

/// Normalize a raw name into lowercase, single-space separated tokens.
pub fn normalize_name(raw: &str, options: &NormalizeOptions) -> String {
    let folded = fold_case(raw);

    let cleaned = if options.strip_punctuation {
        strip_punctuation(&folded)
    } else {
        folded
    };

    let tokens: Vec<&str> = cleaned.split_whitespace().collect();
    apply_legal_suffixes(tokens, options.legal_suffixes).join(" ")
}

/// NFKC, then upper- and back to lowercase so that "ß" and "SS" meet, then
/// NFKC again to recompose anything the case mapping decomposed.
fn fold_case(raw: &str) -> String {
    let compat: String = raw.nfkc().collect();
    compat.to_uppercase().to_lowercase().nfkc().collect()
}

fn strip_punctuation(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            // "O'Brien" → "obrien", not "o brien"
            '\'' | '\u{2019}' => {}
            '&' => out.push_str(" and "),
            c if c.is_alphanumeric() || is_combining_mark(c) => out.push(c),
            _ => out.push(' '),
        }
    }
    out
}

fn legal_canonical(token: &str) -> Option<&'static str> {
    let bare = token.trim_end_matches('.');
    LEGAL_SUFFIXES
        .iter()
        .find(|(alias, _)| *alias == bare)
        .map(|(_, canonical)| *canonical)
}

fn apply_legal_suffixes(tokens: Vec<&str>, policy: LegalSuffixes) -> Vec<&str> {
    match policy {
        LegalSuffixes::Keep => tokens,
        LegalSuffixes::Canonical => tokens
            .into_iter()
            .map(|t| legal_canonical(t).unwrap_or(t))
            .collect(),
        LegalSuffixes::Strip => {
            let kept: Vec<&str> = tokens
                .iter()
                .copied()
                .filter(|t| legal_canonical(t).is_none())
                .collect();
            if kept.is_empty() { tokens } else { kept }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn opts(strip_punctuation: bool, legal_suffixes: LegalSuffixes) -> NormalizeOptions {
        NormalizeOptions { strip_punctuation, legal_suffixes }
    }

    #[test]
    fn lowercases_and_collapses_whitespace() {
        let o = opts(true, LegalSuffixes::Keep);
        assert_eq!(normalize_name("  ACME   Widgets\tCorp ", &o), "acme widgets corp");
    }

    #[test]
    fn punctuation_becomes_space() {
        let o = opts(true, LegalSuffixes::Keep);
        assert_eq!(normalize_name("Smith-Jones, Inc.", &o), "smith jones inc");
        assert_eq!(normalize_name("O'Brien & Sons", &o), "obrien and sons");
    }

    #[test]
    fn punctuation_kept_when_disabled() {
        let o = opts(false, LegalSuffixes::Keep);
        assert_eq!(normalize_name("Smith-Jones,  Inc.", &o), "smith-jones, inc.");
    }

    #[test]
    fn canonical_suffixes() {
        let o = opts(true, LegalSuffixes::Canonical);
        assert_eq!(normalize_name("ACME Corporation", &o), "acme corp");
        assert_eq!(normalize_name("Acme Corp", &o), "acme corp");
        assert_eq!(normalize_name("Globex Incorporated", &o), "globex inc");
        assert_eq!(normalize_name("Initech Limited", &o), "initech ltd");
    }

    #[test]
    fn canonical_ignores_trailing_dot_without_punctuation_strip() {
        let o = opts(false, LegalSuffixes::Canonical);
        assert_eq!(normalize_name("Acme Corp.", &o), "acme corp");
    }

    #[test]
    fn strip_suffixes_keeps_sole_token() {
        let o = opts(true, LegalSuffixes::Strip);
        assert_eq!(normalize_name("Apple, Inc.", &o), "apple");
        assert_eq!(normalize_name("Company", &o), "company");
    }

    #[test]
    fn nfkc_fold() {
        let o = NormalizeOptions::default();
        // Fullwidth letters fold to ASCII
        assert_eq!(normalize_name("ＡＣＭＥ", &o), "acme");
    }

    #[test]
    fn case_fold_matches_uppercase_form() {
        let o = NormalizeOptions::default();
        assert_eq!(normalize_name("Straße Bau GmbH", &o), "strasse bau gmbh");
        assert_eq!(
            normalize_name("Straße Bau GmbH", &o),
            normalize_name(&"Straße Bau GmbH".to_uppercase(), &o)
        );
        assert_eq!(normalize_name("Ærø Ølfabrik", &o), normalize_name("ÆRØ ØLFABRIK", &o));
    }

    #[test]
    fn combining_marks_stay_inside_tokens() {
        let o = NormalizeOptions::default();
        // "İ" lowercases to "i" + U+0307, which must not split the word
        assert_eq!(normalize_name("İSTANBUL Holding", &o), "i\u{307}stanbul holding");
        assert_eq!(normalize_name("İstanbul Holding", &o), normalize_name("İSTANBUL Holding", &o));
        // decomposed accent is kept and recomposed
        assert_eq!(normalize_name("Cafe\u{301} Noir", &o), "café noir");
    }

    #[test]
    fn empty_and_blank() {
        let o = NormalizeOptions::default();
        assert_eq!(normalize_name("", &o), "");
        assert_eq!(normalize_name("   ", &o), "");
        assert_eq!(normalize_name("!!!", &o), "");
    }
}
