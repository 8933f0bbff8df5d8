// ============================================================
// Layer 4 — Text Preprocessor
// ============================================================
// Turns a raw utterance into the token list that both the
// vocabulary builder and the vectorizer consume. Training and
// inference MUST share this exact function, otherwise the
// feature indices drift apart.
//
// Steps (applied in order):
//   1. Lower-case and trim
//   2. Fold a few accented question words to their plain form
//      and map "clima" onto "tiempo" so both share one feature
//   3. Replace every non-word character with a space
//   4. Split on whitespace
//   5. Drop a small set of Spanish stopwords
//
// Example:
//   "¿Cómo está el clima?"  →  ["como", "está", "tiempo"]
//
// Reference: Rust Book §8 (Strings in Rust), regex crate docs

use std::sync::LazyLock;

use regex::Regex;

/// Literal rewrites applied after lower-casing, in this order.
/// The last entry never matches once "cómo" has been folded.
const NORMALISATIONS: [(&str, &str); 5] = [
    ("cómo",         "como"),
    ("qué",          "que"),
    ("dónde",        "donde"),
    ("clima",        "tiempo"),
    ("cómo está el", "como esta"),
];

/// Tokens removed after splitting.
pub const STOPWORDS: [&str; 6] = ["el", "la", "los", "de", "que", "en"];

// Unicode-aware: accented letters and ñ count as word characters
static NON_WORD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\W").expect("valid regex"));

pub struct Preprocessor;

impl Preprocessor {
    /// Create a new Preprocessor instance
    pub fn new() -> Self {
        Self
    }

    /// Lower-case, fold and strip punctuation, without splitting.
    pub fn normalise(&self, text: &str) -> String {
        let mut out = text.to_lowercase().trim().to_string();

        for (pattern, replacement) in NORMALISATIONS {
            if out.contains(pattern) {
                out = out.replace(pattern, replacement);
            }
        }

        NON_WORD.replace_all(&out, " ").into_owned()
    }

    /// Full tokenisation: normalise, split, remove stopwords.
    pub fn tokenize(&self, text: &str) -> Vec<String> {
        self.normalise(text)
            .split_whitespace()
            .filter(|w| !STOPWORDS.contains(w))
            .map(str::to_string)
            .collect()
    }
}

impl Default for Preprocessor {
    fn default() -> Self {
        Self::new()
    }
}
