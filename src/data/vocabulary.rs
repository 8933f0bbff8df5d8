// ============================================================
// Layer 4 — Vocabulary
// ============================================================
// Maps every token seen in the training corpus to a stable
// integer index. The index is the position of that token's
// counter in a feature vector, so the vocabulary size IS the
// input dimensionality of the network.
//
// Two-phase contract:
//   1. build()   — one pass over the corpus, assigns indices
//                  in first-seen order
//   2. lookup    — read-only; unseen tokens resolve to <UNK>
//
// Nothing can insert after build(), so inference never grows
// the vocabulary behind the network's back.
//
// Example:
//   [("hola como estas", _), ("adios", _)]
//   → <UNK>=0, hola=1, como=2, estas=3, adios=4

use std::collections::HashMap;

use crate::data::preprocessor::Preprocessor;
use crate::domain::intent::LabeledUtterance;

/// Reserved token for anything not seen during build()
pub const UNKNOWN_TOKEN: &str = "<UNK>";

/// Index of [`UNKNOWN_TOKEN`]; always 0
pub const UNKNOWN_INDEX: usize = 0;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Vocabulary {
    index:  HashMap<String, usize>,
    tokens: Vec<String>,
}

impl Vocabulary {
    /// Build from an ordered corpus. Deterministic for a given
    /// corpus order; an empty corpus yields just `<UNK>`.
    pub fn build<'a>(
        corpus:       impl IntoIterator<Item = &'a LabeledUtterance>,
        preprocessor: &Preprocessor,
    ) -> Self {
        let mut vocab = Self {
            index:  HashMap::new(),
            tokens: Vec::new(),
        };
        vocab.insert(UNKNOWN_TOKEN);

        for utterance in corpus {
            for token in preprocessor.tokenize(&utterance.text) {
                vocab.insert(&token);
            }
        }

        tracing::debug!("Vocabulary built with {} tokens", vocab.len());
        vocab
    }

    // Private: only build() may grow the vocabulary
    fn insert(&mut self, token: &str) {
        if !self.index.contains_key(token) {
            self.index.insert(token.to_string(), self.tokens.len());
            self.tokens.push(token.to_string());
        }
    }

    /// Index of `token`, if it was seen during build()
    pub fn index_of(&self, token: &str) -> Option<usize> {
        self.index.get(token).copied()
    }

    /// Index of `token`, or [`UNKNOWN_INDEX`] when unseen
    pub fn index_or_unknown(&self, token: &str) -> usize {
        self.index_of(token).unwrap_or(UNKNOWN_INDEX)
    }

    /// Never 0: `<UNK>` is always present
    #[allow(clippy::len_without_is_empty)]
    pub fn len(&self) -> usize {
        self.tokens.len()
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    fn corpus(pairs: &[(&str, &str)]) -> Vec<LabeledUtterance> {
        pairs.iter().map(|(t, l)| LabeledUtterance::new(*t, *l)).collect()
    }

    #[test]
    fn test_first_seen_order() {
        let data  = corpus(&[("hola como estas", "saludo"), ("adios", "despedida")]);
        let vocab = Vocabulary::build(&data, &Preprocessor::new());
        assert_eq!(vocab.tokens, ["<UNK>", "hola", "como", "estas", "adios"]);
        for (i, token) in vocab.tokens.iter().enumerate() {
            assert_eq!(vocab.index_of(token), Some(i));
        }
    }

    #[test]
    fn test_empty_corpus_has_only_unknown() {
        let vocab = Vocabulary::build(&Vec::<LabeledUtterance>::new(), &Preprocessor::new());
        assert_eq!(vocab.len(), 1);
        assert_eq!(vocab.tokens[UNKNOWN_INDEX], UNKNOWN_TOKEN);
    }

    #[test]
    fn test_repeated_tokens_get_one_index() {
        let data  = corpus(&[("hola hola", "saludo"), ("hola amigo", "saludo")]);
        let vocab = Vocabulary::build(&data, &Preprocessor::new());
        assert_eq!(vocab.len(), 3);
        assert_eq!(vocab.index_of("amigo"), Some(2));
    }

    #[test]
    fn test_lookup_does_not_grow() {
        let data  = corpus(&[("hola", "saludo")]);
        let vocab = Vocabulary::build(&data, &Preprocessor::new());
        assert_eq!(vocab.index_or_unknown("desconocida"), UNKNOWN_INDEX);
        assert_eq!(vocab.len(), 2);
    }

    #[test]
    fn test_stopwords_never_enter() {
        let data  = corpus(&[("el tiempo de la tarde", "clima")]);
        let vocab = Vocabulary::build(&data, &Preprocessor::new());
        assert_eq!(vocab.tokens, ["<UNK>", "tiempo", "tarde"]);
    }
}
