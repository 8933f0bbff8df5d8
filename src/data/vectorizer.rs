// ============================================================
// Layer 4 — Vectorizer
// ============================================================
// Encodes text and labels into the fixed-length numeric
// vectors the network consumes:
//
//   encode_text  "hola hola amigo" → [0, 2, 1]   (bag of words,
//                                                 counts not 0/1)
//   encode_label "despedida"       → [0, 1, 0]   (one-hot over
//                                                 the class list)
//
// Tokens missing from the vocabulary are counted at <UNK>
// (index 0), so every token contributes exactly one count.

use crate::data::preprocessor::Preprocessor;
use crate::data::vocabulary::Vocabulary;
use crate::domain::error::EngineError;

/// Token counts indexed by vocabulary position
pub type FeatureVector = Vec<u32>;

/// One-hot class indicator
pub type TargetVector = Vec<u8>;

pub struct Vectorizer<'a> {
    vocabulary:   &'a Vocabulary,
    preprocessor: Preprocessor,
}

impl<'a> Vectorizer<'a> {
    pub fn new(vocabulary: &'a Vocabulary) -> Self {
        Self {
            vocabulary,
            preprocessor: Preprocessor::new(),
        }
    }

    /// Bag-of-words count vector of length `vocabulary.len()`.
    pub fn encode_text(&self, text: &str) -> FeatureVector {
        let mut vector = vec![0u32; self.vocabulary.len()];
        for token in self.preprocessor.tokenize(text) {
            vector[self.vocabulary.index_or_unknown(&token)] += 1;
        }
        vector
    }
}

/// One-hot vector for `label` over the ordered `classes`.
///
/// # Errors
/// [`EngineError::UnknownLabel`] when `label` is not in `classes`.
pub fn encode_label(label: &str, classes: &[String]) -> Result<TargetVector, EngineError> {
    let idx = classes
        .iter()
        .position(|c| c == label)
        .ok_or_else(|| EngineError::UnknownLabel { label: label.to_string() })?;

    let mut vector = vec![0u8; classes.len()];
    vector[idx] = 1;
    Ok(vector)
}
