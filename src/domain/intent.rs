// ============================================================
// Layer 3 — Intent Domain Types
// ============================================================
// The two values that cross layer boundaries most often:
//
//   LabeledUtterance — ("hola como estas", "saludo")
//                      one supervised training example
//
//   Prediction       — ("saludo", 0.93)
//                      the classifier's answer for one utterance
//
// Labels are plain strings rather than an enum because the
// class list is data: it is read from the corpus, not compiled in.
//
// Reference: Rust Book §5 (Structs and Methods)

use serde::{Deserialize, Serialize};

/// One (text, label) pair of the training corpus.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabeledUtterance {
    /// Raw user text, before tokenisation
    pub text: String,

    /// Intent label; must appear in the corpus class list
    pub label: String,
}

impl LabeledUtterance {
    pub fn new(text: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            text:  text.into(),
            label: label.into(),
        }
    }
}

/// A full training corpus: the ordered class list plus the
/// labelled examples, in the order they are trained on.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Corpus {
    pub classes:  Vec<String>,
    pub examples: Vec<LabeledUtterance>,
}

impl Corpus {
    pub fn new(classes: Vec<String>, examples: Vec<LabeledUtterance>) -> Self {
        Self { classes, examples }
    }
}

/// The classifier's verdict for a single utterance.
///
/// `confidence` is the maximum output activation of the network,
/// or a fixed constant when the low-confidence policy fired.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    pub label:      String,
    pub confidence: f64,
}

impl Prediction {
    pub fn new(label: impl Into<String>, confidence: f64) -> Self {
        Self {
            label: label.into(),
            confidence,
        }
    }

    /// True when the confidence falls under `threshold`
    pub fn is_uncertain(&self, threshold: f64) -> bool {
        self.confidence < threshold
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uncertain_below_threshold() {
        let p = Prediction::new("saludo", 0.3);
        assert!(p.is_uncertain(0.4));
        assert!(!p.is_uncertain(0.3));
    }

    #[test]
    fn test_labeled_utterance_serialises_field_names() {
        let u    = LabeledUtterance::new("adios", "despedida");
        let json = serde_json::to_string(&u).unwrap();
        assert_eq!(json, r#"{"text":"adios","label":"despedida"}"#);
    }
}
