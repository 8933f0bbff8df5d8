// ============================================================
// Layer 5 — Intent Classifier
// ============================================================
// Wraps a trained Network with the vocabulary and class list
// it was trained against:
//
//   text ──vectorize──► counts ──forward──► activations
//        ──arg-max──► (label, confidence)
//        ──low_confidence_override──► final Prediction
//
// Confidence is the largest output activation. Ties go to the
// first class in list order.
//
// The keyword override is a hand-written business rule, not a
// property of the network. It lives in its own function so it
// can be tested and swapped on its own.

use serde::{Deserialize, Serialize};

use crate::data::vectorizer::Vectorizer;
use crate::data::vocabulary::Vocabulary;
use crate::domain::error::EngineError;
use crate::domain::intent::Prediction;
use crate::domain::traits::IntentPredictor;
use crate::ml::network::Network;

/// Label forced for weather-ish text the network is unsure about
pub const WEATHER_LABEL: &str = "pronóstico del tiempo";
pub const WEATHER_CONFIDENCE: f64 = 0.4;

/// Label forced for name-ish text the network is unsure about
pub const GREETING_LABEL: &str = "saludo";
pub const GREETING_CONFIDENCE: f64 = 0.8;

const WEATHER_KEYWORDS: [&str; 2] = ["clima", "tiempo"];
const NAME_KEYWORDS: [&str; 2] = ["llamar", "nombre"];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassifierConfig {
    /// Predictions under this confidence go through the keyword override
    pub confidence_threshold: f64,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self { confidence_threshold: 0.4 }
    }
}

/// Keyword patch applied to low-confidence predictions.
///
/// When `prediction.confidence < threshold`:
///   - text mentioning "clima"/"tiempo" → ("pronóstico del tiempo", 0.4)
///   - else text mentioning "llamar"/"nombre" → ("saludo", 0.8)
///
/// Matching is a case-insensitive substring test on the raw text.
/// Otherwise the prediction is returned unchanged.
pub fn low_confidence_override(text: &str, prediction: Prediction, threshold: f64) -> Prediction {
    if !prediction.is_uncertain(threshold) {
        return prediction;
    }

    let lower = text.to_lowercase();
    if WEATHER_KEYWORDS.iter().any(|k| lower.contains(k)) {
        return Prediction::new(WEATHER_LABEL, WEATHER_CONFIDENCE);
    }
    if NAME_KEYWORDS.iter().any(|k| lower.contains(k)) {
        return Prediction::new(GREETING_LABEL, GREETING_CONFIDENCE);
    }
    prediction
}

/// Index and value of the first maximum; `None` for an empty slice.
pub fn arg_max(values: &[f64]) -> Option<(usize, f64)> {
    let mut best: Option<(usize, f64)> = None;
    for (i, &v) in values.iter().enumerate() {
        match best {
            Some((_, b)) if v <= b => {}
            _ => best = Some((i, v)),
        }
    }
    best
}

pub struct IntentClassifier {
    network:    Network,
    vocabulary: Vocabulary,
    classes:    Vec<String>,
    config:     ClassifierConfig,
}

impl IntentClassifier {
    /// # Errors
    /// [`EngineError::DimensionMismatch`] when the network's input or
    /// output size disagrees with the vocabulary or class list;
    /// [`EngineError::NoClasses`] when `classes` is empty.
    pub fn new(
        network:    Network,
        vocabulary: Vocabulary,
        classes:    Vec<String>,
        config:     ClassifierConfig,
    ) -> Result<Self, EngineError> {
        if classes.is_empty() {
            return Err(EngineError::NoClasses);
        }
        if network.input_size() != vocabulary.len() {
            return Err(EngineError::DimensionMismatch {
                context:  "network input vs vocabulary",
                expected: vocabulary.len(),
                actual:   network.input_size(),
            });
        }
        if network.output_size() != classes.len() {
            return Err(EngineError::DimensionMismatch {
                context:  "network output vs class list",
                expected: classes.len(),
                actual:   network.output_size(),
            });
        }

        Ok(Self { network, vocabulary, classes, config })
    }

    /// Network verdict before the keyword override.
    pub fn raw_prediction(&self, text: &str) -> Result<Prediction, EngineError> {
        let x      = Vectorizer::new(&self.vocabulary).encode_text(text);
        let output = self.network.forward(&x)?.into_output();

        let (idx, confidence) = arg_max(&output).ok_or(EngineError::NoClasses)?;
        Ok(Prediction::new(self.classes[idx].clone(), confidence))
    }

    pub fn config(&self) -> &ClassifierConfig {
        &self.config
    }
}

impl IntentPredictor for IntentClassifier {
    fn predict(&self, text: &str) -> Result<Prediction, EngineError> {
        let raw        = self.raw_prediction(text)?;
        let prediction = low_confidence_override(text, raw.clone(), self.config.confidence_threshold);

        if prediction != raw {
            tracing::debug!(
                "Override {} ({:.3}) → {} ({:.3})",
                raw.label, raw.confidence, prediction.label, prediction.confidence
            );
        }
        Ok(prediction)
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::preprocessor::Preprocessor;
    use crate::domain::intent::LabeledUtterance;
    use crate::domain::traits::Persistable;
    use rand::{rngs::StdRng, SeedableRng};

    fn classes() -> Vec<String> {
        ["saludo", "despedida", WEATHER_LABEL].iter().map(|s| s.to_string()).collect()
    }

    fn vocab() -> Vocabulary {
        let data = vec![
            LabeledUtterance::new("hola amigo", "saludo"),
            LabeledUtterance::new("adios", "despedida"),
        ];
        Vocabulary::build(&data, &Preprocessor::new())
    }

    // Every weight and bias zero except b_o, so the output is
    // sigmoid(b_o) whatever the input.
    fn fixed_output_network(b_o: [f64; 3], n_in: usize) -> Network {
        let dir  = tempfile::tempdir().unwrap();
        let path = dir.path().join("fixed.json");
        let json = serde_json::json!({
            "w_ih": vec![vec![0.0; n_in]; 2],
            "b_h":  [0.0, 0.0],
            "w_ho": vec![vec![0.0; 2]; 3],
            "b_o":  b_o,
            "lr":   0.2,
        });
        std::fs::write(&path, json.to_string()).unwrap();
        Network::load(&path).unwrap()
    }

    fn classifier(b_o: [f64; 3]) -> IntentClassifier {
        let v = vocab();
        IntentClassifier::new(
            fixed_output_network(b_o, v.len()),
            v,
            classes(),
            ClassifierConfig::default(),
        )
        .unwrap()
    }

    #[test]
    fn test_arg_max_first_on_ties() {
        assert_eq!(arg_max(&[0.2, 0.7, 0.7]), Some((1, 0.7)));
        assert_eq!(arg_max(&[0.5]), Some((0, 0.5)));
        assert_eq!(arg_max(&[]), None);
    }

    #[test]
    fn test_confident_prediction_is_network_argmax() {
        // sigmoid(3) ≈ 0.95 on "despedida"
        let c = classifier([-3.0, 3.0, -3.0]);
        let p = c.predict("adios clima").unwrap();
        assert_eq!(p.label, "despedida");
        assert!((p.confidence - crate::ml::network::sigmoid(3.0)).abs() < 1e-12);
    }

    #[test]
    fn test_low_confidence_weather_override() {
        // Every activation ≈ 0.05: below the 0.4 threshold
        let c = classifier([-3.0, -3.0, -3.0]);
        let p = c.predict("¿Qué tal el clima hoy?").unwrap();
        assert_eq!(p, Prediction::new("pronóstico del tiempo", 0.4));
    }

    #[test]
    fn test_low_confidence_name_override() {
        let c = classifier([-3.0, -3.0, -3.0]);
        let p = c.predict("¿Cómo te puedo llamar?").unwrap();
        assert_eq!(p, Prediction::new("saludo", 0.8));
    }

    #[test]
    fn test_weather_wins_over_name() {
        let p = low_confidence_override("mi nombre y el tiempo", Prediction::new("despedida", 0.1), 0.4);
        assert_eq!(p.label, WEATHER_LABEL);
    }

    #[test]
    fn test_low_confidence_without_keywords_unchanged() {
        let c = classifier([-3.0, -3.0, -3.0]);
        let p = c.predict("hola").unwrap();
        assert_eq!(p.label, "saludo");
        assert!(p.confidence < 0.4);
    }

    #[test]
    fn test_override_is_case_insensitive() {
        let p = low_confidence_override("CLIMA", Prediction::new("saludo", 0.2), 0.4);
        assert_eq!(p, Prediction::new(WEATHER_LABEL, WEATHER_CONFIDENCE));
    }

    #[test]
    fn test_override_ignored_at_threshold() {
        let p = Prediction::new("saludo", 0.4);
        assert_eq!(low_confidence_override("clima", p.clone(), 0.4), p);
    }

    #[test]
    fn test_rejects_mismatched_network() {
        let net = Network::with_rng(99, 3, 3, 0.2, &mut StdRng::seed_from_u64(1));
        let err = IntentClassifier::new(net, vocab(), classes(), ClassifierConfig::default())
            .err()
            .unwrap();
        assert!(matches!(err, EngineError::DimensionMismatch { .. }));
    }

    #[test]
    fn test_rejects_empty_class_list() {
        let v   = vocab();
        let net = Network::with_rng(v.len(), 3, 3, 0.2, &mut StdRng::seed_from_u64(1));
        let err = IntentClassifier::new(net, v, Vec::new(), ClassifierConfig::default())
            .err()
            .unwrap();
        assert!(matches!(err, EngineError::NoClasses));
    }
}
