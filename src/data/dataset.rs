use crate::data::vectorizer::{encode_label, FeatureVector, TargetVector, Vectorizer};
use crate::data::vocabulary::Vocabulary;
use crate::domain::error::EngineError;
use crate::domain::intent::Corpus;

/// Vectorised corpus: `inputs[i]` is the bag of words of example
/// `i` and `targets[i]` its one-hot label, in corpus order.
#[derive(Debug, Clone, Default)]
pub struct TrainingSet {
    pub inputs:  Vec<FeatureVector>,
    pub targets: Vec<TargetVector>,
}

impl TrainingSet {
    /// Encode every example. Fails on the first label that is not
    /// in `corpus.classes`.
    pub fn from_corpus(corpus: &Corpus, vocabulary: &Vocabulary) -> Result<Self, EngineError> {
        let vectorizer = Vectorizer::new(vocabulary);

        let inputs = corpus
            .examples
            .iter()
            .map(|ex| vectorizer.encode_text(&ex.text))
            .collect();
        let targets = corpus
            .examples
            .iter()
            .map(|ex| encode_label(&ex.label, &corpus.classes))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { inputs, targets })
    }

    #[allow(clippy::len_without_is_empty)]
    pub fn len(&self) -> usize {
        self.inputs.len()
    }
}
