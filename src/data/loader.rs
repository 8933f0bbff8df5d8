// ============================================================
// Layer 4 — Corpus Loader
// ============================================================
// Loads a training corpus from a JSON file so the assistant
// can be retrained on new phrases without recompiling.
//
// Expected file shape:
//   {
//     "classes":  ["saludo", "despedida"],
//     "examples": [
//       { "text": "hola",  "label": "saludo" },
//       { "text": "adios", "label": "despedida" }
//     ]
//   }
//
// The order of "classes" fixes the output-neuron order, and
// the order of "examples" fixes both vocabulary indices and
// the training order.
//
// Reference: Rust Book §9 (Error Handling), serde_json docs

use anyhow::{Context, Result};
use std::{fs, path::PathBuf};

use crate::data::corpus::BuiltinCorpus;
use crate::domain::intent::Corpus;
use crate::domain::traits::CorpusSource;

/// Loads a corpus from a JSON file.
/// Implements the CorpusSource trait from Layer 3.
pub struct CorpusLoader {
    path: PathBuf,
}

impl CorpusLoader {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl CorpusSource for CorpusLoader {
    fn load_corpus(&self) -> Result<Corpus> {
        // A missing file is not fatal: fall back to the built-in table
        if !self.path.exists() {
            tracing::warn!(
                "Corpus file '{}' does not exist — using built-in corpus",
                self.path.display()
            );
            return Ok(BuiltinCorpus::corpus());
        }

        let json = fs::read_to_string(&self.path)
            .with_context(|| format!("Cannot read corpus '{}'", self.path.display()))?;

        let corpus: Corpus = serde_json::from_str(&json)
            .with_context(|| format!("Corpus '{}' is not valid JSON", self.path.display()))?;

        anyhow::ensure!(
            !corpus.classes.is_empty(),
            "Corpus '{}' declares no classes",
            self.path.display()
        );

        tracing::info!(
            "Loaded {} examples over {} classes from '{}'",
            corpus.examples.len(),
            corpus.classes.len(),
            self.path.display()
        );
        Ok(corpus)
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_missing_file_falls_back_to_builtin() {
        let dir    = tempfile::tempdir().unwrap();
        let loader = CorpusLoader::new(dir.path().join("nope.json"));
        let corpus = loader.load_corpus().unwrap();
        assert_eq!(corpus, BuiltinCorpus::corpus());
    }

    #[test]
    fn test_loads_json_corpus_in_order() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"classes":["a","b"],"examples":[{{"text":"uno","label":"b"}},{{"text":"dos","label":"a"}}]}}"#
        )
        .unwrap();

        let corpus = CorpusLoader::new(file.path()).load_corpus().unwrap();
        assert_eq!(corpus.classes, vec!["a", "b"]);
        assert_eq!(corpus.examples[0].text, "uno");
        assert_eq!(corpus.examples[1].label, "a");
    }

    #[test]
    fn test_malformed_json_is_an_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "not json").unwrap();
        assert!(CorpusLoader::new(file.path()).load_corpus().is_err());
    }

    #[test]
    fn test_no_classes_is_an_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"classes":[],"examples":[]}}"#).unwrap();
        assert!(CorpusLoader::new(file.path()).load_corpus().is_err());
    }
}
