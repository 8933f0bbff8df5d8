// ============================================================
// Layer 2 — TrainUseCase
// ============================================================
// Orchestrates the full training pipeline in order:
//
//   Step 1: Load the corpus            (Layer 4 - data)
//   Step 2: Build the vocabulary       (Layer 4 - data)
//   Step 3: Encode the training pairs  (Layer 4 - data)
//   Step 4: Initialise the network     (Layer 5 - ml)
//   Step 5: Run the SGD loop           (Layer 5 - ml)
//   Step 6: Save model and config      (Layer 6 - infra)
//
// Reference: Rust Book §13 (Iterators and Closures)

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::data::{
    corpus::BuiltinCorpus,
    dataset::TrainingSet,
    loader::CorpusLoader,
    preprocessor::Preprocessor,
    vocabulary::Vocabulary,
};
use crate::domain::intent::Corpus;
use crate::domain::traits::CorpusSource;
use crate::infra::{checkpoint::CheckpointManager, metrics::MetricsLogger};
use crate::ml::network::Network;
use crate::ml::trainer::{Trainer, TrainerConfig};

// ─── Training Configuration ──────────────────────────────────────────────────
// All hyperparameters for a training run.
// Saved next to the model so a later fallback retrain can reuse them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrainConfig {
    /// JSON corpus; `None` means the built-in table
    pub corpus_path:    Option<String>,
    pub checkpoint_dir: String,
    pub hidden_size:    usize,
    pub epochs:         usize,
    pub lr:             f64,
    pub log_every:      usize,
}

impl Default for TrainConfig {
    fn default() -> Self {
        Self {
            corpus_path:    None,
            checkpoint_dir: "checkpoints".to_string(),
            hidden_size:    5,
            epochs:         1000,
            lr:             0.2,
            log_every:      100,
        }
    }
}

impl TrainConfig {
    pub fn trainer_config(&self) -> TrainerConfig {
        TrainerConfig {
            epochs:        self.epochs,
            learning_rate: self.lr,
            log_every:     self.log_every,
        }
    }
}

/// Read the corpus from `path`, or the built-in one when none is given.
pub fn load_corpus(path: Option<&str>) -> Result<Corpus> {
    match path {
        Some(p) => CorpusLoader::new(p).load_corpus(),
        None    => BuiltinCorpus.load_corpus(),
    }
}

// ─── TrainUseCase ─────────────────────────────────────────────────────────────
pub struct TrainUseCase {
    config: TrainConfig,
}

impl TrainUseCase {
    pub fn new(config: TrainConfig) -> Self {
        Self { config }
    }

    /// Train from scratch on the configured corpus and persist the result.
    pub fn execute(&self) -> Result<Network> {
        let corpus = load_corpus(self.config.corpus_path.as_deref())?;
        let vocabulary = Vocabulary::build(&corpus.examples, &Preprocessor::new());
        self.execute_on(&corpus, &vocabulary)
    }

    /// Same as [`execute`](Self::execute) with the corpus and vocabulary
    /// already in hand.
    pub fn execute_on(&self, corpus: &Corpus, vocabulary: &Vocabulary) -> Result<Network> {
        let cfg = &self.config;

        // ── Step 3: Encode every (text, label) pair ──────────────────────────
        let set = TrainingSet::from_corpus(corpus, vocabulary)
            .context("Cannot encode the training corpus")?;
        tracing::info!(
            "Encoded {} examples | vocab={} | classes={}",
            set.len(),
            vocabulary.len(),
            corpus.classes.len()
        );

        // ── Step 4: Fresh random network ─────────────────────────────────────
        let mut network = Network::new(vocabulary.len(), cfg.hidden_size, corpus.classes.len(), cfg.lr);

        // ── Step 5: SGD ──────────────────────────────────────────────────────
        let metrics = MetricsLogger::new(&cfg.checkpoint_dir)?;
        let report = Trainer::new(cfg.trainer_config())
            .with_metrics(&metrics)
            .train(&mut network, &set.inputs, &set.targets)
            .context("Training failed")?;

        if let (Some(first), Some(last)) = (report.first_loss(), report.final_loss()) {
            tracing::info!("Loss {:.4} → {:.4}", first, last);
        }

        // ── Step 6: Persist ──────────────────────────────────────────────────
        let ckpt = CheckpointManager::new(&cfg.checkpoint_dir);
        ckpt.save_model(&network)?;
        ckpt.save_config(cfg)?;

        Ok(network)
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::traits::Persistable;

    fn quick_config(dir: &std::path::Path) -> TrainConfig {
        TrainConfig {
            checkpoint_dir: dir.to_string_lossy().into_owned(),
            epochs:         20,
            log_every:      10,
            ..TrainConfig::default()
        }
    }

    #[test]
    fn test_defaults() {
        let cfg = TrainConfig::default();
        assert_eq!(cfg.hidden_size, 5);
        assert_eq!(cfg.epochs, 1000);
        assert_eq!(cfg.lr, 0.2);
        assert_eq!(cfg.trainer_config(), TrainerConfig::default());
    }

    #[test]
    fn test_partial_config_json_fills_defaults() {
        let cfg: TrainConfig = serde_json::from_str(r#"{"hidden_size": 8}"#).unwrap();
        assert_eq!(cfg.hidden_size, 8);
        assert_eq!(cfg.epochs, 1000);
    }

    #[test]
    fn test_execute_writes_model_config_and_metrics() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = quick_config(dir.path());

        let network = TrainUseCase::new(cfg.clone()).execute().unwrap();
        let ckpt    = CheckpointManager::new(dir.path());

        assert_eq!(network.output_size(), crate::data::corpus::CLASSES.len());
        assert_eq!(Network::load(&ckpt.model_path()).unwrap(), network);
        assert_eq!(ckpt.load_config().unwrap(), cfg);

        let csv = std::fs::read_to_string(dir.path().join("metrics.csv")).unwrap();
        assert_eq!(csv.lines().count(), 3); // header + epochs 0 and 10
    }

    #[test]
    fn test_second_run_overwrites_metrics() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = quick_config(dir.path());

        TrainUseCase::new(cfg.clone()).execute().unwrap();
        TrainUseCase::new(cfg).execute().unwrap();

        let csv = std::fs::read_to_string(dir.path().join("metrics.csv")).unwrap();
        assert_eq!(csv.lines().count(), 3);
        assert_eq!(csv.matches("epoch,avg_loss").count(), 1);
    }

    #[test]
    fn test_unknown_label_aborts_training() {
        let dir    = tempfile::tempdir().unwrap();
        let corpus = Corpus::new(
            vec!["saludo".to_string()],
            vec![crate::domain::intent::LabeledUtterance::new("hola", "otra")],
        );
        let vocab = Vocabulary::build(&corpus.examples, &Preprocessor::new());
        let err   = TrainUseCase::new(quick_config(dir.path()))
            .execute_on(&corpus, &vocab)
            .unwrap_err();
        assert!(format!("{err:#}").contains("otra"));
    }
}
