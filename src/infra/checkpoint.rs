// ============================================================
// Layer 6 — Checkpoint Manager
// ============================================================
// Saves and restores the trained network and the training
// configuration that produced it.
//
// Directory layout:
//   checkpoints/
//     modelo_chat.json    ← w_ih, b_h, w_ho, b_o, lr
//     train_config.json   ← hidden size, epochs, lr, ...
//     metrics.csv         ← written by the MetricsLogger
//
// Loading is strict: a model is only handed back if its input
// and output sizes match the vocabulary and class list of the
// CURRENT corpus. Anything else is reported as CorruptModel so
// the caller retrains instead of classifying with stale indices.
//
// Reference: Rust Book §9 (Error Handling)

use anyhow::{Context, Result};
use std::{fs, path::PathBuf};

use crate::application::train_use_case::TrainConfig;
use crate::domain::error::EngineError;
use crate::domain::traits::Persistable;
use crate::ml::network::Network;

pub const MODEL_FILE: &str = "modelo_chat.json";
pub const CONFIG_FILE: &str = "train_config.json";

/// Manages saving and loading of model checkpoints.
/// All files are stored in the configured directory.
pub struct CheckpointManager {
    dir: PathBuf,
}

impl CheckpointManager {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn model_path(&self) -> PathBuf {
        self.dir.join(MODEL_FILE)
    }

    pub fn config_path(&self) -> PathBuf {
        self.dir.join(CONFIG_FILE)
    }

    /// Write the network, creating the directory if needed.
    pub fn save_model(&self, network: &Network) -> Result<()> {
        fs::create_dir_all(&self.dir)
            .with_context(|| format!("Cannot create '{}'", self.dir.display()))?;

        let path = self.model_path();
        network
            .save(&path)
            .with_context(|| format!("Failed to save model to '{}'", path.display()))?;

        tracing::info!("Saved model to '{}'", path.display());
        Ok(())
    }

    /// Load the network as stored, shapes derived from the file.
    pub fn load_model(&self) -> Result<Network, EngineError> {
        let network = Network::load(&self.model_path())?;
        tracing::debug!(
            "Loaded model {}→{}→{}",
            network.input_size(),
            network.hidden_size(),
            network.output_size()
        );
        Ok(network)
    }

    /// Load the network and require the given input/output sizes.
    pub fn load_compatible(&self, input_size: usize, output_size: usize) -> Result<Network, EngineError> {
        let network = self.load_model()?;

        if network.input_size() != input_size || network.output_size() != output_size {
            return Err(EngineError::corrupt(
                self.model_path(),
                format!(
                    "model is {}→{} but the corpus needs {}→{}",
                    network.input_size(),
                    network.output_size(),
                    input_size,
                    output_size
                ),
            ));
        }
        Ok(network)
    }

    /// Save the training configuration to JSON.
    pub fn save_config(&self, cfg: &TrainConfig) -> Result<()> {
        fs::create_dir_all(&self.dir)
            .with_context(|| format!("Cannot create '{}'", self.dir.display()))?;

        let path = self.config_path();
        let json = serde_json::to_string_pretty(cfg)?;

        fs::write(&path, json)
            .with_context(|| format!("Cannot write config to '{}'", path.display()))?;

        tracing::debug!("Saved training config to '{}'", path.display());
        Ok(())
    }

    /// Load the training configuration from JSON.
    pub fn load_config(&self) -> Result<TrainConfig> {
        let path = self.config_path();

        let json = fs::read_to_string(&path)
            .with_context(|| format!("Cannot read config from '{}'", path.display()))?;

        serde_json::from_str(&json)
            .with_context(|| format!("Config '{}' is not valid JSON", path.display()))
    }
}
