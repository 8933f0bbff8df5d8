// ============================================================
// Layer 6 — Metrics Logger
// ============================================================
// Records the average training loss of reported epochs to a
// CSV file, so learning curves can be plotted after a run.
//
// Output file: checkpoints/metrics.csv, rewritten by every
// training run so it always holds a single curve.
//
// Example CSV output:
//   epoch,avg_loss
//   0,0.268431
//   100,0.041877
//   200,0.012204
//   ...
//
// Loss should fall steadily; a flat curve from epoch 0 usually
// means the learning rate is too small or the vocabulary is
// dominated by <UNK>.

use anyhow::Result;
use std::{
    fs::{self, OpenOptions},
    io::Write,
    path::PathBuf,
};

/// One row of metrics data for a reported epoch
#[derive(Debug, Clone, PartialEq)]
pub struct EpochMetrics {
    /// Epoch number, counting from 0
    pub epoch: usize,

    /// Mean over all examples of the per-example MSE
    pub avg_loss: f64,
}

impl EpochMetrics {
    pub fn new(epoch: usize, avg_loss: f64) -> Self {
        Self { epoch, avg_loss }
    }
}

/// Logs epoch metrics to a CSV file for later analysis.
pub struct MetricsLogger {
    csv_path: PathBuf,
}

impl MetricsLogger {
    /// Start a fresh metrics CSV for one training run.
    /// Any file left by an earlier run is replaced by the header.
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;

        let csv_path = dir.join("metrics.csv");

        let mut f = fs::File::create(&csv_path)?;
        writeln!(f, "epoch,avg_loss")?;
        tracing::debug!("Started metrics CSV: '{}'", csv_path.display());

        Ok(Self { csv_path })
    }

    /// Append one epoch's metrics as a new row in the CSV.
    pub fn log(&self, m: &EpochMetrics) -> Result<()> {
        let mut f = OpenOptions::new()
            .append(true)
            .open(&self.csv_path)?;

        writeln!(f, "{},{:.6}", m.epoch, m.avg_loss)?;

        tracing::debug!("Logged epoch {} metrics: avg_loss={:.4}", m.epoch, m.avg_loss);
        Ok(())
    }

    /// Return the path to the metrics CSV file
    pub fn csv_path(&self) -> &PathBuf {
        &self.csv_path
    }
}
