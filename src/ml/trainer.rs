// ============================================================
// Layer 5 — Training Loop
// ============================================================
// Plain stochastic gradient descent, one example at a time:
//
//   for epoch in 0..epochs
//     for (x, y) in dataset        (fixed order, no shuffling)
//       pass  = forward(x)
//       loss += mse(pass.output, y)
//       grads = backward(pass, y)
//       update(grads, lr)
//
// No mini-batches, no validation split and no early stopping:
// the configured number of epochs always runs to completion.
// The average loss of every epoch is kept in the report; epoch
// 0 and every `log_every`-th epoch are logged (and written to
// the metrics CSV when a logger is attached).

use serde::{Deserialize, Serialize};

use crate::data::vectorizer::{FeatureVector, TargetVector};
use crate::domain::error::EngineError;
use crate::infra::metrics::{EpochMetrics, MetricsLogger};
use crate::ml::network::{mse, Network};

// ─── Trainer Configuration ────────────────────────────────────────────────────
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainerConfig {
    /// Full passes over the dataset
    pub epochs: usize,

    /// Step size for every parameter update
    pub learning_rate: f64,

    /// Report average loss every this many epochs (0 = never)
    pub log_every: usize,
}

impl Default for TrainerConfig {
    fn default() -> Self {
        Self {
            epochs:        1000,
            learning_rate: 0.2,
            log_every:     100,
        }
    }
}

/// Average MSE of every epoch, in order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TrainingReport {
    pub epoch_losses: Vec<f64>,
}

impl TrainingReport {
    pub fn first_loss(&self) -> Option<f64> {
        self.epoch_losses.first().copied()
    }

    pub fn final_loss(&self) -> Option<f64> {
        self.epoch_losses.last().copied()
    }
}

pub struct Trainer<'a> {
    config:  TrainerConfig,
    metrics: Option<&'a MetricsLogger>,
}

impl<'a> Trainer<'a> {
    pub fn new(config: TrainerConfig) -> Self {
        Self { config, metrics: None }
    }

    /// Also append reported epochs to a metrics CSV
    pub fn with_metrics(mut self, metrics: &'a MetricsLogger) -> Self {
        self.metrics = Some(metrics);
        self
    }

    /// Train `network` in place.
    ///
    /// # Errors
    /// [`EngineError::DimensionMismatch`] when `inputs` and `targets`
    /// differ in length, or when a vector does not fit the network.
    /// The whole dataset is checked before the first update, so the
    /// network is untouched on error.
    pub fn train(
        &self,
        network: &mut Network,
        inputs:  &[FeatureVector],
        targets: &[TargetVector],
    ) -> Result<TrainingReport, EngineError> {
        if inputs.len() != targets.len() {
            return Err(EngineError::DimensionMismatch {
                context:  "training targets",
                expected: inputs.len(),
                actual:   targets.len(),
            });
        }

        check_shapes(network, inputs, targets)?;

        let cfg = &self.config;
        tracing::info!(
            "Training on {} examples for {} epochs (lr={})",
            inputs.len(),
            cfg.epochs,
            cfg.learning_rate
        );

        let mut report = TrainingReport {
            epoch_losses: Vec::with_capacity(cfg.epochs),
        };

        for epoch in 0..cfg.epochs {
            let mut total_loss = 0.0f64;

            for (x, y) in inputs.iter().zip(targets) {
                let pass = network.forward(x)?;
                total_loss += mse(pass.output(), y);
                let grads = network.backward(&pass, y)?;
                network.update(&grads, cfg.learning_rate)?;
            }

            let avg_loss = if inputs.is_empty() {
                0.0
            } else {
                total_loss / inputs.len() as f64
            };
            report.epoch_losses.push(avg_loss);

            if cfg.log_every > 0 && epoch % cfg.log_every == 0 {
                tracing::info!("Epoch {:>4} | loss={:.4}", epoch, avg_loss);
                self.record(epoch, avg_loss);
            }
        }

        if let Some(loss) = report.final_loss() {
            tracing::info!("Training complete, final loss={:.4}", loss);
        }
        Ok(report)
    }

    // A broken metrics file must not abort training
    fn record(&self, epoch: usize, avg_loss: f64) {
        if let Some(metrics) = self.metrics {
            if let Err(e) = metrics.log(&EpochMetrics::new(epoch, avg_loss)) {
                tracing::warn!("Could not write metrics for epoch {}: {}", epoch, e);
            }
        }
    }
}

fn check_shapes(
    network: &Network,
    inputs:  &[FeatureVector],
    targets: &[TargetVector],
) -> Result<(), EngineError> {
    if let Some(x) = inputs.iter().find(|x| x.len() != network.input_size()) {
        return Err(EngineError::DimensionMismatch {
            context:  "training input",
            expected: network.input_size(),
            actual:   x.len(),
        });
    }
    if let Some(y) = targets.iter().find(|y| y.len() != network.output_size()) {
        return Err(EngineError::DimensionMismatch {
            context:  "training target",
            expected: network.output_size(),
            actual:   y.len(),
        });
    }
    Ok(())
}
