// ============================================================
// Layer 3 — Engine Error Taxonomy
// ============================================================
// Typed failures of the learning engine. Workflows in Layer 2
// match on these to decide between recovering and aborting:
//
//   MissingModelFile / CorruptModel → recovered by retraining
//   UnknownLabel                    → corpus bug, abort training
//   DimensionMismatch / NoClasses   → programming error, propagate
//   Io                              → surfaced to the caller
//
// Reference: Rust Book §9 (Error Handling), thiserror docs

use std::path::PathBuf;

use thiserror::Error;

/// Errors produced by vectorisation, the network and its persistence.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("model file {} does not exist", path.display())]
    MissingModelFile { path: PathBuf },

    #[error("model file {} is corrupt: {reason}", path.display())]
    CorruptModel { path: PathBuf, reason: String },

    #[error("label \"{label}\" is not in the class list")]
    UnknownLabel { label: String },

    #[error("{context}: expected length {expected} but found {actual}")]
    DimensionMismatch {
        context:  &'static str,
        expected: usize,
        actual:   usize,
    },

    #[error("classifier has no output classes")]
    NoClasses,

    #[error("failed to write {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl EngineError {
    /// True for the persisted-state failures that a fresh
    /// training run can repair.
    pub fn is_recoverable_by_retraining(&self) -> bool {
        matches!(
            self,
            EngineError::MissingModelFile { .. } | EngineError::CorruptModel { .. }
        )
    }

    pub(crate) fn corrupt(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        EngineError::CorruptModel {
            path:   path.into(),
            reason: reason.into(),
        }
    }
}
