// ============================================================
// Layer 6 — Infrastructure Layer
// ============================================================
// Everything that touches the disk on behalf of other layers:
//
//   checkpoint.rs — Saving and loading the network weights
//                   (modelo_chat.json) and the TrainConfig
//                   that produced them.
//
//   metrics.rs    — Per-epoch average loss appended to a CSV
//                   file for later plotting.
//
//   memory_log.rs — The conversation log, one JSON array of
//                   user/assistant exchanges.
//
// Reference: Rust Book §7 (Modules)
//            Rust Book §9 (Error Handling with anyhow)

/// Model checkpoint saving and loading
pub mod checkpoint;

/// Training metrics CSV logger
pub mod metrics;

/// Persistent conversation history
pub mod memory_log;
