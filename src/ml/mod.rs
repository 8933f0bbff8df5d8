// ============================================================
// Layer 5 — ML / Learning Engine
// ============================================================
// The numeric core of the assistant. No framework: every
// multiply-add is written out so each gradient can be traced
// by hand.
//
//   network.rs    — two dense sigmoid layers: forward pass,
//                   backpropagation, gradient-descent update,
//                   JSON persistence of the parameters
//
//   trainer.rs    — epoch loop, per-example SGD, loss report
//
//   classifier.rs — text → (label, confidence), including the
//                   low-confidence keyword override policy
//
// Reference: Rumelhart, Hinton & Williams (1986)
//            Rust Book §8 (Vectors), §13 (Iterators)

/// Two-layer feed-forward network
pub mod network;

/// Stochastic gradient descent training loop
pub mod trainer;

/// Arg-max classification and override policy
pub mod classifier;
