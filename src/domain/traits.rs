// ============================================================
// Layer 3 — Core Traits (Abstractions)
// ============================================================
// The seams between layers:
//
//   CorpusSource   — where training data comes from
//                    (built-in table or a JSON file)
//   IntentPredictor — text in, (label, confidence) out
//   Persistable    — parameters that survive a restart
//   Responder      — text in, reply out; the chat loop only
//                    ever talks to this trait
//
// Reference: Rust Book §10 (Traits: Defining Shared Behaviour)

use std::path::Path;

use anyhow::Result;

use crate::domain::error::EngineError;
use crate::domain::intent::{Corpus, Prediction};

// ─── CorpusSource ─────────────────────────────────────────────────────────────
/// Any component that can supply a labelled training corpus.
///
/// Implementations:
///   - BuiltinCorpus → the static table compiled into the binary
///   - CorpusLoader  → a JSON file, falling back to the built-in table
pub trait CorpusSource {
    fn load_corpus(&self) -> Result<Corpus>;
}

// ─── IntentPredictor ──────────────────────────────────────────────────────────
/// Any component that maps an utterance to an intent label.
pub trait IntentPredictor {
    fn predict(&self, text: &str) -> Result<Prediction, EngineError>;
}

// ─── Persistable ──────────────────────────────────────────────────────────────
/// Any component whose state can be saved and restored from disk.
///
/// Errors are typed so callers can tell a missing or corrupt
/// file (recoverable) from anything else.
pub trait Persistable: Sized {
    fn save(&self, path: &Path) -> Result<(), EngineError>;

    fn load(path: &Path) -> Result<Self, EngineError>;
}

// ─── Responder ────────────────────────────────────────────────────────────────
/// Anything that can hold up its end of a conversation.
pub trait Responder {
    /// Produce the assistant's reply to one user turn.
    fn answer(&mut self, text: &str) -> Result<String>;
}
