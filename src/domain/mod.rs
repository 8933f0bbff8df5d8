// ============================================================
// Layer 3 — Domain Layer
// ============================================================
// Pure Rust structs, traits and errors that define the core
// concepts of the assistant.
//
// Rules for this layer:
//   - NO file I/O or terminal interaction
//   - NO numeric engine code (that lives in Layer 5)
//   - Only plain Rust structs, enums, and traits
//
// Everything else in the crate speaks in these types:
//   - a LabeledUtterance is one line of the training corpus
//   - a Prediction is what the classifier hands to the reply logic
//   - an EngineError is anything the learning engine can refuse
//   - a ContextSnapshot is what we know about the user right now
//
// Reference: Rust Book §5 (Structs), §10 (Traits)

// Labelled utterances and classifier output
pub mod intent;

// User context and logged exchanges
pub mod conversation;

// Typed error taxonomy of the learning engine
pub mod error;

// Core abstractions (traits) that other layers implement
pub mod traits;
