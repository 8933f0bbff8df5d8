// ============================================================
// Layer 4 — Data Pipeline
// ============================================================
// Everything between a raw (text, label) corpus and the
// numeric vectors the network trains on:
//
//   Corpus (built-in table or JSON file)
//       │
//       ▼
//   Preprocessor   → lower-case, fold accents, strip stopwords
//       │
//       ▼
//   Vocabulary     → token → index, built once, read-only after
//       │
//       ▼
//   Vectorizer     → bag-of-words counts + one-hot labels
//       │
//       ▼
//   TrainingSet    → (inputs, targets) in corpus order
//
// The reply table lives here too: it is static data keyed by
// the same labels as the corpus.
//
// Reference: Rust Book §8 (Collections), §13 (Iterators)

/// Built-in training corpus and class list
pub mod corpus;

/// Loads a corpus from a JSON file
pub mod loader;

/// Tokenisation shared by training and inference
pub mod preprocessor;

/// Token → index mapping with a reserved <UNK>
pub mod vocabulary;

/// Text → count vector, label → one-hot vector
pub mod vectorizer;

/// Vectorised corpus
pub mod dataset;

/// Canned replies per intent
pub mod replies;
