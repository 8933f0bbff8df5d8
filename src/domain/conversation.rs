// ============================================================
// Layer 3 — Conversation Domain Types
// ============================================================
// What the assistant remembers about the person it is talking
// to, and the shape of one logged exchange.
//
// Reference: Rust Book §6 (Enums), serde docs

use serde::{Deserialize, Serialize};

/// Register the user writes in. Starts neutral and only moves
/// when a marker phrase is seen.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tone {
    #[default]
    Neutral,
    Formal,
    Informal,
    #[serde(rename = "técnico")]
    Technical,
}

/// The slice of context the reply personaliser needs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContextSnapshot {
    pub name:           Option<String>,
    pub current_topic:  Option<String>,
    pub previous_topic: Option<String>,
    pub tone:           Tone,
    /// Up to three interests, `None` until one is detected
    pub interests:      Option<Vec<String>>,
}

/// One logged user/assistant exchange.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Interaction {
    /// RFC 3339 local time
    pub timestamp: String,
    pub user:      String,
    pub assistant: String,
    #[serde(default)]
    pub context:   ContextSnapshot,
}
