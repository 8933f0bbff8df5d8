// ============================================================
// Layer 6 — Conversation Memory
// ============================================================
// Append-only log of every exchange, kept as one JSON array on
// disk and rewritten in full after each turn.
//
// A missing or unreadable log is never fatal: the assistant
// starts with an empty history and overwrites the file on the
// next turn.

use anyhow::{Context, Result};
use chrono::Local;
use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::domain::conversation::{ContextSnapshot, Interaction};

pub const DEFAULT_MEMORY_FILE: &str = "memoria_conversacion.json";

pub struct ConversationMemory {
    path:    PathBuf,
    history: Vec<Interaction>,
}

impl ConversationMemory {
    /// Open the log at `path`, tolerating a missing or corrupt file.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path    = path.into();
        let history = Self::read_history(&path);
        Self { path, history }
    }

    fn read_history(path: &Path) -> Vec<Interaction> {
        let json = match fs::read_to_string(path) {
            Ok(json) => json,
            Err(e) => {
                tracing::debug!("No conversation memory at '{}': {}", path.display(), e);
                return Vec::new();
            }
        };

        match serde_json::from_str(&json) {
            Ok(history) => history,
            Err(e) => {
                tracing::warn!(
                    "Ignoring unreadable conversation memory '{}': {}",
                    path.display(),
                    e
                );
                Vec::new()
            }
        }
    }

    /// Append one exchange and persist the whole history.
    pub fn record(
        &mut self,
        user:      impl Into<String>,
        assistant: impl Into<String>,
        context:   ContextSnapshot,
    ) -> Result<()> {
        self.history.push(Interaction {
            timestamp: Local::now().to_rfc3339(),
            user:      user.into(),
            assistant: assistant.into(),
            context,
        });
        self.persist()
    }

    fn persist(&self) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .with_context(|| format!("Cannot create '{}'", parent.display()))?;
        }
        let json = serde_json::to_string_pretty(&self.history)?;
        fs::write(&self.path, json)
            .with_context(|| format!("Cannot write memory to '{}'", self.path.display()))
    }

    /// The last `n` interactions, oldest first.
    pub fn recent(&self, n: usize) -> &[Interaction] {
        let start = self.history.len().saturating_sub(n);
        &self.history[start..]
    }
}
