// ============================================================
// Layer 2 — Conversation Context
// ============================================================
// Tracks what the user has told us across turns:
//
//   personal    — name, location, interests (kept on reset)
//   dialogue    — current/previous topic, topic history, tone
//
// Everything is keyword or regex based and works on the
// lower-cased user text. Nothing here touches the network.
//
// The whole context is saved as JSON after every turn so a new
// session picks up where the last one stopped. A missing or
// unreadable file just means a fresh context.
//
// Reference: regex docs, chrono docs

use anyhow::{Context, Result};
use chrono::{DateTime, Local};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::{fs, path::Path};
use std::sync::LazyLock;

use crate::domain::conversation::{ContextSnapshot, Tone};

// ─── Patterns ─────────────────────────────────────────────────────────────────

static NAME_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"me llamo ([a-záéíóúñü]+)",
        r"mi nombre es ([a-záéíóúñü]+)",
        r"soy ([a-záéíóúñü]+)",
    ]
    .iter()
    .map(|p| Regex::new(p).expect("valid regex"))
    .collect()
});

static LOCATION_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"vivo en ([a-záéíóúñü\s]+)",
        r"estoy en ([a-záéíóúñü\s]+)",
        r"soy de ([a-záéíóúñü\s]+)",
    ]
    .iter()
    .map(|p| Regex::new(p).expect("valid regex"))
    .collect()
});

// Checked in order; the first group with a hit wins.
const TOPICS: [(&str, &[&str]); 4] = [
    ("trabajo",    &["trabajo", "empleo", "oficina", "jefe"]),
    ("ocio",       &["ocio", "diversión", "hobby", "pasatiempo"]),
    ("tecnologia", &["python", "programa", "código", "tecnología"]),
    ("clima",      &["clima", "tiempo", "lluvia", "soleado"]),
];

const FORMAL_MARKERS: [&str; 3] = ["por favor", "gracias", "le agradezco"];
const INFORMAL_MARKERS: [&str; 4] = ["bro", "holis", "jaja", "xd"];
const TECHNICAL_MARKERS: [&str; 4] = ["algoritmo", "red neuronal", "pln", "backend"];

const INTERESTS: [(&str, &[&str]); 3] = [
    ("programación", &["programar", "código", "python", "javascript"]),
    ("música",       &["música", "cantar", "guitarra", "canción"]),
    ("deportes",     &["fútbol", "deporte", "ejercicio", "correr"]),
];

/// At most this many interests are exposed in a snapshot
const SNAPSHOT_INTERESTS: usize = 3;

pub const DEFAULT_CONTEXT_FILE: &str = "contexto_conversacion.json";

// ─── Types ────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopicChange {
    pub topic:     String,
    pub timestamp: DateTime<Local>,
}

#[derive(Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConversationContext {
    name:           Option<String>,
    location:       Option<String>,
    interests:      BTreeSet<String>,
    current_topic:  Option<String>,
    previous_topic: Option<String>,
    topic_history:  Vec<TopicChange>,
    tone:           Tone,
    last_updated:   Option<DateTime<Local>>,
}

impl ConversationContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one user message into the context.
    pub fn update(&mut self, user_text: &str) {
        let lower = user_text.to_lowercase();

        self.extract_personal(&lower);
        self.detect_topic(&lower);
        self.detect_tone(&lower);
        self.detect_interests(&lower);
        self.last_updated = Some(Local::now());
    }

    fn extract_personal(&mut self, lower: &str) {
        // "soy de Madrid" is a location, not a name
        let name = NAME_PATTERNS
            .iter()
            .filter_map(|re| re.captures(lower))
            .filter_map(|caps| caps.get(1))
            .map(|m| m.as_str())
            .find(|word| *word != "de");
        if let Some(word) = name {
            self.name = Some(capitalise(word));
        }

        let location = LOCATION_PATTERNS
            .iter()
            .filter_map(|re| re.captures(lower))
            .filter_map(|caps| caps.get(1))
            .map(|m| m.as_str().trim())
            .find(|place| !place.is_empty());
        if let Some(place) = location {
            self.location = Some(capitalise(place));
        }
    }

    fn detect_topic(&mut self, lower: &str) {
        let Some((topic, _)) = TOPICS
            .iter()
            .find(|(_, words)| words.iter().any(|w| lower.contains(w)))
        else {
            return;
        };

        if self.current_topic.as_deref() == Some(*topic) {
            return;
        }

        tracing::debug!("Topic changed: {:?} → {}", self.current_topic, topic);
        self.previous_topic = self.current_topic.replace(topic.to_string());
        self.topic_history.push(TopicChange {
            topic:     topic.to_string(),
            timestamp: Local::now(),
        });
    }

    fn detect_tone(&mut self, lower: &str) {
        let hit = |markers: &[&str]| markers.iter().any(|m| lower.contains(m));

        if hit(&FORMAL_MARKERS) {
            self.tone = Tone::Formal;
        } else if hit(&INFORMAL_MARKERS) {
            self.tone = Tone::Informal;
        } else if hit(&TECHNICAL_MARKERS) {
            self.tone = Tone::Technical;
        }
    }

    fn detect_interests(&mut self, lower: &str) {
        for (interest, words) in INTERESTS {
            if words.iter().any(|w| lower.contains(w)) {
                self.interests.insert(interest.to_string());
            }
        }
    }

    /// What the reply personaliser and the memory log see.
    pub fn snapshot(&self) -> ContextSnapshot {
        let interests = if self.interests.is_empty() {
            None
        } else {
            let skip = self.interests.len().saturating_sub(SNAPSHOT_INTERESTS);
            Some(self.interests.iter().skip(skip).cloned().collect())
        };

        ContextSnapshot {
            name:           self.name.clone(),
            current_topic:  self.current_topic.clone(),
            previous_topic: self.previous_topic.clone(),
            tone:           self.tone,
            interests,
        }
    }

    /// Forget the dialogue state but keep name, location and interests.
    pub fn reset(&mut self) {
        self.current_topic  = None;
        self.previous_topic = None;
        self.topic_history.clear();
        self.tone           = Tone::Neutral;
        self.last_updated   = Some(Local::now());
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Write the context as pretty JSON, creating parent directories.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .with_context(|| format!("Cannot create '{}'", parent.display()))?;
        }
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)
            .with_context(|| format!("Cannot write context to '{}'", path.display()))
    }

    /// Read a saved context; missing or corrupt files give a fresh one.
    pub fn load(path: &Path) -> Self {
        let json = match fs::read_to_string(path) {
            Ok(json) => json,
            Err(e) => {
                tracing::debug!("No saved context at '{}': {}", path.display(), e);
                return Self::new();
            }
        };

        match serde_json::from_str(&json) {
            Ok(ctx) => ctx,
            Err(e) => {
                tracing::warn!("Ignoring unreadable context '{}': {}", path.display(), e);
                Self::new()
            }
        }
    }
}

/// First character upper-case, the rest lower-case.
pub fn capitalise(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None        => String::new(),
    }
}
