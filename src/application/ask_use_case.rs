// ============================================================
// Layer 2 — Ask Use Case
// ============================================================
// One conversational turn:
//
//   text ──classify──► Prediction
//        ──reply table──► base reply
//        ──context update──► ContextSnapshot
//        ──personalise──► final reply
//        ──memory──► appended to the conversation log
//        ──context file──► saved for the next session
//
// Startup loads the saved network. A missing, unreadable or
// stale model (wrong shape for the current corpus) triggers a
// fresh training run instead of an error.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::application::context::{capitalise, ConversationContext, DEFAULT_CONTEXT_FILE};
use crate::application::train_use_case::{load_corpus, TrainConfig, TrainUseCase};
use crate::data::{preprocessor::Preprocessor, replies::reply_for, vocabulary::Vocabulary};
use crate::domain::conversation::{ContextSnapshot, Interaction, Tone};
use crate::domain::intent::{Corpus, Prediction};
use crate::domain::traits::{IntentPredictor, Responder};
use crate::infra::{
    checkpoint::CheckpointManager,
    memory_log::{ConversationMemory, DEFAULT_MEMORY_FILE},
};
use crate::ml::classifier::{ClassifierConfig, IntentClassifier};
use crate::ml::network::Network;

pub const LOW_CONFIDENCE_SUFFIX: &str =
    " No estoy seguro de entender completamente. ¿Podrías explicarlo de otra manera?";

const INFORMAL_SUFFIX: &str = " 😊";

// Follow-up question appended while a topic is active
const TOPIC_FOLLOW_UPS: [(&str, &str); 1] = [
    ("tecnologia", " ¿Estás trabajando en algún proyecto interesante?"),
];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AskConfig {
    pub checkpoint_dir:       String,
    pub corpus_path:          Option<String>,
    pub memory_path:          String,
    pub context_path:         String,
    pub confidence_threshold: f64,
}

impl Default for AskConfig {
    fn default() -> Self {
        Self {
            checkpoint_dir:       "checkpoints".to_string(),
            corpus_path:          None,
            memory_path:          DEFAULT_MEMORY_FILE.to_string(),
            context_path:         DEFAULT_CONTEXT_FILE.to_string(),
            confidence_threshold: ClassifierConfig::default().confidence_threshold,
        }
    }
}

/// Everything one turn produced.
#[derive(Debug, Clone, PartialEq)]
pub struct Turn {
    pub prediction: Prediction,
    pub reply:      String,
}

pub struct AskUseCase {
    classifier:   IntentClassifier,
    context:      ConversationContext,
    context_path: PathBuf,
    memory:       ConversationMemory,
}

impl AskUseCase {
    pub fn new(config: AskConfig) -> Result<Self> {
        let corpus     = load_corpus(config.corpus_path.as_deref())?;
        let vocabulary = Vocabulary::build(&corpus.examples, &Preprocessor::new());

        let ckpt    = CheckpointManager::new(&config.checkpoint_dir);
        let network = match ckpt.load_compatible(vocabulary.len(), corpus.classes.len()) {
            Ok(network) => network,
            Err(e) if e.is_recoverable_by_retraining() => {
                tracing::warn!("{e}; training a new model");
                retrain(&ckpt, &config, &corpus, &vocabulary)?
            }
            Err(e) => return Err(e).context("Cannot load the model"),
        };

        let classifier = IntentClassifier::new(
            network,
            vocabulary,
            corpus.classes,
            ClassifierConfig { confidence_threshold: config.confidence_threshold },
        )?;

        let context_path = PathBuf::from(&config.context_path);
        Ok(Self {
            classifier,
            context: ConversationContext::load(&context_path),
            context_path,
            memory:  ConversationMemory::open(&config.memory_path),
        })
    }

    /// Network verdict after the keyword override, without side effects.
    pub fn classify(&self, text: &str) -> Result<Prediction> {
        Ok(self.classifier.predict(text.trim())?)
    }

    /// Run a full turn: classify, reply, update context, log, save context.
    pub fn respond(&mut self, text: &str) -> Result<Turn> {
        let text       = text.trim();
        let prediction = self.classify(text)?;
        let base       = reply_for(&prediction.label, &mut rand::thread_rng());

        self.context.update(text);
        let snapshot = self.context.snapshot();

        let reply = personalise_reply(
            &base,
            &snapshot,
            prediction.confidence,
            self.classifier.config().confidence_threshold,
        );

        if let Err(e) = self.memory.record(text, reply.as_str(), snapshot) {
            tracing::warn!("Could not save the conversation: {e:#}");
        }
        self.save_context();

        Ok(Turn { prediction, reply })
    }

    pub fn context_snapshot(&self) -> ContextSnapshot {
        self.context.snapshot()
    }

    pub fn user_name(&self) -> Option<&str> {
        self.context.name()
    }

    /// Last `n` logged exchanges, oldest first.
    pub fn recent_history(&self, n: usize) -> &[Interaction] {
        self.memory.recent(n)
    }

    /// Drop topic and tone, keep what we know about the user.
    pub fn reset_context(&mut self) {
        self.context.reset();
        self.save_context();
    }

    fn save_context(&self) {
        if let Err(e) = self.context.save(&self.context_path) {
            tracing::warn!("Could not save the context: {e:#}");
        }
    }
}

impl Responder for AskUseCase {
    fn answer(&mut self, text: &str) -> Result<String> {
        Ok(self.respond(text)?.reply)
    }
}

// Reuse the hyper-parameters of the last recorded run, if any
fn retrain(
    ckpt:       &CheckpointManager,
    config:     &AskConfig,
    corpus:     &Corpus,
    vocabulary: &Vocabulary,
) -> Result<Network> {
    let saved = ckpt.load_config().unwrap_or_else(|e| {
        tracing::debug!("No saved training config ({e:#}), using defaults");
        TrainConfig::default()
    });

    let train_cfg = TrainConfig {
        corpus_path:    config.corpus_path.clone(),
        checkpoint_dir: config.checkpoint_dir.clone(),
        ..saved
    };
    TrainUseCase::new(train_cfg).execute_on(corpus, vocabulary)
}

/// Adapt a template reply to what we know about the user.
///
/// Applied in order: name substitution, topic follow-up,
/// low-confidence disclaimer, tone.
pub fn personalise_reply(
    reply:      &str,
    ctx:        &ContextSnapshot,
    confidence: f64,
    threshold:  f64,
) -> String {
    let mut out = reply.to_string();

    if let Some(name) = &ctx.name {
        out = out
            .replace("Hola", &format!("Hola {name}"))
            .replace("tú", name);
    }

    if let Some(topic) = ctx.current_topic.as_deref() {
        if let Some((_, follow_up)) = TOPIC_FOLLOW_UPS.iter().find(|(t, _)| *t == topic) {
            out.push_str(follow_up);
        }
    }

    if confidence < threshold {
        out.push_str(LOW_CONFIDENCE_SUFFIX);
    }

    match ctx.tone {
        Tone::Formal => {
            out = capitalise(&out.replace('!', ".").replace('¿', ""));
        }
        Tone::Informal => out.push_str(INFORMAL_SUFFIX),
        Tone::Neutral | Tone::Technical => {}
    }

    out
}
