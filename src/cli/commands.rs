// ============================================================
// Layer 1 — CLI Commands and Arguments
// ============================================================
// Defines the three subcommands: `train`, `ask` and `chat`
// and all their configurable flags.
//
// clap's derive macros automatically generate:
//   - help text (--help)
//   - error messages for missing args
//   - type conversion (string → usize, f64, etc.)
//
// Reference: Rust Book §12 (Building a CLI Program)

use clap::{Args, Subcommand};

use crate::application::ask_use_case::AskConfig;
use crate::application::context::DEFAULT_CONTEXT_FILE;
use crate::application::train_use_case::TrainConfig;
use crate::infra::memory_log::DEFAULT_MEMORY_FILE;

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Train the intent classifier from scratch and save it
    Train(TrainArgs),

    /// Answer a single message
    Ask(AskArgs),

    /// Interactive conversation on stdin
    Chat(ChatArgs),
}

/// Where the corpus and checkpoints live; shared by every command.
#[derive(Args, Debug, Clone)]
pub struct PathArgs {
    /// JSON corpus file; the built-in Spanish corpus when omitted
    #[arg(long)]
    pub corpus: Option<String>,

    /// Directory for modelo_chat.json, train_config.json and metrics.csv
    #[arg(long, default_value = "checkpoints")]
    pub checkpoint_dir: String,
}

#[derive(Args, Debug)]
pub struct TrainArgs {
    #[command(flatten)]
    pub paths: PathArgs,

    /// Neurons in the hidden layer
    #[arg(long, default_value_t = 5)]
    pub hidden_size: usize,

    /// Full passes over the corpus
    #[arg(long, default_value_t = 1000)]
    pub epochs: usize,

    /// Gradient-descent step size
    #[arg(long, default_value_t = 0.2)]
    pub lr: f64,

    /// Log the average loss every N epochs (0 disables)
    #[arg(long, default_value_t = 100)]
    pub log_every: usize,
}

/// Convert CLI TrainArgs into the application-layer TrainConfig.
/// The application layer never sees clap types.
impl From<TrainArgs> for TrainConfig {
    fn from(a: TrainArgs) -> Self {
        TrainConfig {
            corpus_path:    a.paths.corpus,
            checkpoint_dir: a.paths.checkpoint_dir,
            hidden_size:    a.hidden_size,
            epochs:         a.epochs,
            lr:             a.lr,
            log_every:      a.log_every,
        }
    }
}

/// Options shared by `ask` and `chat`
#[derive(Args, Debug, Clone)]
pub struct ConversationArgs {
    #[command(flatten)]
    pub paths: PathArgs,

    /// Conversation log (JSON array)
    #[arg(long, default_value = DEFAULT_MEMORY_FILE)]
    pub memory: String,

    /// Saved conversation context, reloaded on the next run
    #[arg(long, default_value = DEFAULT_CONTEXT_FILE)]
    pub context: String,

    /// Below this confidence the keyword override kicks in
    #[arg(long, default_value_t = 0.4)]
    pub threshold: f64,
}

impl From<ConversationArgs> for AskConfig {
    fn from(a: ConversationArgs) -> Self {
        AskConfig {
            checkpoint_dir:       a.paths.checkpoint_dir,
            corpus_path:          a.paths.corpus,
            memory_path:          a.memory,
            context_path:         a.context,
            confidence_threshold: a.threshold,
        }
    }
}

#[derive(Args, Debug)]
pub struct AskArgs {
    /// The message to answer
    #[arg(long)]
    pub text: String,

    /// Also print the predicted intent and its confidence
    #[arg(long)]
    pub show_intent: bool,

    #[command(flatten)]
    pub conversation: ConversationArgs,
}

#[derive(Args, Debug)]
pub struct ChatArgs {
    #[command(flatten)]
    pub conversation: ConversationArgs,
}
