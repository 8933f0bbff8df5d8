// ============================================================
// Layer 1 — CLI / Presentation Layer
// ============================================================
// The entry point for all user interaction. Parses arguments
// with `clap` and hands the work to Layer 2.
//
//   1. `train` — retrain the classifier and save it
//   2. `ask`   — one message in, one reply out
//   3. `chat`  — read-eval-reply loop on stdin ('reiniciar' resets)
//
// Reference: Rust Book §7 (Modules), §12 (CLI programs)

pub mod commands;

use anyhow::Result;
use clap::Parser;
use std::io::{self, BufRead, Write};

use crate::application::ask_use_case::AskUseCase;
use crate::domain::traits::Responder;
use commands::{AskArgs, ChatArgs, Commands, TrainArgs};

/// Typing one of these (any case) ends the chat
pub const EXIT_WORDS: [&str; 4] = ["salir", "adiós", "chao", "hasta luego"];

/// Appearing anywhere in a line, prints the context after the reply
pub const DEBUG_FLAG: &str = "--debug";

/// Typed alone, forgets topic and tone but keeps the user's details
pub const RESET_COMMAND: &str = "reiniciar";

#[derive(Parser, Debug)]
#[command(
    name = "asistente-chat",
    version,
    about = "Spanish intent-classifier chat assistant backed by a tiny neural network."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Dispatch to the matching use case. Routes only, never computes.
    pub fn run(self) -> Result<()> {
        match self.command {
            Commands::Train(args) => run_train(args),
            Commands::Ask(args)   => run_ask(args),
            Commands::Chat(args)  => run_chat(args),
        }
    }
}

fn run_train(args: TrainArgs) -> Result<()> {
    use crate::application::train_use_case::TrainUseCase;

    let use_case = TrainUseCase::new(args.into());
    let network  = use_case.execute()?;

    println!(
        "Training complete: {}→{}→{} network saved.",
        network.input_size(),
        network.hidden_size(),
        network.output_size()
    );
    Ok(())
}

fn run_ask(args: AskArgs) -> Result<()> {
    let mut use_case = AskUseCase::new(args.conversation.into())?;
    let turn         = use_case.respond(&args.text)?;

    if args.show_intent {
        println!(
            "Intención: {} (confianza {:.2})",
            turn.prediction.label, turn.prediction.confidence
        );
    }
    println!("Asistente: {}", turn.reply);
    Ok(())
}

fn run_chat(args: ChatArgs) -> Result<()> {
    let mut use_case = AskUseCase::new(args.conversation.into())?;

    let stdin  = io::stdin();
    let stdout = io::stdout();
    chat_loop(&mut use_case, stdin.lock(), stdout.lock())?;

    if let Some(name) = use_case.user_name() {
        println!("Asistente: ¡Que tengas un buen día, {name}!");
    }
    Ok(())
}

pub fn is_exit_command(line: &str) -> bool {
    let line = line.trim().to_lowercase();
    EXIT_WORDS.contains(&line.as_str())
}

/// Drive a conversation until an exit word or end of input.
///
/// A failed turn is reported and the loop carries on. Returns
/// the number of turns answered.
pub fn chat_loop<R, W>(assistant: &mut AskUseCase, input: R, mut out: W) -> Result<usize>
where
    R: BufRead,
    W: Write,
{
    writeln!(out, "\nAsistente: ¡Hola! Soy tu asistente virtual. ¿En qué puedo ayudarte hoy?")?;
    writeln!(out, "(Escribe 'salir', 'adiós' o 'chao' para terminar la conversación)")?;
    writeln!(out, "(Escribe '{RESET_COMMAND}' para cambiar de tema desde cero)\n")?;

    let mut turns = 0;
    for line in input.lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        if is_exit_command(&line) {
            writeln!(out, "\nAsistente: ¡Hasta luego! Fue un gusto ayudarte.")?;
            break;
        }
        if line.trim().eq_ignore_ascii_case(RESET_COMMAND) {
            assistant.reset_context();
            writeln!(out, "Asistente: De acuerdo, empecemos de nuevo.")?;
            continue;
        }

        match assistant.answer(&line) {
            Ok(reply) => {
                turns += 1;
                writeln!(out, "Asistente: {reply}")?;
            }
            Err(e) => {
                tracing::error!("Turn failed: {e:#}");
                writeln!(out, "\nAsistente: ¡Ups! Algo salió mal: {e}")?;
                writeln!(out, "Por favor, intenta formular tu pregunta de otra manera.")?;
                continue;
            }
        }

        if line.contains(DEBUG_FLAG) {
            write_debug(assistant, &mut out)?;
        }
    }
    Ok(turns)
}

fn write_debug<W: Write>(assistant: &AskUseCase, out: &mut W) -> Result<()> {
    writeln!(out, "\n[DEBUG] Contexto actual:")?;
    writeln!(out, "{}", serde_json::to_string_pretty(&assistant.context_snapshot())?)?;
    writeln!(out, "Últimas interacciones:")?;
    for (i, turn) in assistant.recent_history(2).iter().enumerate() {
        writeln!(out, "{}. Usuario: {}", i + 1, turn.user)?;
        writeln!(out, "   Asistente: {}\n", turn.assistant)?;
    }
    Ok(())
}
