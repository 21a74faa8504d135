use std::path::PathBuf;

use clap::{Parser, Subcommand};
use cursor::CursorConfig;
use tools::{Script, ScriptError};
use tracing_subscriber::EnvFilter;

/// Replays recorded SAR cursor sessions.
#[derive(Debug, Parser)]
#[command(name = "sarcursor", version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Replay a session script and print one JSON line per `resolve` event.
    Replay {
        script: PathBuf,
        /// Pretty-print each result instead of emitting JSON lines.
        #[arg(long)]
        pretty: bool,
    },
    /// Validate a cursor config and print it with defaults filled in.
    Config { path: PathBuf },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = real_main(Cli::parse()) {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

fn real_main(cli: Cli) -> Result<(), ScriptError> {
    match cli.command {
        Command::Replay { script, pretty } => cmd_replay(script, pretty),
        Command::Config { path } => cmd_config(path),
    }
}

fn cmd_replay(path: PathBuf, pretty: bool) -> Result<(), ScriptError> {
    let script = Script::load(&path)?;
    for resolved in script.replay()? {
        let line = if pretty {
            serde_json::to_string_pretty(&resolved)?
        } else {
            serde_json::to_string(&resolved)?
        };
        println!("{line}");
    }
    Ok(())
}

fn cmd_config(path: PathBuf) -> Result<(), ScriptError> {
    let config = CursorConfig::load(&path)?;
    println!("{}", serde_json::to_string_pretty(&config)?);
    Ok(())
}
