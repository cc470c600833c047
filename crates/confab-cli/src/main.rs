//! confab CLI: Play scripted conversations in the terminal

use clap::{Parser, Subcommand};
use confab_engine::{InputSpec, MessageSpec, Script, SelectOption};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

/// Scripted conversation player with a chat-style TUI
#[derive(Parser)]
#[command(name = "confab")]
#[command(author, version, about, long_about = None)]
#[command(args_conflicts_with_subcommands = true)]
struct Cli {
    /// Script file to play (shortcut for `confab run <SCRIPT>`)
    script: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Play a script in the TUI (default when a path is given)
    Run {
        /// Path to the script JSON file
        script: PathBuf,
    },

    /// Validate a script without playing it
    Check {
        /// Path to the script JSON file
        script: PathBuf,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Write a starter script to the given path
    Init {
        /// Where to write the sample script
        #[arg(default_value = "script.json")]
        path: PathBuf,
    },
}

fn main() {
    // Logs go to stderr and are off unless RUST_LOG is set; the TUI owns
    // the terminal while running.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match (cli.command, cli.script) {
        (Some(Commands::Run { script }), _) | (None, Some(script)) => {
            cmd_run(&script);
        }
        (Some(Commands::Check { script, json }), _) => {
            cmd_check(&script, json);
        }
        (Some(Commands::Init { path }), _) => {
            cmd_init(&path);
        }
        (None, None) => {
            eprintln!("Usage: confab <SCRIPT> (see `confab --help`)");
            std::process::exit(2);
        }
    }
}

fn cmd_run(path: &Path) {
    let script = load_or_exit(path);

    let rt = match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(e) => {
            eprintln!("Failed to create tokio runtime: {e}");
            std::process::exit(1);
        }
    };
    if let Err(e) = rt.block_on(confab_tui::run_tui(script)) {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

fn cmd_check(path: &Path, json: bool) {
    match Script::load(path) {
        Ok(script) => {
            let inputs = script.messages.iter().filter(|m| m.has_input()).count();
            if json {
                let output = serde_json::json!({
                    "valid": true,
                    "messages": script.len(),
                    "inputs": inputs,
                });
                println!("{output}");
            } else {
                println!("{} is valid", path.display());
                println!("  {} message(s), {} input(s)", script.len(), inputs);
            }
        }
        Err(e) => {
            if json {
                let output = serde_json::json!({
                    "valid": false,
                    "error": e.to_string(),
                });
                println!("{output}");
            } else {
                eprintln!("{}: {e}", path.display());
            }
            std::process::exit(1);
        }
    }
}

fn cmd_init(path: &Path) {
    if path.exists() {
        eprintln!("{} already exists", path.display());
        std::process::exit(1);
    }

    let sample = sample_script();
    let content = match serde_json::to_string_pretty(&sample) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to serialize sample script: {e}");
            std::process::exit(1);
        }
    };

    if let Err(e) = std::fs::write(path, content) {
        eprintln!("Failed to write {}: {e}", path.display());
        std::process::exit(1);
    }

    println!("Created {}", path.display());
    println!("Play it with: confab {}", path.display());
}

/// A small script showing every message kind.
fn sample_script() -> Script {
    Script::from_messages(vec![
        MessageSpec::app("Hi! I'm confab."),
        MessageSpec::prompt("What's your name?", InputSpec::text_with_placeholder("Your name"))
            .with_event("name"),
        MessageSpec::user_bound("name"),
        MessageSpec {
            bind: Some("name".into()),
            ..MessageSpec::default()
        }
        .with_template("Nice to meet you, {text}!"),
        MessageSpec::prompt(
            "Want to see a select input?",
            InputSpec::select(vec![
                SelectOption {
                    label: "Yes".into(),
                    value: serde_json::json!("yes"),
                },
                SelectOption {
                    label: "No".into(),
                    value: serde_json::json!("no"),
                },
            ]),
        )
        .with_event("more"),
        MessageSpec::app("That's the whole tour. Bye!"),
    ])
}

fn load_or_exit(path: &Path) -> Script {
    match Script::load(path) {
        Ok(script) => script,
        Err(e) => {
            eprintln!("{}: {e}", path.display());
            std::process::exit(1);
        }
    }
}
