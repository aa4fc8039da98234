//! qrscan CLI - record QR payloads into named sessions

mod commands;

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(name = "qrscan")]
#[command(version)]
#[command(about = "Session-based QR scan log backed by SQLite")]
#[command(long_about = r#"
qrscan groups decoded QR payloads into named sessions and keeps them in a
local SQLite file.

Example usage:
  qrscan init
  qrscan scan --name "Warehouse" < payloads.txt
  qrscan sessions
  qrscan codes --session 6f1c...
"#)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit JSON instead of human output
    #[arg(long, global = true)]
    json: bool,

    /// Path to the config file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Path to the database file (overrides the config)
    #[arg(short, long, global = true)]
    database: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a config file and create the database
    Init {
        /// Overwrite an existing config
        #[arg(long)]
        force: bool,
    },

    /// Create an empty session
    New {
        /// Session name (defaults to "<prefix> <date time>")
        #[arg(short, long)]
        name: Option<String>,
    },

    /// Save payloads into an existing session
    Add {
        /// Session id
        #[arg(short, long)]
        session: String,

        /// Decoded payloads, saved in the given order
        #[arg(required = true)]
        texts: Vec<String>,
    },

    /// List sessions, newest first
    Sessions,

    /// List the codes of one session, newest first
    Codes {
        /// Session id
        #[arg(short, long)]
        session: String,
    },

    /// Rename a session
    Rename {
        /// Session id
        #[arg(short, long)]
        session: String,

        /// New name
        #[arg(short, long)]
        name: String,
    },

    /// Delete a session and all of its codes
    Delete {
        /// Session id
        #[arg(short, long)]
        session: String,
    },

    /// Show every session with its codes
    History,

    /// Run a scanning flow fed by stdin, one payload per line
    Scan {
        /// Session name (defaults to "<prefix> <date time>")
        #[arg(short, long)]
        name: Option<String>,

        /// Debounce between accepted payloads (overrides the config)
        #[arg(long)]
        cooldown_ms: Option<u64>,
    },

    /// Show session and code totals
    Stats,

    /// Print version information
    Version,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    Human,
    Json,
}

impl OutputMode {
    pub fn is_human(self) -> bool {
        self == OutputMode::Human
    }
}

/// Print a `{"status":"ok", ...}` envelope in JSON mode
pub fn emit_success(output_mode: OutputMode, command: &str, data: serde_json::Value) -> anyhow::Result<()> {
    if output_mode == OutputMode::Json {
        let envelope = serde_json::json!({
            "status": "ok",
            "command": command,
            "data": data,
        });
        println!("{}", serde_json::to_string_pretty(&envelope)?);
    }
    Ok(())
}

fn main() {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    let output_mode = if cli.json { OutputMode::Json } else { OutputMode::Human };

    if let Err(e) = run(cli, output_mode) {
        if output_mode.is_human() {
            qrscan::ui::error(&format!("{:#}", e));
        } else {
            let envelope = serde_json::json!({ "status": "error", "message": format!("{:#}", e) });
            println!("{}", envelope);
        }
        std::process::exit(1);
    }
}

fn run(cli: Cli, output_mode: OutputMode) -> anyhow::Result<()> {
    let ctx = commands::Context::load(cli.config.as_deref(), cli.database.as_deref(), output_mode)?;

    match cli.command {
        Commands::Init { force } => commands::run_init(&ctx, cli.config.as_deref(), force),
        Commands::New { name } => commands::run_new(&ctx, name),
        Commands::Add { session, texts } => commands::run_add(&ctx, &session, &texts),
        Commands::Sessions => commands::run_sessions(&ctx),
        Commands::Codes { session } => commands::run_codes(&ctx, &session),
        Commands::Rename { session, name } => commands::run_rename(&ctx, &session, &name),
        Commands::Delete { session } => commands::run_delete(&ctx, &session),
        Commands::History => commands::run_history(&ctx),
        Commands::Scan { name, cooldown_ms } => {
            let stdin = std::io::stdin();
            commands::run_scan(&ctx, name, cooldown_ms, stdin.lock())
        }
        Commands::Stats => commands::run_stats(&ctx),
        Commands::Version => commands::run_version(output_mode),
    }
}
