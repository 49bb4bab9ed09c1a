//! NoteChat - Personal notes-backed chatbot
//!
//! Serves the notes/chat HTTP API and offers a few local administration
//! commands that operate on the same note file.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use notechat::{
    api::{build_app, AppState},
    auth::AuthGate,
    chat::{ChatBackend, ChatService, GeminiClient},
    config::{default_config_path, NoteChatConfig},
    notes::NoteStore,
};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "notechat")]
#[command(version)]
#[command(about = "Personal notes-backed chatbot")]
struct Cli {
    /// Configuration file path
    #[arg(short, long, env = "NOTECHAT_CONFIG")]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Emit logs as JSON lines
    #[arg(long)]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP API
    Serve {
        /// Host to bind to (overrides config)
        #[arg(long)]
        host: Option<String>,

        /// Port to listen on (overrides config)
        #[arg(long)]
        port: Option<u16>,
    },

    /// Manage notes directly in the local note file
    Notes {
        #[command(subcommand)]
        command: NotesCommand,
    },

    /// Send a single chat message and print the answer
    Chat {
        /// Message text
        message: String,
    },

    /// Show configuration (secrets masked)
    Config {
        /// Show default configuration
        #[arg(long)]
        default: bool,
    },

    /// Run diagnostics
    Doctor,
}

#[derive(Subcommand)]
enum NotesCommand {
    /// List all notes
    List,

    /// Add a note
    Add {
        /// Note title (defaults to "Untitled")
        #[arg(short, long, default_value = "")]
        title: String,

        /// Note content
        content: String,
    },

    /// Remove a note by id
    Remove {
        /// Note id
        id: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose, cli.json_logs);

    let config =
        NoteChatConfig::load(cli.config.as_deref()).context("Failed to load configuration")?;

    match cli.command {
        Commands::Serve { host, port } => {
            run_server(config, host, port).await?;
        }
        Commands::Notes { command } => {
            run_notes(&config, command).await?;
        }
        Commands::Chat { message } => {
            run_chat(&config, &message).await?;
        }
        Commands::Config { default } => {
            show_config(if default { None } else { Some(&config) })?;
        }
        Commands::Doctor => {
            run_doctor(&config, cli.config.as_deref()).await;
        }
    }

    Ok(())
}

fn init_logging(verbose: bool, json: bool) {
    let log_level = if verbose { "debug" } else { "info" };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| format!("notechat={},tower_http={}", log_level, log_level).into());

    tracing_subscriber::registry()
        .with(filter)
        .with(json.then(|| tracing_subscriber::fmt::layer().json()))
        .with((!json).then(|| tracing_subscriber::fmt::layer()))
        .init();
}

async fn run_server(config: NoteChatConfig, host: Option<String>, port: Option<u16>) -> Result<()> {
    let host = host.unwrap_or_else(|| config.server.host.clone());
    let port = port.unwrap_or(config.server.port);

    let store = Arc::new(NoteStore::new(&config.storage.notes_file));
    let gate = Arc::new(AuthGate::new(&config.auth)?);
    let backend: Arc<dyn ChatBackend> = Arc::new(GeminiClient::new(&config.upstream)?);

    if !backend.is_configured() {
        tracing::warn!("GEMINI_API_KEY is not set; /api/chat will report a configuration error");
    }
    if config.auth.token_secret.is_none() {
        tracing::info!("No token secret configured; admin tokens are invalidated on restart");
    }

    let app = build_app(
        AppState {
            store,
            gate,
            backend,
        },
        &config.server.cors_origins,
    );

    let listener = tokio::net::TcpListener::bind((host.as_str(), port))
        .await
        .with_context(|| format!("Failed to bind {}:{}", host, port))?;

    tracing::info!(
        notes_file = %config.storage.notes_file.display(),
        "NoteChat listening on {}",
        listener.local_addr()?
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Shutting down...");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for Ctrl+C: {}", e);
        std::future::pending::<()>().await;
    }
}

async fn run_notes(config: &NoteChatConfig, command: NotesCommand) -> Result<()> {
    let store = NoteStore::new(&config.storage.notes_file);

    match command {
        NotesCommand::List => {
            let notes = store.load_all().await;
            if notes.is_empty() {
                println!("No notes yet.");
            }
            for note in notes {
                println!("{}  {}", note.id, note.title);
                for line in note.content.lines() {
                    println!("    {}", line);
                }
            }
        }
        NotesCommand::Add { title, content } => {
            let note = store.create(&title, &content).await?;
            println!("Added note {} ({})", note.id, note.title);
        }
        NotesCommand::Remove { id } => {
            store.delete(&id).await?;
            println!("Removed note {}", id);
        }
    }

    Ok(())
}

async fn run_chat(config: &NoteChatConfig, message: &str) -> Result<()> {
    let store = Arc::new(NoteStore::new(&config.storage.notes_file));
    let backend = Arc::new(GeminiClient::new(&config.upstream)?);
    let service = ChatService::new(store, backend);

    let answer = service.answer(message).await?;
    println!("{}", answer);
    Ok(())
}

fn show_config(config: Option<&NoteChatConfig>) -> Result<()> {
    let config = config.cloned().unwrap_or_default();
    let toml = toml::to_string_pretty(&config.masked())?;
    println!("{}", toml);
    Ok(())
}

async fn run_doctor(config: &NoteChatConfig, config_path: Option<&std::path::Path>) {
    println!("NoteChat Doctor");
    println!();

    println!("Checking configuration...");
    let path = config_path
        .map(PathBuf::from)
        .unwrap_or_else(default_config_path);
    if path.exists() {
        println!("  ✓ Configuration file found: {}", path.display());
    } else {
        println!("  ℹ No configuration file found (using defaults)");
    }
    if config.auth.admin_password == "admin123" {
        println!("  ✗ Admin password is the default; set ADMIN_PASSWORD");
    } else {
        println!("  ✓ Admin password set");
    }

    println!();
    println!("Checking notes file...");
    let notes_file = &config.storage.notes_file;
    if notes_file.exists() {
        let count = NoteStore::new(notes_file).load_all().await.len();
        println!("  ✓ {} ({} notes)", notes_file.display(), count);
    } else {
        println!("  ℹ {} does not exist yet (created on first note)", notes_file.display());
    }

    println!();
    println!("Checking upstream...");
    if config.upstream_configured() {
        println!("  ✓ API key configured (model {})", config.upstream.model);
    } else {
        println!("  ✗ No API key; set GEMINI_API_KEY");
    }

    println!();
    println!("Doctor check complete!");
}
