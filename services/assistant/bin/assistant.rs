//! Main Entrypoint for the Voice Assistant
//!
//! This binary is responsible for:
//! 1. Loading configuration from the environment and command line.
//! 2. Initializing logging.
//! 3. Building the collaborators (console I/O, Wikipedia, YouTube, jokes).
//! 4. Running the session loop until farewell, Ctrl+C, or a fatal error.

use anyhow::Context;
use assistant_core::{
    clock::SystemClock,
    handlers::{Assistant, Collaborators},
    session::{Session, SessionConfig, SessionEnd},
};
use assistant_service::{
    adapters::{
        BundledJokes, ConsoleCapture, ConsoleSpeech, WikipediaLookup, YoutubePlayer,
        wikipedia::DEFAULT_BASE_URL,
    },
    config::Config,
};
use clap::Parser;
use std::sync::Arc;
use tracing::{error, info};

/// A rule-based voice assistant. Type what you would say; lines mentioning
/// the assistant's name count as addressed to it.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Cli {
    /// Name and wake word of the assistant (overrides ASSISTANT_NAME).
    #[arg(long)]
    name: Option<String>,
}

/// Resolves on Ctrl+C. If the handler cannot be installed, never resolves.
async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("Received shutdown signal."),
        Err(e) => {
            error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // --- 1. Load Configuration ---
    let cli = Cli::parse();
    let config = Config::from_env()
        .and_then(|config| config.with_name_override(cli.name))
        .context("Failed to load configuration")?;

    // --- 2. Initialize Logging ---
    // Logs go to stderr so stdout carries only the conversation.
    tracing_subscriber::fmt()
        .with_max_level(config.log_level)
        .with_timer(tracing_subscriber::fmt::time::ChronoLocal::rfc_3339())
        .with_writer(std::io::stderr)
        .init();
    info!(assistant = %config.assistant_name, "Configuration loaded.");

    // --- 3. Build Collaborators ---
    let collaborators = Collaborators {
        speech: Arc::new(ConsoleSpeech::stdout(config.assistant_name.clone())),
        player: Arc::new(YoutubePlayer::new().context("Failed to build media player")?),
        knowledge: Arc::new(
            WikipediaLookup::new(DEFAULT_BASE_URL).context("Failed to build knowledge lookup")?,
        ),
        jokes: Arc::new(BundledJokes::new()),
        clock: Arc::new(SystemClock),
    };
    let assistant = Assistant::new(config.assistant_name.clone(), collaborators);

    // --- 4. Run Session ---
    let mut session = Session::new(
        assistant,
        Arc::new(ConsoleCapture::stdin()),
        SessionConfig::default(),
    );
    let code = match session.run(shutdown_signal()).await {
        SessionEnd::Farewell | SessionEnd::Interrupted => {
            info!("Voice assistant terminated.");
            0
        }
        SessionEnd::Failed => {
            error!("Session aborted after an unexpected failure.");
            1
        }
    };

    // Stdin is read on a blocking thread that cannot be cancelled, so exit
    // rather than wait for the runtime to join it.
    std::process::exit(code)
}
