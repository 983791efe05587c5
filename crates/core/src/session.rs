//! Session Loop Controller
//!
//! Drives one conversation: greet, then repeatedly capture an utterance,
//! normalize it, classify it, hand it to the matching handler and speak the
//! reply, until the user says goodbye, the shutdown signal fires, or something
//! unexpected goes wrong.
//!
//! Each turn runs to completion before the next capture starts. The only
//! mutable state is the `running` flag, owned by [`Session`].

use crate::collaborators::{Capture, CaptureError, CaptureLimits};
use crate::handlers::Assistant;
use crate::intent::classify;
use crate::normalizer::normalize;
use anyhow::Result;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tracing::{Instrument, debug, error, info, warn};

pub const INTERRUPT_GOODBYE: &str = "Goodbye!";
pub const FATAL_APOLOGY: &str = "I encountered a problem and need to restart.";

/// Fixed timing parameters of the loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionConfig {
    pub capture: CaptureLimits,
    /// Pause after each turn, bounding how fast capture is retried.
    pub retry_delay: Duration,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            capture: CaptureLimits::default(),
            retry_delay: Duration::from_millis(500),
        }
    }
}

/// Why a session stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEnd {
    /// The user said goodbye.
    Farewell,
    /// The shutdown signal fired.
    Interrupted,
    /// An unexpected failure aborted the session.
    Failed,
}

pub struct Session {
    assistant: Assistant,
    capture: Arc<dyn Capture>,
    config: SessionConfig,
    running: bool,
}

impl Session {
    pub fn new(assistant: Assistant, capture: Arc<dyn Capture>, config: SessionConfig) -> Self {
        Self {
            assistant,
            capture,
            config,
            running: false,
        }
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Runs the session until it ends, returning the reason it ended.
    ///
    /// `shutdown` is polled while waiting for speech, while a turn is being
    /// handled and during the pause between turns. Once it resolves the
    /// session abandons the current turn, says goodbye and stops.
    pub async fn run<F>(&mut self, shutdown: F) -> SessionEnd
    where
        F: Future<Output = ()>,
    {
        let span = tracing::info_span!("assistant_session", assistant = %self.assistant.name());
        self.drive(shutdown).instrument(span).await
    }

    async fn drive<F>(&mut self, shutdown: F) -> SessionEnd
    where
        F: Future<Output = ()>,
    {
        tokio::pin!(shutdown);
        self.running = true;
        info!("Session started.");

        let greeting = self.assistant.greeting();
        if let Err(e) = self.assistant.say(&greeting).await {
            return self.fail(e).await;
        }

        while self.running {
            let captured = tokio::select! {
                biased;
                _ = &mut shutdown => return self.interrupt().await,
                captured = self.capture.capture(&self.config.capture) => captured,
            };

            // A handler can wait on the network; the signal still wins.
            let handled = tokio::select! {
                biased;
                _ = &mut shutdown => None,
                handled = self.turn(captured) => Some(handled),
            };
            match handled {
                None => return self.interrupt().await,
                Some(Err(e)) => return self.fail(e).await,
                Some(Ok(())) => {}
            }

            if self.running {
                tokio::select! {
                    biased;
                    _ = &mut shutdown => return self.interrupt().await,
                    _ = tokio::time::sleep(self.config.retry_delay) => {}
                }
            }
        }

        info!("Session ended by farewell.");
        SessionEnd::Farewell
    }

    /// Processes one capture result. Capture failures are a no-op turn.
    async fn turn(&mut self, captured: Result<String, CaptureError>) -> Result<()> {
        let utterance = match captured {
            Ok(text) if text.trim().is_empty() => {
                debug!("Capture returned empty text.");
                return Ok(());
            }
            Ok(text) => text,
            Err(CaptureError::NoSpeech) => {
                debug!("No speech detected within timeout period.");
                return Ok(());
            }
            Err(CaptureError::Unintelligible) => {
                info!("Could not understand audio.");
                return Ok(());
            }
            Err(CaptureError::ServiceUnavailable(reason)) => {
                warn!(%reason, "Speech recognition service unavailable.");
                return Ok(());
            }
        };

        let command = normalize(&utterance, self.assistant.name());
        let intent = classify(&command)?;
        info!(
            heard = %utterance,
            intent = %intent.kind,
            parameter = ?intent.parameter,
            wake_word = command.wake_word_present,
            "Command classified."
        );

        let reply = self.assistant.handle(intent).await?;
        if let Some(response) = reply.response() {
            self.assistant.say(response).await?;
        }
        self.running = reply.continue_session();
        Ok(())
    }

    async fn interrupt(&mut self) -> SessionEnd {
        info!("Shutdown signal received.");
        self.running = false;
        if let Err(e) = self.assistant.say(INTERRUPT_GOODBYE).await {
            warn!(error = ?e, "Could not say goodbye.");
        }
        SessionEnd::Interrupted
    }

    async fn fail(&mut self, err: anyhow::Error) -> SessionEnd {
        error!(error = ?err, "Unexpected failure, terminating session.");
        self.running = false;
        if let Err(e) = self.assistant.say(FATAL_APOLOGY).await {
            warn!(error = ?e, "Could not deliver final apology.");
        }
        SessionEnd::Failed
    }
}
