//! External Collaborator Contracts
//!
//! The interpreter never touches a microphone, a speaker, a browser or the
//! network itself. Everything with a side effect sits behind one of the narrow
//! traits in this module, so the session loop can be driven by real adapters in
//! the service crate or by mocks in tests.
//!
//! Every failure mode a handler is expected to react to is spelled out as an
//! explicit error variant rather than a catch-all.

use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;

/// Bounds handed to the capture collaborator for a single utterance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CaptureLimits {
    /// How long to wait for speech to start before giving up with `NoSpeech`.
    pub max_wait_for_speech: Duration,
    /// Maximum duration of one captured phrase.
    pub max_phrase_duration: Duration,
    /// Time spent sampling background noise before listening.
    pub ambient_calibration: Duration,
}

impl Default for CaptureLimits {
    fn default() -> Self {
        Self {
            max_wait_for_speech: Duration::from_secs(5),
            max_phrase_duration: Duration::from_secs(5),
            ambient_calibration: Duration::from_millis(500),
        }
    }
}

/// Why a capture produced no text. None of these are fatal to a session.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CaptureError {
    #[error("no speech detected within timeout period")]
    NoSpeech,
    #[error("could not understand audio")]
    Unintelligible,
    #[error("recognition service unavailable: {0}")]
    ServiceUnavailable(String),
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("speech output failed: {0}")]
pub struct SpeechError(pub String);

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PlaybackError {
    #[error("playback service unavailable: {0}")]
    Unavailable(String),
    #[error("playback failed: {0}")]
    Other(String),
}

/// Failure modes of a knowledge lookup.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LookupError {
    /// The subject maps to several topics; candidates are in relevance order.
    #[error("ambiguous subject, {} candidates", .0.len())]
    Disambiguation(Vec<String>),
    #[error("no page found for subject")]
    NotFound,
    #[error("knowledge service unavailable: {0}")]
    Unavailable(String),
    #[error("lookup failed: {0}")]
    Other(String),
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum JokeError {
    #[error("joke source unavailable: {0}")]
    Unavailable(String),
}

/// Turns the user's speech into text, one utterance per call.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Capture: Send + Sync {
    async fn capture(&self, limits: &CaptureLimits) -> Result<String, CaptureError>;
}

/// Speaks a response aloud. Resolves once the text has been spoken.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SpeechOutput: Send + Sync {
    async fn speak(&self, text: &str) -> Result<(), SpeechError>;
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MediaPlayer: Send + Sync {
    /// Starts playback of the best match for `query` on the video platform.
    async fn play(&self, query: &str) -> Result<(), PlaybackError>;
}

/// Looks up a short encyclopedic summary of a subject.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait KnowledgeBase: Send + Sync {
    /// Returns at most `max_sentences` sentences describing `subject`.
    async fn lookup(&self, subject: &str, max_sentences: usize) -> Result<String, LookupError>;
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait JokeSource: Send + Sync {
    async fn joke(&self) -> Result<String, JokeError>;
}
