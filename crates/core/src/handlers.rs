//! Intent Handlers
//!
//! One handler per [`IntentKind`]. Handlers call out to collaborators and turn
//! every anticipated collaborator failure into a spoken reply, so the only
//! errors that escape are ones the session cannot reason about.

use crate::Reply;
use crate::clock::{Clock, format_date, format_time};
use crate::collaborators::{JokeSource, KnowledgeBase, LookupError, MediaPlayer, SpeechOutput};
use crate::intent::{ClassifiedIntent, IntentKind};
use anyhow::{Context, Result};
use std::sync::Arc;
use tracing::{info, warn};

/// Sentences requested from the knowledge base per answer.
pub const SUMMARY_SENTENCES: usize = 2;
/// Candidates read back when a subject is ambiguous.
pub const MAX_CANDIDATES: usize = 3;

pub const PLAYBACK_FAILED: &str =
    "Sorry, I couldn't play that. Please check your internet connection.";
pub const WHO_CLARIFY: &str = "I didn't catch who you wanted to know about";
pub const WHO_NOT_FOUND: &str = "I couldn't find information about that subject";
pub const WHO_FAILED: &str = "Sorry, I encountered an error while searching";
pub const WHAT_CLARIFY: &str = "I didn't understand what you want to know about";
pub const WHAT_FAILED: &str = "I couldn't find that information";
pub const JOKE_FAILED: &str = "I'm having trouble thinking of a joke right now";
pub const GREETING: &str = "Hello there! How can I help you today?";
pub const FAREWELL: &str = "Goodbye! Have a great day!";
pub const THANKS: &str = "You're welcome! Is there anything else I can help with?";
pub const ACKNOWLEDGE: &str = "How can I help you?";
pub const NOT_UNDERSTOOD: &str =
    "I'm not sure how to help with that. Could you try another question?";

/// Everything the handlers need from the outside world.
#[derive(Clone)]
pub struct Collaborators {
    pub speech: Arc<dyn SpeechOutput>,
    pub player: Arc<dyn MediaPlayer>,
    pub knowledge: Arc<dyn KnowledgeBase>,
    pub jokes: Arc<dyn JokeSource>,
    pub clock: Arc<dyn Clock>,
}

/// The assistant persona: its name plus the collaborators it acts through.
#[derive(Clone)]
pub struct Assistant {
    name: String,
    collaborators: Collaborators,
}

impl Assistant {
    /// Creates an assistant answering to `name`.
    pub fn new(name: impl Into<String>, collaborators: Collaborators) -> Self {
        Self {
            name: name.into(),
            collaborators,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// The line spoken when a session starts.
    pub fn greeting(&self) -> String {
        format!(
            "Hello! I'm {}, your voice assistant. How can I help you?",
            self.name
        )
    }

    /// Speaks `text` through the speech-output collaborator.
    pub async fn say(&self, text: &str) -> Result<()> {
        info!(assistant = %self.name, response = %text, "Speaking");
        self.collaborators
            .speech
            .speak(text)
            .await
            .context("Speech output failed")
    }

    /// Produces the reply for a classified intent.
    pub async fn handle(&self, intent: ClassifiedIntent) -> Result<Reply> {
        let parameter = intent.parameter.as_deref().unwrap_or_default();
        let reply = match intent.kind {
            IntentKind::PlayMedia => self.play_media(parameter).await?,
            IntentKind::GetTime => Reply::Speak(format!(
                "Current time is {}",
                format_time(self.collaborators.clock.now())
            )),
            IntentKind::GetDate => Reply::Speak(format!(
                "Today is {}",
                format_date(self.collaborators.clock.now())
            )),
            IntentKind::WhoIs => self.who_is(parameter).await,
            IntentKind::WhatIs => self.what_is(parameter).await,
            IntentKind::Joke => self.joke().await,
            IntentKind::Greeting => Reply::Speak(GREETING.to_string()),
            IntentKind::IdentitySelf => {
                Reply::Speak(format!("I'm {}, your voice assistant", self.name))
            }
            IntentKind::Farewell => Reply::Farewell(FAREWELL.to_string()),
            IntentKind::Thanks => Reply::Speak(THANKS.to_string()),
            IntentKind::Acknowledge => Reply::Speak(ACKNOWLEDGE.to_string()),
            IntentKind::Unrecognized if intent.wake_word_present => {
                Reply::Speak(NOT_UNDERSTOOD.to_string())
            }
            IntentKind::Unrecognized => Reply::Silent,
        };
        Ok(reply)
    }

    /// Acknowledges first, then starts playback. The acknowledgement is spoken
    /// before the player is invoked, so only a failure produces a reply.
    async fn play_media(&self, query: &str) -> Result<Reply> {
        self.say(&format!("Playing {}", query)).await?;
        match self.collaborators.player.play(query).await {
            Ok(()) => Ok(Reply::Silent),
            Err(e) => {
                warn!(error = %e, query = %query, "Media playback failed");
                Ok(Reply::Speak(PLAYBACK_FAILED.to_string()))
            }
        }
    }

    async fn who_is(&self, subject: &str) -> Reply {
        if subject.is_empty() {
            return Reply::Speak(WHO_CLARIFY.to_string());
        }
        let result = self
            .collaborators
            .knowledge
            .lookup(subject, SUMMARY_SENTENCES)
            .await;
        match result {
            Ok(summary) => Reply::Speak(summary),
            Err(LookupError::Disambiguation(candidates)) if candidates.is_empty() => {
                warn!(subject = %subject, "Ambiguous subject without candidates");
                Reply::Speak(WHO_NOT_FOUND.to_string())
            }
            Err(LookupError::Disambiguation(candidates)) => {
                info!(subject = %subject, candidates = candidates.len(), "Ambiguous subject");
                let options = candidates
                    .iter()
                    .take(MAX_CANDIDATES)
                    .map(String::as_str)
                    .collect::<Vec<_>>()
                    .join(", ");
                Reply::Speak(format!(
                    "There are multiple results. Did you mean one of these: {}?",
                    options
                ))
            }
            Err(LookupError::NotFound) => Reply::Speak(WHO_NOT_FOUND.to_string()),
            Err(e) => {
                warn!(error = %e, subject = %subject, "Knowledge lookup failed");
                Reply::Speak(WHO_FAILED.to_string())
            }
        }
    }

    async fn what_is(&self, subject: &str) -> Reply {
        if subject.is_empty() {
            return Reply::Speak(WHAT_CLARIFY.to_string());
        }
        match self
            .collaborators
            .knowledge
            .lookup(subject, SUMMARY_SENTENCES)
            .await
        {
            Ok(summary) => Reply::Speak(summary),
            Err(e) => {
                warn!(error = %e, subject = %subject, "Knowledge lookup failed");
                Reply::Speak(WHAT_FAILED.to_string())
            }
        }
    }

    async fn joke(&self) -> Reply {
        match self.collaborators.jokes.joke().await {
            Ok(joke) => Reply::Speak(joke),
            Err(e) => {
                warn!(error = %e, "Joke source failed");
                Reply::Speak(JOKE_FAILED.to_string())
            }
        }
    }
}
