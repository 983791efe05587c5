pub mod clock;
pub mod collaborators;
pub mod extract;
pub mod handlers;
pub mod intent;
pub mod normalizer;
pub mod session;

/// What a handler asks the session loop to do after handling an intent.
///
/// This enum decouples the handlers' decisions from the loop that actually
/// speaks and decides whether to keep listening.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    /// Speak the text and keep listening.
    Speak(String),
    /// Nothing (more) to say; keep listening.
    Silent,
    /// Speak the text and end the session.
    Farewell(String),
}

impl Reply {
    /// The text to speak, if any.
    pub fn response(&self) -> Option<&str> {
        match self {
            Reply::Speak(text) | Reply::Farewell(text) => Some(text),
            Reply::Silent => None,
        }
    }

    /// False only for a farewell.
    pub fn continue_session(&self) -> bool {
        !matches!(self, Reply::Farewell(_))
    }
}
