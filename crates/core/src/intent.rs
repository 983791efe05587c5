//! Intent Classifier
//!
//! Classification walks a fixed, ordered table of rules and stops at the first
//! rule whose predicate accepts the command. Precedence therefore lives in the
//! order of [`RULES`], not in control flow, and the table can be inspected and
//! tested on its own.

use crate::extract::{self, PLAY_TRIGGER, WHAT_IS_PHRASES, WHO_IS_PATTERN};
use crate::normalizer::NormalizedCommand;
use std::fmt;
use thiserror::Error;

/// The closed set of things a user can ask for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IntentKind {
    PlayMedia,
    GetTime,
    GetDate,
    WhoIs,
    WhatIs,
    Joke,
    Greeting,
    IdentitySelf,
    Farewell,
    Thanks,
    /// The wake word was spoken but nothing else matched.
    Acknowledge,
    Unrecognized,
}

impl fmt::Display for IntentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            IntentKind::PlayMedia => "play_media",
            IntentKind::GetTime => "get_time",
            IntentKind::GetDate => "get_date",
            IntentKind::WhoIs => "who_is",
            IntentKind::WhatIs => "what_is",
            IntentKind::Joke => "joke",
            IntentKind::Greeting => "greeting",
            IntentKind::IdentitySelf => "identity_self",
            IntentKind::Farewell => "farewell",
            IntentKind::Thanks => "thanks",
            IntentKind::Acknowledge => "acknowledge",
            IntentKind::Unrecognized => "unrecognized",
        };
        write!(f, "{}", name)
    }
}

/// The outcome of classifying one command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassifiedIntent {
    pub kind: IntentKind,
    /// Extracted argument, for intents that take one.
    pub parameter: Option<String>,
    /// Carried over from the normalized command; decides whether an
    /// unrecognized command gets a reply.
    pub wake_word_present: bool,
}

/// One entry of the ordered rule table.
pub struct IntentRule {
    pub kind: IntentKind,
    pub predicate: fn(&str) -> bool,
    pub extractor: Option<fn(&str) -> Option<String>>,
}

impl fmt::Debug for IntentRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IntentRule")
            .field("kind", &self.kind)
            .field("has_extractor", &self.extractor.is_some())
            .finish()
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ClassifyError {
    /// A rule accepted the command but its extractor found nothing to extract.
    #[error("rule '{kind}' matched but extracted no parameter from {command:?}")]
    MissingParameter { kind: IntentKind, command: String },
}

fn contains_any(command: &str, needles: &[&str]) -> bool {
    needles.iter().any(|needle| command.contains(needle))
}

/// The authoritative rule order. Earlier rules win.
pub static RULES: &[IntentRule] = &[
    IntentRule {
        kind: IntentKind::PlayMedia,
        predicate: |c| c.contains(PLAY_TRIGGER),
        extractor: Some(extract::media_query),
    },
    IntentRule {
        kind: IntentKind::GetTime,
        predicate: |c| c.contains("time"),
        extractor: None,
    },
    IntentRule {
        kind: IntentKind::GetDate,
        predicate: |c| contains_any(c, &["date", "today"]),
        extractor: None,
    },
    IntentRule {
        kind: IntentKind::WhoIs,
        predicate: |c| WHO_IS_PATTERN.is_match(c),
        extractor: Some(extract::who_subject),
    },
    IntentRule {
        kind: IntentKind::WhatIs,
        predicate: |c| contains_any(c, &WHAT_IS_PHRASES),
        extractor: Some(extract::what_subject),
    },
    IntentRule {
        kind: IntentKind::Joke,
        predicate: |c| c.contains("joke"),
        extractor: None,
    },
    IntentRule {
        kind: IntentKind::Greeting,
        predicate: |c| contains_any(c, &["hello", "hi"]),
        extractor: None,
    },
    IntentRule {
        kind: IntentKind::IdentitySelf,
        predicate: |c| contains_any(c, &["your name", "who are you"]),
        extractor: None,
    },
    IntentRule {
        kind: IntentKind::Farewell,
        predicate: |c| contains_any(c, &["exit", "stop", "goodbye", "bye"]),
        extractor: None,
    },
    IntentRule {
        kind: IntentKind::Thanks,
        predicate: |c| contains_any(c, &["thank you", "thanks"]),
        extractor: None,
    },
];

/// Classifies `command` against the built-in rule table.
pub fn classify(command: &NormalizedCommand) -> Result<ClassifiedIntent, ClassifyError> {
    classify_with(RULES, command)
}

/// Classifies `command` against an arbitrary ordered rule table.
///
/// With no matching rule the result is `Acknowledge` if the wake word was
/// spoken and `Unrecognized` otherwise.
pub fn classify_with(
    rules: &[IntentRule],
    command: &NormalizedCommand,
) -> Result<ClassifiedIntent, ClassifyError> {
    let text = command.text.as_str();
    let wake_word_present = command.wake_word_present;

    let Some(rule) = rules.iter().find(|rule| (rule.predicate)(text)) else {
        let kind = if wake_word_present {
            IntentKind::Acknowledge
        } else {
            IntentKind::Unrecognized
        };
        return Ok(ClassifiedIntent {
            kind,
            parameter: None,
            wake_word_present,
        });
    };

    let parameter = match rule.extractor {
        Some(extractor) => {
            Some(
                extractor(text).ok_or_else(|| ClassifyError::MissingParameter {
                    kind: rule.kind,
                    command: text.to_string(),
                })?,
            )
        }
        None => None,
    };

    Ok(ClassifiedIntent {
        kind: rule.kind,
        parameter,
        wake_word_present,
    })
}
