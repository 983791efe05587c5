//! Parameter Extractors
//!
//! Pull the free-text argument of an intent out of a normalized command. The
//! trigger words used here are shared with the classifier predicates, so an
//! extractor only runs on text its own predicate already accepted.

use regex::Regex;
use std::sync::LazyLock;

pub(crate) const PLAY_TRIGGER: &str = "play";

/// Priority order matters: the first phrase present is the one removed.
pub(crate) const WHAT_IS_PHRASES: [&str; 3] = ["what is", "what are", "tell me about"];

pub(crate) static WHO_IS_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"who (?:is|was|are)\b").expect("valid who-is pattern"));

/// The song or video to play: the command minus its first "play".
pub fn media_query(command: &str) -> Option<String> {
    command
        .contains(PLAY_TRIGGER)
        .then(|| command.replacen(PLAY_TRIGGER, "", 1).trim().to_string())
}

/// The person asked about in "who is/was/are <subject>".
///
/// Returns `Some("")` when the question has no subject so the handler can ask
/// for clarification. A subject must be set off from the verb by whitespace and
/// hold at least one letter or digit, so "who is?" has none.
pub fn who_subject(command: &str) -> Option<String> {
    WHO_IS_PATTERN.find(command).map(|m| {
        let rest = &command[m.end()..];
        if rest.starts_with(char::is_whitespace) && rest.chars().any(char::is_alphanumeric) {
            rest.trim().to_string()
        } else {
            String::new()
        }
    })
}

/// The topic of a "what is" style question.
pub fn what_subject(command: &str) -> Option<String> {
    WHAT_IS_PHRASES
        .iter()
        .find(|phrase| command.contains(*phrase))
        .map(|phrase| command.replacen(phrase, "", 1).trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_media_query_trims() {
        assert_eq!(media_query("play some music"), Some("some music".into()));
        assert_eq!(media_query("  play   despacito  "), Some("despacito".into()));
        assert_eq!(media_query("play"), Some("".into()));
    }

    #[test]
    fn test_media_query_removes_first_play_only() {
        assert_eq!(
            media_query("play the play that goes wrong"),
            Some("the play that goes wrong".into())
        );
        assert_eq!(media_query("stop"), None);
    }

    #[test]
    fn test_who_subject_variants() {
        assert_eq!(who_subject("who is ada lovelace"), Some("ada lovelace".into()));
        assert_eq!(who_subject("who was alan turing "), Some("alan turing".into()));
        assert_eq!(who_subject("tell me who are the beatles"), Some("the beatles".into()));
    }

    #[test]
    fn test_who_subject_empty() {
        assert_eq!(who_subject("who is"), Some("".into()));
        assert_eq!(who_subject("who is   "), Some("".into()));
        assert_eq!(who_subject("who is?"), Some("".into()));
        assert_eq!(who_subject("who was ?!"), Some("".into()));
        assert_eq!(who_subject("who is r2-d2?"), Some("r2-d2?".into()));
    }

    #[test]
    fn test_who_subject_requires_whole_verb() {
        assert_eq!(who_subject("who isabel"), None);
        assert_eq!(who_subject("whose book"), None);
    }

    #[test]
    fn test_what_subject_uses_phrase_priority() {
        assert_eq!(what_subject("what is rust"), Some("rust".into()));
        assert_eq!(what_subject("what are black holes"), Some("black holes".into()));
        assert_eq!(what_subject("tell me about mars"), Some("mars".into()));
        // "what is" wins even though "tell me about" appears first in the text.
        assert_eq!(
            what_subject("tell me about what is new"),
            Some("tell me about  new".into())
        );
    }

    #[test]
    fn test_what_subject_without_phrase() {
        assert_eq!(what_subject("what time"), None);
        assert_eq!(what_subject("what is"), Some("".into()));
    }
}
