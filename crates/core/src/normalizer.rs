//! Text Normalizer
//!
//! Lower-cases a transcribed utterance and strips the assistant's wake word,
//! remembering whether the user addressed the assistant by name.

/// An utterance ready for classification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedCommand {
    /// Lower-cased text with the first wake word occurrence removed.
    pub text: String,
    /// True if the wake word appeared anywhere in the utterance.
    pub wake_word_present: bool,
}

/// Normalizes a non-empty utterance against `wake_word` (case-insensitive).
///
/// When the wake word is present its first occurrence is removed and the rest
/// is trimmed; otherwise the lower-cased text is returned untouched. A blank
/// wake word never matches.
pub fn normalize(utterance: &str, wake_word: &str) -> NormalizedCommand {
    let text = utterance.to_lowercase();
    let wake_word = wake_word.trim().to_lowercase();

    if !wake_word.is_empty() && text.contains(&wake_word) {
        NormalizedCommand {
            text: text.replacen(&wake_word, "", 1).trim().to_string(),
            wake_word_present: true,
        }
    } else {
        NormalizedCommand {
            text,
            wake_word_present: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strips_wake_word_case_insensitively() {
        let cmd = normalize("Alexa play some music", "alexa");
        assert_eq!(cmd.text, "play some music");
        assert!(cmd.wake_word_present);

        let cmd = normalize("hey ALEXA what time is it", "Alexa");
        assert_eq!(cmd.text, "hey  what time is it");
        assert!(cmd.wake_word_present);
    }

    #[test]
    fn test_without_wake_word_only_lowercases() {
        let cmd = normalize("  Tell Me A Joke ", "alexa");
        assert_eq!(cmd.text, "  tell me a joke ");
        assert!(!cmd.wake_word_present);
    }

    #[test]
    fn test_removes_only_first_occurrence() {
        let cmd = normalize("alexa who is alexa", "alexa");
        assert_eq!(cmd.text, "who is alexa");
        assert!(cmd.wake_word_present);
    }

    #[test]
    fn test_wake_word_alone_leaves_empty_command() {
        let cmd = normalize("Alexa", "alexa");
        assert_eq!(cmd.text, "");
        assert!(cmd.wake_word_present);
    }

    #[test]
    fn test_stripping_is_idempotent() {
        let once = normalize("Alexa play some music", "alexa");
        let twice = normalize(&once.text, "alexa");
        assert_eq!(once.text, twice.text);
    }

    #[test]
    fn test_blank_wake_word_never_matches() {
        let cmd = normalize("Play Jazz", "  ");
        assert_eq!(cmd.text, "play jazz");
        assert!(!cmd.wake_word_present);
    }
}
