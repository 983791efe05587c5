use assistant_core::collaborators::{JokeError, JokeSource};
use async_trait::async_trait;
use rand::seq::IndexedRandom;

const PROGRAMMER_JOKES: &[&str] = &[
    "There are only 10 kinds of people in this world: those who know binary and those who don't.",
    "Why do programmers prefer dark mode? Because light attracts bugs.",
    "A SQL query walks into a bar, walks up to two tables and asks: can I join you?",
    "How many programmers does it take to change a light bulb? None, that's a hardware problem.",
    "Why did the developer go broke? Because he used up all his cache.",
    "I would tell you a UDP joke, but you might not get it.",
    "Debugging is like being the detective in a crime movie where you are also the murderer.",
    "Why do Java developers wear glasses? Because they don't C sharp.",
    "An optimist says the glass is half full. A programmer says the glass is twice as large as it needs to be.",
    "Knock knock. Race condition. Who's there?",
];

/// Picks jokes at random from a fixed list.
pub struct BundledJokes {
    jokes: Vec<String>,
}

impl BundledJokes {
    pub fn new() -> Self {
        Self::with_jokes(PROGRAMMER_JOKES.iter().map(|j| j.to_string()).collect())
    }

    pub fn with_jokes(jokes: Vec<String>) -> Self {
        Self { jokes }
    }

    fn pick(&self) -> Option<String> {
        self.jokes.choose(&mut rand::rng()).cloned()
    }
}

impl Default for BundledJokes {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl JokeSource for BundledJokes {
    async fn joke(&self) -> Result<String, JokeError> {
        self.pick()
            .ok_or_else(|| JokeError::Unavailable("no jokes available".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_joke_comes_from_bundle() {
        let jokes = BundledJokes::new();
        for _ in 0..20 {
            let joke = jokes.joke().await.unwrap();
            assert!(PROGRAMMER_JOKES.contains(&joke.as_str()));
        }
    }

    #[tokio::test]
    async fn test_single_joke_is_always_chosen() {
        let jokes = BundledJokes::with_jokes(vec!["only one".into()]);
        assert_eq!(jokes.joke().await.unwrap(), "only one");
    }

    #[tokio::test]
    async fn test_empty_bundle_fails() {
        let jokes = BundledJokes::with_jokes(Vec::new());
        assert!(matches!(jokes.joke().await, Err(JokeError::Unavailable(_))));
    }
}
