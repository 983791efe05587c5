//! Knowledge lookup backed by the public Wikipedia REST API.
//!
//! A lookup makes two requests: an opensearch query that resolves the spoken
//! subject to a page title (and doubles as the candidate list for ambiguous
//! subjects), then the page summary for that title.

use assistant_core::collaborators::{KnowledgeBase, LookupError};
use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};
use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

pub const DEFAULT_BASE_URL: &str = "https://en.wikipedia.org/";
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);
const USER_AGENT: &str = concat!("assistant/", env!("CARGO_PKG_VERSION"));
const SEARCH_LIMIT: &str = "10";

/// The fields we use from `/api/rest_v1/page/summary/{title}`.
#[derive(Debug, Deserialize)]
struct PageSummary {
    #[serde(rename = "type")]
    kind: String,
    title: String,
    #[serde(default)]
    extract: String,
}

/// What a summary response means once the status and body are read.
#[derive(Debug, PartialEq, Eq)]
enum SummaryOutcome {
    Summary(String),
    /// A disambiguation page; carries its own title.
    Ambiguous(String),
}

pub struct WikipediaLookup {
    client: Client,
    base_url: Url,
}

impl WikipediaLookup {
    pub fn new(base_url: &str) -> anyhow::Result<Self> {
        Self::with_timeout(base_url, REQUEST_TIMEOUT)
    }

    pub fn with_timeout(base_url: &str, timeout: Duration) -> anyhow::Result<Self> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .connect_timeout(timeout)
            .build()?;
        Ok(Self {
            client,
            base_url: Url::parse(base_url)?,
        })
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url, LookupError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| LookupError::Other(format!("cannot use {} as a base", self.base_url)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn get_text(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<(StatusCode, String), LookupError> {
        let response = request.send().await.map_err(unavailable)?;
        let status = response.status();
        let body = response.text().await.map_err(unavailable)?;
        Ok((status, body))
    }

    /// Page titles matching `subject`, best match first.
    async fn search(&self, subject: &str) -> Result<Vec<String>, LookupError> {
        let url = self.endpoint(&["w", "api.php"])?;
        let request = self.client.get(url).query(&[
            ("action", "opensearch"),
            ("format", "json"),
            ("namespace", "0"),
            ("limit", SEARCH_LIMIT),
            ("search", subject),
        ]);
        let (status, body) = self.get_text(request).await?;
        if !status.is_success() {
            return Err(LookupError::Unavailable(format!("search returned HTTP {}", status)));
        }
        let body: Value =
            serde_json::from_str(&body).map_err(|e| LookupError::Other(e.to_string()))?;
        Ok(opensearch_titles(&body))
    }
}

#[async_trait]
impl KnowledgeBase for WikipediaLookup {
    async fn lookup(&self, subject: &str, max_sentences: usize) -> Result<String, LookupError> {
        let subject = subject.trim();
        let titles = self.search(subject).await?;
        let title = summary_title(subject, &titles);

        let url = self.endpoint(&["api", "rest_v1", "page", "summary", &title])?;
        debug!(%url, "Requesting page summary");
        let (status, body) = self.get_text(self.client.get(url)).await?;

        match summary_outcome(status, &body, max_sentences)? {
            SummaryOutcome::Summary(text) => Ok(text),
            SummaryOutcome::Ambiguous(page_title) => Err(LookupError::Disambiguation(
                titles.into_iter().filter(|t| *t != page_title).collect(),
            )),
        }
    }
}

/// The summary path segment: the top search hit, else the subject as spoken.
fn summary_title(subject: &str, titles: &[String]) -> String {
    titles
        .first()
        .map(String::as_str)
        .unwrap_or(subject)
        .replace(' ', "_")
}

fn unavailable(e: reqwest::Error) -> LookupError {
    LookupError::Unavailable(e.to_string())
}

/// Interprets a page summary response.
fn summary_outcome(
    status: StatusCode,
    body: &str,
    max_sentences: usize,
) -> Result<SummaryOutcome, LookupError> {
    if status == StatusCode::NOT_FOUND {
        return Err(LookupError::NotFound);
    }
    if !status.is_success() {
        return Err(LookupError::Unavailable(format!("HTTP {}", status)));
    }

    let page: PageSummary =
        serde_json::from_str(body).map_err(|e| LookupError::Other(e.to_string()))?;
    if page.kind == "disambiguation" {
        return Ok(SummaryOutcome::Ambiguous(page.title));
    }
    if page.extract.trim().is_empty() {
        return Err(LookupError::NotFound);
    }
    Ok(SummaryOutcome::Summary(first_sentences(
        &page.extract,
        max_sentences,
    )))
}

/// Keeps the first `max` sentences of `text`.
///
/// A sentence ends at `.`, `!` or `?` followed by whitespace or the end of the
/// text, so abbreviations like "3.5" stay intact.
pub fn first_sentences(text: &str, max: usize) -> String {
    let text = text.trim();
    if max == 0 {
        return String::new();
    }
    let mut seen = 0;
    let mut chars = text.char_indices().peekable();
    while let Some((i, c)) = chars.next() {
        if matches!(c, '.' | '!' | '?') {
            let at_boundary = chars.peek().is_none_or(|(_, next)| next.is_whitespace());
            if at_boundary {
                seen += 1;
                if seen == max {
                    return text[..i + c.len_utf8()].to_string();
                }
            }
        }
    }
    text.to_string()
}

/// Extracts the title list from an opensearch response:
/// `[query, [titles...], [descriptions...], [urls...]]`.
fn opensearch_titles(body: &Value) -> Vec<String> {
    body.get(1)
        .and_then(Value::as_array)
        .map(|titles| {
            titles
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::{BundledJokes, ConsoleSpeech, YoutubePlayer};
    use assistant_core::Reply;
    use assistant_core::clock::SystemClock;
    use assistant_core::handlers::{Assistant, Collaborators, WHO_FAILED};
    use assistant_core::intent::{ClassifiedIntent, IntentKind};
    use serde_json::json;
    use std::sync::Arc;

    #[test]
    fn test_first_sentences_truncates() {
        let text = "Rust is a language. It is fast! Is it safe? Yes.";
        assert_eq!(first_sentences(text, 1), "Rust is a language.");
        assert_eq!(first_sentences(text, 2), "Rust is a language. It is fast!");
        assert_eq!(first_sentences(text, 10), text);
    }

    #[test]
    fn test_first_sentences_ignores_inner_dots() {
        let text = "Python 3.12 was released in 2023. It added features.";
        assert_eq!(first_sentences(text, 1), "Python 3.12 was released in 2023.");
    }

    #[test]
    fn test_first_sentences_without_terminator() {
        assert_eq!(first_sentences("  no full stop here ", 2), "no full stop here");
        assert_eq!(first_sentences("anything.", 0), "");
    }

    #[test]
    fn test_opensearch_titles() {
        let body = json!([
            "mercury",
            ["Mercury", "Mercury (planet)", "Mercury (element)"],
            ["", "", ""],
            ["u1", "u2", "u3"]
        ]);
        assert_eq!(
            opensearch_titles(&body),
            vec!["Mercury", "Mercury (planet)", "Mercury (element)"]
        );
        assert!(opensearch_titles(&json!({"error": "bad"})).is_empty());
    }

    #[test]
    fn test_summary_title_prefers_search_hit() {
        let titles = vec!["Ada Lovelace".to_string(), "Ada (language)".to_string()];
        assert_eq!(summary_title("ada lovelace", &titles), "Ada_Lovelace");
        assert_eq!(summary_title("ada lovelace", &[]), "ada_lovelace");
    }

    #[test]
    fn test_summary_outcome_standard_page() {
        let body = json!({
            "type": "standard",
            "title": "Ada Lovelace",
            "extract": "Ada Lovelace was a mathematician. She wrote notes. She died young."
        })
        .to_string();
        assert_eq!(
            summary_outcome(StatusCode::OK, &body, 2),
            Ok(SummaryOutcome::Summary(
                "Ada Lovelace was a mathematician. She wrote notes.".into()
            ))
        );
    }

    #[test]
    fn test_summary_outcome_disambiguation_page() {
        let body = json!({
            "type": "disambiguation",
            "title": "Mercury",
            "extract": "Mercury may refer to:"
        })
        .to_string();
        assert_eq!(
            summary_outcome(StatusCode::OK, &body, 2),
            Ok(SummaryOutcome::Ambiguous("Mercury".into()))
        );
    }

    #[test]
    fn test_summary_outcome_error_statuses() {
        assert_eq!(
            summary_outcome(StatusCode::NOT_FOUND, "", 2),
            Err(LookupError::NotFound)
        );
        assert!(matches!(
            summary_outcome(StatusCode::SERVICE_UNAVAILABLE, "", 2),
            Err(LookupError::Unavailable(_))
        ));
        assert!(matches!(
            summary_outcome(StatusCode::TOO_MANY_REQUESTS, "{}", 2),
            Err(LookupError::Unavailable(_))
        ));
    }

    #[test]
    fn test_summary_outcome_blank_extract_is_not_found() {
        let missing = json!({"type": "standard", "title": "X"}).to_string();
        let blank = json!({"type": "standard", "title": "X", "extract": "   "}).to_string();
        assert_eq!(
            summary_outcome(StatusCode::OK, &missing, 2),
            Err(LookupError::NotFound)
        );
        assert_eq!(
            summary_outcome(StatusCode::OK, &blank, 2),
            Err(LookupError::NotFound)
        );
    }

    #[test]
    fn test_summary_outcome_malformed_body() {
        assert!(matches!(
            summary_outcome(StatusCode::OK, "<html>oops</html>", 2),
            Err(LookupError::Other(_))
        ));
        assert!(matches!(
            summary_outcome(StatusCode::OK, r#"{"extract": "no type"}"#, 2),
            Err(LookupError::Other(_))
        ));
    }

    #[test]
    fn test_endpoint_encodes_segments() {
        let lookup = WikipediaLookup::new(DEFAULT_BASE_URL).unwrap();
        let url = lookup
            .endpoint(&["api", "rest_v1", "page", "summary", "AC/DC"])
            .unwrap();
        assert_eq!(
            url.as_str(),
            "https://en.wikipedia.org/api/rest_v1/page/summary/AC%2FDC"
        );
    }

    /// Accepts connections and never answers them.
    async fn silent_server() -> (String, tokio::task::JoinHandle<()>) {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let base_url = format!("http://{}/", listener.local_addr().unwrap());
        let server = tokio::spawn(async move {
            let mut held = Vec::new();
            while let Ok((socket, _)) = listener.accept().await {
                held.push(socket);
            }
        });
        (base_url, server)
    }

    #[tokio::test]
    async fn test_stalled_server_times_out_as_unavailable() {
        let (base_url, server) = silent_server().await;
        let lookup = WikipediaLookup::with_timeout(&base_url, Duration::from_millis(100)).unwrap();

        let result = tokio::time::timeout(Duration::from_secs(5), lookup.lookup("ada lovelace", 2))
            .await
            .expect("request timeout should fire first");

        assert!(matches!(result, Err(LookupError::Unavailable(_))));
        server.abort();
    }

    #[tokio::test]
    async fn test_stalled_server_gives_search_apology() {
        let (base_url, server) = silent_server().await;
        let assistant = Assistant::new(
            "alexa",
            Collaborators {
                speech: Arc::new(ConsoleSpeech::new("alexa", Vec::new())),
                player: Arc::new(YoutubePlayer::new().unwrap()),
                knowledge: Arc::new(
                    WikipediaLookup::with_timeout(&base_url, Duration::from_millis(100)).unwrap(),
                ),
                jokes: Arc::new(BundledJokes::new()),
                clock: Arc::new(SystemClock),
            },
        );

        let reply = assistant
            .handle(ClassifiedIntent {
                kind: IntentKind::WhoIs,
                parameter: Some("ada lovelace".into()),
                wake_word_present: false,
            })
            .await
            .unwrap();

        assert_eq!(reply, Reply::Speak(WHO_FAILED.to_string()));
        server.abort();
    }
}
