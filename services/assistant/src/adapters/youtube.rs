//! Media playback: open the top YouTube search result in the default browser.

use assistant_core::collaborators::{MediaPlayer, PlaybackError};
use async_trait::async_trait;
use regex::Regex;
use reqwest::{Client, Url};
use std::process::ExitStatus;
use std::sync::LazyLock;
use std::time::Duration;
use tokio::process::Command;
use tracing::{debug, info};

const SEARCH_URL: &str = "https://www.youtube.com/results";
const WATCH_URL: &str = "https://www.youtube.com/watch";
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

static VIDEO_ID: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#""videoId"\s*:\s*"([A-Za-z0-9_-]{11})""#).expect("valid video id pattern")
});

pub struct YoutubePlayer {
    client: Client,
}

impl YoutubePlayer {
    pub fn new() -> anyhow::Result<Self> {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .connect_timeout(REQUEST_TIMEOUT)
            .build()?;
        Ok(Self { client })
    }

    async fn first_video(&self, query: &str) -> Result<String, PlaybackError> {
        let url = search_url(query)?;
        let page = self
            .client
            .get(url)
            .send()
            .await
            .and_then(|response| response.error_for_status())
            .map_err(|e| PlaybackError::Unavailable(e.to_string()))?
            .text()
            .await
            .map_err(|e| PlaybackError::Unavailable(e.to_string()))?;
        first_video_id(&page)
            .map(str::to_string)
            .ok_or_else(|| PlaybackError::Other(format!("no video found for '{}'", query)))
    }
}

#[async_trait]
impl MediaPlayer for YoutubePlayer {
    async fn play(&self, query: &str) -> Result<(), PlaybackError> {
        let video_id = self.first_video(query).await?;
        let url = watch_url(&video_id)?;
        info!(%query, %url, "Opening video");
        open_in_browser(url.as_str()).await
    }
}

pub fn search_url(query: &str) -> Result<Url, PlaybackError> {
    Url::parse_with_params(SEARCH_URL, &[("search_query", query)])
        .map_err(|e| PlaybackError::Other(e.to_string()))
}

fn watch_url(video_id: &str) -> Result<Url, PlaybackError> {
    Url::parse_with_params(WATCH_URL, &[("v", video_id)])
        .map_err(|e| PlaybackError::Other(e.to_string()))
}

/// The first video id embedded in a search results page.
pub fn first_video_id(page: &str) -> Option<&str> {
    VIDEO_ID
        .captures(page)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

fn opener(url: &str) -> Command {
    let mut command = if cfg!(target_os = "macos") {
        Command::new("open")
    } else if cfg!(target_os = "windows") {
        let mut command = Command::new("cmd");
        command.args(["/C", "start", ""]);
        command
    } else {
        Command::new("xdg-open")
    };
    command.arg(url);
    command
}

async fn open_in_browser(url: &str) -> Result<(), PlaybackError> {
    let status = opener(url)
        .status()
        .await
        .map_err(|e| PlaybackError::Other(format!("could not launch browser: {}", e)))?;
    debug!(?status, "Browser opener exited");
    opener_outcome(status)
}

fn opener_outcome(status: ExitStatus) -> Result<(), PlaybackError> {
    if status.success() {
        Ok(())
    } else {
        Err(PlaybackError::Other(format!("browser opener exited with {}", status)))
    }
}
