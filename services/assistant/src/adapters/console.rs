//! Terminal stand-ins for the microphone and the speaker.
//!
//! `ConsoleCapture` treats each typed line as one recognized utterance and
//! `ConsoleSpeech` prints replies as `{name}: {text}`. Both are generic over
//! their streams so tests can drive them with in-memory buffers.

use assistant_core::collaborators::{
    Capture, CaptureError, CaptureLimits, SpeechError, SpeechOutput,
};
use async_trait::async_trait;
use tokio::io::{
    AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader, Lines, Stdin, Stdout,
};
use tokio::sync::Mutex;
use tracing::{debug, info};

pub struct ConsoleCapture<R> {
    lines: Mutex<Lines<R>>,
}

impl ConsoleCapture<BufReader<Stdin>> {
    pub fn stdin() -> Self {
        Self::new(BufReader::new(tokio::io::stdin()))
    }
}

impl<R: AsyncBufRead + Unpin> ConsoleCapture<R> {
    pub fn new(reader: R) -> Self {
        Self {
            lines: Mutex::new(reader.lines()),
        }
    }
}

#[async_trait]
impl<R> Capture for ConsoleCapture<R>
where
    R: AsyncBufRead + Unpin + Send,
{
    async fn capture(&self, limits: &CaptureLimits) -> Result<String, CaptureError> {
        let mut lines = self.lines.lock().await;
        debug!("Listening...");

        // `next_line` is cancellation safe, so a timed-out read loses nothing.
        let line = match tokio::time::timeout(limits.max_wait_for_speech, lines.next_line()).await
        {
            Err(_) => return Err(CaptureError::NoSpeech),
            Ok(Err(e)) => return Err(CaptureError::ServiceUnavailable(e.to_string())),
            Ok(Ok(None)) => {
                // Input is gone for good; wait out the speech window so the
                // session loop does not spin on a closed stream.
                tokio::time::sleep(limits.max_wait_for_speech).await;
                return Err(CaptureError::ServiceUnavailable("input closed".to_string()));
            }
            Ok(Ok(Some(line))) => line,
        };

        let text = line.trim();
        if text.is_empty() {
            return Err(CaptureError::Unintelligible);
        }
        info!("You said: {}", text);
        Ok(text.to_lowercase())
    }
}

pub struct ConsoleSpeech<W> {
    name: String,
    out: Mutex<W>,
}

impl ConsoleSpeech<Stdout> {
    pub fn stdout(name: impl Into<String>) -> Self {
        Self::new(name, tokio::io::stdout())
    }
}

impl<W: AsyncWrite + Unpin> ConsoleSpeech<W> {
    pub fn new(name: impl Into<String>, out: W) -> Self {
        Self {
            name: name.into(),
            out: Mutex::new(out),
        }
    }

    pub fn into_inner(self) -> W {
        self.out.into_inner()
    }
}

#[async_trait]
impl<W> SpeechOutput for ConsoleSpeech<W>
where
    W: AsyncWrite + Unpin + Send,
{
    async fn speak(&self, text: &str) -> Result<(), SpeechError> {
        let line = format!("{}: {}\n", self.name, text);
        let mut out = self.out.lock().await;
        out.write_all(line.as_bytes())
            .await
            .map_err(|e| SpeechError(e.to_string()))?;
        out.flush().await.map_err(|e| SpeechError(e.to_string()))
    }
}
