//! Concrete collaborators for running the assistant from a terminal.
//!
//! - `console`: typed input as captured speech, printed output as speech.
//! - `wikipedia`: knowledge lookups against the Wikipedia REST API.
//! - `youtube`: plays the top YouTube result in the default browser.
//! - `jokes`: a bundled list of programmer jokes.

pub mod console;
pub mod jokes;
pub mod wikipedia;
pub mod youtube;

pub use console::{ConsoleCapture, ConsoleSpeech};
pub use jokes::BundledJokes;
pub use wikipedia::WikipediaLookup;
pub use youtube::YoutubePlayer;
