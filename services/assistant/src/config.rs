use tracing::Level;

/// A custom error type for configuration loading failures.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for environment variable {0}: {1}")]
    InvalidValue(String, String),
}

pub const DEFAULT_ASSISTANT_NAME: &str = "alexa";

/// Holds all configuration loaded from the environment at startup.
#[derive(Clone, Debug)]
pub struct Config {
    /// The assistant's spoken name, doubling as its wake word. Always lower-case.
    pub assistant_name: String,
    pub log_level: Level,
}

impl Config {
    /// Loads configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Only load from .env in non-test mode to avoid contamination
        if !cfg!(test) {
            dotenvy::dotenv().ok();
        }

        let assistant_name = match std::env::var("ASSISTANT_NAME") {
            Ok(raw) => parse_name("ASSISTANT_NAME", &raw)?,
            Err(_) => DEFAULT_ASSISTANT_NAME.to_string(),
        };

        let log_level_str = std::env::var("RUST_LOG").unwrap_or_else(|_| "INFO".to_string());
        let log_level = log_level_str.parse::<Level>().map_err(|_| {
            ConfigError::InvalidValue(
                "RUST_LOG".to_string(),
                format!("'{}' is not a valid log level", log_level_str),
            )
        })?;

        Ok(Self {
            assistant_name,
            log_level,
        })
    }

    /// Replaces the assistant name with one given on the command line.
    pub fn with_name_override(mut self, name: Option<String>) -> Result<Self, ConfigError> {
        if let Some(raw) = name {
            self.assistant_name = parse_name("--name", &raw)?;
        }
        Ok(self)
    }
}

fn parse_name(source: &str, raw: &str) -> Result<String, ConfigError> {
    let name = raw.trim().to_lowercase();
    if name.is_empty() {
        return Err(ConfigError::InvalidValue(
            source.to_string(),
            "assistant name must not be blank".to_string(),
        ));
    }
    Ok(name)
}
