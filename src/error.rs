use thiserror::Error;

#[derive(Error, Debug)]
pub enum ReelError {
    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML serialization error: {0}")]
    Toml(#[from] toml::ser::Error),

    #[error("Pattern error: {0}")]
    Pattern(#[from] regex::Error),

    #[error("{0}")]
    Validation(String),

    #[error("WordPress error: {0}")]
    WordPress(String),
}

impl ReelError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn wordpress(msg: impl Into<String>) -> Self {
        Self::WordPress(msg.into())
    }
}

pub type Result<T> = std::result::Result<T, ReelError>;
