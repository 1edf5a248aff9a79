use thiserror::Error;

/// Errors that can occur while loading or validating a menu catalog.
#[derive(Debug, Error)]
pub enum MenuError {
    #[error("failed to read menu file: {0}")]
    FileRead(#[from] std::io::Error),

    #[error("failed to parse menu file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid menu: {0}")]
    Invalid(String),
}
