//! Error types for perfref

use thiserror::Error;

/// Result type alias using perfref Error
pub type Result<T> = std::result::Result<T, Error>;

/// Fatal errors. Per-page failures are outcomes, not errors.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Failed to load manifest: syntax error on line {line}")]
    ManifestSyntax { line: usize },

    #[error("Failed to load manifest: {0}")]
    ManifestLoad(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Config parse error: {0}")]
    TomlDe(#[from] toml::de::Error),

    #[error("Config write error: {0}")]
    TomlSer(#[from] toml::ser::Error),
}
