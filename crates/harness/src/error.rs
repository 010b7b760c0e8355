//! Error types for the harness runtime

use thiserror::Error;

#[derive(Error, Debug)]
pub enum HarnessError {
    #[error(transparent)]
    Common(#[from] perfref_common::Error),

    #[error("Callback server failed to start: {0}")]
    ServerStartup(String),

    #[error("Browser command failed: {0}")]
    Host(String),

    #[error("Invalid page URL: {0}")]
    Url(#[from] url::ParseError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type HarnessResult<T> = Result<T, HarnessError>;
