//! Configuration error types.

use std::path::PathBuf;
use thiserror::Error;

/// Configuration-related errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error when reading `{0}`")]
    Io(PathBuf, #[source] std::io::Error),

    #[error("Config file parsing error")]
    Toml(#[from] toml::de::Error),

    #[error("Config validation error: {0}")]
    Validation(String),

    /// The base URL could not be resolved from any signal and the caller
    /// does not permit a silent fallback.
    #[error(
        "Could not resolve the base URL. Set BASE_URL, add a CNAME file, or set GITHUB_REPOSITORY."
    )]
    BaseUrl,
}
