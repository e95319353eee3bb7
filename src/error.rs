use std::time::Duration;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("package name must be specified")]
    MissingPackageName,

    #[error("credentials must be specified")]
    MissingCredentials,

    #[error("output-style must be one of {}, got {style:?}", .allowed.join(", "))]
    UnknownOutputStyle {
        style: String,
        allowed: &'static [&'static str],
    },

    #[error("invalid credentials: {0}")]
    Credentials(String),

    #[error("authentication failed: {0}")]
    Auth(String),

    #[error("request failed {status}: {body}")]
    Api {
        status: reqwest::StatusCode,
        body: String,
    },

    #[error("unexpected response: {0}")]
    Decode(serde_json::Error),

    #[error("invalid url: {0}")]
    InvalidUrl(String),

    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("timed out after {0:?}")]
    Timeout(Duration),

    #[error("failed to write output: {0}")]
    Serialization(#[from] serde_json::Error),
}
