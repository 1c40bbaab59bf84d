use thiserror::Error;

use crate::domain::SynchronousJobInfo;

#[derive(Error, Debug)]
pub enum SyncLensError {
    #[error("API request failed (status {status}): {message}")]
    Api {
        status: u16,
        message: String,
        job_info: Option<Box<SynchronousJobInfo>>,
    },

    #[error("Unexpected API response (status {status}): {message}")]
    InvalidResponse { status: u16, message: String },

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl SyncLensError {
    /// HTTP status of the response behind this error, `None` when no
    /// response was received.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } | Self::InvalidResponse { status, .. } => Some(*status),
            Self::Network(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Job info attached to the error response, if the server sent one.
    pub fn job_info(&self) -> Option<&SynchronousJobInfo> {
        match self {
            Self::Api { job_info, .. } => job_info.as_deref(),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, SyncLensError>;
