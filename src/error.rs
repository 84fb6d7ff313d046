use reqwest::StatusCode;
use thiserror::Error;
use url::ParseError;

#[derive(Debug, Error)]
pub enum FigmageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] ParseError),

    #[error("Figma API error (status: {status:?}): {message}")]
    SourceApi {
        status: Option<StatusCode>,
        message: String,
    },

    #[error("Snapshot parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl FigmageError {
    pub fn source_api(status: Option<StatusCode>, message: impl Into<String>) -> Self {
        FigmageError::SourceApi {
            status,
            message: message.into(),
        }
    }

    pub fn config(message: impl Into<String>) -> Self {
        FigmageError::Config(message.into())
    }
}

pub type Result<T> = std::result::Result<T, FigmageError>;
