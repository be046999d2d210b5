use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Configuration error: {0}")]
    ConfigLoad(#[from] config::ConfigError),

    #[error("Fetch error for {url}: {message}")]
    Fetch {
        url: String,
        status: Option<reqwest::StatusCode>,
        message: String,
    },

    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Timed out after {elapsed:?} fetching {url}")]
    Timeout { url: String, elapsed: std::time::Duration },

    #[error("Run cancelled")]
    Cancelled,

    #[error("Extraction error: {message}")]
    Extraction { message: String },

    #[error("Persistence error: {0}")]
    Persistence(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    pub fn configuration(message: impl Into<String>) -> Self {
        AppError::Configuration(message.into())
    }

    pub fn extraction(message: impl Into<String>) -> Self {
        AppError::Extraction {
            message: message.into(),
        }
    }

    /// Transient network failures worth another attempt.
    pub fn is_retryable(&self) -> bool {
        match self {
            AppError::Http(e) => {
                e.is_timeout() || e.is_connect() || e.status().is_some_and(|s| s.is_server_error())
            }
            AppError::Fetch { status, .. } => !status.is_some_and(|s| s.is_client_error()),
            AppError::Timeout { .. } => true,
            _ => false,
        }
    }

    /// Storage failures propagate to the caller instead of becoming a failed log.
    pub fn is_persistence(&self) -> bool {
        matches!(self, AppError::Persistence(_))
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
