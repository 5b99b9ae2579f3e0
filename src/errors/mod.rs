//! Unified error handling module
use serde_json::Value;
use thiserror::Error;

/// A string that matches none of the recognised date/date-time layouts
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("not a date or datetime string: {input:?}")]
pub struct ParseError {
    pub input: String,
}

impl ParseError {
    pub fn new(input: &str) -> Self {
        Self {
            input: input.to_string(),
        }
    }
}

#[derive(Debug, Error)]
pub enum ApiError {
    /// Connection, DNS or timeout failure. Never retried.
    #[error("transport error calling {url}: {source}")]
    Transport {
        url: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Non-2xx response, after retries for the transient statuses.
    #[error("HTTP {status} from {url}")]
    HttpStatus {
        status: u16,
        url: String,
        body: String,
    },

    /// The payload itself reports a failure or lacks the expected shape.
    #[error("API error: {message}")]
    Api { message: String, payload: Value },

    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error("invalid argument: {0}")]
    Validation(String),
}

impl ApiError {
    pub(crate) fn api(message: impl Into<String>, payload: Value) -> Self {
        ApiError::Api {
            message: message.into(),
            payload,
        }
    }

    pub(crate) fn validation(message: impl Into<String>) -> Self {
        ApiError::Validation(message.into())
    }

    /// HTTP status code carried by the error, if any
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::HttpStatus { status, .. } => Some(*status),
            ApiError::Transport { source, .. } => source
                .downcast_ref::<reqwest::Error>()
                .and_then(|e| e.status())
                .map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Raw payload attached to an API-level error
    pub fn payload(&self) -> Option<&Value> {
        match self {
            ApiError::Api { payload, .. } => Some(payload),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        let url = err.url().map(|u| u.to_string()).unwrap_or_default();
        ApiError::Transport {
            url,
            source: Box::new(err),
        }
    }
}

/// Type alias for API results
pub type ApiResult<T> = Result<T, ApiError>;
