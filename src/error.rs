use reqwest::StatusCode;
use thiserror::Error;

/// Accounts on the Platform API are limited to this many requests per day.
/// <https://developer.govee.com/reference/apply-you-govee-api-key>
pub const DAILY_REQUEST_LIMIT: u32 = 10_000;

pub type Result<T> = std::result::Result<T, GoveeApiError>;

#[derive(Error, Debug)]
pub enum GoveeApiError {
    /// The client could not be constructed, eg: missing api key
    #[error("configuration error: {0}")]
    Configuration(String),

    /// DNS, connect, TLS or timeout failure in the underlying transport.
    /// Transports other than reqwest report their own error type here.
    #[error("transport error: {0}")]
    Transport(#[source] Box<dyn std::error::Error + Send + Sync>),

    #[error("{status_line}: a valid Govee API key is required")]
    Authentication {
        status: StatusCode,
        status_line: String,
    },

    #[error("{status_line}: accounts are limited to {limit} requests a day")]
    RateLimit {
        status: StatusCode,
        status_line: String,
        limit: u32,
    },

    #[error("{status_line}: {reason}")]
    Http {
        status: StatusCode,
        status_line: String,
        reason: String,
    },

    #[error("failed to decode response: {0}")]
    Decode(String),

    #[error("invalid device: {0}")]
    InvalidDevice(String),
}

/// Formats a status the way it appears in an HTTP status line,
/// eg: `429 Too Many Requests`.
pub fn status_line(status: StatusCode) -> String {
    match status.canonical_reason() {
        Some(reason) => format!("{} {reason}", status.as_u16()),
        None => status.as_u16().to_string(),
    }
}

impl From<reqwest::Error> for GoveeApiError {
    fn from(err: reqwest::Error) -> Self {
        Self::Transport(Box::new(err))
    }
}

impl GoveeApiError {
    /// Wrap a failure to exchange a request, eg: from a custom
    /// [HttpTransport](crate::HttpTransport).
    pub fn transport<E: std::error::Error + Send + Sync + 'static>(err: E) -> Self {
        Self::Transport(Box::new(err))
    }

    fn reqwest_error(&self) -> Option<&reqwest::Error> {
        match self {
            Self::Transport(err) => err.downcast_ref::<reqwest::Error>(),
            _ => None,
        }
    }

    /// Classify a response status. Returns `None` for the 2xx range.
    pub fn from_status(status: StatusCode) -> Option<Self> {
        if status.is_success() {
            return None;
        }

        let status_line = status_line(status);
        Some(match status {
            StatusCode::UNAUTHORIZED => Self::Authentication {
                status,
                status_line,
            },
            StatusCode::TOO_MANY_REQUESTS => Self::RateLimit {
                status,
                status_line,
                limit: DAILY_REQUEST_LIMIT,
            },
            _ => Self::Http {
                status,
                status_line,
                reason: status.canonical_reason().unwrap_or("").to_string(),
            },
        })
    }

    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Self::Authentication { status, .. }
            | Self::RateLimit { status, .. }
            | Self::Http { status, .. } => Some(*status),
            Self::Transport(_) => self.reqwest_error().and_then(|err| err.status()),
            _ => None,
        }
    }

    /// Whether the same request might succeed if the caller tries again
    /// later. Nothing in this crate retries on its own.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::RateLimit { .. } => true,
            // A malformed url or header will never succeed
            Self::Transport(_) => match self.reqwest_error() {
                Some(err) => err.is_connect() || err.is_timeout() || err.is_request(),
                None => true,
            },
            Self::Http { status, .. } => status.is_server_error(),
            _ => false,
        }
    }
}
