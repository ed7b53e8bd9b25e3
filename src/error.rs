use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    // Transport-layer failures: no HTTP response was obtained
    #[error("Network timeout while contacting: {url}")]
    NetworkTimeout { url: String },

    #[error("Connection failed to: {url} - {message}")]
    NetworkConnection { url: String, message: String },

    #[error("Transport failure for {url}: {message}")]
    Transport { url: String, message: String },

    // A response was obtained but its status is outside 200-299
    #[error("Server returned {status}: {message} (URL: {url})")]
    HttpStatus {
        status: u16,
        message: String,
        url: String,
    },

    // 2xx response whose body does not match the expected shape.
    // Carries the raw body for diagnostics.
    #[error("Failed to decode response from {url}: {message}")]
    Decode {
        url: String,
        message: String,
        body: String,
    },

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Log setup error: {0}")]
    LogSetup(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML serialization error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    #[error("TOML deserialization error: {0}")]
    TomlDeserialize(#[from] toml::de::Error),
}

impl ApiError {
    /// Create a network timeout error
    pub fn network_timeout(url: impl Into<String>) -> Self {
        Self::NetworkTimeout { url: url.into() }
    }

    /// Create a network connection error
    pub fn network_connection(url: impl Into<String>, message: impl Into<String>) -> Self {
        Self::NetworkConnection {
            url: url.into(),
            message: message.into(),
        }
    }

    /// Create a generic transport error
    pub fn transport(url: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Transport {
            url: url.into(),
            message: message.into(),
        }
    }

    /// Create an HTTP status error from a non-2xx response
    pub fn http_status(status: u16, message: impl Into<String>, url: impl Into<String>) -> Self {
        Self::HttpStatus {
            status,
            message: message.into(),
            url: url.into(),
        }
    }

    /// Create a decode error carrying the raw response body
    pub fn decode(
        url: impl Into<String>,
        message: impl Into<String>,
        body: impl Into<String>,
    ) -> Self {
        Self::Decode {
            url: url.into(),
            message: message.into(),
            body: body.into(),
        }
    }

    /// Create an invalid request error
    pub fn invalid_request(msg: impl Into<String>) -> Self {
        Self::InvalidRequest(msg.into())
    }

    /// Create a configuration error with context
    pub fn config_error(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a log setup error with context
    pub fn log_setup_error(msg: impl Into<String>) -> Self {
        Self::LogSetup(msg.into())
    }

    /// HTTP status carried by this error, if a response was obtained
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::HttpStatus { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Check if this error originated at the transport layer
    /// (no HTTP response was obtained)
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            ApiError::NetworkTimeout { .. }
                | ApiError::NetworkConnection { .. }
                | ApiError::Transport { .. }
        )
    }

    /// Check if this error is a decode mismatch over a successful response
    pub fn is_decode(&self) -> bool {
        matches!(self, ApiError::Decode { .. })
    }

    /// Whether the failure should be surfaced to the user via the alert
    /// surface. Transport and HTTP-status failures alert; decode failures
    /// are a contract mismatch, not a user-facing network problem.
    pub fn should_alert(&self) -> bool {
        self.is_transport() || matches!(self, ApiError::HttpStatus { .. })
    }

    /// Alert title for this failure, embedding the HTTP status when known
    pub fn alert_title(&self) -> String {
        match self.status() {
            Some(status) => format!("Network error ({status})"),
            None => "Network error".to_string(),
        }
    }
}

/// Maps a transport-level `reqwest` failure into the matching error kind.
///
/// Total over the failure's observable attributes: never suspends, blocks,
/// or panics. Timeouts and connection failures get their own kinds so
/// callers can tell them apart; everything else (DNS, TLS, request build,
/// body read) is a generic transport failure.
pub fn classify_transport(url: &str, error: &reqwest::Error) -> ApiError {
    if error.is_timeout() {
        ApiError::network_timeout(url)
    } else if error.is_connect() {
        ApiError::network_connection(url, error.to_string())
    } else {
        ApiError::transport(url, error.to_string())
    }
}
