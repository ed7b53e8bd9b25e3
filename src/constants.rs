//! Crate-wide constants and protocol conventions
//!
//! This module centralizes all magic numbers and wire conventions so the
//! client, config, and tests agree on the same values.

#![allow(dead_code)]

/// Default timeout for HTTP requests in seconds
pub const DEFAULT_HTTP_TIMEOUT_SECONDS: u64 = 20;

/// Maximum number of pooled connections per host in the HTTP client
pub const MAX_CONNECTIONS_PER_HOST: usize = 3;

/// Default header values applied when the caller does not supply them
pub mod headers {
    /// Default `Accept` header value
    pub const ACCEPT_JSON: &str = "application/json";

    /// Default `Content-Type` header value
    pub const CONTENT_TYPE_JSON: &str = "application/json";
}

/// Multipart upload conventions expected by the backend
pub mod multipart {
    /// Field name for the uploaded file part
    pub const FILE_FIELD: &str = "file";

    /// Extension appended to the caller-supplied file name
    pub const FILE_EXTENSION: &str = ".jpg";

    /// Content type of the uploaded file part
    pub const FILE_MIME: &str = "image/jpg";

    /// Suffix appended to list-valued field names (`tags` becomes `tags[]`)
    pub const LIST_FIELD_SUFFIX: &str = "[]";

    /// Length of the random boundary token generated per upload
    pub const BOUNDARY_LENGTH: usize = 24;

    /// Size of each streamed body chunk; upload progress snapshots are
    /// emitted at this granularity
    pub const UPLOAD_CHUNK_BYTES: usize = 64 * 1024;
}

/// Environment variable names
pub mod env_vars {
    /// Selects the target environment (`development` or `production`)
    pub const ENVIRONMENT: &str = "CARELINK_ENV";

    /// Overrides the API base URL for the selected environment
    pub const API_URL: &str = "CARELINK_API_URL";

    /// Overrides the log file path
    pub const LOG_FILE: &str = "CARELINK_LOG_FILE";

    /// Overrides the HTTP timeout in seconds
    pub const HTTP_TIMEOUT: &str = "CARELINK_HTTP_TIMEOUT";
}
