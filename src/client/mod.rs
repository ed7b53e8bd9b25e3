//! The typed HTTP client core.
//!
//! One `ApiClient` owns one shared transport session (bounded connection
//! pool, fixed timeout) and exposes the uniform request operations. Every
//! request follows the same flow: merge headers, trace the outgoing
//! request, mark the busy gauge, send, capture the response once, log the
//! raw headers and body before decoding, validate the status range, then
//! decode into the caller's expected shape.

pub mod alerts;
pub mod headers;
pub mod indicator;
pub mod multipart;
pub mod params;

use crate::config::Config;
use crate::constants::multipart::UPLOAD_CHUNK_BYTES;
use crate::error::{ApiError, classify_transport};
use alerts::AlertSink;
use bytes::Bytes;
use indicator::{BusyGauge, IndicatorSink};
use multipart::MultipartBody;
use params::Params;
use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderValue};
use reqwest::{Client, Method};
use serde::de::DeserializeOwned;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc::UnboundedSender;
use tracing::{debug, error, info};

/// How request parameters are carried on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Encoding {
    /// Flattened `key` / `key[]` pairs in the query string (GET default)
    Query,
    /// JSON object in the request body (POST/PUT/DELETE default)
    Json,
}

/// One snapshot of upload progress, emitted per streamed body chunk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UploadProgress {
    pub bytes_sent: u64,
    pub total_bytes: u64,
}

/// Typed asynchronous client for the backend API.
///
/// Explicitly constructed and passed to callers; owns the transport
/// session exclusively. Cloning is cheap and shares the session, the busy
/// gauge, and the sinks.
#[derive(Clone)]
pub struct ApiClient {
    http: Client,
    base_url: String,
    gauge: BusyGauge,
    alerts: Option<Arc<dyn AlertSink>>,
}

impl ApiClient {
    /// Builds a client from the session configuration: request timeout and
    /// per-host connection cap come from the config, the base URL from its
    /// selected environment.
    pub fn new(config: &Config) -> Result<Self, ApiError> {
        let http = Client::builder()
            .timeout(Duration::from_secs(config.http_timeout_seconds))
            .pool_max_idle_per_host(config.max_connections_per_host)
            .build()
            .map_err(|e| ApiError::config_error(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            http,
            base_url: config.base_url().trim_end_matches('/').to_string(),
            gauge: BusyGauge::new(None),
            alerts: None,
        })
    }

    /// Attaches the busy-indicator sink. Signals pair around every request
    /// and the sink only sees the 0->1 / 1->0 transitions of the request
    /// count.
    pub fn with_indicator(mut self, sink: Arc<dyn IndicatorSink>) -> Self {
        self.gauge = BusyGauge::new(Some(sink));
        self
    }

    /// Attaches the alert surface invoked for transport and HTTP-status
    /// failures.
    pub fn with_alerts(mut self, sink: Arc<dyn AlertSink>) -> Self {
        self.alerts = Some(sink);
        self
    }

    /// True while at least one request is in flight on this client
    pub fn is_busy(&self) -> bool {
        self.gauge.is_busy()
    }

    /// Fetches `path` with query-encoded parameters and decodes the
    /// response into `T`.
    pub async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        params: Option<&Params>,
        headers: Option<HeaderMap>,
    ) -> Result<T, ApiError> {
        self.request(Method::GET, path, params, headers, Encoding::Query)
            .await
    }

    /// Creates a resource with a JSON-encoded body.
    pub async fn post<T: DeserializeOwned>(
        &self,
        path: &str,
        params: Option<&Params>,
        headers: Option<HeaderMap>,
    ) -> Result<T, ApiError> {
        self.request(Method::POST, path, params, headers, Encoding::Json)
            .await
    }

    /// Updates a resource with a JSON-encoded body.
    pub async fn put<T: DeserializeOwned>(
        &self,
        path: &str,
        params: Option<&Params>,
        headers: Option<HeaderMap>,
    ) -> Result<T, ApiError> {
        self.request(Method::PUT, path, params, headers, Encoding::Json)
            .await
    }

    /// Deletes a resource with a JSON-encoded body.
    pub async fn delete<T: DeserializeOwned>(
        &self,
        path: &str,
        params: Option<&Params>,
        headers: Option<HeaderMap>,
    ) -> Result<T, ApiError> {
        self.request(Method::DELETE, path, params, headers, Encoding::Json)
            .await
    }

    /// Sends one request and decodes the 2xx response body into `T`.
    ///
    /// All verbs share this path, so status validation, logging, busy
    /// signaling, and failure alerts behave uniformly.
    pub async fn request<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        params: Option<&Params>,
        headers: Option<HeaderMap>,
        encoding: Encoding,
    ) -> Result<T, ApiError> {
        let url = self.resolve(path)?;
        let headers = headers::with_defaults(headers);
        info!(
            "Method: {method}, path: {url}, headers: {headers:?}, params: {params:?}"
        );

        let _busy = self.gauge.begin();
        let mut builder = self.http.request(method, &url).headers(headers);
        if let Some(params) = params {
            builder = match encoding {
                Encoding::Query => builder.query(&params.to_query_pairs()),
                Encoding::Json => builder.json(&params.to_json()),
            };
        }

        let body = self.execute(builder, &url).await?;
        self.decode(&url, body)
    }

    /// Uploads a file as a multipart POST, with one text part per scalar
    /// parameter, one `key[]` part per list element, and the binary `file`
    /// part (`<file_name>.jpg`, `image/jpg`) appended last.
    ///
    /// `progress` optionally receives one [`UploadProgress`] snapshot per
    /// streamed body chunk. The channel is unbounded so a slow (or absent)
    /// consumer never blocks completion of the upload itself.
    pub async fn upload<T: DeserializeOwned>(
        &self,
        path: &str,
        file_name: &str,
        file_bytes: Vec<u8>,
        params: Option<&Params>,
        headers: Option<HeaderMap>,
        progress: Option<UnboundedSender<UploadProgress>>,
    ) -> Result<T, ApiError> {
        let url = self.resolve(path)?;
        let body = MultipartBody::build(params, file_name, &file_bytes);

        let mut headers = headers::with_defaults(headers);
        let content_type = HeaderValue::from_str(&body.content_type())
            .map_err(|e| ApiError::invalid_request(format!("Invalid boundary header: {e}")))?;
        headers.insert(CONTENT_TYPE, content_type);

        info!(
            "Method: POST (upload), path: {url}, headers: {headers:?}, params: {params:?}, \
             file bytes: {}, body bytes: {}",
            file_bytes.len(),
            body.len()
        );

        let _busy = self.gauge.begin();
        let total = body.len() as u64;
        let builder = self
            .http
            .post(&url)
            .headers(headers)
            .body(progress_body(body.into_bytes(), total, progress));

        let text = self.execute(builder, &url).await?;
        self.decode(&url, text)
    }

    /// Fetches `path` and returns the raw response bytes.
    pub async fn fetch_raw(&self, path: &str) -> Result<Vec<u8>, ApiError> {
        let url = self.resolve(path)?;
        info!("Method: GET (raw), path: {url}");

        let _busy = self.gauge.begin();
        let response = match self.http.get(&url).send().await {
            Ok(response) => response,
            Err(e) => return Err(self.fail_transport(&url, &e)),
        };

        let status = response.status();
        debug!("Response status: {status}");
        if !status.is_success() {
            let reason = status.canonical_reason().unwrap_or("Unknown error");
            let failure = ApiError::http_status(status.as_u16(), reason, &url);
            error!("HTTP {} - {} (URL: {})", status.as_u16(), reason, url);
            alerts::dispatch_alert(self.alerts.as_ref(), &failure);
            return Err(failure);
        }

        match response.bytes().await {
            Ok(bytes) => {
                debug!("Raw response length: {} bytes", bytes.len());
                Ok(bytes.to_vec())
            }
            Err(e) => Err(self.fail_transport(&url, &e)),
        }
    }

    /// Resolves a request path against the configured base URL.
    fn resolve(&self, path: &str) -> Result<String, ApiError> {
        if path.is_empty() {
            return Err(ApiError::invalid_request("Request path cannot be empty"));
        }
        Ok(format!("{}/{}", self.base_url, path.trim_start_matches('/')))
    }

    /// Sends the request and returns the captured body text of a 2xx
    /// response. The body is read exactly once; raw headers and body are
    /// logged before any decode attempt so decode failures stay
    /// diagnosable from the logs.
    async fn execute(&self, builder: reqwest::RequestBuilder, url: &str) -> Result<String, ApiError> {
        let response = match builder.send().await {
            Ok(response) => response,
            Err(e) => return Err(self.fail_transport(url, &e)),
        };

        let status = response.status();
        let response_headers = response.headers().clone();
        debug!("Response status: {status}");
        debug!("Response headers: {response_headers:?}");

        let body = match response.text().await {
            Ok(text) => text,
            Err(e) => return Err(self.fail_transport(url, &e)),
        };
        debug!("Response body ({} bytes): {body}", body.len());

        if !status.is_success() {
            let status_code = status.as_u16();
            // Prefer the server-supplied error payload over the bare reason
            let message = if body.trim().is_empty() {
                status.canonical_reason().unwrap_or("Unknown error").to_string()
            } else {
                body
            };
            error!("HTTP {status_code} - {message} (URL: {url})");
            let failure = ApiError::http_status(status_code, message, url);
            alerts::dispatch_alert(self.alerts.as_ref(), &failure);
            return Err(failure);
        }

        Ok(body)
    }

    /// Decodes a captured 2xx body into the expected shape. Decode
    /// mismatches carry the raw body and never alert.
    fn decode<T: DeserializeOwned>(&self, url: &str, body: String) -> Result<T, ApiError> {
        match serde_json::from_str::<T>(&body) {
            Ok(value) => Ok(value),
            Err(e) => {
                error!("Failed to decode response from {url}: {e}");
                Err(ApiError::decode(url, e.to_string(), body))
            }
        }
    }

    /// Classifies a transport failure, logs it, and dispatches the alert.
    fn fail_transport(&self, url: &str, error: &reqwest::Error) -> ApiError {
        let classified = classify_transport(url, error);
        error!("Request failed for {url}: {classified}");
        alerts::dispatch_alert(self.alerts.as_ref(), &classified);
        classified
    }
}

/// Wraps the assembled body in a chunked stream that reports progress as
/// the transport pulls each chunk. Snapshots are emitted lazily; a dropped
/// receiver is ignored.
fn progress_body(
    bytes: Vec<u8>,
    total_bytes: u64,
    progress: Option<UnboundedSender<UploadProgress>>,
) -> reqwest::Body {
    reqwest::Body::wrap_stream(futures::stream::iter(progress_chunks(
        bytes,
        total_bytes,
        progress,
    )))
}

/// Lazy chunk iterator behind the upload body: each pulled chunk advances
/// the running byte count and emits one snapshot.
fn progress_chunks(
    bytes: Vec<u8>,
    total_bytes: u64,
    progress: Option<UnboundedSender<UploadProgress>>,
) -> impl Iterator<Item = Result<Bytes, std::io::Error>> {
    let chunks: Vec<Bytes> = bytes
        .chunks(UPLOAD_CHUNK_BYTES)
        .map(Bytes::copy_from_slice)
        .collect();

    let mut bytes_sent = 0u64;
    chunks.into_iter().map(move |chunk| {
        bytes_sent += chunk.len() as u64;
        if let Some(tx) = &progress {
            let _ = tx.send(UploadProgress {
                bytes_sent,
                total_bytes,
            });
        }
        Ok(chunk)
    })
}
