//! Typed asynchronous HTTP client core for the CareLink mobile backend.
//!
//! This library provides the network layer the app talks to its backend
//! through: uniform typed request operations (GET/POST/PUT/DELETE,
//! multipart upload, raw fetch), centralized session configuration,
//! request/response logging, busy-indicator lifecycle signaling, failure
//! alerts, and live network-reachability tracking.
//!
//! # Examples
//!
//! ```rust,no_run
//! use carelink_net::client::ApiClient;
//! use carelink_net::client::params::Params;
//! use carelink_net::config::Config;
//! use carelink_net::error::ApiError;
//! use serde::Deserialize;
//!
//! #[derive(Deserialize)]
//! struct Profile {
//!     id: i64,
//!     name: String,
//! }
//!
//! #[tokio::main]
//! async fn main() -> Result<(), ApiError> {
//!     let config = Config::load().await?;
//!     let client = ApiClient::new(&config)?;
//!
//!     let params = Params::new().with("fields", vec!["id", "name"]);
//!     let profile: Profile = client.get("/v1/profile", Some(&params), None).await?;
//!     println!("{} ({})", profile.name, profile.id);
//!
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod config;
pub mod constants;
pub mod error;
pub mod logging;
pub mod reachability;

// Re-export commonly used types for convenience
pub use client::alerts::AlertSink;
pub use client::indicator::IndicatorSink;
pub use client::params::{ParamValue, Params, Scalar};
pub use client::{ApiClient, Encoding, UploadProgress};
pub use config::{Config, Environment};
pub use error::ApiError;
pub use reachability::{ReachabilityMonitor, ReachabilityStatus};

/// Current version of the library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");
