/*!
 * Error Types
 * Construction-time errors with thiserror and miette diagnostics
 *
 * Call-time failures are not represented here: attach/detach return the
 * plugin's `tonic::Status` untouched.
 */

use miette::Diagnostic;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

/// Result type for client construction
pub type NetworkResult<T> = Result<T, NetworkError>;

/// Endpoint resolution errors
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Diagnostic)]
#[serde(tag = "error_type", content = "details", rename_all = "snake_case")]
pub enum ResolveError {
    #[error("Endpoint is empty")]
    #[diagnostic(
        code(resolve::empty_endpoint),
        help("Configure the plugin endpoint, e.g. unix:///run/netplugin.sock")
    )]
    EmptyEndpoint,

    #[error("Invalid endpoint {endpoint}: {reason}")]
    #[diagnostic(
        code(resolve::invalid_endpoint),
        help("Use unix:///path/to/socket or tcp://host:port")
    )]
    InvalidEndpoint { endpoint: String, reason: String },

    #[error("Protocol {0:?} not supported")]
    #[diagnostic(
        code(resolve::unsupported_protocol),
        help("Only the unix and tcp schemes are understood")
    )]
    UnsupportedProtocol(String),
}

/// Configuration validation errors
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Diagnostic)]
#[serde(tag = "error_type", content = "details", rename_all = "snake_case")]
pub enum ConfigError {
    #[error("Connection timeout must be positive")]
    #[diagnostic(code(config::zero_timeout))]
    ZeroConnectionTimeout,

    #[error("Maximum receive message size must be positive")]
    #[diagnostic(code(config::zero_message_size))]
    ZeroMessageSize,

    #[error("Invalid backoff: {0}")]
    #[diagnostic(
        code(config::invalid_backoff),
        help("Require base_delay <= max_delay, multiplier >= 1.0 and jitter within [0, 1]")
    )]
    InvalidBackoff(String),
}

/// Unified client construction error
#[derive(Error, Debug, Diagnostic)]
pub enum NetworkError {
    #[error("Resolve error: {0}")]
    #[diagnostic(transparent)]
    Resolve(#[from] ResolveError),

    #[error("Config error: {0}")]
    #[diagnostic(transparent)]
    InvalidConfig(#[from] ConfigError),

    #[error("Failed to build channel for {endpoint}: {source}")]
    #[diagnostic(code(network::channel))]
    Channel {
        endpoint: String,
        #[source]
        source: tonic::transport::Error,
    },

    #[error(
        "Timed out connecting to {endpoint} after {timeout:?} ({attempts} attempts){}",
        last_error_suffix(.last_error)
    )]
    #[diagnostic(
        code(network::connect_timeout),
        help("Check that the network plugin is running and listening on the endpoint")
    )]
    ConnectTimeout {
        endpoint: String,
        timeout: Duration,
        attempts: u32,
        last_error: Option<String>,
    },
}

fn last_error_suffix(last_error: &Option<String>) -> String {
    match last_error {
        Some(e) => format!(", last error: {}", e),
        None => String::new(),
    }
}

impl NetworkError {
    /// Whether the failure happened before any dial was attempted
    pub fn is_resolution(&self) -> bool {
        matches!(self, NetworkError::Resolve(_))
    }

    /// Whether the plugin could not be reached within the connection budget
    pub fn is_connect(&self) -> bool {
        matches!(self, NetworkError::ConnectTimeout { .. })
    }
}
