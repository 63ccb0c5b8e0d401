/*!
 * Client Configuration
 */

use super::backoff::ConnectParams;
use crate::errors::{ConfigError, NetworkResult, ResolveError};
use crate::limits::{DEFAULT_CONNECTION_TIMEOUT, MAX_RECV_MESSAGE_SIZE};
use serde::{Deserialize, Serialize};
use serde_with::{serde_as, DurationMilliSeconds};
use std::time::Duration;

/// Network plugin client configuration
#[serde_as]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    pub endpoint: String,
    /// Budget for the whole connection attempt, backoff included
    #[serde_as(as = "DurationMilliSeconds<u64>")]
    pub connection_timeout: Duration,
    pub max_recv_message_size: usize,
    pub connect: ConnectParams,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            endpoint: String::new(),
            connection_timeout: DEFAULT_CONNECTION_TIMEOUT,
            max_recv_message_size: MAX_RECV_MESSAGE_SIZE,
            connect: ConnectParams::default(),
        }
    }
}

impl ClientConfig {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            ..Default::default()
        }
    }

    pub fn with_connection_timeout(mut self, timeout: Duration) -> Self {
        self.connection_timeout = timeout;
        self
    }

    pub fn with_max_recv_message_size(mut self, size: usize) -> Self {
        self.max_recv_message_size = size;
        self
    }

    pub fn with_connect_params(mut self, params: ConnectParams) -> Self {
        self.connect = params;
        self
    }

    /// Check everything except the endpoint format, which the resolver owns
    pub fn validate(&self) -> NetworkResult<()> {
        if self.endpoint.trim().is_empty() {
            return Err(ResolveError::EmptyEndpoint.into());
        }
        if self.connection_timeout.is_zero() {
            return Err(ConfigError::ZeroConnectionTimeout.into());
        }
        if self.max_recv_message_size == 0 {
            return Err(ConfigError::ZeroMessageSize.into());
        }
        self.connect.backoff.validate()?;
        Ok(())
    }
}
