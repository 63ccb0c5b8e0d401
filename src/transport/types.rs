/*!
 * Transport Types
 */

use super::dialer::Dialer;
use crate::limits::UNIX_AUTHORITY_URI;
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

/// Where the plugin listens
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TransportAddress {
    /// Filesystem path of a unix domain socket
    Unix(PathBuf),
    /// `host:port` of a TCP listener
    Tcp(String),
    /// In-process or otherwise custom transport, identified by name only
    Named(String),
}

impl TransportAddress {
    /// URI handed to the HTTP/2 layer.
    ///
    /// Only the authority matters; the actual socket comes from the dialer.
    pub fn uri(&self) -> String {
        match self {
            TransportAddress::Tcp(host_port) => format!("http://{}", host_port),
            TransportAddress::Unix(_) | TransportAddress::Named(_) => UNIX_AUTHORITY_URI.to_string(),
        }
    }
}

impl fmt::Display for TransportAddress {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            TransportAddress::Unix(path) => write!(f, "unix://{}", path.display()),
            TransportAddress::Tcp(host_port) => write!(f, "tcp://{}", host_port),
            TransportAddress::Named(name) => write!(f, "{}", name),
        }
    }
}

/// Result of resolving an endpoint descriptor
#[derive(Clone)]
pub struct ResolvedEndpoint {
    pub address: TransportAddress,
    pub dialer: Arc<dyn Dialer>,
}

impl ResolvedEndpoint {
    pub fn new(address: TransportAddress, dialer: Arc<dyn Dialer>) -> Self {
        Self { address, dialer }
    }
}

impl fmt::Debug for ResolvedEndpoint {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("ResolvedEndpoint")
            .field("address", &self.address)
            .finish_non_exhaustive()
    }
}
