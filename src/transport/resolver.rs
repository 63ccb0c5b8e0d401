/*!
 * Endpoint Resolution
 * Maps an endpoint descriptor to a transport address and a dialer
 *
 * Accepted forms:
 * - unix:///run/netplugin.sock
 * - tcp://127.0.0.1:9000
 * - /run/netplugin.sock (no scheme, treated as unix; deprecated)
 */

use super::dialer::{Dialer, TcpDialer};
#[cfg(unix)]
use super::dialer::UnixDialer;
use super::types::{ResolvedEndpoint, TransportAddress};
use crate::errors::ResolveError;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::warn;

const UNIX_PROTOCOL: &str = "unix";
const TCP_PROTOCOL: &str = "tcp";

/// Resolves endpoint descriptors into dialable addresses
pub trait AddressResolver: Send + Sync {
    fn resolve(&self, endpoint: &str) -> Result<ResolvedEndpoint, ResolveError>;
}

/// Default resolver for unix and tcp endpoints
#[derive(Debug, Clone, Copy, Default)]
pub struct SocketResolver;

impl SocketResolver {
    pub fn new() -> Self {
        Self
    }
}

impl AddressResolver for SocketResolver {
    fn resolve(&self, endpoint: &str) -> Result<ResolvedEndpoint, ResolveError> {
        let address = parse_endpoint(endpoint)?;
        let dialer: Arc<dyn Dialer> = match &address {
            #[cfg(unix)]
            TransportAddress::Unix(_) => Arc::new(UnixDialer),
            #[cfg(not(unix))]
            TransportAddress::Unix(_) => {
                return Err(ResolveError::UnsupportedProtocol(UNIX_PROTOCOL.to_string()))
            }
            TransportAddress::Tcp(_) => Arc::new(TcpDialer),
            TransportAddress::Named(name) => {
                return Err(ResolveError::UnsupportedProtocol(name.clone()))
            }
        };
        Ok(ResolvedEndpoint::new(address, dialer))
    }
}

/// Parse an endpoint, falling back to the unix protocol when no scheme is given
pub fn parse_endpoint(endpoint: &str) -> Result<TransportAddress, ResolveError> {
    let endpoint = endpoint.trim();
    if endpoint.is_empty() {
        return Err(ResolveError::EmptyEndpoint);
    }

    let Some((scheme, rest)) = endpoint.split_once("://") else {
        warn!(
            endpoint = endpoint,
            "Endpoint without a scheme is deprecated, assuming unix://"
        );
        return Ok(TransportAddress::Unix(PathBuf::from(endpoint)));
    };

    match scheme.to_ascii_lowercase().as_str() {
        UNIX_PROTOCOL => {
            if rest.is_empty() {
                return Err(invalid(endpoint, "missing socket path"));
            }
            Ok(TransportAddress::Unix(PathBuf::from(rest)))
        }
        TCP_PROTOCOL => {
            let host_port = rest.split('/').next().unwrap_or_default();
            let Some((host, port)) = host_port.rsplit_once(':') else {
                return Err(invalid(endpoint, "expected host:port"));
            };
            if host.is_empty() {
                return Err(invalid(endpoint, "missing host"));
            }
            if port.parse::<u16>().is_err() {
                return Err(invalid(endpoint, "invalid port"));
            }
            Ok(TransportAddress::Tcp(host_port.to_string()))
        }
        "" => Err(invalid(endpoint, "missing scheme")),
        other => Err(ResolveError::UnsupportedProtocol(other.to_string())),
    }
}

fn invalid(endpoint: &str, reason: &str) -> ResolveError {
    ResolveError::InvalidEndpoint {
        endpoint: endpoint.to_string(),
        reason: reason.to_string(),
    }
}
