/*!
 * Transport Module
 * Endpoint resolution and dial strategies for reaching the network plugin
 */

pub mod dialer;
pub mod resolver;
pub mod types;

pub use dialer::{BoxedIo, Dialer, PluginIo, TcpDialer};
#[cfg(unix)]
pub use dialer::UnixDialer;
pub use resolver::{AddressResolver, SocketResolver};
pub use types::{ResolvedEndpoint, TransportAddress};
