/*!
 * Pod Network Plugin Client
 * Delegates sandbox network attach/detach to an out-of-process plugin over gRPC
 */

pub mod client;
pub mod context;
pub mod errors;
pub mod limits;
pub mod monitoring;
pub mod proto;
pub mod sandbox;
pub mod transport;

// Re-exports
pub use client::{BackoffConfig, ClientConfig, ConnectParams, NetworkClient};
pub use context::CallContext;
pub use errors::*;
pub use monitoring::init_tracing;
pub use proto::{
    AttachInterfaceRequest, AttachInterfaceResponse, DetachInterfaceRequest,
    DetachInterfaceResponse,
};
pub use sandbox::{NetNs, Sandbox, SandboxConfig, SandboxInfo, SandboxMetadata};
pub use transport::{AddressResolver, Dialer, ResolvedEndpoint, SocketResolver, TransportAddress};
