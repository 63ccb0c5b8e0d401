/*!
 * Protocol Types
 * Generated protobuf messages and service stubs for the network plugin API
 */

// Include generated protobuf code
pub mod network_proto {
    tonic::include_proto!("podnetwork.v1");
}

pub use network_proto::network_service_client::NetworkServiceClient;
pub use network_proto::network_service_server::{NetworkService, NetworkServiceServer};
pub use network_proto::{
    AttachInterfaceRequest, AttachInterfaceResponse, DetachInterfaceRequest,
    DetachInterfaceResponse, IpConfig, Interface,
};
