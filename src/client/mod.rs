/*!
 * Client Module
 * Connection setup and attach/detach dispatch
 */

pub mod backoff;
pub mod config;
mod connect;
pub mod network_client;
pub mod request;

pub use backoff::{BackoffConfig, ConnectParams};
pub use config::ClientConfig;
pub use network_client::NetworkClient;
pub use request::{attach_request, detach_request};
