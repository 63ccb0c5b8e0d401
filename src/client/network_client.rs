/*!
 * Network Plugin Client
 * One persistent channel to the plugin, shared by all attach/detach calls
 */

use super::config::ClientConfig;
use super::connect::connect_with_backoff;
use super::request::{attach_request, detach_request, with_context};
use crate::context::CallContext;
use crate::errors::NetworkResult;
use crate::monitoring::span_rpc;
use crate::proto::{AttachInterfaceResponse, DetachInterfaceResponse, NetworkServiceClient};
use crate::sandbox::SandboxInfo;
use crate::transport::{AddressResolver, SocketResolver, TransportAddress};
use std::time::Duration;
use tonic::transport::Channel;
use tonic::{Response, Status};
use tracing::{info, Instrument};

/// Client for the out-of-process network plugin.
///
/// Cloning is cheap and every clone multiplexes over the same channel.
/// Errors from [`attach`](Self::attach) and [`detach`](Self::detach) are the
/// plugin's (or transport's) `Status`, returned without interpretation.
#[derive(Debug, Clone)]
pub struct NetworkClient {
    client: NetworkServiceClient<Channel>,
    address: TransportAddress,
}

impl NetworkClient {
    /// Connect to `endpoint` with default parameters.
    ///
    /// `connection_timeout` bounds the whole attempt, backoff included.
    pub async fn new(endpoint: &str, connection_timeout: Duration) -> NetworkResult<Self> {
        let config = ClientConfig::new(endpoint).with_connection_timeout(connection_timeout);
        Self::with_config(config).await
    }

    pub async fn with_config(config: ClientConfig) -> NetworkResult<Self> {
        Self::with_resolver(config, &SocketResolver).await
    }

    /// Connect using a caller-supplied resolver (and thereby dialer)
    pub async fn with_resolver(
        config: ClientConfig,
        resolver: &dyn AddressResolver,
    ) -> NetworkResult<Self> {
        config.validate()?;
        let resolved = resolver.resolve(&config.endpoint)?;

        info!(
            endpoint = %config.endpoint,
            address = %resolved.address,
            timeout_ms = config.connection_timeout.as_millis() as u64,
            "Initializing network plugin client"
        );

        let channel = connect_with_backoff(
            &config.endpoint,
            &resolved,
            &config.connect,
            config.connection_timeout,
        )
        .await?;

        let client = NetworkServiceClient::new(channel)
            .max_decoding_message_size(config.max_recv_message_size);

        Ok(Self {
            client,
            address: resolved.address,
        })
    }

    /// Address the channel is connected to
    pub fn address(&self) -> &TransportAddress {
        &self.address
    }

    /// Ask the plugin to wire the sandbox's network interfaces
    pub async fn attach<S: SandboxInfo + ?Sized>(
        &self,
        ctx: &CallContext,
        sandbox: &S,
    ) -> Result<AttachInterfaceResponse, Status> {
        let span = span_rpc("AttachInterface", sandbox.id());
        let request = with_context(ctx, attach_request(sandbox));
        let mut client = self.client.clone();

        let result = ctx
            .run(async move { client.attach_interface(request).await.map(Response::into_inner) })
            .instrument(span.span().clone())
            .await;

        span.finish(&result);
        result
    }

    /// Ask the plugin to tear down the sandbox's network interfaces
    pub async fn detach<S: SandboxInfo + ?Sized>(
        &self,
        ctx: &CallContext,
        sandbox: &S,
    ) -> Result<DetachInterfaceResponse, Status> {
        let span = span_rpc("DetachInterface", sandbox.id());
        let request = with_context(ctx, detach_request(sandbox));
        let mut client = self.client.clone();

        let result = ctx
            .run(async move { client.detach_interface(request).await.map(Response::into_inner) })
            .instrument(span.span().clone())
            .await;

        span.finish(&result);
        result
    }
}
