/*!
 * Shared fixtures: a fake network plugin and ways to reach it
 */

#![allow(dead_code)]

use futures::future::{BoxFuture, FutureExt};
use podnet::proto::{
    AttachInterfaceRequest, AttachInterfaceResponse, DetachInterfaceRequest,
    DetachInterfaceResponse, Interface, IpConfig, NetworkService, NetworkServiceServer,
};
use podnet::transport::{BoxedIo, Dialer};
use podnet::{AddressResolver, ResolveError, ResolvedEndpoint, TransportAddress};
use std::collections::HashMap;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tempfile::TempDir;
use tokio::net::UnixListener;
use tokio_stream::wrappers::UnixListenerStream;
use tonic::transport::Server;
use tonic::{Request, Response, Status};

/// In-memory plugin that records requests and echoes them back
#[derive(Clone, Default)]
pub struct FakePlugin {
    pub attached: Arc<Mutex<Vec<AttachInterfaceRequest>>>,
    pub detached: Arc<Mutex<Vec<DetachInterfaceRequest>>>,
    pub grpc_timeouts: Arc<Mutex<Vec<String>>>,
    pub delay: Option<Duration>,
    /// Bytes of padding added to the attach response's MAC field
    pub padding: usize,
}

impl FakePlugin {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn with_padding(mut self, padding: usize) -> Self {
        self.padding = padding;
        self
    }

    pub fn attached(&self) -> Vec<AttachInterfaceRequest> {
        self.attached.lock().unwrap().clone()
    }

    pub fn detached(&self) -> Vec<DetachInterfaceRequest> {
        self.detached.lock().unwrap().clone()
    }

    pub fn response_for(netns_path: &str, padding: usize) -> AttachInterfaceResponse {
        let mut mac = "02:42:0a:58:00:02".to_string();
        mac.push_str(&"0".repeat(padding));
        AttachInterfaceResponse {
            interfaces: HashMap::from([(
                "eth0".to_string(),
                Interface {
                    mac,
                    sandbox: netns_path.to_string(),
                    ip_configs: vec![IpConfig {
                        ip: "10.88.0.2/16".to_string(),
                        gateway: "10.88.0.1".to_string(),
                    }],
                },
            )]),
        }
    }
}

#[tonic::async_trait]
impl NetworkService for FakePlugin {
    async fn attach_interface(
        &self,
        request: Request<AttachInterfaceRequest>,
    ) -> Result<Response<AttachInterfaceResponse>, Status> {
        if let Some(timeout) = request.metadata().get("grpc-timeout") {
            if let Ok(value) = timeout.to_str() {
                self.grpc_timeouts.lock().unwrap().push(value.to_string());
            }
        }
        let request = request.into_inner();
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        let response = Self::response_for(&request.netns_path, self.padding);
        self.attached.lock().unwrap().push(request);
        Ok(Response::new(response))
    }

    async fn detach_interface(
        &self,
        request: Request<DetachInterfaceRequest>,
    ) -> Result<Response<DetachInterfaceResponse>, Status> {
        let request = request.into_inner();
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        let known = self
            .attached
            .lock()
            .unwrap()
            .iter()
            .any(|attached| attached.id == request.id);
        let id = request.id.clone();
        self.detached.lock().unwrap().push(request);
        if known {
            Ok(Response::new(DetachInterfaceResponse {}))
        } else {
            Err(Status::not_found(format!("sandbox {} has no interfaces", id)))
        }
    }
}

/// Serve the plugin on a unix socket at `path`
pub fn spawn_unix_server(plugin: FakePlugin, path: &Path) {
    let listener = UnixListener::bind(path).unwrap();
    tokio::spawn(
        Server::builder()
            .add_service(NetworkServiceServer::new(plugin))
            .serve_with_incoming(UnixListenerStream::new(listener)),
    );
}

/// Temporary directory plus a socket path inside it that nothing listens on yet
pub fn socket_path() -> (TempDir, PathBuf) {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("netplugin.sock");
    (dir, path)
}

pub fn unix_endpoint(path: &Path) -> String {
    format!("unix://{}", path.display())
}

/// Dialer that serves each connection from an in-process duplex pipe
pub struct DuplexDialer {
    plugin: FakePlugin,
    pub dials: Arc<AtomicUsize>,
    /// How long each dial stays pending before the pipe is handed over
    pub dial_delay: Option<Duration>,
}

impl Dialer for DuplexDialer {
    fn dial(&self, _address: &TransportAddress) -> BoxFuture<'static, io::Result<BoxedIo>> {
        self.dials.fetch_add(1, Ordering::SeqCst);
        let plugin = self.plugin.clone();
        let dial_delay = self.dial_delay;
        async move {
            if let Some(delay) = dial_delay {
                tokio::time::sleep(delay).await;
            }
            let (client, server) = tokio::io::duplex(64 * 1024);
            tokio::spawn(
                Server::builder()
                    .add_service(NetworkServiceServer::new(plugin))
                    .serve_with_incoming(tokio_stream::once(Ok::<_, io::Error>(server))),
            );
            Ok(Box::new(client) as BoxedIo)
        }
        .boxed()
    }
}

/// Resolver mapping any endpoint name onto a [`DuplexDialer`]
pub struct DuplexResolver {
    plugin: FakePlugin,
    pub dials: Arc<AtomicUsize>,
    dial_delay: Option<Duration>,
}

impl DuplexResolver {
    pub fn new(plugin: FakePlugin) -> Self {
        Self {
            plugin,
            dials: Arc::new(AtomicUsize::new(0)),
            dial_delay: None,
        }
    }

    /// Make every dial take `delay` before the connection is established
    pub fn with_dial_delay(mut self, delay: Duration) -> Self {
        self.dial_delay = Some(delay);
        self
    }
}

impl AddressResolver for DuplexResolver {
    fn resolve(&self, endpoint: &str) -> Result<ResolvedEndpoint, ResolveError> {
        let dialer = DuplexDialer {
            plugin: self.plugin.clone(),
            dials: self.dials.clone(),
            dial_delay: self.dial_delay,
        };
        Ok(ResolvedEndpoint::new(
            TransportAddress::Named(endpoint.to_string()),
            Arc::new(dialer),
        ))
    }
}
