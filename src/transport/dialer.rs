/*!
 * Dialers
 * Strategies that open the raw byte stream the gRPC channel runs over
 */

use super::types::TransportAddress;
use futures::future::{BoxFuture, FutureExt};
use std::io;
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::net::TcpStream;
use tracing::debug;

/// Byte stream usable as an HTTP/2 connection
pub trait PluginIo: AsyncRead + AsyncWrite + Send + Unpin + 'static {}

impl<T> PluginIo for T where T: AsyncRead + AsyncWrite + Send + Unpin + 'static {}

/// Type-erased connection returned by a [`Dialer`]
pub type BoxedIo = Box<dyn PluginIo>;

/// Opens connections to a resolved transport address.
///
/// Invoked once for the initial connection and again by the channel
/// whenever it reconnects.
pub trait Dialer: Send + Sync {
    fn dial(&self, address: &TransportAddress) -> BoxFuture<'static, io::Result<BoxedIo>>;
}

fn unsupported(dialer: &str, address: &TransportAddress) -> io::Error {
    io::Error::new(
        io::ErrorKind::InvalidInput,
        format!("{} dialer cannot reach {}", dialer, address),
    )
}

/// Dials unix domain sockets
#[cfg(unix)]
#[derive(Debug, Clone, Copy, Default)]
pub struct UnixDialer;

#[cfg(unix)]
impl Dialer for UnixDialer {
    fn dial(&self, address: &TransportAddress) -> BoxFuture<'static, io::Result<BoxedIo>> {
        let address = address.clone();
        async move {
            match &address {
                TransportAddress::Unix(path) => {
                    debug!(path = %path.display(), "Dialing unix socket");
                    let stream = tokio::net::UnixStream::connect(path).await?;
                    Ok(Box::new(stream) as BoxedIo)
                }
                other => Err(unsupported("unix", other)),
            }
        }
        .boxed()
    }
}

/// Dials TCP listeners with Nagle disabled
#[derive(Debug, Clone, Copy, Default)]
pub struct TcpDialer;

impl Dialer for TcpDialer {
    fn dial(&self, address: &TransportAddress) -> BoxFuture<'static, io::Result<BoxedIo>> {
        let address = address.clone();
        async move {
            match &address {
                TransportAddress::Tcp(host_port) => {
                    debug!(addr = %host_port, "Dialing tcp");
                    let stream = TcpStream::connect(host_port.as_str()).await?;
                    stream.set_nodelay(true)?;
                    Ok(Box::new(stream) as BoxedIo)
                }
                other => Err(unsupported("tcp", other)),
            }
        }
        .boxed()
    }
}
