/*!
 * Channel Establishment
 * Dials the plugin with exponential backoff inside an overall deadline
 *
 * Each attempt gets max(current backoff, min_connect_timeout); after a
 * failure the next attempt starts no earlier than the backoff deadline.
 * The whole loop is abandoned once the connection timeout expires.
 */

use super::backoff::ConnectParams;
use crate::errors::{NetworkError, NetworkResult};
use crate::transport::ResolvedEndpoint;
use std::error::Error as StdError;
use std::time::Duration;
use tokio::time::{sleep_until, timeout_at, Instant};
use tonic::transport::{Channel, Endpoint, Uri};
use tracing::{debug, info};

const FAR_FUTURE: Duration = Duration::from_secs(86400 * 365 * 30);

pub(crate) async fn connect_with_backoff(
    endpoint: &str,
    resolved: &ResolvedEndpoint,
    params: &ConnectParams,
    connection_timeout: Duration,
) -> NetworkResult<Channel> {
    let channel_endpoint = Endpoint::from_shared(resolved.address.uri())
        .map_err(|source| NetworkError::Channel {
            endpoint: endpoint.to_string(),
            source,
        })?
        // Applies to reconnects the channel performs on its own later
        .connect_timeout(params.min_connect_timeout);

    // None when the timeout is too large to represent: no overall bound
    let overall_deadline = Instant::now().checked_add(connection_timeout);
    let mut attempts: u32 = 0;
    let mut last_error: Option<String> = None;

    let dial = async {
        loop {
            let attempt_start = Instant::now();
            let backoff = params.backoff.delay(attempts);
            let backoff_deadline = deadline_after(attempt_start, backoff);
            let attempt_deadline = deadline_after(attempt_start, params.attempt_timeout(backoff));
            attempts += 1;

            debug!(
                address = %resolved.address,
                attempt = attempts,
                backoff_ms = backoff.as_millis() as u64,
                "Connecting to network plugin"
            );

            let connector = dial_connector(resolved);
            match timeout_at(
                attempt_deadline,
                channel_endpoint.connect_with_connector(connector),
            )
            .await
            {
                Ok(Ok(channel)) => return channel,
                Ok(Err(e)) => last_error = Some(error_chain(&e)),
                Err(_) => {
                    last_error = Some(format!(
                        "attempt timed out after {:?}",
                        attempt_deadline - attempt_start
                    ))
                }
            }

            sleep_until(backoff_deadline).await;
        }
    };

    let outcome = match overall_deadline {
        Some(deadline) => timeout_at(deadline, dial).await.ok(),
        None => Some(dial.await),
    };
    match outcome {
        Some(channel) => {
            info!(
                address = %resolved.address,
                attempts = attempts,
                "Connected to network plugin"
            );
            Ok(channel)
        }
        None => Err(NetworkError::ConnectTimeout {
            endpoint: endpoint.to_string(),
            timeout: connection_timeout,
            attempts,
            last_error,
        }),
    }
}

/// `start + delay`, saturating at roughly thirty years out
fn deadline_after(start: Instant, delay: Duration) -> Instant {
    start
        .checked_add(delay)
        .unwrap_or_else(|| start + FAR_FUTURE)
}

/// Connector handed to the channel; every (re)connect goes through the dialer
fn dial_connector(
    resolved: &ResolvedEndpoint,
) -> impl tower::Service<
    Uri,
    Response = crate::transport::BoxedIo,
    Error = std::io::Error,
    Future = futures::future::BoxFuture<'static, std::io::Result<crate::transport::BoxedIo>>,
> + Send
       + 'static {
    let dialer = resolved.dialer.clone();
    let address = resolved.address.clone();
    tower::service_fn(move |_: Uri| dialer.dial(&address))
}

/// Flatten a transport error and its sources into one line
fn error_chain(err: &(dyn StdError + 'static)) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}
