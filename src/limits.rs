/*!
 * Client Limits and Constants
 *
 * Connection and transport parameters used when dialing the network plugin.
 */

use std::time::Duration;

// =============================================================================
// TRANSPORT LIMITS
// =============================================================================

/// Maximum inbound message size accepted from the plugin (16MB)
pub const MAX_RECV_MESSAGE_SIZE: usize = 16 * 1024 * 1024;

/// Default overall budget for establishing the plugin connection
pub const DEFAULT_CONNECTION_TIMEOUT: Duration = Duration::from_secs(10);

// =============================================================================
// CONNECTION BACKOFF
// =============================================================================

/// Delay before the first reconnect attempt
pub const BASE_BACKOFF_DELAY: Duration = Duration::from_millis(100);

/// Upper bound on the delay between connect attempts
pub const MAX_BACKOFF_DELAY: Duration = Duration::from_secs(3);

/// Per-attempt connect deadline floor.
/// An attempt is never given less than this, even when the backoff is shorter.
pub const MIN_CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

/// Growth factor applied to the delay after each failed attempt
pub const BACKOFF_MULTIPLIER: f64 = 1.6;

/// Randomization applied to each delay, as a fraction of the delay
pub const BACKOFF_JITTER: f64 = 0.2;

/// Authority used for the HTTP/2 `:authority` when dialing a unix socket
pub const UNIX_AUTHORITY_URI: &str = "http://localhost";
