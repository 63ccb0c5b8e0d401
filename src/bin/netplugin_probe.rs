/*!
 * Network Plugin Probe
 *
 * Connects to a network plugin the way the sandbox manager does and
 * optionally issues a single attach or detach.
 *
 * Usage:
 *   netplugin-probe <endpoint> [attach|detach <sandbox.json>]
 *
 * Environment variables:
 * - PODNET_CONNECT_TIMEOUT_MS: connection budget (default: 10000)
 * - PODNET_CALL_TIMEOUT_MS: deadline for the RPC (default: none)
 */

use std::error::Error;
use std::time::Duration;
use tracing::{error, info};

use podnet::{init_tracing, CallContext, ClientConfig, NetworkClient, Sandbox};

fn env_millis(name: &str) -> Result<Option<Duration>, Box<dyn Error>> {
    match std::env::var(name) {
        Ok(value) => Ok(Some(Duration::from_millis(value.parse()?))),
        Err(_) => Ok(None),
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    init_tracing();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let Some(endpoint) = args.first() else {
        eprintln!("usage: netplugin-probe <endpoint> [attach|detach <sandbox.json>]");
        std::process::exit(2);
    };

    let mut config = ClientConfig::new(endpoint.as_str());
    if let Some(timeout) = env_millis("PODNET_CONNECT_TIMEOUT_MS")? {
        config = config.with_connection_timeout(timeout);
    }

    let client = match NetworkClient::with_config(config).await {
        Ok(client) => client,
        Err(e) => {
            error!(error = %e, "Failed to connect to network plugin");
            return Err(e.into());
        }
    };
    info!(address = %client.address(), "Network plugin reachable");

    let (action, path) = match (args.get(1), args.get(2)) {
        (None, _) => return Ok(()),
        (Some(action), Some(path)) => (action.as_str(), path.as_str()),
        (Some(_), None) => {
            eprintln!("usage: netplugin-probe <endpoint> [attach|detach <sandbox.json>]");
            std::process::exit(2);
        }
    };

    let sandbox: Sandbox = serde_json::from_str(&std::fs::read_to_string(path)?)?;
    let ctx = match env_millis("PODNET_CALL_TIMEOUT_MS")? {
        Some(timeout) => CallContext::with_timeout(timeout),
        None => CallContext::background(),
    };

    match action {
        "attach" => {
            let response = client.attach(&ctx, &sandbox).await?;
            println!("{:#?}", response);
        }
        "detach" => {
            let response = client.detach(&ctx, &sandbox).await?;
            println!("{:#?}", response);
        }
        other => {
            eprintln!("unknown action {:?}, expected attach or detach", other);
            std::process::exit(2);
        }
    }

    Ok(())
}
