//! `docgate serve` command.
//!
//! Loads the API key, connects every configured instance and serves
//! the HTTP gateway until Ctrl-C, then closes every connection.

use clap::Args;

use docgate_config::DocgateConfig;
use docgate_runtime::{AppContext, InstanceRegistry};
use docgate_transport_http::{ApiKeyGate, AppState, HttpServer};

use crate::{output, shared};

/// Start the HTTP gateway.
#[derive(Debug, Args)]
pub struct ServeArgs {
    /// Listen host (overrides server.host).
    #[arg(long)]
    pub host: Option<String>,
    /// Listen port (overrides server.port).
    #[arg(long)]
    pub port: Option<u16>,
}

/// Executes the serve command.
pub async fn execute(args: &ServeArgs, mut config: DocgateConfig) -> anyhow::Result<()> {
    if let Some(host) = &args.host {
        config.server.host.clone_from(host);
    }
    if let Some(port) = args.port {
        config.server.port = port;
    }

    // No API key means no service.
    let gate = ApiKeyGate::from_config(&config.auth)
        .map_err(|e| anyhow::anyhow!(output::diagnostic(&e)))?;

    tracing::info!(backend = %config.store.backend, "connecting store instances");
    let connector = shared::connector(&config.store);
    let instances = &config.instances;
    let registry = InstanceRegistry::connect_all(|ty| instances.credentials(ty), connector).await;
    let context = AppContext::new(registry);

    let server = HttpServer::new(
        AppState::new(context.clone(), gate),
        config.server.bind_addr(),
    );
    let served = server.run(shared::shutdown_signal()).await;

    if let Err(e) = context.shutdown().await {
        tracing::warn!(error = %e, "store shutdown incomplete");
    }
    served.map_err(|e| anyhow::anyhow!("server error: {e}"))?;
    Ok(())
}
