//! Graceful shutdown - demo entry point
//!
//! `serve` runs the demo HTTP API until a termination signal drains it;
//! `countdown` ticks until its timeout or a termination signal.

use std::{net::SocketAddr, sync::Arc, time::Duration};

use anyhow::Context as _;
use tracing::info;

use graceful_shutdown::{
    api::create_router,
    config::{Command, Config, ServeArgs},
    context::Context,
    server::HttpServer,
    shutdown::{with_signal_shutdown, DrainingServer},
    tasks::countdown,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::parse();

    // Initialize tracing with appropriate log level
    tracing_subscriber::fmt()
        .with_env_filter(format!(
            "graceful_shutdown={},tower_http=info",
            config.log_level()
        ))
        .init();

    info!("Starting graceful-shutdown v{}", env!("CARGO_PKG_VERSION"));

    match config.command {
        Command::Serve(args) => serve(args).await,
        Command::Countdown { seconds } => {
            let (ctx, _cancel) = Context::background().with_timeout(Duration::from_secs(seconds));
            let ctx = with_signal_shutdown(&ctx);
            let remaining = countdown(ctx, seconds).await;
            info!("Countdown finished with {} seconds remaining", remaining);
            Ok(())
        }
    }
}

async fn serve(args: ServeArgs) -> anyhow::Result<()> {
    let addr: SocketAddr = args
        .address()
        .parse()
        .with_context(|| format!("invalid listen address {}", args.address()))?;

    info!(
        "Configuration: address={}, tls={}, shutdown_timeout={}s",
        addr,
        args.tls_files().is_some(),
        args.shutdown_timeout
    );
    info!("Endpoints:");
    info!("  GET /health     - Health check");
    info!("  GET /work?ms=N  - Hold a request open for N milliseconds");

    let server = Arc::new(HttpServer::new(addr, create_router()));
    let mut draining = DrainingServer::new(server)
        .shutdown_timeout(Duration::from_secs(args.shutdown_timeout));
    if let Some(tls) = args.tls_files() {
        draining = draining.tls(tls);
    }

    draining.run().await?;

    info!("Server shutdown complete");
    Ok(())
}
