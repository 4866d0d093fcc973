//! Serving with signal-triggered, bounded draining

use std::{path::PathBuf, sync::Arc, time::Duration};

use tokio::sync::oneshot;
use tracing::{debug, error, info, warn};

use crate::{
    context::Context,
    server::{ServeError, ServerHandle, TlsFiles},
    utils::signals::{signal_name, SignalWatcher},
};

/// Time a server is given to finish open work once a termination signal arrives
pub const SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(10);

/// Serve `server` over plain connections, draining it on SIGINT, SIGTERM or
/// SIGQUIT with [`SHUTDOWN_TIMEOUT`] to finish open work
pub async fn listen_and_serve<S: ServerHandle>(server: Arc<S>) -> Result<(), ServeError> {
    DrainingServer::new(server).run().await
}

/// Same as [`listen_and_serve`] but over TLS with the given PEM files
pub async fn listen_and_serve_tls<S: ServerHandle>(
    server: Arc<S>,
    cert_path: impl Into<PathBuf>,
    key_path: impl Into<PathBuf>,
) -> Result<(), ServeError> {
    DrainingServer::new(server)
        .tls(TlsFiles::new(cert_path, key_path))
        .run()
        .await
}

/// Runs a server until it stops, shutting it down once on the first
/// termination signal
pub struct DrainingServer<S> {
    server: Arc<S>,
    tls: Option<TlsFiles>,
    shutdown_timeout: Duration,
    signals: SignalWatcher,
}

impl<S: ServerHandle> DrainingServer<S> {
    pub fn new(server: Arc<S>) -> Self {
        Self {
            server,
            tls: None,
            shutdown_timeout: SHUTDOWN_TIMEOUT,
            signals: SignalWatcher::new(),
        }
    }

    /// Serve over TLS instead of plain connections
    pub fn tls(mut self, tls: TlsFiles) -> Self {
        self.tls = Some(tls);
        self
    }

    pub fn shutdown_timeout(mut self, timeout: Duration) -> Self {
        self.shutdown_timeout = timeout;
        self
    }

    /// Take termination signals from `signals` instead of the OS
    pub fn signals(mut self, signals: SignalWatcher) -> Self {
        self.signals = signals;
        self
    }

    /// Serve until the server stops.
    ///
    /// A requested stop ([`ServeError::Closed`]) returns `Ok` only after the
    /// shutdown sequence has finished, so the caller may exit right away. Any
    /// other error is returned as soon as serving ends. Errors from the
    /// shutdown call itself, including running out of time while draining,
    /// are logged and not returned.
    pub async fn run(self) -> Result<(), ServeError> {
        let notice = self.signals.watch().map_err(ServeError::Signals)?;
        let (drained_tx, drained_rx) = oneshot::channel::<()>();

        let server = Arc::clone(&self.server);
        let timeout = self.shutdown_timeout;
        tokio::spawn(async move {
            let Some(signal) = notice.await else {
                return;
            };
            info!(
                "Shutting down on {}, allowing {:?} to drain",
                signal_name(signal),
                timeout
            );

            // Fresh root: the serving side may already be unusable.
            let (ctx, _cancel) = Context::background().with_timeout(timeout);
            if let Err(e) = server.shutdown(&ctx).await {
                warn!("Shutdown did not complete cleanly: {}", e);
            }

            let _ = drained_tx.send(());
        });

        let served = match &self.tls {
            Some(tls) => self.server.listen_and_serve_tls(tls).await,
            None => self.server.listen_and_serve().await,
        };
        let err = match served {
            Ok(never) => match never {},
            Err(err) => err,
        };

        if !err.is_closed() {
            error!("Server error: {}", err);
            return Err(err);
        }

        debug!("Server closed, waiting for shutdown to finish");
        // Fails only when the signal source ended without a signal, in which
        // case there is no shutdown sequence to wait for.
        let _ = drained_rx.await;
        info!("Server drained");
        Ok(())
    }
}
