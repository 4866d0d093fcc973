//! HTTP server backed by axum-server that supports bounded draining

use std::{
    convert::Infallible,
    io,
    net::SocketAddr,
    sync::atomic::{AtomicBool, Ordering},
    time::Duration,
};

use async_trait::async_trait;
use axum::Router;
use axum_server::Handle;
use tokio::time::interval;
use tracing::{debug, info};

use super::{
    handle::{ServeError, ServerHandle, ShutdownError, TlsFiles},
    tls::load_tls_config,
};
use crate::context::{Context, ContextError};

/// How often shutdown checks whether open connections have finished
const DRAIN_POLL_INTERVAL: Duration = Duration::from_millis(50);

/// An axum router bound to one address
pub struct HttpServer {
    addr: SocketAddr,
    router: Router,
    handle: Handle,
    closed: AtomicBool,
}

impl HttpServer {
    pub fn new(addr: SocketAddr, router: Router) -> Self {
        Self {
            addr,
            router,
            handle: Handle::new(),
            closed: AtomicBool::new(false),
        }
    }

    /// Wait until the listener is bound and return its address.
    ///
    /// Resolves to `None` if binding fails while this is waiting. A call first
    /// polled after a failed bind waits indefinitely.
    pub async fn local_addr(&self) -> Option<SocketAddr> {
        self.handle.listening().await
    }

    /// Number of connections currently open
    pub fn connection_count(&self) -> usize {
        self.handle.connection_count()
    }

    fn finish(&self, result: io::Result<()>) -> Result<Infallible, ServeError> {
        match result {
            Ok(()) => Err(ServeError::Closed),
            Err(source) => Err(ServeError::Listen {
                addr: self.addr,
                source,
            }),
        }
    }
}

#[async_trait]
impl ServerHandle for HttpServer {
    async fn listen_and_serve(&self) -> Result<Infallible, ServeError> {
        if self.closed.load(Ordering::SeqCst) {
            return Err(ServeError::Closed);
        }

        info!("Serving HTTP on {}", self.addr);
        let result = axum_server::bind(self.addr)
            .handle(self.handle.clone())
            .serve(self.router.clone().into_make_service())
            .await;
        self.finish(result)
    }

    async fn listen_and_serve_tls(&self, tls: &TlsFiles) -> Result<Infallible, ServeError> {
        if self.closed.load(Ordering::SeqCst) {
            return Err(ServeError::Closed);
        }

        let config = load_tls_config(&tls.cert_path, &tls.key_path)
            .await
            .map_err(ServeError::Tls)?;

        info!("Serving HTTPS on {}", self.addr);
        let result = axum_server::tls_rustls::bind_rustls(self.addr, config)
            .handle(self.handle.clone())
            .serve(self.router.clone().into_make_service())
            .await;
        self.finish(result)
    }

    async fn shutdown(&self, ctx: &Context) -> Result<(), ShutdownError> {
        self.closed.store(true, Ordering::SeqCst);
        self.handle.graceful_shutdown(ctx.remaining());

        let mut poll = interval(DRAIN_POLL_INTERVAL);
        loop {
            tokio::select! {
                _ = ctx.done() => {
                    return Err(ShutdownError::Interrupted {
                        pending: self.handle.connection_count(),
                        reason: ctx.err().unwrap_or(ContextError::Canceled),
                    });
                }
                _ = poll.tick() => {
                    let open = self.handle.connection_count();
                    if open == 0 {
                        info!("All connections drained");
                        return Ok(());
                    }
                    debug!("Waiting for {} connection(s) to finish", open);
                }
            }
        }
    }
}
