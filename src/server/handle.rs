//! The contract a server must meet to be drained on shutdown

use std::{convert::Infallible, io, net::SocketAddr, path::PathBuf};

use async_trait::async_trait;
use thiserror::Error;

use crate::context::{Context, ContextError};

/// Certificate and private key files (PEM) for serving over TLS
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TlsFiles {
    pub cert_path: PathBuf,
    pub key_path: PathBuf,
}

impl TlsFiles {
    pub fn new(cert_path: impl Into<PathBuf>, key_path: impl Into<PathBuf>) -> Self {
        Self {
            cert_path: cert_path.into(),
            key_path: key_path.into(),
        }
    }
}

/// Why a server stopped serving
#[derive(Debug, Error)]
pub enum ServeError {
    /// Shutdown was requested. Not a failure.
    #[error("server closed")]
    Closed,
    #[error("listener on {addr} failed: {source}")]
    Listen {
        addr: SocketAddr,
        #[source]
        source: io::Error,
    },
    #[error("failed to load TLS configuration: {0}")]
    Tls(#[source] io::Error),
    #[error("failed to register termination signal handler: {0}")]
    Signals(#[source] io::Error),
    #[error(transparent)]
    Other(#[from] Box<dyn std::error::Error + Send + Sync>),
}

impl ServeError {
    /// True for the sentinel meaning the server was stopped on purpose
    pub fn is_closed(&self) -> bool {
        matches!(self, ServeError::Closed)
    }
}

/// Why a bounded shutdown did not finish draining
#[derive(Debug, Error)]
pub enum ShutdownError {
    #[error("shutdown interrupted with {pending} connection(s) still open: {reason}")]
    Interrupted { pending: usize, reason: ContextError },
    #[error(transparent)]
    Other(#[from] Box<dyn std::error::Error + Send + Sync>),
}

/// A running listener that can be drained
#[async_trait]
pub trait ServerHandle: Send + Sync + 'static {
    /// Serve plain connections until stopped. Serving never ends without an
    /// error; [`ServeError::Closed`] reports a requested stop.
    async fn listen_and_serve(&self) -> Result<Infallible, ServeError>;

    /// Serve TLS connections using the given certificate and key until stopped
    async fn listen_and_serve_tls(&self, tls: &TlsFiles) -> Result<Infallible, ServeError>;

    /// Stop accepting new connections and wait for open ones to finish, giving
    /// up once `ctx` is done
    async fn shutdown(&self, ctx: &Context) -> Result<(), ShutdownError>;
}
