//! Shared utilities for shutdown integration tests.
#![allow(dead_code)]

use std::convert::Infallible;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use futures::channel::mpsc::{self, UnboundedSender};
use graceful_shutdown::context::Context;
use graceful_shutdown::server::{ServeError, ServerHandle, ShutdownError, TlsFiles};
use graceful_shutdown::utils::signals::SignalWatcher;
use tokio::sync::Notify;
use tokio::time::{sleep, Instant};

/// A signal watcher fed by the returned sender instead of the OS.
pub fn fake_signals() -> (UnboundedSender<i32>, SignalWatcher) {
    let (tx, rx) = mpsc::unbounded();
    (tx, SignalWatcher::from_stream(rx))
}

/// What the mock observed when shutdown was invoked.
#[derive(Debug, Clone, Copy)]
pub struct ShutdownCall {
    pub at: Instant,
    pub deadline: Option<Instant>,
}

/// In-memory server: serving blocks until shutdown is called, then shutdown
/// takes `drain_delay` before it reports completion.
pub struct MockServer {
    stop: Notify,
    serve_error: Mutex<Option<ServeError>>,
    shutdown_error: AtomicBool,
    drain_delay: Duration,
    drained: AtomicBool,
    shutdown_calls: AtomicUsize,
    last_shutdown: Mutex<Option<ShutdownCall>>,
    served_tls: Mutex<Option<Option<TlsFiles>>>,
}

impl MockServer {
    pub fn new(drain_delay: Duration) -> Self {
        Self {
            stop: Notify::new(),
            serve_error: Mutex::new(None),
            shutdown_error: AtomicBool::new(false),
            drain_delay,
            drained: AtomicBool::new(false),
            shutdown_calls: AtomicUsize::new(0),
            last_shutdown: Mutex::new(None),
            served_tls: Mutex::new(None),
        }
    }

    /// Make serving fail immediately with `err`.
    pub fn failing_with(self, err: ServeError) -> Self {
        *self.serve_error.lock().unwrap() = Some(err);
        self
    }

    /// Make shutdown report that draining ran out of time.
    pub fn with_shutdown_error(self) -> Self {
        self.shutdown_error.store(true, Ordering::SeqCst);
        self
    }

    pub fn drained(&self) -> bool {
        self.drained.load(Ordering::SeqCst)
    }

    pub fn shutdown_calls(&self) -> usize {
        self.shutdown_calls.load(Ordering::SeqCst)
    }

    pub fn last_shutdown(&self) -> Option<ShutdownCall> {
        *self.last_shutdown.lock().unwrap()
    }

    /// `None` if never served, `Some(None)` for plain, `Some(Some(_))` for TLS.
    pub fn served_tls(&self) -> Option<Option<TlsFiles>> {
        self.served_tls.lock().unwrap().clone()
    }

    async fn serve(&self, tls: Option<TlsFiles>) -> Result<Infallible, ServeError> {
        *self.served_tls.lock().unwrap() = Some(tls);
        let failure = self.serve_error.lock().unwrap().take();
        if let Some(err) = failure {
            return Err(err);
        }
        self.stop.notified().await;
        Err(ServeError::Closed)
    }
}

#[async_trait]
impl ServerHandle for MockServer {
    async fn listen_and_serve(&self) -> Result<Infallible, ServeError> {
        self.serve(None).await
    }

    async fn listen_and_serve_tls(&self, tls: &TlsFiles) -> Result<Infallible, ServeError> {
        self.serve(Some(tls.clone())).await
    }

    async fn shutdown(&self, ctx: &Context) -> Result<(), ShutdownError> {
        self.shutdown_calls.fetch_add(1, Ordering::SeqCst);
        *self.last_shutdown.lock().unwrap() = Some(ShutdownCall {
            at: Instant::now(),
            deadline: ctx.deadline(),
        });

        // Serving stops first; draining finishes afterwards.
        self.stop.notify_one();
        sleep(self.drain_delay).await;
        self.drained.store(true, Ordering::SeqCst);

        if self.shutdown_error.load(Ordering::SeqCst) {
            return Err(ShutdownError::Interrupted {
                pending: 1,
                reason: graceful_shutdown::ContextError::DeadlineExceeded,
            });
        }
        Ok(())
    }
}
