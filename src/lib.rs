//! Graceful shutdown - stop cleanly on interrupt, terminate and quit signals
//!
//! This library derives cancellable contexts that end on a termination signal
//! and wraps long-running servers so they drain open connections within a
//! bounded deadline before reporting completion.

pub mod api;
pub mod config;
pub mod context;
pub mod server;
pub mod shutdown;
pub mod tasks;
pub mod utils;

// Re-export commonly used types
pub use config::Config;
pub use context::{CancelHandle, Context, ContextError};
pub use server::{HttpServer, ServeError, ServerHandle, ShutdownError, TlsFiles};
pub use shutdown::{
    listen_and_serve, listen_and_serve_tls, with_signal_shutdown, DrainingServer, SHUTDOWN_TIMEOUT,
};
pub use utils::signals::SignalWatcher;
