//! Graceful shutdown on termination signals
//!
//! Two helpers share the same pattern of waiting for a signal and then acting:
//! - [`with_signal_shutdown`] derives a [`Context`](crate::context::Context)
//!   that is canceled on the first termination signal
//! - [`DrainingServer`] serves a [`ServerHandle`](crate::server::ServerHandle)
//!   and drains it within a bounded deadline on the first termination signal

pub mod drain;
pub mod propagate;

// Re-export main functions
pub use drain::{listen_and_serve, listen_and_serve_tls, DrainingServer, SHUTDOWN_TIMEOUT};
pub use propagate::{with_shutdown_signals, with_signal_shutdown};
