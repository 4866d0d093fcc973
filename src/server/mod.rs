//! Servers that can be drained on shutdown
//!
//! [`ServerHandle`] is what the draining wrapper needs from a listener;
//! [`HttpServer`] implements it for an axum router.

pub mod handle;
pub mod http;
pub mod tls;

// Re-export main types
pub use handle::{ServeError, ServerHandle, ShutdownError, TlsFiles};
pub use http::HttpServer;
