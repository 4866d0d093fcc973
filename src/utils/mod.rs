//! Utility functions module
//!
//! This module contains the OS-facing pieces shared by the shutdown helpers.

pub mod signals;

// Re-export main types
pub use signals::{signal_name, ShutdownNotice, SignalWatcher, TERMINATION_SIGNALS};
