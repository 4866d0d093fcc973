//! Background tasks module
//!
//! This module contains tasks that run until their context is done.

pub mod countdown;

// Re-export main functions
pub use countdown::countdown;
