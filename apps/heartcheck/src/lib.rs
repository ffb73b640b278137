//! # HeartCheck Library
//!
//! This library exposes the HeartCheck modules for testing and integration.
//!
//! The main binary uses these modules through the `main.rs` entry point.

pub mod api;
pub mod chart;
pub mod cli;
pub mod page;

// Re-export heartcheck_core for convenience
pub use heartcheck_core;
