//! Utility functions module
//!
//! Clock formatting and shutdown signal handling.

pub mod clock;
pub mod signals;

// Re-export main functions
pub use clock::format_clock;
pub use signals::shutdown_signal;
