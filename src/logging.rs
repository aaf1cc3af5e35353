//! Logging and tracing configuration for CORE-FPV
//!
//! This module provides structured logging using the `tracing` crate.
//!
//! Initialize logging once at host startup:
//! ```rust
//! fpv_core::logging::init();
//! ```
//!
//! # Log Levels
//!
//! - `error` - Errors that prevent operation completion
//! - `warn`  - Unexpected situations that don't prevent completion
//!             (e.g. a malformed trailing offset falling back to 0)
//! - `info`  - High-level operation progress (default in release)
//! - `debug` - Detailed operation information (default in debug builds)
//! - `trace` - Very verbose, per-read/per-scan details
//!
//! # Environment Variable Control
//!
//! Set `RUST_LOG` to control log levels at runtime:
//! ```bash
//! RUST_LOG=debug ./host             # All debug logs
//! RUST_LOG=fpv_core=trace ./host    # Trace for this crate only
//! RUST_LOG=warn ./host              # Only warnings and errors
//! ```

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Initialize the logging/tracing system
///
/// Call this once at host startup
pub fn init() {
    // Build filter from environment or use defaults
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        // Default: info in release, debug in debug builds
        if cfg!(debug_assertions) {
            EnvFilter::new("fpv_core=debug")
        } else {
            EnvFilter::new("fpv_core=info")
        }
    });

    let subscriber = tracing_subscriber::registry().with(filter).with(
        fmt::layer()
            .with_target(true)      // Show module path
            .with_thread_ids(false) // Hide thread IDs (cleaner)
            .with_file(false)
            .with_line_number(false)
            .compact(),
    );

    // Set as global default (ignore error if already set)
    let _ = tracing::subscriber::set_global_default(subscriber);
}

/// Initialize logging with verbose output (file:line, thread IDs)
/// Useful for debugging during development
pub fn init_verbose() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("trace"));

    let subscriber = tracing_subscriber::registry().with(filter).with(
        fmt::layer()
            .with_target(true)
            .with_thread_ids(true)
            .with_file(true)
            .with_line_number(true)
            .pretty(),
    );

    let _ = tracing::subscriber::set_global_default(subscriber);
}
