//! Tracing helpers for driver observability.
//!
//! The macro expands to a `tracing` event when the *calling* crate has a
//! `tracing` feature enabled and to nothing otherwise, avoiding `#[cfg]`
//! boilerplate at every call site in driver implementations.

/// Emit a debug-level tracing event for a driver-internal step.
///
/// ```ignore
/// drizzle_debug_trace!("begin", "sqlite.rusqlite");
/// drizzle_debug_trace!("close", "sqlite.rusqlite");
/// ```
#[macro_export]
macro_rules! drizzle_debug_trace {
    ($event:literal, $driver:literal) => {
        #[cfg(feature = "tracing")]
        tracing::debug!(event = $event, driver = $driver, "drizzle_debug.driver");
    };
}
