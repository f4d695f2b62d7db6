//! # drizzle-debug
//!
//! A logging decorator for database drivers. Wrap any [`Driver`] and every
//! statement, query and transaction lifecycle event is reported to a logging
//! function before it reaches the driver. Results and errors come back
//! unchanged.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use drizzle_debug::{Context, ExecQuerier, ExecResult, Tx, debug};
//! use drizzle_debug::rusqlite::RusqliteDriver;
//!
//! let drv = debug(RusqliteDriver::open_in_memory()?);
//! let ctx = Context::background().with_value("request_id", "42");
//!
//! let tx = drv.debug_tx(&ctx)?;                 // driver.Tx(<id>): started
//! let mut res = ExecResult::default();
//! tx.exec(&ctx, "CREATE TABLE t (v INTEGER)", &[], &mut res)?;
//! tx.commit()?;                                 // Tx(<id>): committed
//! ```
//!
//! ## Transactions
//!
//! Every transaction started through a [`DebugDriver`] gets a fresh UUID v4
//! id. All of its log lines carry that id, so lines from one transaction can
//! be correlated even when many run concurrently.
//!
//! ## Optional capabilities
//!
//! [`ExecContext`], [`QueryContext`] and [`BeginTx`] are optional. A
//! [`DebugDriver`] advertises one exactly when the driver it wraps does, and
//! calling one the wrapped driver lacks fails with
//! [`DriverError::Unsupported`] without logging anything.
//!
//! ## Feature flags
//!
//! | Feature    | Default | Enables                                         |
//! |------------|---------|-------------------------------------------------|
//! | `tracing`  | ✅      | [`TracingLogger`] and [`debug`]                 |
//! | `rusqlite` |         | [`rusqlite::RusqliteDriver`] (bundled SQLite)   |
//! | `serde`    |         | `Serialize`/`Deserialize` for values and fields |

mod driver;
#[cfg(feature = "tracing")]
mod logger;
mod transaction;

#[cfg(feature = "rusqlite")]
pub mod rusqlite;

pub use driver::{DebugDriver, debug_with_context};
#[cfg(feature = "tracing")]
pub use logger::{TARGET, TracingLogger};
pub use transaction::DebugTx;

/// Driver contract types, re-exported from `drizzle-debug-core`
pub use drizzle_debug_core::{
    BeginTx, Capability, Context, Dialect, DisplayFields, Driver, DriverError, ExecContext,
    ExecQuerier, ExecResult, Field, FieldValue, IsolationLevel, LogFn, QueryContext, Result, Rows,
    SharedLogFn, Tx, TxOptions, Value,
};

/// Wraps `driver` so that every operation is logged through `tracing` at
/// `DEBUG` level. Use [`debug_with_context`] to supply another sink.
#[cfg(feature = "tracing")]
pub fn debug<D: Driver>(driver: D) -> DebugDriver<D> {
    DebugDriver::new(driver, TracingLogger::default().into_log_fn())
}
