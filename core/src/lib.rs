//! Driver contract shared by `drizzle-debug` and the drivers it wraps.

pub mod context;
pub mod dialect;
pub mod driver;
pub mod error;
pub mod field;
pub mod tracing;
pub mod value;

// Re-export key types and traits
pub use context::Context;
pub use dialect::Dialect;
pub use driver::{
    BeginTx, Driver, ExecContext, ExecQuerier, ExecResult, IsolationLevel, QueryContext, Rows, Tx,
    TxOptions,
};
pub use error::{Capability, DriverError, Result};
pub use field::{DisplayFields, Field, FieldValue, LogFn, SharedLogFn};
pub use value::Value;
