//! The driver contract an ORM layer talks to.
//!
//! Every driver implements [`ExecQuerier`] and [`Driver`]; every transaction
//! implements [`ExecQuerier`] and [`Tx`]. Anything beyond that is an optional
//! capability ([`ExecContext`], [`QueryContext`], [`BeginTx`]) that a driver
//! advertises through the `as_*` probe methods. Callers probe on every call,
//! so a wrapper can forward a capability exactly when the type it wraps has
//! it.

use crate::context::Context;
use crate::dialect::Dialect;
use crate::error::Result;
use crate::value::Value;

/// Outcome of a statement that does not return rows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ExecResult {
    pub rows_affected: u64,
    pub last_insert_id: Option<i64>,
}

/// An owned result set
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Rows {
    columns: Vec<String>,
    rows: Vec<Vec<Value>>,
}

impl Rows {
    pub fn new(columns: Vec<String>, rows: Vec<Vec<Value>>) -> Self {
        Self { columns, rows }
    }

    #[inline]
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Returns the value at `row`, `col`, if both are in bounds.
    pub fn get(&self, row: usize, col: usize) -> Option<&Value> {
        self.rows.get(row).and_then(|r| r.get(col))
    }

    pub fn iter(&self) -> impl Iterator<Item = &[Value]> {
        self.rows.iter().map(Vec::as_slice)
    }

    /// Appends a row. Used by drivers while reading a result set.
    pub fn push(&mut self, row: Vec<Value>) {
        self.rows.push(row);
    }
}

/// Transaction isolation level requested through [`TxOptions`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum IsolationLevel {
    /// Whatever the backing store uses by default
    #[default]
    Default,
    ReadUncommitted,
    ReadCommitted,
    RepeatableRead,
    Serializable,
}

/// Options for [`BeginTx::begin_tx`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TxOptions {
    pub isolation: IsolationLevel,
    pub read_only: bool,
}

/// Statement execution and querying, shared by drivers and transactions.
pub trait ExecQuerier {
    /// Executes a statement and stores its outcome in `res`.
    fn exec(&self, ctx: &Context, query: &str, args: &[Value], res: &mut ExecResult) -> Result<()>;

    /// Runs a query and stores the result set in `rows`.
    fn query(&self, ctx: &Context, query: &str, args: &[Value], rows: &mut Rows) -> Result<()>;

    /// Probe for the [`ExecContext`] capability.
    fn as_exec_context(&self) -> Option<&dyn ExecContext> {
        None
    }

    /// Probe for the [`QueryContext`] capability.
    fn as_query_context(&self) -> Option<&dyn QueryContext> {
        None
    }
}

/// Optional: execute a statement and return its outcome directly.
pub trait ExecContext {
    fn exec_context(&self, ctx: &Context, query: &str, args: &[Value]) -> Result<ExecResult>;
}

/// Optional: run a query and return its rows directly.
pub trait QueryContext {
    fn query_context(&self, ctx: &Context, query: &str, args: &[Value]) -> Result<Rows>;
}

/// A database driver.
pub trait Driver: ExecQuerier + Send + Sync {
    /// Starts a transaction with the store's default options.
    fn tx(&self, ctx: &Context) -> Result<Box<dyn Tx>>;

    /// Releases the driver's resources.
    fn close(&self) -> Result<()>;

    /// The dialect the backing store speaks.
    fn dialect(&self) -> Dialect;

    /// Probe for the [`BeginTx`] capability.
    fn as_begin_tx(&self) -> Option<&dyn BeginTx> {
        None
    }
}

/// Optional: start a transaction with explicit [`TxOptions`].
pub trait BeginTx {
    fn begin_tx(&self, ctx: &Context, opts: &TxOptions) -> Result<Box<dyn Tx>>;
}

/// A transaction. `commit` and `rollback` consume it.
pub trait Tx: ExecQuerier + Send {
    fn commit(self: Box<Self>) -> Result<()>;

    fn rollback(self: Box<Self>) -> Result<()>;
}

impl<T: ExecQuerier + ?Sized> ExecQuerier for Box<T> {
    #[inline]
    fn exec(&self, ctx: &Context, query: &str, args: &[Value], res: &mut ExecResult) -> Result<()> {
        (**self).exec(ctx, query, args, res)
    }

    #[inline]
    fn query(&self, ctx: &Context, query: &str, args: &[Value], rows: &mut Rows) -> Result<()> {
        (**self).query(ctx, query, args, rows)
    }

    #[inline]
    fn as_exec_context(&self) -> Option<&dyn ExecContext> {
        (**self).as_exec_context()
    }

    #[inline]
    fn as_query_context(&self) -> Option<&dyn QueryContext> {
        (**self).as_query_context()
    }
}

impl<D: Driver + ?Sized> Driver for Box<D> {
    #[inline]
    fn tx(&self, ctx: &Context) -> Result<Box<dyn Tx>> {
        (**self).tx(ctx)
    }

    #[inline]
    fn close(&self) -> Result<()> {
        (**self).close()
    }

    #[inline]
    fn dialect(&self) -> Dialect {
        (**self).dialect()
    }

    #[inline]
    fn as_begin_tx(&self) -> Option<&dyn BeginTx> {
        (**self).as_begin_tx()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rows_access() {
        let mut rows = Rows::new(vec!["id".into(), "name".into()], Vec::new());
        assert!(rows.is_empty());

        rows.push(vec![Value::Integer(1), Value::Text("Alice".into())]);
        rows.push(vec![Value::Integer(2), Value::Null]);

        assert_eq!(rows.len(), 2);
        assert_eq!(rows.columns(), &["id".to_string(), "name".to_string()]);
        assert_eq!(rows.get(0, 1), Some(&Value::Text("Alice".into())));
        assert_eq!(rows.get(1, 1), Some(&Value::Null));
        assert_eq!(rows.get(2, 0), None);
        assert_eq!(rows.iter().count(), 2);
    }

    #[test]
    fn test_tx_options_default() {
        let opts = TxOptions::default();
        assert_eq!(opts.isolation, IsolationLevel::Default);
        assert!(!opts.read_only);
    }
}
